use loghub::{Level, LoggerConfig, LoggerProvider, LoggerRegistry};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::sync::Barrier;
    use std::thread;

    fn production_config(path: &Path) -> LoggerConfig {
        LoggerConfig::fallback()
            .production(true)
            .with_output(path.to_string_lossy())
    }

    fn read_records(path: &Path) -> Vec<serde_json::Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    // ==================== default_logger() tests ====================

    #[test]
    fn test_first_default_uses_fallback() {
        let registry = LoggerRegistry::new();
        let logger = registry.default_logger();

        // fallback is non-strict
        assert!(logger.enabled(Level::DEBUG));
        assert!(registry.is_initialized());
    }

    #[test]
    fn test_default_is_stable_without_initialize() {
        let registry = LoggerRegistry::new();
        let first = registry.default_logger();
        let second = registry.default_logger();

        assert!(first.shares_backend(&second));
    }

    #[test]
    #[should_panic(expected = "cannot build the fallback logger")]
    fn test_unbuildable_fallback_is_fatal() {
        let fallback = LoggerConfig::fallback()
            .production(true)
            .with_output("/nonexistent/loghub/dir/app.log");
        let registry = LoggerRegistry::with_fallback(fallback);

        registry.default_logger();
    }

    #[test]
    #[should_panic(expected = "cannot build the fallback logger")]
    fn test_named_with_unbuildable_fallback_is_fatal() {
        let fallback = LoggerConfig::fallback()
            .production(true)
            .with_output("/nonexistent/loghub/dir/app.log");
        let registry = LoggerRegistry::with_fallback(fallback);

        registry.named("api");
    }

    // ==================== initialize() tests ====================

    #[test]
    fn test_initialize_installs_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let registry = LoggerRegistry::new();

        registry.initialize(production_config(&path)).unwrap();
        registry.default_logger().info("hello");

        let records = read_records(&path);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["message"], "hello");
    }

    #[test]
    fn test_failed_initialize_keeps_previous_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let registry = LoggerRegistry::new();
        registry.initialize(production_config(&path)).unwrap();
        let before = registry.default_logger();

        let bad = LoggerConfig::fallback()
            .production(true)
            .with_output(dir.path().join("missing").join("app.log").to_string_lossy());
        let result = registry.initialize(bad);

        assert!(result.is_err());
        let after = registry.default_logger();
        assert!(after.shares_backend(&before));
        after.warn("still here");
        assert_eq!(read_records(&path)[0]["message"], "still here");
    }

    #[test]
    fn test_failed_initialize_on_fresh_registry_stays_uninitialized() {
        let registry = LoggerRegistry::new();
        let bad = LoggerConfig::fallback()
            .production(true)
            .with_output("/nonexistent/loghub/dir/app.log");

        assert!(registry.initialize(bad).is_err());
        assert!(!registry.is_initialized());
    }

    #[test]
    fn test_reinitialize_refreshes_named_loggers() {
        let dir = tempfile::tempdir().unwrap();
        let first_path = dir.path().join("first.log");
        let second_path = dir.path().join("second.log");
        let registry = LoggerRegistry::new();

        registry.initialize(production_config(&first_path)).unwrap();
        let old = registry.named("api");
        old.info("to first");

        registry.initialize(production_config(&second_path)).unwrap();
        let new = registry.named("api");
        new.info("to second");

        assert!(!new.shares_backend(&old));
        assert!(new.shares_backend(&registry.default_logger()));

        let first = read_records(&first_path);
        let second = read_records(&second_path);
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0]["logger"], "api");
        assert_eq!(second[0]["message"], "to second");
    }

    // ==================== named() tests ====================

    #[test]
    fn test_named_twice_is_memoized() {
        let registry = LoggerRegistry::new();
        let first = registry.named("x");
        let second = registry.named("x");

        assert!(first.shares_backend(&second));
        assert_eq!(first.name(), second.name());
        assert_eq!(registry.cached_names(), ["x"]);
    }

    #[test]
    fn test_distinct_names_get_distinct_entries() {
        let registry = LoggerRegistry::new();
        let a = registry.named("a");
        let b = registry.named("b");

        assert_eq!(a.name(), Some("a"));
        assert_eq!(b.name(), Some("b"));
        assert_eq!(registry.cached_names(), ["a", "b"]);

        // lookups after the first request are cache hits
        registry.named("a");
        registry.named("b");
        assert_eq!(registry.cached_names(), ["a", "b"]);
    }

    #[test]
    fn test_named_records_carry_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let registry = LoggerRegistry::new();
        registry.initialize(production_config(&path)).unwrap();

        registry.named("payments").info("charged");
        registry.default_logger().info("unnamed");

        let records = read_records(&path);
        assert_eq!(records[0]["logger"], "payments");
        assert!(records[1].get("logger").is_none());
    }

    #[test]
    fn test_concurrent_first_requests_share_one_entry() {
        const THREADS: usize = 16;
        let registry = LoggerRegistry::new();
        let barrier = Barrier::new(THREADS);

        let loggers: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        registry.named("same-name")
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(loggers.len(), THREADS);
        assert_eq!(registry.cached_names(), ["same-name"]);
        let default = registry.default_logger();
        for logger in &loggers {
            assert_eq!(logger.name(), Some("same-name"));
            assert!(logger.shares_backend(&default));
        }
    }

    #[test]
    fn test_concurrent_default_requests_build_one_default() {
        let registry = LoggerRegistry::new();

        let loggers: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.default_logger()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for logger in &loggers {
            assert!(logger.shares_backend(&loggers[0]));
        }
    }

    // ==================== structured records ====================

    #[test]
    fn test_named_logger_structured_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let registry = LoggerRegistry::new();
        registry.initialize(production_config(&path)).unwrap();

        let api = registry.named("api");
        loghub::log_info!(api, user = 7, "structured");
        api.in_scope(|| tracing::info!(user = 8, "routed"));
        let request = loghub::log_with!(api, request_id = 42);
        request.warn("bound");
        registry.default_logger().flush().unwrap();

        let records = read_records(&path);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0]["logger"], "api");
        assert_eq!(records[0]["user"], 7);

        assert_eq!(records[1]["message"], "routed");
        assert_eq!(records[1]["user"], 8);
        assert_eq!(records[1]["spans"][0]["logger"], "api");

        assert_eq!(records[2]["logger"], "api");
        assert_eq!(records[2]["spans"][0]["request_id"], 42);
    }

    // ==================== provider abstraction ====================

    fn emit_through(provider: &dyn LoggerProvider) {
        provider.named("job").warn("through provider");
    }

    #[test]
    fn test_call_sites_accept_any_provider() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let registry = LoggerRegistry::new();
        registry.initialize(production_config(&path)).unwrap();

        emit_through(&registry);

        let records = read_records(&path);
        assert_eq!(records[0]["logger"], "job");
        assert_eq!(records[0]["level"], "WARN");
    }
}
