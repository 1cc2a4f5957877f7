// src/internal/logger/sink.rs

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

use super::BuildError;

/// A single opened output target.
#[derive(Debug, Clone)]
enum Sink {
    Stdout,
    Stderr,
    File(Arc<Mutex<File>>),
}

impl Sink {
    fn open(target: &str) -> Result<Self, BuildError> {
        match target {
            "stdout" => Ok(Sink::Stdout),
            "stderr" => Ok(Sink::Stderr),
            _ => {
                let path = match target.split_once("://") {
                    Some(("file", path)) => path,
                    Some(_) => return Err(BuildError::UnsupportedOutput(target.to_string())),
                    None => target,
                };
                let file = open_log_file(Path::new(path)).map_err(|source| {
                    BuildError::OpenOutput {
                        target: target.to_string(),
                        source,
                    }
                })?;
                Ok(Sink::File(Arc::new(Mutex::new(file))))
            }
        }
    }

    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().lock().write_all(buf),
            Sink::Stderr => io::stderr().lock().write_all(buf),
            Sink::File(file) => file
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .write_all(buf),
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().flush(),
            Sink::Stderr => io::stderr().flush(),
            Sink::File(file) => file.lock().unwrap_or_else(PoisonError::into_inner).flush(),
        }
    }
}

/// Open a log file for appending. Missing parent directories are an error.
fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Writer handed to the fmt layer: every formatted record is written to each
/// sink in the order the targets were configured.
#[derive(Debug, Clone)]
pub(crate) struct OutputWriter {
    sinks: Arc<[Sink]>,
}

impl OutputWriter {
    /// Open every target up front. Fails on the first target that cannot be
    /// opened; nothing is kept from the targets opened before it.
    pub(crate) fn open<S: AsRef<str>>(targets: &[S]) -> Result<Self, BuildError> {
        let sinks = targets
            .iter()
            .map(|target| Sink::open(target.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            sinks: sinks.into(),
        })
    }
}

impl io::Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for sink in self.sinks.iter() {
            sink.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for sink in self.sinks.iter() {
            sink.flush()?;
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for OutputWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_open_standard_streams() {
        let mut writer = OutputWriter::open(&["stdout", "stderr"]).unwrap();
        writer.flush().unwrap();
    }

    #[test]
    fn test_open_no_targets_discards() {
        let mut writer = OutputWriter::open::<&str>(&[]).unwrap();
        assert_eq!(writer.write(b"dropped").unwrap(), 7);
    }

    #[test]
    fn test_file_target_is_created_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "existing\n").unwrap();

        let target = path.to_string_lossy().to_string();
        let mut writer = OutputWriter::open(&[target]).unwrap();
        writer.write_all(b"appended\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "existing\nappended\n");
    }

    #[test]
    fn test_file_url_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("url.log");

        let target = format!("file://{}", path.display());
        let mut writer = OutputWriter::open(&[target]).unwrap();
        writer.write_all(b"via url\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "via url\n");
    }

    #[test]
    fn test_every_sink_receives_each_write() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");

        let targets = [
            first.to_string_lossy().to_string(),
            second.to_string_lossy().to_string(),
        ];
        let mut writer = OutputWriter::open(&targets).unwrap();
        writer.write_all(b"line\n").unwrap();

        assert_eq!(fs::read_to_string(&first).unwrap(), "line\n");
        assert_eq!(fs::read_to_string(&second).unwrap(), "line\n");
    }

    #[test]
    fn test_missing_directory_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir
            .path()
            .join("missing")
            .join("app.log")
            .to_string_lossy()
            .to_string();

        match OutputWriter::open(&[target.clone()]) {
            Err(BuildError::OpenOutput { target: failed, .. }) => assert_eq!(failed, target),
            other => panic!("expected OpenOutput error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_scheme_is_rejected() {
        let result = OutputWriter::open(&["udp://127.0.0.1:514"]);
        assert!(matches!(result, Err(BuildError::UnsupportedOutput(t)) if t == "udp://127.0.0.1:514"));
    }
}
