// src/internal/config/mod.rs

pub mod config;

pub use self::config::{LoggerConfig, ENV_PREFIX};
