// src/internal/registry/mod.rs

pub mod process;
pub mod registry;

pub use process::{get, global, init, named};
pub use registry::{LoggerProvider, LoggerRegistry};
