//! Struct-driven configuration from environment variables and `KEY=VALUE` files.
//!
//! Records declare their fields through [`Configure`]; a [`Loader`] merges
//! override files and the environment into a [`SourceMap`] and binds the
//! record against it, reporting every missing or malformed field at once.

pub mod config;
pub mod context;
mod error;
pub mod logging;

pub use config::{
    bind, describe, load, load_env, load_files, ConfigError, Configure, Environment, Field,
    FieldDescriptor, FieldError, FieldErrors, Fields, Loader, SourceMap,
};
pub use context::AppContext;
pub use error::Error;
pub use logging::LogSettings;
