//! Configuration loading and binding.

mod bind;
mod builder;
mod duration;
mod env;
mod error;
mod field;
mod file;
mod source;
mod value;

pub use bind::{bind, describe, Configure, Fields};
pub use builder::{load, load_env, load_files, Loader};
pub use duration::{parse_duration, DurationError};
pub use env::Environment;
pub use error::{ConfigError, FieldError, FieldErrors};
pub use field::{Field, FieldDescriptor, ScalarKind, ValueKind, DEFAULT_SEPARATOR};
pub use file::parse_env_file;
pub use source::{aggregate, SourceMap};
pub use value::{FromEnv, Scalar};
