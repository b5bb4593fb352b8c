//! Application context handed to the rest of the program after bootstrap.

use crate::Error;

/// Bound configuration plus the identity of the running build.
///
/// ## Example
///
/// ```no_run
/// use envbind::{AppContext, Configure, Field, Fields, Loader};
///
/// #[derive(Default)]
/// struct MyConfig {
///     name: String,
/// }
///
/// impl Configure for MyConfig {
///     fn configure(&mut self, fields: &mut Fields<'_>) {
///         fields.value(Field::new("name").required(), &mut self.name);
///     }
/// }
///
/// let ctx = AppContext::builder()
///     .with_config(
///         Loader::builder()
///             .with_file(".env")
///             .with_process_env()
///             .build::<MyConfig>()?,
///     )
///     .with_version(env!("CARGO_PKG_VERSION"), "dev")
///     .build()?;
///
/// println!("{} {}", ctx.config().name, ctx.version());
/// # Ok::<(), envbind::Error>(())
/// ```
#[derive(Debug)]
pub struct AppContext<C> {
    config: C,
    version: String,
    build: String,
}

impl<C> AppContext<C> {
    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Build identifier, e.g. a commit hash.
    pub fn build_id(&self) -> &str {
        &self.build
    }

    pub fn into_config(self) -> C {
        self.config
    }
}

impl AppContext<()> {
    /// Creates a new builder for constructing an `AppContext`.
    pub fn builder() -> AppContextBuilder<()> {
        AppContextBuilder {
            config: None,
            version: String::new(),
            build: String::new(),
        }
    }
}

/// Builder for constructing an [`AppContext`].
///
/// Starts without a config (`AppContextBuilder<()>`) and becomes
/// `AppContextBuilder<C>` once [`with_config`](Self::with_config) is called.
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder<C> {
    config: Option<C>,
    version: String,
    build: String,
}

impl AppContextBuilder<()> {
    /// Attaches the bound configuration.
    pub fn with_config<C>(self, config: C) -> AppContextBuilder<C> {
        AppContextBuilder {
            config: Some(config),
            version: self.version,
            build: self.build,
        }
    }
}

impl<C> AppContextBuilder<C> {
    pub fn with_version(mut self, version: impl Into<String>, build: impl Into<String>) -> Self {
        self.version = version.into();
        self.build = build.into();
        self
    }

    /// Builds the `AppContext`.
    ///
    /// Returns an error if no configuration was provided.
    pub fn build(self) -> Result<AppContext<C>, Error> {
        Ok(AppContext {
            config: self.config.ok_or(Error::MissingConfig)?,
            version: self.version,
            build: self.build,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Configure, Environment, Field, Fields, Loader};

    #[derive(Debug, Default)]
    struct Service {
        name: String,
    }

    impl Configure for Service {
        fn configure(&mut self, fields: &mut Fields<'_>) {
            fields.value(Field::new("name").required(), &mut self.name);
        }
    }

    #[test]
    fn test_context_from_loader() {
        let env: Environment = [("NAME", "api")].into_iter().collect();
        let ctx = AppContext::builder()
            .with_version("1.0.0", "123abc")
            .with_config(Loader::builder().with_env(env).build::<Service>().unwrap())
            .build()
            .unwrap();

        assert_eq!(ctx.config().name, "api");
        assert_eq!(ctx.version(), "1.0.0");
        assert_eq!(ctx.build_id(), "123abc");
    }

    #[test]
    fn test_missing_config() {
        let result = AppContext::builder().with_version("1.0.0", "x").build();
        assert!(matches!(result, Err(Error::MissingConfig)));
    }

    #[test]
    fn test_bind_failure_converts_to_error() {
        fn bootstrap() -> Result<AppContext<Service>, Error> {
            AppContext::builder()
                .with_config(
                    Loader::builder()
                        .with_env(Environment::default())
                        .build::<Service>()?,
                )
                .build()
        }

        let err = bootstrap().unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: missing required env: NAME"
        );
    }
}
