//! Logging setup driven by bound configuration.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Configure, Field, Fields};
use crate::Error;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event (default).
    #[default]
    Json,
    /// Human-readable lines.
    Text,
}

impl LogFormat {
    /// Parses a format name, falling back to JSON for anything unrecognised.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("text") {
            LogFormat::Text
        } else {
            LogFormat::Json
        }
    }
}

/// Logging section of an application configuration.
///
/// Binds `LEVEL`, `FORMAT` and `ANSI` under whatever prefix it is registered
/// at, e.g. `LOG_LEVEL` when registered as a `log` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// `EnvFilter` directives, e.g. `info` or `envbind=debug,warn`.
    pub level: String,
    pub format: String,
    pub ansi: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
            ansi: false,
        }
    }
}

impl Configure for LogSettings {
    fn configure(&mut self, fields: &mut Fields<'_>) {
        fields.value(Field::new("level").default("info"), &mut self.level);
        fields.value(Field::new("format").default("json"), &mut self.format);
        fields.value(Field::new("ansi").default("false"), &mut self.ansi);
    }
}

impl LogSettings {
    pub fn format(&self) -> LogFormat {
        LogFormat::parse_lenient(&self.format)
    }

    pub fn filter(&self) -> Result<EnvFilter, Error> {
        EnvFilter::try_new(&self.level).map_err(|e| Error::Logging(e.to_string()))
    }

    /// Installs the global subscriber. Fails if one is already set.
    pub fn init(&self) -> Result<(), Error> {
        let filter = self.filter()?;
        let registry = tracing_subscriber::registry().with(filter);

        match self.format() {
            LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
            LogFormat::Text => registry.with(fmt::layer().with_ansi(self.ansi)).try_init(),
        }
        .map_err(|e| Error::Logging(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{bind, SourceMap};

    #[test]
    fn test_defaults() {
        let mut settings = LogSettings {
            level: String::new(),
            format: String::new(),
            ansi: true,
        };
        bind(&mut settings, &SourceMap::new()).unwrap();
        assert_eq!(settings, LogSettings::default());
    }

    #[test]
    fn test_bound_under_section_prefix() {
        #[derive(Default)]
        struct Root {
            log: LogSettings,
        }
        impl Configure for Root {
            fn configure(&mut self, fields: &mut Fields<'_>) {
                fields.section(Field::new("log"), &mut self.log);
            }
        }

        let source: SourceMap = [("LOG_LEVEL", "debug"), ("LOG_FORMAT", "TEXT")]
            .into_iter()
            .collect();
        let mut root = Root::default();
        bind(&mut root, &source).unwrap();

        assert_eq!(root.log.level, "debug");
        assert_eq!(root.log.format(), LogFormat::Text);
    }

    #[test]
    fn test_unknown_format_falls_back_to_json() {
        assert_eq!(LogFormat::parse_lenient("xml"), LogFormat::Json);
        assert_eq!(LogFormat::parse_lenient("text"), LogFormat::Text);
    }

    #[test]
    fn test_invalid_level_is_an_error() {
        let settings = LogSettings {
            level: "envbind=notalevel".to_string(),
            ..LogSettings::default()
        };
        assert!(matches!(settings.filter(), Err(Error::Logging(_))));
        assert!(LogSettings::default().filter().is_ok());
    }
}
