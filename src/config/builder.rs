use std::path::{Path, PathBuf};

use super::bind::{bind, Configure};
use super::env::Environment;
use super::source::SourceMap;
use super::ConfigError;

/// An override file in the loading pipeline.
#[derive(Debug)]
struct FileSource {
    path: PathBuf,
    required: bool,
}

/// Where environment values come from, if anywhere.
#[derive(Debug)]
enum EnvSource {
    Process,
    Snapshot(Environment),
}

/// Builder for loading configuration from override files and the environment.
///
/// Files are merged in registration order, with later files overriding
/// earlier ones. The environment, when enabled, is merged after every file,
/// so an environment variable always beats a file entry for the same key.
/// Declared field defaults apply only when neither provides a value.
///
/// ## Example
///
/// ```no_run
/// use envbind::{Configure, Field, Fields, Loader};
///
/// #[derive(Default)]
/// struct MyConfig {
///     name: String,
///     port: u16,
/// }
///
/// impl Configure for MyConfig {
///     fn configure(&mut self, fields: &mut Fields<'_>) {
///         fields.value(Field::new("name").required(), &mut self.name);
///         fields.value(Field::new("port").default("8080"), &mut self.port);
///     }
/// }
///
/// let config: MyConfig = Loader::builder()
///     .with_file(".env")
///     .with_file(".env.local")
///     .with_process_env()
///     .build()?;
/// # Ok::<(), envbind::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() or .bind() is called"]
pub struct Loader {
    files: Vec<FileSource>,
    env: Option<EnvSource>,
}

impl Loader {
    /// Creates a new loader with no sources.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds an override file. A missing file is silently skipped.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push(FileSource {
            path: path.as_ref().to_path_buf(),
            required: false,
        });
        self
    }

    /// Adds an override file that must exist.
    pub fn with_required_file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push(FileSource {
            path: path.as_ref().to_path_buf(),
            required: true,
        });
        self
    }

    /// Merges the live process environment, captured when the loader runs.
    ///
    /// Replaces any snapshot set with [`with_env`](Self::with_env).
    pub fn with_process_env(mut self) -> Self {
        self.env = Some(EnvSource::Process);
        self
    }

    /// Merges a fixed environment snapshot instead of the process environment.
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = Some(EnvSource::Snapshot(env));
        self
    }

    /// Reads every source and merges them into one mapping.
    pub fn sources(&self) -> Result<SourceMap, ConfigError> {
        let mut map = SourceMap::new();

        for file in &self.files {
            map.merge_file(&file.path, file.required)?;
        }

        match &self.env {
            Some(EnvSource::Process) => map.merge_env(&Environment::capture()),
            Some(EnvSource::Snapshot(env)) => map.merge_env(env),
            None => {}
        }

        Ok(map)
    }

    /// Binds an existing record in place.
    pub fn bind<T: Configure + ?Sized>(&self, target: &mut T) -> Result<(), ConfigError> {
        let source = self.sources()?;
        bind(target, &source)
    }

    /// Builds a record from its default value.
    pub fn build<T: Configure + Default>(self) -> Result<T, ConfigError> {
        let mut target = T::default();
        self.bind(&mut target)?;
        Ok(target)
    }
}

/// Loads `T` from the given files and the process environment.
pub fn load<T, P>(files: &[P]) -> Result<T, ConfigError>
where
    T: Configure + Default,
    P: AsRef<Path>,
{
    files
        .iter()
        .fold(Loader::builder(), |loader, path| loader.with_file(path))
        .with_process_env()
        .build()
}

/// Loads `T` from the process environment only.
pub fn load_env<T: Configure + Default>() -> Result<T, ConfigError> {
    Loader::builder().with_process_env().build()
}

/// Loads `T` from the given files only.
pub fn load_files<T, P>(files: &[P]) -> Result<T, ConfigError>
where
    T: Configure + Default,
    P: AsRef<Path>,
{
    files
        .iter()
        .fold(Loader::builder(), |loader, path| loader.with_file(path))
        .build()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::config::bind::Fields;
    use crate::config::field::Field;

    #[derive(Debug, Default, PartialEq)]
    struct App {
        name: String,
        env: String,
        workers: u32,
        hosts: Vec<String>,
        shutdown: Duration,
    }

    impl Configure for App {
        fn configure(&mut self, fields: &mut Fields<'_>) {
            fields.value(Field::new("name").required(), &mut self.name);
            fields.value(Field::new("env").default("dev"), &mut self.env);
            fields.value(Field::new("workers").default("4"), &mut self.workers);
            fields.value(Field::new("hosts").sep(";"), &mut self.hosts);
            fields.value(Field::new("shutdown").default("10s"), &mut self.shutdown);
        }
    }

    fn env_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_build_from_files() {
        let base = env_file("NAME=\"web app\"\nWORKERS=2\nHOSTS=a;b\n");
        let local = env_file("# local overrides\nworkers=8\n");

        let app: App = Loader::builder()
            .with_file(base.path())
            .with_file(local.path())
            .build()
            .unwrap();

        assert_eq!(
            app,
            App {
                name: "web app".into(),
                env: "dev".into(),
                workers: 8,
                hosts: vec!["a".into(), "b".into()],
                shutdown: Duration::from_secs(10),
            }
        );
    }

    #[test]
    fn test_environment_beats_files() {
        let file = env_file("NAME=from-file\nENV=staging\n");
        let env: Environment = [("NAME", "from-env")].into_iter().collect();

        let app: App = Loader::builder()
            .with_file(file.path())
            .with_env(env)
            .build()
            .unwrap();

        assert_eq!(app.name, "from-env");
        assert_eq!(app.env, "staging");
    }

    #[test]
    fn test_required_file_missing() {
        let result = Loader::builder()
            .with_required_file("/nonexistent/.env")
            .build::<App>();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_read_error_aborts_before_binding() {
        let dir = tempfile::tempdir().unwrap();
        let result = Loader::builder().with_file(dir.path()).build::<App>();
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_bind_in_place_keeps_unresolved_fields() {
        let env: Environment = [("NAME", "svc")].into_iter().collect();
        let mut app = App {
            hosts: vec!["preset".into()],
            ..App::default()
        };

        Loader::builder().with_env(env).bind(&mut app).unwrap();
        assert_eq!(app.name, "svc");
        assert_eq!(app.hosts, vec!["preset".to_string()]);
    }

    #[test]
    fn test_load_files_shortcut() {
        let file = env_file("NAME=shortcut\n");
        let app: App = load_files(&[file.path()]).unwrap();
        assert_eq!(app.name, "shortcut");
    }

    #[derive(Debug, Default)]
    struct Shell {
        path: String,
        marker: String,
    }

    impl Configure for Shell {
        fn configure(&mut self, fields: &mut Fields<'_>) {
            fields.value(Field::new("path"), &mut self.path);
            fields.value(Field::new("envbind_test_marker"), &mut self.marker);
        }
    }

    #[test]
    fn test_process_env_shortcuts() {
        let expected = std::env::var("PATH").unwrap_or_default();

        let shell: Shell = load_env().unwrap();
        assert_eq!(shell.path, expected);

        let file = env_file("PATH=from-file\nENVBIND_TEST_MARKER=file\n");
        let shell: Shell = load(&[file.path()]).unwrap();
        assert_eq!(shell.marker, "file");
        if !expected.is_empty() {
            assert_eq!(shell.path, expected);
        }
    }

    #[test]
    fn test_missing_required_surfaces_as_field_error() {
        let err = Loader::builder()
            .with_env(Environment::default())
            .build::<App>()
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required env: NAME");
    }
}
