use std::collections::HashMap;
use std::path::Path;

use super::env::Environment;
use super::file::load_env_file;
use super::ConfigError;

/// Flat key to text mapping the binder resolves fields against.
///
/// Keys are upper-cased on insert and on lookup. Inserting an existing key
/// overwrites its value, so later merges win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap {
    entries: HashMap<String, String>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(key.as_ref().to_uppercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.to_uppercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges pairs in order, each overwriting any earlier value for its key.
    pub fn merge<K, V, I>(&mut self, pairs: I)
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in pairs {
            self.insert(key, value);
        }
    }

    /// Merges an override file.
    ///
    /// A missing file is skipped unless `required` is set; a file that exists
    /// but cannot be read is an error.
    pub fn merge_file(&mut self, path: &Path, required: bool) -> Result<(), ConfigError> {
        match load_env_file(path, required)? {
            Some(pairs) => {
                tracing::debug!(path = %path.display(), keys = pairs.len(), "merged env file");
                self.merge(pairs);
            }
            None => {
                tracing::debug!(path = %path.display(), "env file not found, skipping");
            }
        }
        Ok(())
    }

    pub fn merge_env(&mut self, env: &Environment) {
        tracing::debug!(keys = env.len(), "merged environment");
        self.merge(env.iter());
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for SourceMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = SourceMap::new();
        map.merge(iter);
        map
    }
}

/// Builds a source map from override files and an optional environment.
///
/// Files are merged in order, so a later file overrides an earlier one. The
/// environment is merged last and wins over every file.
pub fn aggregate<P: AsRef<Path>>(
    files: &[P],
    env: Option<&Environment>,
) -> Result<SourceMap, ConfigError> {
    let mut map = SourceMap::new();
    for path in files {
        map.merge_file(path.as_ref(), false)?;
    }
    if let Some(env) = env {
        map.merge_env(env);
    }
    Ok(map)
}
