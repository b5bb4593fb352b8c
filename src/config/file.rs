//! `KEY=VALUE` override files.

use std::path::Path;

use super::ConfigError;

/// Parses the contents of an override file into key/value pairs, in file order.
///
/// Blank lines, `#` comments and lines without `=` are skipped. Keys and
/// values are trimmed, and one layer of matching `"` or `'` quotes is
/// stripped from the value.
pub fn parse_env_file(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .filter_map(|(key, value)| {
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), unquote(value.trim()).to_string()))
        })
        .collect()
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Reads and parses an override file.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
pub(crate) fn load_env_file(
    path: &Path,
    required: bool,
) -> Result<Option<Vec<(String, String)>>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(parse_env_file(&contents))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(ConfigError::FileNotFound(path.to_path_buf()))
            } else {
                Ok(None)
            }
        }
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn pairs(contents: &str) -> Vec<(String, String)> {
        parse_env_file(contents)
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let parsed = pairs(
            "
            # database
            DB_HOST = localhost

            not a pair
            DB_PORT=5432
            ",
        );
        assert_eq!(
            parsed,
            vec![
                ("DB_HOST".to_string(), "localhost".to_string()),
                ("DB_PORT".to_string(), "5432".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_splits_on_first_equals() {
        let parsed = pairs("DSN=postgres://u:p@h/db?sslmode=disable");
        assert_eq!(parsed[0].1, "postgres://u:p@h/db?sslmode=disable");
    }

    #[test]
    fn test_parse_strips_one_layer_of_quotes() {
        let parsed = pairs(
            r#"
            NAME="web app"
            SINGLE='it works'
            NESTED="'kept'"
            MISMATCHED="open'
            LONE="
            EMPTY=""
            "#,
        );
        let get = |key: &str| {
            parsed
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("NAME"), Some("web app"));
        assert_eq!(get("SINGLE"), Some("it works"));
        assert_eq!(get("NESTED"), Some("'kept'"));
        assert_eq!(get("MISMATCHED"), Some("\"open'"));
        assert_eq!(get("LONE"), Some("\""));
        assert_eq!(get("EMPTY"), Some(""));
    }

    #[test]
    fn test_parse_skips_empty_keys() {
        assert!(pairs("=value").is_empty());
    }

    #[test]
    fn test_load_existing_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "APP_NAME=demo").unwrap();

        let parsed = load_env_file(file.path(), true).unwrap().unwrap();
        assert_eq!(parsed, vec![("APP_NAME".to_string(), "demo".to_string())]);
    }

    #[test]
    fn test_load_missing_file() {
        let path = Path::new("/nonexistent/path/.env");
        assert!(load_env_file(path, false).unwrap().is_none());
        assert!(matches!(
            load_env_file(path, true),
            Err(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_load_unreadable_path() {
        // A directory exists but cannot be read as a file.
        let dir = tempfile::tempdir().unwrap();
        let result = load_env_file(dir.path(), false);
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
