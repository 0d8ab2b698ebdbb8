use crate::settings::error::SettingsError;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Environment variable manager that loads from system and .env files
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
    file_keys: HashSet<String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Manager over an explicit set of variables, ignoring the process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            file_keys: HashSet::new(),
        }
    }

    /// Load variables from a .env file. Values from the file win over the process environment.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SettingsError::EnvFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        self.parse_env_content(&content)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// First non-blank value among `keys`, in order, with the key it came from.
    pub fn first_of<'k>(&self, keys: &[&'k str]) -> Option<(&'k str, &str)> {
        keys.iter().find_map(|key| {
            self.get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (*key, v))
        })
    }

    /// Like [`first_of`](Self::first_of), but only considers keys set by a loaded .env file.
    pub fn first_of_file<'k>(&self, keys: &[&'k str]) -> Option<(&'k str, &str)> {
        let from_file: Vec<&'k str> = keys
            .iter()
            .copied()
            .filter(|key| self.file_keys.contains(*key))
            .collect();
        self.first_of(&from_file)
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), SettingsError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);

            if let Some(eq_pos) = line.find('=') {
                let key = line[..eq_pos].trim();
                let value = line[eq_pos + 1..].trim();

                if key.is_empty() {
                    return Err(SettingsError::InvalidEnvLine {
                        line: line_num + 1,
                        reason: "empty key".to_string(),
                    });
                }

                self.vars
                    .insert(key.to_string(), Self::unquote_value(value));
                self.file_keys.insert(key.to_string());
            } else {
                return Err(SettingsError::InvalidEnvLine {
                    line: line_num + 1,
                    reason: "expected KEY=VALUE".to_string(),
                });
            }
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn empty() -> EnvManager {
        EnvManager::from_vars(Vec::<(String, String)>::new())
    }

    #[test]
    fn test_parse_basic_env() {
        let mut env = empty();
        let content = r#"
# Comment
KEY1=value1
export KEY2=value2
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("KEY1"), Some("value1"));
        assert_eq!(env.get("KEY2"), Some("value2"));
    }

    #[test]
    fn test_parse_quoted_values() {
        let mut env = empty();
        let content = r#"
QUOTED="value with spaces"
SINGLE='single quoted'
UNQUOTED=no_spaces
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("QUOTED"), Some("value with spaces"));
        assert_eq!(env.get("SINGLE"), Some("single quoted"));
        assert_eq!(env.get("UNQUOTED"), Some("no_spaces"));
    }

    #[test]
    fn test_invalid_env_format() {
        let mut env = empty();
        let err = env.parse_env_content("A=1\nINVALID LINE").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidEnvLine { line: 2, .. }));
    }

    #[test]
    fn test_file_values_override_process_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "HOST=db.internal\nPASSWORD=\"s3cret\"").unwrap();

        let mut env = EnvManager::from_vars([("HOST", "localhost"), ("PORT", "5433")]);
        env.load_from_file(file.path()).unwrap();

        assert_eq!(env.get("HOST"), Some("db.internal"));
        assert_eq!(env.get("PORT"), Some("5433"));
        assert_eq!(env.get("PASSWORD"), Some("s3cret"));
    }

    #[test]
    fn test_first_of_file_ignores_process_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DATABASE=metrics").unwrap();

        let mut env = EnvManager::from_vars([("USER", "root"), ("HOST", "laptop")]);
        env.load_from_file(file.path()).unwrap();

        assert_eq!(env.first_of_file(&["USER", "HOST"]), None);
        assert_eq!(env.first_of_file(&["DATABASE"]), Some(("DATABASE", "metrics")));
        assert_eq!(env.first_of(&["USER"]), Some(("USER", "root")));
    }

    #[test]
    fn test_missing_env_file() {
        let mut env = empty();
        let err = env.load_from_file("/definitely/not/here.env").unwrap_err();
        assert!(matches!(err, SettingsError::EnvFile { .. }));
    }

    #[test]
    fn test_first_of_skips_blank_values() {
        let env = EnvManager::from_vars([("DB_HOST", "  "), ("HOST", "fallback")]);
        assert_eq!(env.first_of(&["DB_HOST", "HOST"]), Some(("HOST", "fallback")));
        assert_eq!(env.first_of(&["NOPE"]), None);
    }
}
