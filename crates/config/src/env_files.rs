//! `.env` file loading
//!
//! Populates the process environment before a schema is resolved: first
//! `<dir>/.env`, then `<dir>/.env.<name>` where `<name>` is the value of the
//! environment-name variable (`NODE_ENV` unless configured otherwise). The
//! base file never overrides variables that are already set; the
//! environment-specific file overrides everything.

use envschema_types::EnvFileError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Variable holding the environment name used to pick the override file
pub const DEFAULT_ENV_NAME_VAR: &str = "NODE_ENV";

/// Layered `.env` loader
#[derive(Debug, Clone)]
pub struct EnvFiles {
    dir: PathBuf,
    env_name_var: String,
}

impl Default for EnvFiles {
    fn default() -> Self {
        Self::new(".")
    }
}

impl EnvFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            env_name_var: DEFAULT_ENV_NAME_VAR.to_string(),
        }
    }

    pub fn env_name_var(mut self, var: impl Into<String>) -> Self {
        self.env_name_var = var.into();
        self
    }

    pub fn base_path(&self) -> PathBuf {
        self.dir.join(".env")
    }

    pub fn override_path(&self, env_name: &str) -> PathBuf {
        self.dir.join(format!(".env.{}", env_name))
    }

    /// Load both layers into the process environment.
    ///
    /// Missing files are skipped. Returns the files that were applied.
    pub fn load(&self) -> Result<Vec<PathBuf>, EnvFileError> {
        let mut loaded = Vec::new();

        let base = self.base_path();
        if apply_file(&base, false)? {
            loaded.push(base);
        }

        // Read after the base layer so `.env` may set the environment name.
        match std::env::var(&self.env_name_var) {
            Ok(name) if !name.is_empty() => {
                let path = self.override_path(&name);
                if apply_file(&path, true)? {
                    loaded.push(path);
                }
            }
            _ => {
                debug!(var = %self.env_name_var, "environment name not set, skipping override file");
            }
        }

        Ok(loaded)
    }
}

/// Load `./.env` and `./.env.$NODE_ENV` into the process environment
pub fn dotenvize() -> Result<Vec<PathBuf>, EnvFileError> {
    EnvFiles::default().load()
}

fn apply_file(path: &Path, override_existing: bool) -> Result<bool, EnvFileError> {
    let iter = match dotenv::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => {
            debug!(path = %path.display(), "env file not found, skipping");
            return Ok(false);
        }
        Err(e) => {
            return Err(EnvFileError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    };

    // Parse the whole file first so a bad line leaves the environment untouched.
    let mut vars = Vec::new();
    for item in iter {
        let (key, value) = item.map_err(|e| EnvFileError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        vars.push((key, value));
    }

    let mut applied = 0;
    for (key, value) in vars {
        if override_existing || std::env::var_os(&key).is_none() {
            std::env::set_var(&key, value);
            applied += 1;
        }
    }

    info!(path = %path.display(), applied, override_existing, "loaded env file");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_paths() {
        let files = EnvFiles::new("/srv/app");
        assert_eq!(files.base_path(), PathBuf::from("/srv/app/.env"));
        assert_eq!(
            files.override_path("production"),
            PathBuf::from("/srv/app/.env.production")
        );
    }

    #[test]
    fn test_override_file_wins_on_conflicts() {
        let dir = TempDir::new().unwrap();
        write(&dir, ".env", "ENVSCHEMA_EF1_A=base\nENVSCHEMA_EF1_B=base\n");
        write(&dir, ".env.staging", "ENVSCHEMA_EF1_B=staging\n");

        temp_env::with_vars(
            vec![
                ("ENVSCHEMA_EF1_STAGE", Some("staging")),
                ("ENVSCHEMA_EF1_A", None),
                ("ENVSCHEMA_EF1_B", None),
            ],
            || {
                let loaded = EnvFiles::new(dir.path())
                    .env_name_var("ENVSCHEMA_EF1_STAGE")
                    .load()
                    .unwrap();
                assert_eq!(loaded.len(), 2);
                assert_eq!(std::env::var("ENVSCHEMA_EF1_A").unwrap(), "base");
                assert_eq!(std::env::var("ENVSCHEMA_EF1_B").unwrap(), "staging");
            },
        );
    }

    #[test]
    fn test_base_file_does_not_override_process_env() {
        let dir = TempDir::new().unwrap();
        write(&dir, ".env", "ENVSCHEMA_EF2_A=from_file\n");

        temp_env::with_vars(
            vec![
                ("ENVSCHEMA_EF2_A", Some("from_process")),
                ("ENVSCHEMA_EF2_STAGE", None),
            ],
            || {
                let loaded = EnvFiles::new(dir.path())
                    .env_name_var("ENVSCHEMA_EF2_STAGE")
                    .load()
                    .unwrap();
                assert_eq!(loaded, vec![dir.path().join(".env")]);
                assert_eq!(std::env::var("ENVSCHEMA_EF2_A").unwrap(), "from_process");
            },
        );
    }

    #[test]
    fn test_override_file_overrides_process_env() {
        let dir = TempDir::new().unwrap();
        write(&dir, ".env.test", "ENVSCHEMA_EF3_A=from_override\n");

        temp_env::with_vars(
            vec![
                ("ENVSCHEMA_EF3_A", Some("from_process")),
                ("ENVSCHEMA_EF3_STAGE", Some("test")),
            ],
            || {
                let loaded = EnvFiles::new(dir.path())
                    .env_name_var("ENVSCHEMA_EF3_STAGE")
                    .load()
                    .unwrap();
                assert_eq!(loaded, vec![dir.path().join(".env.test")]);
                assert_eq!(std::env::var("ENVSCHEMA_EF3_A").unwrap(), "from_override");
            },
        );
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        temp_env::with_var("ENVSCHEMA_EF4_STAGE", Some("nowhere"), || {
            let loaded = EnvFiles::new(dir.path())
                .env_name_var("ENVSCHEMA_EF4_STAGE")
                .load()
                .unwrap();
            assert!(loaded.is_empty());
        });
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, ".env", "ENVSCHEMA_EF5_A=ok\n-BAD=value\n");

        temp_env::with_vars(
            vec![
                ("ENVSCHEMA_EF5_A", None::<&str>),
                ("ENVSCHEMA_EF5_STAGE", None),
            ],
            || {
                let result = EnvFiles::new(dir.path())
                    .env_name_var("ENVSCHEMA_EF5_STAGE")
                    .load();
                assert!(matches!(result, Err(EnvFileError::Parse { .. })));
                assert!(std::env::var("ENVSCHEMA_EF5_A").is_err());
            },
        );
    }
}
