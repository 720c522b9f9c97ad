//! Environment variable sources
//!
//! The resolver never touches `std::env` directly; it reads through an
//! [`EnvSource`] so tests and embedders can supply their own variables.

use std::collections::HashMap;

/// Read-only lookup from variable name to value
pub trait EnvSource {
    /// Returns `None` if the variable is not set
    fn var(&self, key: &str) -> Option<String>;
}

impl<S: EnvSource + ?Sized> EnvSource for &S {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

/// The real process environment.
///
/// Values that are not valid unicode are decoded lossily, so a set variable
/// is never mistaken for an unset one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }
}

/// In-memory variable set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current process environment
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_env_lookup() {
        let mut env = MapEnv::new().with("A", "1").with("B", "");
        assert_eq!(env.var("A").as_deref(), Some("1"));
        assert_eq!(env.var("B").as_deref(), Some(""));
        assert_eq!(env.var("C"), None);

        env.set("A", "2");
        assert_eq!(env.var("A").as_deref(), Some("2"));
        assert_eq!(env.remove("A").as_deref(), Some("2"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_map_env_from_iter() {
        let env: MapEnv = [("HOST", "localhost"), ("PORT", "8080")].into_iter().collect();
        assert_eq!(env.var("PORT").as_deref(), Some("8080"));
        assert!(!env.is_empty());
    }

    #[test]
    fn test_process_env_reads_real_variables() {
        temp_env::with_var("ENVSCHEMA_PROCESS_ENV_TEST", Some("value"), || {
            assert_eq!(
                ProcessEnv.var("ENVSCHEMA_PROCESS_ENV_TEST").as_deref(),
                Some("value")
            );
        });
        temp_env::with_var_unset("ENVSCHEMA_PROCESS_ENV_TEST", || {
            assert_eq!(ProcessEnv.var("ENVSCHEMA_PROCESS_ENV_TEST"), None);
        });
    }

    #[cfg(unix)]
    #[test]
    fn test_process_env_keeps_non_unicode_values() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"a\xffb");
        temp_env::with_var("ENVSCHEMA_NON_UNICODE_TEST", Some(raw), || {
            assert_eq!(
                ProcessEnv.var("ENVSCHEMA_NON_UNICODE_TEST").as_deref(),
                Some("a\u{FFFD}b")
            );

            let schema = crate::Schema::normalize(
                crate::RawSchema::new()
                    .field("token", crate::string("ENVSCHEMA_NON_UNICODE_TEST")),
            );
            let config = crate::resolve(&schema, &ProcessEnv).unwrap();
            assert_eq!(config.get_str("token"), Some("a\u{FFFD}b"));
        });
    }

    #[test]
    fn test_reference_is_a_source() {
        fn read<E: EnvSource>(env: E) -> Option<String> {
            env.var("K")
        }
        let env = MapEnv::new().with("K", "v");
        assert_eq!(read(&env).as_deref(), Some("v"));
    }
}
