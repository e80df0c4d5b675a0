//! Environment lookup used when configuring and spawning the external tools.
//!
//! The resolvers never read `std::env` directly. They go through an
//! [`Environment`] so callers and tests control exactly what the `go` and
//! `git` children see.

use std::collections::BTreeMap;

pub trait Environment: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;

    /// Full set of variables handed to child processes.
    fn vars(&self) -> Vec<(String, String)>;
}

/// The real environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars().collect()
    }
}

/// A fixed set of variables. Anything not listed is unset.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    vars: BTreeMap<String, String>,
}

impl StaticEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment that can then be edited.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) {
        self.vars.remove(key);
    }
}

impl<K, V> FromIterator<(K, V)> for StaticEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_env_lookup() {
        let env = StaticEnv::new().with_var("PATH", "/bogus");
        assert_eq!(env.var("PATH").as_deref(), Some("/bogus"));
        assert_eq!(env.var("HOME"), None);
    }

    #[test]
    fn test_static_env_from_iter() {
        let env: StaticEnv = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(
            env.vars(),
            vec![
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_static_env_remove() {
        let mut env = StaticEnv::new().with_var("GOFLAGS", "-mod=vendor");
        env.remove("GOFLAGS");
        assert!(env.vars().is_empty());
    }
}
