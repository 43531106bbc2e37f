use std::{
    collections::HashMap,
    env,
    ffi::{OsStr, OsString},
    mem,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Serializes tests that touch process-wide environment variables.
pub struct EnvMutex(Mutex<()>);

impl Default for EnvMutex {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvMutex {
    /// Creates a new mutex. Tests reading the same variables (e.g. every test that
    /// loads `OPENAI_*`) must share one mutex.
    pub const fn new() -> Self {
        Self(Mutex::new(()))
    }

    pub fn lock(&self) -> EnvMutexGuard<'_> {
        let guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        EnvMutexGuard {
            _inner: guard,
            redefined_vars: HashMap::new(),
        }
    }
}

/// Guard provided by [`EnvMutex`] that allows mutating env variables. All changes are rolled back
/// when the guard is dropped.
#[must_use = "Environment will be reset when the guard is dropped"]
#[derive(Debug)]
pub struct EnvMutexGuard<'a> {
    _inner: MutexGuard<'a, ()>,
    redefined_vars: HashMap<OsString, Option<OsString>>,
}

impl Drop for EnvMutexGuard<'_> {
    fn drop(&mut self) {
        for (env_name, value) in mem::take(&mut self.redefined_vars) {
            match value {
                Some(value) => env::set_var(env_name, value),
                None => env::remove_var(env_name),
            }
        }
    }
}

impl EnvMutexGuard<'_> {
    /// Sets env vars specified in `.env`-like format. Lines starting with `#` are ignored.
    pub fn set_env(&mut self, fixture: &str) {
        for line in fixture.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (variable_name, variable_value) = line.split_once('=').unwrap_or_else(|| {
                panic!("Incorrect line for setting environment variable: {line}");
            });
            let variable_value: &OsStr = variable_value.trim_matches('"').as_ref();
            self.remember(variable_name.as_ref());
            env::set_var(variable_name, variable_value);
        }
    }

    /// Unsets the given variables until the guard is dropped.
    pub fn remove_env(&mut self, names: &[&str]) {
        for name in names {
            self.remember(name.as_ref());
            env::remove_var(name);
        }
    }

    fn remember(&mut self, name: &OsStr) {
        if !self.redefined_vars.contains_key(name) {
            self.redefined_vars
                .insert(name.to_os_string(), env::var_os(name));
        }
    }
}
