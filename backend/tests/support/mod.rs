use std::sync::Mutex;

/// Serializes every test that touches the repository selection variables
/// (`DATABASE_URL`, `REPOSITORY_TYPE`, `PG_*`).
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with the given environment variables set (`Some`) or removed
/// (`None`), restoring the previous values afterwards, also on panic.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // A panicking test poisons the lock but has already restored its vars.
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = EnvRestore::apply(changes);
    f()
}

struct EnvRestore {
    previous: Vec<(String, Option<String>)>,
}

impl EnvRestore {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let mut previous: Vec<(String, Option<String>)> = Vec::with_capacity(changes.len());

        for (key, value) in changes {
            if !previous.iter().any(|(k, _)| k == key) {
                previous.push((key.to_string(), std::env::var(key).ok()));
            }
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }

        Self { previous }
    }
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..).rev() {
            match value {
                Some(value) => std::env::set_var(&key, value),
                None => std::env::remove_var(&key),
            }
        }
    }
}
