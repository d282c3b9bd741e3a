use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Env, Target};

pub const LOG_ENV: &str = "MILESTONE_QUIZ_LOG";

/// Route `log` output to `path`. The terminal belongs to the UI, so nothing
/// is written to stderr once this succeeds. `MILESTONE_QUIZ_LOG` overrides
/// `default_level`.
pub fn init(path: &Path, default_level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    env_logger::Builder::from_env(Env::new().filter_or(LOG_ENV, default_level))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .try_init()
        .context("logger already initialised")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_file_in_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("quiz.log");
        // A second init in the same test binary fails on the global logger;
        // the file is still created first.
        let _ = init(&path, "debug");
        assert!(path.exists());
    }
}
