//! File logging for interactive sessions.
//!
//! The form owns the terminal while it runs, so log output goes to a file.
//! The filter is read from `STEPFORM_LOG` (same syntax as `RUST_LOG`) and
//! defaults to `info`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::runtime::ProgramError;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "STEPFORM_LOG";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Install a global subscriber appending to `path`.
///
/// Only the first call installs anything; later calls return `Ok(())`.
pub fn init(path: impl AsRef<Path>) -> Result<(), ProgramError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| ProgramError::Logging(e.to_string()))?;

    let _ = INSTALLED.set(());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        let dir = std::env::temp_dir().join(format!("stepform-log-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("form.log");

        init(&path).unwrap();
        init(&path).unwrap();
        tracing::info!("logged");
        assert!(path.exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}
