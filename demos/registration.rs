//! Registration form demo.
//!
//! Renders on stderr and prints the submitted record to stdout as JSON, so
//! `cargo run --example registration > user.json` captures just the data.
//!
//! Pass a different `.toml` or `.json` form description as the first
//! argument to run that instead. Set `STEPFORM_LOG=debug` for a verbose log
//! in the system temp directory.

use std::path::PathBuf;

use stepform::{Outcome, OutputTarget, ProgramOptions};

const DEFAULT_SCHEMA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/registration.toml");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA));

    let options = ProgramOptions {
        output: OutputTarget::Stderr,
        log_file: Some(std::env::temp_dir().join("stepform-registration.log")),
        ..ProgramOptions::default()
    };

    match stepform::run_file(&path, options)? {
        Outcome::Submitted(state) => {
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Outcome::Cancelled => eprintln!("Registration cancelled."),
    }
    Ok(())
}
