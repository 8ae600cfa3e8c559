use std::fmt;

use framescope_core::{AnalysisError, SourceError};

/// Failure reported to the user as `error:` plus an optional `hint:` line.
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub hint: Option<&'static str>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
        }
    }

    pub fn hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"))
    }
}

impl From<AnalysisError> for CliError {
    fn from(err: AnalysisError) -> Self {
        let hint = match &err {
            AnalysisError::Source(SourceError::Format(_)) => {
                "input must be a pcap or pcapng capture"
            }
            AnalysisError::Io(_) | AnalysisError::Source(SourceError::Io(_)) => {
                "check that the input file is readable"
            }
        };
        CliError::new(format!("capture analysis failed: {err}")).hint(hint)
    }
}
