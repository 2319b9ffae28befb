//! Command implementations behind the three binaries

mod compare;
mod parse;
mod search;


use std::process::ExitCode;

pub use compare::CompareArgs;
pub use parse::ParseArgs;
pub use search::SearchArgs;

/// How a successful command run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Differences were found and the caller asked to fail on them
    DifferencesFound,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::DifferencesFound => ExitCode::from(1),
        }
    }
}
