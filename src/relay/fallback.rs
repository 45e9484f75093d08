// src/relay/fallback.rs
// Ordered candidate traversal with per-attempt outcomes

use tracing::{info, warn};

use crate::error::{RelayError, Result};
use crate::llm::Generation;

/// Reply used when the API withholds an answer for safety reasons
pub const SAFETY_APOLOGY: &str =
    "Sorry, I can't help with that one. Feel free to ask me something else about my work!";

/// What a single candidate attempt means for the loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Text produced; stop and return it
    Success(String),
    /// Model produced no text; try the next one
    Empty(String),
    /// Model unknown or unsupported; try the next one
    SkipAndContinue(String),
    /// Stop and return substitute text (safety block)
    TerminalSubstitute(String),
    /// Any other failure; stop and report
    Fatal(String),
}

impl AttemptOutcome {
    /// Classify the result of one generate call for `model`
    pub fn classify(model: &str, result: Result<Generation>) -> Self {
        match result {
            Ok(Generation::Text(text)) => AttemptOutcome::Success(text),
            Ok(Generation::Empty) => AttemptOutcome::Empty(format!("{model}: empty response")),
            Ok(Generation::Blocked { reason }) => {
                info!(model = %model, reason = %reason, "Reply withheld by safety filters");
                AttemptOutcome::TerminalSubstitute(SAFETY_APOLOGY.to_string())
            }
            Err(err) => {
                let code = err.status().map(|s| s.to_string()).unwrap_or_default();
                let note = if code.is_empty() {
                    format!("{model}: {err}")
                } else {
                    format!("{model}: {code} {err}")
                };
                if err.is_model_unavailable() {
                    AttemptOutcome::SkipAndContinue(note)
                } else {
                    AttemptOutcome::Fatal(note)
                }
            }
        }
    }
}

/// Outcome of a full sweep over the candidate list
#[derive(Debug, Default)]
pub struct Sweep {
    /// Models actually called, in order
    pub attempted: Vec<String>,
    /// One note per failed attempt
    pub failures: Vec<String>,
    /// Attempts that completed without any text
    empty: usize,
}

impl Sweep {
    /// Record an attempt; returns the reply if the loop should stop with one,
    /// `Err` if it should stop with an error, `Ok(None)` to keep going.
    pub fn record(&mut self, model: &str, outcome: AttemptOutcome) -> Result<Option<String>> {
        self.attempted.push(model.to_string());
        match outcome {
            AttemptOutcome::Success(text) | AttemptOutcome::TerminalSubstitute(text) => Ok(Some(text)),
            AttemptOutcome::Empty(note) => {
                self.empty += 1;
                warn!(model = %model, note = %note, "Candidate returned no text");
                self.failures.push(note);
                Ok(None)
            }
            AttemptOutcome::SkipAndContinue(note) => {
                warn!(model = %model, note = %note, "Candidate skipped");
                self.failures.push(note);
                Ok(None)
            }
            AttemptOutcome::Fatal(note) => {
                warn!(model = %model, note = %note, "Candidate failed; stopping fallback");
                self.failures.push(note);
                Err(self.aggregate())
            }
        }
    }

    /// Error for a sweep that ended without text
    pub fn into_error(self) -> RelayError {
        self.aggregate()
    }

    fn aggregate(&self) -> RelayError {
        if self.empty > 0 && self.empty == self.failures.len() {
            RelayError::EmptyReply {
                tried: self.attempted.clone(),
            }
        } else {
            RelayError::Exhausted {
                tried: self.attempted.clone(),
                failures: self.failures.clone(),
            }
        }
    }
}
