//! Confirmation gate in front of the delete pass.
//!
//! Deletion never starts without an explicit `yes` typed by the operator.
//! There is no force flag, no timeout and no default answer; skipping the
//! scan with `--no` does not skip this gate.

#[cfg(test)]
mod safety_properties;

use crate::types::ScanTarget;
use crate::types::error::S3rError;
use anyhow::{Result, anyhow};
use std::io::{BufRead, Write};
use tracing::debug;

pub const CONFIRM_TOKEN: &str = "yes";
pub const DECLINE_TOKEN: &str = "no";

const CONFIRM_QUESTION: &str = "Are you sure you want to delete all of these objects? [yes/no]: ";
const RETRY_PROMPT: &str = "Please enter \"yes\" to confirm or \"no\" to cancel: ";

// ---------------------------------------------------------------------------
// PromptHandler trait (for testability)
// ---------------------------------------------------------------------------

/// Source of operator answers.
///
/// The default implementation ([`StdioPromptHandler`]) uses stdin/stdout.
/// Tests can provide custom implementations to avoid blocking on user input.
pub trait PromptHandler: Send + Sync {
    /// Display `prompt` and read one line of input.
    ///
    /// Returns `Ok(None)` at end of input.
    fn read_confirmation(&self, prompt: &str) -> Result<Option<String>>;
}

/// Default prompt handler using stdin/stdout.
///
/// Prompts go to stdout with `print!`, not through tracing.
pub struct StdioPromptHandler;

impl PromptHandler for StdioPromptHandler {
    fn read_confirmation(&self, prompt: &str) -> Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;

        let mut input = String::new();
        let read = std::io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(input))
    }
}

// ---------------------------------------------------------------------------
// ConfirmationGate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Prompting,
    Confirmed,
    Declined,
}

impl GateState {
    pub fn is_terminal(&self) -> bool {
        *self != GateState::Prompting
    }
}

/// Three-state gate: `Prompting` until a line starts with exactly `yes` or `no`.
///
/// Matching is case-sensitive and uses only the first whitespace-delimited
/// token of a line. Once terminal, further input is ignored.
#[derive(Debug)]
pub struct ConfirmationGate {
    state: GateState,
}

impl Default for ConfirmationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Prompting,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Consume one line of input.
    pub fn feed(&mut self, line: &str) -> GateState {
        if self.state.is_terminal() {
            return self.state;
        }

        self.state = match line.split_whitespace().next() {
            Some(CONFIRM_TOKEN) => GateState::Confirmed,
            Some(DECLINE_TOKEN) => GateState::Declined,
            _ => GateState::Prompting,
        };
        self.state
    }

    /// Prompt until the gate reaches a terminal state.
    ///
    /// # Returns
    ///
    /// - `Ok(GateState::Confirmed)` or `Ok(GateState::Declined)`
    /// - `Err(S3rError::Input)` if the input stream fails or ends first
    pub fn run(&mut self, handler: &dyn PromptHandler, target: &ScanTarget) -> Result<GateState> {
        let mut prompt = format!("Path: \"{target}\"\n{CONFIRM_QUESTION}");

        while !self.state.is_terminal() {
            let line = match handler.read_confirmation(&prompt) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    return Err(anyhow!(S3rError::Input(
                        "end of input before confirmation".to_string()
                    )));
                }
                Err(e) => return Err(e.context(S3rError::Input(target.to_string()))),
            };

            if self.feed(&line) == GateState::Prompting {
                debug!(input = line.trim(), "unrecognized confirmation input.");
            }
            prompt = RETRY_PROMPT.to_string();
        }

        Ok(self.state)
    }
}
