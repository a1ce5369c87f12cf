//! Maps operation outcomes to how loudly the user should be told.
//!
//! Every remote call goes through [`EscalationPolicy::classify`], so the same
//! failure always surfaces the same way regardless of which screen caused it.

use serde::Serialize;
use tracing::warn;

use crate::backend::SearchMode;
use crate::error_handler::IfuEngineError;

/// Fixed advice attached to every blocking escalation.
pub const BLOCKING_SUGGESTION: &str = "Please try again later or consult the help guide.";

/// Which user-visible operation produced the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Scan,
    Resolve,
    Search(SearchMode),
    VoteFetch,
    VoteSubmit,
    Chat,
    Health,
}

/// What happened.
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    /// Request succeeded but carried nothing to show.
    Empty,
    Failed(&'a IfuEngineError),
}

/// User-facing severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum Escalation {
    /// Logged only.
    Silent,
    /// Short-lived notice.
    Transient { message: String },
    /// Modal dialog with a path to help.
    Blocking {
        detail: String,
        suggestion: String,
        help_ref: String,
        suggest_help: bool,
    },
}

#[derive(Debug, Clone)]
pub struct EscalationPolicy {
    help_ref: String,
}

impl EscalationPolicy {
    pub fn new(help_ref: impl Into<String>) -> Self {
        Self {
            help_ref: help_ref.into(),
        }
    }

    pub fn help_ref(&self) -> &str {
        &self.help_ref
    }

    pub fn classify(&self, op: Operation, outcome: Outcome<'_>) -> Escalation {
        let err = match outcome {
            Outcome::Empty => return transient(empty_message(op)),
            Outcome::Failed(err) => err,
        };

        if op == Operation::VoteFetch {
            warn!(error = %err, "vote tally unavailable");
            return Escalation::Silent;
        }

        match err {
            IfuEngineError::Transport { message, timed_out }
                if *timed_out || message.to_ascii_lowercase().contains("timeout") =>
            {
                self.blocking("request timed out")
            }
            IfuEngineError::Transport { message, .. } => {
                let message = message.trim();
                self.blocking(if message.is_empty() {
                    "network error"
                } else {
                    message
                })
            }
            IfuEngineError::Http { detail, .. } => self.blocking(detail),
            IfuEngineError::Decode(_) => self.blocking("invalid response from server"),
            IfuEngineError::NotFound { .. } => transient("no matching IFU found"),
            IfuEngineError::EmptyKeyword => transient("Please enter a keyword"),
            IfuEngineError::EmptyPrompt => transient("Please enter a question"),
            IfuEngineError::EmptyPayload => transient("Scanned code is empty, please scan again"),
            IfuEngineError::BusyRejected => Escalation::Silent,
            IfuEngineError::Config(e) => Escalation::Blocking {
                detail: e.to_string(),
                suggestion: BLOCKING_SUGGESTION.to_string(),
                help_ref: self.help_ref.clone(),
                suggest_help: false,
            },
        }
    }

    /// Shorthand for `classify(op, Outcome::Failed(err))`.
    pub fn classify_error(&self, op: Operation, err: &IfuEngineError) -> Escalation {
        self.classify(op, Outcome::Failed(err))
    }

    fn blocking(&self, detail: &str) -> Escalation {
        Escalation::Blocking {
            detail: detail.to_string(),
            suggestion: BLOCKING_SUGGESTION.to_string(),
            help_ref: self.help_ref.clone(),
            suggest_help: true,
        }
    }
}

fn transient(message: &str) -> Escalation {
    Escalation::Transient {
        message: message.to_string(),
    }
}

fn empty_message(op: Operation) -> &'static str {
    match op {
        Operation::Search(mode) => mode.empty_message(),
        Operation::Chat => SearchMode::Ask.empty_message(),
        Operation::Scan | Operation::Resolve => "no matching IFU found",
        Operation::VoteFetch | Operation::VoteSubmit | Operation::Health => "Nothing to show",
    }
}
