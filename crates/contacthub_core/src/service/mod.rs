//! Core use-case services.
//!
//! # Responsibility
//! - Own the mutable contact and group collections.
//! - Keep presentation layers decoupled from storage and CSV details.

pub mod contact_store;

/// Yes/no confirmation supplied by the presentation layer for destructive
/// actions.
pub trait ConfirmPrompt {
    /// Returns `true` only when the user explicitly confirmed.
    fn confirm(&self, message: &str) -> bool;
}

/// Prompt that always answers with a fixed value (`--yes` flags, tests).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl ConfirmPrompt for FixedAnswer {
    fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}
