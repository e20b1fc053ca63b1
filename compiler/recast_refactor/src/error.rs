//! Engine errors.
//!
//! A pattern that is not present is not an error: orchestrators return
//! `Ok(None)`. These variants are for defects and misuse.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RefactorError {
    /// Pattern pre-filtering and rewriting disagree about what is valid.
    #[error("refactoring invariant violated: {0}")]
    Invariant(String),

    /// The action was computed for another version of the tree.
    #[error("`{title}` was computed for a different version of the tree")]
    StaleTree { title: String },
}

impl RefactorError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        RefactorError::Invariant(message.into())
    }
}

pub type RefactorResult<T> = Result<T, RefactorError>;
