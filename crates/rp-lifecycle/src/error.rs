use thiserror::Error;

use crate::RuntimeState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// The requested transition is absent from the static transition table.
    #[error("invalid lifecycle transition {from} -> {to}")]
    InvalidTransition {
        from: RuntimeState,
        to: RuntimeState,
    },
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
