use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PlaybackError {
    /// Speed multipliers must be finite and strictly positive.
    #[error("invalid playback speed {0}")]
    InvalidSpeed(f64),
}

pub type PlaybackResult<T> = Result<T, PlaybackError>;
