use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TripError {
    #[error("trip has no GPS samples")]
    EmptyTrack,

    #[error("GPS timestamps must be strictly ascending (violated at sample {index})")]
    NonMonotonicTimestamp { index: usize },

    #[error("cumulative distances ({distances}) must match sample count ({samples})")]
    DistanceLengthMismatch { samples: usize, distances: usize },

    #[error("cumulative distances must be non-decreasing (violated at index {index})")]
    DecreasingDistance { index: usize },

    #[error("events must be sorted by start time (violated at event {index})")]
    UnsortedEvents { index: usize },

    #[error("event {id:?} ends before it starts")]
    EventEndsBeforeStart { id: String },
}

pub type TripResult<T> = Result<T, TripError>;
