use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("engine requires at least one route")]
    NoRoutes,

    #[error("route {name:?} needs at least 2 waypoints")]
    RouteTooShort { name: String },

    #[error("route {name:?}: base speed must be > 0")]
    InvalidSpeed { name: String },

    #[error("route {name:?}: stop {index} lies outside the route polyline")]
    StopOutOfRange { name: String, index: usize },

    #[error("route {name:?}: stop offsets must be non-decreasing (violated at stop {index})")]
    UnorderedStops { name: String, index: usize },

    #[error("vehicle {0} does not exist")]
    UnknownVehicle(rp_core::VehicleId),
}

pub type SimResult<T> = Result<T, SimError>;
