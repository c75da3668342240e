use thiserror::Error;

/// Errors produced by the problem-data layer and propagated upward by
/// every other crate in the workspace.
///
/// Propagation policy (see spec §7): parameter validation errors surface
/// immediately from a constructor; missing-cost and routing-unavailable
/// errors surface from the first accessor that needs them; solver errors
/// surface from `solve` (defined in `stationpool-model`, which wraps this
/// enum in its own `Error::Core` variant).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("missing cost for pair ({from}, {to}) in {matrix}")]
    MissingCost {
        matrix: &'static str,
        from: i64,
        to: i64,
    },

    #[error("routing cost matrix unavailable, required by {operation}")]
    RoutingUnavailable { operation: &'static str },

    #[error("malformed request: {reason}")]
    MalformedRequest { reason: String },

    #[error("scenario {label:?} has no start time, required by the time-bucketed variant")]
    ScenarioStartRequired { label: String },
}

pub type Result<T> = std::result::Result<T, Error>;
