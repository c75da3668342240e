use crate::error::{Error, Result};

/// Shared first-stage/activation parameters common to every variant
/// (spec §4.6).
///
/// `station_count_exact` has deliberately no `Default` impl: whether the
/// build-count constraint is `= L` or `≤ L` must be stated explicitly by
/// the caller (spec §9 open question).
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub station_count_limit: u32,
    pub station_count_exact: bool,
    pub activation_count: u32,
    pub tight_activation_linking: bool,
}

impl BuildConfig {
    pub fn new(
        station_count_limit: u32,
        station_count_exact: bool,
        activation_count: u32,
    ) -> Result<Self> {
        if activation_count < 1 {
            return Err(Error::InvalidParameter("K must be >= 1".into()));
        }
        if station_count_limit < activation_count {
            return Err(Error::InvalidParameter("L must be >= K".into()));
        }
        Ok(Self {
            station_count_limit,
            station_count_exact,
            activation_count,
            tight_activation_linking: true,
        })
    }

    pub fn with_tight_activation_linking(mut self, tight: bool) -> Self {
        self.tight_activation_linking = tight;
        self
    }
}

/// Objective weights shared by the variants that reference in-vehicle
/// and vehicle-routing cost (spec §4.6.1/§4.6.3/§4.6.4).
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveWeights {
    /// `α`, the in-vehicle-time weight applied to assignment routing cost.
    pub in_vehicle_time_weight: f64,
    /// `γ`, the vehicle-routing weight applied to flow/pooling cost.
    pub vehicle_routing_weight: f64,
    /// `corridor_weight`, applied to corridor usage cost.
    pub corridor_weight: f64,
    /// `activation_cost`, the fixed cost of activating a transportation anchor.
    pub anchor_activation_cost: f64,
}

impl ObjectiveWeights {
    pub fn new(
        in_vehicle_time_weight: f64,
        vehicle_routing_weight: f64,
        corridor_weight: f64,
        anchor_activation_cost: f64,
    ) -> Result<Self> {
        if in_vehicle_time_weight < 0.0
            || vehicle_routing_weight < 0.0
            || corridor_weight < 0.0
            || anchor_activation_cost < 0.0
        {
            return Err(Error::InvalidParameter(
                "objective weights must be non-negative".into(),
            ));
        }
        Ok(Self {
            in_vehicle_time_weight,
            vehicle_routing_weight,
            corridor_weight,
            anchor_activation_cost,
        })
    }
}

/// Parameters for the pooling/time-bucketed variant (spec §4.2/§4.3).
/// `detour_tolerance` is the `Δ` routing-delay bound used by the
/// same-source/same-destination admission test.
#[derive(Debug, Clone, Copy)]
pub struct PoolingConfig {
    pub time_window_sec: i64,
    pub walking_limit: Option<f64>,
    pub detour_tolerance: f64,
}

impl PoolingConfig {
    pub fn new(
        time_window_sec: i64,
        walking_limit: Option<f64>,
        detour_tolerance: f64,
    ) -> Result<Self> {
        if time_window_sec <= 0 {
            return Err(Error::InvalidParameter(
                "time_window_sec must be positive".into(),
            ));
        }
        if let Some(limit) = walking_limit {
            if limit < 0.0 {
                return Err(Error::InvalidParameter(
                    "walking_limit must be non-negative".into(),
                ));
            }
        }
        if detour_tolerance < 0.0 {
            return Err(Error::InvalidParameter(
                "detour_tolerance must be non-negative".into(),
            ));
        }
        Ok(Self {
            time_window_sec,
            walking_limit,
            detour_tolerance,
        })
    }
}
