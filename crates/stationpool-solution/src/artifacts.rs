use serde::{Deserialize, Serialize};

/// One row per built station (spec §6 "Station selection").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationSelectionRow {
    pub station_index: usize,
    pub station_id: i64,
    pub selected: bool,
    pub value: f64,
}

/// One row per activated station in a scenario (spec §6 "Scenario activation").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioActivationRow {
    pub station_index: usize,
    pub station_id: i64,
    pub scenario_index: usize,
    pub scenario_label: String,
    pub value: f64,
}

/// One row per chosen assignment (spec §6 "Assignment"). `time_id` is
/// `None` for the aggregated/corridor/transportation variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignmentRow {
    pub scenario_index: usize,
    pub time_id: Option<i64>,
    pub origin_id: i64,
    pub dest_id: i64,
    pub pickup_index: usize,
    pub dropoff_index: usize,
    pub pickup_id: i64,
    pub dropoff_id: i64,
    pub value: f64,
}

/// One row per used vehicle leg in the pooling variant (spec §6 "Flow").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowRow {
    pub scenario_index: usize,
    pub time_id: i64,
    pub j_index: usize,
    pub k_index: usize,
    pub j_id: i64,
    pub k_id: i64,
    pub value: f64,
}

/// One row per used same-source detour (spec §6 "Same-source pooling").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SameSourcePoolingRow {
    pub scenario_index: usize,
    pub time_id: i64,
    pub triple_index: usize,
    pub j_id: i64,
    pub k_id: i64,
    pub l_id: i64,
    pub value: f64,
}

/// One row per used same-destination detour (spec §6 "Same-dest pooling").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SameDestPoolingRow {
    pub scenario_index: usize,
    pub time_id: i64,
    pub quadruple_index: usize,
    pub j_id: i64,
    pub k_id: i64,
    pub l_id: i64,
    pub time_delta: i64,
    pub value: f64,
}

/// One row per used corridor (spec §6 "Corridor usage").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorridorUsageRow {
    pub cluster_a: usize,
    pub cluster_b: usize,
    pub scenario_index: usize,
    pub value: f64,
}

/// One row per transportation-anchor activation/flow/aggregation variable
/// (spec §6 "Anchor activation / flow / aggregation").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnchorRow {
    pub scenario_index: usize,
    pub cluster_a: usize,
    pub cluster_b: usize,
    pub family: String,
    pub j_index: Option<usize>,
    pub k_index: Option<usize>,
    pub value: f64,
}
