use crate::models::{PipelineSnapshot, VolumeThreshold};
use crate::scheduler::SchedulerState;
use serde::{Deserialize, Serialize};

/// Response for GET /snapshot
#[derive(Serialize)]
pub struct SnapshotResponse {
    #[serde(flatten)]
    pub snapshot: PipelineSnapshot,
    pub count: usize,
    pub state: SchedulerState,
    pub title: String,
}

/// One selectable option in GET /thresholds
#[derive(Serialize)]
pub struct ThresholdOption {
    pub value: VolumeThreshold,
    pub usd: f64,
    pub selected: bool,
}

/// Response for GET /thresholds
#[derive(Serialize)]
pub struct ThresholdsResponse {
    pub current: VolumeThreshold,
    pub options: Vec<ThresholdOption>,
}

/// Body for PUT /threshold. Kept as a raw string so an unknown value
/// can be reported with the settings error rather than a serde one.
#[derive(Deserialize)]
pub struct ThresholdRequest {
    pub threshold: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
