use serde::{Deserialize, Serialize};

use crate::instance::FrvcpInstance;

/// Settings of one labeling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelingConfig {
    /// Upper bound on any supporting-point SOC; `None` leaves it unbounded.
    pub battery_capacity: Option<f64>,
    /// Initial capacity of the label queue and arena.
    pub queue_capacity: usize,
    /// Initial capacity of each per-node frontier.
    pub frontier_capacity: usize,
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            battery_capacity: None,
            queue_capacity: 4096,
            frontier_capacity: 128,
        }
    }
}

impl LabelingConfig {
    pub fn for_instance(instance: &FrvcpInstance) -> Self {
        Self {
            battery_capacity: Some(instance.max_q()),
            ..Self::default()
        }
    }
}
