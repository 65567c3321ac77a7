//! Cycle Report
//!
//! The complete published state for one cycle, serialized one per line in
//! JSONL output.

use serde::{Deserialize, Serialize};

use crate::calendar::CycleCalendar;
use crate::dynamics::DynamicsReport;
use crate::weather::WeatherReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub calendar: CycleCalendar,
    pub weather: WeatherReport,
    pub dynamics: DynamicsReport,
}

impl CycleReport {
    /// Serializes to a single JSON line.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
