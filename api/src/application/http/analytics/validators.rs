use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

const DEFAULT_SUMMARY_DAYS: u32 = 7;
const DEFAULT_COST_DAYS: u32 = 30;
const DEFAULT_HISTORY_LIMIT: u64 = 10;

/// Range checks happen in the analytics service.
#[derive(Debug, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryWindowParams {
    /// Number of days to analyze (1-90).
    #[param(example = 7)]
    pub days: Option<u32>,
}

impl SummaryWindowParams {
    pub fn days(&self) -> u32 {
        self.days.unwrap_or(DEFAULT_SUMMARY_DAYS)
    }
}

#[derive(Debug, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CostWindowParams {
    /// Number of days to analyze (1-365).
    #[param(example = 30)]
    pub days: Option<u32>,
}

impl CostWindowParams {
    pub fn days(&self) -> u32 {
        self.days.unwrap_or(DEFAULT_COST_DAYS)
    }
}

#[derive(Debug, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryParams {
    /// Maximum number of results to return (1-50).
    #[param(example = 10)]
    pub limit: Option<u64>,
}

impl HistoryParams {
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_fall_back_to_defaults() {
        assert_eq!(SummaryWindowParams { days: None }.days(), 7);
        assert_eq!(CostWindowParams { days: None }.days(), 30);
        assert_eq!(HistoryParams { limit: None }.limit(), 10);
        assert_eq!(CostWindowParams { days: Some(90) }.days(), 90);
    }
}
