pub mod get_analysis;
pub mod get_costs;
pub mod get_history;
pub mod get_metrics;
pub mod get_performance;
