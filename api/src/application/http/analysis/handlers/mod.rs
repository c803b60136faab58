pub mod ai_health;
pub mod analyze;
