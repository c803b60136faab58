use std::sync::Arc;

use nutrilens_core::application::NutrilensService;

use crate::{application::rate_limit::AnalyzeRateLimit, args::Args};

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: NutrilensService,
    pub analyze_rate_limit: AnalyzeRateLimit,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: NutrilensService) -> Self {
        let analyze_rate_limit = AnalyzeRateLimit::new(&args.rate_limit);

        Self {
            args,
            service,
            analyze_rate_limit,
        }
    }
}
