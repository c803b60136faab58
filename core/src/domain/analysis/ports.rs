use std::future::Future;
use uuid::Uuid;

use crate::domain::{
    analysis::{
        entities::{AnalysisRecord, Fingerprint},
        value_objects::{AnalysisResponse, AnalysisSummary, AnalyzeInput, GetAnalysisHistoryInput},
    },
    common::entities::app_errors::CoreError,
};

/// Durable storage of analysis results, unique per fingerprint.
#[cfg_attr(test, mockall::automock)]
pub trait AnalysisRepository: Send + Sync {
    fn get_by_fingerprint(
        &self,
        fingerprint: Fingerprint,
    ) -> impl Future<Output = Result<Option<AnalysisRecord>, CoreError>> + Send;

    fn get_by_id(
        &self,
        analysis_id: Uuid,
    ) -> impl Future<Output = Result<Option<AnalysisRecord>, CoreError>> + Send;

    /// Fails with [`CoreError::PersistenceConflict`] when the fingerprint already exists.
    fn create(
        &self,
        record: AnalysisRecord,
    ) -> impl Future<Output = Result<AnalysisRecord, CoreError>> + Send;

    fn get_by_session_id(
        &self,
        session_id: String,
        limit: u64,
    ) -> impl Future<Output = Result<Vec<AnalysisRecord>, CoreError>> + Send;
}

/// Fast lookup layer in front of [`AnalysisRepository`]. Entries expire on their own.
#[cfg_attr(test, mockall::automock)]
pub trait AnalysisCache: Send + Sync {
    fn get(
        &self,
        fingerprint: Fingerprint,
    ) -> impl Future<Output = Option<AnalysisRecord>> + Send;

    fn insert(&self, record: AnalysisRecord) -> impl Future<Output = ()> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait AnalysisService: Send + Sync {
    fn analyze(
        &self,
        input: AnalyzeInput,
    ) -> impl Future<Output = Result<AnalysisResponse, CoreError>> + Send;

    fn get_analysis_history(
        &self,
        input: GetAnalysisHistoryInput,
    ) -> impl Future<Output = Result<Vec<AnalysisSummary>, CoreError>> + Send;

    fn get_analysis(
        &self,
        analysis_id: Uuid,
    ) -> impl Future<Output = Result<AnalysisRecord, CoreError>> + Send;
}
