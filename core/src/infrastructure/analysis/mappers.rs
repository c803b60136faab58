use crate::{
    domain::analysis::entities::{AnalysisRecord, Fingerprint},
    entity::analyses,
};

impl From<&analyses::Model> for AnalysisRecord {
    fn from(model: &analyses::Model) -> Self {
        Self {
            id: model.id,
            fingerprint: Fingerprint::new(model.fingerprint.clone()),
            session_id: model.session_id.clone(),
            product_name: model.product_name.clone(),
            analysis_type: model.analysis_type.as_str().into(),
            result: model.result.clone(),
            model_used: model.model_used.clone(),
            created_at: model.created_at.to_utc(),
            updated_at: model.updated_at.to_utc(),
        }
    }
}

impl From<analyses::Model> for AnalysisRecord {
    fn from(model: analyses::Model) -> Self {
        Self::from(&model)
    }
}
