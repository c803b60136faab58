use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    domain::{
        analysis::{
            entities::{AnalysisRecord, Fingerprint},
            ports::AnalysisRepository,
        },
        common::entities::app_errors::CoreError,
    },
    entity::analyses::{ActiveModel as AnalysisActiveModel, Column as AnalysisColumn, Entity as AnalysisEntity},
    infrastructure::db::postgres::map_db_error,
};

#[derive(Debug, Clone)]
pub struct PostgresAnalysisRepository {
    pub db: DatabaseConnection,
}

impl PostgresAnalysisRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl AnalysisRepository for PostgresAnalysisRepository {
    async fn get_by_fingerprint(
        &self,
        fingerprint: Fingerprint,
    ) -> Result<Option<AnalysisRecord>, CoreError> {
        let record = AnalysisEntity::find()
            .filter(AnalysisColumn::Fingerprint.eq(fingerprint.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| map_db_error("Failed to get analysis by fingerprint", e))?
            .map(AnalysisRecord::from);

        Ok(record)
    }

    async fn get_by_id(&self, analysis_id: Uuid) -> Result<Option<AnalysisRecord>, CoreError> {
        let record = AnalysisEntity::find_by_id(analysis_id)
            .one(&self.db)
            .await
            .map_err(|e| map_db_error("Failed to get analysis by id", e))?
            .map(AnalysisRecord::from);

        Ok(record)
    }

    async fn create(&self, record: AnalysisRecord) -> Result<AnalysisRecord, CoreError> {
        let created = AnalysisEntity::insert(AnalysisActiveModel {
            id: Set(record.id),
            fingerprint: Set(record.fingerprint.as_str().to_string()),
            session_id: Set(record.session_id),
            product_name: Set(record.product_name),
            analysis_type: Set(record.analysis_type.as_str().to_string()),
            result: Set(record.result),
            model_used: Set(record.model_used),
            created_at: Set(record.created_at.fixed_offset()),
            updated_at: Set(record.updated_at.fixed_offset()),
        })
        .exec_with_returning(&self.db)
        .await
        .map(AnalysisRecord::from)
        .map_err(|e| map_db_error("Failed to create analysis", e))?;

        Ok(created)
    }

    async fn get_by_session_id(
        &self,
        session_id: String,
        limit: u64,
    ) -> Result<Vec<AnalysisRecord>, CoreError> {
        let records = AnalysisEntity::find()
            .filter(AnalysisColumn::SessionId.eq(session_id))
            .order_by_desc(AnalysisColumn::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| map_db_error("Failed to get analyses by session", e))?
            .iter()
            .map(AnalysisRecord::from)
            .collect::<Vec<AnalysisRecord>>();

        Ok(records)
    }
}
