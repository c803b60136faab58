use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use tracing::info;

use crate::domain::{
    common::entities::app_errors::CoreError,
    prompt::{entities::prompt_version::PromptVersion, ports::PromptRepository},
};
use crate::entity::prompt_versions::{
    ActiveModel as PromptVersionActiveModel, Column as PromptVersionColumn,
    Entity as PromptVersionEntity,
};
use crate::infrastructure::db::postgres::map_db_error;

#[derive(Debug, Clone)]
pub struct PostgresPromptRepository {
    pub db: DatabaseConnection,
}

impl PostgresPromptRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl PromptRepository for PostgresPromptRepository {
    async fn get_active(&self, language: String) -> Result<Option<PromptVersion>, CoreError> {
        let prompt = PromptVersionEntity::find()
            .filter(PromptVersionColumn::Language.eq(language))
            .filter(PromptVersionColumn::Active.eq(true))
            .order_by_desc(PromptVersionColumn::CreatedAt)
            .limit(1)
            .one(&self.db)
            .await
            .map_err(|e| map_db_error("Failed to get active prompt", e))?
            .map(PromptVersion::from);

        Ok(prompt)
    }

    async fn get_by_version(
        &self,
        version: String,
        language: String,
    ) -> Result<Option<PromptVersion>, CoreError> {
        let prompt = PromptVersionEntity::find()
            .filter(PromptVersionColumn::Version.eq(version))
            .filter(PromptVersionColumn::Language.eq(language))
            .one(&self.db)
            .await
            .map_err(|e| map_db_error("Failed to get prompt by version", e))?
            .map(PromptVersion::from);

        Ok(prompt)
    }

    async fn list(&self, language: Option<String>) -> Result<Vec<PromptVersion>, CoreError> {
        let mut query = PromptVersionEntity::find();

        if let Some(language) = language {
            query = query.filter(PromptVersionColumn::Language.eq(language));
        }

        let prompts = query
            .order_by_desc(PromptVersionColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| map_db_error("Failed to list prompt versions", e))?
            .iter()
            .map(PromptVersion::from)
            .collect::<Vec<PromptVersion>>();

        Ok(prompts)
    }

    async fn create(&self, prompt: PromptVersion) -> Result<PromptVersion, CoreError> {
        let created = PromptVersionEntity::insert(PromptVersionActiveModel {
            id: Set(prompt.id),
            version: Set(prompt.version),
            language: Set(prompt.language),
            content: Set(prompt.content),
            active: Set(prompt.active),
            created_at: Set(prompt.created_at.fixed_offset()),
            updated_at: Set(prompt.updated_at.fixed_offset()),
        })
        .exec_with_returning(&self.db)
        .await
        .map(PromptVersion::from)
        .map_err(|e| map_db_error("Failed to create prompt version", e))?;

        Ok(created)
    }

    async fn activate(
        &self,
        version: String,
        language: String,
    ) -> Result<Option<PromptVersion>, CoreError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_db_error("Failed to begin prompt activation", e))?;

        let Some(target) = PromptVersionEntity::find()
            .filter(PromptVersionColumn::Version.eq(version.as_str()))
            .filter(PromptVersionColumn::Language.eq(language.as_str()))
            .one(&txn)
            .await
            .map_err(|e| map_db_error("Failed to find prompt version", e))?
        else {
            return Ok(None);
        };

        let deactivated = PromptVersionEntity::update_many()
            .col_expr(PromptVersionColumn::Active, Expr::value(false))
            .filter(PromptVersionColumn::Language.eq(language.as_str()))
            .filter(PromptVersionColumn::Active.eq(true))
            .exec(&txn)
            .await
            .map_err(|e| map_db_error("Failed to deactivate prompt versions", e))?;

        let mut active: PromptVersionActiveModel = target.into();
        active.active = Set(true);
        active.updated_at = Set(Utc::now().fixed_offset());
        let activated = active
            .update(&txn)
            .await
            .map_err(|e| map_db_error("Failed to activate prompt version", e))?;

        txn.commit()
            .await
            .map_err(|e| map_db_error("Failed to commit prompt activation", e))?;

        info!(
            "Prompt version {} active for {} ({} versions deactivated)",
            version, language, deactivated.rows_affected
        );

        Ok(Some(PromptVersion::from(activated)))
    }
}
