// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the ChatLedger trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use qissa_config::model::StorageConfig;
use qissa_core::types::{
    AdapterKind, ChatId, ChatKind, ChatSummary, Conversation, HealthStatus, Turn, UserId,
    VideoArtifactRecord,
};
use qissa_core::{Adapter, ChatLedger, QissaError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed conversation ledger.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`ChatLedger::initialize`].
pub struct SqliteLedger {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteLedger {
    /// Create a new SqliteLedger with the given configuration.
    ///
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, QissaError> {
        self.db.get().ok_or_else(|| QissaError::Storage {
            source: "ledger not initialized -- call initialize() first".into(),
        })
    }

    fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

#[async_trait]
impl Adapter for SqliteLedger {
    fn name(&self) -> &str {
        "sqlite-ledger"
    }

    fn kind(&self) -> AdapterKind {
        AdapterKind::Ledger
    }

    async fn health_check(&self) -> Result<HealthStatus, QissaError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), QissaError> {
        // Shutdown delegates to close if the DB was initialized.
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl ChatLedger for SqliteLedger {
    async fn initialize(&self) -> Result<(), QissaError> {
        let path = self.config.database_path.clone();
        let db = Database::open(&path).await?;
        self.db.set(db).map_err(|_| QissaError::Storage {
            source: "ledger already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite ledger initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), QissaError> {
        self.db()?.close().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn create_chat(
        &self,
        owner: &UserId,
        kind: ChatKind,
        seed_text: &str,
    ) -> Result<ChatId, QissaError> {
        let id = ChatId(uuid::Uuid::new_v4().to_string());
        queries::chats::create_chat(self.db()?, &id, owner, kind, seed_text, &Self::now())
            .await?;
        Ok(id)
    }

    async fn get_chat(&self, chat: &ChatId, owner: &UserId) -> Result<Conversation, QissaError> {
        queries::chats::get_chat(self.db()?, chat, owner)
            .await?
            .ok_or_else(|| QissaError::NotFound(format!("chat {chat}")))
    }

    async fn append_turns(
        &self,
        chat: &ChatId,
        owner: &UserId,
        turns: &[Turn],
    ) -> Result<(), QissaError> {
        let appended =
            queries::chats::append_turns(self.db()?, chat, owner, turns, &Self::now()).await?;
        if appended {
            Ok(())
        } else {
            Err(QissaError::NotFound(format!("chat {chat}")))
        }
    }

    async fn list_chats(
        &self,
        owner: &UserId,
        kind: Option<ChatKind>,
    ) -> Result<Vec<ChatSummary>, QissaError> {
        queries::user_chats::list_chats(self.db()?, owner, kind).await
    }

    async fn record_artifact(&self, record: &VideoArtifactRecord) -> Result<(), QissaError> {
        queries::videos::insert_artifact(self.db()?, record).await
    }
}
