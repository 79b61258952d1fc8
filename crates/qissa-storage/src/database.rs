// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. The [`Database`] struct IS the single writer; query modules
//! accept `&Database` and call through `connection().call()`. Do NOT create
//! additional Connection instances for writes.

use qissa_core::QissaError;

/// Handle to the single SQLite connection.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, QissaError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| QissaError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;",
            )?;
            crate::migrations::run_migrations(conn)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        Ok(Self { conn })
    }

    /// Returns the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(&self) -> Result<(), QissaError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

/// Map a tokio-rusqlite error into the service error type.
///
/// The closures passed to `Connection::call` use a boxed error as their
/// error type, so every database error — `rusqlite`, JSON, or enum parse —
/// funnels through here uniformly.
pub fn map_tr_err(
    e: tokio_rusqlite::Error<Box<dyn std::error::Error + Send + Sync>>,
) -> QissaError {
    let source: Box<dyn std::error::Error + Send + Sync> = match e {
        tokio_rusqlite::Error::Error(inner) => inner,
        other => other.to_string().into(),
    };
    QissaError::Storage { source }
}
