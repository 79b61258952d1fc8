// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Video artifact audit records.

use qissa_core::QissaError;
use rusqlite::params;

use crate::database::Database;
use crate::models::VideoArtifactRecord;

/// Record one materialized artifact.
pub async fn insert_artifact(
    db: &Database,
    record: &VideoArtifactRecord,
) -> Result<(), QissaError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO video_artifacts (chat_id, owner_id, prompt, path, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.chat_id.0,
                    record.owner_id.0,
                    record.prompt,
                    record.path,
                    record.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
