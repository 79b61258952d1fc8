// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation index queries.

use std::str::FromStr;

use qissa_core::QissaError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{ChatId, ChatKind, ChatSummary, UserId};

fn other(
    e: impl std::error::Error + Send + Sync + 'static,
) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(e)
}

/// List the owner's index entries in insertion order, optionally filtered
/// by kind. Filtering is exact-match on the stored kind string.
pub async fn list_chats(
    db: &Database,
    owner: &UserId,
    kind: Option<ChatKind>,
) -> Result<Vec<ChatSummary>, QissaError> {
    let owner = owner.0.clone();
    let kind = kind.map(|k| k.to_string());

    db.connection()
        .call(move |conn| {
            let mut summaries = Vec::new();
            let map_row = |row: &rusqlite::Row<'_>| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            };
            let rows: Vec<(String, String, String, String)> = match &kind {
                Some(k) => {
                    let mut stmt = conn.prepare(
                        "SELECT chat_id, title, kind, created_at FROM chat_index
                         WHERE owner_id = ?1 AND kind = ?2 ORDER BY seq ASC",
                    )?;
                    let rows = stmt.query_map(params![owner, k], map_row)?;
                    rows.collect::<Result<_, _>>()?
                }
                None => {
                    let mut stmt = conn.prepare(
                        "SELECT chat_id, title, kind, created_at FROM chat_index
                         WHERE owner_id = ?1 ORDER BY seq ASC",
                    )?;
                    let rows = stmt.query_map(params![owner], map_row)?;
                    rows.collect::<Result<_, _>>()?
                }
            };
            for (chat_id, title, kind, created_at) in rows {
                summaries.push(ChatSummary {
                    chat_id: ChatId(chat_id),
                    title,
                    kind: ChatKind::from_str(&kind).map_err(other)?,
                    created_at,
                });
            }
            Ok(summaries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::chats::create_chat;
    use tempfile::tempdir;

    async fn open_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("index.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn list_is_scoped_to_owner_in_insertion_order() {
        let (db, _dir) = open_db().await;
        let owner = UserId("user-1".into());
        let stranger = UserId("user-2".into());

        for (i, kind) in [ChatKind::Story, ChatKind::HistoryChat, ChatKind::VideoFluid]
            .into_iter()
            .enumerate()
        {
            create_chat(
                &db,
                &ChatId(format!("chat-{i}")),
                &owner,
                kind,
                &format!("seed {i}"),
                "2026-01-01T00:00:00Z",
            )
            .await
            .unwrap();
        }
        create_chat(
            &db,
            &ChatId("chat-other".into()),
            &stranger,
            ChatKind::Story,
            "not yours",
            "2026-01-01T00:00:00Z",
        )
        .await
        .unwrap();

        let all = list_chats(&db, &owner, None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].chat_id.0, "chat-0");
        assert_eq!(all[2].chat_id.0, "chat-2");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn kind_filter_is_exact_match() {
        let (db, _dir) = open_db().await;
        let owner = UserId("user-1".into());

        create_chat(
            &db,
            &ChatId("c1".into()),
            &owner,
            ChatKind::VideoStatic,
            "static",
            "2026-01-01T00:00:00Z",
        )
        .await
        .unwrap();
        create_chat(
            &db,
            &ChatId("c2".into()),
            &owner,
            ChatKind::VideoFluid,
            "fluid",
            "2026-01-01T00:00:00Z",
        )
        .await
        .unwrap();

        let fluid = list_chats(&db, &owner, Some(ChatKind::VideoFluid))
            .await
            .unwrap();
        assert_eq!(fluid.len(), 1);
        assert_eq!(fluid[0].chat_id.0, "c2");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn title_is_clipped_seed_text() {
        let (db, _dir) = open_db().await;
        let owner = UserId("user-1".into());
        let long_seed = "x".repeat(100);

        create_chat(
            &db,
            &ChatId("c1".into()),
            &owner,
            ChatKind::Story,
            &long_seed,
            "2026-01-01T00:00:00Z",
        )
        .await
        .unwrap();

        let all = list_chats(&db, &owner, None).await.unwrap();
        assert_eq!(all[0].title.chars().count(), 40);

        db.close().await.unwrap();
    }
}
