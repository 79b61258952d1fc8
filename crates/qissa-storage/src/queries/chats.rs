// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation CRUD: creation, retrieval, and append-only turn updates.

use std::str::FromStr;

use qissa_core::QissaError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{ChatId, ChatKind, Conversation, Role, Turn, TurnPart, UserId};

/// Listing titles are the head of the seed text, clipped by characters.
const TITLE_LEN: usize = 40;

fn other(
    e: impl std::error::Error + Send + Sync + 'static,
) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(e)
}

/// Create a conversation seeded with one user turn, and append the owner's
/// index entry. All three inserts commit in a single transaction.
pub async fn create_chat(
    db: &Database,
    id: &ChatId,
    owner: &UserId,
    kind: ChatKind,
    seed_text: &str,
    created_at: &str,
) -> Result<(), QissaError> {
    let id = id.0.clone();
    let owner = owner.0.clone();
    let kind = kind.to_string();
    let title: String = seed_text.chars().take(TITLE_LEN).collect();
    let seed_parts = serde_json::to_string(&[TurnPart {
        text: seed_text.to_string(),
    }])
    .map_err(|e| QissaError::Storage {
        source: Box::new(e),
    })?;
    let created_at = created_at.to_string();

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO chats (id, owner_id, kind, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![id, owner, kind, created_at],
            )?;
            tx.execute(
                "INSERT INTO turns (chat_id, role, parts, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![id, Role::User.to_string(), seed_parts, created_at],
            )?;
            tx.execute(
                "INSERT INTO chat_index (chat_id, owner_id, title, kind, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, owner, title, kind, created_at],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a conversation with its full history, ownership-checked.
///
/// Returns `None` when the id does not exist or belongs to another owner;
/// the caller decides how to surface that.
pub async fn get_chat(
    db: &Database,
    chat: &ChatId,
    owner: &UserId,
) -> Result<Option<Conversation>, QissaError> {
    let chat = chat.0.clone();
    let owner = owner.0.clone();

    db.connection()
        .call(move |conn| {
            let head = conn
                .query_row(
                    "SELECT id, owner_id, kind, created_at FROM chats
                     WHERE id = ?1 AND owner_id = ?2",
                    params![chat, owner],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                        ))
                    },
                )
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    e => Err(e),
                })?;

            let Some((id, owner_id, kind, created_at)) = head else {
                return Ok(None);
            };

            let mut stmt = conn.prepare(
                "SELECT role, parts FROM turns WHERE chat_id = ?1 ORDER BY seq ASC",
            )?;
            let rows = stmt.query_map(params![id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;

            let mut history = Vec::new();
            for row in rows {
                let (role, parts) = row?;
                history.push(Turn {
                    role: Role::from_str(&role).map_err(other)?,
                    parts: serde_json::from_str(&parts).map_err(other)?,
                });
            }

            Ok(Some(Conversation {
                id: ChatId(id),
                owner_id: UserId(owner_id),
                kind: ChatKind::from_str(&kind).map_err(other)?,
                history,
                created_at,
            }))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Append turns in order as one atomic update, ownership-checked.
///
/// Returns `false` without touching the store when the conversation does
/// not exist or belongs to another owner.
pub async fn append_turns(
    db: &Database,
    chat: &ChatId,
    owner: &UserId,
    turns: &[Turn],
    created_at: &str,
) -> Result<bool, QissaError> {
    let chat = chat.0.clone();
    let owner = owner.0.clone();
    let created_at = created_at.to_string();
    let mut rows = Vec::with_capacity(turns.len());
    for turn in turns {
        let parts = serde_json::to_string(&turn.parts).map_err(|e| QissaError::Storage {
            source: Box::new(e),
        })?;
        rows.push((turn.role.to_string(), parts));
    }

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let owned: bool = tx
                .query_row(
                    "SELECT 1 FROM chats WHERE id = ?1 AND owner_id = ?2",
                    params![chat, owner],
                    |_| Ok(true),
                )
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(false),
                    e => Err(e),
                })?;
            if !owned {
                return Ok(false);
            }
            for (role, parts) in &rows {
                tx.execute(
                    "INSERT INTO turns (chat_id, role, parts, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![chat, role, parts, created_at],
                )?;
            }
            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qissa_core::types::Role;
    use tempfile::tempdir;

    async fn open_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("chats.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn ids() -> (ChatId, UserId) {
        (ChatId("chat-1".into()), UserId("user-1".into()))
    }

    #[tokio::test]
    async fn create_seeds_one_user_turn() {
        let (db, _dir) = open_db().await;
        let (chat, owner) = ids();

        create_chat(
            &db,
            &chat,
            &owner,
            ChatKind::Story,
            "a calm river",
            "2026-01-01T00:00:00Z",
        )
        .await
        .unwrap();

        let convo = get_chat(&db, &chat, &owner).await.unwrap().unwrap();
        assert_eq!(convo.kind, ChatKind::Story);
        assert_eq!(convo.history.len(), 1);
        assert_eq!(convo.history[0].role, Role::User);
        assert_eq!(convo.history[0].joined_text(), "a calm river");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_chat_enforces_ownership() {
        let (db, _dir) = open_db().await;
        let (chat, owner) = ids();
        create_chat(&db, &chat, &owner, ChatKind::Story, "seed", "2026-01-01T00:00:00Z")
            .await
            .unwrap();

        let other_user = UserId("user-2".into());
        assert!(get_chat(&db, &chat, &other_user).await.unwrap().is_none());
        assert!(get_chat(&db, &ChatId("missing".into()), &owner)
            .await
            .unwrap()
            .is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn append_preserves_call_order() {
        let (db, _dir) = open_db().await;
        let (chat, owner) = ids();
        create_chat(&db, &chat, &owner, ChatKind::Story, "seed", "2026-01-01T00:00:00Z")
            .await
            .unwrap();

        for i in 0..5 {
            let appended = append_turns(
                &db,
                &chat,
                &owner,
                &[Turn::text(Role::Model, format!("reply {i}"))],
                "2026-01-01T00:00:01Z",
            )
            .await
            .unwrap();
            assert!(appended);
        }

        let convo = get_chat(&db, &chat, &owner).await.unwrap().unwrap();
        assert_eq!(convo.history.len(), 6);
        for (i, turn) in convo.history[1..].iter().enumerate() {
            assert_eq!(turn.joined_text(), format!("reply {i}"));
        }

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn combined_append_is_atomic_and_ordered() {
        let (db, _dir) = open_db().await;
        let (chat, owner) = ids();
        create_chat(&db, &chat, &owner, ChatKind::Story, "seed", "2026-01-01T00:00:00Z")
            .await
            .unwrap();

        // A continuation appends the user question and the model answer in
        // one update.
        append_turns(
            &db,
            &chat,
            &owner,
            &[
                Turn::text(Role::User, "question"),
                Turn::text(Role::Model, "answer"),
            ],
            "2026-01-01T00:00:01Z",
        )
        .await
        .unwrap();

        let convo = get_chat(&db, &chat, &owner).await.unwrap().unwrap();
        assert_eq!(convo.history.len(), 3);
        assert_eq!(convo.history[1].role, Role::User);
        assert_eq!(convo.history[2].role, Role::Model);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn append_to_missing_or_foreign_chat_leaves_store_unchanged() {
        let (db, _dir) = open_db().await;
        let (chat, owner) = ids();
        create_chat(&db, &chat, &owner, ChatKind::Story, "seed", "2026-01-01T00:00:00Z")
            .await
            .unwrap();

        let turn = [Turn::text(Role::Model, "orphan")];
        assert!(
            !append_turns(&db, &ChatId("missing".into()), &owner, &turn, "t")
                .await
                .unwrap()
        );
        assert!(
            !append_turns(&db, &chat, &UserId("user-2".into()), &turn, "t")
                .await
                .unwrap()
        );

        let convo = get_chat(&db, &chat, &owner).await.unwrap().unwrap();
        assert_eq!(convo.history.len(), 1, "no orphan turn may be committed");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_appends_all_land() {
        let (db, _dir) = open_db().await;
        let (chat, owner) = ids();
        create_chat(&db, &chat, &owner, ChatKind::Story, "seed", "2026-01-01T00:00:00Z")
            .await
            .unwrap();

        let db = std::sync::Arc::new(db);
        let mut handles = Vec::new();
        for i in 0..10 {
            let db = db.clone();
            let chat = chat.clone();
            let owner = owner.clone();
            handles.push(tokio::spawn(async move {
                append_turns(
                    &db,
                    &chat,
                    &owner,
                    &[Turn::text(Role::Model, format!("concurrent {i}"))],
                    "2026-01-01T00:00:02Z",
                )
                .await
                .unwrap()
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        // History only grows; all ten appends are present.
        let convo = get_chat(&db, &chat, &owner).await.unwrap().unwrap();
        assert_eq!(convo.history.len(), 11);

        db.close().await.unwrap();
    }
}
