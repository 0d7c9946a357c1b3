//! Notice-board contracts: post, list, acknowledge, delete, badge count.

use serde::{Deserialize, Serialize};
use tracing::info;

use foyer_shared::constants::DEFAULT_MESSAGE_LIMIT;
use foyer_shared::{MessageId, UserId};
use foyer_store::{Database, MessageWithReads, StoreError};

use crate::error::ApiError;
use crate::handlers::SuccessResponse;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadDto {
    pub user_id: i64,
    pub read_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub sender_id: i64,
    pub content: String,
    pub created_at: String,
    pub reads: Vec<ReadDto>,
}

impl From<MessageWithReads> for MessageDto {
    fn from(m: MessageWithReads) -> Self {
        Self {
            id: m.message.id.to_string(),
            sender_id: m.message.sender_id.0,
            content: m.message.content,
            created_at: m.message.created_at.to_rfc3339(),
            reads: m
                .reads
                .into_iter()
                .map(|r| ReadDto {
                    user_id: r.user_id.0,
                    read_at: r.read_at.to_rfc3339(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    pub sender_id: i64,
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesQuery {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub message_id: String,
    /// Optional in the wire shape; a missing id is a bad request, not a
    /// deserialization failure.
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageRequest {
    pub message_id: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountQuery {
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

fn parse_message_id(raw: &str) -> Result<MessageId, ApiError> {
    MessageId::parse(raw).map_err(|_| ApiError::BadRequest(format!("invalid message id: {raw}")))
}

pub fn post_message(db: &Database, req: PostMessageRequest) -> Result<MessageDto, ApiError> {
    let message = db.post_message(UserId(req.sender_id), &req.content)?;
    info!(msg = %message.id, sender = req.sender_id, "notice posted");
    Ok(MessageDto::from(MessageWithReads {
        message,
        reads: Vec::new(),
    }))
}

pub fn list_messages(db: &Database, query: ListMessagesQuery) -> Result<Vec<MessageDto>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_MESSAGE_LIMIT);
    let offset = query.offset.unwrap_or(0);
    let messages = db.list_active_messages(limit, offset)?;
    Ok(messages.into_iter().map(MessageDto::from).collect())
}

pub fn mark_read(db: &Database, req: MarkReadRequest) -> Result<SuccessResponse, ApiError> {
    let user_id = req
        .user_id
        .ok_or_else(|| ApiError::BadRequest("userId is required".to_string()))?;
    let message_id = parse_message_id(&req.message_id)?;

    let success = db.mark_read(message_id, UserId(user_id))?;
    Ok(SuccessResponse { success })
}

/// Absent, already-deleted, and not-yours all collapse to the forbidden
/// signal so callers cannot probe for a notice's existence.
pub fn delete_message(db: &Database, req: DeleteMessageRequest) -> Result<SuccessResponse, ApiError> {
    let message_id = parse_message_id(&req.message_id)?;

    match db.soft_delete_message(message_id, UserId(req.user_id)) {
        Ok(true) => Ok(SuccessResponse { success: true }),
        Ok(false) => Err(ApiError::Forbidden),
        Err(StoreError::Forbidden(_)) | Err(StoreError::NotFound) => Err(ApiError::Forbidden),
        Err(other) => Err(other.into()),
    }
}

pub fn unread_count(db: &Database, query: UnreadCountQuery) -> Result<UnreadCountResponse, ApiError> {
    let unread_count = db.count_unread(UserId(query.user_id))?;
    Ok(UnreadCountResponse { unread_count })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn post_then_list_round_trips() {
        let (_dir, db) = test_db();
        let posted = post_message(
            &db,
            PostMessageRequest {
                sender_id: 1,
                content: "Dinner at 7".to_string(),
            },
        )
        .unwrap();

        let listed = list_messages(&db, ListMessagesQuery::default()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, posted.id);
        assert_eq!(listed[0].content, "Dinner at 7");
        assert!(listed[0].reads.is_empty());
    }

    #[test]
    fn empty_content_is_a_bad_request() {
        let (_dir, db) = test_db();
        let err = post_message(
            &db,
            PostMessageRequest {
                sender_id: 1,
                content: "   ".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn mark_read_without_user_id_is_a_bad_request() {
        let (_dir, db) = test_db();
        let posted = post_message(
            &db,
            PostMessageRequest {
                sender_id: 1,
                content: "hello".to_string(),
            },
        )
        .unwrap();

        let err = mark_read(
            &db,
            MarkReadRequest {
                message_id: posted.id,
                user_id: None,
            },
        )
        .unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn mark_read_flows_into_the_read_set() {
        let (_dir, db) = test_db();
        let posted = post_message(
            &db,
            PostMessageRequest {
                sender_id: 1,
                content: "hello".to_string(),
            },
        )
        .unwrap();

        let response = mark_read(
            &db,
            MarkReadRequest {
                message_id: posted.id.clone(),
                user_id: Some(2),
            },
        )
        .unwrap();
        assert!(response.success);

        let listed = list_messages(&db, ListMessagesQuery::default()).unwrap();
        assert_eq!(listed[0].reads.len(), 1);
        assert_eq!(listed[0].reads[0].user_id, 2);
    }

    #[test]
    fn delete_by_non_sender_is_forbidden() {
        let (_dir, db) = test_db();
        let posted = post_message(
            &db,
            PostMessageRequest {
                sender_id: 1,
                content: "mine".to_string(),
            },
        )
        .unwrap();

        let err = delete_message(
            &db,
            DeleteMessageRequest {
                message_id: posted.id.clone(),
                user_id: 3,
            },
        )
        .unwrap_err();
        assert_eq!(err.status(), 403);

        // The sender succeeds, and the notice drops out of the listing.
        let response = delete_message(
            &db,
            DeleteMessageRequest {
                message_id: posted.id,
                user_id: 1,
            },
        )
        .unwrap();
        assert!(response.success);
        assert!(list_messages(&db, ListMessagesQuery::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn deleting_an_unknown_notice_is_forbidden_too() {
        let (_dir, db) = test_db();
        let err = delete_message(
            &db,
            DeleteMessageRequest {
                message_id: MessageId::new().to_string(),
                user_id: 1,
            },
        )
        .unwrap_err();
        assert_eq!(err.status(), 403);
    }

    #[test]
    fn unread_count_tracks_acknowledgement() {
        let (_dir, db) = test_db();
        let posted = post_message(
            &db,
            PostMessageRequest {
                sender_id: 1,
                content: "Dinner at 7".to_string(),
            },
        )
        .unwrap();

        let before = unread_count(&db, UnreadCountQuery { user_id: 2 }).unwrap();
        assert_eq!(before.unread_count, 1);

        mark_read(
            &db,
            MarkReadRequest {
                message_id: posted.id,
                user_id: Some(2),
            },
        )
        .unwrap();

        let after = unread_count(&db, UnreadCountQuery { user_id: 2 }).unwrap();
        assert_eq!(after.unread_count, 0);
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let (_dir, db) = test_db();
        let posted = post_message(
            &db,
            PostMessageRequest {
                sender_id: 1,
                content: "shape".to_string(),
            },
        )
        .unwrap();
        mark_read(
            &db,
            MarkReadRequest {
                message_id: posted.id,
                user_id: Some(2),
            },
        )
        .unwrap();

        let listed = list_messages(&db, ListMessagesQuery::default()).unwrap();
        let json = serde_json::to_value(&listed[0]).unwrap();
        assert!(json.get("senderId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json["reads"][0].get("userId").is_some());

        let count = unread_count(&db, UnreadCountQuery { user_id: 3 }).unwrap();
        let json = serde_json::to_value(&count).unwrap();
        assert!(json.get("unreadCount").is_some());
    }
}
