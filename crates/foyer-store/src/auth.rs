//! Mutation authorization.
//!
//! The only gated mutation in this core is notice deletion: a notice may be
//! soft-deleted by its sender and nobody else.  Posting and marking read are
//! open to any known member id.

use foyer_shared::UserId;

use crate::models::Message;

/// True iff `requester` may soft-delete `message`.
pub fn can_delete(message: &Message, requester: UserId) -> bool {
    message.sender_id == requester
}
