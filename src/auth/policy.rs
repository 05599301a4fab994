// Authorization policy
// Pure decision functions over the current user and a resource.
// No I/O; callers re-evaluate on every check since role and ownership
// can change between calls.

use super::types::{UserProfile, UserRole};
use crate::models::{CommentItem, NewsItem};

fn is_verified_author(user: &UserProfile) -> bool {
    user.role == UserRole::Author && user.is_verified_author
}

/// Whether the user may create news items
pub fn can_create_news(user: Option<&UserProfile>) -> bool {
    user.is_some_and(|u| u.role == UserRole::Admin || is_verified_author(u))
}

/// Whether the user may edit or delete the given news item
pub fn can_manage_news(user: Option<&UserProfile>, news: &NewsItem) -> bool {
    user.is_some_and(|u| {
        u.role == UserRole::Admin || (news.author_id == u.id && is_verified_author(u))
    })
}

/// Whether the user may edit or delete the given comment
pub fn can_manage_comment(user: Option<&UserProfile>, comment: &CommentItem) -> bool {
    user.is_some_and(|u| u.role == UserRole::Admin || comment.author_id == u.id)
}
