use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub type UserId = i32;
pub type GroupId = i32;
pub type PostId = i32;
pub type CommentId = i32;

/// An author. Provisioned by the identity service; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Group {
    pub id: GroupId,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// A post as the views consume it: the row plus the author's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Post {
    pub id: PostId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: UserId,
    pub author: String,
    pub group_id: Option<GroupId>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Validated post input. The same value drives create and edit; the author
/// and creation timestamp are never part of it.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub group_id: Option<GroupId>,
    pub image: Option<String>,
}
