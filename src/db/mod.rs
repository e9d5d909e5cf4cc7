pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemStore;
pub use models::*;
pub use postgres::PgStore;

use async_trait::async_trait;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Not Found")]
    NotFound,

    #[error("SQL failed: {0:?}")]
    Sqlx(#[from] sqlx::Error),
}

/// Storage interface for the whole application. Handlers and the feed
/// assembler depend on this trait, never on a concrete store.
///
/// Every listing of posts is ordered newest first (creation timestamp
/// descending, id descending as the tiebreak); comment listings likewise.
#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn user_by_id(&self, id: UserId) -> StoreResult<User>;
    async fn user_by_username(&self, username: &str) -> StoreResult<User>;

    async fn group_by_id(&self, id: GroupId) -> StoreResult<Group>;
    async fn group_by_slug(&self, slug: &str) -> StoreResult<Group>;

    async fn create_post(&self, author: UserId, new: NewPost) -> StoreResult<Post>;
    async fn post(&self, id: PostId) -> StoreResult<Post>;
    async fn update_post(&self, id: PostId, new: NewPost) -> StoreResult<Post>;
    /// Removes the post and, cascading, all of its comments.
    async fn delete_post(&self, id: PostId) -> StoreResult<()>;

    async fn all_posts(&self) -> StoreResult<Vec<Post>>;
    async fn posts_by_group(&self, group: GroupId) -> StoreResult<Vec<Post>>;
    async fn posts_by_author(&self, author: UserId) -> StoreResult<Vec<Post>>;
    /// Posts whose author is followed by `follower`.
    async fn posts_by_followed(&self, follower: UserId) -> StoreResult<Vec<Post>>;

    async fn create_comment(&self, post: PostId, author: UserId, text: String)
        -> StoreResult<Comment>;
    async fn comments_for_post(&self, post: PostId) -> StoreResult<Vec<Comment>>;

    /// Inserts a follow edge. Idempotent; a self-follow is silently ignored.
    async fn follow(&self, follower: UserId, author: UserId) -> StoreResult<()>;
    /// Removes the edge if present; no-op otherwise.
    async fn unfollow(&self, follower: UserId, author: UserId) -> StoreResult<()>;
    async fn is_following(&self, follower: UserId, author: UserId) -> StoreResult<bool>;
    async fn followed_authors(&self, follower: UserId) -> StoreResult<Vec<UserId>>;
}
