use async_trait::async_trait;
use sqlx::{Executor, PgPool};
use tracing::debug;

use super::{
    BlogStore, Comment, CommentId, Group, GroupId, NewPost, Post, PostId, StoreError, StoreResult,
    User, UserId,
};

const POST_COLUMNS: &str = "p.id, p.text, p.created_at, p.author_id, \
                            u.username AS author, p.group_id, p.image";

pub async fn prepare_db(pool: &PgPool) -> Result<(), sqlx::Error> {
    pool.execute(include_str!("../sql/schema.sql")).await?;
    Ok(())
}

/// PostgreSQL-backed store. Queries are bound at runtime so the crate builds
/// without a live database.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_posts(&self, where_clause: &str, bind: Option<i32>) -> StoreResult<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS}
             FROM posts p JOIN users u ON u.id = p.author_id
             {where_clause}
             ORDER BY p.created_at DESC, p.id DESC"
        );
        let query = sqlx::query_as::<_, Post>(&sql);
        let query = match bind {
            Some(value) => query.bind(value),
            None => query,
        };
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn comment(&self, id: CommentId) -> StoreResult<Comment> {
        sqlx::query_as::<_, Comment>(
            "SELECT c.id, c.post_id, c.author_id, u.username AS author, c.text, c.created_at
             FROM comments c JOIN users u ON u.id = c.author_id
             WHERE c.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl BlogStore for PgStore {
    async fn user_by_id(&self, id: UserId) -> StoreResult<User> {
        sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<User> {
        sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn group_by_id(&self, id: GroupId) -> StoreResult<Group> {
        sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn group_by_slug(&self, slug: &str) -> StoreResult<Group> {
        sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn create_post(&self, author: UserId, new: NewPost) -> StoreResult<Post> {
        let (id,): (PostId,) = sqlx::query_as(
            "INSERT INTO posts (text, author_id, group_id, image)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&new.text)
        .bind(author)
        .bind(new.group_id)
        .bind(&new.image)
        .fetch_one(&self.pool)
        .await?;

        debug!(post_id = id, author_id = author, "created post");
        self.post(id).await
    }

    async fn post(&self, id: PostId) -> StoreResult<Post> {
        sqlx::query_as::<_, Post>(
            "SELECT p.id, p.text, p.created_at, p.author_id, u.username AS author,
                    p.group_id, p.image
             FROM posts p JOIN users u ON u.id = p.author_id
             WHERE p.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn update_post(&self, id: PostId, new: NewPost) -> StoreResult<Post> {
        let updated = sqlx::query(
            "UPDATE posts SET text = $2, group_id = $3, image = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(&new.text)
        .bind(new.group_id)
        .bind(&new.image)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        self.post(id).await
    }

    async fn delete_post(&self, id: PostId) -> StoreResult<()> {
        // comments go with the post via ON DELETE CASCADE
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        debug!(post_id = id, "deleted post");
        Ok(())
    }

    async fn all_posts(&self) -> StoreResult<Vec<Post>> {
        self.fetch_posts("", None).await
    }

    async fn posts_by_group(&self, group: GroupId) -> StoreResult<Vec<Post>> {
        self.fetch_posts("WHERE p.group_id = $1", Some(group)).await
    }

    async fn posts_by_author(&self, author: UserId) -> StoreResult<Vec<Post>> {
        self.fetch_posts("WHERE p.author_id = $1", Some(author)).await
    }

    async fn posts_by_followed(&self, follower: UserId) -> StoreResult<Vec<Post>> {
        self.fetch_posts(
            "WHERE p.author_id IN (SELECT author_id FROM follows WHERE follower_id = $1)",
            Some(follower),
        )
        .await
    }

    async fn create_comment(
        &self,
        post: PostId,
        author: UserId,
        text: String,
    ) -> StoreResult<Comment> {
        // verify the post exists so a dangling id surfaces as NotFound
        self.post(post).await?;

        let (id,): (CommentId,) = sqlx::query_as(
            "INSERT INTO comments (post_id, author_id, text)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(post)
        .bind(author)
        .bind(&text)
        .fetch_one(&self.pool)
        .await?;

        self.comment(id).await
    }

    async fn comments_for_post(&self, post: PostId) -> StoreResult<Vec<Comment>> {
        Ok(sqlx::query_as::<_, Comment>(
            "SELECT c.id, c.post_id, c.author_id, u.username AS author, c.text, c.created_at
             FROM comments c JOIN users u ON u.id = c.author_id
             WHERE c.post_id = $1
             ORDER BY c.created_at DESC, c.id DESC",
        )
        .bind(post)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn follow(&self, follower: UserId, author: UserId) -> StoreResult<()> {
        if follower == author {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO follows (follower_id, author_id)
             VALUES ($1, $2)
             ON CONFLICT (follower_id, author_id) DO NOTHING",
        )
        .bind(follower)
        .bind(author)
        .execute(&self.pool)
        .await?;

        debug!(follower_id = follower, author_id = author, "created follow");
        Ok(())
    }

    async fn unfollow(&self, follower: UserId, author: UserId) -> StoreResult<()> {
        sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND author_id = $2")
            .bind(follower)
            .bind(author)
            .execute(&self.pool)
            .await?;

        debug!(follower_id = follower, author_id = author, "removed follow");
        Ok(())
    }

    async fn is_following(&self, follower: UserId, author: UserId) -> StoreResult<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = $1 AND author_id = $2)",
        )
        .bind(follower)
        .bind(author)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn followed_authors(&self, follower: UserId) -> StoreResult<Vec<UserId>> {
        let rows: Vec<(UserId,)> =
            sqlx::query_as("SELECT author_id FROM follows WHERE follower_id = $1")
                .bind(follower)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
