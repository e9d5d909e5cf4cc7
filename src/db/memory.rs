use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    BlogStore, Comment, CommentId, Group, GroupId, NewPost, Post, PostId, StoreError, StoreResult,
    User, UserId,
};

#[derive(Debug, Clone)]
struct PostRow {
    id: PostId,
    text: String,
    created_at: DateTime<Utc>,
    author_id: UserId,
    group_id: Option<GroupId>,
    image: Option<String>,
}

#[derive(Debug, Clone)]
struct CommentRow {
    id: CommentId,
    post_id: PostId,
    author_id: UserId,
    text: String,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    groups: HashMap<GroupId, Group>,
    posts: BTreeMap<PostId, PostRow>,
    comments: BTreeMap<CommentId, CommentRow>,
    follows: HashSet<(UserId, UserId)>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn materialize_post(&self, row: &PostRow) -> Post {
        Post {
            id: row.id,
            text: row.text.clone(),
            created_at: row.created_at,
            author_id: row.author_id,
            author: self.username(row.author_id),
            group_id: row.group_id,
            image: row.image.clone(),
        }
    }

    fn materialize_comment(&self, row: &CommentRow) -> Comment {
        Comment {
            id: row.id,
            post_id: row.post_id,
            author_id: row.author_id,
            author: self.username(row.author_id),
            text: row.text.clone(),
            created_at: row.created_at,
        }
    }

    fn username(&self, id: UserId) -> String {
        self.users
            .get(&id)
            .map(|user| user.username.clone())
            .unwrap_or_default()
    }

    fn posts_where(&self, predicate: impl Fn(&PostRow) -> bool) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .values()
            .filter(|row| predicate(row))
            .map(|row| self.materialize_post(row))
            .collect();
        // newest first; id breaks ties between equal timestamps
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
    }
}

/// In-memory store over mutex-guarded maps. Backs the test suite and doubles
/// as a throwaway backing store; the provisioning helpers stand in for the
/// external identity and admin services that own users and groups.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Tables>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, username: &str) -> User {
        let mut tables = self.inner.lock().unwrap();
        let user = User {
            id: tables.next_id(),
            username: username.to_owned(),
        };
        tables.users.insert(user.id, user.clone());
        user
    }

    pub fn add_group(&self, title: &str, slug: &str, description: &str) -> Group {
        let mut tables = self.inner.lock().unwrap();
        let group = Group {
            id: tables.next_id(),
            title: title.to_owned(),
            slug: slug.to_owned(),
            description: description.to_owned(),
        };
        tables.groups.insert(group.id, group.clone());
        group
    }
}

#[async_trait]
impl BlogStore for MemStore {
    async fn user_by_id(&self, id: UserId) -> StoreResult<User> {
        let tables = self.inner.lock().unwrap();
        tables.users.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<User> {
        let tables = self.inner.lock().unwrap();
        tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn group_by_id(&self, id: GroupId) -> StoreResult<Group> {
        let tables = self.inner.lock().unwrap();
        tables.groups.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn group_by_slug(&self, slug: &str) -> StoreResult<Group> {
        let tables = self.inner.lock().unwrap();
        tables
            .groups
            .values()
            .find(|group| group.slug == slug)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_post(&self, author: UserId, new: NewPost) -> StoreResult<Post> {
        let mut tables = self.inner.lock().unwrap();
        let row = PostRow {
            id: tables.next_id(),
            text: new.text,
            created_at: Utc::now(),
            author_id: author,
            group_id: new.group_id,
            image: new.image,
        };
        let post = tables.materialize_post(&row);
        tables.posts.insert(row.id, row);
        Ok(post)
    }

    async fn post(&self, id: PostId) -> StoreResult<Post> {
        let tables = self.inner.lock().unwrap();
        tables
            .posts
            .get(&id)
            .map(|row| tables.materialize_post(row))
            .ok_or(StoreError::NotFound)
    }

    async fn update_post(&self, id: PostId, new: NewPost) -> StoreResult<Post> {
        let mut tables = self.inner.lock().unwrap();
        let row = tables.posts.get_mut(&id).ok_or(StoreError::NotFound)?;
        row.text = new.text;
        row.group_id = new.group_id;
        row.image = new.image;
        let row = row.clone();
        Ok(tables.materialize_post(&row))
    }

    async fn delete_post(&self, id: PostId) -> StoreResult<()> {
        let mut tables = self.inner.lock().unwrap();
        tables.posts.remove(&id).ok_or(StoreError::NotFound)?;
        tables.comments.retain(|_, comment| comment.post_id != id);
        Ok(())
    }

    async fn all_posts(&self) -> StoreResult<Vec<Post>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.posts_where(|_| true))
    }

    async fn posts_by_group(&self, group: GroupId) -> StoreResult<Vec<Post>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.posts_where(|row| row.group_id == Some(group)))
    }

    async fn posts_by_author(&self, author: UserId) -> StoreResult<Vec<Post>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.posts_where(|row| row.author_id == author))
    }

    async fn posts_by_followed(&self, follower: UserId) -> StoreResult<Vec<Post>> {
        let tables = self.inner.lock().unwrap();
        let followed: HashSet<UserId> = tables
            .follows
            .iter()
            .filter(|(from, _)| *from == follower)
            .map(|(_, to)| *to)
            .collect();
        Ok(tables.posts_where(|row| followed.contains(&row.author_id)))
    }

    async fn create_comment(
        &self,
        post: PostId,
        author: UserId,
        text: String,
    ) -> StoreResult<Comment> {
        let mut tables = self.inner.lock().unwrap();
        if !tables.posts.contains_key(&post) {
            return Err(StoreError::NotFound);
        }
        let row = CommentRow {
            id: tables.next_id(),
            post_id: post,
            author_id: author,
            text,
            created_at: Utc::now(),
        };
        let comment = tables.materialize_comment(&row);
        tables.comments.insert(row.id, row);
        Ok(comment)
    }

    async fn comments_for_post(&self, post: PostId) -> StoreResult<Vec<Comment>> {
        let tables = self.inner.lock().unwrap();
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|row| row.post_id == post)
            .map(|row| tables.materialize_comment(row))
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(comments)
    }

    async fn follow(&self, follower: UserId, author: UserId) -> StoreResult<()> {
        if follower == author {
            return Ok(());
        }
        let mut tables = self.inner.lock().unwrap();
        tables.follows.insert((follower, author));
        Ok(())
    }

    async fn unfollow(&self, follower: UserId, author: UserId) -> StoreResult<()> {
        let mut tables = self.inner.lock().unwrap();
        tables.follows.remove(&(follower, author));
        Ok(())
    }

    async fn is_following(&self, follower: UserId, author: UserId) -> StoreResult<bool> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.follows.contains(&(follower, author)))
    }

    async fn followed_authors(&self, follower: UserId) -> StoreResult<Vec<UserId>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables
            .follows
            .iter()
            .filter(|(from, _)| *from == follower)
            .map(|(_, to)| *to)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(text: &str) -> NewPost {
        NewPost {
            text: text.to_owned(),
            group_id: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn follow_is_idempotent() {
        let store = MemStore::new();
        let alice = store.add_user("alice");
        let bob = store.add_user("bob");

        store.follow(alice.id, bob.id).await.unwrap();
        store.follow(alice.id, bob.id).await.unwrap();

        assert!(store.is_following(alice.id, bob.id).await.unwrap());
        assert_eq!(store.followed_authors(alice.id).await.unwrap(), vec![bob.id]);
    }

    #[tokio::test]
    async fn self_follow_creates_no_edge() {
        let store = MemStore::new();
        let alice = store.add_user("alice");

        store.follow(alice.id, alice.id).await.unwrap();

        assert!(!store.is_following(alice.id, alice.id).await.unwrap());
        assert!(store.followed_authors(alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unfollow_removes_only_the_targeted_edge() {
        let store = MemStore::new();
        let alice = store.add_user("alice");
        let bob = store.add_user("bob");
        let carol = store.add_user("carol");

        store.follow(alice.id, bob.id).await.unwrap();
        store.follow(alice.id, carol.id).await.unwrap();
        store.follow(bob.id, carol.id).await.unwrap();

        store.unfollow(alice.id, bob.id).await.unwrap();

        assert!(!store.is_following(alice.id, bob.id).await.unwrap());
        assert!(store.is_following(alice.id, carol.id).await.unwrap());
        assert!(store.is_following(bob.id, carol.id).await.unwrap());

        // absent edge: no-op, not an error
        store.unfollow(alice.id, bob.id).await.unwrap();
    }

    #[tokio::test]
    async fn deleting_a_post_cascades_to_its_comments() {
        let store = MemStore::new();
        let alice = store.add_user("alice");
        let first = store.create_post(alice.id, new_post("first")).await.unwrap();
        let second = store.create_post(alice.id, new_post("second")).await.unwrap();

        store
            .create_comment(first.id, alice.id, "on first".into())
            .await
            .unwrap();
        let kept = store
            .create_comment(second.id, alice.id, "on second".into())
            .await
            .unwrap();

        store.delete_post(first.id).await.unwrap();

        assert!(matches!(store.post(first.id).await, Err(StoreError::NotFound)));
        assert!(store.comments_for_post(first.id).await.unwrap().is_empty());
        assert_eq!(store.comments_for_post(second.id).await.unwrap(), vec![kept]);
        assert_eq!(store.all_posts().await.unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn listings_are_newest_first() {
        let store = MemStore::new();
        let alice = store.add_user("alice");
        let old = store.create_post(alice.id, new_post("old")).await.unwrap();
        let new = store.create_post(alice.id, new_post("new")).await.unwrap();

        let posts = store.all_posts().await.unwrap();
        assert_eq!(posts, vec![new, old]);
    }

    #[tokio::test]
    async fn followed_feed_sees_only_followed_authors() {
        let store = MemStore::new();
        let alice = store.add_user("alice");
        let bob = store.add_user("bob");
        let carol = store.add_user("carol");

        let from_bob = store.create_post(bob.id, new_post("bob's")).await.unwrap();
        store.create_post(carol.id, new_post("carol's")).await.unwrap();

        store.follow(alice.id, bob.id).await.unwrap();

        assert_eq!(store.posts_by_followed(alice.id).await.unwrap(), vec![from_bob]);
        assert!(store.posts_by_followed(bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn editing_keeps_author_and_timestamp() {
        let store = MemStore::new();
        let alice = store.add_user("alice");
        let group = store.add_group("rust", "rust", "the rust group");
        let post = store.create_post(alice.id, new_post("draft")).await.unwrap();

        let updated = store
            .update_post(
                post.id,
                NewPost {
                    text: "final".into(),
                    group_id: Some(group.id),
                    image: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.text, "final");
        assert_eq!(updated.group_id, Some(group.id));
        assert_eq!(updated.author_id, alice.id);
        assert_eq!(updated.created_at, post.created_at);
    }
}
