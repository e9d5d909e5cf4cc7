//! Assembles the ordered post sequence behind each listing view and hands it
//! to the paginator. Ordering (newest first) is the store's contract.

use crate::db::{BlogStore, Group, Post, StoreResult, User, UserId};
use crate::pagination::{paginate, Page};

pub struct GroupFeed {
    pub group: Group,
    pub page: Page<Post>,
}

pub struct ProfileFeed {
    pub author: User,
    /// Whether the current viewer follows this author; false for anonymous
    /// viewers.
    pub following: bool,
    pub page: Page<Post>,
}

pub async fn index(store: &dyn BlogStore, page: Option<usize>) -> StoreResult<Page<Post>> {
    Ok(paginate(store.all_posts().await?, page))
}

pub async fn group_posts(
    store: &dyn BlogStore,
    slug: &str,
    page: Option<usize>,
) -> StoreResult<GroupFeed> {
    let group = store.group_by_slug(slug).await?;
    let posts = store.posts_by_group(group.id).await?;
    Ok(GroupFeed {
        group,
        page: paginate(posts, page),
    })
}

pub async fn profile(
    store: &dyn BlogStore,
    username: &str,
    viewer: Option<UserId>,
    page: Option<usize>,
) -> StoreResult<ProfileFeed> {
    let author = store.user_by_username(username).await?;
    let following = match viewer {
        Some(viewer) => store.is_following(viewer, author.id).await?,
        None => false,
    };
    let posts = store.posts_by_author(author.id).await?;
    Ok(ProfileFeed {
        author,
        following,
        page: paginate(posts, page),
    })
}

pub async fn follow_index(
    store: &dyn BlogStore,
    viewer: UserId,
    page: Option<usize>,
) -> StoreResult<Page<Post>> {
    Ok(paginate(store.posts_by_followed(viewer).await?, page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemStore, NewPost, StoreError};

    fn new_post(text: &str, group_id: Option<i32>) -> NewPost {
        NewPost {
            text: text.to_owned(),
            group_id,
            image: None,
        }
    }

    #[tokio::test]
    async fn ungrouped_post_leads_the_index_and_joins_no_group_feed() {
        let store = MemStore::new();
        let user = store.add_user("leo");
        let group = store.add_group("prose", "prose", "long form");
        store
            .create_post(user.id, new_post("older, grouped", Some(group.id)))
            .await
            .unwrap();
        let hello = store.create_post(user.id, new_post("Hello", None)).await.unwrap();

        let front_page = index(&store, None).await.unwrap();
        assert_eq!(front_page.items.first(), Some(&hello));

        let in_group = group_posts(&store, "prose", None).await.unwrap();
        assert!(!in_group.page.items.contains(&hello));
    }

    #[tokio::test]
    async fn unknown_group_slug_is_not_found() {
        let store = MemStore::new();
        let result = group_posts(&store, "no-such-slug", None).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn profile_reports_whether_the_viewer_follows_the_author() {
        let store = MemStore::new();
        let author = store.add_user("author");
        let fan = store.add_user("fan");
        store.create_post(author.id, new_post("post", None)).await.unwrap();

        let anonymous = profile(&store, "author", None, None).await.unwrap();
        assert!(!anonymous.following);
        assert_eq!(anonymous.page.items.len(), 1);

        let before = profile(&store, "author", Some(fan.id), None).await.unwrap();
        assert!(!before.following);

        store.follow(fan.id, author.id).await.unwrap();
        let after = profile(&store, "author", Some(fan.id), None).await.unwrap();
        assert!(after.following);
        assert_eq!(after.author.username, "author");
    }

    #[tokio::test]
    async fn follow_feed_paginates_a_followed_authors_posts() {
        let store = MemStore::new();
        let reader = store.add_user("reader");
        let writer = store.add_user("writer");
        let mut ids = Vec::new();
        for n in 1..=4 {
            let post = store
                .create_post(writer.id, new_post(&format!("post {n}"), None))
                .await
                .unwrap();
            ids.push(post.id);
        }
        store.follow(reader.id, writer.id).await.unwrap();

        let first = follow_index(&store, reader.id, None).await.unwrap();
        assert_eq!(first.total_pages, 2);
        let first_ids: Vec<_> = first.items.iter().map(|post| post.id).collect();
        assert_eq!(first_ids, vec![ids[3], ids[2], ids[1]]);
        assert!(first.has_next);

        let second = follow_index(&store, reader.id, Some(2)).await.unwrap();
        let second_ids: Vec<_> = second.items.iter().map(|post| post.id).collect();
        assert_eq!(second_ids, vec![ids[0]]);
        assert!(!second.has_next);
        assert!(second.has_previous);
    }

    #[tokio::test]
    async fn follow_feed_is_empty_when_following_no_one() {
        let store = MemStore::new();
        let loner = store.add_user("loner");
        let other = store.add_user("other");
        store.create_post(other.id, new_post("unseen", None)).await.unwrap();

        let page = follow_index(&store, loner.id, None).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }
}
