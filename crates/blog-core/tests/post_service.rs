// crates/blog-core/tests/post_service.rs
// ============================================================================
// Module: Post Service Tests
// Description: Error rules and responses of the post service.
// Purpose: Ensure each failure path yields the documented category and message.
// Dependencies: blog-core
// ============================================================================

//! Post service behavior tests over the in-memory store.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use blog_core::BlogError;
use blog_core::Comment;
use blog_core::CommentId;
use blog_core::CommentStore;
use blog_core::DEFAULT_IMAGE_CONTENT_TYPE;
use blog_core::ELLIPSIS;
use blog_core::InMemoryBlogStore;
use blog_core::NewPost;
use blog_core::Post;
use blog_core::PostFilter;
use blog_core::PostId;
use blog_core::PostImage;
use blog_core::PostPage;
use blog_core::PostRequest;
use blog_core::PostService;
use blog_core::PostStore;
use blog_core::SharedBlogStore;
use blog_core::StoreError;

fn service() -> PostService {
    PostService::new(SharedBlogStore::from_store(InMemoryBlogStore::new()))
}

fn request(title: &str, text: &str, tags: &[&str]) -> PostRequest {
    PostRequest {
        id: None,
        title: Some(title.to_string()),
        text: Some(text.to_string()),
        tags: Some(tags.iter().map(ToString::to_string).collect()),
    }
}

#[test]
fn create_normalizes_tags_and_starts_counters_at_zero() {
    let service = service();
    let post = service.create_post(&request("T", "Body", &[" Rust ", "rust", "WEB"])).unwrap();
    assert_eq!(post.tags, vec!["rust".to_string(), "web".to_string()]);
    assert_eq!(post.likes_count, 0);
    assert_eq!(post.comments_count, 0);
}

#[test]
fn listing_truncates_but_single_get_does_not() {
    let service = service();
    let long = "x".repeat(300);
    let created = service.create_post(&request("T", &long, &[])).unwrap();
    let page = service.get_posts("", 1, 10).unwrap();
    assert!(page.posts[0].text.ends_with(ELLIPSIS));
    assert_eq!(service.get_post(created.id.get()).unwrap().text, long);
}

#[test]
fn listing_rejects_page_past_end() {
    let service = service();
    service.create_post(&request("T", "Body", &[])).unwrap();
    let err = service.get_posts("", 2, 1).unwrap_err();
    assert_eq!(err.message(), "Requested page exceeds the total number of pages.");
    assert!(matches!(service.get_posts("", 0, 1), Err(BlogError::Validation(_))));
}

#[test]
fn listing_reports_navigation() {
    let service = service();
    for index in 0 .. 5 {
        service.create_post(&request(&format!("Post {index}"), "Body", &["all"])).unwrap();
    }
    let page = service.get_posts("#all post", 2, 2).unwrap();
    assert_eq!(page.posts.len(), 2);
    assert!(page.has_prev);
    assert!(page.has_next);
    assert_eq!(page.last_page, 3);
    assert_eq!(page.posts[0].title, "Post 2");
}

#[test]
fn missing_post_messages() {
    let service = service();
    assert_eq!(
        service.get_post(42).unwrap_err(),
        BlogError::NotFound("Post with id = 42 was not found.".to_string())
    );
    assert!(matches!(service.delete_post(42), Err(BlogError::NotFound(_))));
    assert!(matches!(service.increment_likes(-1), Err(BlogError::NotFound(_))));
    assert!(matches!(service.get_image(42), Err(BlogError::NotFound(_))));
}

#[test]
fn update_checks_body_id_then_existence() {
    let service = service();
    let post = service.create_post(&request("T", "Body", &["a"])).unwrap();
    let mut body = request("New", "Text", &[]);
    body.id = Some(post.id.get() + 1);
    let err = service.update_post(post.id.get(), &body).unwrap_err();
    assert_eq!(
        err,
        BlogError::BadRequest("Post id in the path and request body must match.".to_string())
    );
    body.id = None;
    let updated = service.update_post(post.id.get(), &body).unwrap();
    assert_eq!(updated.title, "New");
    assert!(updated.tags.is_empty());
    assert!(matches!(service.update_post(999, &body), Err(BlogError::NotFound(_))));
}

#[test]
fn likes_increment_by_one() {
    let service = service();
    let post = service.create_post(&request("T", "Body", &[])).unwrap();
    assert_eq!(service.increment_likes(post.id.get()).unwrap(), 1);
    assert_eq!(service.increment_likes(post.id.get()).unwrap(), 2);
    assert_eq!(service.get_post(post.id.get()).unwrap().likes_count, 2);
}

#[test]
fn image_rules() {
    let service = service();
    let post = service.create_post(&request("T", "Body", &[])).unwrap();
    let id = post.id.get();
    assert_eq!(
        service.get_image(id).unwrap_err(),
        BlogError::Image(format!("Image for post with id = {id} is not available."))
    );
    assert_eq!(
        service.update_image(id, Vec::new(), Some("image/png")).unwrap_err(),
        BlogError::Image("Image cannot be empty.".to_string())
    );
    assert!(matches!(service.update_image(id + 1, vec![1], None), Err(BlogError::NotFound(_))));
    service.update_image(id, vec![1, 2], Some("image/png")).unwrap();
    assert_eq!(service.get_image(id).unwrap().content_type, "image/png");
    service.update_image(id, vec![3], Some("application/octet-stream")).unwrap();
    let image = service.get_image(id).unwrap();
    assert_eq!(image.content_type, DEFAULT_IMAGE_CONTENT_TYPE);
    assert_eq!(image.bytes, vec![3]);
}

#[test]
fn cleanup_reports_removed_tags() {
    let service = service();
    let post = service.create_post(&request("T", "Body", &["old"])).unwrap();
    service.update_post(post.id.get(), &request("T", "Body", &["new"])).unwrap();
    assert_eq!(service.cleanup_unused_tags().unwrap(), 1);
}

// ============================================================================
// SECTION: Refused Image Writes
// ============================================================================

/// In-memory store whose image writes report that no row changed.
#[derive(Default)]
struct ImageRefusingStore {
    inner: InMemoryBlogStore,
}

impl PostStore for ImageRefusingStore {
    fn find_posts(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Post>, StoreError> {
        self.inner.find_posts(filter, limit, offset)
    }

    fn count_posts(&self, filter: &PostFilter) -> Result<u64, StoreError> {
        self.inner.count_posts(filter)
    }

    fn find_page(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> Result<PostPage, StoreError> {
        self.inner.find_page(filter, limit, offset)
    }

    fn find_post(&self, post_id: PostId) -> Result<Option<Post>, StoreError> {
        self.inner.find_post(post_id)
    }

    fn post_exists(&self, post_id: PostId) -> Result<bool, StoreError> {
        self.inner.post_exists(post_id)
    }

    fn create_post(&self, post: &NewPost) -> Result<Post, StoreError> {
        self.inner.create_post(post)
    }

    fn update_post(&self, post_id: PostId, post: &NewPost) -> Result<Option<Post>, StoreError> {
        self.inner.update_post(post_id, post)
    }

    fn delete_post(&self, post_id: PostId) -> Result<bool, StoreError> {
        self.inner.delete_post(post_id)
    }

    fn increment_likes(&self, post_id: PostId) -> Result<Option<u32>, StoreError> {
        self.inner.increment_likes(post_id)
    }

    fn update_image(&self, _post_id: PostId, _image: &PostImage) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn find_image(&self, post_id: PostId) -> Result<Option<Option<PostImage>>, StoreError> {
        self.inner.find_image(post_id)
    }

    fn cleanup_unused_tags(&self) -> Result<u64, StoreError> {
        self.inner.cleanup_unused_tags()
    }
}

impl CommentStore for ImageRefusingStore {
    fn find_comments(&self, post_id: PostId) -> Result<Vec<Comment>, StoreError> {
        self.inner.find_comments(post_id)
    }

    fn find_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
    ) -> Result<Option<Comment>, StoreError> {
        self.inner.find_comment(post_id, comment_id)
    }

    fn comment_exists(&self, post_id: PostId, comment_id: CommentId) -> Result<bool, StoreError> {
        self.inner.comment_exists(post_id, comment_id)
    }

    fn create_comment(&self, post_id: PostId, text: &str) -> Result<Comment, StoreError> {
        self.inner.create_comment(post_id, text)
    }

    fn update_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
        text: &str,
    ) -> Result<Option<Comment>, StoreError> {
        self.inner.update_comment(post_id, comment_id, text)
    }

    fn delete_comment(&self, post_id: PostId, comment_id: CommentId) -> Result<bool, StoreError> {
        self.inner.delete_comment(post_id, comment_id)
    }
}

#[test]
fn refused_image_write_is_image_error() {
    let service =
        PostService::new(SharedBlogStore::from_store(ImageRefusingStore::default()));
    let id = service.create_post(&request("T", "Body", &[])).unwrap().id.get();
    let err = service.update_image(id, vec![1, 2, 3], Some("image/png")).unwrap_err();
    assert_eq!(err, BlogError::Image("Failed to update image.".to_string()));
    assert!(matches!(service.get_image(id), Err(BlogError::Image(_))));
}
