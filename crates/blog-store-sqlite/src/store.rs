// crates/blog-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Blog Store
// Description: Durable blog store backed by SQLite WAL.
// Purpose: Persist posts, tags, links, comments, and images.
// Dependencies: blog-core, rusqlite, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! This module implements the blog store traits using `SQLite`. Every trait
//! call that touches more than one row runs inside a single transaction, so
//! comment counters and tag links never drift from the rows they describe.
//! Titles are stored alongside a lower-cased copy computed in Rust, which keeps
//! case-insensitive search consistent for non-ASCII text.
//! Security posture: database contents are untrusted; rows with out-of-range
//! counters or identifiers fail closed as corruption.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use blog_core::Comment;
use blog_core::CommentId;
use blog_core::CommentStore;
use blog_core::NewPost;
use blog_core::Post;
use blog_core::PostFilter;
use blog_core::PostId;
use blog_core::PostImage;
use blog_core::PostPage;
use blog_core::PostStore;
use blog_core::StoreError;
use blog_core::Tag;
use blog_core::TagId;
use blog_core::Timestamp;
use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Column list for post rows.
const POST_COLUMNS: &str =
    "p.id, p.title, p.text, p.likes_count, p.comments_count, p.created_at, p.updated_at";
/// Column list for comment rows.
const COMMENT_COLUMNS: &str = "id, post_id, text, created_at, updated_at";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode.
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` blog store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Builds a config with default pragmas for the given path.
    #[must_use]
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding post text or image payloads.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Write violated a constraint.
    #[error("sqlite store conflict: {0}")]
    Conflict(String),
    /// Store corruption.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data or arguments.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Conflict(message) => Self::Conflict(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

/// Maps a `rusqlite` error, separating constraint violations.
#[allow(clippy::needless_pass_by_value, reason = "Used directly as a map_err callback.")]
fn db_error(err: rusqlite::Error) -> SqliteStoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            SqliteStoreError::Conflict(err.to_string())
        }
        _ => SqliteStoreError::Db(err.to_string()),
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed blog store with WAL support.
///
/// # Invariants
/// - Connection access is serialized through a mutex.
/// - Foreign keys are enforced; deleting a post cascades to links and comments.
#[derive(Clone)]
pub struct SqliteBlogStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteBlogStore {
    /// Opens an `SQLite`-backed blog store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        debug!(path = %config.path.display(), "opened sqlite blog store");
        Ok(Self { config, connection: Arc::new(Mutex::new(connection)) })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Locks the shared connection.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite mutex poisoned".to_string()))
    }
}

impl PostStore for SqliteBlogStore {
    fn find_posts(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Post>, StoreError> {
        let connection = self.lock()?;
        Ok(select_posts(&connection, filter, limit, offset)?)
    }

    fn count_posts(&self, filter: &PostFilter) -> Result<u64, StoreError> {
        let connection = self.lock()?;
        Ok(count_matching(&connection, filter)?)
    }

    fn find_page(
        &self,
        filter: &PostFilter,
        limit: u64,
        offset: u64,
    ) -> Result<PostPage, StoreError> {
        let mut connection = self.lock()?;
        let tx = connection.transaction().map_err(db_error)?;
        let total = count_matching(&tx, filter)?;
        let posts = select_posts(&tx, filter, limit, offset)?;
        tx.commit().map_err(db_error)?;
        Ok(PostPage { posts, total })
    }

    fn find_post(&self, post_id: PostId) -> Result<Option<Post>, StoreError> {
        let connection = self.lock()?;
        Ok(load_post(&connection, post_id)?)
    }

    fn post_exists(&self, post_id: PostId) -> Result<bool, StoreError> {
        let connection = self.lock()?;
        let exists: bool = connection
            .query_row("SELECT EXISTS(SELECT 1 FROM post WHERE id = ?1)", params![post_id.get()], |row| {
                row.get(0)
            })
            .map_err(db_error)?;
        Ok(exists)
    }

    fn create_post(&self, post: &NewPost) -> Result<Post, StoreError> {
        let mut connection = self.lock()?;
        let tx = connection.transaction().map_err(db_error)?;
        let now = Timestamp::now().as_unix_millis();
        tx.execute(
            "INSERT INTO post (title, title_lower, text, likes_count, comments_count, created_at, \
             updated_at) VALUES (?1, ?2, ?3, 0, 0, ?4, ?4)",
            params![post.title, post.title.to_lowercase(), post.text, now],
        )
        .map_err(db_error)?;
        let post_id = parse_post_id(tx.last_insert_rowid())?;
        link_tags(&tx, post_id, &post.tags)?;
        let created = load_post(&tx, post_id)?.ok_or_else(|| {
            SqliteStoreError::Corrupt(format!("post {post_id} missing after insert"))
        })?;
        tx.commit().map_err(db_error)?;
        Ok(created)
    }

    fn update_post(&self, post_id: PostId, post: &NewPost) -> Result<Option<Post>, StoreError> {
        let mut connection = self.lock()?;
        let tx = connection.transaction().map_err(db_error)?;
        let changed = tx
            .execute(
                "UPDATE post SET title = ?1, title_lower = ?2, text = ?3, updated_at = ?4 WHERE \
                 id = ?5",
                params![
                    post.title,
                    post.title.to_lowercase(),
                    post.text,
                    Timestamp::now().as_unix_millis(),
                    post_id.get()
                ],
            )
            .map_err(db_error)?;
        if changed == 0 {
            return Ok(None);
        }
        unlink_stale_tags(&tx, post_id, &post.tags)?;
        link_tags(&tx, post_id, &post.tags)?;
        let updated = load_post(&tx, post_id)?;
        tx.commit().map_err(db_error)?;
        Ok(updated)
    }

    fn delete_post(&self, post_id: PostId) -> Result<bool, StoreError> {
        let connection = self.lock()?;
        let changed = connection
            .execute("DELETE FROM post WHERE id = ?1", params![post_id.get()])
            .map_err(db_error)?;
        Ok(changed > 0)
    }

    fn increment_likes(&self, post_id: PostId) -> Result<Option<u32>, StoreError> {
        let mut connection = self.lock()?;
        let tx = connection.transaction().map_err(db_error)?;
        let changed = tx
            .execute(
                "UPDATE post SET likes_count = likes_count + 1, updated_at = ?1 WHERE id = ?2",
                params![Timestamp::now().as_unix_millis(), post_id.get()],
            )
            .map_err(db_error)?;
        if changed == 0 {
            return Ok(None);
        }
        let likes: i64 = tx
            .query_row("SELECT likes_count FROM post WHERE id = ?1", params![post_id.get()], |row| {
                row.get(0)
            })
            .map_err(db_error)?;
        tx.commit().map_err(db_error)?;
        Ok(Some(to_counter(likes, "likes_count")?))
    }

    fn update_image(&self, post_id: PostId, image: &PostImage) -> Result<bool, StoreError> {
        let connection = self.lock()?;
        let changed = connection
            .execute(
                "UPDATE post SET image = ?1, image_content_type = ?2, updated_at = ?3 WHERE id = ?4",
                params![
                    image.bytes,
                    image.content_type,
                    Timestamp::now().as_unix_millis(),
                    post_id.get()
                ],
            )
            .map_err(db_error)?;
        Ok(changed > 0)
    }

    fn find_image(&self, post_id: PostId) -> Result<Option<Option<PostImage>>, StoreError> {
        let connection = self.lock()?;
        let row: Option<(Option<Vec<u8>>, Option<String>)> = connection
            .query_row(
                "SELECT image, image_content_type FROM post WHERE id = ?1",
                params![post_id.get()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(db_error)?;
        Ok(row.map(|(bytes, content_type)| {
            bytes.map(|bytes| PostImage {
                bytes,
                content_type: content_type
                    .unwrap_or_else(|| blog_core::DEFAULT_IMAGE_CONTENT_TYPE.to_string()),
            })
        }))
    }

    fn cleanup_unused_tags(&self) -> Result<u64, StoreError> {
        let connection = self.lock()?;
        let removed = connection
            .execute("DELETE FROM tag WHERE id NOT IN (SELECT DISTINCT tag_id FROM post_tag)", [])
            .map_err(db_error)?;
        Ok(u64::try_from(removed).map_err(|err| SqliteStoreError::Invalid(err.to_string()))?)
    }

    fn readiness(&self) -> Result<(), StoreError> {
        let connection = self.lock()?;
        connection.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)).map_err(db_error)?;
        Ok(())
    }
}

impl CommentStore for SqliteBlogStore {
    fn find_comments(&self, post_id: PostId) -> Result<Vec<Comment>, StoreError> {
        let connection = self.lock()?;
        let mut stmt = connection
            .prepare(&format!(
                "SELECT {COMMENT_COLUMNS} FROM comment WHERE post_id = ?1 ORDER BY created_at \
                 DESC, id DESC"
            ))
            .map_err(db_error)?;
        let rows = stmt
            .query_map(params![post_id.get()], map_comment_row)
            .map_err(db_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_error)?;
        Ok(rows.into_iter().map(build_comment).collect::<Result<Vec<_>, _>>()?)
    }

    fn find_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
    ) -> Result<Option<Comment>, StoreError> {
        let connection = self.lock()?;
        Ok(load_comment(&connection, post_id, comment_id)?)
    }

    fn comment_exists(&self, post_id: PostId, comment_id: CommentId) -> Result<bool, StoreError> {
        let connection = self.lock()?;
        let exists: bool = connection
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM comment WHERE id = ?1 AND post_id = ?2)",
                params![comment_id.get(), post_id.get()],
                |row| row.get(0),
            )
            .map_err(db_error)?;
        Ok(exists)
    }

    fn create_comment(&self, post_id: PostId, text: &str) -> Result<Comment, StoreError> {
        let mut connection = self.lock()?;
        let tx = connection.transaction().map_err(db_error)?;
        let now = Timestamp::now().as_unix_millis();
        let changed = tx
            .execute(
                "UPDATE post SET comments_count = comments_count + 1, updated_at = ?1 WHERE id = ?2",
                params![now, post_id.get()],
            )
            .map_err(db_error)?;
        if changed == 0 {
            return Err(StoreError::Conflict(format!("post {post_id} does not exist")));
        }
        tx.execute(
            "INSERT INTO comment (post_id, text, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![post_id.get(), text, now],
        )
        .map_err(db_error)?;
        let comment_id = parse_comment_id(tx.last_insert_rowid())?;
        let comment = load_comment(&tx, post_id, comment_id)?.ok_or_else(|| {
            SqliteStoreError::Corrupt(format!("comment {comment_id} missing after insert"))
        })?;
        tx.commit().map_err(db_error)?;
        Ok(comment)
    }

    fn update_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
        text: &str,
    ) -> Result<Option<Comment>, StoreError> {
        let mut connection = self.lock()?;
        let tx = connection.transaction().map_err(db_error)?;
        let changed = tx
            .execute(
                "UPDATE comment SET text = ?1, updated_at = ?2 WHERE id = ?3 AND post_id = ?4",
                params![text, Timestamp::now().as_unix_millis(), comment_id.get(), post_id.get()],
            )
            .map_err(db_error)?;
        if changed == 0 {
            return Ok(None);
        }
        let comment = load_comment(&tx, post_id, comment_id)?;
        tx.commit().map_err(db_error)?;
        Ok(comment)
    }

    fn delete_comment(&self, post_id: PostId, comment_id: CommentId) -> Result<bool, StoreError> {
        let mut connection = self.lock()?;
        let tx = connection.transaction().map_err(db_error)?;
        let removed = tx
            .execute(
                "DELETE FROM comment WHERE id = ?1 AND post_id = ?2",
                params![comment_id.get(), post_id.get()],
            )
            .map_err(db_error)?;
        if removed == 0 {
            return Ok(false);
        }
        tx.execute(
            "UPDATE post SET comments_count = MAX(comments_count - 1, 0), updated_at = ?1 WHERE \
             id = ?2",
            params![Timestamp::now().as_unix_millis(), post_id.get()],
        )
        .map_err(db_error)?;
        tx.commit().map_err(db_error)?;
        Ok(true)
    }
}

// ============================================================================
// SECTION: Rows
// ============================================================================

/// Raw post row before range checks.
#[derive(Debug)]
struct PostRow {
    /// Post identifier.
    id: i64,
    /// Post title.
    title: String,
    /// Post text.
    text: String,
    /// Like counter.
    likes_count: i64,
    /// Comment counter.
    comments_count: i64,
    /// Creation time (unix ms).
    created_at: i64,
    /// Modification time (unix ms).
    updated_at: i64,
}

/// Raw comment row before range checks.
#[derive(Debug)]
struct CommentRow {
    /// Comment identifier.
    id: i64,
    /// Owning post identifier.
    post_id: i64,
    /// Comment text.
    text: String,
    /// Creation time (unix ms).
    created_at: i64,
    /// Modification time (unix ms).
    updated_at: i64,
}

/// Reads a post row selected with [`POST_COLUMNS`].
fn map_post_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        title: row.get(1)?,
        text: row.get(2)?,
        likes_count: row.get(3)?,
        comments_count: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Reads a comment row selected with [`COMMENT_COLUMNS`].
fn map_comment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        post_id: row.get(1)?,
        text: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

/// Converts a post row and attaches its tags.
fn build_post(connection: &Connection, row: PostRow) -> Result<Post, SqliteStoreError> {
    let id = parse_post_id(row.id)?;
    Ok(Post {
        id,
        title: row.title,
        text: row.text,
        tags: load_tags(connection, id)?,
        likes_count: to_counter(row.likes_count, "likes_count")?,
        comments_count: to_counter(row.comments_count, "comments_count")?,
        created_at: Timestamp::from_unix_millis(row.created_at),
        updated_at: Timestamp::from_unix_millis(row.updated_at),
    })
}

/// Converts a comment row.
fn build_comment(row: CommentRow) -> Result<Comment, SqliteStoreError> {
    Ok(Comment {
        id: parse_comment_id(row.id)?,
        post_id: parse_post_id(row.post_id)?,
        text: row.text,
        created_at: Timestamp::from_unix_millis(row.created_at),
        updated_at: Timestamp::from_unix_millis(row.updated_at),
    })
}

// ============================================================================
// SECTION: Queries
// ============================================================================

/// Builds the WHERE clause and bind values for a post filter.
fn filter_clause(filter: &PostFilter) -> (String, Vec<Value>) {
    let mut conditions = Vec::new();
    let mut values = Vec::new();
    if !filter.title.is_empty() {
        conditions.push("instr(p.title_lower, ?) > 0".to_string());
        values.push(Value::Text(filter.title.clone()));
    }
    if !filter.tags.is_empty() {
        let placeholders = vec!["?"; filter.tags.len()].join(", ");
        conditions.push(format!(
            "p.id IN (SELECT pt.post_id FROM post_tag pt JOIN tag t ON t.id = pt.tag_id WHERE \
             t.name IN ({placeholders}) GROUP BY pt.post_id HAVING COUNT(DISTINCT t.name) = ?)"
        ));
        values.extend(filter.tags.iter().cloned().map(Value::Text));
        values.push(Value::Integer(i64::try_from(filter.tags.len()).unwrap_or(i64::MAX)));
    }
    if conditions.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), values)
    }
}

/// Loads a post with its tags.
fn load_post(connection: &Connection, post_id: PostId) -> Result<Option<Post>, SqliteStoreError> {
    let row = connection
        .query_row(
            &format!("SELECT {POST_COLUMNS} FROM post p WHERE p.id = ?1"),
            params![post_id.get()],
            map_post_row,
        )
        .optional()
        .map_err(db_error)?;
    row.map(|row| build_post(connection, row)).transpose()
}

/// Loads the tags linked to a post, ordered by name.
fn load_tags(connection: &Connection, post_id: PostId) -> Result<Vec<Tag>, SqliteStoreError> {
    let mut stmt = connection
        .prepare_cached(
            "SELECT t.id, t.name FROM tag t JOIN post_tag pt ON pt.tag_id = t.id WHERE \
             pt.post_id = ?1 ORDER BY t.name",
        )
        .map_err(db_error)?;
    let rows = stmt
        .query_map(params![post_id.get()], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))
        .map_err(db_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(db_error)?;
    rows.into_iter()
        .map(|(raw, name)| {
            let id = TagId::from_raw(raw)
                .ok_or_else(|| SqliteStoreError::Corrupt(format!("invalid tag id {raw}")))?;
            Ok(Tag { id, name })
        })
        .collect()
}

/// Loads one comment scoped to its post.
fn load_comment(
    connection: &Connection,
    post_id: PostId,
    comment_id: CommentId,
) -> Result<Option<Comment>, SqliteStoreError> {
    let row = connection
        .query_row(
            &format!("SELECT {COMMENT_COLUMNS} FROM comment WHERE id = ?1 AND post_id = ?2"),
            params![comment_id.get(), post_id.get()],
            map_comment_row,
        )
        .optional()
        .map_err(db_error)?;
    row.map(build_comment).transpose()
}

/// Inserts missing tags and links every tag in `tags` to the post.
fn link_tags(
    connection: &Connection,
    post_id: PostId,
    tags: &BTreeSet<String>,
) -> Result<(), SqliteStoreError> {
    for name in tags {
        connection
            .execute("INSERT INTO tag (name) VALUES (?1) ON CONFLICT(name) DO NOTHING", params![name])
            .map_err(db_error)?;
        connection
            .execute(
                "INSERT OR IGNORE INTO post_tag (post_id, tag_id) SELECT ?1, id FROM tag WHERE \
                 name = ?2",
                params![post_id.get(), name],
            )
            .map_err(db_error)?;
    }
    Ok(())
}

/// Removes links to tags outside `tags`; an empty set clears every link.
fn unlink_stale_tags(
    connection: &Connection,
    post_id: PostId,
    tags: &BTreeSet<String>,
) -> Result<(), SqliteStoreError> {
    if tags.is_empty() {
        connection
            .execute("DELETE FROM post_tag WHERE post_id = ?1", params![post_id.get()])
            .map_err(db_error)?;
        return Ok(());
    }
    let placeholders = vec!["?"; tags.len()].join(", ");
    let sql = format!(
        "DELETE FROM post_tag WHERE post_id = ? AND tag_id NOT IN (SELECT id FROM tag WHERE name \
         IN ({placeholders}))"
    );
    let mut values = vec![Value::Integer(post_id.get())];
    values.extend(tags.iter().cloned().map(Value::Text));
    connection.execute(&sql, params_from_iter(values)).map_err(db_error)?;
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a stored post id.
fn parse_post_id(raw: i64) -> Result<PostId, SqliteStoreError> {
    PostId::from_raw(raw).ok_or_else(|| SqliteStoreError::Corrupt(format!("invalid post id {raw}")))
}

/// Converts a stored comment id.
fn parse_comment_id(raw: i64) -> Result<CommentId, SqliteStoreError> {
    CommentId::from_raw(raw)
        .ok_or_else(|| SqliteStoreError::Corrupt(format!("invalid comment id {raw}")))
}

/// Converts a stored counter into `u32`.
fn to_counter(raw: i64, column: &str) -> Result<u32, SqliteStoreError> {
    u32::try_from(raw)
        .map_err(|_| SqliteStoreError::Corrupt(format!("{column} out of range: {raw}")))
}

/// Selects one window of matching posts, newest first.
fn select_posts(
    connection: &Connection,
    filter: &PostFilter,
    limit: u64,
    offset: u64,
) -> Result<Vec<Post>, SqliteStoreError> {
    let (clause, mut values) = filter_clause(filter);
    values.push(Value::Integer(clamp_i64(limit)));
    values.push(Value::Integer(clamp_i64(offset)));
    let sql = format!(
        "SELECT {POST_COLUMNS} FROM post p{clause} ORDER BY p.created_at DESC, p.id DESC \
         LIMIT ? OFFSET ?"
    );
    let rows = {
        let mut stmt = connection.prepare(&sql).map_err(db_error)?;
        stmt.query_map(params_from_iter(values), map_post_row)
            .map_err(db_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_error)?
    };
    rows.into_iter().map(|row| build_post(connection, row)).collect()
}

/// Counts posts matching a filter.
fn count_matching(connection: &Connection, filter: &PostFilter) -> Result<u64, SqliteStoreError> {
    let (clause, values) = filter_clause(filter);
    let sql = format!("SELECT COUNT(1) FROM post p{clause}");
    let count: i64 = connection
        .query_row(&sql, params_from_iter(values), |row| row.get(0))
        .map_err(db_error)?;
    u64::try_from(count).map_err(|_| SqliteStoreError::Corrupt("negative count".into()))
}

/// Converts a window bound, saturating at the largest `SQLite` integer.
fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path.display().to_string().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    if path
        .components()
        .any(|component| component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH)
    {
        return Err(SqliteStoreError::Invalid(
            "store path contains an overlong component".to_string(),
        ));
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags).map_err(db_error)?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability and cascades.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection.execute_batch("PRAGMA foreign_keys = ON;").map_err(db_error)?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(db_error)?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(db_error)?;
    connection.busy_timeout(Duration::from_millis(config.busy_timeout_ms)).map_err(db_error)?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(db_error)?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(db_error)?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(db_error)?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(db_error)?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS post (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    title_lower TEXT NOT NULL,
                    text TEXT NOT NULL,
                    likes_count INTEGER NOT NULL DEFAULT 0,
                    comments_count INTEGER NOT NULL DEFAULT 0,
                    image BLOB,
                    image_content_type TEXT,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_post_created ON post (created_at DESC, id DESC);
                CREATE TABLE IF NOT EXISTS tag (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL UNIQUE
                );
                CREATE TABLE IF NOT EXISTS post_tag (
                    post_id INTEGER NOT NULL REFERENCES post(id) ON DELETE CASCADE,
                    tag_id INTEGER NOT NULL REFERENCES tag(id) ON DELETE CASCADE,
                    PRIMARY KEY (post_id, tag_id)
                );
                CREATE INDEX IF NOT EXISTS idx_post_tag_tag ON post_tag (tag_id);
                CREATE TABLE IF NOT EXISTS comment (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    post_id INTEGER NOT NULL REFERENCES post(id) ON DELETE CASCADE,
                    text TEXT NOT NULL,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_comment_post
                    ON comment (post_id, created_at DESC, id DESC);",
            )
            .map_err(db_error)?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(db_error)?;
    Ok(())
}
