//! SQLite post repository implementation.
//!
//! Listing queries rank the filtered rows with `ROW_NUMBER()` so that the
//! cursor seek, `skip` and `take` all apply to one consistent ordering,
//! including the derived `activity` (comment count) key.

use chrono::{DateTime, Utc};
use postboard_core::listing::{fold_case, QueryOptions};
use postboard_core::repository::post::{NewComment, NewPost, PostRepository};
use postboard_types::comment::Comment;
use postboard_types::error::RepositoryError;
use postboard_types::listing::{SortDirection, SortKey};
use postboard_types::post::{Post, PostId};
use postboard_types::user::{User, UserId};
use postboard_types::vote::Vote;
use sqlx::Row;

use super::pool::{format_datetime, parse_datetime, query_error, DatabasePool};
use super::user::UserRow;

/// SQLite-backed implementation of `PostRepository`.
#[derive(Clone)]
pub struct SqlitePostRepository {
    pool: DatabasePool,
}

impl SqlitePostRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str =
    "id, title, body, header_image_url, score, author_id, created_at, updated_at";

/// Internal row type for mapping SQLite rows to domain Post.
struct PostRow {
    id: i64,
    title: String,
    body: String,
    header_image_url: Option<String>,
    score: i64,
    author_id: i64,
    created_at: String,
    updated_at: String,
}

impl PostRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            body: row.try_get("body")?,
            header_image_url: row.try_get("header_image_url")?,
            score: row.try_get("score")?,
            author_id: row.try_get("author_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_post(self) -> Result<Post, RepositoryError> {
        Ok(Post {
            id: PostId(self.id),
            title: self.title,
            body: self.body,
            header_image_url: self.header_image_url,
            score: self.score,
            author_id: UserId(self.author_id),
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn comment_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Comment, RepositoryError> {
    let created_at: String = row.try_get("created_at").map_err(query_error)?;
    Ok(Comment {
        id: row.try_get("id").map_err(query_error)?,
        post_id: PostId(row.try_get("post_id").map_err(query_error)?),
        author_id: UserId(row.try_get("author_id").map_err(query_error)?),
        body: row.try_get("body").map_err(query_error)?,
        created_at: parse_datetime(&created_at)?,
    })
}

fn vote_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Vote, RepositoryError> {
    let created_at: String = row.try_get("created_at").map_err(query_error)?;
    Ok(Vote {
        id: row.try_get("id").map_err(query_error)?,
        post_id: PostId(row.try_get("post_id").map_err(query_error)?),
        user_id: UserId(row.try_get("user_id").map_err(query_error)?),
        value: row.try_get("value").map_err(query_error)?,
        created_at: parse_datetime(&created_at)?,
    })
}

/// A missing parent row surfaces as a foreign key violation.
fn missing_parent(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::Database(db_err) if db_err.message().contains("FOREIGN KEY") => {
            RepositoryError::NotFound
        }
        e => query_error(e),
    }
}

/// Build the listing statement for `options`. Returns the SQL with `?`
/// placeholders in bind order: filter needle (twice), author, cursor, limit, offset.
fn listing_sql(options: &QueryOptions) -> String {
    let mut conditions = String::new();
    if options.filter.is_some() {
        conditions.push_str(
            " AND (instr(p.title_folded, ?) > 0 OR instr(p.body_folded, ?) > 0)",
        );
    }
    if options.author.is_some() {
        conditions.push_str(" AND p.author_id = ?");
    }

    // Whitelisted through the enum; never interpolate client text here.
    let sort_column = match options.order_by.key {
        SortKey::CreatedAt => "created_at",
        SortKey::Activity => "activity",
        SortKey::Score => "score",
    };
    let direction = match options.order_by.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };

    let seek = if options.cursor.is_some() {
        " WHERE position >= (SELECT position FROM ranked WHERE id = ?)"
    } else {
        ""
    };

    format!(
        "WITH base AS (
             SELECT p.id, p.title, p.body, p.header_image_url, p.score, p.author_id, p.created_at, p.updated_at,
                    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS activity
             FROM posts p
             WHERE 1 = 1{conditions}
         ),
         ranked AS (
             SELECT base.*, ROW_NUMBER() OVER (ORDER BY {sort_column} {direction}, id ASC) AS position
             FROM base
         )
         SELECT {POST_COLUMNS} FROM ranked{seek}
         ORDER BY position
         LIMIT ? OFFSET ?"
    )
}

impl PostRepository for SqlitePostRepository {
    async fn find_many(&self, options: &QueryOptions) -> Result<Vec<Post>, RepositoryError> {
        let sql = listing_sql(options);

        let mut query = sqlx::query(&sql);
        if let Some(filter) = &options.filter {
            query = query.bind(&filter.contains).bind(&filter.contains);
        }
        if let Some(author) = options.author {
            query = query.bind(author.0);
        }
        if let Some(cursor) = options.cursor {
            query = query.bind(cursor.0);
        }
        // SQLite treats a negative LIMIT as "no limit".
        query = query
            .bind(options.take.unwrap_or(-1))
            .bind(options.skip.unwrap_or(0));

        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let mut posts = Vec::with_capacity(rows.len());
        for row in &rows {
            posts.push(PostRow::from_row(row).map_err(query_error)?.into_post()?);
        }
        Ok(posts)
    }

    async fn find_unique(&self, id: PostId) -> Result<Option<Post>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(PostRow::from_row(&row).map_err(query_error)?.into_post()?)),
            None => Ok(None),
        }
    }

    async fn create(&self, post: &NewPost) -> Result<Post, RepositoryError> {
        let created_at = format_datetime(&post.created_at);

        let result = sqlx::query(
            "INSERT INTO posts (title, body, title_folded, body_folded, header_image_url, score, author_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?)",
        )
        .bind(&post.title)
        .bind(&post.body)
        .bind(fold_case(&post.title))
        .bind(fold_case(&post.body))
        .bind(&post.header_image_url)
        .bind(post.author_id.0)
        .bind(&created_at)
        .bind(&created_at)
        .execute(&self.pool.writer)
        .await
        .map_err(missing_parent)?;

        Ok(Post {
            id: PostId(result.last_insert_rowid()),
            title: post.title.clone(),
            body: post.body.clone(),
            header_image_url: post.header_image_url.clone(),
            score: 0,
            author_id: post.author_id,
            created_at: post.created_at,
            updated_at: post.created_at,
        })
    }

    async fn update(&self, post: &Post) -> Result<Post, RepositoryError> {
        let result = sqlx::query(
            "UPDATE posts SET title = ?, body = ?, title_folded = ?, body_folded = ?, header_image_url = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&post.title)
        .bind(&post.body)
        .bind(fold_case(&post.title))
        .bind(fold_case(&post.body))
        .bind(&post.header_image_url)
        .bind(format_datetime(&post.updated_at))
        .bind(post.id.0)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(post.clone())
    }

    async fn delete(&self, id: PostId) -> Result<(), RepositoryError> {
        // Comments and votes go with it (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn author(&self, id: PostId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            "SELECT u.id, u.username, u.email, u.roles, u.created_at
             FROM users u JOIN posts p ON p.author_id = u.id
             WHERE p.id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(UserRow::from_row(&row).map_err(query_error)?.into_user()?)),
            None => Ok(None),
        }
    }

    async fn comments(&self, id: PostId) -> Result<Vec<Comment>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, post_id, author_id, body, created_at FROM comments
             WHERE post_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(id.0)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(comment_from_row).collect()
    }

    async fn votes(&self, id: PostId) -> Result<Vec<Vote>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, post_id, user_id, value, created_at FROM votes WHERE post_id = ? ORDER BY id ASC",
        )
        .bind(id.0)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(vote_from_row).collect()
    }

    async fn count_comments(&self, id: PostId) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE post_id = ?")
            .bind(id.0)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;

        Ok(count.max(0) as u64)
    }

    async fn add_comment(&self, comment: &NewComment) -> Result<Comment, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO comments (post_id, author_id, body, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(comment.post_id.0)
        .bind(comment.author_id.0)
        .bind(&comment.body)
        .bind(format_datetime(&comment.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(missing_parent)?;

        Ok(Comment {
            id: result.last_insert_rowid(),
            post_id: comment.post_id,
            author_id: comment.author_id,
            body: comment.body.clone(),
            created_at: comment.created_at,
        })
    }

    async fn upsert_vote(
        &self,
        post: PostId,
        user: UserId,
        value: i64,
        at: DateTime<Utc>,
    ) -> Result<Vote, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        sqlx::query(
            "INSERT INTO votes (post_id, user_id, value, created_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(post_id, user_id) DO UPDATE SET value = excluded.value, created_at = excluded.created_at",
        )
        .bind(post.0)
        .bind(user.0)
        .bind(value)
        .bind(format_datetime(&at))
        .execute(&mut *tx)
        .await
        .map_err(missing_parent)?;

        sqlx::query(
            "UPDATE posts SET score = (SELECT COALESCE(SUM(value), 0) FROM votes WHERE post_id = ?)
             WHERE id = ?",
        )
        .bind(post.0)
        .bind(post.0)
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;

        let row = sqlx::query(
            "SELECT id, post_id, user_id, value, created_at FROM votes WHERE post_id = ? AND user_id = ?",
        )
        .bind(post.0)
        .bind(user.0)
        .fetch_one(&mut *tx)
        .await
        .map_err(query_error)?;
        let vote = vote_from_row(&row)?;

        tx.commit().await.map_err(query_error)?;

        tracing::debug!(post_id = %post, user_id = %user, value, "vote recorded");
        Ok(vote)
    }
}
