//! Guestbook store: append-only greetings partitioned by guestbook name.
//!
//! Timestamps and identifiers are assigned here, never by callers, and every
//! read is a single statement so it observes one snapshot of the table.

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::AppError;
use crate::models::Greeting;

/// Insert that stamps `created_at` from the database clock, never earlier than
/// the newest greeting already in the same guestbook.
const INSERT_GREETING: &str = r#"
    INSERT INTO greetings (id, guestbook_name, author, content, created_at)
    SELECT ?, ?, ?, ?, MAX(
        strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
        COALESCE((SELECT MAX(created_at) FROM greetings WHERE guestbook_name = ?), '')
    )
    RETURNING id, guestbook_name, author, content, created_at
"#;

const SELECT_RECENT: &str = r#"
    SELECT id, guestbook_name, author, content, created_at
    FROM greetings
    WHERE guestbook_name = ?
    ORDER BY created_at DESC, seq DESC
    LIMIT ?
"#;

/// Read/write access to greetings. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct GuestbookStore {
    pool: SqlitePool,
}

impl GuestbookStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a greeting to `guestbook_name`.
    ///
    /// `author` and `content` are stored as given. The write is durable once
    /// this returns `Ok`; nothing is retried on failure.
    pub async fn append_greeting(
        &self,
        guestbook_name: &str,
        author: Option<&str>,
        content: Option<&str>,
    ) -> Result<Greeting, AppError> {
        require_name(guestbook_name)?;

        let id = uuid::Uuid::new_v4().to_string();
        let row = sqlx::query(INSERT_GREETING)
            .bind(&id)
            .bind(guestbook_name)
            .bind(author)
            .bind(content)
            .bind(guestbook_name)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_store_write)?;

        let greeting = greeting_from_row(&row).map_err(AppError::from_store_write)?;
        tracing::debug!(
            guestbook = %greeting.guestbook_name,
            id = %greeting.id,
            "Greeting stored"
        );
        Ok(greeting)
    }

    /// List at most `limit` greetings of `guestbook_name`, newest first.
    ///
    /// An unknown guestbook yields an empty list.
    pub async fn list_recent_greetings(
        &self,
        guestbook_name: &str,
        limit: u32,
    ) -> Result<Vec<Greeting>, AppError> {
        require_name(guestbook_name)?;
        if limit == 0 {
            return Err(AppError::Validation("Limit must be positive".to_string()));
        }

        let rows = sqlx::query(SELECT_RECENT)
            .bind(guestbook_name)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from_store_read)?;

        rows.iter()
            .map(greeting_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::from_store_read)
    }

    /// Close the pool. Later calls fail with `StoreUnavailable`.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn require_name(guestbook_name: &str) -> Result<(), AppError> {
    if guestbook_name.is_empty() {
        return Err(AppError::Validation(
            "Guestbook name is required".to_string(),
        ));
    }
    Ok(())
}

fn greeting_from_row(row: &SqliteRow) -> Result<Greeting, sqlx::Error> {
    Ok(Greeting {
        id: row.try_get("id")?,
        guestbook_name: row.try_get("guestbook_name")?,
        author: row.try_get("author")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
    })
}
