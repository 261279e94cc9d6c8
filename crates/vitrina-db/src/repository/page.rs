//! # Page Repository
//!
//! Informational pages of one store. The default set is written by
//! [`crate::StoreRepository::create_store`]; this repository edits them.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use vitrina_core::validation::ValidationResult;
use vitrina_core::{LocalizedText, Page, PageKind, ValidationError};

use crate::error::{DbError, DbResult};

#[derive(Debug, Clone, sqlx::FromRow)]
struct PageRecord {
    id: String,
    store_id: String,
    kind: PageKind,
    slug: String,
    title_es: String,
    title_en: String,
    content_es: String,
    content_en: String,
    is_published: bool,
    sort_order: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PageRecord> for Page {
    fn from(r: PageRecord) -> Self {
        Page {
            id: r.id,
            store_id: r.store_id,
            kind: r.kind,
            slug: r.slug,
            title: LocalizedText::new(r.title_es, r.title_en),
            content: LocalizedText::new(r.content_es, r.content_en),
            is_published: r.is_published,
            order: r.sort_order,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const PAGE_COLUMNS: &str = r#"
    id, store_id, kind, slug, title_es, title_en, content_es, content_en,
    is_published, sort_order, created_at, updated_at
"#;

/// Inserts one page on an existing connection or transaction.
pub(crate) async fn insert_page(conn: &mut SqliteConnection, page: &Page) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO pages (
            id, store_id, kind, slug, title_es, title_en, content_es, content_en,
            is_published, sort_order, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(&page.id)
    .bind(&page.store_id)
    .bind(page.kind)
    .bind(&page.slug)
    .bind(&page.title.es)
    .bind(&page.title.en)
    .bind(&page.content.es)
    .bind(&page.content.en)
    .bind(page.is_published)
    .bind(page.order)
    .bind(page.created_at)
    .bind(page.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

fn validate_title(title: &LocalizedText) -> ValidationResult<()> {
    if title.es.trim().is_empty() {
        return Err(ValidationError::required("title"));
    }
    Ok(())
}

/// Repository for one store's pages.
#[derive(Debug, Clone)]
pub struct PageRepository {
    pool: SqlitePool,
    store_id: String,
}

impl PageRepository {
    pub fn new(pool: SqlitePool, store_id: String) -> Self {
        PageRepository { pool, store_id }
    }

    pub async fn list(&self) -> DbResult<Vec<Page>> {
        let sql = format!(
            "SELECT {} FROM pages WHERE store_id = ?1 ORDER BY sort_order",
            PAGE_COLUMNS
        );
        let records = sqlx::query_as::<_, PageRecord>(&sql)
            .bind(&self.store_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(records.into_iter().map(Page::from).collect())
    }

    pub async fn get_by_slug(&self, slug: &str) -> DbResult<Option<Page>> {
        let sql = format!(
            "SELECT {} FROM pages WHERE store_id = ?1 AND slug = ?2",
            PAGE_COLUMNS
        );
        let record = sqlx::query_as::<_, PageRecord>(&sql)
            .bind(&self.store_id)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(Page::from))
    }

    /// Replaces a page's title and body.
    pub async fn update_content(
        &self,
        id: &str,
        title: &LocalizedText,
        content: &LocalizedText,
    ) -> DbResult<()> {
        validate_title(title)?;
        debug!(store_id = %self.store_id, page_id = %id, "Updating page content");

        let result = sqlx::query(
            r#"
            UPDATE pages SET
                title_es = ?3, title_en = ?4, content_es = ?5, content_en = ?6,
                updated_at = ?7
            WHERE id = ?1 AND store_id = ?2
            "#,
        )
        .bind(id)
        .bind(&self.store_id)
        .bind(title.es.trim())
        .bind(title.en.trim())
        .bind(&content.es)
        .bind(&content.en)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Page", id));
        }
        Ok(())
    }

    pub async fn set_published(&self, id: &str, is_published: bool) -> DbResult<()> {
        debug!(store_id = %self.store_id, page_id = %id, is_published, "Setting page visibility");

        let result = sqlx::query(
            "UPDATE pages SET is_published = ?3, updated_at = ?4 WHERE id = ?1 AND store_id = ?2",
        )
        .bind(id)
        .bind(&self.store_id)
        .bind(is_published)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Page", id));
        }
        Ok(())
    }
}
