//! # Category Repository
//!
//! Database operations for one store's category tree.
//!
//! ## Write Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create   validate name → slug free? → parent is a parent? → append    │
//! │  update   rename re-derives the slug (own id excluded from the check)   │
//! │  delete   no subcategories? → DELETE → renumber the remaining siblings  │
//! │  reorder  update_categories_order([{id, order}, ...])                   │
//! │           one UPDATE per row, no transaction:                           │
//! │                                                                         │
//! │           row 1 ✓  row 2 ✓  row 3 ✗                                     │
//! │                              └──► PartialBatch { applied: 2, total: 3 } │
//! │                                   rows 1-2 stay written                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rule is checked against a fresh `list()` before anything is written,
//! so a rejected operation leaves the table untouched.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use vitrina_core::category_tree::{
    ensure_deletable, ensure_slug_available, ensure_valid_parent, next_order, renumber_group,
};
use vitrina_core::slug::slugify;
use vitrina_core::validation::validate_category_name;
use vitrina_core::{
    Category, CategoryPatch, CoreError, LocalizedText, NewCategory, OrderUpdate, UpdatedCategory,
};

use super::generate_id;
use crate::error::{DbError, DbResult};

// =============================================================================
// Record
// =============================================================================

#[derive(Debug, Clone, sqlx::FromRow)]
struct CategoryRecord {
    id: String,
    store_id: String,
    name_es: String,
    name_en: String,
    description_es: String,
    description_en: String,
    slug: String,
    image_url: Option<String>,
    image_public_id: Option<String>,
    parent_category_id: Option<String>,
    sort_order: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRecord> for Category {
    fn from(r: CategoryRecord) -> Self {
        Category {
            id: r.id,
            store_id: r.store_id,
            name: LocalizedText::new(r.name_es, r.name_en),
            description: LocalizedText::new(r.description_es, r.description_en),
            slug: r.slug,
            image_url: r.image_url,
            image_public_id: r.image_public_id,
            parent_category_id: r.parent_category_id,
            order: r.sort_order,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const CATEGORY_COLUMNS: &str = r#"
    id, store_id, name_es, name_en, description_es, description_en, slug,
    image_url, image_public_id, parent_category_id, sort_order,
    created_at, updated_at
"#;

fn trimmed(text: &LocalizedText) -> LocalizedText {
    LocalizedText::new(text.es.trim(), text.en.trim())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for one store's categories.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
    store_id: String,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool, store_id: String) -> Self {
        CategoryRepository { pool, store_id }
    }

    /// All categories of the store: parents first, each group by `order`.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let sql = format!(
            r#"
            SELECT {} FROM categories
            WHERE store_id = ?1
            ORDER BY parent_category_id IS NOT NULL, parent_category_id, sort_order
            "#,
            CATEGORY_COLUMNS
        );
        let records = sqlx::query_as::<_, CategoryRecord>(&sql)
            .bind(&self.store_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(store_id = %self.store_id, count = records.len(), "Listed categories");
        Ok(records.into_iter().map(Category::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let sql = format!(
            "SELECT {} FROM categories WHERE id = ?1 AND store_id = ?2",
            CATEGORY_COLUMNS
        );
        let record = sqlx::query_as::<_, CategoryRecord>(&sql)
            .bind(id)
            .bind(&self.store_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(Category::from))
    }

    /// True when another category of the store already uses `slug`.
    pub async fn is_slug_taken(&self, slug: &str, exclude_id: Option<&str>) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM categories
            WHERE store_id = ?1 AND slug = ?2 AND (?3 IS NULL OR id != ?3)
            "#,
        )
        .bind(&self.store_id)
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Creates a category at the end of its sibling group.
    ///
    /// ## Errors
    /// - `Validation` - blank Spanish name or no slug can be derived
    /// - `DuplicateSlug` - another category derives the same slug
    /// - `InvalidParent` - the parent is itself a subcategory
    pub async fn create(&self, input: NewCategory) -> DbResult<Category> {
        let name = trimmed(&input.name);
        validate_category_name(&name)?;
        let slug = slugify(&name.es);

        let categories = self.list().await?;
        ensure_slug_available(&categories, &slug, None)?;
        if let Some(parent_id) = input.parent_category_id.as_deref() {
            ensure_valid_parent(&categories, parent_id)?;
        }

        let now = Utc::now();
        let category = Category {
            id: generate_id(),
            store_id: self.store_id.clone(),
            name,
            description: trimmed(&input.description),
            slug,
            image_url: input.image_url,
            image_public_id: input.image_public_id,
            order: next_order(&categories, input.parent_category_id.as_deref()),
            parent_category_id: input.parent_category_id,
            created_at: now,
            updated_at: now,
        };

        debug!(
            store_id = %self.store_id,
            slug = %category.slug,
            parent = ?category.parent_category_id,
            order = category.order,
            "Creating category"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO categories (
                id, store_id, name_es, name_en, description_es, description_en, slug,
                image_url, image_public_id, parent_category_id, sort_order,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&category.id)
        .bind(&category.store_id)
        .bind(&category.name.es)
        .bind(&category.name.en)
        .bind(&category.description.es)
        .bind(&category.description.en)
        .bind(&category.slug)
        .bind(&category.image_url)
        .bind(&category.image_public_id)
        .bind(&category.parent_category_id)
        .bind(category.order)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await;

        match result.map_err(DbError::from) {
            Ok(_) => Ok(category),
            // lost a race with a concurrent create
            Err(DbError::UniqueViolation { field, .. }) if field == "slug" => {
                Err(CoreError::DuplicateSlug {
                    name: category.name.es,
                    slug: category.slug,
                }
                .into())
            }
            Err(e) => Err(e),
        }
    }

    /// Applies a patch. Renaming re-derives the slug.
    ///
    /// When the patch replaces or removes the image, the old `public_id` is
    /// returned so the caller can delete the asset from the image host.
    pub async fn update(&self, id: &str, patch: CategoryPatch) -> DbResult<UpdatedCategory> {
        let categories = self.list().await?;
        let mut category = categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| DbError::not_found("Category", id))?;

        if let Some(name) = patch.name {
            let name = trimmed(&name);
            validate_category_name(&name)?;
            let slug = slugify(&name.es);
            ensure_slug_available(&categories, &slug, Some(id))?;
            category.name = name;
            category.slug = slug;
        }
        if let Some(description) = patch.description {
            category.description = trimmed(&description);
        }
        let previous_image = category.image_public_id.clone();
        if let Some(image) = patch.image {
            category.image_url = Some(image.url);
            category.image_public_id = Some(image.public_id);
        } else if patch.remove_image {
            category.image_url = None;
            category.image_public_id = None;
        }
        let removed_image_public_id =
            previous_image.filter(|old| category.image_public_id.as_ref() != Some(old));
        category.updated_at = Utc::now();

        debug!(store_id = %self.store_id, id = %id, slug = %category.slug, "Updating category");

        let result = sqlx::query(
            r#"
            UPDATE categories SET
                name_es = ?3, name_en = ?4, description_es = ?5, description_en = ?6,
                slug = ?7, image_url = ?8, image_public_id = ?9, updated_at = ?10
            WHERE id = ?1 AND store_id = ?2
            "#,
        )
        .bind(id)
        .bind(&self.store_id)
        .bind(&category.name.es)
        .bind(&category.name.en)
        .bind(&category.description.es)
        .bind(&category.description.en)
        .bind(&category.slug)
        .bind(&category.image_url)
        .bind(&category.image_public_id)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(UpdatedCategory {
            category,
            removed_image_public_id,
        })
    }

    /// Deletes a category and closes the gap in its sibling group.
    ///
    /// Returns the removed image's `public_id` so the caller can delete the
    /// asset from the image host.
    ///
    /// ## Errors
    /// - `NotFound` - no such category in this store
    /// - `HasSubcategories` - a parent still has children; nothing is written
    /// - `PartialBatch` - deleted, but renumbering the siblings stopped part way
    pub async fn delete(&self, id: &str) -> DbResult<Option<String>> {
        let categories = self.list().await?;
        let category = categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| DbError::not_found("Category", id))?;
        ensure_deletable(&categories, id)?;

        info!(store_id = %self.store_id, id = %id, slug = %category.slug, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1 AND store_id = ?2")
            .bind(id)
            .bind(&self.store_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        let mut remaining: Vec<Category> = categories.into_iter().filter(|c| c.id != id).collect();
        let updates = renumber_group(&mut remaining, category.parent_category_id.as_deref());
        if !updates.is_empty() {
            self.update_categories_order(&updates).await?;
        }

        Ok(category.image_public_id)
    }

    /// Persists the `{id, order}` pairs of one reorder action.
    ///
    /// Rows are written one at a time without a transaction. On the first
    /// failure the rows already written stay written and `PartialBatch`
    /// reports how far the batch got.
    pub async fn update_categories_order(&self, updates: &[OrderUpdate]) -> DbResult<()> {
        let total = updates.len();
        debug!(store_id = %self.store_id, total, "Persisting category order");

        let now = Utc::now();
        for (applied, update) in updates.iter().enumerate() {
            let result = sqlx::query(
                r#"
                UPDATE categories SET sort_order = ?3, updated_at = ?4
                WHERE id = ?1 AND store_id = ?2
                "#,
            )
            .bind(&update.id)
            .bind(&self.store_id)
            .bind(update.order)
            .bind(now)
            .execute(&self.pool)
            .await;

            let reason = match result {
                Ok(done) if done.rows_affected() > 0 => continue,
                Ok(_) => DbError::not_found("Category", &update.id).to_string(),
                Err(e) => DbError::from(e).to_string(),
            };

            warn!(
                store_id = %self.store_id,
                applied,
                total,
                failed_id = %update.id,
                reason = %reason,
                "Category order batch stopped"
            );
            return Err(DbError::PartialBatch {
                applied,
                total,
                failed_id: update.id.clone(),
                reason,
            });
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
