//! # Product Repository
//!
//! Catalog of one store. Stock, variants and images are JSON columns.
//!
//! A product may point at a parent category and, optionally, at one of that
//! parent's subcategories. Both references are checked against the store's
//! own categories before anything is written.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use vitrina_core::validation::validate_product_input;
use vitrina_core::{
    CoreError, Product, ProductCondition, ProductInput, ProductStatus, ProductUnit,
};

use super::generate_id;
use crate::error::{DbError, DbResult};

#[derive(Debug, Clone, sqlx::FromRow)]
struct ProductRecord {
    id: String,
    store_id: String,
    name: String,
    description: Option<String>,
    brand_id: Option<String>,
    category_id: Option<String>,
    subcategory_id: Option<String>,
    sku: Option<String>,
    unit: ProductUnit,
    condition: ProductCondition,
    status: ProductStatus,
    price_cents: i64,
    compare_at_price_cents: Option<i64>,
    stock: String,
    variants: String,
    images: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRecord> for Product {
    type Error = DbError;

    fn try_from(r: ProductRecord) -> DbResult<Self> {
        Ok(Product {
            stock: serde_json::from_str(&r.stock)?,
            variants: serde_json::from_str(&r.variants)?,
            images: serde_json::from_str(&r.images)?,
            id: r.id,
            store_id: r.store_id,
            name: r.name,
            description: r.description,
            brand_id: r.brand_id,
            category_id: r.category_id,
            subcategory_id: r.subcategory_id,
            sku: r.sku,
            unit: r.unit,
            condition: r.condition,
            status: r.status,
            price_cents: r.price_cents,
            compare_at_price_cents: r.compare_at_price_cents,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = r#"
    id, store_id, name, description, brand_id, category_id, subcategory_id, sku,
    unit, condition, status, price_cents, compare_at_price_cents,
    stock, variants, images, created_at, updated_at
"#;

fn collect(records: Vec<ProductRecord>) -> DbResult<Vec<Product>> {
    records.into_iter().map(Product::try_from).collect()
}

/// Blank optional strings are stored as NULL.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Repository for one store's products.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    store_id: String,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool, store_id: String) -> Self {
        ProductRepository { pool, store_id }
    }

    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE store_id = ?1 ORDER BY created_at DESC, id",
            PRODUCT_COLUMNS
        );
        let records = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(&self.store_id)
            .fetch_all(&self.pool)
            .await?;

        collect(records)
    }

    /// Products filed under a category, directly or through a subcategory.
    pub async fn list_by_category(&self, category_id: &str) -> DbResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {} FROM products
            WHERE store_id = ?1 AND (category_id = ?2 OR subcategory_id = ?2)
            ORDER BY created_at DESC, id
            "#,
            PRODUCT_COLUMNS
        );
        let records = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(&self.store_id)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        collect(records)
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE id = ?1 AND store_id = ?2",
            PRODUCT_COLUMNS
        );
        sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(id)
            .bind(&self.store_id)
            .fetch_optional(&self.pool)
            .await?
            .map(Product::try_from)
            .transpose()
    }

    pub async fn is_sku_taken(&self, sku: &str, exclude_id: Option<&str>) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM products
            WHERE store_id = ?1 AND sku = ?2 AND (?3 IS NULL OR id != ?3)
            "#,
        )
        .bind(&self.store_id)
        .bind(sku.trim())
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Checks the category references of a product form.
    ///
    /// ## Errors
    /// - `CategoryNotFound` - the category is not one of this store's parents
    /// - `SubcategoryMismatch` - the subcategory does not hang under it
    async fn check_categories(&self, input: &ProductInput) -> DbResult<()> {
        let Some(category_id) = input.category_id.as_deref() else {
            return Ok(());
        };

        let parent: Option<(Option<String>,)> = sqlx::query_as(
            "SELECT parent_category_id FROM categories WHERE id = ?1 AND store_id = ?2",
        )
        .bind(category_id)
        .bind(&self.store_id)
        .fetch_optional(&self.pool)
        .await?;

        match parent {
            Some((None,)) => {}
            _ => return Err(CoreError::CategoryNotFound(category_id.to_string()).into()),
        }

        if let Some(subcategory_id) = input.subcategory_id.as_deref() {
            let owner: Option<(Option<String>,)> = sqlx::query_as(
                "SELECT parent_category_id FROM categories WHERE id = ?1 AND store_id = ?2",
            )
            .bind(subcategory_id)
            .bind(&self.store_id)
            .fetch_optional(&self.pool)
            .await?;

            if owner.and_then(|(p,)| p).as_deref() != Some(category_id) {
                return Err(CoreError::SubcategoryMismatch {
                    category_id: category_id.to_string(),
                    subcategory_id: subcategory_id.to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    async fn check_input(&self, input: &ProductInput, exclude_id: Option<&str>) -> DbResult<()> {
        validate_product_input(input)?;
        self.check_categories(input).await?;

        if let Some(sku) = input.sku.as_deref().filter(|s| !s.trim().is_empty()) {
            if self.is_sku_taken(sku, exclude_id).await? {
                return Err(DbError::duplicate("sku", sku.trim()));
            }
        }
        Ok(())
    }

    pub async fn create(&self, input: ProductInput) -> DbResult<Product> {
        self.check_input(&input, None).await?;

        let now = Utc::now();
        let product = Product {
            id: generate_id(),
            store_id: self.store_id.clone(),
            name: input.name.trim().to_string(),
            description: non_blank(input.description),
            brand_id: input.brand_id,
            category_id: input.category_id,
            subcategory_id: input.subcategory_id,
            sku: non_blank(input.sku),
            unit: input.unit,
            condition: input.condition,
            status: input.status,
            price_cents: input.price_cents,
            compare_at_price_cents: input.compare_at_price_cents,
            stock: input.stock,
            variants: input.variants,
            images: input.images,
            created_at: now,
            updated_at: now,
        };

        debug!(store_id = %self.store_id, sku = ?product.sku, "Creating product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, store_id, name, description, brand_id, category_id, subcategory_id, sku,
                unit, condition, status, price_cents, compare_at_price_cents,
                stock, variants, images, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
            "#,
        )
        .bind(&product.id)
        .bind(&product.store_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.brand_id)
        .bind(&product.category_id)
        .bind(&product.subcategory_id)
        .bind(&product.sku)
        .bind(product.unit)
        .bind(product.condition)
        .bind(product.status)
        .bind(product.price_cents)
        .bind(product.compare_at_price_cents)
        .bind(serde_json::to_string(&product.stock)?)
        .bind(serde_json::to_string(&product.variants)?)
        .bind(serde_json::to_string(&product.images)?)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Replaces every editable field of a product.
    pub async fn update(&self, id: &str, input: ProductInput) -> DbResult<Product> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;
        self.check_input(&input, Some(id)).await?;

        let product = Product {
            name: input.name.trim().to_string(),
            description: non_blank(input.description),
            brand_id: input.brand_id,
            category_id: input.category_id,
            subcategory_id: input.subcategory_id,
            sku: non_blank(input.sku),
            unit: input.unit,
            condition: input.condition,
            status: input.status,
            price_cents: input.price_cents,
            compare_at_price_cents: input.compare_at_price_cents,
            stock: input.stock,
            variants: input.variants,
            images: input.images,
            updated_at: Utc::now(),
            ..existing
        };

        debug!(store_id = %self.store_id, id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?3, description = ?4, brand_id = ?5, category_id = ?6,
                subcategory_id = ?7, sku = ?8, unit = ?9, condition = ?10, status = ?11,
                price_cents = ?12, compare_at_price_cents = ?13,
                stock = ?14, variants = ?15, images = ?16, updated_at = ?17
            WHERE id = ?1 AND store_id = ?2
            "#,
        )
        .bind(id)
        .bind(&self.store_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.brand_id)
        .bind(&product.category_id)
        .bind(&product.subcategory_id)
        .bind(&product.sku)
        .bind(product.unit)
        .bind(product.condition)
        .bind(product.status)
        .bind(product.price_cents)
        .bind(product.compare_at_price_cents)
        .bind(serde_json::to_string(&product.stock)?)
        .bind(serde_json::to_string(&product.variants)?)
        .bind(serde_json::to_string(&product.images)?)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(product)
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        info!(store_id = %self.store_id, id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1 AND store_id = ?2")
            .bind(id)
            .bind(&self.store_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::setup;
    use std::collections::HashMap;
    use vitrina_core::{LocalizedText, NewCategory, ProductVariant, StockTracking, ValidationError};

    fn input(name: &str, sku: Option<&str>) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            sku: sku.map(str::to_string),
            price_cents: 1_500,
            ..Default::default()
        }
    }

    fn category(es: &str, parent: Option<&str>) -> NewCategory {
        NewCategory {
            name: LocalizedText::new(es, ""),
            parent_category_id: parent.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (db, store) = setup().await;
        let repo = db.tenant(&store.id).products();

        let created = repo
            .create(ProductInput {
                stock: StockTracking::PerVariant,
                variants: vec![ProductVariant {
                    id: "v1".into(),
                    name: "Talla M".into(),
                    sku: None,
                    price_cents: None,
                    stock: Some(4),
                    options: HashMap::from([("talla".to_string(), "M".to_string())]),
                }],
                ..input("Polo rosa", Some("POLO-M"))
            })
            .await
            .unwrap();

        let loaded = repo.get(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.available_stock(), Some(4));
    }

    #[tokio::test]
    async fn test_sku_is_unique_per_store() {
        let (db, store) = setup().await;
        let repo = db.tenant(&store.id).products();

        let first = repo.create(input("Café", Some("CAFE-1"))).await.unwrap();
        assert!(matches!(
            repo.create(input("Café 2", Some("CAFE-1"))).await,
            Err(DbError::UniqueViolation { ref field, .. }) if field == "sku"
        ));
        // keeping its own SKU is fine
        repo.update(&first.id, input("Café molido", Some("CAFE-1")))
            .await
            .unwrap();

        let other = db.tenant("other-store").products();
        assert!(!other.is_sku_taken("CAFE-1", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_blank_sku_is_stored_as_none() {
        let (db, store) = setup().await;
        let repo = db.tenant(&store.id).products();

        let first = repo.create(input("Polo", Some(""))).await.unwrap();
        let second = repo.create(input("Polo azul", Some("   "))).await.unwrap();
        assert_eq!(first.sku, None);
        assert_eq!(repo.get(&second.id).await.unwrap().unwrap().sku, None);
    }

    #[tokio::test]
    async fn test_subcategory_must_belong_to_category() {
        let (db, store) = setup().await;
        let tenant = db.tenant(&store.id);
        let cats = tenant.categories();

        let bebidas = cats.create(category("Bebidas", None)).await.unwrap();
        let jugos = cats.create(category("Jugos", Some(&bebidas.id))).await.unwrap();
        let snacks = cats.create(category("Snacks", None)).await.unwrap();

        let repo = tenant.products();
        let ok = repo
            .create(ProductInput {
                category_id: Some(bebidas.id.clone()),
                subcategory_id: Some(jugos.id.clone()),
                ..input("Jugo de mango", None)
            })
            .await
            .unwrap();

        assert!(matches!(
            repo.create(ProductInput {
                category_id: Some(snacks.id.clone()),
                subcategory_id: Some(jugos.id.clone()),
                ..input("Papitas", None)
            })
            .await,
            Err(DbError::Domain(CoreError::SubcategoryMismatch { .. }))
        ));
        assert!(matches!(
            repo.create(ProductInput {
                category_id: Some(jugos.id.clone()),
                ..input("Mal archivado", None)
            })
            .await,
            Err(DbError::Domain(CoreError::CategoryNotFound(_)))
        ));

        assert_eq!(repo.list_by_category(&bebidas.id).await.unwrap().len(), 1);
        assert_eq!(repo.list_by_category(&jugos.id).await.unwrap()[0].id, ok.id);
        assert!(repo.list_by_category(&snacks.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected() {
        let (db, store) = setup().await;
        let repo = db.tenant(&store.id).products();

        assert!(matches!(
            repo.create(ProductInput {
                price_cents: -1,
                ..input("Café", None)
            })
            .await,
            Err(DbError::Domain(CoreError::Validation(ValidationError::Negative { .. })))
        ));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let (db, store) = setup().await;
        let repo = db.tenant(&store.id).products();
        let product = repo.create(input("Café", None)).await.unwrap();

        assert!(matches!(
            db.tenant("other-store").products().delete(&product.id).await,
            Err(DbError::NotFound { .. })
        ));
        repo.delete(&product.id).await.unwrap();
        assert!(repo.get(&product.id).await.unwrap().is_none());
    }
}
