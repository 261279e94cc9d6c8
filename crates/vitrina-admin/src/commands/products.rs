//! # Product Commands
//!
//! Catalog CRUD for the products page.

use tracing::{debug, info};

use vitrina_core::{Product, ProductInput};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Lists the store's products, optionally only those filed under a
/// category (directly or through one of its subcategories).
pub async fn list_products(
    app: &AppState,
    store_id: &str,
    category_id: Option<&str>,
) -> ApiResult<Vec<Product>> {
    let products = app.db.tenant(store_id).products();
    let list = match category_id {
        Some(id) => products.list_by_category(id).await?,
        None => products.list().await?,
    };
    debug!(store_id = %store_id, category_id = ?category_id, count = list.len(), "list_products command");
    Ok(list)
}

pub async fn get_product(app: &AppState, store_id: &str, id: &str) -> ApiResult<Product> {
    app.db
        .tenant(store_id)
        .products()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// Live SKU check for the product form.
pub async fn check_sku(
    app: &AppState,
    store_id: &str,
    sku: &str,
    exclude_id: Option<&str>,
) -> ApiResult<bool> {
    let taken = app
        .db
        .tenant(store_id)
        .products()
        .is_sku_taken(sku, exclude_id)
        .await?;
    Ok(!taken)
}

pub async fn create_product(
    app: &AppState,
    store_id: &str,
    input: ProductInput,
) -> ApiResult<Product> {
    let product = app.db.tenant(store_id).products().create(input).await?;
    info!(store_id = %store_id, id = %product.id, "create_product command");
    Ok(product)
}

pub async fn update_product(
    app: &AppState,
    store_id: &str,
    id: &str,
    input: ProductInput,
) -> ApiResult<Product> {
    let product = app.db.tenant(store_id).products().update(id, input).await?;
    debug!(store_id = %store_id, id = %id, "update_product command");
    Ok(product)
}

pub async fn delete_product(app: &AppState, store_id: &str, id: &str) -> ApiResult<()> {
    app.db.tenant(store_id).products().delete(id).await?;
    info!(store_id = %store_id, id = %id, "delete_product command");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::app_with_store;
    use crate::error::ErrorCode;
    use vitrina_core::StockTracking;

    fn input(sku: &str) -> ProductInput {
        ProductInput {
            name: "Café molido 250g".into(),
            sku: Some(sku.into()),
            price_cents: 1_890,
            stock: StockTracking::Product { quantity: 12 },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_product_lifecycle() {
        let (app, store) = app_with_store().await;

        assert!(check_sku(&app, &store.id, "CAF-250", None).await.unwrap());
        let product = create_product(&app, &store.id, input("CAF-250")).await.unwrap();
        assert!(!check_sku(&app, &store.id, "CAF-250", None).await.unwrap());
        assert!(check_sku(&app, &store.id, "CAF-250", Some(&product.id)).await.unwrap());

        let err = create_product(&app, &store.id, input("CAF-250")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let updated = update_product(
            &app,
            &store.id,
            &product.id,
            ProductInput {
                price_cents: 1_990,
                ..input("CAF-250")
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.price_cents, 1_990);
        assert_eq!(list_products(&app, &store.id, None).await.unwrap().len(), 1);

        delete_product(&app, &store.id, &product.id).await.unwrap();
        let err = get_product(&app, &store.id, &product.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_per_variant_stock_needs_variants() {
        let (app, store) = app_with_store().await;

        let err = create_product(
            &app,
            &store.id,
            ProductInput {
                stock: StockTracking::PerVariant,
                ..input("CAF-500")
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
