//! # Category Commands
//!
//! The category list page. Reads go through [`CategoryListState`] so the
//! page always renders the same list the reorder logic works on.
//!
//! [`CategoryListState`]: crate::state::CategoryListState

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use vitrina_core::category_tree::CategoryTree;
use vitrina_core::reorder::{ReorderScope, ReorderState};
use vitrina_core::{Category, CategoryPatch, NewCategory, UpdatedCategory};

use crate::error::ApiResult;
use crate::state::{AppState, CategoryListState};

/// What the category list renders.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListDto {
    pub tree: CategoryTree,
    pub reorder: ReorderState,
}

impl From<&CategoryListState> for CategoryListDto {
    fn from(state: &CategoryListState) -> Self {
        CategoryListDto {
            tree: state.tree(),
            reorder: state.reorder_state().clone(),
        }
    }
}

/// A completed drag: `dragged_id` dropped onto `target_id`.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub scope: ReorderScope,
    pub dragged_id: String,
    pub target_id: String,
}

pub async fn load_categories(app: &AppState, store_id: &str) -> ApiResult<CategoryListDto> {
    let mut state = app.categories.lock().await;
    state.reload(&app.db.tenant(store_id)).await?;
    Ok(CategoryListDto::from(&*state))
}

pub async fn create_category(
    app: &AppState,
    store_id: &str,
    input: NewCategory,
) -> ApiResult<Category> {
    let tenant = app.db.tenant(store_id);
    let mut state = app.categories.lock().await;

    let category = tenant.categories().create(input).await?;
    info!(store_id = %store_id, id = %category.id, slug = %category.slug, "create_category command");

    state.reload(&tenant).await?;
    Ok(category)
}

/// Edits a category. A replaced or removed image comes back as
/// `removed_image_public_id` for cleanup on the image host.
pub async fn update_category(
    app: &AppState,
    store_id: &str,
    id: &str,
    patch: CategoryPatch,
) -> ApiResult<UpdatedCategory> {
    let tenant = app.db.tenant(store_id);
    let mut state = app.categories.lock().await;

    let updated = tenant.categories().update(id, patch).await?;
    debug!(store_id = %store_id, id = %id, "update_category command");

    state.reload(&tenant).await?;
    Ok(updated)
}

/// Deletes a category. Returns the `public_id` of its image, if it had one,
/// so the caller can remove the asset from the image host.
pub async fn delete_category(
    app: &AppState,
    store_id: &str,
    id: &str,
) -> ApiResult<Option<String>> {
    let tenant = app.db.tenant(store_id);
    let mut state = app.categories.lock().await;

    let image_public_id = tenant.categories().delete(id).await?;
    info!(store_id = %store_id, id = %id, "delete_category command");

    state.reload(&tenant).await?;
    Ok(image_public_id)
}

/// Applies a drop to the list and persists the changed orders.
///
/// On a failed write the list is reloaded from storage before the error is
/// returned, so a following `load_categories` shows the real order.
pub async fn reorder_categories(
    app: &AppState,
    store_id: &str,
    request: ReorderRequest,
) -> ApiResult<CategoryListDto> {
    let tenant = app.db.tenant(store_id);
    let mut state = app.categories.lock().await;

    if !state.is_loaded_for(store_id) {
        state.reload(&tenant).await?;
    }

    let updates = state
        .reorder(&tenant, request.scope, &request.dragged_id, &request.target_id)
        .await?;
    debug!(store_id = %store_id, changed = updates.len(), "reorder_categories command");

    Ok(CategoryListDto::from(&*state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::app_with_store;
    use crate::error::ErrorCode;
    use vitrina_core::{ImageRef, LocalizedText};

    fn named(es: &str, parent: Option<&str>) -> NewCategory {
        NewCategory {
            name: LocalizedText::new(es, ""),
            parent_category_id: parent.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_children_reorder_keeps_parents() {
        let (app, store) = app_with_store().await;
        let bebidas = create_category(&app, &store.id, named("Bebidas", None)).await.unwrap();
        create_category(&app, &store.id, named("Snacks", None)).await.unwrap();
        let jugos = create_category(&app, &store.id, named("Jugos", Some(&bebidas.id)))
            .await
            .unwrap();
        let aguas = create_category(&app, &store.id, named("Aguas", Some(&bebidas.id)))
            .await
            .unwrap();

        let dto = reorder_categories(
            &app,
            &store.id,
            ReorderRequest {
                scope: ReorderScope::Children {
                    parent_id: bebidas.id.clone(),
                },
                dragged_id: aguas.id.clone(),
                target_id: jugos.id.clone(),
            },
        )
        .await
        .unwrap();

        assert_eq!(dto.reorder, ReorderState::Confirmed);
        let parents: Vec<_> = dto.tree.nodes.iter().map(|n| n.category.name.es.as_str()).collect();
        assert_eq!(parents, vec!["Bebidas", "Snacks"]);
        let children: Vec<_> = dto.tree.nodes[0]
            .children
            .iter()
            .map(|c| (c.name.es.as_str(), c.order))
            .collect();
        assert_eq!(children, vec![("Aguas", 1), ("Jugos", 2)]);
    }

    #[tokio::test]
    async fn test_cross_group_drop_is_rejected() {
        let (app, store) = app_with_store().await;
        let bebidas = create_category(&app, &store.id, named("Bebidas", None)).await.unwrap();
        let snacks = create_category(&app, &store.id, named("Snacks", None)).await.unwrap();
        let jugos = create_category(&app, &store.id, named("Jugos", Some(&bebidas.id)))
            .await
            .unwrap();

        let err = reorder_categories(
            &app,
            &store.id,
            ReorderRequest {
                scope: ReorderScope::Parents,
                dragged_id: jugos.id.clone(),
                target_id: snacks.id.clone(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let dto = load_categories(&app, &store.id).await.unwrap();
        assert_eq!(dto.reorder, ReorderState::Idle);
        assert_eq!(dto.tree.nodes[0].children.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_guard_and_image_cleanup() {
        let (app, store) = app_with_store().await;
        let bebidas = create_category(&app, &store.id, named("Bebidas", None)).await.unwrap();
        let jugos = create_category(
            &app,
            &store.id,
            NewCategory {
                image_url: Some("https://img.example/jugos.jpg".into()),
                image_public_id: Some("bodega-rosa/jugos".into()),
                ..named("Jugos", Some(&bebidas.id))
            },
        )
        .await
        .unwrap();

        let err = delete_category(&app, &store.id, &bebidas.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let removed = delete_category(&app, &store.id, &jugos.id).await.unwrap();
        assert_eq!(removed.as_deref(), Some("bodega-rosa/jugos"));
        delete_category(&app, &store.id, &bebidas.id).await.unwrap();

        assert!(load_categories(&app, &store.id).await.unwrap().tree.is_empty());
    }

    #[tokio::test]
    async fn test_replacing_image_returns_old_asset() {
        let (app, store) = app_with_store().await;
        let bebidas = create_category(
            &app,
            &store.id,
            NewCategory {
                image_url: Some("https://img.example/old.jpg".into()),
                image_public_id: Some("bodega-rosa/old".into()),
                ..named("Bebidas", None)
            },
        )
        .await
        .unwrap();

        let updated = update_category(
            &app,
            &store.id,
            &bebidas.id,
            CategoryPatch {
                image: Some(ImageRef {
                    url: "https://img.example/new.jpg".into(),
                    public_id: "bodega-rosa/new".into(),
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.removed_image_public_id.as_deref(), Some("bodega-rosa/old"));
        assert_eq!(updated.category.image_public_id.as_deref(), Some("bodega-rosa/new"));
    }
}
