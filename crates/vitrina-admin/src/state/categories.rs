//! # Category List State
//!
//! The category list page: the loaded categories of one store plus the
//! drag-and-drop reorder in progress.
//!
//! ## Reorder Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pointer_down ──► pointer_move (≥ 8 px?) ──► begin_drag                 │
//! │                         │ no                                            │
//! │                         ▼                                               │
//! │                    pointer_up = click, nothing persisted                │
//! │                                                                         │
//! │  pointer_up(target) ──► drop_on: local list reordered right away        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  update_categories_order(changed pairs)                                 │
//! │         ├── ok ────► Confirmed                                          │
//! │         └── error ─► Failed ──► Resyncing ──► list() ──► Idle           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Create, update and delete are not optimistic: the command writes first
//! and then calls [`CategoryListState::reload`].

use tracing::{debug, info, warn};

use vitrina_core::category_tree::CategoryTree;
use vitrina_core::reorder::{DragGesture, ReorderScope, ReorderSession, ReorderState};
use vitrina_core::{Category, CoreResult, OrderUpdate};
use vitrina_db::TenantDb;

use crate::error::ApiResult;

/// A pressed pointer that may turn into a drag.
#[derive(Debug, Clone)]
struct PendingDrag {
    gesture: DragGesture,
    scope: ReorderScope,
    category_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryListState {
    store_id: Option<String>,
    categories: Vec<Category>,
    session: ReorderSession,
    pending: Option<PendingDrag>,
}

impl CategoryListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose categories are loaded, if any.
    pub fn store_id(&self) -> Option<&str> {
        self.store_id.as_deref()
    }

    pub fn is_loaded_for(&self, store_id: &str) -> bool {
        self.store_id.as_deref() == Some(store_id)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn tree(&self) -> CategoryTree {
        CategoryTree::build(&self.categories)
    }

    pub fn reorder_state(&self) -> &ReorderState {
        self.session.state()
    }

    /// Replaces the list with the authoritative categories of `tenant`.
    ///
    /// Switching to another store also resets any reorder in progress.
    pub async fn reload(&mut self, tenant: &TenantDb) -> ApiResult<()> {
        let categories = tenant.categories().list().await?;
        if !self.is_loaded_for(tenant.store_id()) {
            self.session = ReorderSession::new();
            self.pending = None;
        }

        debug!(store_id = %tenant.store_id(), count = categories.len(), "Category list loaded");
        self.store_id = Some(tenant.store_id().to_string());
        self.categories = categories;
        Ok(())
    }

    // =========================================================================
    // Pointer Gestures
    // =========================================================================

    /// A pointer was pressed on `category_id`.
    pub fn pointer_down(&mut self, scope: ReorderScope, category_id: &str, x: f64, y: f64) {
        self.pending = Some(PendingDrag {
            gesture: DragGesture::start(x, y),
            scope,
            category_id: category_id.to_string(),
        });
    }

    /// Tracks the pointer. Returns `true` once the movement counts as a drag.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> CoreResult<bool> {
        let Some(pending) = self.pending.as_mut() else {
            return Ok(false);
        };

        let was_drag = pending.gesture.is_drag();
        let is_drag = pending.gesture.move_to(x, y);
        if is_drag && !was_drag {
            let scope = pending.scope.clone();
            let id = pending.category_id.clone();
            self.session.acknowledge();
            self.session.begin_drag(scope, id)?;
        }
        Ok(is_drag)
    }

    /// The pointer was released, over `target_id` if it is on a row.
    ///
    /// Returns the order changes applied locally; they still have to be
    /// persisted with [`CategoryListState::persist`]. A release before the
    /// drag threshold is a click and returns nothing.
    pub fn pointer_up(&mut self, target_id: Option<&str>) -> CoreResult<Vec<OrderUpdate>> {
        let Some(pending) = self.pending.take() else {
            return Ok(Vec::new());
        };
        if !pending.gesture.is_drag() {
            return Ok(Vec::new());
        }

        match target_id {
            Some(target) => self.session.drop_on(&mut self.categories, target),
            None => {
                self.session.cancel_drag()?;
                Ok(Vec::new())
            }
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Moves `dragged_id` onto `target_id` in one step and persists it.
    pub async fn reorder(
        &mut self,
        tenant: &TenantDb,
        scope: ReorderScope,
        dragged_id: &str,
        target_id: &str,
    ) -> ApiResult<Vec<OrderUpdate>> {
        self.session.acknowledge();
        self.session.begin_drag(scope, dragged_id)?;
        let updates = self.session.drop_on(&mut self.categories, target_id)?;
        self.persist(tenant, &updates).await?;
        Ok(updates)
    }

    /// Writes the changes of the last drop.
    ///
    /// On failure the local list no longer matches storage, so it is
    /// re-fetched before the error is returned.
    pub async fn persist(&mut self, tenant: &TenantDb, updates: &[OrderUpdate]) -> ApiResult<()> {
        if updates.is_empty() {
            return Ok(());
        }

        match tenant.categories().update_categories_order(updates).await {
            Ok(()) => {
                info!(store_id = %tenant.store_id(), changed = updates.len(), "Category order saved");
                self.session.persisted()?;
                Ok(())
            }
            Err(err) => {
                warn!(store_id = %tenant.store_id(), error = %err, "Category order failed, resyncing");
                self.session.persist_failed(err.to_string())?;
                if let Err(resync_err) = self.resync(tenant).await {
                    warn!(error = %resync_err, "Resync after failed reorder also failed");
                }
                Err(err.into())
            }
        }
    }

    /// Re-fetches the authoritative list after a failed write.
    ///
    /// Can be called again while `Resyncing` if the previous fetch failed.
    pub async fn resync(&mut self, tenant: &TenantDb) -> ApiResult<()> {
        if matches!(self.session.state(), ReorderState::Failed { .. }) {
            self.session.begin_resync()?;
        }

        self.categories = tenant.categories().list().await?;
        self.store_id = Some(tenant.store_id().to_string());
        self.session.resynced()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrina_core::{LocalizedText, NewCategory, NewStore};
    use vitrina_db::{Database, DbConfig};

    async fn setup() -> (Database, TenantDb, Vec<Category>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db
            .stores()
            .create_store(NewStore {
                owner_id: "owner-1".into(),
                store_name: "Bodega Rosa".into(),
                subdomain: "bodega-rosa".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let tenant = db.tenant(&store.id);

        let mut created = Vec::new();
        for name in ["A", "B", "C"] {
            created.push(
                tenant
                    .categories()
                    .create(NewCategory {
                        name: LocalizedText::new(name, ""),
                        ..Default::default()
                    })
                    .await
                    .unwrap(),
            );
        }
        (db, tenant, created)
    }

    fn names(state: &CategoryListState) -> Vec<String> {
        state
            .tree()
            .nodes
            .iter()
            .map(|n| n.category.name.es.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_reorder_is_local_first_then_confirmed() {
        let (_db, tenant, cats) = setup().await;
        let mut state = CategoryListState::new();
        state.reload(&tenant).await.unwrap();

        let updates = state
            .reorder(&tenant, ReorderScope::Parents, &cats[2].id, &cats[0].id)
            .await
            .unwrap();
        assert_eq!(updates.len(), 3);
        assert_eq!(state.reorder_state(), &ReorderState::Confirmed);
        assert_eq!(names(&state), vec!["C", "A", "B"]);

        let mut fresh = CategoryListState::new();
        fresh.reload(&tenant).await.unwrap();
        assert_eq!(names(&fresh), vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_short_movement_is_a_click() {
        let (_db, tenant, cats) = setup().await;
        let mut state = CategoryListState::new();
        state.reload(&tenant).await.unwrap();

        state.pointer_down(ReorderScope::Parents, &cats[0].id, 10.0, 10.0);
        assert!(!state.pointer_move(13.0, 14.0).unwrap());
        assert!(state.pointer_up(Some(&cats[2].id)).unwrap().is_empty());
        assert_eq!(state.reorder_state(), &ReorderState::Idle);
        assert_eq!(names(&state), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_drag_gesture_persists() {
        let (_db, tenant, cats) = setup().await;
        let mut state = CategoryListState::new();
        state.reload(&tenant).await.unwrap();

        state.pointer_down(ReorderScope::Parents, &cats[0].id, 0.0, 0.0);
        assert!(state.pointer_move(0.0, 40.0).unwrap());
        let updates = state.pointer_up(Some(&cats[1].id)).unwrap();
        assert!(matches!(state.reorder_state(), ReorderState::Persisting { .. }));

        state.persist(&tenant, &updates).await.unwrap();
        assert_eq!(names(&state), vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn test_failed_write_resyncs() {
        let (_db, tenant, cats) = setup().await;
        let mut state = CategoryListState::new();
        state.reload(&tenant).await.unwrap();

        // deleted behind the page's back
        tenant.categories().delete(&cats[1].id).await.unwrap();

        let err = state
            .reorder(&tenant, ReorderScope::Parents, &cats[2].id, &cats[0].id)
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ReorderFailed);

        // back in sync with storage, not with the optimistic list
        assert_eq!(state.reorder_state(), &ReorderState::Idle);
        assert_eq!(state.categories().len(), 2);
        assert!(state.categories().iter().all(|c| c.id != cats[1].id));
    }
}
