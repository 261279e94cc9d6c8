//! # Category Tree
//!
//! Ordering and mutation rules for the two-level category forest.
//!
//! ## Sibling Groups
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Parents (one group)          Children (one group per parent)          │
//! │  ───────────────────          ───────────────────────────────          │
//! │  1 Bebidas ─────────────────► 1 Gaseosas                               │
//! │                               2 Jugos                                   │
//! │  2 Snacks ──────────────────► 1 Papas                                  │
//! │  3 Lácteos                    (no children)                             │
//! │                                                                         │
//! │  `order` is unique and contiguous (1..N) inside each group.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reorder Flow
//! ```text
//! drag "Snacks" onto "Bebidas"
//!      │
//!      ▼
//! reorder_parents(&mut cats, "snacks", "bebidas")
//!      │  remove from old index, insert at target index, renumber 1..N
//!      ▼
//! [OrderUpdate { snacks, 1 }, OrderUpdate { bebidas, 2 }]
//!      │
//!      ▼
//! CategoryRepository::update_categories_order(updates)   (one logical call)
//! ```
//!
//! Only categories whose `order` actually changed are reported, so a
//! reorder touching two neighbours produces two writes.

use serde::Serialize;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Category, OrderUpdate};

// =============================================================================
// Sibling Group Queries
// =============================================================================

/// Returns one sibling group sorted by `order`.
///
/// `parent = None` selects the parent categories. Ties (only possible with
/// corrupted data) fall back to creation time and id so results are stable.
pub fn sibling_group<'a>(categories: &'a [Category], parent: Option<&str>) -> Vec<&'a Category> {
    let mut group: Vec<&Category> = categories
        .iter()
        .filter(|c| c.parent_category_id.as_deref() == parent)
        .collect();
    group.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    group
}

/// Number of subcategories under `parent_id`.
pub fn subcategory_count(categories: &[Category], parent_id: &str) -> usize {
    categories.iter().filter(|c| c.is_child_of(parent_id)).count()
}

/// Order value for a category appended to a sibling group.
pub fn next_order(categories: &[Category], parent: Option<&str>) -> i64 {
    categories
        .iter()
        .filter(|c| c.parent_category_id.as_deref() == parent)
        .map(|c| c.order)
        .max()
        .unwrap_or(0)
        + 1
}

fn find<'a>(categories: &'a [Category], id: &str) -> CoreResult<&'a Category> {
    categories
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| CoreError::CategoryNotFound(id.to_string()))
}

// =============================================================================
// Reordering
// =============================================================================

/// Moves parent `from_id` to the position of parent `to_id`.
///
/// All parents are renumbered `1..N` in their new sequence. Subcategories are
/// never touched: they follow their parent through `parent_category_id`, not
/// through array position.
pub fn reorder_parents(
    categories: &mut [Category],
    from_id: &str,
    to_id: &str,
) -> CoreResult<Vec<OrderUpdate>> {
    reorder_group(categories, None, from_id, to_id)
}

/// Moves subcategory `from_id` to the position of `to_id` inside `parent_id`.
///
/// Both ids must be children of `parent_id`. `parent_category_id` never
/// changes; a subcategory keeps the parent it was created under.
pub fn reorder_children(
    categories: &mut [Category],
    parent_id: &str,
    from_id: &str,
    to_id: &str,
) -> CoreResult<Vec<OrderUpdate>> {
    let parent = find(categories, parent_id)?;
    if !parent.is_parent() {
        return Err(CoreError::InvalidParent {
            parent_id: parent_id.to_string(),
        });
    }
    reorder_group(categories, Some(parent_id), from_id, to_id)
}

fn reorder_group(
    categories: &mut [Category],
    parent: Option<&str>,
    from_id: &str,
    to_id: &str,
) -> CoreResult<Vec<OrderUpdate>> {
    // Existence first so a typo reads as "not found" rather than "not siblings".
    find(categories, from_id)?;
    find(categories, to_id)?;

    let mut ids: Vec<String> = sibling_group(categories, parent)
        .into_iter()
        .map(|c| c.id.clone())
        .collect();

    let cross_group = || CoreError::CrossGroupReorder {
        from_id: from_id.to_string(),
        to_id: to_id.to_string(),
    };
    let from_idx = ids.iter().position(|id| id == from_id).ok_or_else(cross_group)?;
    let to_idx = ids.iter().position(|id| id == to_id).ok_or_else(cross_group)?;

    let moved = ids.remove(from_idx);
    ids.insert(to_idx, moved);

    Ok(assign_sequence(categories, &ids))
}

/// Renumbers one sibling group `1..N`, keeping its current relative order.
///
/// Used after a delete leaves a hole and to repair groups with gaps or
/// duplicate values.
pub fn renumber_group(categories: &mut [Category], parent: Option<&str>) -> Vec<OrderUpdate> {
    let ids: Vec<String> = sibling_group(categories, parent)
        .into_iter()
        .map(|c| c.id.clone())
        .collect();
    assign_sequence(categories, &ids)
}

/// Writes `order = position + 1` for every id, returning the changed pairs.
fn assign_sequence(categories: &mut [Category], ids: &[String]) -> Vec<OrderUpdate> {
    let mut updates = Vec::new();
    for (idx, id) in ids.iter().enumerate() {
        let order = idx as i64 + 1;
        if let Some(category) = categories.iter_mut().find(|c| &c.id == id) {
            if category.order != order {
                category.order = order;
                updates.push(OrderUpdate {
                    id: id.clone(),
                    order,
                });
            }
        }
    }
    updates
}

/// Applies persisted `{id, order}` pairs to an in-memory list.
///
/// Unknown ids are ignored.
pub fn apply_order_updates(categories: &mut [Category], updates: &[OrderUpdate]) {
    for update in updates {
        if let Some(category) = categories.iter_mut().find(|c| c.id == update.id) {
            category.order = update.order;
        }
    }
}

/// True when every sibling group is numbered exactly `1..N`.
pub fn is_contiguous(categories: &[Category]) -> bool {
    let mut parents: Vec<Option<&str>> = categories
        .iter()
        .map(|c| c.parent_category_id.as_deref())
        .collect();
    parents.sort();
    parents.dedup();

    parents.into_iter().all(|parent| {
        sibling_group(categories, parent)
            .iter()
            .enumerate()
            .all(|(idx, c)| c.order == idx as i64 + 1)
    })
}

// =============================================================================
// Mutation Guards
// =============================================================================

/// Fails with `DuplicateSlug` when another category already uses `slug`.
///
/// `exclude_id` skips the category being renamed.
pub fn ensure_slug_available(
    categories: &[Category],
    slug: &str,
    exclude_id: Option<&str>,
) -> CoreResult<()> {
    let clash = categories
        .iter()
        .filter(|c| Some(c.id.as_str()) != exclude_id)
        .find(|c| c.slug == slug);

    match clash {
        Some(existing) => Err(CoreError::DuplicateSlug {
            name: existing.name.es.clone(),
            slug: slug.to_string(),
        }),
        None => Ok(()),
    }
}

/// Fails with `InvalidParent` unless `parent_id` is an existing parent
/// category.
pub fn ensure_valid_parent(categories: &[Category], parent_id: &str) -> CoreResult<()> {
    let parent = categories
        .iter()
        .find(|c| c.id == parent_id)
        .ok_or_else(|| CoreError::CategoryNotFound(parent_id.to_string()))?;

    if !parent.is_parent() {
        return Err(CoreError::InvalidParent {
            parent_id: parent_id.to_string(),
        });
    }

    Ok(())
}

/// Fails with `HasSubcategories` when `id` still has children.
pub fn ensure_deletable(categories: &[Category], id: &str) -> CoreResult<()> {
    let category = find(categories, id)?;
    let count = subcategory_count(categories, id);

    if count > 0 {
        return Err(CoreError::HasSubcategories {
            name: category.name.es.clone(),
            count,
        });
    }

    Ok(())
}

// =============================================================================
// Tree View
// =============================================================================

/// A parent category with its ordered children.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<Category>,
}

/// The ordered forest rendered by the category list.
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export)]
pub struct CategoryTree {
    pub nodes: Vec<CategoryNode>,
    /// Subcategories whose parent no longer exists.
    pub orphans: Vec<Category>,
}

impl CategoryTree {
    /// Groups a flat category list into parents and their children.
    pub fn build(categories: &[Category]) -> Self {
        let nodes: Vec<CategoryNode> = sibling_group(categories, None)
            .into_iter()
            .map(|parent| CategoryNode {
                category: parent.clone(),
                children: sibling_group(categories, Some(&parent.id))
                    .into_iter()
                    .cloned()
                    .collect(),
            })
            .collect();

        let orphans = categories
            .iter()
            .filter(|c| {
                c.parent_category_id
                    .as_deref()
                    .is_some_and(|pid| !categories.iter().any(|p| p.id == pid))
            })
            .cloned()
            .collect();

        CategoryTree { nodes, orphans }
    }

    /// Parents followed by their children, depth-first.
    pub fn flatten(&self) -> Vec<&Category> {
        self.nodes
            .iter()
            .flat_map(|n| std::iter::once(&n.category).chain(n.children.iter()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().map(|n| 1 + n.children.len()).sum::<usize>() + self.orphans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
