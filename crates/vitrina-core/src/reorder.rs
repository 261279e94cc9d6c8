//! # Reorder Session
//!
//! Drag-and-drop reordering of the category list with optimistic local
//! updates and a compensating resync.
//!
//! ## State Machine
//! ```text
//!                ┌──────────── cancel_drag ────────────┐
//!                │                                      │
//!   ┌──────┐ begin_drag ┌────────────┐  drop_on   ┌────┴───────┐
//!   │ Idle │───────────►│ Reordering │───────────►│ Persisting │
//!   └──────┘            └────────────┘ (changes)  └─────┬──────┘
//!      ▲  ▲                    │                        │
//!      │  └── no changes ──────┘             ┌──────────┴──────────┐
//!      │                                     │ persisted           │ persist_failed
//!      │                                     ▼                     ▼
//!      │                              ┌───────────┐          ┌────────┐
//!      ├──────── begin_drag / ────────│ Confirmed │          │ Failed │
//!      │         acknowledge          └───────────┘          └───┬────┘
//!      │                                                         │ begin_resync
//!      │                 resynced    ┌───────────┐               │
//!      └─────────────────────────────│ Resyncing │◄──────────────┘
//!                                    └───────────┘
//! ```
//!
//! The list is mutated on `drop_on`, before anything is written. If the
//! batch write fails the local copy may no longer match storage, so the
//! owner of the session must re-fetch the categories and call `resynced`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::category_tree::{reorder_children, reorder_parents};
use crate::error::{CoreError, CoreResult};
use crate::types::{Category, OrderUpdate};
use crate::DRAG_ACTIVATION_DISTANCE;

// =============================================================================
// Drag Gesture
// =============================================================================

/// Pointer movement tracker that separates clicks from drags.
///
/// A gesture becomes a drag once the pointer has moved at least
/// [`DRAG_ACTIVATION_DISTANCE`] pixels from where it went down. It stays a
/// drag even if the pointer returns to the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    origin: (f64, f64),
    active: bool,
}

impl DragGesture {
    /// Pointer went down at `(x, y)`.
    pub fn start(x: f64, y: f64) -> Self {
        DragGesture {
            origin: (x, y),
            active: false,
        }
    }

    /// Pointer moved to `(x, y)`. Returns whether the gesture is a drag.
    pub fn move_to(&mut self, x: f64, y: f64) -> bool {
        if !self.active {
            let dx = x - self.origin.0;
            let dy = y - self.origin.1;
            self.active = (dx * dx + dy * dy).sqrt() >= DRAG_ACTIVATION_DISTANCE;
        }
        self.active
    }

    #[inline]
    pub fn is_drag(&self) -> bool {
        self.active
    }
}

// =============================================================================
// Session
// =============================================================================

/// Which sibling group a drag operates in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "level", rename_all = "camelCase")]
pub enum ReorderScope {
    Parents,
    Children {
        #[serde(rename = "parentId")]
        parent_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ReorderState {
    Idle,
    Reordering {
        scope: ReorderScope,
        #[serde(rename = "draggedId")]
        dragged_id: String,
    },
    /// Local list already reflects `updates`; the write is in flight.
    Persisting { updates: Vec<OrderUpdate> },
    Confirmed,
    Failed { error: String },
    Resyncing,
}

impl ReorderState {
    fn name(&self) -> &'static str {
        match self {
            ReorderState::Idle => "idle",
            ReorderState::Reordering { .. } => "reordering",
            ReorderState::Persisting { .. } => "persisting",
            ReorderState::Confirmed => "confirmed",
            ReorderState::Failed { .. } => "failed",
            ReorderState::Resyncing => "resyncing",
        }
    }
}

/// Tracks one drag-and-drop interaction from pickup to persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReorderSession {
    state: ReorderState,
}

impl Default for ReorderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReorderSession {
    pub fn new() -> Self {
        ReorderSession {
            state: ReorderState::Idle,
        }
    }

    pub fn state(&self) -> &ReorderState {
        &self.state
    }

    /// True while a write is in flight or a resync is pending.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            ReorderState::Persisting { .. } | ReorderState::Failed { .. } | ReorderState::Resyncing
        )
    }

    fn invalid(&self, action: &str) -> CoreError {
        CoreError::InvalidReorderTransition {
            action: action.to_string(),
            state: self.state.name().to_string(),
        }
    }

    /// A drag passed the activation distance on `dragged_id`.
    pub fn begin_drag(&mut self, scope: ReorderScope, dragged_id: impl Into<String>) -> CoreResult<()> {
        match self.state {
            ReorderState::Idle | ReorderState::Confirmed => {
                self.state = ReorderState::Reordering {
                    scope,
                    dragged_id: dragged_id.into(),
                };
                Ok(())
            }
            _ => Err(self.invalid("begin drag")),
        }
    }

    /// The pointer was released outside any drop target.
    pub fn cancel_drag(&mut self) -> CoreResult<()> {
        match self.state {
            ReorderState::Reordering { .. } => {
                self.state = ReorderState::Idle;
                Ok(())
            }
            _ => Err(self.invalid("cancel drag")),
        }
    }

    /// The dragged category was dropped onto `target_id`.
    ///
    /// Reorders `categories` in place and returns the changed pairs to
    /// persist. An empty result means nothing moved and the session is back
    /// to `Idle`. A rejected drop (e.g. across groups) also returns to
    /// `Idle` with the list untouched.
    pub fn drop_on(
        &mut self,
        categories: &mut [Category],
        target_id: &str,
    ) -> CoreResult<Vec<OrderUpdate>> {
        let (scope, dragged_id) = match &self.state {
            ReorderState::Reordering { scope, dragged_id } => (scope.clone(), dragged_id.clone()),
            _ => return Err(self.invalid("drop")),
        };

        let result = match &scope {
            ReorderScope::Parents => reorder_parents(categories, &dragged_id, target_id),
            ReorderScope::Children { parent_id } => {
                reorder_children(categories, parent_id, &dragged_id, target_id)
            }
        };

        match result {
            Ok(updates) if updates.is_empty() => {
                self.state = ReorderState::Idle;
                Ok(updates)
            }
            Ok(updates) => {
                self.state = ReorderState::Persisting {
                    updates: updates.clone(),
                };
                Ok(updates)
            }
            Err(err) => {
                self.state = ReorderState::Idle;
                Err(err)
            }
        }
    }

    /// The batch write succeeded.
    pub fn persisted(&mut self) -> CoreResult<()> {
        match self.state {
            ReorderState::Persisting { .. } => {
                self.state = ReorderState::Confirmed;
                Ok(())
            }
            _ => Err(self.invalid("confirm")),
        }
    }

    /// The batch write failed; the local list is now suspect.
    pub fn persist_failed(&mut self, error: impl Into<String>) -> CoreResult<()> {
        match self.state {
            ReorderState::Persisting { .. } => {
                self.state = ReorderState::Failed {
                    error: error.into(),
                };
                Ok(())
            }
            _ => Err(self.invalid("fail")),
        }
    }

    pub fn begin_resync(&mut self) -> CoreResult<()> {
        match self.state {
            ReorderState::Failed { .. } => {
                self.state = ReorderState::Resyncing;
                Ok(())
            }
            _ => Err(self.invalid("resync")),
        }
    }

    /// Authoritative categories were reloaded.
    ///
    /// Also accepted from `Failed` so a caller whose resync fetch succeeded
    /// straight away can skip `begin_resync`.
    pub fn resynced(&mut self) -> CoreResult<()> {
        match self.state {
            ReorderState::Resyncing | ReorderState::Failed { .. } => {
                self.state = ReorderState::Idle;
                Ok(())
            }
            _ => Err(self.invalid("finish resync")),
        }
    }

    /// Clears a `Confirmed` state.
    pub fn acknowledge(&mut self) {
        if self.state == ReorderState::Confirmed {
            self.state = ReorderState::Idle;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
