//! Pending single-step moves.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::agent::Command;
use crate::game::Position;

/// Why a move was queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    /// Reinforce against a threat to our General.
    Defend,
    /// Route army toward an enemy General.
    AttackGeneral,
    /// Take neutral or enemy land.
    ExpandLand,
    /// Take a City.
    ExpandCity,
    /// Chase a retreating incursion.
    Attack,
}

impl Purpose {
    /// Whether the move works toward a goal tile, and becomes pointless once
    /// that tile is ours.
    #[must_use]
    pub const fn has_goal(self) -> bool {
        matches!(
            self,
            Purpose::Defend | Purpose::AttackGeneral | Purpose::ExpandLand | Purpose::ExpandCity
        )
    }
}

/// One atomic move and the route it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MoveItem {
    /// Source tile; must still be ours when the move is sent.
    pub from: Position,
    /// Adjacent destination tile.
    pub to: Position,
    /// Why the move was queued.
    pub purpose: Purpose,
    /// Priority of the route.
    pub priority: i64,
    /// Goal tile shared by every move of the route.
    pub target: Position,
}

impl MoveItem {
    /// The command that performs this move.
    #[must_use]
    pub const fn command(&self) -> Command {
        Command::attack(self.from, self.to)
    }
}

/// FIFO of pending moves, safe to share between threads.
///
/// The queue never reorders: priorities are honored by how the agent drains
/// and refills it.
#[derive(Debug, Default)]
pub struct MoveQueue {
    items: Mutex<VecDeque<MoveItem>>,
}

impl MoveQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the deque half-updated.
    fn lock(&self) -> MutexGuard<'_, VecDeque<MoveItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a move.
    pub fn push_back(&self, item: MoveItem) {
        self.lock().push_back(item);
    }

    /// Remove and return the oldest move.
    #[must_use]
    pub fn pop_front(&self) -> Option<MoveItem> {
        self.lock().pop_front()
    }

    /// Check if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of pending moves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Drop every pending move.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Copy of the pending moves, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<MoveItem> {
        self.lock().iter().copied().collect()
    }
}
