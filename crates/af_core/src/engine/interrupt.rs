//! Behavior Interrupt Stack
//!
//! Per-entity LIFO of timed behavior overrides.
//!
//! ## State flow
//! ```text
//! Idle/Running ──push(Engagement)──► Engaged ──timeout──► (restored)
//!      │                                │
//!      └──push(Tackle)──► Tackling/Grappling ◄──push(Tackle)──┘
//! ```
//!
//! Push stores a full snapshot of the current behavior and switches to the
//! interrupt's state; pop restores the snapshot exactly. Only the top entry
//! counts down and only the top entry is "active".

use serde::{Deserialize, Serialize};

use crate::engine::components::{Behavior, BehaviorState};
use crate::error::InterruptError;

/// Interrupt kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterruptKind {
    Engagement,
    Tackle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterruptEntry {
    pub kind: InterruptKind,
    /// Behavior to restore on pop
    pub saved: Behavior,
    pub remaining: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterruptStack {
    entries: Vec<InterruptEntry>,
}

impl InterruptStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn top(&self) -> Option<&InterruptEntry> {
        self.entries.last()
    }

    /// Whether the driving (top) entry is of `kind`.
    pub fn has_active(&self, kind: InterruptKind) -> bool {
        self.top().is_some_and(|e| e.kind == kind)
    }

    /// Snapshot `behavior`, then switch it to `state` for `duration` seconds.
    pub fn push(
        &mut self,
        kind: InterruptKind,
        duration: f32,
        state: BehaviorState,
        behavior: &mut Behavior,
    ) -> Result<(), InterruptError> {
        if duration <= 0.0 || duration.is_nan() {
            return Err(InterruptError::NonPositiveDuration(duration));
        }
        self.entries.push(InterruptEntry { kind, saved: *behavior, remaining: duration });
        *behavior = Behavior { state, timer: duration, ..*behavior };
        Ok(())
    }

    /// Pop the top entry and restore its snapshot.
    pub fn pop(&mut self, behavior: &mut Behavior) -> Option<InterruptKind> {
        let entry = self.entries.pop()?;
        *behavior = entry.saved;
        Some(entry.kind)
    }

    /// Count the top entry down by `dt`; pop while the top has expired.
    ///
    /// Returns the number of entries popped.
    pub fn tick(&mut self, dt: f32, behavior: &mut Behavior) -> usize {
        let mut popped = 0;
        if let Some(top) = self.entries.last_mut() {
            top.remaining -= dt;
            behavior.timer = top.remaining.max(0.0);
        }
        while self.entries.last().is_some_and(|e| e.remaining <= 0.0) {
            self.pop(behavior);
            popped += 1;
        }
        popped
    }

    /// Pop the top entry if it is of `kind`.
    pub fn clear_kind(&mut self, kind: InterruptKind, behavior: &mut Behavior) -> bool {
        if self.has_active(kind) {
            self.pop(behavior);
            true
        } else {
            false
        }
    }

    /// Cap the active entry's remaining time if it is of `kind`.
    pub fn shorten_active(&mut self, kind: InterruptKind, max_remaining: f32) -> bool {
        match self.entries.last_mut() {
            Some(top) if top.kind == kind => {
                top.remaining = top.remaining.min(max_remaining);
                true
            }
            _ => false,
        }
    }

    /// Drop every entry, restoring the oldest snapshot.
    pub fn clear_all(&mut self, behavior: &mut Behavior) {
        if let Some(bottom) = self.entries.first() {
            *behavior = bottom.saved;
        }
        self.entries.clear();
    }
}
