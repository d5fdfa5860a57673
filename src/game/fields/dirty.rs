//! Fixed-slot change tracking
//!
//! One bit per fixed slot plus the "already scheduled" flag that keeps an
//! entity from being queued for replication more than once per flush cycle.

use bitvec::prelude::*;

#[derive(Debug, Clone)]
pub struct DirtyTracker {
    changes: BitVec<u32, Lsb0>,
    scheduled: bool,
    enqueue_pending: bool,
}

impl DirtyTracker {
    pub fn new(slots: usize) -> Self {
        Self {
            changes: bitvec![u32, Lsb0; 0; slots],
            scheduled: false,
            enqueue_pending: false,
        }
    }

    /// Flag a slot as changed and schedule the owner
    pub fn mark(&mut self, slot: usize) {
        if let Some(mut bit) = self.changes.get_mut(slot) {
            *bit = true;
        }
        self.schedule();
    }

    /// Schedule the owner without touching the slot bits (dynamic changes)
    pub fn schedule(&mut self) {
        if !self.scheduled {
            self.scheduled = true;
            self.enqueue_pending = true;
        }
    }

    /// Returns true exactly once per flush cycle, the first time it is called
    /// after the owner got scheduled
    pub fn take_enqueue(&mut self) -> bool {
        std::mem::take(&mut self.enqueue_pending)
    }

    #[inline]
    pub fn is_dirty(&self, slot: usize) -> bool {
        self.changes.get(slot).map(|b| *b).unwrap_or(false)
    }

    #[inline]
    pub fn any(&self) -> bool {
        self.changes.any()
    }

    #[inline]
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    pub fn dirty_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.changes.iter_ones()
    }

    pub fn changes(&self) -> &BitSlice<u32, Lsb0> {
        &self.changes
    }

    /// Reset for the next cycle
    pub fn clear(&mut self) {
        self.changes.fill(false);
        self.scheduled = false;
        self.enqueue_pending = false;
    }
}
