//! Stale-resolution gating
//!
//! Each refresh takes a sequence number before it fetches. Results may come
//! back in any order; only one newer than what is on screen is applied.

use wayfinder_resolve::NavForest;

/// Monotonic request ticket; `0` means nothing applied yet
pub type Sequence = u64;

/// Forest currently on screen and the ticket that produced it
#[derive(Debug, Clone, Default)]
pub struct DisplayedNav {
    forest: NavForest,
    applied: Sequence,
}

impl DisplayedNav {
    /// Empty display
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn forest(&self) -> &NavForest {
        &self.forest
    }

    /// Highest sequence applied so far
    #[inline]
    #[must_use]
    pub fn applied_seq(&self) -> Sequence {
        self.applied
    }

    /// Apply a resolution if it is newer than the displayed one
    ///
    /// Returns whether the forest was replaced.
    pub fn accept(&mut self, seq: Sequence, forest: NavForest) -> bool {
        if seq <= self.applied {
            tracing::debug!(
                "Discarding stale resolution #{} (displaying #{})",
                seq,
                self.applied
            );
            return false;
        }
        tracing::debug!("Applying resolution #{} with {} items", seq, forest.len());
        self.applied = seq;
        self.forest = forest;
        true
    }

    /// Patch badges on the displayed forest without touching the sequence
    pub fn update_badges(&mut self, patched: &NavForest) {
        for item in patched.iter() {
            self.forest.set_badge(item.id.as_str(), item.badge);
        }
    }

    /// Drop the forest on sign-out
    ///
    /// The applied sequence is kept, so in-flight results from the old
    /// session are still rejected.
    pub fn clear(&mut self) {
        self.forest = NavForest::new();
    }
}
