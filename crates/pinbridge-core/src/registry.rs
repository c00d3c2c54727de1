use std::collections::BTreeSet;

/// Set of line numbers claimed since the chip was opened.
///
/// Pure bookkeeping: cleanup walks this set so that only touched lines are
/// driven low and released.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineRegistry {
    claimed: BTreeSet<u8>,
}

impl LineRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `pin` as claimed. Marking twice is harmless.
    pub fn mark(&mut self, pin: u8) {
        self.claimed.insert(pin);
    }

    /// Forgets `pin`.
    pub fn unmark(&mut self, pin: u8) {
        self.claimed.remove(&pin);
    }

    /// Forgets every pin.
    pub fn clear(&mut self) {
        self.claimed.clear();
    }

    /// Returns whether `pin` has been marked.
    pub fn contains(&self, pin: u8) -> bool {
        self.claimed.contains(&pin)
    }

    /// Number of marked pins.
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// Returns `true` when no pin is marked.
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }

    /// Marked pins in ascending order.
    pub fn pins(&self) -> impl Iterator<Item = u8> + '_ {
        self.claimed.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_is_idempotent() {
        let mut registry = LineRegistry::new();
        registry.mark(17);
        registry.mark(17);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(17));
    }

    #[test]
    fn test_unmark_and_clear() {
        let mut registry = LineRegistry::new();
        registry.mark(4);
        registry.mark(23);
        registry.mark(24);
        registry.unmark(23);
        registry.unmark(99); // never marked
        assert_eq!(registry.pins().collect::<Vec<_>>(), vec![4, 24]);

        registry.clear();
        assert!(registry.is_empty());
    }
}
