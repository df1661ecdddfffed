//! Sparse set of program counters.
//!
//! Based on: https://research.swtch.com/sparse
//!
//! Membership, insertion and clearing are O(1). The VM clears one of these
//! per input character, so the constant-time clear matters more than the
//! `2 * capacity` memory.

/// A set of program counters below a fixed capacity.
#[derive(Clone, Debug)]
pub struct SparseSet {
    len: usize,
    /// Members in insertion order.
    dense: Vec<usize>,
    /// `sparse[pc]` is the position of `pc` in `dense`, if it is a member.
    sparse: Vec<usize>,
}

impl SparseSet {
    /// Elements must be in `[0, capacity)`.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        SparseSet {
            len: 0,
            dense: vec![0; capacity],
            sparse: vec![0; capacity],
        }
    }

    /// Insert `pc`, returning false if it was already present.
    ///
    /// Panics if `pc >= capacity`.
    #[inline]
    pub fn insert(&mut self, pc: usize) -> bool {
        if self.contains(pc) {
            return false;
        }
        debug_assert!(self.len < self.dense.len());
        self.dense[self.len] = pc;
        self.sparse[pc] = self.len;
        self.len += 1;
        true
    }

    #[inline]
    pub fn contains(&self, pc: usize) -> bool {
        let idx = self.sparse[pc];
        idx < self.len && self.dense[idx] == pc
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut set = SparseSet::new(8);
        assert!(!set.contains(6));
        assert!(set.insert(6));
        assert!(set.insert(0));
        assert!(!set.insert(6));
        assert!(set.contains(0));
        assert!(set.contains(6));
        assert!(!set.contains(3));
    }

    #[test]
    fn test_clear_forgets_stale_entries() {
        let mut set = SparseSet::new(4);
        set.insert(1);
        set.insert(2);
        set.clear();
        assert!(!set.contains(1));
        assert!(!set.contains(2));
        set.insert(2);
        assert!(set.contains(2));
        assert!(!set.contains(1));
    }
}
