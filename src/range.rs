//! Code point interval sets.
//!
//! Every automaton edge and every set instruction is labelled with a list of
//! inclusive [`CodepointRange`]s. Most operations here expect the list to be
//! *normalized*: sorted ascending, with no two ranges overlapping or touching.
//! Callers normalize before constructing transitions; the rest of the crate
//! relies on it.

use std::fmt;

use smallvec::{smallvec, SmallVec};

/// Highest Unicode scalar value.
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

/// An inclusive interval `[low, high]` of code points.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodepointRange {
    pub low: u32,
    pub high: u32,
}

impl CodepointRange {
    #[inline]
    pub const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    /// A range holding exactly one code point.
    #[inline]
    pub const fn single(cp: u32) -> Self {
        Self { low: cp, high: cp }
    }

    #[inline]
    pub fn contains(&self, cp: u32) -> bool {
        self.low <= cp && cp <= self.high
    }

    /// True if the two intervals share at least one code point.
    #[inline]
    pub fn intersects(&self, other: &CodepointRange) -> bool {
        self.low <= other.high && other.low <= self.high
    }

    /// Number of code points covered.
    #[inline]
    pub fn width(&self) -> u32 {
        self.high - self.low + 1
    }
}

impl fmt::Debug for CodepointRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{:#x}", self.low)
        } else {
            write!(f, "{:#x}..={:#x}", self.low, self.high)
        }
    }
}

/// Sort `ranges` and merge overlapping or adjacent entries in place.
pub fn normalize(ranges: &mut Vec<CodepointRange>) {
    if ranges.len() < 2 {
        return;
    }
    ranges.sort_unstable();
    let mut write = 0;
    for read in 1..ranges.len() {
        let next = ranges[read];
        let cur = &mut ranges[write];
        if cur.high.saturating_add(1) >= next.low {
            cur.high = cur.high.max(next.high);
        } else {
            write += 1;
            ranges[write] = next;
        }
    }
    ranges.truncate(write + 1);
}

/// Normalized copy of an arbitrary range list.
pub fn normalized<I>(ranges: I) -> Vec<CodepointRange>
where
    I: IntoIterator<Item = CodepointRange>,
{
    let mut result: Vec<_> = ranges.into_iter().collect();
    normalize(&mut result);
    result
}

/// The gaps of a normalized range list over `[0, MAX_CODEPOINT]`.
pub fn complement(ranges: &[CodepointRange]) -> Vec<CodepointRange> {
    let mut result = Vec::with_capacity(ranges.len() + 1);
    let mut next_low = 0u32;
    for range in ranges {
        if range.low > next_low {
            result.push(CodepointRange::new(next_low, range.low - 1));
        }
        if range.high >= MAX_CODEPOINT {
            return result;
        }
        next_low = range.high + 1;
    }
    result.push(CodepointRange::new(next_low, MAX_CODEPOINT));
    result
}

/// True if any range of `a` overlaps any range of `b`. Both must be normalized.
pub fn intersects(a: &[CodepointRange], b: &[CodepointRange]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].intersects(&b[j]) {
            return true;
        }
        if a[i].high < b[j].high {
            i += 1;
        } else {
            j += 1;
        }
    }
    false
}

/// Membership test against a normalized list.
#[inline]
pub fn contains(ranges: &[CodepointRange], cp: u32) -> bool {
    ranges
        .binary_search_by(|r| {
            if r.high < cp {
                std::cmp::Ordering::Less
            } else if r.low > cp {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Unpack a flat `[low0, high0, low1, high1, ...]` array. A trailing odd
/// element is ignored.
pub fn to_pairs(packed: &[u32]) -> Vec<CodepointRange> {
    packed
        .chunks_exact(2)
        .map(|pair| CodepointRange::new(pair[0], pair[1]))
        .collect()
}

/// Pack ranges into a flat `[low0, high0, low1, high1, ...]` array.
pub fn from_pairs(pairs: &[CodepointRange]) -> Vec<u32> {
    let mut result = Vec::with_capacity(pairs.len() * 2);
    for pair in pairs {
        result.push(pair.low);
        result.push(pair.high);
    }
    result
}

/// Remove `y` from `x`, leaving zero, one or two pieces.
pub fn subtract(x: CodepointRange, y: CodepointRange) -> SmallVec<[CodepointRange; 2]> {
    if !x.intersects(&y) {
        return smallvec![x];
    }
    let mut result = SmallVec::new();
    if y.low > x.low {
        result.push(CodepointRange::new(x.low, y.low - 1));
    }
    if y.high < x.high {
        result.push(CodepointRange::new(y.high + 1, x.high));
    }
    result
}

/// Union of two range lists, normalized.
pub fn merge(a: &[CodepointRange], b: &[CodepointRange]) -> Vec<CodepointRange> {
    normalized(a.iter().chain(b.iter()).copied())
}

/// Collapse a sorted run of code points into ranges.
pub fn ranges_from_sorted<I>(codepoints: I) -> Vec<CodepointRange>
where
    I: IntoIterator<Item = u32>,
{
    let mut result: Vec<CodepointRange> = Vec::new();
    for cp in codepoints {
        match result.last_mut() {
            Some(last) if cp <= last.high.saturating_add(1) => {
                last.high = last.high.max(cp);
            }
            _ => result.push(CodepointRange::single(cp)),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(low: u32, high: u32) -> CodepointRange {
        CodepointRange::new(low, high)
    }

    #[test]
    fn test_normalize_merges_overlap_and_adjacency() {
        let mut ranges = vec![r(10, 20), r(0, 3), r(4, 5), r(15, 30), r(40, 40)];
        normalize(&mut ranges);
        assert_eq!(ranges, vec![r(0, 5), r(10, 30), r(40, 40)]);
    }

    #[test]
    fn test_normalize_keeps_gap_of_one() {
        let mut ranges = vec![r(0, 3), r(5, 6)];
        normalize(&mut ranges);
        assert_eq!(ranges, vec![r(0, 3), r(5, 6)]);
    }

    #[test]
    fn test_complement_edges() {
        assert_eq!(complement(&[]), vec![r(0, MAX_CODEPOINT)]);
        assert!(complement(&[r(0, MAX_CODEPOINT)]).is_empty());
        assert_eq!(
            complement(&[r(0, 9), r(20, 29)]),
            vec![r(10, 19), r(30, MAX_CODEPOINT)]
        );
        assert_eq!(
            complement(&[r(5, 5), r(100, MAX_CODEPOINT)]),
            vec![r(0, 4), r(6, 99)]
        );
    }

    #[test]
    fn test_set_intersects() {
        assert!(intersects(&[r(0, 5), r(10, 20)], &[r(18, 30)]));
        assert!(!intersects(&[r(0, 5), r(10, 20)], &[r(6, 9), r(21, 40)]));
        assert!(!intersects(&[], &[r(0, 1)]));
    }

    #[test]
    fn test_contains() {
        let set = [r('a' as u32, 'z' as u32), r('0' as u32, '9' as u32)];
        let mut set = set.to_vec();
        normalize(&mut set);
        assert!(contains(&set, 'q' as u32));
        assert!(contains(&set, '0' as u32));
        assert!(!contains(&set, 'A' as u32));
    }

    #[test]
    fn test_pairs() {
        let packed = [1, 2, 7, 9];
        let pairs = to_pairs(&packed);
        assert_eq!(pairs, vec![r(1, 2), r(7, 9)]);
        assert_eq!(from_pairs(&pairs), packed.to_vec());
    }

    #[test]
    fn test_subtract() {
        assert_eq!(subtract(r(0, 10), r(20, 30)).as_slice(), &[r(0, 10)]);
        assert!(subtract(r(5, 6), r(0, 10)).is_empty());
        assert_eq!(subtract(r(0, 10), r(0, 4)).as_slice(), &[r(5, 10)]);
        assert_eq!(subtract(r(0, 10), r(8, 12)).as_slice(), &[r(0, 7)]);
        assert_eq!(subtract(r(0, 10), r(3, 4)).as_slice(), &[r(0, 2), r(5, 10)]);
    }

    #[test]
    fn test_ranges_from_sorted() {
        let cps = [1, 2, 3, 3, 7, 9, 10];
        assert_eq!(ranges_from_sorted(cps), vec![r(1, 3), r(7, 7), r(9, 10)]);
    }
}
