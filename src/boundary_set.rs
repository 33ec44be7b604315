//! Sorted sets of pairwise-disjoint boundaries.
//!
//! Every batch operation locates the affected run of boundaries with two
//! binary searches and rewrites only that run, so an insertion costs
//! `O(log n)` comparisons plus the splice.

use std::{cmp::Ordering, fmt};

use crate::{
    boundary::{Boundary, BoundaryValue, Difference, cmp_upper_lower, comparison_comparator},
    compare::{Comparator, ComparisonResult, Outcome, tri},
};

/// Ascending, pairwise-disjoint and non-adjacent boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySet<T> {
    boundaries: Vec<Boundary<T>>,
    comparator: Option<Comparator<T>>,
}

impl<T> Default for BoundarySet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Tri-state binary search.
///
/// `locate` tells where an element sits relative to the probe: `Less` when
/// it comes before, `Greater` when after, `Equal` when it owns the probe.
/// Returns `Ok(index)` of an owning element or `Err(insertion_point)`.
pub fn binary_search_by<E, F>(items: &[E], mut locate: F) -> Outcome<Result<usize, usize>>
where
    F: FnMut(&E) -> ComparisonResult,
{
    let (mut low, mut high) = (0, items.len());
    while low < high {
        let mid = low + (high - low) / 2;
        match locate(&items[mid]) {
            ComparisonResult::Less => low = mid + 1,
            ComparisonResult::Greater => high = mid,
            ComparisonResult::Equal => return Outcome::Defined(Ok(mid)),
            ComparisonResult::Undefined => return Outcome::Undefined,
            ComparisonResult::Erroneous => return Outcome::Erroneous,
        }
    }
    Outcome::Defined(Err(low))
}

/// First index for which `before` is false; `before` must hold for a prefix.
fn partition_point<E, F>(items: &[E], mut before: F) -> Outcome<usize>
where
    F: FnMut(&E) -> Outcome<bool>,
{
    let (mut low, mut high) = (0, items.len());
    while low < high {
        let mid = low + (high - low) / 2;
        if tri!(before(&items[mid])) {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    Outcome::Defined(low)
}

/// Encodes a search result the conventional way: a hit is its index, a miss
/// is `-(insertion_point) - 1`.
pub fn encode_search_index(result: Result<usize, usize>) -> isize {
    match result {
        Ok(index) => isize::try_from(index).unwrap_or(isize::MAX),
        Err(insertion) => -isize::try_from(insertion).unwrap_or(isize::MAX) - 1,
    }
}

impl<T> BoundarySet<T> {
    pub const fn new() -> Self {
        Self {
            boundaries: Vec::new(),
            comparator: None,
        }
    }

    pub const fn with_comparator(comparator: Comparator<T>) -> Self {
        Self {
            boundaries: Vec::new(),
            comparator: Some(comparator),
        }
    }

    pub fn as_slice(&self) -> &[Boundary<T>] {
        &self.boundaries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Boundary<T>> {
        self.boundaries.iter()
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub const fn comparator(&self) -> Option<&Comparator<T>> {
        self.comparator.as_ref()
    }

    pub fn into_vec(self) -> Vec<Boundary<T>> {
        self.boundaries
    }
}

impl<'a, T> IntoIterator for &'a BoundarySet<T> {
    type Item = &'a Boundary<T>;
    type IntoIter = std::slice::Iter<'a, Boundary<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.boundaries.iter()
    }
}

impl<T: BoundaryValue> BoundarySet<T> {
    /// The union of `boundaries`.
    pub fn from_boundaries<I>(boundaries: I) -> Outcome<Self>
    where
        I: IntoIterator<Item = Boundary<T>>,
    {
        Self::new().unions(boundaries)
    }

    /// The intersection of all `boundaries`; empty when none are given.
    pub fn intersection_of<I>(boundaries: I) -> Outcome<Self>
    where
        I: IntoIterator<Item = Boundary<T>>,
    {
        let mut boundaries = boundaries.into_iter();
        let Some(first) = boundaries.next() else {
            return Outcome::Defined(Self::new());
        };
        tri!(Self::new().unions([first])).intersections(boundaries)
    }

    fn effective(&self) -> Comparator<T> {
        self.comparator.clone().unwrap_or_else(Comparator::partial)
    }

    /// Agrees the set's comparator with `boundary`'s.
    fn adopt(&self, boundary: &Boundary<T>) -> Outcome<Self> {
        let agreed = tri!(comparison_comparator(self.comparator.as_ref(), boundary.comparator()));
        if agreed == self.comparator {
            return Outcome::Defined(self.clone());
        }
        Outcome::Defined(Self {
            boundaries: self
                .boundaries
                .iter()
                .map(|b| Boundary::from_edges(b.lower.clone(), b.upper.clone(), agreed.clone()))
                .collect(),
            comparator: agreed,
        })
    }

    /// Finds the boundary owning `value`, or where one would be inserted.
    pub fn binary_search(&self, value: &T) -> Outcome<Result<usize, usize>> {
        let c = self.effective();
        binary_search_by(&self.boundaries, |boundary| {
            if let Some(upper) = boundary.upper() {
                match c.compare(upper, value) {
                    ComparisonResult::Less => return ComparisonResult::Less,
                    ComparisonResult::Equal | ComparisonResult::Greater => {},
                    sentinel => return sentinel,
                }
            }
            match boundary.within_bounds(value, Some(&c)) {
                Outcome::Defined(true) => ComparisonResult::Equal,
                Outcome::Defined(false) => ComparisonResult::Greater,
                Outcome::Undefined => ComparisonResult::Undefined,
                Outcome::Erroneous => ComparisonResult::Erroneous,
            }
        })
        .logged("binary search")
    }

    pub fn contains(&self, value: &T) -> Outcome<bool> {
        self.binary_search(value).map(|found| found.is_ok())
    }

    /// Range of boundaries overlapping `probe` (or, when `merge` is set,
    /// overlapping or adjacent to it).
    fn affected(&self, probe: &Boundary<T>, c: &Comparator<T>, merge: bool) -> Outcome<(usize, usize)> {
        let touches = |item: &Boundary<T>| {
            if merge {
                item.mergeable_with(probe, c)
            } else {
                item.overlaps_with(probe, c)
            }
        };
        let start = tri!(partition_point(&self.boundaries, |item| {
            touches(item).not().and(|| cmp_upper_lower(c, item.upper(), probe.lower()).is_lt())
        }));
        let end = tri!(partition_point(&self.boundaries, |item| {
            touches(item).or(|| cmp_upper_lower(c, item.upper(), probe.lower()).is_lt())
        }));
        Outcome::Defined((start, end.max(start)))
    }

    /// Adds every boundary, merging overlapping and adjacent ones.
    pub fn unions<I>(&self, boundaries: I) -> Outcome<Self>
    where
        I: IntoIterator<Item = Boundary<T>>,
    {
        self.merge_in(boundaries).logged("set union")
    }

    fn merge_in<I>(&self, boundaries: I) -> Outcome<Self>
    where
        I: IntoIterator<Item = Boundary<T>>,
    {
        let mut set = self.clone();
        for boundary in boundaries {
            if boundary.is_empty() {
                continue;
            }
            set = tri!(set.adopt(&boundary));
            let c = set.effective();
            let (start, end) = tri!(set.affected(&boundary, &c, true));
            log::trace!("union spans boundaries {start}..{end} of {}", set.len());
            let mut merged = boundary.recomparatored(set.comparator.as_ref());
            for item in &set.boundaries[start..end] {
                merged = tri!(merged.hull(item, &c, set.comparator.clone()));
            }
            set.boundaries.splice(start..end, [merged]);
        }
        Outcome::Defined(set)
    }

    /// Narrows the set to the values inside every boundary.
    pub fn intersections<I>(&self, boundaries: I) -> Outcome<Self>
    where
        I: IntoIterator<Item = Boundary<T>>,
    {
        self.narrow_to(boundaries).logged("set intersection")
    }

    fn narrow_to<I>(&self, boundaries: I) -> Outcome<Self>
    where
        I: IntoIterator<Item = Boundary<T>>,
    {
        let mut set = self.clone();
        for boundary in boundaries {
            set = tri!(set.adopt(&boundary));
            if boundary.is_empty() {
                set.boundaries.clear();
                continue;
            }
            let c = set.effective();
            let (start, end) = tri!(set.affected(&boundary, &c, false));
            log::trace!("intersection keeps boundaries {start}..{end} of {}", set.len());
            let mut narrowed = Vec::with_capacity(end - start);
            for item in &set.boundaries[start..end] {
                narrowed.push(tri!(item.intersection_with(&boundary, &c, set.comparator.clone())));
            }
            set.boundaries = narrowed;
        }
        Outcome::Defined(set)
    }

    /// Removes every boundary from the set, splitting where needed.
    pub fn differences<I>(&self, boundaries: I) -> Outcome<Self>
    where
        I: IntoIterator<Item = Boundary<T>>,
    {
        self.cut_out(boundaries).logged("set difference")
    }

    fn cut_out<I>(&self, boundaries: I) -> Outcome<Self>
    where
        I: IntoIterator<Item = Boundary<T>>,
    {
        let mut set = self.clone();
        for boundary in boundaries {
            if boundary.is_empty() {
                continue;
            }
            set = tri!(set.adopt(&boundary));
            let c = set.effective();
            let (start, end) = tri!(set.affected(&boundary, &c, false));
            log::trace!("difference cuts boundaries {start}..{end} of {}", set.len());
            let mut pieces = Vec::new();
            for item in &set.boundaries[start..end] {
                let difference = tri!(item.difference_with(&boundary, &c, set.comparator.clone()));
                if matches!(difference, Difference::Split(..)) {
                    log::trace!("difference splits a boundary in two");
                }
                pieces.extend(difference.into_boundaries());
            }
            set.boundaries.splice(start..end, pieces);
        }
        Outcome::Defined(set)
    }

    /// Checks the disjoint-sorted invariant under the set's comparator.
    pub fn is_normalized(&self) -> Outcome<bool> {
        let c = self.effective();
        for pair in self.boundaries.windows(2) {
            let [a, b] = pair else { continue };
            if a.is_empty() || b.is_empty() {
                return Outcome::Defined(false);
            }
            let ordered = tri!(cmp_upper_lower(&c, a.upper(), b.lower()).test(Ordering::is_lt));
            if !ordered || tri!(a.mergeable_with(b, &c)) {
                return Outcome::Defined(false);
            }
        }
        Outcome::Defined(true)
    }
}

impl<T: fmt::Display> fmt::Display for BoundarySet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, boundary) in self.boundaries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{boundary}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn closed(lower: i64, upper: i64) -> Boundary<i64> {
        Boundary::closed(lower, upper).unwrap()
    }

    fn set(boundaries: &[(i64, i64)]) -> BoundarySet<i64> {
        let set = BoundarySet::from_boundaries(boundaries.iter().map(|&(l, u)| closed(l, u)))
            .defined()
            .unwrap();
        assert_eq!(set.is_normalized(), Outcome::Defined(true));
        set
    }

    fn edges(set: &BoundarySet<i64>) -> Vec<(Option<i64>, Option<i64>)> {
        set.iter().map(|b| (b.lower().copied(), b.upper().copied())).collect()
    }

    #[test]
    fn test_unions_disjoint_and_merged() {
        let disjoint = set(&[(1, 5)]).unions([closed(10, 15)]).defined().unwrap();
        assert_eq!(edges(&disjoint), vec![(Some(1), Some(5)), (Some(10), Some(15))]);

        let merged = set(&[(1, 10)]).unions([closed(5, 15)]).defined().unwrap();
        assert_eq!(edges(&merged), vec![(Some(1), Some(15))]);
    }

    #[test]
    fn test_unions_spanning_many() {
        let base = set(&[(1, 2), (4, 5), (8, 9), (20, 30)]);
        let result = base.unions([closed(3, 10)]).defined().unwrap();
        assert_eq!(edges(&result), vec![(Some(1), Some(10)), (Some(20), Some(30))]);
        assert_eq!(result.is_normalized(), Outcome::Defined(true));
    }

    #[test]
    fn test_unions_any_order() {
        let a = set(&[(20, 25), (1, 3), (10, 12), (4, 6)]);
        assert_eq!(edges(&a), vec![(Some(1), Some(6)), (Some(10), Some(12)), (Some(20), Some(25))]);
    }

    #[test]
    fn test_unions_with_unbounded() {
        let base = set(&[(1, 2), (10, 12)]);
        let result = base.unions([Boundary::at_least(11)]).defined().unwrap();
        assert_eq!(edges(&result), vec![(Some(1), Some(2)), (Some(10), None)]);
        let result = result.unions([Boundary::at_most(0)]).defined().unwrap();
        assert_eq!(edges(&result), vec![(None, Some(2)), (Some(10), None)]);
    }

    #[test]
    fn test_binary_search() {
        let s = set(&[(1, 5), (10, 15), (20, 25)]);
        struct TestCase {
            value:    i64,
            expected: isize,
        }
        let cases = [
            TestCase { value: 0, expected: -1 },
            TestCase { value: 1, expected: 0 },
            TestCase { value: 5, expected: 0 },
            TestCase { value: 7, expected: -2 },
            TestCase { value: 12, expected: 1 },
            TestCase { value: 17, expected: -3 },
            TestCase { value: 25, expected: 2 },
            TestCase { value: 30, expected: -4 },
        ];
        for case in &cases {
            let found = s.binary_search(&case.value).defined().unwrap();
            assert_eq!(encode_search_index(found), case.expected, "value {}", case.value);
        }
        assert_eq!(s.contains(&12), Outcome::Defined(true));
        assert_eq!(s.contains(&18), Outcome::Defined(false));
    }

    #[test]
    fn test_binary_search_empty_set() {
        let s = BoundarySet::<i64>::new();
        assert_eq!(s.binary_search(&3), Outcome::Defined(Err(0)));
    }

    #[test]
    fn test_intersections() {
        let base = set(&[(1, 5), (10, 15), (20, 25)]);
        let result = base.intersections([closed(3, 22)]).defined().unwrap();
        assert_eq!(
            edges(&result),
            vec![(Some(3), Some(5)), (Some(10), Some(15)), (Some(20), Some(22))]
        );
        let result = result.intersections([closed(12, 30)]).defined().unwrap();
        assert_eq!(edges(&result), vec![(Some(12), Some(15)), (Some(20), Some(22))]);

        let none = base.intersections([closed(6, 9)]).defined().unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_intersection_of() {
        let result = BoundarySet::intersection_of([closed(1, 10), closed(5, 15), Boundary::at_most(8)])
            .defined()
            .unwrap();
        assert_eq!(edges(&result), vec![(Some(5), Some(8))]);
        assert!(BoundarySet::<i64>::intersection_of([]).defined().unwrap().is_empty());
    }

    #[test]
    fn test_differences() {
        let base = set(&[(1, 10), (20, 30)]);
        let result = base.differences([closed(4, 6)]).defined().unwrap();
        assert_eq!(
            edges(&result),
            vec![(Some(1), Some(3)), (Some(7), Some(10)), (Some(20), Some(30))]
        );

        let result = base.differences([closed(8, 25)]).defined().unwrap();
        assert_eq!(edges(&result), vec![(Some(1), Some(7)), (Some(26), Some(30))]);

        let result = base.differences([Boundary::unbounded()]).defined().unwrap();
        assert!(result.is_empty());

        let untouched = base.differences([closed(12, 18)]).defined().unwrap();
        assert_eq!(untouched, base);
    }

    #[test]
    fn test_incompatible_comparator_is_undefined() {
        let natural = Comparator::<i64>::natural();
        let base = BoundarySet::with_comparator(natural.clone())
            .unions([closed(1, 5)])
            .defined()
            .unwrap();
        let foreign = Boundary::with_comparator(Some(9), Some(3), natural.reverse()).unwrap();
        assert_eq!(base.unions([foreign.clone()]), Outcome::Undefined);
        assert_eq!(base.differences([foreign]), Outcome::Undefined);
    }

    #[test]
    fn test_continuous_difference_is_undefined() {
        let base = BoundarySet::from_boundaries([Boundary::closed(0.0, 10.0).unwrap()])
            .defined()
            .unwrap();
        assert_eq!(base.differences([Boundary::closed(2.0, 3.0).unwrap()]), Outcome::Undefined);
    }

    struct Captured(Mutex<Vec<String>>);

    impl log::Log for Captured {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            metadata.level() <= log::Level::Debug
        }

        fn log(&self, record: &log::Record<'_>) {
            if let Ok(mut lines) = self.0.lock() {
                lines.push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    static CAPTURED: Captured = Captured(Mutex::new(Vec::new()));

    #[test]
    fn test_sentinel_results_are_logged() {
        if log::set_logger(&CAPTURED).is_ok() {
            log::set_max_level(log::LevelFilter::Debug);
        }
        let nan = Boundary::at_least(f64::NAN);
        let base = Boundary::closed(1.0, 2.0).unwrap();
        assert_eq!(base.union(&nan, None), Outcome::Undefined);
        let floats = BoundarySet::from_boundaries([base]).defined().unwrap();
        assert_eq!(floats.unions([nan]), Outcome::Undefined);

        let lines = CAPTURED.0.lock().unwrap().clone();
        assert!(lines.iter().any(|line| line == "union is undefined for its operands"), "{lines:?}");
        assert!(lines.iter().any(|line| line == "set union is undefined for its operands"), "{lines:?}");
    }

    #[test]
    fn test_display() {
        assert_eq!(set(&[(1, 5), (10, 15)]).to_string(), "{[1, 5], [10, 15]}");
        assert_eq!(BoundarySet::<i64>::new().to_string(), "{}");
    }
}
