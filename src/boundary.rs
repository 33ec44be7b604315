//! Closed, possibly one-sided boundaries over an ordered value type.

use std::fmt;

use crate::{
    compare::{Comparator, ComparisonResult, Outcome, tri},
    error::{Error, Result},
};

/// Values a [`Boundary`] can be built over.
///
/// Discrete types also know their neighbours, which lets adjacent boundaries
/// merge (`[1, 5] ∪ [6, 9] = [1, 9]`) and lets a difference cut a boundary
/// into closed pieces.
pub trait BoundaryValue: Clone + PartialOrd + fmt::Debug + Send + Sync + 'static {
    const DISCRETE: bool = false;

    fn successor(&self) -> Option<Self> {
        None
    }

    fn predecessor(&self) -> Option<Self> {
        None
    }
}

macro_rules! discrete_boundary_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl BoundaryValue for $ty {
                const DISCRETE: bool = true;

                fn successor(&self) -> Option<Self> {
                    self.checked_add(1)
                }

                fn predecessor(&self) -> Option<Self> {
                    self.checked_sub(1)
                }
            }
        )*
    };
}

discrete_boundary_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl BoundaryValue for f32 {}
impl BoundaryValue for f64 {}
impl BoundaryValue for String {}
impl BoundaryValue for &'static str {}

/// A contiguous closed range `[lower, upper]`; a missing edge is unbounded.
///
/// A boundary without a comparator is *generic*: it adopts the comparator of
/// whatever it is combined with, and falls back to `PartialOrd` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary<T> {
    pub(crate) lower:      Option<T>,
    pub(crate) upper:      Option<T>,
    pub(crate) comparator: Option<Comparator<T>>,
    pub(crate) empty:      bool,
}

/// Result of [`Boundary::union`].
#[derive(Debug, Clone, PartialEq)]
pub enum Union<T> {
    /// The operands overlap or touch.
    Merged(Boundary<T>),
    /// The operands are disjoint, lower one first.
    Disjoint(Boundary<T>, Boundary<T>),
}

impl<T> Union<T> {
    pub fn into_boundaries(self) -> Vec<Boundary<T>> {
        match self {
            Self::Merged(boundary) => vec![boundary],
            Self::Disjoint(lower, upper) => vec![lower, upper],
        }
    }
}

/// Result of [`Boundary::difference`].
#[derive(Debug, Clone, PartialEq)]
pub enum Difference<T> {
    /// Nothing was removed.
    Unchanged(Boundary<T>),
    /// Everything was removed.
    Empty,
    /// One end was cut off.
    Single(Boundary<T>),
    /// The middle was cut out.
    Split(Boundary<T>, Boundary<T>),
}

impl<T> Difference<T> {
    pub fn into_boundaries(self) -> Vec<Boundary<T>> {
        match self {
            Self::Empty => Vec::new(),
            Self::Unchanged(boundary) | Self::Single(boundary) => vec![boundary],
            Self::Split(lower, upper) => vec![lower, upper],
        }
    }
}

/// Picks the comparator two operands agree on.
///
/// An absent comparator defers to the other side; two distinct comparators
/// cannot be combined and yield `Undefined`.
pub fn comparison_comparator<T>(
    a: Option<&Comparator<T>>,
    b: Option<&Comparator<T>>,
) -> Outcome<Option<Comparator<T>>> {
    match (a, b) {
        (None, None) => Outcome::Defined(None),
        (Some(c), None) | (None, Some(c)) => Outcome::Defined(Some(c.clone())),
        (Some(a), Some(b)) if a == b => Outcome::Defined(Some(a.clone())),
        (Some(a), Some(b)) => {
            log::debug!("incompatible comparators {a} and {b}");
            Outcome::Undefined
        },
    }
}

/// Orders two lower edges; `None` is minus infinity.
pub(crate) fn cmp_lower<T>(c: &Comparator<T>, a: Option<&T>, b: Option<&T>) -> ComparisonResult {
    match (a, b) {
        (None, None) => ComparisonResult::Equal,
        (None, Some(_)) => ComparisonResult::Less,
        (Some(_), None) => ComparisonResult::Greater,
        (Some(a), Some(b)) => c.compare(a, b),
    }
}

/// Orders two upper edges; `None` is plus infinity.
pub(crate) fn cmp_upper<T>(c: &Comparator<T>, a: Option<&T>, b: Option<&T>) -> ComparisonResult {
    match (a, b) {
        (None, None) => ComparisonResult::Equal,
        (None, Some(_)) => ComparisonResult::Greater,
        (Some(_), None) => ComparisonResult::Less,
        (Some(a), Some(b)) => c.compare(a, b),
    }
}

/// Orders an upper edge against a lower edge. An unbounded side always
/// reaches the other, so the upper edge counts as greater.
pub(crate) fn cmp_upper_lower<T>(
    c: &Comparator<T>,
    upper: Option<&T>,
    lower: Option<&T>,
) -> ComparisonResult {
    match (upper, lower) {
        (Some(upper), Some(lower)) => c.compare(upper, lower),
        _ => ComparisonResult::Greater,
    }
}

/// The neighbour of `value` that comes next under `c`.
fn step_after<T: BoundaryValue>(c: &Comparator<T>, value: &T) -> Outcome<Option<T>> {
    for candidate in [value.successor(), value.predecessor()].into_iter().flatten() {
        if tri!(c.compare(value, &candidate).is_lt()) {
            return Outcome::Defined(Some(candidate));
        }
    }
    Outcome::Defined(None)
}

/// The neighbour of `value` that comes just before it under `c`.
fn step_before<T: BoundaryValue>(c: &Comparator<T>, value: &T) -> Outcome<Option<T>> {
    for candidate in [value.predecessor(), value.successor()].into_iter().flatten() {
        if tri!(c.compare(value, &candidate).is_gt()) {
            return Outcome::Defined(Some(candidate));
        }
    }
    Outcome::Defined(None)
}

/// Whether a boundary ending at `upper` is immediately followed by one
/// starting at `lower`.
pub(crate) fn adjacent<T: BoundaryValue>(
    c: &Comparator<T>,
    upper: Option<&T>,
    lower: Option<&T>,
) -> Outcome<bool> {
    let (Some(upper), Some(lower)) = (upper, lower) else {
        return Outcome::Defined(false);
    };
    if !T::DISCRETE {
        return Outcome::Defined(false);
    }
    match tri!(step_after(c, upper)) {
        Some(next) => c.compare(&next, lower).test(|ordering| ordering.is_eq()),
        None => Outcome::Defined(false),
    }
}

impl<T> Boundary<T> {
    /// The boundary containing nothing.
    pub const fn empty() -> Self {
        Self {
            lower:      None,
            upper:      None,
            comparator: None,
            empty:      true,
        }
    }

    /// The boundary containing everything.
    pub const fn unbounded() -> Self {
        Self {
            lower:      None,
            upper:      None,
            comparator: None,
            empty:      false,
        }
    }

    pub const fn lower(&self) -> Option<&T> {
        self.lower.as_ref()
    }

    pub const fn upper(&self) -> Option<&T> {
        self.upper.as_ref()
    }

    pub const fn is_lower_unbounded(&self) -> bool {
        !self.empty && self.lower.is_none()
    }

    pub const fn is_upper_unbounded(&self) -> bool {
        !self.empty && self.upper.is_none()
    }

    pub const fn comparator(&self) -> Option<&Comparator<T>> {
        self.comparator.as_ref()
    }

    /// True only for the empty boundary. Construction rejects inverted
    /// edges, and an unbounded boundary is never empty.
    pub const fn is_empty(&self) -> bool {
        self.empty
    }
}

impl<T: BoundaryValue> Boundary<T> {
    /// A boundary without a comparator. Edges are checked with `PartialOrd`.
    ///
    /// # Errors
    /// `Error::Range` if both edges are present and `lower > upper`,
    /// `Error::Type` if the edges cannot be compared at all.
    pub fn generic(lower: Option<T>, upper: Option<T>) -> Result<Self> {
        Self::build(lower, upper, None)
    }

    /// A boundary ordered by `comparator`.
    ///
    /// # Errors
    /// Same as [`Boundary::generic`], judged by `comparator`.
    pub fn with_comparator(lower: Option<T>, upper: Option<T>, comparator: Comparator<T>) -> Result<Self> {
        Self::build(lower, upper, Some(comparator))
    }

    /// `[lower, upper]`, both edges bounded.
    ///
    /// # Errors
    /// See [`Boundary::generic`].
    pub fn closed(lower: T, upper: T) -> Result<Self> {
        Self::generic(Some(lower), Some(upper))
    }

    /// `[lower, +∞)`
    pub const fn at_least(lower: T) -> Self {
        Self {
            lower:      Some(lower),
            upper:      None,
            comparator: None,
            empty:      false,
        }
    }

    /// `(-∞, upper]`
    pub const fn at_most(upper: T) -> Self {
        Self {
            lower:      None,
            upper:      Some(upper),
            comparator: None,
            empty:      false,
        }
    }

    /// The empty boundary carrying `comparator`.
    pub const fn empty_with(comparator: Option<Comparator<T>>) -> Self {
        Self {
            lower: None,
            upper: None,
            comparator,
            empty: true,
        }
    }

    fn build(lower: Option<T>, upper: Option<T>, comparator: Option<Comparator<T>>) -> Result<Self> {
        if let (Some(l), Some(u)) = (&lower, &upper) {
            let order = comparator
                .as_ref()
                .map_or_else(|| ComparisonResult::from_partial(l.partial_cmp(u)), |c| c.compare(l, u));
            match order {
                ComparisonResult::Greater => {
                    return Err(Error::range(format!("boundary lower edge {l:?} is above upper edge {u:?}")));
                },
                ComparisonResult::Undefined | ComparisonResult::Erroneous => {
                    return Err(Error::type_error(format!("boundary edges {l:?} and {u:?} are not comparable")));
                },
                ComparisonResult::Less | ComparisonResult::Equal => {},
            }
        }
        Ok(Self {
            lower,
            upper,
            comparator,
            empty: false,
        })
    }

    /// Edges known to be ordered under `comparator`.
    pub(crate) const fn from_edges(lower: Option<T>, upper: Option<T>, comparator: Option<Comparator<T>>) -> Self {
        Self {
            lower,
            upper,
            comparator,
            empty: false,
        }
    }

    /// Same range, adopting `comparator` when this boundary has none.
    #[must_use]
    pub fn recomparatored(&self, comparator: Option<&Comparator<T>>) -> Self {
        let mut boundary = self.clone();
        if boundary.comparator.is_none() {
            boundary.comparator = comparator.cloned();
        }
        boundary
    }

    /// The comparator agreed between this boundary, `other` and the caller.
    fn agreed(&self, other: Option<&Self>, comparator: Option<&Comparator<T>>) -> Outcome<Option<Comparator<T>>> {
        let own = comparison_comparator(self.comparator.as_ref(), other.and_then(|o| o.comparator.as_ref()));
        let own = tri!(own);
        comparison_comparator(own.as_ref(), comparator)
    }

    /// The comparator used to evaluate edges: the agreed one, or `PartialOrd`.
    fn effective(&self, other: Option<&Self>, comparator: Option<&Comparator<T>>) -> Outcome<(Option<Comparator<T>>, Comparator<T>)> {
        let agreed = tri!(self.agreed(other, comparator));
        let effective = agreed.clone().unwrap_or_else(Comparator::partial);
        Outcome::Defined((agreed, effective))
    }

    /// `(lowerUnbounded ∨ value ≥ lower) ∧ (upperUnbounded ∨ value ≤ upper)`
    pub fn within_bounds(&self, value: &T, comparator: Option<&Comparator<T>>) -> Outcome<bool> {
        let (_, c) = tri!(self.effective(None, comparator));
        if self.empty {
            return Outcome::Defined(false);
        }
        let above_lower = self
            .lower
            .as_ref()
            .map_or(Outcome::Defined(true), |lower| c.compare(value, lower).is_ge());
        above_lower.and(|| {
            self.upper
                .as_ref()
                .map_or(Outcome::Defined(true), |upper| c.compare(value, upper).is_le())
        })
    }

    /// Whether the two boundaries share at least one value.
    pub fn overlaps(&self, other: &Self, comparator: Option<&Comparator<T>>) -> Outcome<bool> {
        self.effective(Some(other), comparator)
            .and_then(|(_, c)| self.overlaps_with(other, &c))
            .logged("overlap test")
    }

    pub(crate) fn overlaps_with(&self, other: &Self, c: &Comparator<T>) -> Outcome<bool> {
        if self.empty || other.empty {
            return Outcome::Defined(false);
        }
        let self_before = cmp_upper_lower(c, self.upper.as_ref(), other.lower.as_ref()).is_lt();
        self_before
            .or(|| cmp_upper_lower(c, other.upper.as_ref(), self.lower.as_ref()).is_lt())
            .not()
    }

    /// Overlapping, or touching with no value in between.
    pub(crate) fn mergeable_with(&self, other: &Self, c: &Comparator<T>) -> Outcome<bool> {
        self.overlaps_with(other, c)
            .or(|| adjacent(c, self.upper.as_ref(), other.lower.as_ref()))
            .or(|| adjacent(c, other.upper.as_ref(), self.lower.as_ref()))
    }

    /// Whether every value of this boundary lies in `other`.
    pub fn is_within(&self, other: &Self, comparator: Option<&Comparator<T>>) -> Outcome<bool> {
        let (_, c) = tri!(self.effective(Some(other), comparator));
        if self.empty {
            return Outcome::Defined(true);
        }
        if other.empty {
            return Outcome::Defined(false);
        }
        cmp_lower(&c, other.lower.as_ref(), self.lower.as_ref())
            .is_le()
            .and(|| cmp_upper(&c, self.upper.as_ref(), other.upper.as_ref()).is_le())
    }

    /// Merges overlapping or adjacent boundaries, otherwise returns both in
    /// ascending order.
    pub fn union(&self, other: &Self, comparator: Option<&Comparator<T>>) -> Outcome<Union<T>> {
        self.effective(Some(other), comparator)
            .and_then(|(agreed, c)| self.union_with(other, &c, agreed))
            .logged("union")
    }

    fn union_with(&self, other: &Self, c: &Comparator<T>, agreed: Option<Comparator<T>>) -> Outcome<Union<T>> {
        if self.empty {
            return Outcome::Defined(Union::Merged(other.recomparatored(agreed.as_ref())));
        }
        if other.empty {
            return Outcome::Defined(Union::Merged(self.recomparatored(agreed.as_ref())));
        }
        if tri!(self.mergeable_with(other, c)) {
            return self.hull(other, c, agreed).map(Union::Merged);
        }
        let self_first = tri!(cmp_upper_lower(c, self.upper.as_ref(), other.lower.as_ref()).is_lt());
        let (first, second) = if self_first { (self, other) } else { (other, self) };
        Outcome::Defined(Union::Disjoint(
            first.recomparatored(agreed.as_ref()),
            second.recomparatored(agreed.as_ref()),
        ))
    }

    /// The smallest boundary holding both operands.
    pub(crate) fn hull(&self, other: &Self, c: &Comparator<T>, agreed: Option<Comparator<T>>) -> Outcome<Self> {
        let lower = if tri!(cmp_lower(c, self.lower.as_ref(), other.lower.as_ref()).is_le()) {
            self.lower.clone()
        } else {
            other.lower.clone()
        };
        let upper = if tri!(cmp_upper(c, self.upper.as_ref(), other.upper.as_ref()).is_ge()) {
            self.upper.clone()
        } else {
            other.upper.clone()
        };
        Outcome::Defined(Self::from_edges(lower, upper, agreed))
    }

    /// `[max(lowers), min(uppers)]`, or the empty boundary when disjoint.
    pub fn intersection(&self, other: &Self, comparator: Option<&Comparator<T>>) -> Outcome<Self> {
        self.effective(Some(other), comparator)
            .and_then(|(agreed, c)| self.intersection_with(other, &c, agreed))
            .logged("intersection")
    }

    pub(crate) fn intersection_with(&self, other: &Self, c: &Comparator<T>, agreed: Option<Comparator<T>>) -> Outcome<Self> {
        if !tri!(self.overlaps_with(other, c)) {
            return Outcome::Defined(Self::empty_with(agreed));
        }
        let lower = if tri!(cmp_lower(c, self.lower.as_ref(), other.lower.as_ref()).is_ge()) {
            self.lower.clone()
        } else {
            other.lower.clone()
        };
        let upper = if tri!(cmp_upper(c, self.upper.as_ref(), other.upper.as_ref()).is_le()) {
            self.upper.clone()
        } else {
            other.upper.clone()
        };
        Outcome::Defined(Self::from_edges(lower, upper, agreed))
    }

    /// Removes `other` from this boundary.
    ///
    /// Cutting closed pieces needs the neighbouring value of a cut edge, so
    /// for continuous value types a partial overlap is `Undefined`.
    pub fn difference(&self, other: &Self, comparator: Option<&Comparator<T>>) -> Outcome<Difference<T>> {
        self.effective(Some(other), comparator)
            .and_then(|(agreed, c)| self.difference_with(other, &c, agreed))
            .logged("difference")
    }

    pub(crate) fn difference_with(
        &self,
        other: &Self,
        c: &Comparator<T>,
        agreed: Option<Comparator<T>>,
    ) -> Outcome<Difference<T>> {
        if !tri!(self.overlaps_with(other, c)) {
            return Outcome::Defined(Difference::Unchanged(self.recomparatored(agreed.as_ref())));
        }
        let covers_lower = tri!(cmp_lower(c, other.lower.as_ref(), self.lower.as_ref()).is_le());
        let covers_upper = tri!(cmp_upper(c, other.upper.as_ref(), self.upper.as_ref()).is_ge());

        let head = || -> Outcome<Self> {
            let Some(cut) = other.lower.as_ref() else {
                return Outcome::Undefined;
            };
            match tri!(step_before(c, cut)) {
                Some(upper) => Outcome::Defined(Self::from_edges(self.lower.clone(), Some(upper), agreed.clone())),
                None => Outcome::Undefined,
            }
        };
        let tail = || -> Outcome<Self> {
            let Some(cut) = other.upper.as_ref() else {
                return Outcome::Undefined;
            };
            match tri!(step_after(c, cut)) {
                Some(lower) => Outcome::Defined(Self::from_edges(Some(lower), self.upper.clone(), agreed.clone())),
                None => Outcome::Undefined,
            }
        };

        match (covers_lower, covers_upper) {
            (true, true) => Outcome::Defined(Difference::Empty),
            (true, false) => tail().map(Difference::Single),
            (false, true) => head().map(Difference::Single),
            (false, false) => {
                let lower = tri!(head());
                let upper = tri!(tail());
                Outcome::Defined(Difference::Split(lower, upper))
            },
        }
    }
}

impl<T: fmt::Display> fmt::Display for Boundary<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.empty {
            return f.write_str("∅");
        }
        match &self.lower {
            Some(lower) => write!(f, "[{lower}, ")?,
            None => f.write_str("(-∞, ")?,
        }
        match &self.upper {
            Some(upper) => write!(f, "{upper}]"),
            None => f.write_str("+∞)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed(lower: i64, upper: i64) -> Boundary<i64> {
        Boundary::closed(lower, upper).unwrap()
    }

    #[test]
    fn test_construction() {
        assert!(Boundary::closed(1, 5).is_ok());
        assert!(Boundary::closed(5, 5).is_ok());
        assert!(matches!(Boundary::closed(6, 5), Err(Error::Range(_))));
        assert!(matches!(Boundary::closed(f64::NAN, 1.0), Err(Error::Type(_))));

        let reversed = Comparator::<i64>::natural().reverse();
        assert!(Boundary::with_comparator(Some(6), Some(5), reversed).is_ok());
    }

    #[test]
    fn test_unbounded_flags() {
        let b = Boundary::at_least(3_i64);
        assert!(!b.is_lower_unbounded());
        assert!(b.is_upper_unbounded());
        assert!(!b.is_empty());

        let e = Boundary::<i64>::empty();
        assert!(e.is_empty());
        assert!(!e.is_lower_unbounded());
        assert!(!Boundary::<i64>::unbounded().is_empty());
    }

    #[test]
    fn test_within_bounds() {
        let b = closed(1, 10);
        assert_eq!(b.within_bounds(&1, None), Outcome::Defined(true));
        assert_eq!(b.within_bounds(&10, None), Outcome::Defined(true));
        assert_eq!(b.within_bounds(&11, None), Outcome::Defined(false));
        assert_eq!(Boundary::at_most(0_i64).within_bounds(&-100, None), Outcome::Defined(true));
        assert_eq!(Boundary::<i64>::empty().within_bounds(&1, None), Outcome::Defined(false));

        let nan = Boundary::closed(0.0, 1.0).unwrap();
        assert_eq!(nan.within_bounds(&f64::NAN, None), Outcome::Undefined);
    }

    #[test]
    fn test_within_bounds_with_override() {
        let natural = Comparator::<i64>::natural();
        let b = Boundary::with_comparator(Some(1), Some(10), natural.clone()).unwrap();
        assert_eq!(b.within_bounds(&5, Some(&natural)), Outcome::Defined(true));
        assert_eq!(b.within_bounds(&5, Some(&natural.reverse())), Outcome::Undefined);

        let generic = closed(1, 10);
        let reversed = natural.reverse();
        assert_eq!(generic.within_bounds(&5, Some(&reversed)), Outcome::Defined(false));
    }

    #[test]
    fn test_overlaps() {
        assert_eq!(closed(1, 5).overlaps(&closed(5, 9), None), Outcome::Defined(true));
        assert_eq!(closed(1, 5).overlaps(&closed(6, 9), None), Outcome::Defined(false));
        assert_eq!(closed(6, 9).overlaps(&closed(1, 5), None), Outcome::Defined(false));
        assert_eq!(
            Boundary::at_least(3_i64).overlaps(&Boundary::at_most(3), None),
            Outcome::Defined(true)
        );
        assert_eq!(closed(1, 5).overlaps(&Boundary::empty(), None), Outcome::Defined(false));
    }

    #[test]
    fn test_incompatible_comparators() {
        let natural = Comparator::<i64>::natural();
        let a = Boundary::with_comparator(Some(1), Some(5), natural.clone()).unwrap();
        let b = Boundary::with_comparator(Some(9), Some(3), natural.reverse()).unwrap();
        assert_eq!(a.overlaps(&b, None), Outcome::Undefined);
        assert_eq!(a.union(&b, None), Outcome::Undefined);
        assert_eq!(a.intersection(&b, None), Outcome::Undefined);
        assert_eq!(a.difference(&b, None), Outcome::Undefined);

        // a generic boundary merges with either
        assert!(a.union(&closed(2, 3), None).is_defined());
    }

    #[test]
    fn test_union() {
        assert_eq!(
            closed(1, 10).union(&closed(5, 15), None),
            Outcome::Defined(Union::Merged(closed(1, 15)))
        );
        assert_eq!(
            closed(1, 5).union(&closed(6, 9), None),
            Outcome::Defined(Union::Merged(closed(1, 9)))
        );
        assert_eq!(
            closed(10, 15).union(&closed(1, 5), None),
            Outcome::Defined(Union::Disjoint(closed(1, 5), closed(10, 15)))
        );
        assert_eq!(
            Boundary::<i64>::empty().union(&closed(1, 2), None),
            Outcome::Defined(Union::Merged(closed(1, 2)))
        );
    }

    #[test]
    fn test_union_continuous_does_not_bridge_gaps() {
        let a = Boundary::closed(1.0, 2.0).unwrap();
        let b = Boundary::closed(2.5, 3.0).unwrap();
        assert!(matches!(a.union(&b, None), Outcome::Defined(Union::Disjoint(..))));
        let c = Boundary::closed(2.0, 3.0).unwrap();
        assert_eq!(
            a.union(&c, None),
            Outcome::Defined(Union::Merged(Boundary::closed(1.0, 3.0).unwrap()))
        );
    }

    #[test]
    fn test_intersection() {
        assert_eq!(closed(1, 10).intersection(&closed(5, 15), None), Outcome::Defined(closed(5, 10)));
        assert_eq!(
            closed(1, 4).intersection(&closed(5, 15), None).map(|b| b.is_empty()),
            Outcome::Defined(true)
        );
        assert_eq!(
            Boundary::at_least(3_i64).intersection(&Boundary::at_most(7), None),
            Outcome::Defined(closed(3, 7))
        );
    }

    #[test]
    fn test_difference() {
        assert_eq!(
            closed(1, 5).difference(&closed(7, 9), None),
            Outcome::Defined(Difference::Unchanged(closed(1, 5)))
        );
        assert_eq!(closed(3, 5).difference(&closed(1, 9), None), Outcome::Defined(Difference::Empty));
        assert_eq!(
            closed(1, 10).difference(&closed(5, 15), None),
            Outcome::Defined(Difference::Single(closed(1, 4)))
        );
        assert_eq!(
            closed(1, 10).difference(&closed(-5, 3), None),
            Outcome::Defined(Difference::Single(closed(4, 10)))
        );
        assert_eq!(
            closed(1, 10).difference(&closed(4, 6), None),
            Outcome::Defined(Difference::Split(closed(1, 3), closed(7, 10)))
        );
    }

    #[test]
    fn test_difference_continuous_partial_is_undefined() {
        let a = Boundary::closed(1.0, 10.0).unwrap();
        let b = Boundary::closed(5.0, 15.0).unwrap();
        assert_eq!(a.difference(&b, None), Outcome::Undefined);
        let all = Boundary::closed(0.0, 20.0).unwrap();
        assert_eq!(a.difference(&all, None), Outcome::Defined(Difference::Empty));
    }

    #[test]
    fn test_reversed_comparator_difference() {
        let reversed = Comparator::<i64>::natural().reverse();
        let a = Boundary::with_comparator(Some(10), Some(1), reversed.clone()).unwrap();
        let b = Boundary::with_comparator(Some(6), Some(4), reversed.clone()).unwrap();
        let expected = Difference::Split(
            Boundary::with_comparator(Some(10), Some(7), reversed.clone()).unwrap(),
            Boundary::with_comparator(Some(3), Some(1), reversed).unwrap(),
        );
        assert_eq!(a.difference(&b, None), Outcome::Defined(expected));
    }

    #[test]
    fn test_is_within() {
        assert_eq!(closed(3, 4).is_within(&closed(1, 5), None), Outcome::Defined(true));
        assert_eq!(closed(0, 4).is_within(&closed(1, 5), None), Outcome::Defined(false));
        assert_eq!(closed(0, 4).is_within(&Boundary::unbounded(), None), Outcome::Defined(true));
    }

    #[test]
    fn test_display() {
        assert_eq!(closed(1, 5).to_string(), "[1, 5]");
        assert_eq!(Boundary::at_least(2_i64).to_string(), "[2, +∞)");
        assert_eq!(Boundary::at_most(2_i64).to_string(), "(-∞, 2]");
        assert_eq!(Boundary::<i64>::empty().to_string(), "∅");
    }
}
