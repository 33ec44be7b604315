//! Tri-state comparison results and comparator combinators.
//!
//! A [`Comparator`] never answers with a bare [`Ordering`]: when two operands
//! cannot be ordered it says so with [`ComparisonResult::Undefined`], and
//! when an operand is itself invalid it answers
//! [`ComparisonResult::Erroneous`]. Algebra built on top of comparators
//! carries the same distinction through [`Outcome`].

use std::{borrow::Cow, cell::Cell, cmp::Ordering, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Result of comparing two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum ComparisonResult {
    #[display(fmt = "less")]
    Less,
    #[display(fmt = "equal")]
    Equal,
    #[display(fmt = "greater")]
    Greater,
    /// The comparison is not meaningful for these operands.
    #[display(fmt = "undefined")]
    Undefined,
    /// One of the operands was invalid.
    #[display(fmt = "erroneous")]
    Erroneous,
}

impl ComparisonResult {
    pub const fn from_ordering(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Self::Less,
            Ordering::Equal => Self::Equal,
            Ordering::Greater => Self::Greater,
        }
    }

    /// Maps a `PartialOrd` answer; incomparable operands become `Undefined`.
    pub const fn from_partial(ordering: Option<Ordering>) -> Self {
        match ordering {
            Some(ordering) => Self::from_ordering(ordering),
            None => Self::Undefined,
        }
    }

    /// The definite ordering, if there is one.
    pub const fn ordering(self) -> Option<Ordering> {
        match self {
            Self::Less => Some(Ordering::Less),
            Self::Equal => Some(Ordering::Equal),
            Self::Greater => Some(Ordering::Greater),
            Self::Undefined | Self::Erroneous => None,
        }
    }

    pub const fn is_defined(self) -> bool {
        self.ordering().is_some()
    }

    /// Swaps `Less` and `Greater`; every other result passes through.
    pub const fn reverse(self) -> Self {
        match self {
            Self::Less => Self::Greater,
            Self::Greater => Self::Less,
            other => other,
        }
    }

    /// Lexicographic chaining: `Equal` defers to `next`.
    pub fn then_with(self, next: impl FnOnce() -> Self) -> Self {
        match self {
            Self::Equal => next(),
            other => other,
        }
    }

    /// Applies `test` to the definite ordering, keeping the sentinels.
    pub fn test(self, test: impl FnOnce(Ordering) -> bool) -> Outcome<bool> {
        match self {
            Self::Undefined => Outcome::Undefined,
            Self::Erroneous => Outcome::Erroneous,
            defined => Outcome::Defined(defined.ordering().is_some_and(test)),
        }
    }

    pub fn is_le(self) -> Outcome<bool> {
        self.test(Ordering::is_le)
    }

    pub fn is_lt(self) -> Outcome<bool> {
        self.test(Ordering::is_lt)
    }

    pub fn is_ge(self) -> Outcome<bool> {
        self.test(Ordering::is_ge)
    }

    pub fn is_gt(self) -> Outcome<bool> {
        self.test(Ordering::is_gt)
    }
}

impl From<Ordering> for ComparisonResult {
    fn from(ordering: Ordering) -> Self {
        Self::from_ordering(ordering)
    }
}

/// A value, or one of the two reasons there is no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<T> {
    Defined(T),
    /// The operation is not meaningful for its operands.
    Undefined,
    /// An operand was invalid.
    Erroneous,
}

impl<T> Outcome<T> {
    pub const fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }

    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub const fn is_erroneous(&self) -> bool {
        matches!(self, Self::Erroneous)
    }

    pub fn defined(self) -> Option<T> {
        match self {
            Self::Defined(value) => Some(value),
            Self::Undefined | Self::Erroneous => None,
        }
    }

    pub const fn as_ref(&self) -> Outcome<&T> {
        match self {
            Self::Defined(value) => Outcome::Defined(value),
            Self::Undefined => Outcome::Undefined,
            Self::Erroneous => Outcome::Erroneous,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Defined(value) => Outcome::Defined(f(value)),
            Self::Undefined => Outcome::Undefined,
            Self::Erroneous => Outcome::Erroneous,
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Self::Defined(value) => f(value),
            Self::Undefined => Outcome::Undefined,
            Self::Erroneous => Outcome::Erroneous,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.defined().unwrap_or(default)
    }

    /// Reports a sentinel result of `operation` at debug level.
    pub(crate) fn logged(self, operation: &str) -> Self {
        match &self {
            Self::Undefined => log::debug!("{operation} is undefined for its operands"),
            Self::Erroneous => log::debug!("{operation} met an invalid operand"),
            Self::Defined(_) => {},
        }
        self
    }
}

impl Outcome<bool> {
    /// Short-circuiting conjunction: a definite `false` wins over a sentinel
    /// on the right, mirroring `&&`.
    pub fn and(self, rhs: impl FnOnce() -> Self) -> Self {
        match self {
            Self::Defined(true) => rhs(),
            other => other,
        }
    }

    /// Short-circuiting disjunction.
    pub fn or(self, rhs: impl FnOnce() -> Self) -> Self {
        match self {
            Self::Defined(false) => rhs(),
            other => other,
        }
    }

    pub fn not(self) -> Self {
        self.map(|value| !value)
    }
}

impl From<ComparisonResult> for Outcome<Ordering> {
    fn from(result: ComparisonResult) -> Self {
        match result {
            ComparisonResult::Undefined => Self::Undefined,
            ComparisonResult::Erroneous => Self::Erroneous,
            defined => defined.ordering().map_or(Self::Undefined, Self::Defined),
        }
    }
}

/// Unwraps an [`Outcome`], returning any sentinel from the enclosing function.
macro_rules! tri {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Defined(value) => value,
            $crate::Outcome::Undefined => return $crate::Outcome::Undefined,
            $crate::Outcome::Erroneous => return $crate::Outcome::Erroneous,
        }
    };
}
pub(crate) use tri;

/// Values that can stand for "nothing here" in two distinct ways.
pub trait Nullable {
    fn is_null(&self) -> bool {
        false
    }

    fn is_undefined(&self) -> bool {
        false
    }
}

impl<T> Nullable for Option<T> {
    fn is_null(&self) -> bool {
        self.is_none()
    }
}

impl Nullable for f64 {
    fn is_undefined(&self) -> bool {
        self.is_nan()
    }
}

type CompareFn<T> = dyn Fn(&T, &T) -> ComparisonResult + Send + Sync;

/// A named, shareable comparison function.
///
/// Two comparators are the same comparator when they share a name. Boundary
/// algebra relies on that identity to refuse combining boundaries ordered in
/// different ways.
pub struct Comparator<T> {
    name: Cow<'static, str>,
    func: Arc<CompareFn<T>>,
}

impl<T> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<T> PartialEq for Comparator<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func) || self.name == other.name
    }
}

impl<T> Eq for Comparator<T> {}

impl<T> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Comparator").field(&self.name).finish()
    }
}

impl<T> fmt::Display for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<T> Comparator<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same function under another name.
    #[must_use]
    pub fn with_name(&self, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            func: Arc::clone(&self.func),
        }
    }

    pub fn compare(&self, a: &T, b: &T) -> ComparisonResult {
        (self.func)(a, b)
    }
}

impl<T: 'static> Comparator<T> {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, compare: F) -> Self
    where
        F: Fn(&T, &T) -> ComparisonResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(compare),
        }
    }

    /// Wraps a comparison that may fail; a failure becomes `Erroneous`.
    pub fn fallible<F, E>(name: impl Into<Cow<'static, str>>, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Result<Ordering, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        let name = name.into();
        let label = name.clone();
        Self::new(name, move |a, b| match compare(a, b) {
            Ok(ordering) => ComparisonResult::from_ordering(ordering),
            Err(err) => {
                log::debug!("comparator {label} failed: {err}");
                ComparisonResult::Erroneous
            },
        })
    }

    /// Swaps the operand order.
    #[must_use]
    pub fn reverse(&self) -> Self {
        let inner = self.clone();
        Self::new(format!("reverse({})", self.name), move |a, b| inner.compare(b, a))
    }

    /// Values passing `predicate` are mutually equal and sort before all others.
    #[must_use]
    pub fn passing_first<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.partitioned(format!("passing_first({})", self.name), predicate, Ordering::Less)
    }

    /// Values passing `predicate` are mutually equal and sort after all others.
    #[must_use]
    pub fn passing_last<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.partitioned(format!("passing_last({})", self.name), predicate, Ordering::Greater)
    }

    fn partitioned<P>(&self, name: String, predicate: P, passing: Ordering) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let inner = self.clone();
        Self::new(name, move |a, b| match (predicate(a), predicate(b)) {
            (true, true) => ComparisonResult::Equal,
            (true, false) => ComparisonResult::from_ordering(passing),
            (false, true) => ComparisonResult::from_ordering(passing.reverse()),
            (false, false) => inner.compare(a, b),
        })
    }

    /// Only values passing `predicate` are comparable.
    #[must_use]
    pub fn validate_passing<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let inner = self.clone();
        Self::new(format!("validate_passing({})", self.name), move |a, b| {
            if predicate(a) && predicate(b) {
                inner.compare(a, b)
            } else {
                ComparisonResult::Undefined
            }
        })
    }

    /// Values passing `predicate` are not comparable.
    #[must_use]
    pub fn invalidate_passing<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let inner = self.clone();
        Self::new(format!("invalidate_passing({})", self.name), move |a, b| {
            if predicate(a) || predicate(b) {
                ComparisonResult::Undefined
            } else {
                inner.compare(a, b)
            }
        })
    }

    /// Compares `Option`s; anything involving `None` is `Undefined` unless
    /// combined with [`nulls_first`](Self::nulls_first) or friends.
    pub fn lift_option(&self) -> Comparator<Option<T>> {
        let inner = self.clone();
        Comparator::new(self.name.clone(), move |a: &Option<T>, b: &Option<T>| match (a, b) {
            (Some(a), Some(b)) => inner.compare(a, b),
            _ => ComparisonResult::Undefined,
        })
    }

    /// Stable sort. Pairs that cannot be ordered are left in place and the
    /// worst sentinel met is reported.
    pub fn sort(&self, items: &mut [T]) -> Outcome<()> {
        let worst = Cell::new(ComparisonResult::Equal);
        items.sort_by(|a, b| {
            let result = self.compare(a, b);
            result.ordering().unwrap_or_else(|| {
                if worst.get() != ComparisonResult::Erroneous {
                    worst.set(result);
                }
                Ordering::Equal
            })
        });
        match worst.get() {
            ComparisonResult::Undefined => Outcome::Undefined,
            ComparisonResult::Erroneous => Outcome::Erroneous,
            _ => Outcome::Defined(()),
        }
    }
}

impl<T: Ord + 'static> Comparator<T> {
    /// The total order of `Ord`.
    pub fn natural() -> Self {
        Self::new("natural", |a: &T, b: &T| ComparisonResult::from_ordering(a.cmp(b)))
    }
}

impl<T: PartialOrd + 'static> Comparator<T> {
    /// The partial order of `PartialOrd`; incomparable pairs are `Undefined`.
    pub fn partial() -> Self {
        Self::new("partial", |a: &T, b: &T| ComparisonResult::from_partial(a.partial_cmp(b)))
    }
}

impl<T: Nullable + 'static> Comparator<T> {
    #[must_use]
    pub fn nulls_first(&self) -> Self {
        self.passing_first(|value: &T| value.is_null()).with_name(format!("nulls_first({})", self.name))
    }

    #[must_use]
    pub fn nulls_last(&self) -> Self {
        self.passing_last(|value: &T| value.is_null()).with_name(format!("nulls_last({})", self.name))
    }

    #[must_use]
    pub fn undefined_first(&self) -> Self {
        self.passing_first(|value: &T| value.is_undefined())
            .with_name(format!("undefined_first({})", self.name))
    }

    #[must_use]
    pub fn undefined_last(&self) -> Self {
        self.passing_last(|value: &T| value.is_undefined())
            .with_name(format!("undefined_last({})", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_result() {
        struct TestCase {
            input:    ComparisonResult,
            expected: ComparisonResult,
        }

        let cases = [
            TestCase {
                input:    ComparisonResult::Less,
                expected: ComparisonResult::Greater,
            },
            TestCase {
                input:    ComparisonResult::Greater,
                expected: ComparisonResult::Less,
            },
            TestCase {
                input:    ComparisonResult::Equal,
                expected: ComparisonResult::Equal,
            },
            TestCase {
                input:    ComparisonResult::Undefined,
                expected: ComparisonResult::Undefined,
            },
            TestCase {
                input:    ComparisonResult::Erroneous,
                expected: ComparisonResult::Erroneous,
            },
        ];

        for case in &cases {
            assert_eq!(case.input.reverse(), case.expected, "reverse of {}", case.input);
        }
    }

    #[test]
    fn test_reverse_comparator() {
        let natural = Comparator::<i32>::natural();
        let reversed = natural.reverse();
        assert_eq!(reversed.compare(&1, &2), ComparisonResult::Greater);
        assert_eq!(reversed.compare(&2, &1), ComparisonResult::Less);
        assert_eq!(reversed.compare(&2, &2), ComparisonResult::Equal);
        assert_eq!(reversed.name(), "reverse(natural)");
    }

    #[test]
    fn test_partial_nan_is_undefined() {
        let cmp = Comparator::<f64>::partial();
        assert_eq!(cmp.compare(&1.0, &2.0), ComparisonResult::Less);
        assert_eq!(cmp.compare(&f64::NAN, &2.0), ComparisonResult::Undefined);
    }

    #[test]
    fn test_fallible_failure_is_erroneous() {
        let cmp = Comparator::<i64>::fallible("non_negative", |a: &i64, b: &i64| {
            if *a < 0 || *b < 0 {
                Err("negative operand")
            } else {
                Ok(a.cmp(b))
            }
        });
        assert_eq!(cmp.compare(&1, &2), ComparisonResult::Less);
        assert_eq!(cmp.compare(&-1, &2), ComparisonResult::Erroneous);
    }

    #[test]
    fn test_passing_first_and_last() {
        let even_first = Comparator::<i32>::natural().passing_first(|v| v % 2 == 0);
        assert_eq!(even_first.compare(&4, &2), ComparisonResult::Equal);
        assert_eq!(even_first.compare(&4, &1), ComparisonResult::Less);
        assert_eq!(even_first.compare(&1, &4), ComparisonResult::Greater);
        assert_eq!(even_first.compare(&3, &1), ComparisonResult::Greater);

        let even_last = Comparator::<i32>::natural().passing_last(|v| v % 2 == 0);
        assert_eq!(even_last.compare(&4, &1), ComparisonResult::Greater);
        assert_eq!(even_last.compare(&1, &4), ComparisonResult::Less);
    }

    #[test]
    fn test_nulls_first_sort() {
        let cmp = Comparator::<i32>::natural().lift_option().nulls_first();
        let mut values = vec![Some(3), None, Some(1), None, Some(2)];
        assert_eq!(cmp.sort(&mut values), Outcome::Defined(()));
        assert_eq!(values, vec![None, None, Some(1), Some(2), Some(3)]);

        let cmp = Comparator::<i32>::natural().lift_option().nulls_last();
        let mut values = vec![None, Some(2), Some(1)];
        assert_eq!(cmp.sort(&mut values), Outcome::Defined(()));
        assert_eq!(values, vec![Some(1), Some(2), None]);
    }

    #[test]
    fn test_undefined_first_and_last() {
        let cmp = Comparator::<f64>::partial().undefined_first();
        assert_eq!(cmp.compare(&f64::NAN, &1.0), ComparisonResult::Less);
        assert_eq!(cmp.compare(&f64::NAN, &f64::NAN), ComparisonResult::Equal);

        let cmp = Comparator::<f64>::partial().undefined_last();
        let mut values = vec![f64::NAN, 2.0, 1.0];
        assert_eq!(cmp.sort(&mut values), Outcome::Defined(()));
        assert!((values[0] - 1.0).abs() < f64::EPSILON);
        assert!(values[2].is_nan());
    }

    #[test]
    fn test_sort_reports_undefined() {
        let cmp = Comparator::<f64>::partial();
        let mut values = vec![2.0, f64::NAN, 1.0];
        assert_eq!(cmp.sort(&mut values), Outcome::Undefined);
    }

    #[test]
    fn test_validate_and_invalidate_passing() {
        let positive_only = Comparator::<i32>::natural().validate_passing(|v| *v > 0);
        assert_eq!(positive_only.compare(&1, &2), ComparisonResult::Less);
        assert_eq!(positive_only.compare(&-1, &2), ComparisonResult::Undefined);

        let no_zero = Comparator::<i32>::natural().invalidate_passing(|v| *v == 0);
        assert_eq!(no_zero.compare(&1, &2), ComparisonResult::Less);
        assert_eq!(no_zero.compare(&0, &2), ComparisonResult::Undefined);
        assert_eq!(no_zero.compare(&2, &0), ComparisonResult::Undefined);
    }

    #[test]
    fn test_comparator_identity() {
        let a = Comparator::<i32>::natural();
        let b = Comparator::<i32>::natural();
        assert_eq!(a, b);
        assert_ne!(a, a.reverse());
        assert_eq!(a.reverse(), b.reverse());
    }

    #[test]
    fn test_outcome_combinators() {
        assert_eq!(Outcome::Defined(false).and(|| Outcome::Undefined), Outcome::Defined(false));
        assert_eq!(Outcome::Defined(true).and(|| Outcome::Undefined), Outcome::Undefined);
        assert_eq!(Outcome::Defined(true).or(|| Outcome::Erroneous), Outcome::Defined(true));
        assert_eq!(Outcome::<bool>::Erroneous.not(), Outcome::Erroneous);
        assert_eq!(ComparisonResult::Less.is_le(), Outcome::Defined(true));
        assert_eq!(ComparisonResult::Undefined.is_le(), Outcome::Undefined);
    }

    // Callers generic over any `T` can use a comparator they were handed.
    fn describe<T>(c: &Comparator<T>, a: &T, b: &T) -> String {
        format!("{} says {}", c.name(), c.compare(a, b))
    }

    #[test]
    fn test_compare_without_static_bound() {
        let natural = Comparator::<i32>::natural();
        assert_eq!(describe(&natural, &1, &2), format!("natural says {}", ComparisonResult::Less));
        assert_eq!(natural.with_name("ints").name(), "ints");
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&ComparisonResult::Undefined).unwrap();
        assert_eq!(json, r#""Undefined""#);
        let parsed: ComparisonResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ComparisonResult::Undefined);
    }
}
