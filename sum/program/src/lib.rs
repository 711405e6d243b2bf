//! Range summation over `i64` bounds with an `i128` accumulator.
//!
//! The sum of any `i64` range stays below 2^125 in magnitude, so no path here
//! can overflow regardless of the bounds a caller supplies.

use std::fmt;
use std::hint::black_box;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("range start {start} is greater than end {end}")]
    InvertedRange { start: i64, end: i64 },
    #[error("unknown summation method `{0}` (expected `iterative`, `library` or `closed-form`)")]
    UnknownMethod(String),
}

/// Whether `RangeSpec::end` is part of the range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exclusive,
    Inclusive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeSpec {
    start: i64,
    end: i64,
    bound: Bound,
}

impl RangeSpec {
    /// `[start, end)`. `start == end` is the empty range.
    pub fn half_open(start: i64, end: i64) -> Result<Self, RangeError> {
        Self::new(start, end, Bound::Exclusive)
    }

    /// `[start, end]`.
    pub fn inclusive(start: i64, end: i64) -> Result<Self, RangeError> {
        Self::new(start, end, Bound::Inclusive)
    }

    fn new(start: i64, end: i64, bound: Bound) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvertedRange { start, end });
        }
        Ok(Self { start, end, bound })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn bound(&self) -> Bound {
        self.bound
    }

    /// Upper bound of the equivalent half-open range. Widened so that an
    /// inclusive `i64::MAX` stays representable.
    pub fn end_exclusive(&self) -> i128 {
        match self.bound {
            Bound::Exclusive => self.end as i128,
            Bound::Inclusive => self.end as i128 + 1,
        }
    }

    pub fn len(&self) -> u128 {
        (self.end_exclusive() - self.start as i128) as u128
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bound {
            Bound::Exclusive => write!(f, "[{}, {})", self.start, self.end),
            Bound::Inclusive => write!(f, "[{}, {}]", self.start, self.end),
        }
    }
}

/// Sums `start..end_exclusive` one element at a time.
///
/// Every term goes through `black_box`, otherwise LLVM rewrites the loop into
/// the closed form and the timing no longer reflects iteration cost.
pub fn compute_sum(start: i64, end_exclusive: i128) -> i128 {
    let mut acc: i128 = 0;
    let mut i = start as i128;
    while i < end_exclusive {
        acc += black_box(i);
        i += 1;
    }
    acc
}

/// Sums `start..end_exclusive` through the standard `Iterator::sum`.
pub fn library_sum(start: i64, end_exclusive: i128) -> i128 {
    (start as i128..end_exclusive).sum()
}

/// Arithmetic series over `start..end_exclusive`.
pub fn closed_form_sum(start: i64, end_exclusive: i128) -> i128 {
    let start = start as i128;
    if end_exclusive <= start {
        return 0;
    }
    // one of n and (start + end - 1) is always even
    (end_exclusive - start) * (start + end_exclusive - 1) / 2
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Iterative,
    Library,
    ClosedForm,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Iterative => "iterative",
            Method::Library => "library",
            Method::ClosedForm => "closed-form",
        }
    }

    pub fn sum(&self, spec: &RangeSpec) -> i128 {
        match self {
            Method::Iterative => compute_sum(spec.start(), spec.end_exclusive()),
            Method::Library => library_sum(spec.start(), spec.end_exclusive()),
            Method::ClosedForm => closed_form_sum(spec.start(), spec.end_exclusive()),
        }
    }
}

impl FromStr for Method {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iterative" => Ok(Method::Iterative),
            "library" => Ok(Method::Library),
            "closed-form" | "closed_form" => Ok(Method::ClosedForm),
            other => Err(RangeError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
