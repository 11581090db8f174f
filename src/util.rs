use std::cmp::Ordering;
use std::cmp::Ordering::{Equal, Greater, Less};

/// Tolerance used when comparing decoded floating point values.
pub(crate) const EPSILON: f64 = 0.00001;

pub(crate) trait OrderingExt {
  /// Chains orderings lexicographically: the closure is only consulted
  /// when `self` is `Equal`.
  fn lexico<F: FnOnce() -> Ordering>(self, f: F) -> Ordering;
}

impl OrderingExt for Ordering {
  #[inline]
  fn lexico<F: FnOnce() -> Ordering>(self, f: F) -> Ordering {
    match self {
      Equal => f(),
      _ => self,
    }
  }
}

pub(crate) fn fuzzy_cmp(a: f64, b: f64, delta: f64) -> Ordering {
  if (a - b).abs() <= delta {
    Equal
  } else if a < b {
    Less
  } else {
    Greater
  }
}

/// Compares coordinate tuples component by component within `EPSILON`.
pub(crate) fn fuzzy_cmp_all(a: &[f64], b: &[f64]) -> Ordering {
  a.iter()
    .zip(b.iter())
    .fold(Equal, |acc, (&x, &y)| acc.lexico(|| fuzzy_cmp(x, y, EPSILON)))
    .lexico(|| a.len().cmp(&b.len()))
}
