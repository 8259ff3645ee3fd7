//! Derived aggregates over view rows.
//!
//! Every function here is pure: it borrows its input table, never mutates it,
//! and produces the same output for the same input. Fields are selected with
//! accessor closures; rows whose grouping key is absent are left out of the
//! grouping.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator as _};

// ─── Grouping ────────────────────────────────────────────────────────────────

/// Group rows by `key` and count each group, ordered by key.
pub fn count_by<T, K: Ord>(
  rows: &[T],
  key: impl Fn(&T) -> Option<K>,
) -> Vec<(K, usize)> {
  let mut groups: BTreeMap<K, usize> = BTreeMap::new();
  for row in rows {
    if let Some(k) = key(row) {
      *groups.entry(k).or_default() += 1;
    }
  }
  groups.into_iter().collect()
}

/// Collect the present values of each group. Groups with no present value
/// are dropped.
fn present_values<T, K: Ord>(
  rows: &[T],
  key: impl Fn(&T) -> Option<K>,
  value: impl Fn(&T) -> Option<f64>,
) -> BTreeMap<K, Vec<f64>> {
  let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
  for row in rows {
    if let (Some(k), Some(v)) = (key(row), value(row)) {
      groups.entry(k).or_default().push(v);
    }
  }
  groups
}

/// Sum `value` per group. Missing values are skipped, not counted as zero.
pub fn sum_by<T, K: Ord>(
  rows: &[T],
  key: impl Fn(&T) -> Option<K>,
  value: impl Fn(&T) -> Option<f64>,
) -> Vec<(K, f64)> {
  present_values(rows, key, value)
    .into_iter()
    .map(|(k, vs)| (k, vs.iter().sum()))
    .collect()
}

/// Mean of `value` per group over present values only.
pub fn mean_by<T, K: Ord>(
  rows: &[T],
  key: impl Fn(&T) -> Option<K>,
  value: impl Fn(&T) -> Option<f64>,
) -> Vec<(K, f64)> {
  present_values(rows, key, value)
    .into_iter()
    .map(|(k, vs)| {
      let mean = vs.iter().sum::<f64>() / vs.len() as f64;
      (k, mean)
    })
    .collect()
}

/// Reorder `(key, count)` pairs by count, highest first. Equal counts keep
/// their incoming order.
pub fn by_count_desc<K>(mut counts: Vec<(K, usize)>) -> Vec<(K, usize)> {
  counts.sort_by(|a, b| b.1.cmp(&a.1));
  counts
}

// ─── Ordering ────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  #[default]
  Ascending,
  Descending,
}

/// Compare two optional keys in `order`, with absent keys always last.
pub fn compare_nulls_last<K: Ord>(
  a: &Option<K>,
  b: &Option<K>,
  order: SortOrder,
) -> Ordering {
  nulls_last_by(a.as_ref(), b.as_ref(), order, |a, b| a.cmp(b))
}

/// [`compare_nulls_last`] for floats, using their total order.
pub fn compare_floats_nulls_last(
  a: Option<f64>,
  b: Option<f64>,
  order: SortOrder,
) -> Ordering {
  nulls_last_by(a.as_ref(), b.as_ref(), order, f64::total_cmp)
}

fn nulls_last_by<K>(
  a: Option<&K>,
  b: Option<&K>,
  order: SortOrder,
  cmp: impl Fn(&K, &K) -> Ordering,
) -> Ordering {
  match (a, b) {
    (Some(a), Some(b)) => match order {
      SortOrder::Ascending => cmp(a, b),
      SortOrder::Descending => cmp(b, a),
    },
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}

/// The first `n` rows by `key` in `order`. The sort is stable: ties keep
/// their original row order. Rows without a key sort last.
pub fn top_n<T: Clone, K: Ord>(
  rows: &[T],
  n: usize,
  order: SortOrder,
  key: impl Fn(&T) -> Option<K>,
) -> Vec<T> {
  let mut keyed: Vec<(Option<K>, &T)> = rows.iter().map(|r| (key(r), r)).collect();
  keyed.sort_by(|a, b| compare_nulls_last(&a.0, &b.0, order));
  keyed.into_iter().take(n).map(|(_, r)| r.clone()).collect()
}

// ─── Rank movement ───────────────────────────────────────────────────────────

/// Direction of a competitor's rank change since the previous list.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Display,
  EnumIter,
  Serialize,
  Deserialize,
)]
pub enum Movement {
  Improved,
  Declined,
  Stable,
}

/// Classify a movement value. A missing value counts as no movement.
pub fn classify_movement(movement: Option<i32>) -> Movement {
  match movement.unwrap_or(0).cmp(&0) {
    Ordering::Greater => Movement::Improved,
    Ordering::Less => Movement::Declined,
    Ordering::Equal => Movement::Stable,
  }
}

/// Count rows per [`Movement`] label. All three labels are always present and
/// their counts sum to `rows.len()`.
pub fn movement_breakdown<T>(
  rows: &[T],
  movement: impl Fn(&T) -> Option<i32>,
) -> Vec<(Movement, usize)> {
  let counted = count_by(rows, |r| Some(classify_movement(movement(r))));
  Movement::iter()
    .map(|label| {
      let n = counted
        .iter()
        .find(|(l, _)| *l == label)
        .map_or(0, |(_, n)| *n);
      (label, n)
    })
    .collect()
}
