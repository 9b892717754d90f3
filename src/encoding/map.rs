//! Fitted encoding statistics.
//!
//! [`EncodingMap`] is the artifact produced by `fit`: per encoded column,
//! per-category response totals, both fold-independent and per fold, plus
//! the global response prior. It is read-only after construction and safe
//! to share across concurrent transforms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Category code used for missing (NaN) categorical values.
///
/// A missing value forms its own category level, mirroring how real
/// category codes are non-negative.
pub const NA_CATEGORY: i64 = -1;

/// Convert a raw categorical cell into a grouping code.
#[inline]
pub(crate) fn category_code(value: f32) -> i64 {
    if value.is_nan() {
        NA_CATEGORY
    } else {
        value as i64
    }
}

// =============================================================================
// CategoryStats
// =============================================================================

/// Aggregate response statistics for one group of rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    /// Number of rows in the group.
    pub count: u64,
    /// Sum of the 0/1 response over the group.
    pub sum: f64,
}

impl CategoryStats {
    /// Add one observation.
    #[inline]
    pub(crate) fn add(&mut self, response: f64) {
        self.count += 1;
        self.sum += response;
    }

    /// Merge another accumulator into this one. Addition is commutative
    /// and associative, so merge order does not affect the result.
    #[inline]
    pub fn merge(&mut self, other: &CategoryStats) {
        self.count += other.count;
        self.sum += other.sum;
    }

    /// Subtract a contribution, saturating at zero rows.
    #[inline]
    pub(crate) fn minus(&self, other: &CategoryStats) -> CategoryStats {
        CategoryStats {
            count: self.count.saturating_sub(other.count),
            sum: self.sum - other.sum,
        }
    }

    /// Mean response of the group. `None` when the group is empty.
    #[inline]
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

// =============================================================================
// ColumnStats
// =============================================================================

/// Per-column aggregates: fold-independent totals and per-fold splits.
#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnStats {
    /// category -> totals over the whole fit frame.
    pub global: BTreeMap<i64, CategoryStats>,
    /// (category, fold) -> totals. Empty when no fold column was fitted.
    pub per_fold: BTreeMap<(i64, i64), CategoryStats>,
}

impl ColumnStats {
    /// Fold-independent totals for a category.
    #[inline]
    pub fn global_stats(&self, category: i64) -> Option<&CategoryStats> {
        self.global.get(&category)
    }

    /// This category's contribution from a single fold.
    #[inline]
    pub fn fold_stats(&self, category: i64, fold: i64) -> Option<&CategoryStats> {
        self.per_fold.get(&(category, fold))
    }

    /// Number of distinct categories seen at fit.
    pub fn n_categories(&self) -> usize {
        self.global.len()
    }
}

// =============================================================================
// EncodingMap
// =============================================================================

/// The fitted encoding map: per-column category statistics plus the
/// global response prior.
///
/// Column order follows the configuration given at fit time and
/// determines the order of appended output columns.
#[derive(Debug, Clone)]
pub struct EncodingMap {
    /// (column name, statistics), in configuration order.
    pub(crate) columns: Vec<(String, ColumnStats)>,
    /// Whole-frame response totals.
    pub(crate) prior: CategoryStats,
    /// Resolved response column name.
    pub(crate) response: String,
    /// Resolved fold column name, when fitted with folds.
    pub(crate) fold: Option<String>,
}

impl EncodingMap {
    /// Global prior probability: total response sum over total row count.
    ///
    /// # Panics
    ///
    /// Never panics for maps produced by `fit`, which rejects empty
    /// frames.
    pub fn prior(&self) -> f64 {
        self.prior.mean().expect("fitted map has a non-empty prior")
    }

    /// Number of encoded columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Encoded column names, in output order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Response column name this map was fitted against.
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Fold column name, when fitted with folds.
    pub fn fold(&self) -> Option<&str> {
        self.fold.as_deref()
    }

    /// Fold-independent totals for one (column, category) pair.
    pub fn category_stats(&self, column: &str, category: i64) -> Option<CategoryStats> {
        self.column_stats(column)
            .and_then(|stats| stats.global_stats(category))
            .copied()
    }

    pub(crate) fn column_stats(&self, column: &str) -> Option<&ColumnStats> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, stats)| stats)
    }

    // =========================================================================
    // Table export
    // =========================================================================

    /// Export as a flat table keyed by (column, category, fold), plus the
    /// prior. Useful for storage and debugging.
    pub fn to_table(&self) -> EncodingTable {
        let mut rows = Vec::new();
        for (column, stats) in &self.columns {
            for (&category, s) in &stats.global {
                rows.push(EncodingRow {
                    column: column.clone(),
                    category,
                    fold: None,
                    count: s.count,
                    sum: s.sum,
                });
            }
            for (&(category, fold), s) in &stats.per_fold {
                rows.push(EncodingRow {
                    column: column.clone(),
                    category,
                    fold: Some(fold),
                    count: s.count,
                    sum: s.sum,
                });
            }
        }
        EncodingTable {
            response: self.response.clone(),
            fold: self.fold.clone(),
            prior: self.prior,
            rows,
        }
    }

    /// Rebuild a map from an exported table.
    ///
    /// Column order follows first appearance in the rows.
    pub fn from_table(table: &EncodingTable) -> Self {
        let mut columns: Vec<(String, ColumnStats)> = Vec::new();
        for row in &table.rows {
            let idx = match columns.iter().position(|(name, _)| name == &row.column) {
                Some(idx) => idx,
                None => {
                    columns.push((row.column.clone(), ColumnStats::default()));
                    columns.len() - 1
                }
            };
            let stats = &mut columns[idx].1;
            let entry = CategoryStats {
                count: row.count,
                sum: row.sum,
            };
            match row.fold {
                None => stats.global.insert(row.category, entry),
                Some(fold) => stats.per_fold.insert((row.category, fold), entry),
            };
        }
        EncodingMap {
            columns,
            prior: table.prior,
            response: table.response.clone(),
            fold: table.fold.clone(),
        }
    }
}

/// One row of an exported [`EncodingTable`].
///
/// `fold: None` rows carry the fold-independent totals for a category;
/// `fold: Some(_)` rows carry that category's contribution from a single
/// fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingRow {
    pub column: String,
    pub category: i64,
    pub fold: Option<i64>,
    pub count: u64,
    pub sum: f64,
}

/// Flat, serializable form of an [`EncodingMap`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingTable {
    pub response: String,
    pub fold: Option<String>,
    pub prior: CategoryStats,
    pub rows: Vec<EncodingRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> EncodingMap {
        let mut stats = ColumnStats::default();
        stats.global.insert(0, CategoryStats { count: 3, sum: 2.0 });
        stats.global.insert(1, CategoryStats { count: 2, sum: 1.0 });
        stats
            .per_fold
            .insert((0, 0), CategoryStats { count: 1, sum: 1.0 });
        stats
            .per_fold
            .insert((0, 1), CategoryStats { count: 2, sum: 1.0 });
        EncodingMap {
            columns: vec![("color".to_string(), stats)],
            prior: CategoryStats { count: 5, sum: 3.0 },
            response: "label".to_string(),
            fold: Some("fold".to_string()),
        }
    }

    #[test]
    fn category_code_maps_nan_to_na_level() {
        assert_eq!(category_code(2.0), 2);
        assert_eq!(category_code(f32::NAN), NA_CATEGORY);
    }

    #[test]
    fn stats_add_merge_minus() {
        let mut a = CategoryStats::default();
        a.add(1.0);
        a.add(0.0);
        let mut b = CategoryStats::default();
        b.add(1.0);
        a.merge(&b);
        assert_eq!(a, CategoryStats { count: 3, sum: 2.0 });

        let c = a.minus(&b);
        assert_eq!(c, CategoryStats { count: 2, sum: 1.0 });
        assert_eq!(c.mean(), Some(0.5));
        assert_eq!(CategoryStats::default().mean(), None);
    }

    #[test]
    fn map_accessors() {
        let map = sample_map();
        assert_eq!(map.n_columns(), 1);
        assert_eq!(map.column_names().collect::<Vec<_>>(), vec!["color"]);
        assert_eq!(map.prior(), 3.0 / 5.0);
        assert_eq!(
            map.category_stats("color", 0),
            Some(CategoryStats { count: 3, sum: 2.0 })
        );
        assert_eq!(map.category_stats("color", 7), None);
        assert_eq!(map.response(), "label");
        assert_eq!(map.fold(), Some("fold"));
    }

    #[test]
    fn table_round_trip() {
        let map = sample_map();
        let table = map.to_table();
        assert_eq!(table.rows.len(), 4);

        let rebuilt = EncodingMap::from_table(&table);
        assert_eq!(rebuilt.prior, map.prior);
        assert_eq!(
            rebuilt.column_stats("color").unwrap().global,
            map.column_stats("color").unwrap().global
        );
        assert_eq!(
            rebuilt.column_stats("color").unwrap().per_fold,
            map.column_stats("color").unwrap().per_fold
        );
    }
}
