//! Tabular query results.
//!
//! Rows are time points. Columns are either one per outcome (age groups
//! summed) or one per (outcome, age group) pair, grouped by outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a result column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnKey {
    pub outcome: usize,
    /// `None` when age groups were summed
    pub age_group: Option<usize>,
}

/// One time series in a result table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub key: ColumnKey,
    /// Outer label (the outcome)
    pub outcome_label: String,
    /// Inner label (the age group), present in hierarchical tables
    pub age_group_label: Option<String>,
    pub values: Vec<f64>,
}

impl Column {
    /// `outcome` or `outcome/age_group`
    pub fn label(&self) -> String {
        match &self.age_group_label {
            Some(inner) => format!("{}/{inner}", self.outcome_label),
            None => self.outcome_label.clone(),
        }
    }
}

/// Result of an outcome query
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutcomeTable {
    rows: usize,
    columns: Vec<Column>,
}

impl OutcomeTable {
    /// Assemble a table of `rows` time points. Every column holds `rows` values;
    /// the row count stands even when there are no columns.
    pub(crate) fn from_columns(rows: usize, columns: Vec<Column>) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == rows));
        Self { rows, columns }
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether columns carry a second (age group) level
    pub fn is_hierarchical(&self) -> bool {
        self.columns.iter().any(|c| c.key.age_group.is_some())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn labels(&self) -> Vec<String> {
        self.columns.iter().map(Column::label).collect()
    }

    /// Values of the first column with this key
    pub fn column(&self, outcome: usize, age_group: Option<usize>) -> Option<&[f64]> {
        let key = ColumnKey { outcome, age_group };
        self.columns
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.values.as_slice())
    }

    /// All columns belonging to one outcome, in table order
    pub fn group(&self, outcome: usize) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(move |c| c.key.outcome == outcome)
    }

    /// Values across all columns at time point `t`
    pub fn row(&self, t: usize) -> Option<Vec<f64>> {
        if t >= self.rows {
            return None;
        }
        Some(self.columns.iter().map(|c| c.values[t]).collect())
    }
}

impl fmt::Display for OutcomeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "t\t{}", self.labels().join("\t"))?;
        for t in 0..self.rows {
            write!(f, "{t}")?;
            for column in &self.columns {
                write!(f, "\t{}", column.values[t])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
