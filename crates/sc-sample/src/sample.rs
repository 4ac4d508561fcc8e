//! Columnar event storage (Structure-of-Arrays).

use sc_core::{Error, Result};
use std::collections::HashMap;

/// Columnar event sample.
///
/// All columns have identical length; row `i` of every column refers to the
/// same event. Columns are immutable once constructed — filtering and schema
/// reduction produce new samples.
#[derive(Debug, Clone)]
pub struct Sample {
    n_rows: usize,
    column_names: Vec<String>,
    columns: Vec<Vec<f64>>,
    name_to_index: HashMap<String, usize>,
}

impl Sample {
    /// Create a [`Sample`] from already materialized columns.
    ///
    /// Column order is preserved. All columns must have the same length and
    /// contain only finite values.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::Validation("Sample requires at least one column".into()));
        }

        let mut column_names = Vec::with_capacity(columns.len());
        let mut cols = Vec::with_capacity(columns.len());
        let mut n_rows: Option<usize> = None;

        for (name, col) in columns {
            if column_names.contains(&name) {
                return Err(Error::Validation(format!("duplicate column '{name}'")));
            }
            let n = col.len();
            if let Some(nr) = n_rows {
                if n != nr {
                    return Err(Error::Validation(format!(
                        "column length mismatch for '{name}': expected {nr}, got {n}"
                    )));
                }
            } else {
                n_rows = Some(n);
            }
            if col.iter().any(|x| !x.is_finite()) {
                return Err(Error::Validation(format!(
                    "column '{name}' contains non-finite values"
                )));
            }
            column_names.push(name);
            cols.push(col);
        }

        let name_to_index =
            column_names.iter().enumerate().map(|(i, n)| (n.clone(), i)).collect::<HashMap<_, _>>();

        Ok(Self { n_rows: n_rows.unwrap_or(0), column_names, columns: cols, name_to_index })
    }

    /// Number of rows (events).
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// True when the sample holds no events.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Names of stored columns (stable order).
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        let idx = self.name_to_index.get(name).copied()?;
        self.columns.get(idx).map(|c| c.as_slice())
    }

    /// Get a column by name, failing with a descriptive error when absent.
    pub fn require_column(&self, name: &str) -> Result<&[f64]> {
        self.column(name).ok_or_else(|| Error::Validation(format!("missing column '{name}'")))
    }

    /// True when a column with the given name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    /// Keep only rows where `mask[i]` is true, applied to every column at
    /// once so rows can never desynchronize across columns.
    pub fn select(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.n_rows {
            return Err(Error::Validation(format!(
                "selection mask length mismatch: expected {}, got {}",
                self.n_rows,
                mask.len()
            )));
        }

        let n_kept = mask.iter().filter(|&&m| m).count();
        let mut cols = Vec::with_capacity(self.columns.len());
        for col in &self.columns {
            let mut out = Vec::with_capacity(n_kept);
            for (i, &keep) in mask.iter().enumerate() {
                if keep {
                    out.push(col[i]);
                }
            }
            cols.push(out);
        }

        Ok(Self {
            n_rows: n_kept,
            column_names: self.column_names.clone(),
            columns: cols,
            name_to_index: self.name_to_index.clone(),
        })
    }

    /// Drop the named columns from the schema. Names that are absent are
    /// ignored; row data of the remaining columns is untouched.
    pub fn drop_columns(&self, names: &[&str]) -> Self {
        let mut column_names = Vec::new();
        let mut columns = Vec::new();
        for (name, col) in self.column_names.iter().zip(&self.columns) {
            if !names.contains(&name.as_str()) {
                column_names.push(name.clone());
                columns.push(col.clone());
            }
        }
        let name_to_index =
            column_names.iter().enumerate().map(|(i, n)| (n.clone(), i)).collect::<HashMap<_, _>>();
        Self { n_rows: self.n_rows, column_names, columns, name_to_index }
    }
}
