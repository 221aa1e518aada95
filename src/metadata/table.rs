//! In-memory metadata table.
//!
//! One row per sample, one named column per covariate. Cells keep their
//! raw textual form; numeric interpretation happens at the point of use.

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::error::{MatchError, Result};

/// A loaded metadata table
#[derive(Debug, Clone)]
pub struct MetadataTable {
    /// Header of the sample id column
    id_header: String,
    /// Covariate column names, in file order
    columns: Vec<String>,
    /// Column name -> position in `columns`
    column_index: FxHashMap<String, usize>,
    /// Sample ids, in file order
    ids: Vec<String>,
    /// Sample id -> row index
    id_index: FxHashMap<String, usize>,
    /// Row-major cells; each row holds `columns.len()` entries
    rows: Vec<Vec<String>>,
}

impl MetadataTable {
    /// Create a table from a header row and data rows. The first header
    /// names the sample id column and each row's first cell is the id.
    pub fn new(headers: Vec<String>, raw_rows: Vec<Vec<String>>) -> Result<Self> {
        let mut headers = headers.into_iter();
        let id_header = headers.next().ok_or_else(|| {
            MatchError::Validation("metadata must have at least an id column".to_string())
        })?;
        let columns: Vec<String> = headers.collect();

        let mut column_index = FxHashMap::default();
        for (idx, name) in columns.iter().enumerate() {
            if column_index.insert(name.clone(), idx).is_some() {
                return Err(MatchError::Validation(format!("duplicate column '{name}'")));
            }
        }

        let mut ids = Vec::with_capacity(raw_rows.len());
        let mut rows = Vec::with_capacity(raw_rows.len());
        for mut row in raw_rows {
            if row.len() != columns.len() + 1 {
                return Err(MatchError::Validation(format!(
                    "row for '{}' has {} cells, expected {}",
                    row.first().map_or("", String::as_str),
                    row.len(),
                    columns.len() + 1
                )));
            }
            let id = row.remove(0);
            ids.push(id);
            rows.push(row);
        }

        if let Some(duplicate) = ids.iter().duplicates().next() {
            return Err(MatchError::Validation(format!(
                "duplicate sample id '{duplicate}'"
            )));
        }
        let id_index = ids
            .iter()
            .enumerate()
            .map(|(row, id)| (id.clone(), row))
            .collect();

        Ok(Self {
            id_header,
            columns,
            column_index,
            ids,
            id_index,
            rows,
        })
    }

    /// Header of the sample id column
    #[must_use]
    pub fn id_header(&self) -> &str {
        &self.id_header
    }

    /// Covariate column names, in order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Sample ids, in row order
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a named column
    pub fn column_position(&self, name: &str) -> Result<usize> {
        self.column_index
            .get(name)
            .copied()
            .ok_or_else(|| MatchError::ColumnNotFound(name.to_string()))
    }

    /// Cell at a row and resolved column position
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> &str {
        &self.rows[row][column]
    }

    /// Cell at a row and named column
    pub fn value(&self, row: usize, column: &str) -> Result<&str> {
        Ok(self.cell(row, self.column_position(column)?))
    }

    /// Sample id of a row
    #[must_use]
    pub fn row_id(&self, row: usize) -> &str {
        &self.ids[row]
    }

    /// Row index of a sample id, if present
    #[must_use]
    pub fn row_index(&self, id: &str) -> Option<usize> {
        self.id_index.get(id).copied()
    }

    /// Keep only the rows where the mask is true, producing a new table
    pub fn filter(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.rows.len() {
            return Err(MatchError::Validation(format!(
                "mask length ({}) doesn't match table row count ({})",
                mask.len(),
                self.rows.len()
            )));
        }

        let mut ids = Vec::new();
        let mut rows = Vec::new();
        for (row, keep) in mask.iter().enumerate() {
            if *keep {
                ids.push(self.ids[row].clone());
                rows.push(self.rows[row].clone());
            }
        }
        let id_index = ids
            .iter()
            .enumerate()
            .map(|(row, id)| (id.clone(), row))
            .collect();

        Ok(Self {
            id_header: self.id_header.clone(),
            columns: self.columns.clone(),
            column_index: self.column_index.clone(),
            ids,
            id_index,
            rows,
        })
    }

    /// Append a computed column. The value vector must hold one entry per row.
    pub fn add_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if self.column_index.contains_key(name) {
            return Err(MatchError::Validation(format!(
                "column '{name}' already exists"
            )));
        }
        if values.len() != self.rows.len() {
            return Err(MatchError::Validation(format!(
                "column '{name}' has {} values, expected {}",
                values.len(),
                self.rows.len()
            )));
        }
        self.column_index
            .insert(name.to_string(), self.columns.len());
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> MetadataTable {
        MetadataTable::new(
            vec!["id".into(), "sex".into(), "age".into()],
            vec![
                vec!["s1".into(), "F".into(), "34".into()],
                vec!["s2".into(), "M".into(), "40".into()],
                vec!["s3".into(), "F".into(), "29".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn lookup_by_name_and_id() {
        let table = sample_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.value(1, "sex").unwrap(), "M");
        assert_eq!(table.row_index("s3"), Some(2));
        assert!(matches!(
            table.value(0, "weight"),
            Err(MatchError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = MetadataTable::new(
            vec!["id".into(), "sex".into()],
            vec![
                vec!["s1".into(), "F".into()],
                vec!["s1".into(), "M".into()],
            ],
        );
        assert!(matches!(result, Err(MatchError::Validation(_))));
    }

    #[test]
    fn filter_keeps_masked_rows() {
        let table = sample_table();
        let filtered = table.filter(&[true, false, true]).unwrap();
        assert_eq!(filtered.ids(), ["s1", "s3"]);
        assert_eq!(filtered.value(1, "age").unwrap(), "29");
        assert!(filtered.row_index("s2").is_none());
    }

    #[test]
    fn filter_rejects_wrong_mask_length() {
        let table = sample_table();
        assert!(table.filter(&[true, false]).is_err());
    }

    #[test]
    fn add_column_appends_values() {
        let mut table = sample_table();
        table
            .add_column("matched_to", vec!["0".into(), "s3".into(), "s2".into()])
            .unwrap();
        assert_eq!(table.value(1, "matched_to").unwrap(), "s3");
        assert!(table.add_column("matched_to", vec![]).is_err());
    }
}
