//! Entity table loading and category grouping.
//!
//! The entity table is a delimited file with one row per entity (e.g. a
//! paper). Three columns matter here: a citation-index id, a catalog id
//! (the key used for nodes in the network file), and a category label used
//! to stratify pair sampling.

use crate::{Error, Result};
use indexmap::IndexMap;
use std::path::Path;

/// One row of the entity table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    /// Citation-index identifier (carried through to result rows).
    pub cite_id: String,
    /// Catalog identifier; matches the graph's node keys.
    pub catalog_id: String,
    /// Category label used for stratification.
    pub category: String,
}

/// Where to find the relevant columns in the entity table.
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Field delimiter.
    pub delimiter: u8,
    /// Column holding the citation-index id.
    pub cite_column: String,
    /// Column holding the catalog id.
    pub catalog_column: String,
    /// Column holding the category label.
    pub category_column: String,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            cite_column: "cite_id".to_string(),
            catalog_column: "catalog_id".to_string(),
            category_column: "category".to_string(),
        }
    }
}

/// Load the entity table from a delimited file with a header row.
///
/// Rows whose field count differs from the header fail the load (the
/// underlying reader is strict about record lengths).
pub fn load_entity_table(path: impl AsRef<Path>, schema: &TableSchema) -> Result<Vec<EntityRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(schema.delimiter)
        .has_headers(true)
        .from_path(path.as_ref())?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    };
    let cite_col = column(&schema.cite_column)?;
    let catalog_col = column(&schema.catalog_column)?;
    let category_col = column(&schema.category_column)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(EntityRecord {
            cite_id: row[cite_col].to_string(),
            catalog_id: row[catalog_col].to_string(),
            category: row[category_col].to_string(),
        });
    }
    Ok(records)
}

/// Group record indices by category, keeping only categories whose member
/// count strictly exceeds `min_members`.
///
/// Groups are keyed in order of first occurrence in the table, so iteration
/// is deterministic for a fixed input.
pub fn category_groups(
    records: &[EntityRecord],
    min_members: usize,
) -> IndexMap<String, Vec<usize>> {
    let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (idx, record) in records.iter().enumerate() {
        groups.entry(record.category.clone()).or_default().push(idx);
    }
    groups.retain(|_, members| members.len() > min_members);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_table(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_entity_table() {
        let file = write_table("cite_id\tcatalog_id\tcategory\np1\tm1\tastro\np2\tm2\tmath\n");
        let records = load_entity_table(file.path(), &TableSchema::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].cite_id, "p1");
        assert_eq!(records[1].catalog_id, "m2");
        assert_eq!(records[1].category, "math");
    }

    #[test]
    fn test_load_with_comma_delimiter_and_renamed_columns() {
        let file = write_table("paper,mag,field\np1,m1,astro\n");
        let schema = TableSchema {
            delimiter: b',',
            cite_column: "paper".to_string(),
            catalog_column: "mag".to_string(),
            category_column: "field".to_string(),
        };
        let records = load_entity_table(file.path(), &schema).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].catalog_id, "m1");
    }

    #[test]
    fn test_missing_column() {
        let file = write_table("cite_id\tcatalog_id\np1\tm1\n");
        let err = load_entity_table(file.path(), &TableSchema::default()).unwrap_err();

        assert!(matches!(err, Error::ColumnNotFound(name) if name == "category"));
    }

    #[test]
    fn test_short_row_rejected() {
        let file = write_table("cite_id\tcatalog_id\tcategory\np1\tm1\n");
        assert!(matches!(
            load_entity_table(file.path(), &TableSchema::default()),
            Err(Error::Csv(_))
        ));
    }

    fn record(cite: &str, category: &str) -> EntityRecord {
        EntityRecord {
            cite_id: cite.to_string(),
            catalog_id: format!("m-{cite}"),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_category_groups_threshold() {
        let records = vec![
            record("p1", "astro"),
            record("p2", "astro"),
            record("p3", "math"),
            record("p4", "astro"),
        ];

        // "math" has 1 member, which does not exceed the threshold of 1.
        let groups = category_groups(&records, 1);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["astro"], vec![0, 1, 3]);

        let groups = category_groups(&records, 0);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["math"], vec![2]);
    }

    #[test]
    fn test_category_groups_first_occurrence_order() {
        let records = vec![
            record("p1", "math"),
            record("p2", "astro"),
            record("p3", "math"),
            record("p4", "astro"),
        ];

        let keys: Vec<_> = category_groups(&records, 0).into_keys().collect();
        assert_eq!(keys, vec!["math", "astro"]);
    }
}
