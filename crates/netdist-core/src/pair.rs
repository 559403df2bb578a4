//! Sampled pair rows and range-limited pairs-file reading.

use crate::partition::Range;
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One sampled (source, target) pair.
///
/// Each side carries both external identifiers: the citation-index id that
/// ends up in result rows, and the catalog id that keys nodes in the
/// network file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    /// Source citation-index id.
    pub source_cite_id: String,
    /// Source catalog id (graph node key).
    pub source_catalog_id: String,
    /// Target citation-index id.
    pub target_cite_id: String,
    /// Target catalog id (graph node key).
    pub target_catalog_id: String,
}

impl Pair {
    /// Parse a tab-separated 4-field pair row.
    pub fn parse(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        let [source_cite_id, source_catalog_id, target_cite_id, target_catalog_id] = fields[..]
        else {
            return Err(Error::PairParse(format!(
                "expected 4 tab-separated fields, got {} in '{}'",
                fields.len(),
                line
            )));
        };
        Ok(Self {
            source_cite_id: source_cite_id.to_string(),
            source_catalog_id: source_catalog_id.to_string(),
            target_cite_id: target_cite_id.to_string(),
            target_catalog_id: target_catalog_id.to_string(),
        })
    }
}

/// Read the pair rows whose zero-based data-row indices fall in `range`.
///
/// `#`-prefixed lines are section markers from the sampler; they are
/// skipped and do not count as data rows. Reading stops as soon as the
/// range is filled, so a range extending past the end of the file simply
/// yields fewer pairs.
pub fn read_pair_range(path: impl AsRef<Path>, range: Range) -> Result<Vec<Pair>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut pairs = Vec::new();
    let mut idx = 0usize;

    for line in reader.lines() {
        let line = line?;
        if line.starts_with('#') {
            continue;
        }
        if idx >= range.end {
            break;
        }
        if idx >= range.start {
            pairs.push(Pair::parse(line.trim())?);
        }
        idx += 1;
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse() {
        let pair = Pair::parse("p1\tm1\tp2\tm2").unwrap();

        assert_eq!(pair.source_cite_id, "p1");
        assert_eq!(pair.source_catalog_id, "m1");
        assert_eq!(pair.target_cite_id, "p2");
        assert_eq!(pair.target_catalog_id, "m2");
    }

    #[test]
    fn test_parse_wrong_arity() {
        assert!(matches!(Pair::parse("p1\tm1\tp2"), Err(Error::PairParse(_))));
        assert!(matches!(
            Pair::parse("p1\tm1\tp2\tm2\textra"),
            Err(Error::PairParse(_))
        ));
        assert!(matches!(Pair::parse(""), Err(Error::PairParse(_))));
    }

    fn pairs_file(data_rows: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# astro\tastro").unwrap();
        for i in 0..data_rows {
            if i > 0 && i % 5 == 0 {
                writeln!(file, "# astro\tmath").unwrap();
            }
            writeln!(file, "p{i}\tm{i}\tq{i}\tn{i}").unwrap();
        }
        file
    }

    #[test]
    fn test_read_range_skips_comments() {
        let file = pairs_file(20);
        let pairs = read_pair_range(file.path(), Range::new(4, 8)).unwrap();

        // Comments are interleaved but indexing counts only data rows.
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0].source_cite_id, "p4");
        assert_eq!(pairs[3].source_cite_id, "p7");
    }

    #[test]
    fn test_read_range_past_end_of_file() {
        let file = pairs_file(10);
        let pairs = read_pair_range(file.path(), Range::new(8, 16)).unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].source_cite_id, "p9");
    }

    #[test]
    fn test_read_full_range() {
        let file = pairs_file(200);
        let pairs = read_pair_range(file.path(), Range::new(50, 130)).unwrap();

        assert_eq!(pairs.len(), 80);
        assert_eq!(pairs[0].source_cite_id, "p50");
        assert_eq!(pairs[79].source_cite_id, "p129");
    }

    #[test]
    fn test_read_malformed_row_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "p0\tm0\tq0\tn0").unwrap();
        writeln!(file, "broken row").unwrap();

        assert!(matches!(
            read_pair_range(file.path(), Range::new(0, 2)),
            Err(Error::PairParse(_))
        ));
    }
}
