//! CSV ingestion for insurance records.
//!
//! The loader reads a delimited file with a header row and keeps only fully
//! populated rows.  A row with an empty cell in *any* column -- including
//! columns the pipeline never looks at -- is discarded whole, so the working
//! set downstream is guaranteed to be complete.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;

/// One insurance record after schema interpretation.
///
/// The input file may carry additional columns (sex, bmi, smoker, ...); they
/// participate in the completeness check but are not retained.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub age: f64,
    pub region: String,
    pub charges: f64,
}

/// The in-memory working set for one run, immutable after load.
pub type Table = Vec<Record>;

const REQUIRED_COLUMNS: &[&str] = &["age", "region", "charges"];

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .with_context(|| format!("input file is missing required column '{}'", name))
}

fn parse_numeric(value: &str, column: &str, row: usize) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .with_context(|| format!("row {}: cannot parse '{}' as numeric {}", row, value, column))
}

/// Loads the insurance table from `path`.
///
/// Fails if the file cannot be read, if any of the required columns (`age`,
/// `region`, `charges`) is absent from the header, or if a retained row holds
/// a non-numeric value where a number is expected.  Rows with missing fields
/// are silently dropped rather than treated as errors.
pub fn load_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open input file {}", path.display()))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .with_context(|| format!("failed to read header row of {}", path.display()))?
        .clone();

    let mut indices = [0usize; 3];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS.iter().copied()) {
        *slot = column_index(&headers, name)?;
    }
    let [age_idx, region_idx, charges_idx] = indices;

    let mut table = Table::new();
    for (row, result) in reader.records().enumerate() {
        let record = result
            .with_context(|| format!("failed to parse row {} of {}", row + 1, path.display()))?;

        // Completeness gate: any blank cell disqualifies the whole row.
        if record.iter().any(|cell| cell.trim().is_empty()) {
            continue;
        }

        let field = |idx: usize| -> Result<&str> {
            match record.get(idx) {
                Some(value) => Ok(value),
                None => bail!("row {}: fewer cells than header columns", row + 1),
            }
        };

        table.push(Record {
            age: parse_numeric(field(age_idx)?, "age", row + 1)?,
            region: field(region_idx)?.trim().to_owned(),
            charges: parse_numeric(field(charges_idx)?, "charges", row + 1)?,
        });
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::load_table;
    use std::fs;
    use std::path::PathBuf;

    fn write_csv(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("insurance.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn keeps_only_fully_populated_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "age,sex,bmi,region,charges\n\
             19,female,27.9,southwest,16884.92\n\
             33,male,,northwest,21984.47\n\
             28,male,33.0,southeast,4449.46\n\
             ,female,25.7,northeast,3866.86\n",
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].region, "southwest");
        assert_eq!(table[1].region, "southeast");
    }

    #[test]
    fn blank_unused_column_still_drops_the_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "age,smoker,region,charges\n\
             40,,northeast,100.0\n\
             50,no,southwest,200.0\n",
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].age, 50.0);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "age,sex,charges\n19,female,100.0\n");

        let err = load_table(&path).unwrap_err();
        assert!(err.to_string().contains("region"));
    }

    #[test]
    fn unparseable_numeric_cell_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "age,region,charges\nforty,northeast,100.0\n");

        assert!(load_table(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_table(dir.path().join("nope.csv")).is_err());
    }

    #[test]
    fn extra_columns_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "age,sex,bmi,children,smoker,region,charges\n\
             62,female,26.29,0,yes,southeast,27808.73\n",
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].charges, 27808.73);
    }
}
