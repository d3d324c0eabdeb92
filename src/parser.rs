//! CSV decoding for the raw dataset.

use csv::ReaderBuilder;
use thiserror::Error;

use crate::records::RawRecord;

/// Columns the pipeline cannot run without. Vaccination columns are
/// optional upstream and therefore not listed here.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "iso_code",
    "location",
    "date",
    "population",
    "total_cases",
    "new_cases",
    "total_deaths",
    "new_deaths",
];

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("required column `{0}` is missing from the input")]
    MissingColumn(&'static str),
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
}

/// Decodes headered CSV bytes into raw records.
///
/// Unknown columns are ignored; empty numeric cells become `None`.
///
/// # Errors
///
/// Returns [`SchemaError::MissingColumn`] if a required header is absent,
/// or [`SchemaError::Csv`] if a row cannot be decoded.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<RawRecord>, SchemaError> {
    let mut reader = ReaderBuilder::new().from_reader(bytes);

    let headers = reader.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *required) {
            return Err(SchemaError::MissingColumn(required));
        }
    }

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "iso_code,continent,location,date,total_cases,new_cases,total_deaths,new_deaths,population";

    #[test]
    fn test_parse_minimal_input() {
        let csv = format!("{HEADER}\nFRA,Europe,France,2021-03-01,100,5,10,1,67000000\n");
        let rows = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].location, "France");
        assert_eq!(rows[0].date, "2021-03-01");
        assert_eq!(rows[0].total_cases, Some(100.0));
        assert_eq!(rows[0].population, Some(67_000_000.0));
    }

    #[test]
    fn test_empty_cells_become_none() {
        let csv = format!("{HEADER}\nFRA,Europe,France,2021-03-01,,,,,\n");
        let rows = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(rows[0].total_cases, None);
        assert_eq!(rows[0].population, None);
    }

    #[test]
    fn test_missing_required_column() {
        // No `date` column.
        let csv = "iso_code,location,total_cases,new_cases,total_deaths,new_deaths,population\n\
                   FRA,France,100,5,10,1,67000000\n";
        let err = parse_records(csv.as_bytes()).unwrap_err();

        match err {
            SchemaError::MissingColumn(col) => assert_eq!(col, "date"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_columns_ignored() {
        let csv = format!(
            "{HEADER},reproduction_rate,stringency_index\n\
             FRA,Europe,France,2021-03-01,100,5,10,1,67000000,1.1,60.2\n"
        );
        let rows = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].new_cases, Some(5.0));
    }

    #[test]
    fn test_missing_vaccination_columns_default() {
        let csv = format!("{HEADER}\nFRA,Europe,France,2021-03-01,100,5,10,1,67000000\n");
        let rows = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(rows[0].people_fully_vaccinated, None);
        assert_eq!(rows[0].new_vaccinations, None);
    }
}
