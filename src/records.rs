//! Row types flowing through the pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single row deserialized from the source CSV, one per (country, date).
///
/// Numeric fields are optional because the upstream dataset leaves cells
/// empty whenever a country has not reported. The `date` column is kept as
/// a raw string here; parsing (and dropping rows that fail it) is the
/// cleaner's job.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub iso_code: String,
    #[serde(default)]
    pub continent: Option<String>,
    pub location: String,
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub total_cases: Option<f64>,
    #[serde(default)]
    pub new_cases: Option<f64>,
    #[serde(default)]
    pub total_deaths: Option<f64>,
    #[serde(default)]
    pub new_deaths: Option<f64>,
    #[serde(default)]
    pub population: Option<f64>,

    #[serde(default)]
    pub total_vaccinations: Option<f64>,
    #[serde(default)]
    pub people_vaccinated: Option<f64>,
    #[serde(default)]
    pub people_fully_vaccinated: Option<f64>,
    #[serde(default)]
    pub new_vaccinations: Option<f64>,
}

/// A cleaned row: parsed date, imputed counts, derived metrics.
///
/// Counts are plain `f64` because imputation has already happened. Derived
/// metrics stay `Option<f64>`: `None` means the denominator was zero or
/// missing (or the numerator negative), never NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub iso_code: String,
    pub continent: Option<String>,
    pub location: String,
    pub date: NaiveDate,

    pub total_cases: f64,
    pub new_cases: f64,
    pub total_deaths: f64,
    pub new_deaths: f64,
    pub population: f64,

    pub total_vaccinations: f64,
    pub people_vaccinated: f64,
    pub people_fully_vaccinated: f64,
    pub new_vaccinations: f64,

    pub cases_per_million: Option<f64>,
    pub deaths_per_million: Option<f64>,
    pub case_fatality_rate: Option<f64>,
    pub pct_vaccinated: Option<f64>,
    pub pct_fully_vaccinated: Option<f64>,
}
