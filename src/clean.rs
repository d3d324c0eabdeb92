//! Data cleaning: date parsing, aggregate-region filtering, per-country
//! imputation, and derived metrics.

use chrono::NaiveDate;
use tracing::debug;

use crate::records::{CleanRecord, RawRecord};

/// Aggregate rows the upstream dataset publishes alongside real countries.
/// Excluded so they cannot dominate country comparisons.
pub const AGGREGATE_REGIONS: &[&str] = &[
    "World",
    "Europe",
    "Asia",
    "Africa",
    "North America",
    "South America",
    "European Union",
    "International",
    "High income",
    "Low income",
    "Lower middle income",
    "Upper middle income",
    "Oceania",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Last observed value per numeric column, reset at each country boundary.
#[derive(Default)]
struct Carry {
    total_cases: Option<f64>,
    new_cases: Option<f64>,
    total_deaths: Option<f64>,
    new_deaths: Option<f64>,
    population: Option<f64>,
    total_vaccinations: Option<f64>,
    people_vaccinated: Option<f64>,
    people_fully_vaccinated: Option<f64>,
    new_vaccinations: Option<f64>,
}

/// Cleans raw rows into [`CleanRecord`]s.
///
/// Rows with a missing or unparseable date and rows for aggregate regions
/// are dropped. Numeric gaps are forward-filled within each country in
/// date order, then zero-filled (covers leading gaps). Derived metrics use
/// guarded division: absent instead of NaN or a negative rate.
pub fn clean_records(raw: Vec<RawRecord>) -> Vec<CleanRecord> {
    let total = raw.len();
    let mut dropped_regions = 0usize;
    let mut dropped_dates = 0usize;

    let mut dated: Vec<(NaiveDate, RawRecord)> = Vec::with_capacity(raw.len());
    for row in raw {
        if AGGREGATE_REGIONS.contains(&row.location.as_str()) {
            dropped_regions += 1;
            continue;
        }
        match NaiveDate::parse_from_str(row.date.trim(), DATE_FORMAT) {
            Ok(date) => dated.push((date, row)),
            Err(_) => dropped_dates += 1,
        }
    }
    debug!(
        total,
        kept = dated.len(),
        dropped_regions,
        dropped_dates,
        "raw rows filtered"
    );

    // Stable sort: forward-fill needs date order per country, and the
    // snapshot tie-break relies on input order surviving within ties.
    dated.sort_by(|a, b| a.1.location.cmp(&b.1.location).then(a.0.cmp(&b.0)));

    let mut cleaned = Vec::with_capacity(dated.len());
    let mut carry = Carry::default();
    let mut current: Option<String> = None;

    for (date, row) in dated {
        if current.as_deref() != Some(row.location.as_str()) {
            carry = Carry::default();
            current = Some(row.location.clone());
        }

        macro_rules! fill {
            ($field:ident) => {{
                if let Some(v) = row.$field {
                    carry.$field = Some(v);
                }
                carry.$field.unwrap_or(0.0)
            }};
        }

        let total_cases = fill!(total_cases);
        let new_cases = fill!(new_cases);
        let total_deaths = fill!(total_deaths);
        let new_deaths = fill!(new_deaths);
        let population = fill!(population);
        let total_vaccinations = fill!(total_vaccinations);
        let people_vaccinated = fill!(people_vaccinated);
        let people_fully_vaccinated = fill!(people_fully_vaccinated);
        let new_vaccinations = fill!(new_vaccinations);

        cleaned.push(CleanRecord {
            iso_code: row.iso_code,
            continent: row.continent,
            location: row.location,
            date,
            total_cases,
            new_cases,
            total_deaths,
            new_deaths,
            population,
            total_vaccinations,
            people_vaccinated,
            people_fully_vaccinated,
            new_vaccinations,
            cases_per_million: per_million(total_cases, population),
            deaths_per_million: per_million(total_deaths, population),
            case_fatality_rate: percent_of(total_deaths, total_cases),
            pct_vaccinated: percent_of(people_vaccinated, population),
            pct_fully_vaccinated: percent_of(people_fully_vaccinated, population),
        });
    }

    cleaned
}

/// Scales a count to a per-million rate. Absent when the population is
/// zero or missing, or the count is negative.
pub fn per_million(metric: f64, population: f64) -> Option<f64> {
    (population > 0.0 && metric >= 0.0).then(|| metric / population * 1_000_000.0)
}

/// Share of `part` in `whole` as a percentage, with the same guards as
/// [`per_million`].
pub fn percent_of(part: f64, whole: f64) -> Option<f64> {
    (whole > 0.0 && part >= 0.0).then(|| part / whole * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(location: &str, date: &str) -> RawRecord {
        RawRecord {
            iso_code: location[..3.min(location.len())].to_uppercase(),
            continent: None,
            location: location.to_string(),
            date: date.to_string(),
            total_cases: None,
            new_cases: None,
            total_deaths: None,
            new_deaths: None,
            population: None,
            total_vaccinations: None,
            people_vaccinated: None,
            people_fully_vaccinated: None,
            new_vaccinations: None,
        }
    }

    #[test]
    fn test_unparseable_date_dropped() {
        let rows = vec![
            raw("France", "2021-03-01"),
            raw("France", "not-a-date"),
            raw("France", ""),
        ];
        let cleaned = clean_records(rows);
        assert_eq!(cleaned.len(), 1);
    }

    #[test]
    fn test_aggregate_regions_dropped() {
        let rows = vec![
            raw("World", "2021-03-01"),
            raw("High income", "2021-03-01"),
            raw("France", "2021-03-01"),
        ];
        let cleaned = clean_records(rows);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].location, "France");
    }

    #[test]
    fn test_forward_fill_then_zero_fill() {
        let mut a = raw("France", "2021-03-01");
        a.total_cases = None; // leading gap -> 0
        let mut b = raw("France", "2021-03-02");
        b.total_cases = Some(5.0);
        let mut c = raw("France", "2021-03-03");
        c.total_cases = None; // gap -> carried 5

        let cleaned = clean_records(vec![a, b, c]);
        let values: Vec<f64> = cleaned.iter().map(|r| r.total_cases).collect();
        assert_eq!(values, vec![0.0, 5.0, 5.0]);
    }

    #[test]
    fn test_fill_does_not_leak_across_countries() {
        let mut a = raw("Austria", "2021-03-01");
        a.total_cases = Some(100.0);
        let b = raw("Belgium", "2021-03-01");

        let cleaned = clean_records(vec![a, b]);
        let belgium = cleaned.iter().find(|r| r.location == "Belgium").unwrap();
        assert_eq!(belgium.total_cases, 0.0);
    }

    #[test]
    fn test_zero_population_leaves_per_capita_absent() {
        let mut a = raw("Atlantis", "2021-03-01");
        a.total_cases = Some(10.0);
        a.population = Some(0.0);

        let cleaned = clean_records(vec![a]);
        assert_eq!(cleaned[0].cases_per_million, None);
        assert_eq!(cleaned[0].pct_fully_vaccinated, None);
    }

    #[test]
    fn test_derived_metric_values() {
        let mut a = raw("France", "2021-03-01");
        a.total_cases = Some(100.0);
        a.total_deaths = Some(10.0);
        a.population = Some(1_000_000.0);
        a.people_fully_vaccinated = Some(500_000.0);

        let cleaned = clean_records(vec![a]);
        let r = &cleaned[0];
        assert_eq!(r.cases_per_million, Some(100.0));
        assert_eq!(r.deaths_per_million, Some(10.0));
        assert_eq!(r.case_fatality_rate, Some(10.0));
        assert_eq!(r.pct_fully_vaccinated, Some(50.0));
    }

    #[test]
    fn test_negative_count_leaves_rate_absent() {
        // Upstream publishes occasional negative daily corrections; a
        // negative rate would violate the non-negative-or-absent rule.
        assert_eq!(per_million(-3.0, 1_000_000.0), None);
        assert_eq!(percent_of(-1.0, 100.0), None);
    }

    #[test]
    fn test_per_million_never_divides_by_zero() {
        assert_eq!(per_million(10.0, 0.0), None);
        assert_eq!(percent_of(10.0, 0.0), None);
    }
}
