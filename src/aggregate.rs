//! Aggregation of cleaned records into the tables the renderer and the
//! summary consume.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::records::CleanRecord;

/// Worldwide totals for a single date, summed across countries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GlobalPoint {
    pub date: NaiveDate,
    pub new_cases: f64,
    pub new_deaths: f64,
    pub new_vaccinations: f64,
    pub total_cases: f64,
    pub total_deaths: f64,
}

/// Sums cleaned records per date into a global time series, one point per
/// distinct date, ascending.
pub fn global_time_series(records: &[CleanRecord]) -> Vec<GlobalPoint> {
    let mut by_date: BTreeMap<NaiveDate, GlobalPoint> = BTreeMap::new();

    for r in records {
        let point = by_date.entry(r.date).or_insert_with(|| GlobalPoint {
            date: r.date,
            ..GlobalPoint::default()
        });
        point.new_cases += r.new_cases;
        point.new_deaths += r.new_deaths;
        point.new_vaccinations += r.new_vaccinations;
        point.total_cases += r.total_cases;
        point.total_deaths += r.total_deaths;
    }

    by_date.into_values().collect()
}

/// Latest record per country, exactly one row per distinct country.
///
/// When several rows share a country's maximum date, the one appearing
/// last in input order wins (`>=` on replacement). Output is sorted by
/// country name so downstream artifacts are deterministic.
pub fn country_snapshot(records: &[CleanRecord]) -> Vec<CleanRecord> {
    let mut latest: HashMap<&str, &CleanRecord> = HashMap::new();

    for r in records {
        latest
            .entry(r.location.as_str())
            .and_modify(|kept| {
                if r.date >= kept.date {
                    *kept = r;
                }
            })
            .or_insert(r);
    }

    let mut rows: Vec<CleanRecord> = latest.into_values().cloned().collect();
    rows.sort_by(|a, b| a.location.cmp(&b.location));
    rows
}

/// Trailing mean over up to `window` points, one output value per input
/// value. The first `window - 1` outputs average what is available so the
/// smoothed series has no gaps.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return values.to_vec();
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        let n = (i + 1).min(window);
        out.push(sum / n as f64);
    }
    out
}
