//! Static chart rendering with plotters.
//!
//! Two artifact families: a three-panel global trends figure and one
//! top-N country comparison bar chart per metric. Rendering never mutates
//! the data it is handed.

use std::ops::Range;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::aggregate::{GlobalPoint, rolling_mean};
use crate::records::CleanRecord;

pub const GLOBAL_TRENDS_FILE: &str = "global_trends.png";

/// Smoothing window for the daily series, in days.
const TREND_WINDOW: usize = 7;

const CASES_COLOR: RGBColor = RGBColor(31, 119, 180);
const DEATHS_COLOR: RGBColor = RGBColor(214, 39, 40);
const VACCINATIONS_COLOR: RGBColor = RGBColor(44, 160, 44);
const BAR_COLOR: RGBColor = RGBColor(38, 130, 142);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("global time series is empty, nothing to plot")]
    EmptySeries,
    #[error("no `{metric}` values available to plot")]
    NoData { metric: &'static str },
    #[error("chart backend failure: {0}")]
    Backend(String),
}

fn backend<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Backend(e.to_string())
}

/// A snapshot column countries can be ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonMetric {
    CasesPerMillion,
    DeathsPerMillion,
    CaseFatalityRate,
    PctFullyVaccinated,
}

impl ComparisonMetric {
    pub const ALL: [ComparisonMetric; 4] = [
        ComparisonMetric::CasesPerMillion,
        ComparisonMetric::DeathsPerMillion,
        ComparisonMetric::CaseFatalityRate,
        ComparisonMetric::PctFullyVaccinated,
    ];

    /// Column name, also used in output file names.
    pub fn key(self) -> &'static str {
        match self {
            ComparisonMetric::CasesPerMillion => "cases_per_million",
            ComparisonMetric::DeathsPerMillion => "deaths_per_million",
            ComparisonMetric::CaseFatalityRate => "case_fatality_rate",
            ComparisonMetric::PctFullyVaccinated => "pct_fully_vaccinated",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComparisonMetric::CasesPerMillion => "Cases per Million",
            ComparisonMetric::DeathsPerMillion => "Deaths per Million",
            ComparisonMetric::CaseFatalityRate => "Case Fatality Rate",
            ComparisonMetric::PctFullyVaccinated => "Fully Vaccinated",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            ComparisonMetric::CasesPerMillion | ComparisonMetric::DeathsPerMillion => "per million",
            ComparisonMetric::CaseFatalityRate | ComparisonMetric::PctFullyVaccinated => "%",
        }
    }

    pub fn value(self, record: &CleanRecord) -> Option<f64> {
        match self {
            ComparisonMetric::CasesPerMillion => record.cases_per_million,
            ComparisonMetric::DeathsPerMillion => record.deaths_per_million,
            ComparisonMetric::CaseFatalityRate => record.case_fatality_rate,
            ComparisonMetric::PctFullyVaccinated => record.pct_fully_vaccinated,
        }
    }
}

/// File path for a metric's comparison chart under `dir`.
pub fn comparison_path(dir: &Path, metric: ComparisonMetric) -> PathBuf {
    dir.join(format!("country_comparison_{}.png", metric.key()))
}

/// Renders the three-panel global trends figure (daily new cases, deaths,
/// vaccinations as 7-day rolling means) to `path`.
///
/// # Errors
///
/// [`RenderError::EmptySeries`] when the series has no points;
/// [`RenderError::Backend`] on any drawing failure.
pub fn render_global_trends(series: &[GlobalPoint], path: &Path) -> Result<(), RenderError> {
    if series.is_empty() {
        return Err(RenderError::EmptySeries);
    }

    let root = BitMapBackend::new(path, (1400, 1500)).into_drawing_area();
    root.fill(&WHITE).map_err(backend)?;
    let panels = root.split_evenly((3, 1));

    let dates: Vec<NaiveDate> = series.iter().map(|p| p.date).collect();
    let first = dates[0];
    // A one-day series still needs a non-degenerate axis range.
    let last = dates[dates.len() - 1].max(first + chrono::Duration::days(1));

    let panel_specs: [(&str, &RGBColor, Vec<f64>); 3] = [
        (
            "Global Daily New Cases (7-day average)",
            &CASES_COLOR,
            series.iter().map(|p| p.new_cases).collect(),
        ),
        (
            "Global Daily New Deaths (7-day average)",
            &DEATHS_COLOR,
            series.iter().map(|p| p.new_deaths).collect(),
        ),
        (
            "Global Daily Vaccinations (7-day average)",
            &VACCINATIONS_COLOR,
            series.iter().map(|p| p.new_vaccinations).collect(),
        ),
    ];

    for (panel, (caption, color, values)) in panels.iter().zip(panel_specs) {
        let smoothed = rolling_mean(&values, TREND_WINDOW);
        draw_trend_panel(panel, caption, color, first..last, &dates, &smoothed)?;
    }

    root.present().map_err(backend)?;
    info!(path = %path.display(), "global trends figure written");
    Ok(())
}

fn draw_trend_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    caption: &str,
    color: &RGBColor,
    x_range: Range<NaiveDate>,
    dates: &[NaiveDate],
    values: &[f64],
) -> Result<(), RenderError> {
    let y_max = values.iter().cloned().fold(0.0, f64::max).max(1.0) * 1.05;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, 0f64..y_max)
        .map_err(backend)?;

    chart
        .configure_mesh()
        .x_labels(10)
        .y_labels(6)
        .x_label_formatter(&|d| d.format("%Y-%m").to_string())
        .draw()
        .map_err(backend)?;

    chart
        .draw_series(LineSeries::new(
            dates.iter().cloned().zip(values.iter().cloned()),
            color.stroke_width(2),
        ))
        .map_err(backend)?;

    Ok(())
}

/// Renders a horizontal top-`top_n` bar chart of `metric` across the
/// country snapshot, largest value at the top, value labels in the bars.
///
/// # Errors
///
/// [`RenderError::NoData`] when no country carries the metric;
/// [`RenderError::Backend`] on any drawing failure.
pub fn render_country_comparison(
    snapshot: &[CleanRecord],
    metric: ComparisonMetric,
    top_n: usize,
    path: &Path,
) -> Result<(), RenderError> {
    let mut rows: Vec<(&str, f64)> = snapshot
        .iter()
        .filter_map(|r| metric.value(r).map(|v| (r.location.as_str(), v)))
        .collect();

    if rows.is_empty() {
        return Err(RenderError::NoData {
            metric: metric.key(),
        });
    }

    rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    rows.truncate(top_n);
    // The y axis grows upward, so ascending order puts the largest bar on
    // top as in the reference layout.
    rows.reverse();

    let x_max = rows.iter().map(|r| r.1).fold(0.0, f64::max).max(1.0) * 1.1;
    let n = rows.len() as i32;

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(backend)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Top {} Countries by {}", rows.len(), metric.label()),
            ("sans-serif", 26),
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(170)
        .build_cartesian_2d(0f64..x_max, 0i32..n)
        .map_err(backend)?;

    let label_for = |idx: &i32| {
        rows.get(*idx as usize)
            .map(|(name, _)| (*name).to_string())
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(rows.len() + 1)
        .y_label_formatter(&label_for)
        .x_desc(format!("{} ({})", metric.label(), metric.unit()))
        .y_desc("Country")
        .draw()
        .map_err(backend)?;

    chart
        .draw_series(rows.iter().enumerate().map(|(i, (_, value))| {
            Rectangle::new(
                [(0.0, i as i32), (*value, i as i32 + 1)],
                BAR_COLOR.mix(0.85).filled(),
            )
        }))
        .map_err(backend)?;

    // Value annotations at the end of each bar.
    chart
        .draw_series(rows.iter().enumerate().map(|(i, (_, value))| {
            Text::new(
                format!("{value:.1}"),
                (*value, i as i32),
                ("sans-serif", 16).into_font().color(&BLACK),
            )
        }))
        .map_err(backend)?;

    root.present().map_err(backend)?;
    info!(path = %path.display(), metric = metric.key(), "comparison chart written");
    Ok(())
}
