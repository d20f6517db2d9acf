//! Declarative chart descriptions.
//!
//! A `ChartSpec` captures everything needed to draw one institution's approval
//! chart: domains, ticks, grid style, and the per-answer series. Backends (the
//! terminal widget and the SVG writer) only consume it, so everything about
//! *what* is drawn can be tested without a rendering surface.
//!
//! Coordinates handed to backends use the day number of a date on the x axis
//! (see `scale::day_number`) and percentages on the y axis.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Observation, group_by_answer, subset};

pub mod color;
pub mod scale;

pub use color::{ColorMap, Rgb};
pub use scale::{LinearScale, TimeScale, day_number, nice_ticks};

/// Tick label format on the x axis.
pub const X_TICK_FORMAT: &str = "%b %Y";
/// Date format inside the hover tooltip.
pub const TOOLTIP_DATE_FORMAT: &str = "%b %d, %Y";
/// Tick labels on the x axis are rotated by this many degrees.
pub const X_LABEL_ROTATION: i16 = -45;
/// Opacity of the confidence band fill.
pub const BAND_OPACITY: f64 = 0.2;
/// Stroke width of the trend line.
pub const LINE_WIDTH: u32 = 2;

const DEFAULT_X_TICKS: usize = 10;
const DEFAULT_Y_TICKS: usize = 10;

/// One labelled tick on the time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateTick {
    pub date: NaiveDate,
    pub label: String,
}

/// Background grid lines. They are drawn before any data layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridStyle {
    pub color: Rgb,
    /// Dash length and gap, in pixels.
    pub dash: (u32, u32),
    pub stroke_width: f64,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            color: Rgb(0x80, 0x80, 0x80),
            dash: (3, 3),
            stroke_width: 0.5,
        }
    }
}

/// One answer category: a confidence band plus a trend line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSpec {
    pub answer: String,
    pub color: Rgb,
    pub band_opacity: f64,
    pub line_width: u32,
    /// Sorted by date.
    pub points: Vec<Observation>,
}

impl SeriesSpec {
    /// Trend-line polylines as `(day_number, pct_estimate)`; a non-finite estimate breaks the line.
    pub fn line_segments(&self) -> Vec<Vec<(f64, f64)>> {
        split_runs(&self.points, |o| o.pct_estimate.is_finite())
            .into_iter()
            .map(|run| run.iter().map(|o| (day_number(o.date), o.pct_estimate)).collect())
            .collect()
    }

    /// Band outlines: `hi` left to right, then `lo` right to left. A non-finite bound breaks the band.
    pub fn band_polygons(&self) -> Vec<Vec<(f64, f64)>> {
        split_runs(&self.points, |o| o.lo.is_finite() && o.hi.is_finite())
            .into_iter()
            .map(|run| {
                let upper = run.iter().map(|o| (day_number(o.date), o.hi));
                let lower = run.iter().rev().map(|o| (day_number(o.date), o.lo));
                upper.chain(lower).collect()
            })
            .collect()
    }

    /// The observation closest in time to `hovered`; the first one wins ties.
    pub fn nearest(&self, hovered: NaiveDate) -> Option<&Observation> {
        let mut best: Option<(&Observation, i64)> = None;
        for obs in &self.points {
            let distance = (obs.date - hovered).num_days().abs();
            match best {
                Some((_, d)) if distance >= d => {}
                _ => best = Some((obs, distance)),
            }
        }
        best.map(|(obs, _)| obs)
    }
}

fn split_runs<F>(points: &[Observation], keep: F) -> Vec<&[Observation]>
where
    F: Fn(&Observation) -> bool,
{
    points
        .split(|o| !keep(o))
        .filter(|run| !run.is_empty())
        .collect()
}

/// One tooltip block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipEntry {
    pub answer: String,
    pub color: Rgb,
    pub date: NaiveDate,
    pub pct_estimate: f64,
}

impl TooltipEntry {
    pub fn date_label(&self) -> String {
        self.date.format(TOOLTIP_DATE_FORMAT).to_string()
    }

    pub fn value_label(&self) -> String {
        if self.pct_estimate.is_finite() {
            format!("{:.1}%", self.pct_estimate)
        } else {
            "n/a".to_string()
        }
    }
}

/// Complete description of one institution's chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    /// Earliest and latest date; `None` when the institution has no observations.
    pub x_domain: Option<(NaiveDate, NaiveDate)>,
    /// Always `[0, max(hi)]` across every answer.
    pub y_domain: (f64, f64),
    pub x_ticks: Vec<DateTick>,
    pub y_ticks: Vec<f64>,
    pub x_label_rotation: i16,
    pub grid: GridStyle,
    pub series: Vec<SeriesSpec>,
}

impl ChartSpec {
    /// Describe the chart for `institution` from the full observation list.
    ///
    /// An institution with no observations yields a titled chart with no series.
    pub fn build(observations: &[Observation], institution: &str, colors: &ColorMap) -> Self {
        let rows = subset(observations, institution);

        let x_domain = rows
            .iter()
            .map(|o| o.date)
            .min()
            .zip(rows.iter().map(|o| o.date).max());
        let y_max = rows
            .iter()
            .map(|o| o.hi)
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            .unwrap_or(0.0);
        let y_domain = (0.0, y_max);

        let x_ticks = TimeScale::new(x_domain, (0.0, 1.0))
            .ticks(DEFAULT_X_TICKS)
            .into_iter()
            .map(|date| DateTick {
                date,
                label: date.format(X_TICK_FORMAT).to_string(),
            })
            .collect();
        let y_ticks = nice_ticks(y_domain.0, y_domain.1, DEFAULT_Y_TICKS);

        let series = group_by_answer(&rows)
            .into_iter()
            .map(|s| SeriesSpec {
                color: colors.color(&s.answer),
                answer: s.answer,
                band_opacity: BAND_OPACITY,
                line_width: LINE_WIDTH,
                points: s.points,
            })
            .collect();

        Self {
            title: institution.to_string(),
            x_domain,
            y_domain,
            x_ticks,
            y_ticks,
            x_label_rotation: X_LABEL_ROTATION,
            grid: GridStyle::default(),
            series,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn time_scale(&self, range: (f64, f64)) -> TimeScale {
        TimeScale::new(self.x_domain, range)
    }

    pub fn y_scale(&self, range: (f64, f64)) -> LinearScale {
        LinearScale::new(self.y_domain, range)
    }

    /// Tooltip content for a hovered date: the nearest observation of every series.
    pub fn tooltip(&self, hovered: NaiveDate) -> Vec<TooltipEntry> {
        self.series
            .iter()
            .filter_map(|s| {
                s.nearest(hovered).map(|obs| TooltipEntry {
                    answer: s.answer.clone(),
                    color: s.color,
                    date: obs.date,
                    pct_estimate: obs.pct_estimate,
                })
            })
            .collect()
    }

    /// Resolve a pointer position `px` inside a plot of the given horizontal range.
    pub fn hover_at(&self, px: f64, range: (f64, f64)) -> Option<Hover> {
        let date = self.time_scale(range).invert(px)?;
        Some(Hover {
            date,
            entries: self.tooltip(date),
        })
    }

    /// Draw-ready bounds for backends that cannot handle an empty or zero-width domain.
    pub fn plot_bounds(&self) -> ([f64; 2], [f64; 2]) {
        let (mut x0, mut x1) = match self.x_domain {
            Some((d0, d1)) => (day_number(d0), day_number(d1)),
            None => (0.0, 1.0),
        };
        if x1 <= x0 {
            x0 -= 1.0;
            x1 += 1.0;
        }
        let (y0, mut y1) = self.y_domain;
        if !(y1.is_finite() && y1 > y0) {
            y1 = y0 + 1.0;
        }
        ([x0, x1], [y0, y1])
    }
}

/// Crosshair position plus tooltip entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Hover {
    pub date: NaiveDate,
    pub entries: Vec<TooltipEntry>,
}
