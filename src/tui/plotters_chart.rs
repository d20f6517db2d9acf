//! Plotters-powered approval chart widget for Ratatui.
//!
//! The widget covers the plot area only: tick labels, legend, and title are
//! drawn by the caller with plain Ratatui widgets around it. Because Plotters
//! gets the whole rect with no margins, terminal column `area.x + i` maps to
//! `i` in the chart's time scale, which is what pointer hit-testing relies on.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::NaiveDate;
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TermColor, Style},
    widgets::Widget,
};

use crate::chart::{ChartSpec, Rgb, day_number};

/// Terminal cells can't do transparency; bands are blended toward the (black)
/// background instead, never dimmer than this.
const MIN_BAND_INTENSITY: f64 = 0.35;

/// A render-only view of one `ChartSpec`.
pub struct ApprovalChart<'a> {
    pub spec: &'a ChartSpec,
    /// Crosshair x position as a day number.
    pub crosshair: Option<f64>,
    /// Dates for vertical grid lines; the caller labels the same dates.
    pub x_ticks: &'a [NaiveDate],
    /// Y values for horizontal grid lines.
    pub y_ticks: &'a [f64],
}

impl<'a> Widget for ApprovalChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 8 || area.height < 3 {
            buf.set_string(area.x, area.y, "too small", Style::default().fg(TermColor::Yellow));
            return;
        }

        let ([x0, x1], [y0, y1]) = self.spec.plot_bounds();
        let spec = self.spec;
        let crosshair = self.crosshair;
        let x_ticks = self.x_ticks;
        let y_ticks = self.y_ticks;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(0)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Grid lines sit beneath every data layer. Dashes don't survive
            // terminal resolution, so a dim solid line stands in for them.
            let grid = RGBColor(60, 60, 60);
            for &date in x_ticks {
                let x = day_number(date);
                chart.draw_series(LineSeries::new(vec![(x, y0), (x, y1)], &grid))?;
            }
            for &y in y_ticks {
                chart.draw_series(LineSeries::new(vec![(x0, y), (x1, y)], &grid))?;
            }

            // Axes.
            chart.draw_series(LineSeries::new(vec![(x0, y0), (x1, y0)], &WHITE))?;
            chart.draw_series(LineSeries::new(vec![(x0, y0), (x0, y1)], &WHITE))?;

            for series in &spec.series {
                let band = blend(series.color, series.band_opacity.max(MIN_BAND_INTENSITY));
                chart.draw_series(
                    series
                        .band_polygons()
                        .into_iter()
                        .map(|outline| Polygon::new(outline, band.filled())),
                )?;
            }
            for series in &spec.series {
                let line = to_rgb(series.color);
                for segment in series.line_segments() {
                    chart.draw_series(LineSeries::new(segment, &line))?;
                }
            }

            if let Some(x) = crosshair {
                chart.draw_series(LineSeries::new(vec![(x, y0), (x, y1)], &WHITE))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

pub fn to_rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn blend(c: Rgb, intensity: f64) -> RGBColor {
    let scale = |v: u8| (v as f64 * intensity.clamp(0.0, 1.0)).round() as u8;
    RGBColor(scale(c.0), scale(c.1), scale(c.2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ColorMap;
    use crate::domain::Observation;

    #[test]
    fn band_fill_uses_the_plotters_color_trait() {
        let style = blend(Rgb(76, 175, 80), 0.5).filled();
        assert!(style.filled);
        assert_eq!(to_rgb(Rgb(1, 2, 3)), RGBColor(1, 2, 3));
    }

    #[test]
    fn blend_darkens_toward_black() {
        let c = blend(Rgb(200, 100, 0), 0.5);
        assert_eq!((c.0, c.1, c.2), (100, 50, 0));
    }

    #[test]
    fn renders_into_a_buffer_without_panicking() {
        let rows = vec![
            Observation {
                institution: "A".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                answer: "Approve".to_string(),
                pct_estimate: 50.0,
                lo: 45.0,
                hi: 55.0,
            },
            Observation {
                institution: "A".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                answer: "Approve".to_string(),
                pct_estimate: f64::NAN,
                lo: 47.0,
                hi: 57.0,
            },
        ];
        let spec = ChartSpec::build(&rows, "A", &ColorMap::default());
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        ApprovalChart {
            spec: &spec,
            crosshair: Some(day_number(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())),
            x_ticks: &[NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()],
            y_ticks: &[0.0, 25.0, 50.0],
        }
        .render(area, &mut buf);

        let empty = ChartSpec::build(&[], "B", &ColorMap::default());
        ApprovalChart {
            spec: &empty,
            crosshair: None,
            x_ticks: &[],
            y_ticks: &[],
        }
        .render(area, &mut buf);
    }
}
