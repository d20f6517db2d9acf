//! SVG chart files rendered with Plotters' SVG backend.
//!
//! Layout follows `ChartGeometry`: a title above the plot area, the plot area
//! inside the margins, dashed grid lines beneath the data, confidence bands at
//! `band_opacity`, trend lines on top, and rotated month labels below the x axis.
//! Axes and tick labels come from the Plotters mesh, placed at the chart's own ticks.

use std::fs;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::chart::{ChartSpec, Rgb, day_number};
use crate::domain::ChartGeometry;
use crate::error::AppError;
use crate::layout::GridView;

type DrawResult = Result<(), Box<dyn std::error::Error>>;

const FONT: &str = "sans-serif";
const AXIS_COLOR: RGBColor = BLACK;

/// Render one chart to an SVG document.
pub fn render_chart_svg(spec: &ChartSpec, geometry: &ChartGeometry) -> Result<String, AppError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (geometry.width, geometry.height)).into_drawing_area();
        draw_chart(&root, spec, geometry)
            .map_err(|e| AppError::render(format!("Failed to draw chart '{}': {e}", spec.title)))?;
        root.present()
            .map_err(|e| AppError::render(format!("Failed to finish chart '{}': {e}", spec.title)))?;
    }
    Ok(svg)
}

/// Write one SVG per chart in grid order. Returns the written paths.
pub fn write_grid_svgs(dir: &Path, grid: &GridView, geometry: &ChartGeometry) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir).map_err(|e| {
        AppError::new(2, format!("Failed to create output dir '{}': {e}", dir.display()))
    })?;

    let mut written = Vec::with_capacity(grid.charts.len());
    for (idx, chart) in grid.charts.iter().enumerate() {
        let path = dir.join(format!("{:02}-{}.svg", idx + 1, slug(&chart.title)));
        let svg = render_chart_svg(chart, geometry)?;
        fs::write(&path, svg)
            .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
        written.push(path);
    }
    Ok(written)
}

fn draw_chart(root: &DrawingArea<SVGBackend<'_>, Shift>, spec: &ChartSpec, geometry: &ChartGeometry) -> DrawResult {
    root.fill(&WHITE)?;

    let title_style = TextStyle::from((FONT, 16).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    root.draw(&Text::new(
        spec.title.clone(),
        ((geometry.width / 2) as i32, (geometry.margin_top / 2) as i32),
        title_style,
    ))?;

    // The label areas take the bottom/left margins, so the plot area is the same inner rect.
    let ([x0, x1], [y0, y1]) = spec.plot_bounds();
    let x_keys: Vec<f64> = spec.x_ticks.iter().map(|t| day_number(t.date)).collect();
    let mut chart = ChartBuilder::on(root)
        .margin_top(geometry.margin_top)
        .margin_right(geometry.margin_right)
        .x_label_area_size(geometry.margin_bottom)
        .y_label_area_size(geometry.margin_left)
        .build_cartesian_2d(
            (x0..x1).with_key_points(x_keys),
            (y0..y1).with_key_points(spec.y_ticks.clone()),
        )?;

    let x_label = |v: &f64| {
        spec.x_ticks
            .iter()
            .find(|t| day_number(t.date) == *v)
            .map(|t| t.label.clone())
            .unwrap_or_default()
    };
    let y_label = |v: &f64| format_y_tick(*v);

    // Mesh lines can't be dashed; the grid is drawn below as dashed series.
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .label_style((FONT, 10))
        .x_label_style((FONT, 10).into_font().transform(FontTransform::Rotate270))
        .axis_style(AXIS_COLOR)
        .draw()?;

    // Grid beneath every data layer.
    let grid_style = to_rgb(spec.grid.color).stroke_width(1);
    let (dash, gap) = spec.grid.dash;
    for tick in &spec.x_ticks {
        let x = day_number(tick.date);
        chart.draw_series(DashedLineSeries::new(vec![(x, y0), (x, y1)], dash, gap, grid_style))?;
    }
    for &y in &spec.y_ticks {
        chart.draw_series(DashedLineSeries::new(vec![(x0, y), (x1, y)], dash, gap, grid_style))?;
    }

    for series in &spec.series {
        let color = to_rgb(series.color);
        chart.draw_series(
            series
                .band_polygons()
                .into_iter()
                .map(|outline| Polygon::new(outline, color.mix(series.band_opacity).filled())),
        )?;
        for segment in series.line_segments() {
            chart.draw_series(LineSeries::new(segment, color.stroke_width(series.line_width)))?;
        }
    }

    Ok(())
}

fn to_rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn format_y_tick(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

/// File-name friendly version of an institution name.
fn slug(title: &str) -> String {
    let mut out = String::new();
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "chart".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ColorMap;
    use crate::domain::Observation;
    use chrono::NaiveDate;

    fn observations() -> Vec<Observation> {
        let row = |date: &str, answer: &str, pct: f64| Observation {
            institution: "Joe Biden".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            answer: answer.to_string(),
            pct_estimate: pct,
            lo: pct - 3.0,
            hi: pct + 3.0,
        };
        vec![
            row("2024-01-01", "Approve", 40.0),
            row("2024-03-01", "Approve", 41.0),
            row("2024-01-01", "Disapprove", 55.0),
            row("2024-03-01", "Disapprove", 54.0),
        ]
    }

    #[test]
    fn svg_contains_title_labels_and_series_colors() {
        let spec = ChartSpec::build(&observations(), "Joe Biden", &ColorMap::default());
        let svg = render_chart_svg(&spec, &ChartGeometry::default()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Joe Biden"));
        assert!(svg.contains("Jan 2024"));
        assert!(svg.to_uppercase().contains("#4CAF50"));
        assert!(svg.to_uppercase().contains("#E91E63"));
    }

    #[test]
    fn empty_chart_still_renders() {
        let spec = ChartSpec::build(&[], "Nobody", &ColorMap::default());
        let svg = render_chart_svg(&spec, &ChartGeometry::default()).unwrap();
        assert!(svg.contains("Nobody"));
    }

    #[test]
    fn axis_labels_come_from_the_chart_ticks() {
        let spec = ChartSpec::build(&observations(), "Joe Biden", &ColorMap::default());
        let svg = render_chart_svg(&spec, &ChartGeometry::default()).unwrap();
        for tick in &spec.y_ticks {
            assert!(svg.contains(&format!(">{}<", format_y_tick(*tick))), "missing y label {tick}");
        }
    }

    #[test]
    fn y_tick_labels_drop_trailing_zeros() {
        assert_eq!(format_y_tick(50.0), "50");
        assert_eq!(format_y_tick(2.5), "2.5");
    }

    #[test]
    fn slugs_are_file_friendly() {
        assert_eq!(slug("Joe Biden"), "joe-biden");
        assert_eq!(slug("U.S. Supreme Court"), "u-s-supreme-court");
        assert_eq!(slug("???"), "chart");
    }
}
