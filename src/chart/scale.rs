//! Time and linear scales with tick generation.
//!
//! Dates are mapped through their day number (days since 0001-01-01, the
//! `num_days_from_ce` convention) so chart coordinates are plain `f64`s.

use chrono::{Datelike, NaiveDate};

/// Day number used as the x coordinate of a date.
pub fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Inverse of `day_number`, rounding to the nearest whole day.
pub fn date_from_day_number(value: f64) -> Option<NaiveDate> {
    if !value.is_finite() || value.abs() > i32::MAX as f64 {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
}

/// Maps a date extent onto a pixel (or cell) range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: Option<(NaiveDate, NaiveDate)>,
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: Option<(NaiveDate, NaiveDate)>, range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Position of `date` in the range. A missing or zero-width domain maps to the range midpoint.
    pub fn scale(&self, date: NaiveDate) -> f64 {
        let (r0, r1) = self.range;
        match self.domain {
            Some((d0, d1)) if d1 > d0 => {
                let span = day_number(d1) - day_number(d0);
                r0 + (day_number(date) - day_number(d0)) / span * (r1 - r0)
            }
            _ => (r0 + r1) / 2.0,
        }
    }

    /// Date under position `px`, clamped to the domain. `None` when the domain is empty.
    pub fn invert(&self, px: f64) -> Option<NaiveDate> {
        let (d0, d1) = self.domain?;
        let (r0, r1) = self.range;
        if d1 <= d0 || r1 == r0 || !px.is_finite() {
            return Some(d0);
        }
        let u = ((px - r0) / (r1 - r0)).clamp(0.0, 1.0);
        let day = day_number(d0) + u * (day_number(d1) - day_number(d0));
        date_from_day_number(day)
    }

    /// Calendar-aligned ticks, at most roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<NaiveDate> {
        let Some((d0, d1)) = self.domain else {
            return Vec::new();
        };
        if d1 <= d0 {
            return vec![d0];
        }
        let count = count.max(1) as i64;
        let days = (d1 - d0).num_days();

        const DAY_STEPS: [i64; 4] = [1, 2, 7, 14];
        const MONTH_STEPS: [i64; 7] = [1, 2, 3, 6, 12, 24, 60];

        if days / count < 28 {
            if let Some(step) = DAY_STEPS.iter().copied().find(|s| days / s <= count) {
                let first = d0.num_days_from_ce() as i64;
                let last = d1.num_days_from_ce() as i64;
                return (first..=last)
                    .filter(|d| d % step == 0)
                    .filter_map(|d| NaiveDate::from_num_days_from_ce_opt(d as i32))
                    .collect();
            }
        }

        let months = month_index(d1) - month_index(d0);
        let step = MONTH_STEPS
            .iter()
            .copied()
            .find(|s| months / s <= count)
            .unwrap_or_else(|| (months / count).max(1));

        let mut out = Vec::new();
        for m in month_index(d0)..=month_index(d1) {
            if m % step != 0 {
                continue;
            }
            let Some(date) = month_start(m) else { continue };
            if date >= d0 && date <= d1 {
                out.push(date);
            }
        }
        out
    }
}

fn month_index(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

fn month_start(index: i64) -> Option<NaiveDate> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Maps a numeric domain onto a pixel (or cell) range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 || !(d1 - d0).is_finite() {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

/// Round-number ticks (1, 2, 5 × 10ⁿ steps) covering `[start, stop]`.
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !(start.is_finite() && stop.is_finite()) {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let (lo, hi) = if start < stop { (start, stop) } else { (stop, start) };
    let (i0, i1, step) = match tick_increment(lo, hi, count.max(1)) {
        TickIncrement::Step(step) => ((lo / step).ceil(), (hi / step).floor(), step),
        TickIncrement::Inverse(inv) => ((lo * inv).ceil(), (hi * inv).floor(), -inv),
    };
    if !(i0.is_finite() && i1.is_finite()) || i1 < i0 {
        return Vec::new();
    }

    (i0 as i64..=i1 as i64)
        .map(|i| if step > 0.0 { i as f64 * step } else { i as f64 / -step })
        .collect()
}

/// Tick spacing. Sub-unit steps are kept as their (integral) inverse so ticks stay exact.
enum TickIncrement {
    Step(f64),
    Inverse(f64),
}

fn tick_increment(lo: f64, hi: f64, count: usize) -> TickIncrement {
    let raw = (hi - lo) / count as f64;
    let exponent = raw.log10().floor() as i32;
    let error = if exponent >= 0 {
        raw / 10f64.powi(exponent)
    } else {
        raw * 10f64.powi(-exponent)
    };
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if exponent >= 0 {
        TickIncrement::Step(factor * 10f64.powi(exponent))
    } else {
        TickIncrement::Inverse(10f64.powi(-exponent) / factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn time_scale_maps_extent_onto_range() {
        let scale = TimeScale::new(Some((d(2024, 1, 1), d(2024, 2, 1))), (0.0, 310.0));
        assert!((scale.scale(d(2024, 1, 1)) - 0.0).abs() < 1e-9);
        assert!((scale.scale(d(2024, 2, 1)) - 310.0).abs() < 1e-9);
        assert!((scale.scale(d(2024, 1, 11)) - 100.0).abs() < 1e-9);
        assert_eq!(scale.invert(100.0), Some(d(2024, 1, 11)));
        assert_eq!(scale.invert(-50.0), Some(d(2024, 1, 1)));
    }

    #[test]
    fn degenerate_time_domains_do_not_panic() {
        let empty = TimeScale::new(None, (0.0, 100.0));
        assert_eq!(empty.scale(d(2024, 1, 1)), 50.0);
        assert_eq!(empty.invert(10.0), None);
        assert!(empty.ticks(5).is_empty());

        let single = TimeScale::new(Some((d(2024, 1, 1), d(2024, 1, 1))), (0.0, 100.0));
        assert_eq!(single.scale(d(2024, 1, 1)), 50.0);
        assert_eq!(single.invert(90.0), Some(d(2024, 1, 1)));
        assert_eq!(single.ticks(5), vec![d(2024, 1, 1)]);
    }

    #[test]
    fn month_ticks_are_calendar_aligned() {
        let scale = TimeScale::new(Some((d(2023, 1, 15), d(2024, 1, 15))), (0.0, 1.0));
        let ticks = scale.ticks(5);
        assert_eq!(ticks.first(), Some(&d(2023, 4, 1)));
        assert!(ticks.iter().all(|t| t.day() == 1 && t.month0() % 3 == 0));
        assert!(ticks.len() <= 5);
    }

    #[test]
    fn short_extents_use_day_ticks() {
        let scale = TimeScale::new(Some((d(2024, 1, 1), d(2024, 1, 5))), (0.0, 1.0));
        assert_eq!(scale.ticks(10).len(), 5);
    }

    #[test]
    fn nice_ticks_match_round_steps() {
        assert_eq!(nice_ticks(0.0, 57.0, 10), vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0]);
        assert_eq!(nice_ticks(0.0, 57.0, 5), vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(nice_ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(nice_ticks(0.0, 0.0, 5), vec![0.0]);
        assert!(nice_ticks(0.0, f64::NAN, 5).is_empty());
    }

    #[test]
    fn linear_scale_maps_and_flips() {
        let y = LinearScale::new((0.0, 50.0), (200.0, 0.0));
        assert_eq!(y.scale(25.0), 100.0);
        assert_eq!(y.scale(50.0), 0.0);
        let flat = LinearScale::new((0.0, 0.0), (200.0, 0.0));
        assert_eq!(flat.scale(3.0), 100.0);
    }
}
