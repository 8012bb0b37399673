//! Domain to range mappers for the charts.
//!
//! Positions are plain `f64` pixels. The drawing layer decides where the range
//! sits on screen, these scales only map values back and forth.

use chrono::{NaiveDate, NaiveDateTime};

use crate::utils::{
    datetime::{date_to_days, datetime_from_days, datetime_to_days},
    stats::extent,
};

const NICE_TICKS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    linear: LinearScale,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Domain fitted to the min/max of the values, NaN ignored. `None` when no
    /// value is usable.
    pub fn from_extent(values: impl IntoIterator<Item = f64>, range: (f64, f64)) -> Option<Self> {
        extent(values).map(|domain| Self::new(domain, range))
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn apply(&self, value: f64) -> f64 {
        interpolate(self.range, normalize(self.domain, value))
    }

    pub fn invert(&self, position: f64) -> f64 {
        interpolate(self.domain, normalize(self.range, position))
    }

    /// Extends the domain outward to round tick values.
    pub fn nice(mut self) -> Self {
        let (d0, d1) = self.domain;
        if !d0.is_finite() || !d1.is_finite() || d0 == d1 {
            return self;
        }

        let reversed = d1 < d0;
        let (mut start, mut stop) = if reversed { (d1, d0) } else { (d0, d1) };

        let mut prestep: Option<f64> = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, NICE_TICKS);
            if prestep == Some(step) {
                break;
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = Some(step);
        }

        self.domain = if reversed {
            (stop, start)
        } else {
            (start, stop)
        };
        self
    }
}

impl TimeScale {
    pub fn new(domain: (NaiveDate, NaiveDate), range: (f64, f64)) -> Self {
        Self {
            linear: LinearScale::new((date_to_days(&domain.0), date_to_days(&domain.1)), range),
        }
    }

    /// Scale over a domain already expressed in days, as a plot axis reports it.
    pub fn from_days(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            linear: LinearScale::new(domain, range),
        }
    }

    pub fn from_dates(
        dates: impl IntoIterator<Item = NaiveDate>,
        range: (f64, f64),
    ) -> Option<Self> {
        let mut dates = dates.into_iter();
        let first = dates.next()?;
        let (min, max) = dates.fold((first, first), |(min, max), d| (min.min(d), max.max(d)));

        Some(Self::new((min, max), range))
    }

    pub fn apply(&self, date: &NaiveDate) -> f64 {
        self.linear.apply(date_to_days(date))
    }

    pub fn apply_datetime(&self, datetime: &NaiveDateTime) -> f64 {
        self.linear.apply(datetime_to_days(datetime))
    }

    /// The instant under a position, with sub-day precision.
    pub fn invert(&self, position: f64) -> Option<NaiveDateTime> {
        datetime_from_days(self.linear.invert(position))
    }
}

impl BandScale {
    pub fn new(domain: Vec<String>, range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
        }
    }

    /// Same padding between bands and at both ends.
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self.padding_outer = padding.max(0.0);
        self
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        let (start, stop) = self.ordered_range();

        (stop - start) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Start position of the band for `category`.
    pub fn position(&self, category: &str) -> Option<f64> {
        self.domain
            .iter()
            .position(|c| c == category)
            .map(|i| self.position_at(i))
    }

    /// Category whose band covers `position`, gaps between bands hit nothing.
    pub fn band_at(&self, position: f64) -> Option<&str> {
        let bandwidth = self.bandwidth();
        (0..self.domain.len())
            .find(|&i| {
                let start = self.position_at(i);
                position >= start && position <= start + bandwidth
            })
            .map(|i| self.domain[i].as_str())
    }

    fn ordered_range(&self) -> (f64, f64) {
        let (r0, r1) = self.range;
        if r1 < r0 { (r1, r0) } else { (r0, r1) }
    }

    fn position_at(&self, i: usize) -> f64 {
        let n = self.domain.len();
        let (start, stop) = self.ordered_range();
        let step = self.step();
        let offset = start + (stop - start - step * (n as f64 - self.padding_inner)) * 0.5;

        let index = if self.range.1 < self.range.0 {
            n - 1 - i
        } else {
            i
        };
        offset + step * index as f64
    }
}

fn normalize((a, b): (f64, f64), x: f64) -> f64 {
    let span = b - a;
    if span != 0.0 {
        (x - a) / span
    } else if span.is_nan() {
        f64::NAN
    } else {
        0.5
    }
}

fn interpolate((a, b): (f64, f64), t: f64) -> f64 {
    a + (b - a) * t
}

fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };

    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_linear_apply_invert() {
        let scale = LinearScale::new((0.0, 100.0), (200.0, 20.0));

        assert_eq!(scale.apply(0.0), 200.0);
        assert_eq!(scale.apply(100.0), 20.0);
        assert_eq!(scale.apply(50.0), 110.0);
        assert_eq!(scale.invert(110.0), 50.0);
    }

    #[test]
    fn test_linear_degenerate_domain() {
        let scale = LinearScale::new((5.0, 5.0), (0.0, 10.0));

        assert_eq!(scale.apply(5.0), 5.0);
        assert_eq!(scale.nice(), scale);
    }

    #[test]
    fn test_linear_nice() {
        assert_eq!(
            LinearScale::new((0.201479, 0.996679), (0.0, 1.0))
                .nice()
                .domain(),
            (0.2, 1.0)
        );
        assert_eq!(
            LinearScale::new((1.1, 10.9), (0.0, 1.0)).nice().domain(),
            (1.0, 11.0)
        );
        assert_eq!(
            LinearScale::new((10.9, 1.1), (0.0, 1.0)).nice().domain(),
            (11.0, 1.0)
        );
        assert_eq!(
            LinearScale::new((0.7, 11.001), (0.0, 1.0)).nice().domain(),
            (0.0, 12.0)
        );
        assert_eq!(
            LinearScale::new((123.1, 6.7), (0.0, 1.0)).nice().domain(),
            (130.0, 0.0)
        );
    }

    #[test]
    fn test_linear_from_extent() {
        let scale = LinearScale::from_extent([4.0, f64::NAN, 12.0, 6.0], (0.0, 1.0)).unwrap();

        assert_eq!(scale.domain(), (4.0, 12.0));
        assert!(LinearScale::from_extent([f64::NAN], (0.0, 1.0)).is_none());
    }

    #[test]
    fn test_time_scale() {
        let scale = TimeScale::new((date("2023-01-01"), date("2023-01-03")), (0.0, 200.0));

        assert_eq!(scale.apply(&date("2023-01-02")), 100.0);
        assert_eq!(
            scale.invert(50.0),
            date("2023-01-01").and_hms_opt(12, 0, 0)
        );
        assert_eq!(
            scale.apply_datetime(&date("2023-01-02").and_hms_opt(12, 0, 0).unwrap()),
            150.0
        );
    }

    #[test]
    fn test_time_scale_from_dates() {
        let scale = TimeScale::from_dates(
            [date("2023-01-05"), date("2023-01-01"), date("2023-01-03")],
            (0.0, 40.0),
        )
        .unwrap();

        assert_eq!(scale.apply(&date("2023-01-01")), 0.0);
        assert_eq!(scale.apply(&date("2023-01-05")), 40.0);
        assert!(TimeScale::from_dates([], (0.0, 1.0)).is_none());
    }

    #[test]
    fn test_time_scale_from_days() {
        let d0 = date_to_days(&date("2023-01-01"));
        let scale = TimeScale::from_days((d0, d0 + 4.0), (0.0, 400.0));

        assert_eq!(scale.apply(&date("2023-01-03")), 200.0);
        assert_eq!(scale.invert(100.0), date("2023-01-02").and_hms_opt(0, 0, 0));
    }

    #[test]
    fn test_band_scale() {
        let scale = BandScale::new(
            vec!["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()],
            (0.0, 380.0),
        )
        .padding(0.2);

        // step = 380 / (4 - 0.2 + 0.4) = 380 / 4.2
        let step = 380.0 / 4.2;
        assert!((scale.step() - step).abs() < 1e-9);
        assert!((scale.bandwidth() - step * 0.8).abs() < 1e-9);
        assert!((scale.position("A").unwrap() - step * 0.2).abs() < 1e-9);
        assert!((scale.position("B").unwrap() - step * 1.2).abs() < 1e-9);
        assert_eq!(scale.position("Z"), None);

        assert_eq!(scale.band_at(step * 0.5), Some("A"));
        assert_eq!(scale.band_at(step * 3.5), Some("D"));
        // Gap between A and B.
        assert_eq!(scale.band_at(step * 1.1), None);
        assert_eq!(scale.band_at(-1.0), None);
    }

    #[test]
    fn test_band_scale_empty() {
        let scale = BandScale::new(vec![], (0.0, 100.0)).padding(0.2);

        assert_eq!(scale.band_at(50.0), None);
    }
}
