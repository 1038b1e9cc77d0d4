//! Fixed-width glyph sparklines for progress series.

use crate::model::{EMPTY_SPARKLINE, ProgressSample};

/// Block glyphs from lowest to highest.
pub const SPARK_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Glyph used for every position of a zero-range series.
pub const FLAT_GLYPH: char = SPARK_GLYPHS[3];

pub const DEFAULT_SPARKLINE_WIDTH: usize = 10;

/// Renders `samples` as exactly `width` glyphs.
///
/// Samples are ordered by date first. A longer series is stride-sampled so
/// that the first and last points survive; a shorter one is padded by
/// repeating its last value. Heights are scaled over the resulting window.
/// An empty series renders [`EMPTY_SPARKLINE`].
pub fn render(samples: &[ProgressSample], width: usize) -> String {
    let mut ordered: Vec<&ProgressSample> = samples
        .iter()
        .filter(|s| s.progress_value.is_finite())
        .collect();
    if ordered.is_empty() {
        return EMPTY_SPARKLINE.to_string();
    }
    if width == 0 {
        return String::new();
    }
    ordered.sort_by_key(|s| s.date);

    let values: Vec<f64> = ordered.iter().map(|s| s.progress_value).collect();
    let window = resample(&values, width);

    let min = window.iter().copied().fold(f64::INFINITY, f64::min);
    let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range <= f64::EPSILON {
        return std::iter::repeat_n(FLAT_GLYPH, width).collect();
    }

    let top = (SPARK_GLYPHS.len() - 1) as f64;
    window
        .iter()
        .map(|value| {
            let ratio = (value - min) / range;
            let index = (ratio * top).round().clamp(0.0, top) as usize;
            SPARK_GLYPHS[index]
        })
        .collect()
}

/// Fits `values` (non-empty) to exactly `width` points.
fn resample(values: &[f64], width: usize) -> Vec<f64> {
    let len = values.len();
    if len > width {
        if width == 1 {
            return vec![values[len - 1]];
        }
        (0..width)
            .map(|i| values[i * (len - 1) / (width - 1)])
            .collect()
    } else {
        let last = values[len - 1];
        let mut window = values.to_vec();
        window.resize(width, last);
        window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series(values: &[f64]) -> Vec<ProgressSample> {
        let start = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| ProgressSample::new(start + Duration::days(i as i64), *v))
            .collect()
    }

    #[test]
    fn test_empty_is_dash() {
        assert_eq!(render(&[], 10), "—");
    }

    #[test]
    fn test_all_equal_is_flat_line_of_width() {
        let line = render(&series(&[42.0, 42.0, 42.0]), 10);
        assert_eq!(line.chars().count(), 10);
        assert!(line.chars().all(|c| c == FLAT_GLYPH));
    }

    #[test]
    fn test_single_sample_is_flat() {
        let line = render(&series(&[7.0]), 5);
        assert_eq!(line, "▄▄▄▄▄");
    }

    #[test]
    fn test_ascending_spans_full_range() {
        let line = render(&series(&[0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0]), 8);
        assert_eq!(line, "▁▂▃▄▅▆▇█");
    }

    #[test]
    fn test_short_series_pads_with_last_value() {
        let line = render(&series(&[0.0, 100.0]), 4);
        assert_eq!(line, "▁███");
    }

    #[test]
    fn test_long_series_keeps_endpoints() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let line: Vec<char> = render(&series(&values), 10).chars().collect();
        assert_eq!(line.len(), 10);
        assert_eq!(line[0], '▁');
        assert_eq!(line[9], '█');
    }

    #[test]
    fn test_unsorted_input_is_ordered_by_date() {
        let mut samples = series(&[0.0, 50.0, 100.0]);
        samples.reverse();
        assert_eq!(render(&samples, 3), "▁▅█");
    }

    #[test]
    fn test_non_finite_values_are_ignored() {
        assert_eq!(render(&series(&[f64::NAN]), 3), "—");
    }
}
