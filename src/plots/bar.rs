//! Compact bar layout.
//!
//! Only the most recent `compact_limit` samples are drawn; older ones are
//! dropped from the view, not aggregated. Bars sit in equal slots across the
//! width with `x` at the slot center and `y` as the bar height.

use serde::Serialize;

use super::{ChartMapper, RenderPoint};
use crate::scale::Scale;
use crate::series::Sample;

/// Bar chart geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarLayout {
    /// One point per bar, oldest first.
    pub points: Vec<RenderPoint>,
    /// Width of each bar's slot.
    pub slot_width: f32,
    /// Samples left out because they were older than the visible window.
    pub dropped: usize,
}

pub(super) fn layout(mapper: &ChartMapper, samples: &[Sample]) -> BarLayout {
    let visible = &samples[samples.len().saturating_sub(mapper.compact_limit)..];
    let dropped = samples.len() - visible.len();

    if visible.is_empty() {
        return BarLayout { points: Vec::new(), slot_width: 0.0, dropped };
    }

    let scale = mapper.value_scale(visible);
    let slot_width = mapper.width / visible.len() as f32;
    let points = visible
        .iter()
        .enumerate()
        .map(|(i, sample)| RenderPoint {
            x: slot_width * (i as f32 + 0.5),
            y: scale.scale(sample.value),
            sample: *sample,
        })
        .collect();

    BarLayout { points, slot_width, dropped }
}

#[cfg(test)]
mod tests {
    use super::super::tests::daily;
    use super::super::{ChartKind, ChartMapper, Geometry};

    fn bars(mapper: ChartMapper, values: &[f64]) -> super::BarLayout {
        match mapper.kind(ChartKind::Bar).map(&daily(values)) {
            Geometry::Bar(layout) => layout,
            Geometry::Line(_) => unreachable!("bar mapper produced a line layout"),
        }
    }

    #[test]
    fn test_keeps_seven_most_recent() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let layout = bars(ChartMapper::default(), &values);

        assert_eq!(layout.points.len(), 7);
        assert_eq!(layout.dropped, 3);
        let kept: Vec<f64> = layout.points.iter().map(|p| p.sample.value).collect();
        assert_eq!(kept, vec![4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn test_layout_ascending_by_day() {
        let values: Vec<f64> = (0..12).map(f64::from).collect();
        let layout = bars(ChartMapper::default(), &values);
        for w in layout.points.windows(2) {
            assert!(w[0].sample.day < w[1].sample.day);
            assert!(w[0].x < w[1].x);
        }
    }

    #[test]
    fn test_short_series_not_truncated() {
        let layout = bars(ChartMapper::default(), &[1.0, 2.0, 3.0]);
        assert_eq!(layout.points.len(), 3);
        assert_eq!(layout.dropped, 0);
    }

    #[test]
    fn test_custom_limit() {
        let layout = bars(ChartMapper::default().compact_limit(2), &[1.0, 2.0, 3.0]);
        assert_eq!(layout.points.len(), 2);
        assert_eq!(layout.dropped, 1);
    }

    #[test]
    fn test_slots_span_width() {
        let layout = bars(ChartMapper::default().width(70.0).height(10.0), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert!((layout.slot_width - 10.0).abs() < 1e-4);
        assert!((layout.points[0].x - 5.0).abs() < 1e-4);
        assert!((layout.points[6].x - 65.0).abs() < 1e-4);
    }

    #[test]
    fn test_heights_scaled_on_visible_window() {
        // The dropped 100.0 must not stretch the domain.
        let layout = bars(ChartMapper::default().compact_limit(2).height(10.0), &[100.0, 0.0, 5.0]);
        let ys: Vec<f32> = layout.points.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![0.0, 10.0]);
    }
}
