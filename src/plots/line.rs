//! Line layout with connecting segments.
//!
//! Points are spread evenly across the width by index, not by time. Each
//! consecutive pair gets a [`Segment`] carrying length and angle so that a
//! renderer can draw it as a rotated bar.

use serde::Serialize;

use super::{ChartMapper, RenderPoint};
use crate::geometry::Segment;
use crate::scale::Scale;
use crate::series::Sample;

/// Line chart geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineLayout {
    /// Points in chronological order.
    pub points: Vec<RenderPoint>,
    /// `points.len() - 1` segments; segment `i` leaves point `i`.
    pub segments: Vec<Segment>,
}

impl LineLayout {
    /// Total drawn length of the line.
    #[must_use]
    pub fn path_length(&self) -> f32 {
        self.segments.iter().map(|s| s.length).sum()
    }
}

pub(super) fn layout(mapper: &ChartMapper, samples: &[Sample]) -> LineLayout {
    let scale = mapper.value_scale(samples);
    let n = samples.len();

    let points: Vec<RenderPoint> = samples
        .iter()
        .enumerate()
        .map(|(i, sample)| RenderPoint {
            x: index_x(i, n, mapper.width),
            y: scale.scale(sample.value),
            sample: *sample,
        })
        .collect();

    let segments = points.windows(2).map(|w| Segment::between(w[0].point(), w[1].point())).collect();

    LineLayout { points, segments }
}

/// Evenly spaced x for point `i` of `n`; a lone point is centered.
fn index_x(i: usize, n: usize, width: f32) -> f32 {
    if n < 2 {
        width / 2.0
    } else {
        width * i as f32 / (n - 1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::daily;
    use super::super::{ChartKind, ChartMapper, Geometry};
    use super::*;

    fn line(mapper: ChartMapper, values: &[f64]) -> LineLayout {
        match mapper.kind(ChartKind::Line).map(&daily(values)) {
            Geometry::Line(layout) => layout,
            Geometry::Bar(_) => unreachable!("line mapper produced a bar layout"),
        }
    }

    #[test]
    fn test_index_spacing() {
        let layout = line(ChartMapper::default().width(90.0), &[1.0, 5.0, 2.0, 8.0]);
        let xs: Vec<f32> = layout.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 30.0, 60.0, 90.0]);
    }

    #[test]
    fn test_single_point_centered_without_segment() {
        let layout = line(ChartMapper::default().width(50.0), &[3.0]);
        assert_eq!(layout.points.len(), 1);
        assert!((layout.points[0].x - 25.0).abs() < 1e-4);
        assert!(layout.segments.is_empty());
    }

    #[test]
    fn test_segment_per_consecutive_pair() {
        let layout = line(ChartMapper::default(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(layout.segments.len(), layout.points.len() - 1);
        for (i, seg) in layout.segments.iter().enumerate() {
            assert_eq!(seg.start, layout.points[i].point());
            assert_eq!(seg.end, layout.points[i + 1].point());
        }
    }

    #[test]
    fn test_segment_length_and_angle() {
        // Width 30 over two points, height 40 from 0 to 1.
        let layout = line(ChartMapper::default().width(30.0).height(40.0), &[0.0, 1.0]);
        let seg = layout.segments[0];
        assert!((seg.length - 50.0).abs() < 1e-3);
        assert!((seg.angle - 40.0_f32.atan2(30.0)).abs() < 1e-5);
        assert!((layout.path_length() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_falling_segment_negative_angle() {
        let layout = line(ChartMapper::default(), &[10.0, 0.0]);
        assert!(layout.segments[0].angle < 0.0);
    }

    #[test]
    fn test_index_x_helper() {
        assert_eq!(index_x(0, 0, 10.0), 5.0);
        assert_eq!(index_x(2, 3, 10.0), 10.0);
    }
}
