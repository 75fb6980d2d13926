//! Parametric 3D curves for path following.
//!
//! [`Curve::point`] is the raw parametric position; [`Curve::point_at`] is
//! re-parameterized by arc length so a linear parameter gives constant speed.

use std::fmt;

use glam::Vec3;

use crate::errors::{Result, StageError};

const ARC_LENGTH_DIVISIONS: usize = 200;

/// A continuous 3D curve over the parameter range [0, 1].
pub trait Curve: fmt::Debug {
    /// Position at raw parameter `t`.
    fn point(&self, t: f32) -> Vec3;

    /// Position at fraction `u` of the total arc length.
    fn point_at(&self, u: f32) -> Vec3 {
        self.point(u)
    }

    fn length(&self) -> f32;
}

/// Cumulative arc lengths sampled at uniform parameter steps.
#[derive(Debug, Clone)]
struct ArcLengthTable {
    lengths: Vec<f32>,
}

impl ArcLengthTable {
    fn build(point: impl Fn(f32) -> Vec3) -> Self {
        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        let mut last = point(0.0);
        let mut sum = 0.0;
        lengths.push(0.0);

        for i in 1..=ARC_LENGTH_DIVISIONS {
            let current = point(i as f32 / ARC_LENGTH_DIVISIONS as f32);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }

        Self { lengths }
    }

    fn total(&self) -> f32 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Maps arc-length fraction `u` to the raw parameter `t`.
    fn u_to_t(&self, u: f32) -> f32 {
        let total = self.total();
        if total <= f32::EPSILON {
            return u.clamp(0.0, 1.0);
        }

        let target = u.clamp(0.0, 1.0) * total;
        let i = self.lengths.partition_point(|&l| l < target);
        if i == 0 {
            return 0.0;
        }
        if i >= self.lengths.len() {
            return 1.0;
        }

        let before = self.lengths[i - 1];
        let after = self.lengths[i];
        let segment = after - before;
        let fraction = if segment > 1e-9 { (target - before) / segment } else { 0.0 };

        ((i - 1) as f32 + fraction) / (self.lengths.len() - 1) as f32
    }
}

/// Straight segments through a list of points.
#[derive(Debug, Clone)]
pub struct LinePath {
    points: Vec<Vec3>,
    table: ArcLengthTable,
}

impl LinePath {
    pub fn new(points: Vec<Vec3>) -> Result<Self> {
        if points.len() < 2 {
            return Err(StageError::DegenerateCurve(points.len()));
        }
        let table = ArcLengthTable::build(|t| polyline_point(&points, t));
        Ok(Self { points, table })
    }

    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }
}

fn polyline_point(points: &[Vec3], t: f32) -> Vec3 {
    let segments = points.len() - 1;
    let p = t.clamp(0.0, 1.0) * segments as f32;
    let i = (p.floor() as usize).min(segments - 1);
    points[i].lerp(points[i + 1], p - i as f32)
}

impl Curve for LinePath {
    fn point(&self, t: f32) -> Vec3 {
        polyline_point(&self.points, t)
    }

    fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.table.u_to_t(u))
    }

    fn length(&self) -> f32 {
        self.table.total()
    }
}

/// Centripetal Catmull-Rom spline through a list of points.
///
/// Open curves extrapolate phantom end points; closed curves wrap.
#[derive(Debug, Clone)]
pub struct CatmullRomCurve {
    points: Vec<Vec3>,
    closed: bool,
    table: ArcLengthTable,
}

impl CatmullRomCurve {
    pub fn new(points: Vec<Vec3>, closed: bool) -> Result<Self> {
        if points.len() < 2 {
            return Err(StageError::DegenerateCurve(points.len()));
        }
        let table = ArcLengthTable::build(|t| catmull_rom_point(&points, closed, t));
        Ok(Self {
            points,
            closed,
            table,
        })
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Curve for CatmullRomCurve {
    fn point(&self, t: f32) -> Vec3 {
        catmull_rom_point(&self.points, self.closed, t)
    }

    fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.table.u_to_t(u))
    }

    fn length(&self) -> f32 {
        self.table.total()
    }
}

fn catmull_rom_point(points: &[Vec3], closed: bool, t: f32) -> Vec3 {
    let l = points.len();
    let t = t.clamp(0.0, 1.0);
    let span = if closed { l } else { l - 1 };
    let p = span as f32 * t;

    let mut int_point = p.floor() as usize;
    let mut weight = p - int_point as f32;

    if closed {
        int_point %= l;
    } else if int_point >= l - 1 {
        int_point = l - 2;
        weight = 1.0;
    }

    let p1 = points[int_point % l];
    let p2 = points[(int_point + 1) % l];

    let p0 = if closed || int_point > 0 {
        points[(int_point + l - 1) % l]
    } else {
        points[0] + (points[0] - points[1])
    };

    let p3 = if closed || int_point + 2 < l {
        points[(int_point + 2) % l]
    } else {
        points[l - 1] + (points[l - 1] - points[l - 2])
    };

    let mut dt1 = p1.distance_squared(p2).powf(0.25);
    let mut dt0 = p0.distance_squared(p1).powf(0.25);
    let mut dt2 = p2.distance_squared(p3).powf(0.25);
    if dt1 < 1e-4 {
        dt1 = 1.0;
    }
    if dt0 < 1e-4 {
        dt0 = dt1;
    }
    if dt2 < 1e-4 {
        dt2 = dt1;
    }

    // Non-uniform Hermite tangents at p1 and p2, rescaled to the [0, 1] span.
    let m1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
    let m2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

    let c0 = p1;
    let c1 = m1;
    let c2 = -3.0 * p1 + 3.0 * p2 - 2.0 * m1 - m2;
    let c3 = 2.0 * p1 - 2.0 * p2 + m1 + m2;

    let w2 = weight * weight;
    c0 + c1 * weight + c2 * w2 + c3 * w2 * weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_path_constant_speed() {
        // Uneven segments: 1 unit then 3 units.
        let path = LinePath::new(vec![Vec3::ZERO, Vec3::X, Vec3::new(4.0, 0.0, 0.0)]).unwrap();
        assert!((path.length() - 4.0).abs() < 1e-3);
        assert!((path.point_at(0.5).x - 2.0).abs() < 1e-2);
        // Raw parameter lands on the middle vertex instead.
        assert!((path.point(0.5).x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_catmull_rom_passes_through_points() {
        let pts = vec![Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0), Vec3::new(2.0, 0.0, 0.0)];
        let curve = CatmullRomCurve::new(pts.clone(), false).unwrap();
        assert!(curve.point(0.0).distance(pts[0]) < 1e-5);
        assert!(curve.point(0.5).distance(pts[1]) < 1e-5);
        assert!(curve.point(1.0).distance(pts[2]) < 1e-5);
    }

    #[test]
    fn test_closed_curve_wraps() {
        let pts = vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, 1.0), Vec3::Z];
        let curve = CatmullRomCurve::new(pts, true).unwrap();
        assert!(curve.point(0.0).distance(curve.point(1.0)) < 1e-5);
    }

    #[test]
    fn test_degenerate_rejected() {
        assert!(LinePath::new(vec![Vec3::ZERO]).is_err());
        assert!(CatmullRomCurve::new(Vec::new(), false).is_err());
    }
}
