// broadpen/content/src/segment.rs
//
// Copyright © 2026 The Broadpen Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Contour-tagged quadratic Bézier segments.

use broadpen_geometry::line_segment::LineSegment2F;
use broadpen_geometry::util::EPSILON;
use broadpen_geometry::vector::Vector2F;

/// A single quadratic Bézier curve segment, with explicit start and end
/// points.
///
/// Straight lines are encoded as degenerate quadratics whose control point
/// sits on the baseline midpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// The contour this segment belongs to. Tags increase monotonically
    /// along a path and change exactly at move-to boundaries.
    pub contour: u32,
    /// The start and end points of the curve.
    pub baseline: LineSegment2F,
    /// The control point.
    pub ctrl: Vector2F,
}

impl Segment {
    /// Returns a segment representing a straight line.
    #[inline]
    pub fn line(contour: u32, line: LineSegment2F) -> Segment {
        Segment {
            contour,
            baseline: line,
            ctrl: line.midpoint(),
        }
    }

    /// Returns a segment representing a quadratic Bézier curve.
    #[inline]
    pub fn quadratic(contour: u32, baseline: LineSegment2F, ctrl: Vector2F) -> Segment {
        Segment { contour, baseline, ctrl }
    }

    #[allow(clippy::wrong_self_convention)]
    #[inline]
    pub fn from(&self) -> Vector2F {
        self.baseline.from()
    }

    #[inline]
    pub fn to(&self) -> Vector2F {
        self.baseline.to()
    }

    /// Returns this segment with its endpoints swapped.
    #[inline]
    pub fn reversed(&self) -> Segment {
        Segment {
            contour: self.contour,
            baseline: self.baseline.reversed(),
            ctrl: self.ctrl,
        }
    }

    /// The point on the curve at parametric time `t`:
    /// `B(t) = (1-t)^2 P0 + 2(1-t)t P1 + t^2 P2`.
    pub fn sample(&self, t: f32) -> Vector2F {
        let (p0, p1, p2) = (self.from(), self.ctrl, self.to());
        let t1 = 1.0 - t;
        p0.scale(t1 * t1) + p1.scale(2.0 * t1 * t) + p2.scale(t * t)
    }

    /// The first derivative of the curve with respect to `t`:
    /// `B'(t) = 2(1-t)(P1 - P0) + 2t(P2 - P1)`.
    pub fn derivative(&self, t: f32) -> Vector2F {
        let (p0, p1, p2) = (self.from(), self.ctrl, self.to());
        (p1 - p0).scale(2.0 * (1.0 - t)) + (p2 - p1).scale(2.0 * t)
    }

    /// The second derivative of the curve with respect to `t`:
    /// `B''(t) = 2(P2 - 2P1 + P0)`.
    pub fn second_derivative(&self) -> Vector2F {
        let (p0, p1, p2) = (self.from(), self.ctrl, self.to());
        (p2 - p1.scale(2.0) + p0).scale(2.0)
    }

    /// Divides this segment into two at the given parametric t value, which
    /// must range from 0.0 to 1.0.
    ///
    /// This uses de Casteljau subdivision. Both halves keep the contour tag.
    pub fn split(&self, t: f32) -> (Segment, Segment) {
        let (p0, p1, p2) = (self.from(), self.ctrl, self.to());
        let ctrl0 = p0.lerp(p1, t);
        let ctrl1 = p1.lerp(p2, t);
        let mid = ctrl0.lerp(ctrl1, t);
        (
            Segment::quadratic(self.contour, LineSegment2F::new(p0, mid), ctrl0),
            Segment::quadratic(self.contour, LineSegment2F::new(mid, p2), ctrl1),
        )
    }

    /// The normal at the start point, rescaled to length `len`.
    ///
    /// A segment with no tangent direction there yields the zero vector;
    /// downstream offsetting then degrades to a zero-length displacement.
    #[inline]
    pub fn start_normal(&self, len: f32) -> Vector2F {
        normal_from_tangent(self.ctrl - self.from(), len)
    }

    /// The normal at the endpoint, rescaled to length `len`.
    #[inline]
    pub fn end_normal(&self, len: f32) -> Vector2F {
        normal_from_tangent(self.to() - self.ctrl, len)
    }

    /// The signed curvature at `t`: `|B'(t)|^3 / (B'(t) × B''(t))`, negative
    /// when the curve bends clockwise.
    ///
    /// Near-straight curves have no meaningful curvature; the result is NaN
    /// there rather than an enormous finite value.
    pub fn curvature(&self, t: f32) -> f32 {
        let d1 = self.derivative(t);
        let d2 = self.second_derivative();
        let denom = d1.det(d2);
        if denom.abs() < EPSILON {
            return f32::NAN;
        }
        d1.square_length().powf(1.5) / denom
    }
}

fn normal_from_tangent(tangent: Vector2F, len: f32) -> Vector2F {
    if tangent.is_zero() {
        return Vector2F::zero();
    }
    tangent.rot90_cw().with_length(len)
}
