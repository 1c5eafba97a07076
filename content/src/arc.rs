// broadpen/content/src/arc.rs
//
// Copyright © 2026 The Broadpen Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Decoding of elliptical arcs into quadratic Bézier segments.

use crate::segment::Segment;
use broadpen_geometry::line_segment::LineSegment2F;
use broadpen_geometry::vector::{vec2f, Vector2F};
use std::f32::consts::FRAC_PI_4;

/// Decodes arcs into quadratic Bézier segments.
///
/// The stroker consumes this only for round caps, but implementations are
/// free to support arbitrary sweeps. `focus1` and `focus2` are the
/// elliptical foci relative to `from`; equal foci describe a circle.
/// Positive sweep angles turn counter-clockwise. Emitted segments must
/// start exactly at `from`, be tangent-continuous, and carry contour tag 0;
/// the caller retags them.
pub trait ArcTessellator {
    /// Produces the segments approximating the arc.
    fn tessellate(
        &self,
        from: Vector2F,
        focus1: Vector2F,
        focus2: Vector2F,
        sweep_angle: f32,
    ) -> Vec<Segment>;
}

/// Approximates arcs with quadratic segments of at most π/4 sweep each.
///
/// Each control point sits at the intersection of the endpoint tangents: on
/// the unit circle that is `1/cos(step/2)` along the bisector, and the
/// ellipse's affine frame maps the construction without changing the Bézier
/// structure.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultArcTessellator;

impl ArcTessellator for DefaultArcTessellator {
    fn tessellate(
        &self,
        from: Vector2F,
        focus1: Vector2F,
        focus2: Vector2F,
        sweep_angle: f32,
    ) -> Vec<Segment> {
        let (f1, f2) = (from + focus1, from + focus2);
        let center = f1.lerp(f2, 0.5);

        // Recover the ellipse from the foci and the start point.
        let semi_major = 0.5 * ((from - f1).length() + (from - f2).length());
        if semi_major == 0.0 || sweep_angle == 0.0 {
            return vec![];
        }
        let focal = 0.5 * (f2 - f1).length();
        let semi_minor = (semi_major * semi_major - focal * focal).max(0.0).sqrt();
        let axis = if focal == 0.0 {
            vec2f(1.0, 0.0)
        } else {
            (f2 - f1).with_length(1.0)
        };
        let perp = axis.rot90_ccw();

        let rel = from - center;
        let u0 = rel.dot(axis) / semi_major;
        let v0 = if semi_minor == 0.0 {
            0.0
        } else {
            rel.dot(perp) / semi_minor
        };
        let start_angle = v0.atan2(u0);

        let steps = (sweep_angle.abs() / FRAC_PI_4).ceil().max(1.0) as u32;
        let step = sweep_angle / steps as f32;
        let ctrl_scale = 1.0 / (0.5 * step).cos();

        let point_at = |angle: f32, radial: f32| -> Vector2F {
            center
                + axis.scale(semi_major * radial * angle.cos())
                + perp.scale(semi_minor * radial * angle.sin())
        };

        let mut segments = Vec::with_capacity(steps as usize);
        let mut prev = from;
        for i in 0..steps {
            let angle0 = start_angle + sweep_angle * (i as f32 / steps as f32);
            let angle1 = start_angle + sweep_angle * ((i + 1) as f32 / steps as f32);
            let next = point_at(angle1, 1.0);
            let ctrl = point_at(0.5 * (angle0 + angle1), ctrl_scale);
            segments.push(Segment::quadratic(0, LineSegment2F::new(prev, next), ctrl));
            prev = next;
        }
        segments
    }
}
