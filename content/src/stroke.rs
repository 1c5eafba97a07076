// broadpen/content/src/stroke.rs
//
// Copyright © 2026 The Broadpen Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Conversion of path strokes to fills.
//!
//! Offset curves are not Bézier curves, so each segment's offsets are
//! flattened into straight pieces with the method of Thomas F. Hain et al.,
//! "Fast, precise flattening of cubic Bézier path and offset curves": a
//! second-order curvature estimate bounds the flattening error up front,
//! with no recursive re-checking.

use crate::arc::ArcTessellator;
use crate::orientation::Orientation;
use crate::outline::Outline;
use crate::segment::Segment;
use broadpen_geometry::line_segment::LineSegment2F;
use broadpen_geometry::vector::Vector2F;
use smallvec::SmallVec;
use std::f32::consts::PI;

/// How far a flattened offset polyline may deviate from the true offset
/// curve, in caller units.
const TOLERANCE: f32 = 0.01;

/// How the ends of open contours are terminated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineCap {
    /// The stroke ends flush with the endpoint.
    Flat,
    /// The stroke extends half the stroke width past the endpoint.
    Square,
    /// A semicircle of radius half the stroke width wraps the endpoint.
    Round,
}

/// How the segments of a contour are joined at direction changes.
///
/// Only the bevel join is implemented; miter and round joins are future
/// work.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineJoin {
    /// A straight chamfer between the two offset segments.
    Bevel,
}

/// The visual parameters of one stroke operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Default for StrokeStyle {
    #[inline]
    fn default() -> StrokeStyle {
        StrokeStyle {
            width: 1.0,
            cap: LineCap::Flat,
            join: LineJoin::Bevel,
        }
    }
}

/// Converts a stroked outline into the outline of the equivalent fill.
///
/// The result covers exactly the area a pen of the stroke's width would
/// paint when dragged along the input path, encoded so that a nonzero or
/// even-odd fill rule renders it directly.
pub struct OutlineStrokeToFill<'a, A>
where
    A: ArcTessellator,
{
    input: &'a Outline,
    style: StrokeStyle,
    arcs: &'a A,
    output: Outline,
}

impl<'a, A> OutlineStrokeToFill<'a, A>
where
    A: ArcTessellator,
{
    #[inline]
    pub fn new(input: &'a Outline, style: StrokeStyle, arcs: &'a A) -> OutlineStrokeToFill<'a, A> {
        OutlineStrokeToFill {
            input,
            style,
            arcs,
            output: Outline::new(),
        }
    }

    /// Performs the conversion.
    pub fn offset(&mut self) {
        if self.style.width <= 0.0 {
            warn!(
                "stroke width {} is not positive; emitting an empty outline",
                self.style.width
            );
            return;
        }

        let input = self.input;
        let half_width = 0.5 * self.style.width;
        for contour in input.contours() {
            let mut stroker = ContourStrokeToFill::new(contour, half_width, self.style, self.arcs);
            stroker.offset();
            match stroker.finish() {
                (merged, None) => self.output.append(merged),
                (rhs, Some(lhs)) => {
                    // The inner loop must wind opposite the outer loop so
                    // that the fill rule leaves the ring's hole empty.
                    match Orientation::from_segments(contour) {
                        Orientation::Ccw => {
                            self.output.append(rhs);
                            self.output.append(lhs.reversed());
                        }
                        Orientation::Cw => {
                            self.output.append(lhs);
                            self.output.append(rhs.reversed());
                        }
                    }
                }
            }
        }
    }

    /// Returns the resulting fillable outline.
    #[inline]
    pub fn into_outline(self) -> Outline {
        self.output
    }
}

/// Per-segment endpoint geometry, computed once before offsetting and
/// discarded with the contour. The curvatures are informational: a future
/// curvature-aware join policy would consult them, the bevel join does not.
#[derive(Clone, Copy)]
struct StrokeState {
    from: Vector2F,
    to: Vector2F,
    from_normal: Vector2F,
    to_normal: Vector2F,
    from_curvature: f32,
    to_curvature: f32,
    ctrl: Vector2F,
}

impl StrokeState {
    fn new(segment: &Segment, half_width: f32) -> StrokeState {
        StrokeState {
            from: segment.from(),
            to: segment.to(),
            from_normal: segment.start_normal(half_width),
            to_normal: segment.end_normal(half_width),
            from_curvature: segment.curvature(0.0),
            to_curvature: segment.curvature(1.0),
            ctrl: segment.ctrl,
        }
    }
}

struct ContourStrokeToFill<'a, A>
where
    A: ArcTessellator,
{
    states: SmallVec<[StrokeState; 8]>,
    rhs: Outline,
    lhs: Outline,
    half_width: f32,
    style: StrokeStyle,
    arcs: &'a A,
}

impl<'a, A> ContourStrokeToFill<'a, A>
where
    A: ArcTessellator,
{
    fn new(
        input: &[Segment],
        half_width: f32,
        style: StrokeStyle,
        arcs: &'a A,
    ) -> ContourStrokeToFill<'a, A> {
        let states = input
            .iter()
            .map(|segment| StrokeState::new(segment, half_width))
            .collect();
        ContourStrokeToFill {
            states,
            rhs: Outline::new(),
            lhs: Outline::new(),
            half_width,
            style,
            arcs,
        }
    }

    fn is_closed(&self) -> bool {
        self.states[0].from == self.states[self.states.len() - 1].to
    }

    /// Offsets every segment to both sides and bridges the gaps that open
    /// up where the tangent direction changes.
    fn offset(&mut self) {
        let closed = self.is_closed();
        for i in 0..self.states.len() {
            let state = self.states[i];
            flatten_offset(&mut self.rhs, &state, self.half_width);
            flatten_offset(&mut self.lhs, &state, -self.half_width);

            let next = if i + 1 < self.states.len() {
                self.states[i + 1]
            } else if closed {
                self.states[0]
            } else {
                continue;
            };
            // Collinear continuations need no join.
            if state.to_normal != next.from_normal {
                self.join(
                    state.to,
                    state.to_normal,
                    next.from_normal,
                    state.to_curvature,
                    next.from_curvature,
                );
            }
        }
    }

    /// Terminates the contour. A closed contour yields two independent
    /// loops; an open contour yields one merged loop, capped at both ends.
    fn finish(mut self) -> (Outline, Option<Outline>) {
        if self.is_closed() {
            self.rhs.close();
            self.lhs.close();
            return (self.rhs, Some(self.lhs));
        }

        let first = self.states[0];
        let last = self.states[self.states.len() - 1];

        // One loop: down the right-hand side, around the end cap, back up
        // the reversed left-hand side, and around the start cap.
        let lhs = self.lhs.reversed();
        self.cap(last.to, last.to_normal);
        self.rhs.append(lhs);
        self.cap(first.from, -first.from_normal);
        self.rhs.close();
        (self.rhs, None)
    }

    fn join(
        &mut self,
        pivot: Vector2F,
        in_normal: Vector2F,
        out_normal: Vector2F,
        in_curvature: f32,
        out_curvature: f32,
    ) {
        match self.style.join {
            LineJoin::Bevel => bevel_join(
                &mut self.rhs,
                &mut self.lhs,
                pivot,
                in_normal,
                out_normal,
                in_curvature,
                out_curvature,
            ),
        }
    }

    /// Caps the current end of the merged outline. `normal` points to the
    /// side the loop is arriving on.
    fn cap(&mut self, pivot: Vector2F, normal: Vector2F) {
        match self.style.cap {
            LineCap::Flat => {
                self.rhs.line_to(pivot - normal);
            }
            LineCap::Square => {
                let extent = pivot + normal.rot90_ccw();
                self.rhs.line_to(extent + normal);
                self.rhs.line_to(extent - normal);
                self.rhs.line_to(pivot - normal);
            }
            LineCap::Round => {
                let center = pivot - self.rhs.pen();
                self.rhs.arc_to(self.arcs, center, center, PI);
            }
        }
    }
}

// The incoming normal and the curvatures are consumed only by join styles
// that do not exist yet.
fn bevel_join(
    rhs: &mut Outline,
    lhs: &mut Outline,
    pivot: Vector2F,
    _in_normal: Vector2F,
    out_normal: Vector2F,
    _in_curvature: f32,
    _out_curvature: f32,
) {
    rhs.line_to(pivot + out_normal);
    lhs.line_to(pivot - out_normal);
}

/// Flattens the offset of one quadratic segment at signed distance `d` into
/// straight pieces, each within `TOLERANCE` of the true offset curve.
/// Positive distances offset to the right-hand side of the direction of
/// travel, negative ones to the left.
fn flatten_offset(output: &mut Outline, state: &StrokeState, d: f32) {
    let mut curve = Segment::quadratic(0, LineSegment2F::new(state.from, state.to), state.ctrl);
    loop {
        let to_ctrl = curve.ctrl - curve.from();
        let to_end = curve.to() - curve.from();
        let area = to_end.det(to_ctrl);
        let leg = to_ctrl.length();
        if area * leg == 0.0 {
            // The rest has no turning left in it.
            break;
        }

        // Hain's curvature proxy: the signed parallelogram area over the
        // length of the control leg.
        let s2 = area / leg;
        let t = 2.0 * (TOLERANCE / (3.0 * s2.abs())).sqrt();
        if t >= 1.0 {
            break;
        }
        let (flat_piece, rest) = curve.split(t);
        push_offset_line(output, &flat_piece, d);
        curve = rest;
    }
    push_offset_line(output, &curve, d);
}

/// Emits the straight offset of `curve`: both endpoints displaced along
/// their local normals by `d`, encoded as a degenerate quadratic.
fn push_offset_line(output: &mut Outline, curve: &Segment, d: f32) {
    let from = curve.from() + curve.start_normal(d);
    let to = curve.to() + curve.end_normal(d);
    output.push(Segment::line(0, LineSegment2F::new(from, to)));
}

#[cfg(test)]
mod test {
    use super::{
        flatten_offset, ContourStrokeToFill, LineCap, LineJoin, OutlineStrokeToFill, StrokeState,
        StrokeStyle,
    };
    use crate::arc::{ArcTessellator, DefaultArcTessellator};
    use crate::orientation::{signed_area, Orientation};
    use crate::outline::Outline;
    use crate::segment::Segment;
    use broadpen_geometry::line_segment::LineSegment2F;
    use broadpen_geometry::vector::{vec2f, Vector2F};
    use std::cell::RefCell;
    use std::f32::consts::PI;

    fn line(contour: u32, from: Vector2F, to: Vector2F) -> Segment {
        Segment::line(contour, LineSegment2F::new(from, to))
    }

    fn style(width: f32, cap: LineCap) -> StrokeStyle {
        StrokeStyle {
            width,
            cap,
            join: LineJoin::Bevel,
        }
    }

    fn stroke(path: &Outline, style: StrokeStyle) -> Outline {
        let arcs = DefaultArcTessellator;
        let mut stroker = OutlineStrokeToFill::new(path, style, &arcs);
        stroker.offset();
        stroker.into_outline()
    }

    fn square_contour(flipped: bool) -> Vec<Segment> {
        let mut corners = vec![
            vec2f(0.0, 0.0),
            vec2f(10.0, 0.0),
            vec2f(10.0, 10.0),
            vec2f(0.0, 10.0),
        ];
        if flipped {
            corners.reverse();
        }
        (0..corners.len())
            .map(|i| line(0, corners[i], corners[(i + 1) % corners.len()]))
            .collect()
    }

    #[test]
    fn test_empty_outline_strokes_to_nothing() {
        let fill = stroke(&Outline::new(), style(2.0, LineCap::Flat));
        assert!(fill.is_empty());
    }

    #[test]
    fn test_nonpositive_width_strokes_to_nothing() {
        let path = Outline::from_segments(vec![line(0, vec2f(0.0, 0.0), vec2f(10.0, 0.0))]);
        let fill = stroke(&path, style(0.0, LineCap::Flat));
        assert!(fill.is_empty());
    }

    #[test]
    fn test_flat_cap_rectangle() {
        let path = Outline::from_segments(vec![line(0, vec2f(0.0, 0.0), vec2f(10.0, 0.0))]);
        let fill = stroke(&path, style(2.0, LineCap::Flat));

        assert_eq!(fill.len(), 4);
        let segments = fill.segments();
        assert_eq!(segments[0].from(), segments[3].to());

        let corners = [
            vec2f(0.0, -1.0),
            vec2f(10.0, -1.0),
            vec2f(10.0, 1.0),
            vec2f(0.0, 1.0),
        ];
        for (segment, &corner) in segments.iter().zip(corners.iter()) {
            assert!(
                segment.from().approx_eq(corner, 1e-4),
                "{:?} != {:?}",
                segment.from(),
                corner
            );
        }
    }

    #[test]
    fn test_square_cap_extends_by_half_width() {
        let path = Outline::from_segments(vec![line(0, vec2f(0.0, 0.0), vec2f(10.0, 0.0))]);
        let fill = stroke(&path, style(2.0, LineCap::Square));

        assert_eq!(fill.len(), 8);
        let segments = fill.segments();
        assert_eq!(segments[0].from(), segments[7].to());

        let mut min = vec2f(f32::MAX, f32::MAX);
        let mut max = vec2f(f32::MIN, f32::MIN);
        for segment in segments {
            min = min.min(segment.from()).min(segment.to());
            max = max.max(segment.from()).max(segment.to());
        }
        assert!(min.approx_eq(vec2f(-1.0, -1.0), 1e-4));
        assert!(max.approx_eq(vec2f(11.0, 1.0), 1e-4));
    }

    #[test]
    fn test_round_cap_semicircles() {
        let path = Outline::from_segments(vec![line(0, vec2f(0.0, 0.0), vec2f(10.0, 0.0))]);
        let fill = stroke(&path, style(2.0, LineCap::Round));

        // One offset piece per side plus four arc segments per cap.
        assert_eq!(fill.len(), 10);
        let segments = fill.segments();
        assert!(segments[0]
            .from()
            .approx_eq(segments[segments.len() - 1].to(), 1e-4));

        // Cap points past the endpoints lie on the half-width circles.
        for segment in segments {
            for &point in &[segment.from(), segment.to()] {
                if point.x > 10.0 + 1e-3 {
                    assert!(((point - vec2f(10.0, 0.0)).length() - 1.0).abs() < 1e-3);
                }
                if point.x < -1e-3 {
                    assert!((point.length() - 1.0).abs() < 1e-3);
                }
            }
        }
    }

    struct ChordArcs(RefCell<Vec<(Vector2F, Vector2F, Vector2F, f32)>>);

    impl ArcTessellator for ChordArcs {
        fn tessellate(
            &self,
            from: Vector2F,
            focus1: Vector2F,
            focus2: Vector2F,
            sweep_angle: f32,
        ) -> Vec<Segment> {
            self.0
                .borrow_mut()
                .push((from, focus1, focus2, sweep_angle));
            // A straight chord to the antipode stands in for the arc.
            let to = from + focus1.scale(2.0);
            vec![Segment::line(0, LineSegment2F::new(from, to))]
        }
    }

    #[test]
    fn test_round_caps_delegate_to_the_tessellator() {
        let path = Outline::from_segments(vec![line(0, vec2f(0.0, 0.0), vec2f(10.0, 0.0))]);
        let arcs = ChordArcs(RefCell::new(vec![]));
        let mut stroker = OutlineStrokeToFill::new(&path, style(2.0, LineCap::Round), &arcs);
        stroker.offset();
        let fill = stroker.into_outline();

        let calls = arcs.0.borrow();
        assert_eq!(calls.len(), 2);
        for &(_, focus1, focus2, sweep_angle) in calls.iter() {
            assert_eq!(focus1, focus2);
            assert_eq!(sweep_angle, PI);
        }

        // With chord "arcs" the result is the flat-cap rectangle.
        assert_eq!(fill.len(), 4);
        assert_eq!(fill.segments()[0].from(), fill.segments()[3].to());
    }

    #[test]
    fn test_bevel_join_right_angle() {
        let path = Outline::from_segments(vec![
            line(0, vec2f(0.0, 0.0), vec2f(10.0, 0.0)),
            line(0, vec2f(10.0, 0.0), vec2f(10.0, 10.0)),
        ]);
        let fill = stroke(&path, style(2.0, LineCap::Flat));

        assert_eq!(fill.len(), 8);
        let segments = fill.segments();
        assert_eq!(segments[0].from(), segments[7].to());

        // The convex side gets a straight chamfer...
        assert!(segments.iter().any(|segment| {
            segment.from().approx_eq(vec2f(10.0, -1.0), 1e-4)
                && segment.to().approx_eq(vec2f(11.0, 0.0), 1e-4)
        }));
        // ...rather than a miter to the sharp corner.
        for segment in segments {
            assert!(!segment.from().approx_eq(vec2f(11.0, -1.0), 1e-3));
            assert!(!segment.to().approx_eq(vec2f(11.0, -1.0), 1e-3));
        }
        // The concave side folds back through the inner corner point.
        assert!(segments
            .iter()
            .any(|segment| segment.from().approx_eq(vec2f(9.0, 0.0), 1e-4)
                || segment.to().approx_eq(vec2f(9.0, 0.0), 1e-4)));
    }

    #[test]
    fn test_closed_contour_yields_two_closed_loops() {
        let contour = square_contour(false);
        let arcs = DefaultArcTessellator;
        let mut stroker = ContourStrokeToFill::new(&contour, 1.0, style(2.0, LineCap::Flat), &arcs);
        stroker.offset();
        let (rhs, lhs) = stroker.finish();
        let lhs = lhs.expect("closed contours keep both sides");

        // Four offset sides plus four bevel joins each.
        assert_eq!(rhs.len(), 8);
        assert_eq!(lhs.len(), 8);
        assert_eq!(rhs.segments()[0].from(), rhs.segments()[7].to());
        assert_eq!(lhs.segments()[0].from(), lhs.segments()[7].to());
    }

    #[test]
    fn test_closed_contour_loops_wind_oppositely() {
        for &flipped in &[false, true] {
            let contour = square_contour(flipped);
            let arcs = DefaultArcTessellator;
            let mut stroker =
                ContourStrokeToFill::new(&contour, 1.0, style(2.0, LineCap::Flat), &arcs);
            stroker.offset();
            let (rhs, lhs) = stroker.finish();
            let lhs = lhs.expect("closed contours keep both sides");

            let (outer, inner) = match Orientation::from_segments(&contour) {
                Orientation::Ccw => (rhs, lhs.reversed()),
                Orientation::Cw => (lhs, rhs.reversed()),
            };
            let outer_area = signed_area(outer.segments());
            let inner_area = signed_area(inner.segments());
            assert!(
                outer_area * inner_area < 0.0,
                "flipped={}: {} vs {}",
                flipped,
                outer_area,
                inner_area
            );
        }
    }

    #[test]
    fn test_stroked_ring_concatenates_both_loops() {
        let path = Outline::from_segments(square_contour(false));
        let fill = stroke(&path, style(2.0, LineCap::Flat));
        assert_eq!(fill.len(), 16);
    }

    fn distance_to_segment(point: Vector2F, from: Vector2F, to: Vector2F) -> f32 {
        let vector = to - from;
        let square_length = vector.square_length();
        if square_length == 0.0 {
            return (point - from).length();
        }
        let t = ((point - from).dot(vector) / square_length).max(0.0).min(1.0);
        (point - from.lerp(to, t)).length()
    }

    #[test]
    fn test_offset_stays_within_tolerance() {
        let curve = Segment::quadratic(
            0,
            LineSegment2F::new(vec2f(0.0, 0.0), vec2f(20.0, 0.0)),
            vec2f(10.0, 8.0),
        );
        for &d in &[2.0f32, -2.0] {
            let state = StrokeState::new(&curve, 2.0);
            let mut output = Outline::new();
            flatten_offset(&mut output, &state, d);
            assert!(output.len() > 10, "only {} pieces", output.len());

            for i in 0..=100 {
                let t = i as f32 / 100.0;
                let tangent = curve.derivative(t);
                let ideal = curve.sample(t) + tangent.rot90_cw().with_length(d);
                let distance = output
                    .segments()
                    .iter()
                    .map(|segment| distance_to_segment(ideal, segment.from(), segment.to()))
                    .fold(f32::MAX, f32::min);
                assert!(distance <= 2.0 * super::TOLERANCE, "t={}: {}", t, distance);
            }
        }
    }

    #[test]
    fn test_degenerate_segment_strokes_finite() {
        let point = vec2f(5.0, 5.0);
        let path = Outline::from_segments(vec![Segment::quadratic(
            0,
            LineSegment2F::new(point, point),
            point,
        )]);
        let fill = stroke(&path, style(4.0, LineCap::Flat));

        assert!(!fill.is_empty());
        for segment in fill.segments() {
            for &v in &[segment.from(), segment.ctrl, segment.to()] {
                assert!(v.x.is_finite() && v.y.is_finite(), "{:?}", segment);
            }
        }
    }
}
