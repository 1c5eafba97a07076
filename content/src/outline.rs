// broadpen/content/src/outline.rs
//
// Copyright © 2026 The Broadpen Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Ordered sequences of segments, grouped into contours.

use crate::arc::ArcTessellator;
use crate::segment::Segment;
use broadpen_geometry::line_segment::LineSegment2F;
use broadpen_geometry::vector::Vector2F;

/// An ordered sequence of contour-tagged quadratic Bézier segments.
///
/// Within a contour, consecutive segments are endpoint-continuous. A
/// contour whose first point equals its last point is closed; all others
/// are open. The outline owns its buffer and is handed around by value, so
/// an accumulator never aliases slices of itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outline {
    segments: Vec<Segment>,
}

impl Outline {
    /// Creates a new empty outline.
    #[inline]
    pub fn new() -> Outline {
        Outline { segments: vec![] }
    }

    /// Creates an outline from a sequence of segments.
    #[inline]
    pub fn from_segments<I>(segments: I) -> Outline
    where
        I: IntoIterator<Item = Segment>,
    {
        Outline {
            segments: segments.into_iter().collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment)
    }

    /// The point new segments continue from, i.e. the endpoint of the last
    /// segment. The outline must not be empty.
    #[inline]
    pub fn pen(&self) -> Vector2F {
        debug_assert!(!self.is_empty());
        self.segments[self.segments.len() - 1].to()
    }

    /// Appends a straight segment from the pen to `to`, continuing the
    /// current contour.
    pub fn line_to(&mut self, to: Vector2F) {
        let contour = self.segments[self.segments.len() - 1].contour;
        let baseline = LineSegment2F::new(self.pen(), to);
        self.segments.push(Segment::line(contour, baseline));
    }

    /// Appends an arc swept from the pen, decoded into quadratic segments
    /// by `arcs`. `focus1` and `focus2` are relative to the pen.
    pub fn arc_to<A>(&mut self, arcs: &A, focus1: Vector2F, focus2: Vector2F, sweep_angle: f32)
    where
        A: ArcTessellator,
    {
        let pen = self.pen();
        let contour = self.segments[self.segments.len() - 1].contour;
        for mut segment in arcs.tessellate(pen, focus1, focus2, sweep_angle) {
            segment.contour = contour;
            self.segments.push(segment);
        }
    }

    /// Declares the current contour finished. Contours are closed by making
    /// the last point coincide with the first, so there is nothing to
    /// record.
    #[inline]
    pub fn close(&mut self) {}

    /// Returns this outline with the segment order reversed and every
    /// segment's endpoints swapped.
    pub fn reversed(&self) -> Outline {
        Outline {
            segments: self.segments.iter().rev().map(Segment::reversed).collect(),
        }
    }

    /// Concatenates `other` onto the end of this outline.
    pub fn append(&mut self, other: Outline) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            self.segments = other.segments;
            return;
        }
        self.segments.extend(other.segments);
    }

    /// Splits this outline into per-contour runs, in original order.
    #[inline]
    pub fn contours(&self) -> Contours {
        Contours {
            segments: &self.segments,
        }
    }
}

/// Iterator over the contour runs of an outline, split at contour-tag
/// changes.
pub struct Contours<'a> {
    segments: &'a [Segment],
}

impl<'a> Iterator for Contours<'a> {
    type Item = &'a [Segment];

    fn next(&mut self) -> Option<&'a [Segment]> {
        if self.segments.is_empty() {
            return None;
        }
        let contour = self.segments[0].contour;
        let end = self
            .segments
            .iter()
            .position(|segment| segment.contour != contour)
            .unwrap_or(self.segments.len());
        let (run, rest) = self.segments.split_at(end);
        self.segments = rest;
        Some(run)
    }
}
