// broadpen/geometry/src/line_segment.rs
//
// Copyright © 2026 The Broadpen Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Line segment types.

use crate::vector::Vector2F;

/// A line segment with explicit start and end points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineSegment2F {
    from: Vector2F,
    to: Vector2F,
}

impl LineSegment2F {
    #[inline]
    pub fn new(from: Vector2F, to: Vector2F) -> LineSegment2F {
        LineSegment2F { from, to }
    }

    #[allow(clippy::wrong_self_convention)]
    #[inline]
    pub fn from(&self) -> Vector2F {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Vector2F {
        self.to
    }

    /// The vector from the start point to the endpoint.
    #[inline]
    pub fn vector(&self) -> Vector2F {
        self.to - self.from
    }

    #[inline]
    pub fn midpoint(&self) -> Vector2F {
        self.from.lerp(self.to, 0.5)
    }

    #[inline]
    pub fn reversed(&self) -> LineSegment2F {
        LineSegment2F::new(self.to, self.from)
    }

    #[inline]
    pub fn square_length(&self) -> f32 {
        self.vector().square_length()
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.vector().length()
    }

    #[inline]
    pub fn sample(&self, t: f32) -> Vector2F {
        self.from.lerp(self.to, t)
    }
}

#[cfg(test)]
mod test {
    use super::LineSegment2F;
    use crate::vector::vec2f;

    #[test]
    fn test_basic_queries() {
        let segment = LineSegment2F::new(vec2f(1.0, 2.0), vec2f(4.0, 6.0));
        assert_eq!(segment.vector(), vec2f(3.0, 4.0));
        assert_eq!(segment.length(), 5.0);
        assert_eq!(segment.square_length(), 25.0);
        assert_eq!(segment.midpoint(), vec2f(2.5, 4.0));
        assert_eq!(segment.sample(0.0), segment.from());
        assert_eq!(segment.sample(1.0), segment.to());
    }

    #[test]
    fn test_reversed() {
        let segment = LineSegment2F::new(vec2f(1.0, 2.0), vec2f(4.0, 6.0));
        assert_eq!(segment.reversed().from(), segment.to());
        assert_eq!(segment.reversed().reversed(), segment);
    }
}
