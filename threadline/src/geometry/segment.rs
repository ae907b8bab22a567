use std::fmt;

use num_traits::AsPrimitive;

use super::Point;
use crate::Float;

#[derive(Clone, Copy)]
pub struct Segment<T> {
    pub start: Point<T>,
    pub end: Point<T>,
}

impl<T> Segment<T> {
    pub fn new(start: Point<T>, end: Point<T>) -> Self {
        Self { start, end }
    }
}

impl<T: fmt::Display> fmt::Display for Segment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:2}, {:2}]", self.start, self.end)
    }
}

impl<T: Float> Segment<T> {
    /// Floored interpolation points at `t = s / steps` for `s in 0..steps`.
    /// The end point itself is never sampled.
    pub fn sample_points(self, steps: usize) -> impl Iterator<Item = Point<T>>
    where
        usize: AsPrimitive<T>,
    {
        let delta = self.end - self.start;
        (0..steps).map(move |s| (self.start + delta * (s.as_() / steps.as_())).floor())
    }
}
