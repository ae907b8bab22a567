use num_traits::{AsPrimitive, NumCast, Unsigned};

use crate::{
    geometry::{Point, Segment},
    Float,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid<T = usize> {
    pub height: T,
    pub width: T,
}

impl<T> Grid<T> {
    pub fn new(height: T, width: T) -> Self {
        Self { height, width }
    }
}

impl<T: Copy> Grid<T> {
    pub fn square(side: T) -> Self {
        Self {
            height: side,
            width: side,
        }
    }
}

impl<T: NumCast + Unsigned + PartialOrd + Copy> Grid<T> {
    /// Row-major cell indexes under the sample points of `segment`.
    /// Samples landing outside the grid are dropped, not clamped.
    pub fn sample_indexes<F: Float>(
        &self,
        segment: Segment<F>,
        steps: usize,
    ) -> impl Iterator<Item = T> + '_
    where
        usize: AsPrimitive<F>,
    {
        segment
            .sample_points(steps)
            .filter_map(|point| point.cast().and_then(|point| self.index_of(point)))
    }

    pub fn index_of(&self, point: Point<T>) -> Option<T> {
        if point.x < self.width && point.y < self.height {
            Some(point.y * self.width + point.x)
        } else {
            None
        }
    }
}
