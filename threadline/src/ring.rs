use num_traits::AsPrimitive;

use crate::{
    geometry::Point,
    verboser::{self, Message},
    Float,
};

/// Nails evenly spread on a circle, identified by their index.
#[derive(Clone)]
pub struct NailRing<S> {
    nails: Vec<Point<S>>,
}

impl<S: Float> NailRing<S> {
    /// Nail `i` sits at angle `2π·i/count`, measured from the positive x
    /// axis, at `radius` from `center`.
    pub fn circular(
        center: Point<S>,
        radius: S,
        count: usize,
        verboser: &mut impl verboser::Verboser,
    ) -> Result<Self, Error>
    where
        usize: AsPrimitive<S>,
    {
        if count == 0 {
            return Err(Error::MinNailCount);
        }
        Ok(Self {
            nails: (0..count)
                .map(|i| {
                    verboser.verbose(Message::PlacingNail(i));
                    let theta: S = S::TWO * S::PI * i.as_() / count.as_();
                    Point {
                        x: center.x + radius * theta.cos(),
                        y: center.y + radius * theta.sin(),
                    }
                })
                .collect(),
        })
    }

    pub fn nails(&self) -> &[Point<S>] {
        &self.nails
    }

    pub fn len(&self) -> usize {
        self.nails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nails.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Nail count must be greater or equal to 1")]
    MinNailCount,
}

#[cfg(test)]
mod tests {
    use super::{Error, NailRing};
    use crate::{geometry::Point, verboser::Silent};

    #[test]
    fn first_nail_lies_on_the_positive_x_axis() {
        let ring =
            NailRing::<f32>::circular(Point::new(5.0, 5.0), 4.0, 4, &mut Silent).unwrap();
        assert_eq!(ring.len(), 4);
        let first = ring.nails()[0];
        assert!((first.x - 9.0).abs() < 1e-5);
        assert!((first.y - 5.0).abs() < 1e-5);
    }

    #[test]
    fn opposite_nails_face_each_other() {
        let ring =
            NailRing::<f64>::circular(Point::new(0.0, 0.0), 10.0, 8, &mut Silent).unwrap();
        let a = ring.nails()[1];
        let b = ring.nails()[5];
        assert!((a.x + b.x).abs() < 1e-9);
        assert!((a.y + b.y).abs() < 1e-9);
    }

    #[test]
    fn zero_nails_is_rejected() {
        assert!(matches!(
            NailRing::<f32>::circular(Point::new(0.0, 0.0), 1.0, 0, &mut Silent),
            Err(Error::MinNailCount)
        ));
    }
}
