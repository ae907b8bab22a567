use image::DynamicImage;
use num_traits::AsPrimitive;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

use crate::{
    config::{self, RunConfig},
    geometry::{Point, Segment},
    path::PathSequence,
    raster::Raster,
    ring::{self, NailRing},
    verboser::Verboser,
    Float,
};

/// Greedy path builder. Owns the raster, the nail ring and the evolving
/// path; advances one segment per [`Tracer::step`] call.
pub struct Tracer<S = f32> {
    raster: Raster,
    ring: NailRing<S>,
    path: PathSequence,
    config: RunConfig,
}

impl<S: Float> Tracer<S>
where
    u8: AsPrimitive<S>,
    usize: AsPrimitive<S>,
    f32: AsPrimitive<S>,
{
    /// Resamples `source` into the working raster and seeds the path with
    /// `start`. Fails only on degenerate parameters, never at run time.
    pub fn new(
        source: &DynamicImage,
        config: RunConfig,
        start: usize,
        verboser: &mut impl Verboser,
    ) -> Result<Self, Error> {
        config.validate().map_err(Error::Config)?;
        Self::from_raster(Raster::from_image(source, config.size), config, start, verboser)
    }

    /// Variant for hosts that already own a grayscale buffer. The raster
    /// side must match `config.size`.
    pub fn from_raster(
        raster: Raster,
        config: RunConfig,
        start: usize,
        verboser: &mut impl Verboser,
    ) -> Result<Self, Error> {
        config.validate().map_err(Error::Config)?;
        if raster.grid().width != config.size {
            return Err(Error::RasterMismatch {
                expected: config.size,
                actual: raster.grid().width,
            });
        }
        let half: S = config.size.as_() * S::HALF;
        let ring = NailRing::circular(
            Point { x: half, y: half },
            half - config.margin.as_(),
            config.nails,
            verboser,
        )
        .map_err(Error::Ring)?;
        if start >= ring.len() {
            return Err(Error::StartOutOfRange {
                start,
                count: ring.len(),
            });
        }
        Ok(Self {
            raster,
            ring,
            path: PathSequence::new(start),
            config,
        })
    }

    /// Advances the path by exactly one segment.
    ///
    /// Candidate scoring runs against the raster as it stands on entry; the
    /// raster is only written after the winner is chosen, so the read and
    /// write phases of a step never interleave.
    pub fn step(&mut self) -> StepResult {
        if self.path.len() >= self.config.max_lines {
            return StepResult::Terminated(Termination::MaxLines);
        }
        let current = self.path.last();
        let next = match self.best_next(current) {
            Some(next) => next,
            None => return StepResult::Terminated(Termination::NoValidNext),
        };
        let segment = Segment::new(self.ring.nails()[current], self.ring.nails()[next]);
        self.path.push(next);
        self.consume(segment);
        if self.path.len() >= self.config.max_lines {
            StepResult::Terminated(Termination::MaxLines)
        } else {
            StepResult::Advanced(self.path.len())
        }
    }

    /// Average uncovered darkness along the segment between two nails.
    /// Read-only: repeated calls without an intervening [`Tracer::step`]
    /// return the same value. Panics when either index is out of the ring.
    pub fn score(&self, from: usize, to: usize) -> S {
        self.score_segment(Segment::new(self.ring.nails()[from], self.ring.nails()[to]))
    }

    fn best_next(&self, current: usize) -> Option<usize> {
        let nails = self.ring.nails();
        if nails.len() < 2 {
            return None;
        }
        let anchor = nails[current];
        let scores: Vec<S> = nails
            .par_iter()
            .enumerate()
            .map(|(candidate, &nail)| {
                if candidate == current {
                    -S::INFINITY
                } else {
                    self.score_segment(Segment::new(anchor, nail))
                }
            })
            .collect();
        let mut best_weight = -S::INFINITY;
        let mut best = None;
        for (candidate, &weight) in scores.iter().enumerate() {
            // Strictly greater: equal maxima resolve to the lowest index.
            if weight > best_weight {
                best_weight = weight;
                best = Some(candidate);
            }
        }
        best
    }

    fn score_segment(&self, segment: Segment<S>) -> S {
        let mut total = S::ZERO;
        for index in self.raster.grid().sample_indexes(segment, self.config.samples) {
            // SAFETY: the grid only yields indexes inside the raster.
            total += S::TWO_FIVE_FIVE - unsafe { self.raster.get_unchecked(index) }.as_();
        }
        // Out-of-bounds samples contribute nothing but still count in the
        // divisor.
        total / self.config.samples.as_()
    }

    fn consume(&mut self, segment: Segment<S>) {
        let grid = *self.raster.grid();
        let increment = self.config.brighten;
        let limit = u8::MAX - increment;
        for index in grid.sample_indexes(segment, self.config.samples) {
            // SAFETY: the grid only yields indexes inside the raster.
            let value = unsafe { self.raster.get_unchecked_mut(index) };
            // Cells strictly within one increment of white stay untouched.
            if *value <= limit {
                *value = value.saturating_add(increment);
            }
        }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn ring(&self) -> &NailRing<S> {
        &self.ring
    }

    pub fn path(&self) -> &PathSequence {
        &self.path
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn build_instructions(&self) -> String {
        self.path.build_instructions()
    }

    pub fn build_svg(&self, line_thickness: f32) -> svg::Document {
        let side = self.raster.grid().width as f32;
        let mut doc = svg::Document::new().set("viewBox", (0.0, 0.0, side, side));
        for &nail in self.ring.nails() {
            doc = doc.add(
                svg::node::element::Circle::new()
                    .set("cx", format!("{:.4}", nail.x))
                    .set("cy", format!("{:.4}", nail.y))
                    .set("r", 2)
                    .set("fill", "black"),
            );
        }
        for pair in self.path.windows(2) {
            let start = self.ring.nails()[pair[0]];
            let end = self.ring.nails()[pair[1]];
            doc = doc.add(
                svg::node::element::Line::new()
                    .set("x1", format!("{:.4}", start.x))
                    .set("y1", format!("{:.4}", start.y))
                    .set("x2", format!("{:.4}", end.x))
                    .set("y2", format!("{:.4}", end.y))
                    .set("stroke", "black")
                    .set("stroke-width", format!("{:.4}", line_thickness))
                    .set("opacity", 0.2),
            );
        }
        doc
    }
}

/// Outcome of a single [`Tracer::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// A segment was appended; carries the new path length.
    Advanced(usize),
    /// Normal run completion, not a failure. The raster was only mutated
    /// when the terminating step also appended a segment.
    Terminated(Termination),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    MaxLines,
    NoValidNext,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MaxLines => write!(f, "max line count reached"),
            Self::NoValidNext => write!(f, "no valid next nail"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Ring(ring::Error),
    #[error(transparent)]
    Config(config::Error),
    #[error("Start nail {start} is out of range for a ring of {count} nails")]
    StartOutOfRange { start: usize, count: usize },
    #[error("Raster is {actual} pixels per side but the run is configured for {expected}")]
    RasterMismatch { expected: usize, actual: usize },
}
