use serde::{Deserialize, Serialize};

/// Immutable per-run parameters. The nail ring radius is
/// `size / 2 - margin`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of nails on the ring.
    pub nails: usize,
    /// Maximum number of path entries, the start nail included.
    pub max_lines: usize,
    /// Side of the square working raster, in pixels.
    pub size: usize,
    /// Gap between the ring and the raster border, in pixels.
    pub margin: f32,
    /// Sample points per candidate segment.
    pub samples: usize,
    /// Brightening applied to each consumed sample cell.
    pub brighten: u8,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            nails: 200,
            max_lines: 5000,
            size: 360,
            margin: 12.0,
            samples: 80,
            brighten: 10,
        }
    }
}

impl RunConfig {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.size == 0 {
            Err(Error::MinRasterSize)
        } else if self.max_lines == 0 {
            Err(Error::MinLineCount)
        } else if self.samples == 0 {
            Err(Error::MinSampleCount)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Raster size must be greater or equal to 1")]
    MinRasterSize,
    #[error("Max line count must be greater or equal to 1")]
    MinLineCount,
    #[error("Sample count must be greater or equal to 1")]
    MinSampleCount,
}
