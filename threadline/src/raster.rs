use image::{imageops::FilterType, DynamicImage, RgbImage};

use crate::{geometry::Point, Grid};

/// Square single-channel grayscale buffer, 0 = black, 255 = white.
#[derive(Clone)]
pub struct Raster {
    values: Vec<u8>,
    grid: Grid,
}

impl Raster {
    /// Resamples `source` to `size`×`size` and keeps the luma channel.
    pub fn from_image(source: &DynamicImage, size: usize) -> Self {
        let gray = source
            .resize_exact(size as u32, size as u32, FilterType::Lanczos3)
            .into_luma8();
        Self {
            values: gray.into_raw(),
            grid: Grid::square(size),
        }
    }

    /// `None` when the buffer length is not `size`×`size`.
    pub fn from_vec(values: Vec<u8>, size: usize) -> Option<Self> {
        if values.len() == size * size {
            Some(Self {
                values,
                grid: Grid::square(size),
            })
        } else {
            None
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn get(&self, point: Point<usize>) -> Option<u8> {
        self.grid
            .index_of(point)
            .map(|index| unsafe { *self.values.get_unchecked(index) })
    }

    pub(crate) unsafe fn get_unchecked(&self, index: usize) -> u8 {
        *self.values.get_unchecked(index)
    }

    pub(crate) unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut u8 {
        self.values.get_unchecked_mut(index)
    }

    /// Gray channel replicated into the three color components, for display
    /// collaborators working in RGB.
    pub fn to_rgb(&self) -> RgbImage {
        let mut buffer = Vec::with_capacity(self.values.len() * 3);
        for &value in &self.values {
            buffer.extend_from_slice(&[value, value, value]);
        }
        // SAFETY: the buffer holds exactly width * height * 3 bytes.
        unsafe {
            RgbImage::from_vec(self.grid.width as u32, self.grid.height as u32, buffer)
                .unwrap_unchecked()
        }
    }
}
