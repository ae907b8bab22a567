pub mod geometry {
    pub mod point;
    pub mod segment;

    pub use point::Point;
    pub use segment::Segment;
}

pub mod config;
mod float;
pub mod grid;
mod path;
pub mod raster;
pub mod ring;
mod tracer;
pub mod verboser;

pub use config::RunConfig;
pub use float::Float;
pub use grid::Grid;
pub use path::PathSequence;
pub use raster::Raster;
pub use ring::NailRing;
pub use tracer::*;
