//! Tile geometry sampling on the cube-sphere.
//!
//! [`generate_tile`] turns a [`TileCode`](orbis_cubesphere::TileCode) into a
//! grid of double-precision surface points and colors, querying a
//! [`SurfaceProvider`] for elevation. [`TileGenerator`] runs the same work on
//! a background thread pool. Render-space copies are produced only through
//! [`Tile::to_render_space`].

pub mod async_generation;
pub mod color;
pub mod error;
pub mod grid;
pub mod provider;
pub mod sampler;
pub mod tile;

pub use async_generation::{
    GeneratedTile, SharedProvider, TileGenerator, TileRequest, default_thread_count,
};
pub use color::Color;
pub use error::TileGenerationError;
pub use grid::Grid;
pub use provider::{
    ConstantSurface, NoiseParams, NoiseSurface, ProviderError, SurfaceProvider, SurfaceSample,
};
pub use sampler::{TileSettings, generate_tile};
pub use tile::{RenderTile, Tile, TileSpace};
