//! Charts - layout, animated rendering, interaction and vector export
//!
//! This crate provides:
//! - Per-series configuration and palette color assignment
//! - Layout calculation for line, bar, 3-D bar and pie charts
//! - A `DrawingSurface` abstraction with raster (display list) and SVG backends
//! - Renderers with progressive animation driven by a host frame scheduler
//! - Tooltip hit-testing, drag-pan and wheel-zoom
//! - One-shot rendering and deterministic SVG export

mod animation;
mod canvas;
mod error;
mod export;
mod interaction;
mod layout;
mod model;
mod render;
mod series;
mod session;
mod styles;
mod surface;
mod svg;

pub use animation::*;
pub use canvas::*;
pub use error::*;
pub use export::*;
pub use interaction::*;
pub use layout::*;
pub use model::*;
pub use render::*;
pub use series::*;
pub use session::*;
pub use styles::*;
pub use surface::*;
pub use svg::*;

pub use table_model::Table;
