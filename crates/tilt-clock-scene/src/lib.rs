//! Software-rendered 3D clock scene for the tilt-clock terminal clock.
//!
//! The scene is a clock unit (backdrop, tick marks, numerals and hands)
//! that tilts as a whole in front of a fixed perspective camera. It is lit
//! by an ambient and a directional light, casts drop shadows onto the
//! backdrop, and is rasterized into half-block terminal cells.

mod assets;
mod color;
mod dial;
mod lighting;
mod raster;
mod texture;
mod view;

pub use assets::{AssetError, AssetLoader, AssetSlot, AssetSources, LoadedAsset};
pub use dial::{BACKDROP_Z, Dial, Hand, HandKind, Polygon};
pub use lighting::{Lighting, Material};
pub use raster::PixelBuffer;
pub use texture::Texture;
pub use view::ClockView;
