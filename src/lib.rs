//! Software rasterization and pixel-compositing core for embedded
//! displays.
//!
//! The crate converts logical colors into device pixel encodings and
//! paints shapes, images and rotated/zoomed bitmaps onto anything that
//! implements the [`Surface`] capability - a panel driver or an
//! in-memory [`SpriteSurface`]. All drawing flows through run-coalesced
//! surface writes; nothing in here talks to hardware directly.

pub mod affine;
pub mod color;
pub mod compositor;
pub mod context;
pub mod palette;
pub mod pixelcopy;
pub mod raster;
pub mod surface;

pub use color::{Color, ColorDepth};
pub use context::{GraphicsContext, Rect};
pub use palette::Palette;
pub use pixelcopy::{PixelCopy, PixelSource, FP_ONE, FP_SHIFT};
pub use surface::{SpriteSurface, SpriteError, Surface};
