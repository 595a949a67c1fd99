//! Raster containers shared by every pipeline stage.
//!
//! - [`GrayscaleImage`]: owned 8-bit intensities, row-major, origin top-left.
//! - [`BinaryMask`]: owned foreground/background flags with the same layout.
//!
//! Both expose rows through [`ImageView`]; stride always equals width. The
//! `imageproc` operators run on `image::GrayImage` copies produced by
//! `to_gray_image` and read back with `from_gray_image`.
pub mod gray;
pub mod io;
pub mod mask;
pub mod traits;

pub use self::gray::GrayscaleImage;
pub use self::mask::BinaryMask;
pub use self::traits::{ImageView, ImageViewMut, Rows};
