/// Read-only row access over a row-major single-channel raster.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }

    /// True when the raster holds no pixels at all.
    fn is_degenerate(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    fn as_slice(&self) -> &[Self::Pixel];
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];

    fn as_mut_slice(&mut self) -> &mut [Self::Pixel];
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }
}

/// Implements [`ImageView`]/[`ImageViewMut`] for a struct with `w`, `h` and a
/// tightly packed `data: Vec<P>` field.
macro_rules! impl_packed_view {
    ($ty:ty, $pixel:ty) => {
        impl $crate::image::traits::ImageView for $ty {
            type Pixel = $pixel;

            #[inline]
            fn width(&self) -> usize {
                self.w
            }
            #[inline]
            fn height(&self) -> usize {
                self.h
            }
            #[inline]
            fn row(&self, y: usize) -> &[$pixel] {
                let start = y * self.w;
                &self.data[start..start + self.w]
            }
            #[inline]
            fn as_slice(&self) -> &[$pixel] {
                &self.data
            }
        }

        impl $crate::image::traits::ImageViewMut for $ty {
            #[inline]
            fn row_mut(&mut self, y: usize) -> &mut [$pixel] {
                let start = y * self.w;
                let end = start + self.w;
                &mut self.data[start..end]
            }
            #[inline]
            fn as_mut_slice(&mut self) -> &mut [$pixel] {
                &mut self.data
            }
        }
    };
}

pub(crate) use impl_packed_view;
