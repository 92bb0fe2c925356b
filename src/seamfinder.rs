use crate::error::Result;

/// This trait defines how we will return seams from an image.  It's a
/// primitive interface, just enough to make room for more than one
/// way of finding a seam.
pub trait SeamFinder {
    /// Request a left-to-right seam: one y coordinate per column.
    fn find_horizontal_seam(&self) -> Result<Vec<u32>>;

    /// Request a top-to-bottom seam: one x coordinate per row.
    fn find_vertical_seam(&self) -> Result<Vec<u32>>;
}
