//! Writes the final mask into the alpha channel

use crate::{
    error::{BgRemovalError, Result},
    types::{Mask, PixelBuffer},
};

/// Produce an RGBA buffer whose alpha is 0 on background and 255 elsewhere
///
/// Color channels are copied unchanged. Any alpha present in the source is
/// replaced.
pub fn composite(buffer: &PixelBuffer, mask: &Mask) -> Result<PixelBuffer> {
    if buffer.dimensions() != mask.dimensions() {
        let (bw, bh) = buffer.dimensions();
        let (mw, mh) = mask.dimensions();
        return Err(BgRemovalError::processing(format!(
            "Mask is {}x{} but image is {}x{}",
            mw, mh, bw, bh
        )));
    }

    let channels = usize::from(buffer.channels());
    let mut rgba = Vec::with_capacity(buffer.pixel_count() * 4);
    for (pixel, &background) in buffer.as_bytes().chunks_exact(channels).zip(mask.as_slice()) {
        rgba.extend_from_slice(&pixel[..3]);
        rgba.push(if background { 0 } else { 255 });
    }

    let (width, height) = buffer.dimensions();
    PixelBuffer::new(rgba, width, height, 4)
}
