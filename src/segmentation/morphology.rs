//! Morphological mask cleanup
//!
//! Every pass takes an owned mask and returns a new one. Reads always come
//! from the input grid, so the order in which pixels are visited never
//! affects the result. Pixels inside the margin of a pass are copied through.

use crate::types::Mask;

/// Neighbors (of 25) that must agree before erosion or dilation flips a pixel
pub const MAJORITY_5X5: usize = 18;

/// Background counts in this range are treated as a jittery boundary
pub const SMOOTHING_RANGE: std::ops::RangeInclusive<usize> = 5..=7;

/// Background count threshold applied inside `SMOOTHING_RANGE`
pub const SMOOTHING_CUTOFF: usize = 5;

/// Count background pixels in the square window of the given radius
///
/// The center pixel is included when `include_center` is set.
fn background_in_window(mask: &Mask, x: u32, y: u32, radius: u32, include_center: bool) -> usize {
    let mut count = 0;
    for ny in y - radius..=y + radius {
        for nx in x - radius..=x + radius {
            if !include_center && nx == x && ny == y {
                continue;
            }
            if mask.get(nx, ny) {
                count += 1;
            }
        }
    }
    count
}

/// Apply `rule` to every pixel at least `margin` away from the frame
fn window_pass<F>(input: Mask, margin: u32, mut rule: F) -> Mask
where
    F: FnMut(&Mask, u32, u32) -> bool,
{
    let (width, height) = input.dimensions();
    if width <= 2 * margin || height <= 2 * margin {
        return input;
    }

    let mut output = input.clone();
    for y in margin..height - margin {
        for x in margin..width - margin {
            output.set(x, y, rule(&input, x, y));
        }
    }
    output
}

/// 5×5 erosion of the foreground
///
/// A foreground pixel becomes background when at least 18 of the 25 window
/// pixels are background.
#[must_use]
pub fn erode(mask: Mask) -> Mask {
    window_pass(mask, 2, |m, x, y| {
        m.get(x, y) || background_in_window(m, x, y, 2, true) >= MAJORITY_5X5
    })
}

/// 5×5 dilation of the foreground
///
/// A background pixel becomes foreground when at least 18 of the 25 window
/// pixels are foreground.
#[must_use]
pub fn dilate(mask: Mask) -> Mask {
    window_pass(mask, 2, |m, x, y| {
        let foreground = 25 - background_in_window(m, x, y, 2, true);
        m.get(x, y) && foreground < MAJORITY_5X5
    })
}

/// Remove isolated background pixels
#[must_use]
pub fn open(mask: Mask) -> Mask {
    window_pass(mask, 1, |m, x, y| {
        m.get(x, y) && background_in_window(m, x, y, 1, false) > 0
    })
}

/// Settle borderline pixels using the 3×3 background count, center included
#[must_use]
pub fn smooth_edges(mask: Mask) -> Mask {
    window_pass(mask, 1, |m, x, y| {
        let count = background_in_window(m, x, y, 1, true);
        if SMOOTHING_RANGE.contains(&count) {
            count >= SMOOTHING_CUTOFF
        } else {
            m.get(x, y)
        }
    })
}

/// Erode, dilate, open, then smooth
#[must_use]
pub fn clean(mask: Mask) -> Mask {
    smooth_edges(open(dilate(erode(mask))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_split(width: u32, height: u32, split: u32) -> Mask {
        Mask::from_fn(width, height, |x, _| x < split)
    }

    #[test]
    fn test_erode_fills_speck_of_foreground() {
        let mut mask = Mask::filled(9, 9, true);
        mask.set(4, 4, false);
        let eroded = erode(mask);
        assert!(eroded.get(4, 4));
    }

    #[test]
    fn test_dilate_fills_hole_in_foreground() {
        let mut mask = Mask::filled(9, 9, false);
        mask.set(4, 4, true);
        mask.set(5, 4, true);
        let dilated = dilate(mask);
        assert!(!dilated.get(4, 4));
        assert!(!dilated.get(5, 4));
    }

    #[test]
    fn test_open_removes_isolated_background() {
        let mut mask = Mask::new(5, 5);
        mask.set(2, 2, true);
        let opened = open(mask);
        assert_eq!(opened.background_count(), 0);

        // A pair of background pixels supports itself
        let mut mask = Mask::new(5, 5);
        mask.set(2, 2, true);
        mask.set(3, 2, true);
        assert_eq!(open(mask).background_count(), 2);
    }

    #[test]
    fn test_smoothing_rule() {
        // Five background pixels in the window around (1, 1), center foreground
        let mut mask = Mask::new(3, 3);
        for (x, y) in [(0, 0), (1, 0), (2, 0), (0, 1), (2, 1)] {
            mask.set(x, y, true);
        }
        let smoothed = smooth_edges(mask);
        assert!(smoothed.get(1, 1));

        // Four background pixels is outside the range: unchanged
        let mut mask = Mask::new(3, 3);
        for (x, y) in [(0, 0), (1, 0), (2, 0), (0, 1)] {
            mask.set(x, y, true);
        }
        assert!(!smooth_edges(mask).get(1, 1));
    }

    #[test]
    fn test_margin_pixels_are_untouched() {
        let mut mask = Mask::filled(8, 8, true);
        mask.set(0, 0, false);
        mask.set(1, 7, false);
        let eroded = erode(mask.clone());
        assert!(!eroded.get(0, 0));
        assert!(!eroded.get(1, 7));
    }

    #[test]
    fn test_small_masks_pass_through() {
        let mut mask = Mask::new(4, 4);
        mask.set(1, 1, true);
        assert_eq!(erode(mask.clone()), mask);
        assert_eq!(dilate(mask.clone()), mask);
        assert_eq!(clean(Mask::new(2, 2)), Mask::new(2, 2));
    }

    #[test]
    fn test_clean_is_noop_on_consistent_masks() {
        for mask in [
            Mask::filled(20, 20, true),
            Mask::filled(20, 20, false),
            vertical_split(20, 20, 10),
            vertical_split(31, 17, 4),
        ] {
            let cleaned = clean(mask.clone());
            assert_eq!(cleaned.diff_count(&mask), 0);
        }
    }

    #[test]
    fn test_clean_removes_salt_noise() {
        let mut mask = Mask::filled(20, 20, true);
        mask.set(10, 10, false);
        mask.set(5, 14, false);
        let cleaned = clean(mask);
        assert_eq!(cleaned.background_count(), 400);
    }
}
