//! Height-ordered pixel merge.
//!
//! A contribution replaces the destination pixel when it stands strictly
//! higher, and is XOR-mixed into it when it stands at exactly the same
//! height. Lower contributions are dropped. The mix is commutative, so the
//! result for one tick does not depend on the order tracks are visited.

use crate::color::Color;
use crate::surface::Surface;

/// Destination height before any contribution lands in a tick.
pub const FLOOR: f32 = f32::NEG_INFINITY;

/// Merge one contribution into a destination pixel. Returns the new color
/// and height, or `None` if the destination is unchanged.
#[must_use]
pub fn merge_pixel(
    dest: Color,
    dest_height: f32,
    src: Color,
    src_height: f32,
) -> Option<(Color, f32)> {
    if src_height == dest_height {
        Some((dest ^ src, dest_height))
    } else if src_height > dest_height {
        Some((src, src_height))
    } else {
        None
    }
}

/// Merge every pixel of `src` into `dest` through `pixmap`.
///
/// `pixmap[i]` is the destination index of source pixel `i` and
/// `src_heights[i]` its height; a missing height counts as zero. Destination
/// heights are updated in place. Indices past the destination are skipped.
pub fn blend_into(
    dest: &mut dyn Surface,
    dest_heights: &mut [f32],
    src: &dyn Surface,
    src_heights: &[f32],
    pixmap: &[usize],
) {
    for (local, &target) in pixmap.iter().enumerate() {
        let Some(height) = dest_heights.get_mut(target) else {
            continue;
        };
        let src_height = src_heights.get(local).copied().unwrap_or(0.0);
        if let Some((color, merged)) =
            merge_pixel(dest.get(target), *height, src.get(local), src_height)
        {
            dest.set(target, color);
            *height = merged;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelBuffer;

    #[test]
    fn higher_contribution_overwrites() {
        let merged = merge_pixel(Color::RED, 3.0, Color::BLUE, 5.0);
        assert_eq!(merged, Some((Color::BLUE, 5.0)));
        assert_eq!(merge_pixel(Color::RED, 5.0, Color::BLUE, 3.0), None);
    }

    #[test]
    fn first_contribution_beats_floor() {
        let merged = merge_pixel(Color::WHITE, FLOOR, Color::GREEN, -1000.0);
        assert_eq!(merged, Some((Color::GREEN, -1000.0)));
    }

    #[test]
    fn tie_is_commutative_xor() {
        let a = Color(255, 0, 0);
        let b = Color(0, 255, 0);
        let ab = merge_pixel(a, 0.0, b, 0.0).unwrap().0;
        let ba = merge_pixel(b, 0.0, a, 0.0).unwrap().0;
        assert_eq!(ab, Color(255, 255, 0));
        assert_eq!(ab, ba);
    }

    #[test]
    fn blend_follows_pixmap() {
        let mut dest = PixelBuffer::strip(4);
        let mut heights = vec![FLOOR; 4];
        let mut src = PixelBuffer::strip(2);
        src.set(0, Color::RED);
        src.set(1, Color::BLUE);

        blend_into(&mut dest, &mut heights, &src, &[1.0, 2.0], &[3, 0]);

        assert_eq!(dest.pixels(), &[Color::BLUE, Color::BLACK, Color::BLACK, Color::RED]);
        assert_eq!(heights, vec![2.0, FLOOR, FLOOR, 1.0]);
    }

    #[test]
    fn out_of_range_targets_are_skipped() {
        let mut dest = PixelBuffer::strip(1);
        let mut heights = vec![FLOOR];
        let mut src = PixelBuffer::strip(2);
        src.set(1, Color::WHITE);
        blend_into(&mut dest, &mut heights, &src, &[], &[0, 7]);
        assert_eq!(dest.pixels(), &[Color::BLACK]);
        assert_eq!(heights, vec![0.0]);
    }
}
