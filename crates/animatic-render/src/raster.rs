//! CPU raster primitives the transitions and compositor build on.
//!
//! All operations work on straight-alpha RGBA8 surfaces. The per-frame
//! hot paths (panel sampling, full-surface blends) are row-parallel.

use animatic_core::{blend_rgba, Bitmap, Color, Rect, Surface};
use animatic_timeline::KenBurnsTransform;
use rayon::prelude::*;

/// Copy `src` over `out` wholesale. Surfaces must be the same size.
pub fn copy(out: &mut Surface, src: &Surface) {
    debug_assert_eq!(out.size(), src.size());
    out.data_mut().copy_from_slice(src.data());
}

/// Blend `src` over `out` with a global alpha multiplier in `[0,1]`.
pub fn blend_over(out: &mut Surface, src: &Surface, alpha: f32) {
    debug_assert_eq!(out.size(), src.size());
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let row_len = out.width() as usize * 4;
    let src_data = src.data();
    out.data_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let src_row = &src_data[y * row_len..(y + 1) * row_len];
            for (dst_px, src_px) in row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
                let a = (src_px[3] as f32 * alpha).round() as u8;
                blend_rgba(dst_px, [src_px[0], src_px[1], src_px[2], a]);
            }
        });
}

/// Fill a rectangle with a color, alpha-blending over existing pixels.
pub fn fill_rect(out: &mut Surface, rect: Rect, color: Color) {
    let bounds = Rect::new(0.0, 0.0, out.width() as f32, out.height() as f32);
    let Some(clipped) = bounds.intersection(rect) else {
        return;
    };
    let rgba = color.to_rgba8();
    let x0 = clipped.x as u32;
    let y0 = clipped.y as u32;
    let x1 = (clipped.x + clipped.width).ceil() as u32;
    let y1 = (clipped.y + clipped.height).ceil() as u32;
    for y in y0..y1.min(out.height()) {
        for x in x0..x1.min(out.width()) {
            out.blend_pixel(x, y, rgba);
        }
    }
}

/// Copy the pixels of `src` that fall inside `region` (surface
/// coordinates) into `out`, leaving everything else untouched. This is
/// the clipped draw the wipe transitions use.
pub fn copy_region(out: &mut Surface, src: &Surface, region: Rect) {
    debug_assert_eq!(out.size(), src.size());
    let bounds = Rect::new(0.0, 0.0, out.width() as f32, out.height() as f32);
    let Some(clipped) = bounds.intersection(region) else {
        return;
    };
    let x0 = clipped.x as usize;
    let y0 = clipped.y as usize;
    let x1 = ((clipped.x + clipped.width).ceil() as usize).min(out.width() as usize);
    let y1 = ((clipped.y + clipped.height).ceil() as usize).min(out.height() as usize);
    let row_len = out.width() as usize * 4;
    let src_data = src.data();
    let data = out.data_mut();
    for y in y0..y1 {
        let start = y * row_len + x0 * 4;
        let end = y * row_len + x1 * 4;
        data[start..end].copy_from_slice(&src_data[start..end]);
    }
}

/// Copy `src` translated by (dx, dy). Destination pixels with no source
/// are left untouched. Both panels of a push are drawn this way.
pub fn copy_offset(out: &mut Surface, src: &Surface, dx: i32, dy: i32) {
    debug_assert_eq!(out.size(), src.size());
    let w = out.width() as i32;
    let h = out.height() as i32;
    let row_len = out.width() as usize * 4;
    let src_data = src.data();
    let data = out.data_mut();
    for y in 0..h {
        let sy = y - dy;
        if sy < 0 || sy >= h {
            continue;
        }
        // visible x range: 0 <= x < w and 0 <= x-dx < w
        let x_start = dx.max(0);
        let x_end = (w + dx).min(w);
        if x_start >= x_end {
            continue;
        }
        let dst_off = y as usize * row_len + x_start as usize * 4;
        let src_off = sy as usize * row_len + (x_start - dx) as usize * 4;
        let len = (x_end - x_start) as usize * 4;
        data[dst_off..dst_off + len].copy_from_slice(&src_data[src_off..src_off + len]);
    }
}

/// Blend `src` scaled uniformly about the surface center, with a global
/// alpha. Used by the zoom transitions.
pub fn blend_scaled_centered(out: &mut Surface, src: &Surface, scale: f32, alpha: f32) {
    debug_assert_eq!(out.size(), src.size());
    if scale <= 0.0 {
        return;
    }
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let w = out.width();
    let h = out.height();
    let cx = w as f32 * 0.5;
    let cy = h as f32 * 0.5;
    let row_len = w as usize * 4;
    let src_bmp = Bitmap::from_surface(src);
    out.data_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w as usize {
                let sx = (x as f32 - cx) / scale + cx;
                let sy = (y as f32 - cy) / scale + cy;
                if sx < -0.5 || sy < -0.5 || sx > w as f32 - 0.5 || sy > h as f32 - 0.5 {
                    continue;
                }
                let mut px = src_bmp.sample_bilinear(sx, sy);
                px[3] = (px[3] as f32 * alpha).round() as u8;
                blend_rgba(&mut row[x * 4..x * 4 + 4], px);
            }
        });
}

/// Draw a bitmap aspect-fit into the surface with a Ken Burns transform
/// applied about the surface center.
///
/// The pan offsets are center-relative: ±1 moves the image center by
/// half the surface size along that axis. Pixels the image does not
/// cover keep the surface's existing background.
pub fn draw_bitmap_fitted(out: &mut Surface, bitmap: &Bitmap, transform: KenBurnsTransform) {
    let w = out.width();
    let h = out.height();
    if w == 0 || h == 0 || bitmap.width() == 0 || bitmap.height() == 0 {
        return;
    }
    let bounds = Rect::new(0.0, 0.0, w as f32, h as f32);
    let fit = bounds.fit_aspect(bitmap.width() as f32, bitmap.height() as f32);
    if fit.width <= 0.0 || fit.height <= 0.0 {
        return;
    }

    let cx = w as f32 * 0.5;
    let cy = h as f32 * 0.5;
    let scale = transform.scale as f32;
    let tx = transform.x as f32 * w as f32 * 0.5;
    let ty = transform.y as f32 * h as f32 * 0.5;
    let sx_per_px = bitmap.width() as f32 / fit.width;
    let sy_per_px = bitmap.height() as f32 / fit.height;

    let row_len = w as usize * 4;
    out.data_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w as usize {
                // invert: dest = (src - c) * scale + c + t
                let qx = (x as f32 - cx - tx) / scale + cx;
                let qy = (y as f32 - cy - ty) / scale + cy;
                if qx < fit.x || qx >= fit.x + fit.width || qy < fit.y || qy >= fit.y + fit.height
                {
                    continue;
                }
                let u = (qx - fit.x) * sx_per_px - 0.5;
                let v = (qy - fit.y) * sy_per_px - 0.5;
                let px = bitmap.sample_bilinear(u, v);
                blend_rgba(&mut row[x * 4..x * 4 + 4], px);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, c: Color) -> Surface {
        let mut s = Surface::new(w, h);
        s.fill(c);
        s
    }

    #[test]
    fn copy_replaces_everything() {
        let mut out = solid(4, 4, Color::BLACK);
        let src = solid(4, 4, Color::WHITE);
        copy(&mut out, &src);
        assert_eq!(out.pixel(0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn blend_over_half_alpha() {
        let mut out = solid(4, 4, Color::BLACK);
        let src = solid(4, 4, Color::WHITE);
        blend_over(&mut out, &src, 0.5);
        let px = out.pixel(1, 1);
        assert!((px[0] as i32 - 128).abs() <= 2);
    }

    #[test]
    fn fill_rect_clips_to_surface() {
        let mut out = solid(4, 4, Color::BLACK);
        fill_rect(&mut out, Rect::new(2.0, 2.0, 100.0, 100.0), Color::WHITE);
        assert_eq!(out.pixel(3, 3), [255, 255, 255, 255]);
        assert_eq!(out.pixel(1, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn copy_region_only_touches_region() {
        let mut out = solid(4, 4, Color::BLACK);
        let src = solid(4, 4, Color::WHITE);
        copy_region(&mut out, &src, Rect::new(0.0, 0.0, 2.0, 4.0));
        assert_eq!(out.pixel(1, 0), [255, 255, 255, 255]);
        assert_eq!(out.pixel(2, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn copy_offset_translates() {
        let mut out = solid(4, 4, Color::BLACK);
        let mut src = Surface::new(4, 4);
        src.fill(Color::WHITE);
        copy_offset(&mut out, &src, 2, 0);
        // left half keeps the old pixels, right half comes from src
        assert_eq!(out.pixel(1, 0), [0, 0, 0, 255]);
        assert_eq!(out.pixel(2, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn fitted_draw_letterboxes_wide_image() {
        let mut out = solid(8, 8, Color::BLACK);
        // 2:1 white image into a square surface: rows 2..6 covered
        let bmp = Bitmap::solid(4, 2, Color::WHITE);
        draw_bitmap_fitted(&mut out, &bmp, KenBurnsTransform::IDENTITY);
        assert_eq!(out.pixel(4, 4), [255, 255, 255, 255]);
        assert_eq!(out.pixel(4, 0), [0, 0, 0, 255]);
        assert_eq!(out.pixel(4, 7), [0, 0, 0, 255]);
    }

    #[test]
    fn fitted_draw_zoom_covers_letterbox() {
        let mut out = solid(8, 8, Color::BLACK);
        let bmp = Bitmap::solid(4, 2, Color::WHITE);
        let zoomed = KenBurnsTransform {
            scale: 2.5,
            x: 0.0,
            y: 0.0,
        };
        draw_bitmap_fitted(&mut out, &bmp, zoomed);
        // at 2.5x the 4px-tall band covers the whole height
        assert_eq!(out.pixel(4, 0), [255, 255, 255, 255]);
        assert_eq!(out.pixel(4, 7), [255, 255, 255, 255]);
    }
}
