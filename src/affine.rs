//! Affine-transform blit engine: rotation, independent x/y zoom and
//! translation of rectangular pixel sources.
//!
//! The forward matrix is built in floats once per call; rasterization
//! uses only its 16.16 fixed-point integer inverse. Each visible
//! scanline's horizontal interval is derived algebraically from the four
//! half-plane inequalities bounding the transformed source rectangle;
//! candidate pixels are never tested one by one. A non-invertible matrix
//! (zero zoom) draws nothing and touches the surface not at all.

use crate::color::Color;
use crate::compositor;
use crate::context::GraphicsContext;
use crate::pixelcopy::{PixelCopy, FP_SHIFT};

/// Forward 2x3 matrix mapping source pixel coordinates to destination
/// coordinates: rotation by `angle` degrees, `zoom_x`/`zoom_y` scaling,
/// and a translation placing the source anchor on the destination anchor.
pub fn make_rotation_matrix(
    dst_x: f32,
    dst_y: f32,
    src_x: f32,
    src_y: f32,
    angle: f32,
    zoom_x: f32,
    zoom_y: f32,
) -> [f32; 6] {
    let rad = (angle % 360.0).to_radians();
    let sin = rad.sin();
    let cos = rad.cos();
    let a = cos * zoom_x;
    let b = -sin * zoom_y;
    let c = sin * zoom_x;
    let d = cos * zoom_y;
    [
        a,
        b,
        dst_x - src_x * a - src_y * b,
        c,
        d,
        dst_y - src_x * c - src_y * d,
    ]
}

/// 16.16 integer inverse of a forward matrix; None when the determinant
/// vanishes.
fn invert_affine(matrix: &[f32; 6]) -> Option<[i32; 6]> {
    let det = matrix[0] * matrix[4] - matrix[1] * matrix[3];
    if det == 0.0 {
        return None;
    }
    let det = (1u32 << FP_SHIFT) as f32 / det;
    Some([
        (det * matrix[4]).round() as i32,
        (det * -matrix[1]).round() as i32,
        (det * (matrix[1] * matrix[5] - matrix[2] * matrix[4])).round() as i32,
        (det * -matrix[3]).round() as i32,
        (det * matrix[0]).round() as i32,
        (det * (matrix[2] * matrix[3] - matrix[0] * matrix[5])).round() as i32,
    ])
}

/// Largest source extent whose 16.16 projection still fits in 32 bits.
const MAX_AFFINE_EXTENT: i32 = i16::MAX as i32;

/// Vertical destination bound of the projected source rect, before
/// clipping. Returned in 16.16 relative to the translation row.
fn project_y_bounds(matrix: &[f32; 6], w: i32, h: i32) -> (i32, i32) {
    let mut min_y = (matrix[3] * ((w as f32) * (1 << FP_SHIFT) as f32)) as i32;
    let mut max_y = (matrix[4] * ((h as f32) * (1 << FP_SHIFT) as f32)) as i32;
    if (min_y < 0) == (max_y < 0) {
        max_y += min_y;
        min_y = 0;
    }
    if min_y > max_y {
        core::mem::swap(&mut min_y, &mut max_y);
    }
    (min_y, max_y)
}

impl GraphicsContext<'_> {
    /// Place `pc`'s source so that source point (`src_x`, `src_y`) lands
    /// on destination point (`dst_x`, `dst_y`), rotated by `angle`
    /// degrees and scaled by `zoom_x`/`zoom_y`.
    #[allow(clippy::too_many_arguments)]
    pub fn push_image_rotate_zoom(
        &mut self,
        dst_x: f32,
        dst_y: f32,
        src_x: f32,
        src_y: f32,
        angle: f32,
        zoom_x: f32,
        zoom_y: f32,
        pc: &mut PixelCopy<'_>,
    ) {
        let matrix = make_rotation_matrix(
            dst_x + 0.5,
            dst_y + 0.5,
            src_x + 0.5,
            src_y + 0.5,
            angle,
            zoom_x,
            zoom_y,
        );
        self.push_image_affine(&matrix, pc);
    }

    /// Anti-aliased variant of [`GraphicsContext::push_image_rotate_zoom`].
    #[allow(clippy::too_many_arguments)]
    pub fn push_image_rotate_zoom_aa(
        &mut self,
        dst_x: f32,
        dst_y: f32,
        src_x: f32,
        src_y: f32,
        angle: f32,
        zoom_x: f32,
        zoom_y: f32,
        pc: &mut PixelCopy<'_>,
    ) {
        let matrix = make_rotation_matrix(
            dst_x + 0.5,
            dst_y + 0.5,
            src_x + 0.5,
            src_y + 0.5,
            angle,
            zoom_x,
            zoom_y,
        );
        self.push_image_affine_aa(&matrix, pc);
    }

    /// Blit `pc` through an explicit forward matrix.
    pub fn push_image_affine(&mut self, matrix: &[f32; 6], pc: &mut PixelCopy<'_>) {
        debug_assert_eq!(pc.dst_depth(), self.surface.color_depth());
        let w = pc.src_width as i32;
        let h = pc.src_height as i32;
        if !(1..=MAX_AFFINE_EXTENT).contains(&w) || !(1..=MAX_AFFINE_EXTENT).contains(&h) {
            return;
        }
        let (min_b, max_b) = project_y_bounds(matrix, w, h);

        let offset_y32 =
            (matrix[5] * (1 << FP_SHIFT) as f32) as i32 + (1 << (FP_SHIFT - 1));
        let min_y = self.clip.top.max((offset_y32 + min_b - 1) >> FP_SHIFT);
        let max_y = (self.clip.bottom + 1).min((offset_y32 + max_b + 1) >> FP_SHIFT);
        if min_y >= max_y {
            return;
        }

        let mut ia = match invert_affine(matrix) {
            Some(ia) => ia,
            None => {
                log::debug!("affine blit skipped: matrix not invertible");
                return;
            }
        };

        // Shift the inverse to destination pixel centers at row min_y.
        let offset = (min_y << 1) - 1;
        ia[2] += ((ia[0] as i64 + ia[1] as i64 * offset as i64) >> 1) as i32;
        ia[5] += ((ia[3] as i64 + ia[4] as i64 * offset as i64) >> 1) as i32;

        let scale_w = w << FP_SHIFT;
        let xs1 = (if ia[0] < 0 { -scale_w } else { 1 }) - ia[0];
        let xs2 = (if ia[0] < 0 { 0 } else { 1 - scale_w }) - ia[0];
        let scale_h = h << FP_SHIFT;
        let ys1 = (if ia[3] < 0 { -scale_h } else { 1 }) - ia[3];
        let ys2 = (if ia[3] < 0 { 0 } else { 1 - scale_h }) - ia[3];

        let cl = self.clip.left;
        let cr = self.clip.right + 1;

        pc.x32_add = ia[0];
        pc.y32_add = ia[3];
        self.scratch.resize((cr - cl).max(0) as usize, 0);

        self.start_write();
        for y in min_y..max_y {
            ia[2] += ia[1];
            ia[5] += ia[4];
            let left = cl
                .max(if ia[0] != 0 { (ia[2] + xs1) / -ia[0] } else { cl })
                .max(if ia[3] != 0 { (ia[5] + ys1) / -ia[3] } else { cl });
            let right = cr
                .min(if ia[0] != 0 { (ia[2] + xs2) / -ia[0] } else { cr })
                .min(if ia[3] != 0 { (ia[5] + ys2) / -ia[3] } else { cr });
            if left >= right {
                continue;
            }
            pc.x32 = ia[2].wrapping_add(left.wrapping_mul(ia[0]));
            if ((pc.x32 >> FP_SHIFT) as u32) >= pc.src_width {
                continue;
            }
            pc.y32 = ia[5].wrapping_add(left.wrapping_mul(ia[3]));
            if ((pc.y32 >> FP_SHIFT) as u32) >= pc.src_height {
                continue;
            }
            compositor::blit_row(
                &mut *self.surface,
                left as u32,
                y as u32,
                (right - left) as u32,
                pc,
                &mut self.scratch,
            );
        }
        self.end_write();
    }

    /// Anti-aliased affine blit: per destination pixel the source is
    /// box-sampled over a window proportional to the local step
    /// magnitude (clamped to at most 8 source pixels either side), then
    /// alpha-composited onto the existing destination content.
    pub fn push_image_affine_aa(&mut self, matrix: &[f32; 6], pc: &mut PixelCopy<'_>) {
        debug_assert_eq!(pc.dst_depth(), self.surface.color_depth());
        let w = pc.src_width as i32;
        let h = pc.src_height as i32;
        if !(1..=MAX_AFFINE_EXTENT).contains(&w) || !(1..=MAX_AFFINE_EXTENT).contains(&h) {
            return;
        }
        let (min_b, max_b) = project_y_bounds(matrix, w, h);

        let offset_y32 = (matrix[5] * (1 << FP_SHIFT) as f32) as i32;
        let min_y = self.clip.top.max((offset_y32 + min_b) >> FP_SHIFT);
        let max_y = self.clip.bottom.min((offset_y32 + max_b - 1) >> FP_SHIFT) + 1;
        if min_y >= max_y {
            return;
        }

        let mut ia = match invert_affine(matrix) {
            Some(ia) => ia,
            None => return,
        };

        pc.x32_add = ia[0];
        pc.y32_add = ia[3];
        let x32_diff = (ia[0].abs().max(ia[1].abs()) - 1).min(8 << FP_SHIFT) >> 1;
        let y32_diff = (ia[3].abs().max(ia[4].abs()) - 1).min(8 << FP_SHIFT) >> 1;

        let offset = (min_y << 1) - 1;
        ia[2] += ((ia[0] as i64 + ia[1] as i64 * offset as i64) >> 1) as i32;
        ia[5] += ((ia[3] as i64 + ia[4] as i64 * offset as i64) >> 1) as i32;

        let scale_w = (w << FP_SHIFT) + (x32_diff << 1);
        let xs1 = (if ia[0] < 0 { -scale_w } else { 1 }) - ia[0] + x32_diff;
        let xs2 = (if ia[0] < 0 { 0 } else { 1 - scale_w }) - ia[0] + x32_diff;
        let scale_h = (h << FP_SHIFT) + (y32_diff << 1);
        let ys1 = (if ia[3] < 0 { -scale_h } else { 1 }) - ia[3] + y32_diff;
        let ys2 = (if ia[3] < 0 { 0 } else { 1 - scale_h }) - ia[3] + y32_diff;

        let cl = self.clip.left;
        let cr = self.clip.right + 1;

        let palette = self.surface.palette().cloned();
        let mut aa_buf = vec![Color::default(); (cr - cl).max(0) as usize];

        self.start_write();
        for y in min_y..max_y {
            ia[2] += ia[1];
            ia[5] += ia[4];
            let left = cl
                .max(if ia[0] != 0 { (ia[2] + xs1) / -ia[0] } else { cl })
                .max(if ia[3] != 0 { (ia[5] + ys1) / -ia[3] } else { cl });
            let right = cr
                .min(if ia[0] != 0 { (ia[2] + xs2) / -ia[0] } else { cr })
                .min(if ia[3] != 0 { (ia[5] + ys2) / -ia[3] } else { cr });
            if left >= right {
                continue;
            }
            let len = (right - left) as usize;

            let xs = ia[2].wrapping_add(left.wrapping_mul(ia[0]));
            pc.x32 = xs - x32_diff;
            pc.xe32 = xs + x32_diff;
            let ys = ia[5].wrapping_add(left.wrapping_mul(ia[3]));
            pc.y32 = ys - y32_diff;
            pc.ye32 = ys + y32_diff;

            pc.copy_run_aa(&mut aa_buf, 0, len);
            compositor::blend_row(
                &mut *self.surface,
                left as u32,
                y as u32,
                &aa_buf[..len],
                palette.as_ref(),
                &mut self.byte_scratch,
            );
        }
        self.end_write();
    }

    /// Fill the transformed `w`x`h` rectangle with the pen color using
    /// the same interval math as the image blit.
    pub fn fill_affine(&mut self, matrix: &[f32; 6], w: i32, h: i32) {
        if !(1..=MAX_AFFINE_EXTENT).contains(&w) || !(1..=MAX_AFFINE_EXTENT).contains(&h) {
            return;
        }
        let (min_b, max_b) = project_y_bounds(matrix, w, h);

        let offset_y32 =
            (matrix[5] * (1 << FP_SHIFT) as f32) as i32 + (1 << (FP_SHIFT - 1));
        let min_y = self.clip.top.max((offset_y32 + min_b - 1) >> FP_SHIFT);
        let max_y = (self.clip.bottom + 1).min((offset_y32 + max_b + 1) >> FP_SHIFT);
        if min_y >= max_y {
            return;
        }

        let mut ia = match invert_affine(matrix) {
            Some(ia) => ia,
            None => return,
        };

        let offset = (min_y << 1) - 1;
        ia[2] += ((ia[0] as i64 + ia[1] as i64 * offset as i64) >> 1) as i32;
        ia[5] += ((ia[3] as i64 + ia[4] as i64 * offset as i64) >> 1) as i32;

        let scale_w = w << FP_SHIFT;
        let xs1 = (if ia[0] < 0 { -scale_w } else { 1 }) - ia[0];
        let xs2 = (if ia[0] < 0 { 0 } else { 1 - scale_w }) - ia[0];
        let scale_h = h << FP_SHIFT;
        let ys1 = (if ia[3] < 0 { -scale_h } else { 1 }) - ia[3];
        let ys2 = (if ia[3] < 0 { 0 } else { 1 - scale_h }) - ia[3];

        let div1 = if ia[0] != 0 { -ia[0] } else { -1 };
        let div2 = if ia[3] != 0 { -ia[3] } else { -1 };
        let cl = self.clip.left;
        let cr = self.clip.right + 1;

        self.start_write();
        for y in min_y..max_y {
            ia[2] += ia[1];
            ia[5] += ia[4];
            let left = cl.max(((ia[2] + xs1) / div1).max((ia[5] + ys1) / div2));
            let right = cr.min(((ia[2] + xs2) / div1).min((ia[5] + ys2) / div2));
            if left < right {
                self.write_fill_rect_preclipped(left, y, right - left, 1);
            }
        }
        self.end_write();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_matrix_identity() {
        let m = make_rotation_matrix(0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0);
        assert_eq!(m, [1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_rotation_matrix_translation() {
        let m = make_rotation_matrix(10.0, 20.0, 2.0, 3.0, 0.0, 1.0, 1.0);
        assert_eq!(m[2], 8.0);
        assert_eq!(m[5], 17.0);
    }

    #[test]
    fn test_invert_identity() {
        let ia = invert_affine(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]).unwrap();
        assert_eq!(ia, [1 << 16, 0, 0, 0, 1 << 16, 0]);
    }

    #[test]
    fn test_invert_rejects_degenerate() {
        assert!(invert_affine(&[0.0, 0.0, 5.0, 0.0, 2.0, 1.0]).is_none());
        assert!(invert_affine(&[2.0, 0.0, 5.0, 0.0, 0.0, 1.0]).is_none());
    }

    #[test]
    fn test_invert_zoom() {
        let ia = invert_affine(&[2.0, 0.0, 0.0, 0.0, 4.0, 0.0]).unwrap();
        assert_eq!(ia[0], 1 << 15);
        assert_eq!(ia[4], 1 << 14);
    }

    #[test]
    fn test_ninety_degrees_is_exact() {
        let m = make_rotation_matrix(0.0, 0.0, 0.0, 0.0, 90.0, 1.0, 1.0);
        assert!(m[0].abs() < 1e-6);
        assert!((m[3] - 1.0).abs() < 1e-6);
    }
}
