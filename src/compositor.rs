//! Run-coalescing engine between [`PixelCopy`] and [`Surface`].
//!
//! Every Surface call models a fixed-overhead hardware transaction, so
//! the compositor never emits one call per pixel: maximal runs of
//! identical raw colors become a single `write_run`, stretches of
//! distinct colors are packed and flushed through `write_buffer`, and
//! transparent gaps split the window instead of being written at all.

use crate::color::{Color, ColorDepth};
use crate::palette::Palette;
use crate::pixelcopy::PixelCopy;
use crate::surface::Surface;

/// Stack buffer for batching distinct pixels between run flushes.
const PACK_BUF: usize = 64;

/// Solid fill: one `write_run` of length `w` per row.
pub fn fill_rect(surface: &mut dyn Surface, x: u32, y: u32, w: u32, h: u32, raw: u32) {
    if w == 0 || h == 0 {
        return;
    }
    surface.set_window(x, y, x + w - 1, y + h - 1);
    for _ in 0..h {
        surface.write_run(raw, w);
    }
}

/// Blit a full source rectangle: one [`blit_row`] per destination row,
/// reseeking the cursor to (`src_x`, `src_y + row`) each time.
pub fn blit_rect(
    surface: &mut dyn Surface,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    pc: &mut PixelCopy<'_>,
    src_x: i32,
    src_y: i32,
    scratch: &mut Vec<u32>,
) {
    scratch.resize(w as usize, 0);
    for row in 0..h {
        pc.seek(src_x, src_y + row as i32);
        blit_row(surface, x, y + row, w, pc, scratch);
    }
}

/// Walk one destination scanline from the PixelCopy cursor, emitting
/// coalesced writes. Transparent stretches advance the cursor without
/// touching the surface.
pub fn blit_row(
    surface: &mut dyn Surface,
    x: u32,
    y: u32,
    w: u32,
    pc: &mut PixelCopy<'_>,
    scratch: &mut [u32],
) {
    let w = w as usize;
    let mut index = 0usize;
    while index < w {
        let end = pc.copy_run(scratch, index, w);
        if end > index {
            emit_span(surface, x + index as u32, y, &scratch[index..end], pc.dst_depth());
            index = end;
        }
        if index < w {
            index = pc.skip_transparent(index, w);
        }
    }
}

/// Write one opaque span with run coalescing.
fn emit_span(surface: &mut dyn Surface, x: u32, y: u32, span: &[u32], depth: ColorDepth) {
    surface.set_window(x, y, x + span.len() as u32 - 1, y);

    let sub_byte = depth.bits() < 8;
    let bpp = depth.bytes_per_pixel();
    let mut buf = [0u8; PACK_BUF];
    let mut buf_len = 0usize;

    let mut i = 0usize;
    while i < span.len() {
        let raw = span[i];
        let mut j = i + 1;
        while j < span.len() && span[j] == raw {
            j += 1;
        }
        let run = j - i;
        if run > 1 || sub_byte {
            if buf_len > 0 {
                surface.write_buffer(&buf[..buf_len]);
                buf_len = 0;
            }
            surface.write_run(raw, run as u32);
        } else {
            if buf_len + bpp > PACK_BUF {
                surface.write_buffer(&buf[..buf_len]);
                buf_len = 0;
            }
            depth.encode_bytes(raw, &mut buf[buf_len..buf_len + bpp]);
            buf_len += bpp;
        }
        i = j;
    }
    if buf_len > 0 {
        surface.write_buffer(&buf[..buf_len]);
    }
}

/// Row-buffered rectangle copy within one surface. Row order follows the
/// vertical displacement so overlapping regions copy correctly. Byte-
/// aligned depths only; sub-byte readback cannot be windowed per row.
pub fn copy_rect(
    surface: &mut dyn Surface,
    dst_x: u32,
    dst_y: u32,
    w: u32,
    h: u32,
    src_x: u32,
    src_y: u32,
    row_buf: &mut Vec<u8>,
) {
    let depth = surface.color_depth();
    if depth.bits() < 8 {
        log::warn!("copy_rect unsupported at {:?}", depth);
        return;
    }
    if w == 0 || h == 0 {
        return;
    }
    let bpp = depth.bytes_per_pixel();
    row_buf.resize(w as usize * bpp, 0);
    let top_down = dst_y <= src_y;
    for i in 0..h {
        let row = if top_down { i } else { h - 1 - i };
        surface.set_window(src_x, src_y + row, src_x + w - 1, src_y + row);
        surface.read_buffer(row_buf);
        surface.set_window(dst_x, dst_y + row, dst_x + w - 1, dst_y + row);
        surface.write_buffer(row_buf);
    }
}

/// Alpha-composite one row of straight-alpha colors onto the surface:
/// `out = (src*a + dst*(255-a) + 255) >> 8` per channel.
///
/// Byte-aligned destinations are read back, blended and rewritten in
/// place. Sub-byte palette destinations cannot be read back per row, so
/// coverage quantizes at half: pixels at alpha >= 128 are written as
/// their nearest palette entry, the rest are left untouched.
pub fn blend_row(
    surface: &mut dyn Surface,
    x: u32,
    y: u32,
    colors: &[Color],
    palette: Option<&Palette>,
    row_buf: &mut Vec<u8>,
) {
    if colors.is_empty() {
        return;
    }
    let depth = surface.color_depth();

    if depth.bits() < 8 {
        let mut i = 0usize;
        while i < colors.len() {
            if colors[i].a < 128 {
                i += 1;
                continue;
            }
            let raw = depth.to_raw(colors[i], palette);
            let mut j = i + 1;
            while j < colors.len()
                && colors[j].a >= 128
                && depth.to_raw(colors[j], palette) == raw
            {
                j += 1;
            }
            surface.set_window(x + i as u32, y, x + j as u32 - 1, y);
            surface.write_run(raw, (j - i) as u32);
            i = j;
        }
        return;
    }

    let bpp = depth.bytes_per_pixel();
    let x1 = x + colors.len() as u32 - 1;
    row_buf.resize(colors.len() * bpp, 0);
    surface.set_window(x, y, x1, y);
    surface.read_buffer(row_buf);

    for (i, src) in colors.iter().enumerate() {
        if src.a == 0 {
            continue;
        }
        let chunk = &mut row_buf[i * bpp..(i + 1) * bpp];
        if src.a == 255 {
            depth.encode_bytes(depth.to_raw(*src, palette), chunk);
            continue;
        }
        let dst = depth.from_raw(depth.decode_bytes(chunk), palette);
        let a = src.a as u32;
        let inv = 255 - a;
        let blended = Color::new(
            ((src.r as u32 * a + dst.r as u32 * inv + 255) >> 8) as u8,
            ((src.g as u32 * a + dst.g as u32 * inv + 255) >> 8) as u8,
            ((src.b as u32 * a + dst.b as u32 * inv + 255) >> 8) as u8,
        );
        depth.encode_bytes(depth.to_raw(blended, palette), chunk);
    }

    surface.set_window(x, y, x1, y);
    surface.write_buffer(row_buf);
}
