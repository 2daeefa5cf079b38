//! Primitive rasterization: lines, circles, ellipses, triangles and
//! rounded rectangles.
//!
//! Everything here reduces to horizontal/vertical run fills on the
//! context, so every primitive inherits the compositor's run coalescing.
//! No primitive holds state across calls; each one is self-contained
//! given the current clip rect and pen color.

use crate::context::GraphicsContext;

impl GraphicsContext<'_> {
    /// Bresenham line. Consecutive pixels on the same row (or column,
    /// for steep lines) are accumulated and flushed as one run.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let steep = (y1 - y0).abs() > (x1 - x0).abs();

        let (mut x0, mut y0, mut x1, mut y1) = (x0, y0, x1, y1);
        let (mut xstart, mut ystart) = (self.clip.left, self.clip.top);
        let (mut xend, mut yend) = (self.clip.right, self.clip.bottom);

        if steep {
            core::mem::swap(&mut xstart, &mut ystart);
            core::mem::swap(&mut xend, &mut yend);
            core::mem::swap(&mut x0, &mut y0);
            core::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            core::mem::swap(&mut x0, &mut x1);
            core::mem::swap(&mut y0, &mut y1);
        }
        if x0 > xend || x1 < xstart {
            return;
        }
        xend = xend.min(x1);

        let dy = (y1 - y0).abs();
        let ystep = if y1 > y0 { 1 } else { -1 };
        let dx = x1 - x0;
        let mut err = dx >> 1;

        // Step up to the clip boundary before writing anything.
        while x0 < xstart || y0 < ystart || y0 > yend {
            err -= dy;
            if err < 0 {
                err += dx;
                y0 += ystep;
            }
            x0 += 1;
            if x0 > xend {
                return;
            }
        }

        let mut xs = x0;
        let mut dlen = 0;
        if ystep < 0 {
            core::mem::swap(&mut ystart, &mut yend);
        }
        yend += ystep;

        self.start_write();
        loop {
            dlen += 1;
            err -= dy;
            if err < 0 {
                err += dx;
                if steep {
                    self.write_fill_rect_preclipped(y0, xs, 1, dlen);
                } else {
                    self.write_fill_rect_preclipped(xs, y0, dlen, 1);
                }
                xs = x0 + 1;
                dlen = 0;
                y0 += ystep;
                if y0 == yend {
                    break;
                }
            }
            x0 += 1;
            if x0 > xend {
                break;
            }
        }
        if dlen > 0 {
            if steep {
                self.write_fill_rect_preclipped(y0, xs, 1, dlen);
            } else {
                self.write_fill_rect_preclipped(xs, y0, dlen, 1);
            }
        }
        self.end_write();
    }

    /// Rectangle outline from two horizontal and two vertical runs.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let (mut x, mut y, mut w, mut h) = (x, y, w, h);
        if Self::adjust_abs(&mut x, &mut w) || Self::adjust_abs(&mut y, &mut h) {
            return;
        }
        self.start_write();
        self.write_fast_hline(x, y, w);
        if h > 1 {
            self.write_fast_hline(x, y + h - 1, w);
            if h > 2 {
                self.write_fast_vline(x, y + 1, h - 2);
                self.write_fast_vline(x + w - 1, y + 1, h - 2);
            }
        }
        self.end_write();
    }

    /// Midpoint circle outline. One octant's error recurrence drives all
    /// eight mirrored arcs; same-coordinate pixels flush as runs.
    pub fn draw_circle(&mut self, x: i32, y: i32, r: i32) {
        if r <= 0 {
            self.draw_pixel(x, y);
            return;
        }

        self.start_write();
        let mut r = r;
        let mut f = 1 - r;
        let mut ddf_y = -(r << 1);
        let mut ddf_x = 1;
        let mut i = 0;
        let mut j = -1;
        loop {
            while f < 0 {
                i += 1;
                ddf_x += 2;
                f += ddf_x;
            }
            ddf_y += 2;
            f += ddf_y;

            self.write_fast_hline(x - i, y + r, i - j);
            self.write_fast_hline(x - i, y - r, i - j);
            self.write_fast_hline(x + j + 1, y - r, i - j);
            self.write_fast_hline(x + j + 1, y + r, i - j);

            self.write_fast_vline(x + r, y + j + 1, i - j);
            self.write_fast_vline(x + r, y - i, i - j);
            self.write_fast_vline(x - r, y - i, i - j);
            self.write_fast_vline(x - r, y + j + 1, i - j);
            j = i;
            r -= 1;
            if i >= r {
                break;
            }
        }
        self.end_write();
    }

    pub fn fill_circle(&mut self, x: i32, y: i32, r: i32) {
        self.start_write();
        self.write_fast_hline(x - r, y, (r << 1) + 1);
        self.fill_circle_helper(x, y, r, 3, 0);
        self.end_write();
    }

    /// Filled corner pairs for circles and rounded rects. `corners` bit 0
    /// selects the bottom half, bit 1 the top half; `delta` widens the
    /// spans for rounded-rect bodies.
    fn fill_circle_helper(&mut self, x: i32, y: i32, r: i32, corners: u32, delta: i32) {
        if r <= 0 {
            return;
        }
        let delta = delta + 1;
        let mut r = r;
        let mut f = 1 - r;
        let mut ddf_y = -(r << 1);
        let mut ddf_x = 1;
        let mut i = 0;

        self.start_write();
        loop {
            let mut len = 0;
            while f < 0 {
                ddf_x += 2;
                f += ddf_x;
                len += 1;
            }
            i += len;
            ddf_y += 2;
            f += ddf_y;

            if corners & 0x1 != 0 {
                if len > 0 {
                    self.write_fill_rect(x - r, y + i - len + 1, (r << 1) + delta, len);
                }
                self.write_fast_hline(x - i, y + r, (i << 1) + delta);
            }
            if corners & 0x2 != 0 {
                self.write_fast_hline(x - i, y - r, (i << 1) + delta);
                if len > 0 {
                    self.write_fill_rect(x - r, y - i, (r << 1) + delta, len);
                }
            }
            r -= 1;
            if i >= r {
                break;
            }
        }
        self.end_write();
    }

    /// Ellipse outline: two midpoint passes, x-major then y-major, each
    /// mirrored across both axes.
    pub fn draw_ellipse(&mut self, x: i32, y: i32, rx: i32, ry: i32) {
        if ry == 0 {
            self.draw_fast_hline(x - rx, y, (rx << 1) + 1);
            return;
        }
        if rx == 0 {
            self.draw_fast_vline(x, y - ry, (ry << 1) + 1);
            return;
        }
        if rx < 0 || ry < 0 {
            return;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;

        self.start_write();

        let mut i = -1;
        let mut xt = 0;
        let mut yt = ry;
        let mut s = (ry2 << 1) + rx2 * (1 - (ry << 1));
        loop {
            while s < 0 {
                xt += 1;
                s += ry2 * ((xt << 2) + 2);
            }
            self.write_fast_hline(x - xt, y - yt, xt - i);
            self.write_fast_hline(x + i + 1, y - yt, xt - i);
            self.write_fast_hline(x + i + 1, y + yt, xt - i);
            self.write_fast_hline(x - xt, y + yt, xt - i);
            i = xt;
            yt -= 1;
            s -= (yt * rx2) << 2;
            if ry2 * xt > rx2 * yt {
                break;
            }
        }

        i = -1;
        yt = 0;
        xt = rx;
        s = (rx2 << 1) + ry2 * (1 - (rx << 1));
        loop {
            while s < 0 {
                yt += 1;
                s += rx2 * ((yt << 2) + 2);
            }
            self.write_fast_vline(x - xt, y - yt, yt - i);
            self.write_fast_vline(x - xt, y + i + 1, yt - i);
            self.write_fast_vline(x + xt, y + i + 1, yt - i);
            self.write_fast_vline(x + xt, y - yt, yt - i);
            i = yt;
            xt -= 1;
            s -= (xt * ry2) << 2;
            if rx2 * yt > ry2 * xt {
                break;
            }
        }

        self.end_write();
    }

    pub fn fill_ellipse(&mut self, x: i32, y: i32, rx: i32, ry: i32) {
        if ry == 0 {
            self.draw_fast_hline(x - rx, y, (rx << 1) + 1);
            return;
        }
        if rx == 0 {
            self.draw_fast_vline(x, y - ry, (ry << 1) + 1);
            return;
        }
        if rx < 0 || ry < 0 {
            return;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;

        self.start_write();
        self.write_fast_hline(x - rx, y, (rx << 1) + 1);

        let mut i = 0;
        let mut yt = 0;
        let mut xt = rx;
        let mut s = (rx2 << 1) + ry2 * (1 - (rx << 1));
        loop {
            while s < 0 {
                yt += 1;
                s += rx2 * ((yt << 2) + 2);
            }
            self.write_fill_rect(x - xt, y - yt, (xt << 1) + 1, yt - i);
            self.write_fill_rect(x - xt, y + i + 1, (xt << 1) + 1, yt - i);
            i = yt;
            xt -= 1;
            s -= (xt * ry2) << 2;
            if rx2 * yt > ry2 * xt {
                break;
            }
        }

        let mut xt = 0;
        let mut yt = ry;
        let mut s = (ry2 << 1) + rx2 * (1 - (ry << 1));
        loop {
            while s < 0 {
                xt += 1;
                s += ry2 * ((xt << 2) + 2);
            }
            self.write_fast_hline(x - xt, y - yt, (xt << 1) + 1);
            self.write_fast_hline(x - xt, y + yt, (xt << 1) + 1);
            yt -= 1;
            s -= (yt * rx2) << 2;
            if ry2 * xt > rx2 * yt {
                break;
            }
        }

        self.end_write();
    }

    pub fn draw_triangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.start_write();
        self.draw_line(x0, y0, x1, y1);
        self.draw_line(x1, y1, x2, y2);
        self.draw_line(x2, y2, x0, y0);
        self.end_write();
    }

    /// Filled triangle: vertices sorted by y, then dual-edge scanline
    /// stepping between the two active edges. All-collinear input
    /// degenerates to a single run or line.
    pub fn fill_triangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (mut x0, mut y0, mut x1, mut y1, mut x2, mut y2) = (x0, y0, x1, y1, x2, y2);

        // Sort by y so that y2 >= y1 >= y0.
        if y0 > y1 {
            core::mem::swap(&mut y0, &mut y1);
            core::mem::swap(&mut x0, &mut x1);
        }
        if y1 > y2 {
            core::mem::swap(&mut y2, &mut y1);
            core::mem::swap(&mut x2, &mut x1);
        }
        if y0 > y1 {
            core::mem::swap(&mut y0, &mut y1);
            core::mem::swap(&mut x0, &mut x1);
        }

        if y0 == y2 {
            // All on one row.
            let mut a = x0;
            let mut b = x0;
            a = a.min(x1).min(x2);
            b = b.max(x1).max(x2);
            self.draw_fast_hline(a, y0, b - a + 1);
            return;
        }
        if (x1 - x0) * (y2 - y0) == (x2 - x0) * (y1 - y0) {
            // Collinear but not horizontal.
            self.draw_line(x0, y0, x2, y2);
            return;
        }

        let mut dy1 = y1 - y0;
        let mut dy2 = y2 - y0;
        let change = (x1 - x0) * dy2 > (x2 - x0) * dy1;
        let mut dx1 = (x1 - x0).abs();
        let mut dx2 = (x2 - x0).abs();
        let mut xstep1 = if x1 < x0 { -1 } else { 1 };
        let mut xstep2 = if x2 < x0 { -1 } else { 1 };
        let mut a = x0;
        let mut b = x0;
        if change {
            core::mem::swap(&mut dx1, &mut dx2);
            core::mem::swap(&mut dy1, &mut dy2);
            core::mem::swap(&mut xstep1, &mut xstep2);
        }
        let mut err1 =
            (dx1.max(dy1) >> 1) + if xstep1 < 0 { dx1.min(dy1) } else { dx1 };
        let mut err2 =
            (dx2.max(dy2) >> 1) + if xstep2 > 0 { dx2.min(dy2) } else { dx2 };

        self.start_write();
        let mut y = y0;
        while y < y1 {
            err1 -= dx1;
            while err1 < 0 {
                err1 += dy1;
                a += xstep1;
            }
            err2 -= dx2;
            while err2 < 0 {
                err2 += dy2;
                b += xstep2;
            }
            self.write_fast_hline(a.min(b), y, (b - a).abs() + 1);
            y += 1;
        }

        if change {
            b = x1;
            xstep2 = if x2 < x1 { -1 } else { 1 };
            dx2 = (x2 - x1).abs();
            dy2 = y2 - y1;
            err2 = (dx2.max(dy2) >> 1) + if xstep2 > 0 { dx2.min(dy2) } else { dx2 };
        } else {
            a = x1;
            xstep1 = if x2 < x1 { -1 } else { 1 };
            dx1 = (x2 - x1).abs();
            dy1 = y2 - y1;
            err1 = (dx1.max(dy1) >> 1) + if xstep1 < 0 { dx1.min(dy1) } else { dx1 };
        }
        while y <= y2 {
            err1 -= dx1;
            while err1 < 0 {
                err1 += dy1;
                a += xstep1;
                if a == x2 {
                    break;
                }
            }
            err2 -= dx2;
            while err2 < 0 {
                err2 += dy2;
                b += xstep2;
                if b == x2 {
                    break;
                }
            }
            self.write_fast_hline(a.min(b), y, (b - a).abs() + 1);
            y += 1;
        }
        self.end_write();
    }

    /// Rounded-rectangle outline: straight edge runs glued to corner arcs
    /// driven by the circle recurrence.
    pub fn draw_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32) {
        let (mut x, mut y, mut w, mut h) = (x, y, w, h);
        if Self::adjust_abs(&mut x, &mut w) || Self::adjust_abs(&mut y, &mut h) {
            return;
        }
        let r = r.min((w.min(h) - 1) >> 1).max(0);

        self.start_write();

        let w = w - 1;
        let h = h - 1;
        let len = (r << 1) + 1;
        let y1 = y + h - r;
        let y0 = y + r;
        self.write_fast_vline(x, y0 + 1, h - len);
        self.write_fast_vline(x + w, y0 + 1, h - len);

        let x1 = x + w - r;
        let x0 = x + r;
        self.write_fast_hline(x0 + 1, y, w - len);
        self.write_fast_hline(x0 + 1, y + h, w - len);

        let mut r = r;
        let mut f = 1 - r;
        let mut ddf_y = -(r << 1);
        let mut ddf_x = 1;
        let mut len = 0;
        let mut i = 0;
        while i <= r {
            len += 1;
            if f >= 0 {
                self.write_fast_hline(x0 - i, y0 - r, len);
                self.write_fast_hline(x0 - i, y1 + r, len);
                self.write_fast_hline(x1 + i - len + 1, y1 + r, len);
                self.write_fast_hline(x1 + i - len + 1, y0 - r, len);
                self.write_fast_vline(x1 + r, y1 + i - len + 1, len);
                self.write_fast_vline(x0 - r, y1 + i - len + 1, len);
                self.write_fast_vline(x1 + r, y0 - i, len);
                self.write_fast_vline(x0 - r, y0 - i, len);
                len = 0;
                r -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            ddf_x += 2;
            f += ddf_x;
            i += 1;
        }
        self.end_write();
    }

    /// Filled rounded rectangle: one body rect plus widened corner spans.
    pub fn fill_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32) {
        let (mut x, mut y, mut w, mut h) = (x, y, w, h);
        if Self::adjust_abs(&mut x, &mut w) || Self::adjust_abs(&mut y, &mut h) {
            return;
        }
        let r = r.min((w.min(h) - 1) >> 1).max(0);

        self.start_write();
        let y2 = y + r;
        let y1 = y + h - r - 1;
        let ddf_y = -(r << 1);
        let delta = w + ddf_y;
        self.write_fill_rect(x, y2, w, h + ddf_y);

        let x0 = x + r;
        let mut r = r;
        let mut f = 1 - r;
        let mut ddf_y = ddf_y;
        let mut ddf_x = 1;
        let mut len = 0;
        let mut i = 0;
        while i <= r {
            len += 1;
            if f >= 0 {
                self.write_fill_rect(x0 - r, y2 - i, (r << 1) + delta, len);
                self.write_fill_rect(x0 - r, y1 + i - len + 1, (r << 1) + delta, len);
                if i == r {
                    break;
                }
                len = 0;
                self.write_fast_hline(x0 - i, y1 + r, (i << 1) + delta);
                ddf_y += 2;
                f += ddf_y;
                self.write_fast_hline(x0 - i, y2 - r, (i << 1) + delta);
                r -= 1;
            }
            ddf_x += 2;
            f += ddf_x;
            i += 1;
        }
        self.end_write();
    }
}
