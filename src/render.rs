// render.rs - Rasterize simulation state to an RGBA output buffer
//
// The buffer is straight-alpha RGBA8, row-major, sized to the surface.
// The web surface presents it through putImageData; hosts that prefer to
// blit themselves can read it through ptr()/len().

use crate::color::Rgb;

pub struct Frame {
    px: Vec<u8>,
    w: u32,
    h: u32,
}

impl Frame {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            px: vec![0; (w * h * 4) as usize],
            w,
            h,
        }
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.w = w;
        self.h = h;
        self.px.clear();
        self.px.resize((w * h * 4) as usize, 0);
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.px.fill(0);
    }

    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    pub fn ptr(&self) -> *const u8 {
        self.px.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.px.len()
    }

    pub fn is_empty(&self) -> bool {
        self.px.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.px
    }

    /// RGBA at a pixel. Panics out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.w + x) * 4) as usize;
        [self.px[i], self.px[i + 1], self.px[i + 2], self.px[i + 3]]
    }

    /// Fill a disc centered at (cx, cy) with a one-pixel feathered edge.
    /// Writes nothing outside the disc's bounding box.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgb, alpha: f32) {
        if r <= 0.0 || alpha <= 0.0 {
            return;
        }
        let x0 = (cx - r - 1.0).floor() as i32;
        let x1 = (cx + r + 1.0).ceil() as i32;
        let y0 = (cy - r - 1.0).floor() as i32;
        let y1 = (cy + r + 1.0).ceil() as i32;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                let coverage = (r - d + 0.5).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_px(x, y, color, alpha * coverage);
                }
            }
        }
    }

    /// Stroke a one-pixel line between two points. Sub-pixel widths are
    /// approximated by scaling alpha at the call site.
    pub fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil() as i32;
        if steps == 0 {
            self.blend_px(x0.floor() as i32, y0.floor() as i32, color, alpha);
            return;
        }
        let sx = dx / steps as f32;
        let sy = dy / steps as f32;
        let mut x = x0;
        let mut y = y0;
        let mut last = (i32::MIN, i32::MIN);
        for _ in 0..=steps {
            let p = (x.floor() as i32, y.floor() as i32);
            // one blend per pixel, or near-horizontal lines would darken
            if p != last {
                self.blend_px(p.0, p.1, color, alpha);
                last = p;
            }
            x += sx;
            y += sy;
        }
    }

    /// Source-over blend of a straight-alpha sample onto the buffer.
    fn blend_px(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x as u32 >= self.w || y as u32 >= self.h {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let i = ((y as u32 * self.w + x as u32) * 4) as usize;
        let da = self.px[i + 3] as f32 / 255.0;
        let out_a = a + da * (1.0 - a);
        if out_a <= 0.0 {
            return;
        }
        for (k, c) in color.channels().into_iter().enumerate() {
            let dc = self.px[i + k] as f32;
            let sc = c as f32;
            let out = (sc * a + dc * da * (1.0 - a)) / out_a;
            self.px[i + k] = out.round().clamp(0.0, 255.0) as u8;
        }
        self.px[i + 3] = (out_a * 255.0).round() as u8;
    }
}
