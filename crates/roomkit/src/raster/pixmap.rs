// raster/pixmap.rs
//
// CPU-side RGBA image used for transition overlays. Provides the drawing
// primitives the transition strategies need: rect/circle/triangle fills,
// alpha erases, subtractive composites, and nearest-neighbour resampling.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// One 8-bit RGBA pixel. Pod so a pixmap can be handed to a host renderer
/// as raw bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);
    pub const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// An owned RGBA8 image buffer.
///
/// Coordinates for drawing operations are in pixels, with fractional inputs
/// rounded to pixel edges for rect operations and resolved as coverage for
/// circle and triangle fills.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<Rgba8>,
}

impl Pixmap {
    /// Create a fully transparent pixmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![Rgba8::TRANSPARENT; (width * height) as usize],
        }
    }

    /// Create a pixmap filled with a single color.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        Self {
            width,
            height,
            data: vec![color; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read a pixel; out-of-bounds coordinates return None.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Write a pixel; out-of-bounds coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba8) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = color;
        }
    }

    /// The raw RGBA byte view, row-major, for upload to a host renderer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.fill(Rgba8::TRANSPARENT);
    }

    /// Overwrite every pixel with a single color.
    pub fn fill(&mut self, color: Rgba8) {
        self.data.fill(color);
    }

    /// Overwrite a rectangle with a color. Fractional edges round to the
    /// nearest pixel boundary; the rect is clipped to the image.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba8) {
        let (x0, y0, x1, y1) = match self.clip_rect(x, y, w, h) {
            Some(r) => r,
            None => return,
        };
        for py in y0..y1 {
            let row = (py * self.width) as usize;
            self.data[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    /// Set alpha to zero in a rectangle, leaving color channels untouched.
    pub fn erase_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let (x0, y0, x1, y1) = match self.clip_rect(x, y, w, h) {
            Some(r) => r,
            None => return,
        };
        for py in y0..y1 {
            for px in x0..x1 {
                self.data[(py * self.width + px) as usize].a = 0;
            }
        }
    }

    /// Draw a filled circle with a one-pixel feathered edge, composited
    /// source-over. `cx`/`cy` are the center, `r` the radius in pixels.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgba8) {
        if r <= 0.0 {
            return;
        }
        let x0 = ((cx - r - 1.0).floor().max(0.0)) as u32;
        let y0 = ((cy - r - 1.0).floor().max(0.0)) as u32;
        let x1 = ((cx + r + 1.0).ceil() as u32).min(self.width);
        let y1 = ((cy + r + 1.0).ceil() as u32).min(self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                let d = Vec2::new(px as f32 + 0.5 - cx, py as f32 + 0.5 - cy).length();
                let coverage = (r - d + 0.5).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_over(px, py, color, coverage);
                }
            }
        }
    }

    /// Draw a filled triangle, anti-aliased by 4x4 supersampled coverage,
    /// composited source-over. Either winding is accepted.
    pub fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Rgba8) {
        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
        let max_x = (a.x.max(b.x).max(c.x).ceil() as u32).min(self.width);
        let max_y = (a.y.max(b.y).max(c.y).ceil() as u32).min(self.height);
        let area = edge(a, b, c);
        if area.abs() < f32::EPSILON {
            return;
        }
        let sign = area.signum();
        for py in min_y..max_y {
            for px in min_x..max_x {
                let mut hits = 0u32;
                for sy in 0..4 {
                    for sx in 0..4 {
                        let p = Vec2::new(
                            px as f32 + (sx as f32 + 0.5) / 4.0,
                            py as f32 + (sy as f32 + 0.5) / 4.0,
                        );
                        if edge(a, b, p) * sign >= 0.0
                            && edge(b, c, p) * sign >= 0.0
                            && edge(c, a, p) * sign >= 0.0
                        {
                            hits += 1;
                        }
                    }
                }
                if hits > 0 {
                    self.blend_over(px, py, color, hits as f32 / 16.0);
                }
            }
        }
    }

    /// Subtract another pixmap's color channels from this one, saturating at
    /// zero. Alpha is untouched. Overlap is the intersection of both sizes.
    pub fn subtract_rgb(&mut self, other: &Pixmap) {
        let w = self.width.min(other.width);
        let h = self.height.min(other.height);
        for y in 0..h {
            for x in 0..w {
                let src = other.data[(y * other.width + x) as usize];
                let dst = &mut self.data[(y * self.width + x) as usize];
                dst.r = dst.r.saturating_sub(src.r);
                dst.g = dst.g.saturating_sub(src.g);
                dst.b = dst.b.saturating_sub(src.b);
            }
        }
    }

    /// Subtract another pixmap channel-wise including alpha, saturating at
    /// zero. An opaque black source acts as an eraser.
    pub fn subtract_rgba(&mut self, other: &Pixmap) {
        let w = self.width.min(other.width);
        let h = self.height.min(other.height);
        for y in 0..h {
            for x in 0..w {
                let src = other.data[(y * other.width + x) as usize];
                let dst = &mut self.data[(y * self.width + x) as usize];
                dst.r = dst.r.saturating_sub(src.r);
                dst.g = dst.g.saturating_sub(src.g);
                dst.b = dst.b.saturating_sub(src.b);
                dst.a = dst.a.saturating_sub(src.a);
            }
        }
    }

    /// Nearest-neighbour resample into a new pixmap. Downsampling then
    /// upsampling produces the blocky look the pixelate transition relies on.
    pub fn resampled(&self, width: u32, height: u32) -> Pixmap {
        let mut out = Pixmap::new(width, height);
        if width == 0 || height == 0 || self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height as u64) as u32;
            let sy = sy.min(self.height - 1);
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width as u64) as u32;
                let sx = sx.min(self.width - 1);
                out.data[(y * width + x) as usize] =
                    self.data[(sy * self.width + sx) as usize];
            }
        }
        out
    }

    /// Sum of all alpha values, as a cheap "how much is left" measure.
    pub fn alpha_total(&self) -> u64 {
        self.data.iter().map(|p| p.a as u64).sum()
    }

    fn clip_rect(&self, x: f32, y: f32, w: f32, h: f32) -> Option<(u32, u32, u32, u32)> {
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        let x0 = x.round().max(0.0) as u32;
        let y0 = y.round().max(0.0) as u32;
        let x1 = ((x + w).round().max(0.0) as u32).min(self.width);
        let y1 = ((y + h).round().max(0.0) as u32).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }

    fn blend_over(&mut self, x: u32, y: u32, color: Rgba8, coverage: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let sa = color.a as f32 / 255.0 * coverage;
        let dst = &mut self.data[(y * self.width + x) as usize];
        let da = dst.a as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            *dst = Rgba8::TRANSPARENT;
            return;
        }
        let blend = |s: u8, d: u8| -> u8 {
            let s = s as f32 / 255.0;
            let d = d as f32 / 255.0;
            (((s * sa + d * da * (1.0 - sa)) / out_a) * 255.0).round() as u8
        };
        *dst = Rgba8::new(
            blend(color.r, dst.r),
            blend(color.g, dst.g),
            blend(color.b, dst.b),
            (out_a * 255.0).round() as u8,
        );
    }
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
