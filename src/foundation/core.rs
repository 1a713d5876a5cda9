use crate::foundation::error::{StudioError, StudioResult};

pub use kurbo::{Affine, BezPath, Point, Vec2};

/// Smallest accepted canvas side, in pixels.
pub const MIN_CANVAS_SIDE: u32 = 8;
/// Largest accepted canvas side, in pixels.
pub const MAX_CANVAS_SIDE: u32 = 512;

/// Opaque 24-bit color. Serialized as a lowercase `#rrggbb` string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb`, `rrggbb` or the `#rgb` shorthand, case-insensitively.
    pub fn parse(s: &str) -> StudioResult<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bad = || StudioError::validation(format!("invalid color '{s}'"));
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| bad());
        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let nibble = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self::new(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            _ => Err(bad()),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `0xRRGGBB`, as consumed by `lv_color_hex`.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Quantizes to 5-6-5 bits: `r>>3 << 11 | g>>2 << 5 | b>>3`.
    pub fn to_rgb565(self) -> u16 {
        let r5 = u16::from(self.r >> 3);
        let g6 = u16::from(self.g >> 2);
        let b5 = u16::from(self.b >> 3);
        (r5 << 11) | (g6 << 5) | b5
    }

    pub fn inverted(self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b)
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = StudioError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Rgb8> for String {
    fn from(value: Rgb8) -> Self {
        value.to_hex()
    }
}

impl std::fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Axis-aligned box in canvas pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box spanned by two corner points, in any order.
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Flips negative extents so that the origin is the top-left corner.
    pub fn normalized(self) -> Self {
        let mut out = self;
        if out.width < 0.0 {
            out.x += out.width;
            out.width = -out.width;
        }
        if out.height < 0.0 {
            out.y += out.height;
            out.height = -out.height;
        }
        out
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Pixel dimensions of a project, each side within `8..=512`.
///
/// Deserialization goes through [`Canvas::new`], so config files cannot
/// smuggle in an out-of-range size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "CanvasRecord")]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

#[derive(serde::Deserialize)]
struct CanvasRecord {
    width: u32,
    height: u32,
}

impl TryFrom<CanvasRecord> for Canvas {
    type Error = StudioError;

    fn try_from(rec: CanvasRecord) -> Result<Self, Self::Error> {
        Self::new(rec.width, rec.height)
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> StudioResult<Self> {
        let range = MIN_CANVAS_SIDE..=MAX_CANVAS_SIDE;
        if !range.contains(&width) || !range.contains(&height) {
            return Err(StudioError::validation(format!(
                "canvas size {width}x{height} is outside {MIN_CANVAS_SIDE}..={MAX_CANVAS_SIDE}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Flat `y*W + x` index, or `None` outside the canvas.
    pub fn index(self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 466,
            height: 466,
        }
    }
}

/// `a + (b - a) * t`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Rounds half away from negative infinity, the way generated C literals expect.
pub fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
