//! Vector drawing surface.
//!
//! The renderer emits [`DrawOp`]s in page points with the origin at the top
//! left. A [`VectorDocument`] turns them into real output; the printpdf
//! backend lives in [`crate::backend`], and [`RecordingDocument`] keeps them
//! in memory.

use image::RgbImage;

/// Landscape A4 width in points.
pub const PAGE_WIDTH: f64 = 841.89;
/// Landscape A4 height in points.
pub const PAGE_HEIGHT: f64 = 595.28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn corners(&self) -> Vec<(f64, f64)> {
        vec![
            (self.x, self.y),
            (self.right(), self.y),
            (self.right(), self.bottom()),
            (self.x, self.bottom()),
        ]
    }

    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        (r > x && b > y).then(|| Rect::new(x, y, r - x, b - y))
    }
}

/// Dash pattern in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub on: f64,
    pub off: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillPolygon {
        points: Vec<(f64, f64)>,
        color: Rgb,
    },
    /// Fill painted with opacity `alpha` in `[0, 1]`.
    TranslucentFill {
        points: Vec<(f64, f64)>,
        color: Rgb,
        alpha: f64,
    },
    StrokePolyline {
        points: Vec<(f64, f64)>,
        closed: bool,
        color: Rgb,
        width: f64,
        dash: Option<Dash>,
    },
    /// Text anchored at its baseline.
    Text {
        text: String,
        x: f64,
        y: f64,
        size: f64,
        font: Font,
        color: Rgb,
        align: Align,
    },
    /// Raster image placed at `dest`, cut to `clip`.
    Image {
        dest: Rect,
        clip: Rect,
        image: RgbImage,
    },
}

/// Multi-page vector output.
pub trait VectorDocument {
    /// Starts a new page; following ops land on it.
    fn begin_page(&mut self, width: f64, height: f64);
    fn draw(&mut self, op: DrawOp);
}

/// Approximate advance width of Helvetica text in points.
pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars()
        .map(|c| match c {
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '|' | '!' | '\'' => 0.28,
            ' ' | 'f' | 't' | 'r' | 'I' | '-' | '(' | ')' | '/' => 0.33,
            'm' | 'w' | 'M' | 'W' => 0.83,
            c if c.is_ascii_uppercase() => 0.67,
            c if c.is_ascii_digit() => 0.56,
            _ => 0.52,
        })
        .sum::<f64>()
        * size
}

/// Replaces characters the built-in PDF fonts cannot show.
pub fn pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{26A1}' => out.push_str("EV"),
            '\u{267F}' => out.push_str("ADA"),
            '\u{2192}' => out.push_str("->"),
            c if (c as u32) < 0x100 => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// One recorded page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedPage {
    pub width: f64,
    pub height: f64,
    pub ops: Vec<DrawOp>,
}

impl RecordedPage {
    /// Every text drawn on the page, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| *t == needle)
    }
}

/// Keeps every op in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingDocument {
    pub pages: Vec<RecordedPage>,
}

impl VectorDocument for RecordingDocument {
    fn begin_page(&mut self, width: f64, height: f64) {
        self.pages.push(RecordedPage {
            width,
            height,
            ops: Vec::new(),
        });
    }

    fn draw(&mut self, op: DrawOp) {
        match self.pages.last_mut() {
            Some(page) => page.ops.push(op),
            None => tracing::warn!("Draw op before first page dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            a.intersect(&Rect::new(5.0, 5.0, 10.0, 10.0)),
            Some(Rect::new(5.0, 5.0, 5.0, 5.0))
        );
        assert_eq!(a.intersect(&Rect::new(20.0, 0.0, 5.0, 5.0)), None);
    }

    #[test]
    fn test_glyph_substitution() {
        assert_eq!(pdf_text("\u{26A1} 12"), "EV 12");
        assert_eq!(pdf_text("\u{267F}"), "ADA");
        assert_eq!(pdf_text("Caf\u{e9} \u{1F697}"), "Caf\u{e9} ?");
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let w = text_width("Page 2 of 3", 10.0);
        assert!(w > 40.0 && w < 70.0);
        assert!((text_width("abc", 20.0) - 2.0 * text_width("abc", 10.0)).abs() < 1e-9);
    }
}
