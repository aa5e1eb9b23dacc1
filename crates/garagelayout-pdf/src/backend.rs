//! printpdf backend for [`VectorDocument`].

use std::collections::BTreeMap;

use image::imageops::FilterType;
use printpdf::lopdf::content::Operation;
use printpdf::lopdf::{self, Dictionary, Object};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, LineDashPattern, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Px,
};

use crate::error::{RenderError, RenderResult};
use crate::surface::{pdf_text, text_width, Align, DrawOp, Font, Rect, Rgb, VectorDocument};

const PT_TO_MM: f64 = 25.4 / 72.0;
/// Image resolution at which one pixel spans one point.
const POINT_DPI: f32 = 72.0;
/// Longest side, in pixels, of an embedded background image.
const MAX_IMAGE_SIDE: u32 = 2048;

/// PDF output through `printpdf`. Coordinates arrive in points from the top
/// left and are flipped to PDF's bottom-left origin.
pub struct PdfOutput {
    doc: PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    layer: Option<PdfLayerReference>,
    page_height: f64,
    pages: usize,
    /// Fill opacity graphics states by resource name.
    fill_alphas: BTreeMap<String, f32>,
}

impl PdfOutput {
    pub fn new(title: &str) -> RenderResult<Self> {
        let doc = PdfDocument::empty(title);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        Ok(Self {
            doc,
            regular,
            bold,
            layer: None,
            page_height: 0.0,
            pages: 0,
            fill_alphas: BTreeMap::new(),
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Serializes the document.
    ///
    /// printpdf has no public way to register a fill opacity, so the
    /// graphics states named by translucent fills are added to every page's
    /// resources after the fact.
    pub fn into_bytes(self) -> RenderResult<Vec<u8>> {
        let bytes = self
            .doc
            .save_to_bytes()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        if self.fill_alphas.is_empty() {
            return Ok(bytes);
        }
        let pdf_err = |e: lopdf::Error| RenderError::Pdf(e.to_string());
        let mut pdf = lopdf::Document::load_mem(&bytes).map_err(pdf_err)?;
        for page_id in pdf.get_pages().into_values() {
            let resources = pdf
                .get_or_create_resources(page_id)
                .and_then(Object::as_dict_mut)
                .map_err(pdf_err)?;
            let mut states = match resources.get(b"ExtGState") {
                Ok(Object::Dictionary(existing)) => existing.clone(),
                _ => Dictionary::new(),
            };
            for (name, alpha) in &self.fill_alphas {
                let mut state = Dictionary::new();
                state.set("Type", Object::Name(b"ExtGState".to_vec()));
                state.set("ca", Object::Real(*alpha));
                states.set(name.as_bytes().to_vec(), Object::Dictionary(state));
            }
            resources.set("ExtGState", Object::Dictionary(states));
        }
        let mut out = Vec::new();
        pdf.save_to(&mut out)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        Ok(out)
    }

    fn mm(v: f64) -> Mm {
        Mm((v * PT_TO_MM) as f32)
    }

    fn to_pdf(&self, (x, y): (f64, f64)) -> Point {
        Point::new(Self::mm(x), Self::mm(self.page_height - y))
    }

    fn color(c: Rgb) -> Color {
        Color::Rgb(printpdf::Rgb::new(
            c.0 as f32 / 255.0,
            c.1 as f32 / 255.0,
            c.2 as f32 / 255.0,
            None,
        ))
    }

    fn fill(&self, layer: &PdfLayerReference, points: &[(f64, f64)], color: Rgb) {
        if points.len() < 3 {
            return;
        }
        layer.set_fill_color(Self::color(color));
        layer.add_polygon(Polygon {
            rings: vec![points.iter().map(|&p| (self.to_pdf(p), false)).collect()],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn translucent_fill(
        &mut self,
        layer: &PdfLayerReference,
        points: &[(f64, f64)],
        color: Rgb,
        alpha: f64,
    ) {
        let alpha = alpha.clamp(0.0, 1.0) as f32;
        let name = format!("GSFillAlpha{}", (alpha * 1000.0).round() as u32);
        self.fill_alphas.insert(name.clone(), alpha);
        layer.save_graphics_state();
        layer.add_operation(Operation::new("gs", vec![Object::Name(name.into_bytes())]));
        self.fill(layer, points, color);
        layer.restore_graphics_state();
    }

    /// Embeds the visible part of `image` as one image XObject.
    fn embed_image(
        &self,
        layer: &PdfLayerReference,
        dest: Rect,
        clip: Rect,
        image: &image::RgbImage,
    ) {
        let Some(crop) = visible_crop(dest, clip, image.width(), image.height()) else {
            return;
        };
        let mut pixels =
            image::imageops::crop_imm(image, crop.x, crop.y, crop.width, crop.height).to_image();
        if crop.width.max(crop.height) > MAX_IMAGE_SIDE {
            let longest = crop.width.max(crop.height);
            pixels = image::imageops::resize(
                &pixels,
                (crop.width * MAX_IMAGE_SIDE / longest).max(1),
                (crop.height * MAX_IMAGE_SIDE / longest).max(1),
                FilterType::Triangle,
            );
        }
        let (pw, ph) = pixels.dimensions();
        let xobject = ImageXObject {
            width: Px(pw as usize),
            height: Px(ph as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: pixels.into_raw(),
            image_filter: None,
            smask: None,
            clipping_bbox: None,
        };
        let placed = crop.placed;
        Image::from(xobject).add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Self::mm(placed.x)),
                translate_y: Some(Self::mm(self.page_height - placed.bottom())),
                scale_x: Some((placed.w / pw as f64) as f32),
                scale_y: Some((placed.h / ph as f64) as f32),
                dpi: Some(POINT_DPI),
                ..ImageTransform::default()
            },
        );
    }
}

/// Pixel window of an image drawn at `dest` that falls inside `clip`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Crop {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    /// Page rectangle the window covers.
    placed: Rect,
}

fn visible_crop(dest: Rect, clip: Rect, width: u32, height: u32) -> Option<Crop> {
    if width == 0 || height == 0 || dest.w <= 0.0 || dest.h <= 0.0 {
        return None;
    }
    let visible = dest.intersect(&clip)?;
    let px_w = dest.w / width as f64;
    let px_h = dest.h / height as f64;
    let x0 = (((visible.x - dest.x) / px_w).floor() as u32).min(width - 1);
    let y0 = (((visible.y - dest.y) / px_h).floor() as u32).min(height - 1);
    let x1 = (((visible.right() - dest.x) / px_w).ceil() as u32).clamp(x0 + 1, width);
    let y1 = (((visible.bottom() - dest.y) / px_h).ceil() as u32).clamp(y0 + 1, height);
    Some(Crop {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
        placed: Rect::new(
            dest.x + x0 as f64 * px_w,
            dest.y + y0 as f64 * px_h,
            (x1 - x0) as f64 * px_w,
            (y1 - y0) as f64 * px_h,
        ),
    })
}

impl VectorDocument for PdfOutput {
    fn begin_page(&mut self, width: f64, height: f64) {
        let (page, layer) = self
            .doc
            .add_page(Self::mm(width), Self::mm(height), "Layout");
        self.layer = Some(self.doc.get_page(page).get_layer(layer));
        self.page_height = height;
        self.pages += 1;
    }

    fn draw(&mut self, op: DrawOp) {
        let Some(layer) = self.layer.clone() else {
            tracing::warn!("Draw op before first page dropped");
            return;
        };
        match op {
            DrawOp::FillPolygon { points, color } => self.fill(&layer, &points, color),
            DrawOp::TranslucentFill {
                points,
                color,
                alpha,
            } => self.translucent_fill(&layer, &points, color, alpha),
            DrawOp::StrokePolyline {
                points,
                closed,
                color,
                width,
                dash,
            } => {
                layer.set_outline_color(Self::color(color));
                layer.set_outline_thickness(width as f32);
                layer.set_line_dash_pattern(match dash {
                    Some(d) => LineDashPattern {
                        dash_1: Some(d.on.round().max(1.0) as i64),
                        gap_1: Some(d.off.round().max(1.0) as i64),
                        ..LineDashPattern::default()
                    },
                    None => LineDashPattern::default(),
                });
                layer.add_line(Line {
                    points: points.iter().map(|&p| (self.to_pdf(p), false)).collect(),
                    is_closed: closed,
                });
                if dash.is_some() {
                    layer.set_line_dash_pattern(LineDashPattern::default());
                }
            }
            DrawOp::Text {
                text,
                x,
                y,
                size,
                font,
                color,
                align,
            } => {
                let text = pdf_text(&text);
                let x = match align {
                    Align::Left => x,
                    Align::Center => x - text_width(&text, size) / 2.0,
                    Align::Right => x - text_width(&text, size),
                };
                let font = match font {
                    Font::Regular => &self.regular,
                    Font::Bold => &self.bold,
                };
                layer.set_fill_color(Self::color(color));
                layer.use_text(
                    text,
                    size as f32,
                    Self::mm(x),
                    Self::mm(self.page_height - y),
                    font,
                );
            }
            DrawOp::Image { dest, clip, image } => self.embed_image(&layer, dest, clip, &image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_page_resources(bytes: &[u8]) -> Dictionary {
        let pdf = lopdf::Document::load_mem(bytes).unwrap();
        let page = *pdf.get_pages().values().next().unwrap();
        let (direct, ids) = pdf.get_page_resources(page);
        direct
            .cloned()
            .or_else(|| ids.first().and_then(|id| pdf.get_dictionary(*id).ok()).cloned())
            .unwrap()
    }

    #[test]
    fn test_visible_crop_trims_to_clip() {
        // 10x10 pixels drawn 2pt per pixel, right half clipped away
        let dest = Rect::new(0.0, 0.0, 20.0, 20.0);
        let clip = Rect::new(-5.0, 3.0, 15.0, 100.0);
        let crop = visible_crop(dest, clip, 10, 10).unwrap();
        assert_eq!((crop.x, crop.y, crop.width, crop.height), (0, 1, 5, 9));
        assert_eq!(crop.placed, Rect::new(0.0, 2.0, 10.0, 18.0));
    }

    #[test]
    fn test_visible_crop_outside_clip() {
        let dest = Rect::new(0.0, 0.0, 20.0, 20.0);
        assert_eq!(visible_crop(dest, Rect::new(50.0, 0.0, 10.0, 10.0), 4, 4), None);
        assert_eq!(visible_crop(dest, dest, 0, 4), None);
    }

    #[test]
    fn test_translucent_fill_registers_opacity() {
        let mut out = PdfOutput::new("t").unwrap();
        out.begin_page(200.0, 100.0);
        out.draw(DrawOp::TranslucentFill {
            points: vec![(10.0, 10.0), (50.0, 10.0), (30.0, 40.0)],
            color: Rgb(70, 150, 255),
            alpha: 0.35,
        });
        let resources = first_page_resources(&out.into_bytes().unwrap());
        let states = resources.get(b"ExtGState").unwrap().as_dict().unwrap();
        let state = states.get(b"GSFillAlpha350").unwrap().as_dict().unwrap();
        let ca = state.get(b"ca").unwrap().as_f32().unwrap();
        assert!((ca - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_image_is_embedded_once() {
        let mut out = PdfOutput::new("t").unwrap();
        out.begin_page(200.0, 100.0);
        out.draw(DrawOp::Image {
            dest: Rect::new(10.0, 10.0, 60.0, 40.0),
            clip: Rect::new(0.0, 0.0, 200.0, 100.0),
            image: image::RgbImage::from_pixel(30, 20, image::Rgb([200, 10, 10])),
        });
        let resources = first_page_resources(&out.into_bytes().unwrap());
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        assert_eq!(xobjects.len(), 1);
    }
}
