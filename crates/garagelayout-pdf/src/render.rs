//! Level-by-level page rendering.
//!
//! Each level becomes one landscape page: header, stats bar, the scene
//! projected into the canvas area, legend and page footer. All drawing goes
//! through [`VectorDocument`], so the same pass feeds the PDF backend and the
//! in-memory recorder used by tests.

use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use image::RgbImage;

use garagelayout_core::{
    CurveDirection, Device, DeviceFamily, ElementKind, FlowDirection, Garage, LaneDirection,
    LayoutElement, Level, SpotType,
};

use crate::error::{RenderError, RenderResult};
use crate::geometry::{
    arc_points, arrow_head, circle, rotate_about, wedge, Projection, CONTENT_PADDING,
};
use crate::style::*;
use crate::surface::{
    Align, Dash, DrawOp, Font, Rect, Rgb, VectorDocument, PAGE_HEIGHT, PAGE_WIDTH,
};

/// Extent used for a level with nothing on it.
const EMPTY_EXTENT: (f64, f64) = (1200.0, 800.0);
/// Device marker radius in canvas pixels.
const DEVICE_RADIUS: f64 = 10.0;
const LANE_DASH: Dash = Dash { on: 6.0, off: 4.0 };
const SPOT_DASH: Dash = Dash { on: 3.0, off: 2.0 };

/// Regions of a page, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub header: Rect,
    pub stats: Rect,
    pub canvas: Rect,
    pub legend: Rect,
    pub footer: Rect,
}

impl PageLayout {
    pub fn landscape_a4() -> Self {
        let inner_w = PAGE_WIDTH - 2.0 * MARGIN;
        let header = Rect::new(MARGIN, MARGIN, inner_w, HEADER_HEIGHT);
        let stats = Rect::new(MARGIN, header.bottom() + GAP, inner_w, STATS_HEIGHT);
        let footer = Rect::new(
            MARGIN,
            PAGE_HEIGHT - MARGIN - FOOTER_HEIGHT,
            inner_w,
            FOOTER_HEIGHT,
        );
        let legend = Rect::new(MARGIN, footer.y - GAP - LEGEND_HEIGHT, inner_w, LEGEND_HEIGHT);
        let canvas_top = stats.bottom() + GAP;
        let canvas = Rect::new(MARGIN, canvas_top, inner_w, legend.y - GAP - canvas_top);
        Self {
            header,
            stats,
            canvas,
            legend,
            footer,
        }
    }
}

/// Renders every level of `garage` as its own page and returns the number
/// of pages emitted.
pub fn render_garage<D: VectorDocument>(
    garage: &Garage,
    doc: &mut D,
    generated_at: DateTime<Utc>,
) -> RenderResult<usize> {
    if garage.levels.is_empty() {
        return Err(RenderError::NoLevels(garage.name.clone()));
    }
    let timestamp = generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let total = garage.levels.len();
    for (index, level) in garage.levels.iter().enumerate() {
        doc.begin_page(PAGE_WIDTH, PAGE_HEIGHT);
        let mut page = PageWriter {
            doc: &mut *doc,
            layout: PageLayout::landscape_a4(),
        };
        page.render_level(garage, level, &timestamp, index + 1, total);
    }
    tracing::info!("Rendered {} page(s) for garage '{}'", total, garage.name);
    Ok(total)
}

/// Largest scene coordinate to fit, padded. Devices count too.
pub fn scene_extent(level: &Level) -> (f64, f64) {
    let element_max = level.layout_elements.iter().map(|e| {
        let (_, _, max_x, max_y) = e.bounds();
        (max_x, max_y)
    });
    let device_max = level.devices.iter().map(|d| (d.x, d.y));
    element_max
        .chain(device_max)
        .reduce(|a, b| (a.0.max(b.0), a.1.max(b.1)))
        .map(|(x, y)| (x + CONTENT_PADDING, y + CONTENT_PADDING))
        .unwrap_or(EMPTY_EXTENT)
}

/// Decodes a `data:` URL into pixels. `None` when it is not a base64 image.
pub fn decode_data_url(url: &str) -> Option<RgbImage> {
    let (meta, payload) = url.split_once(',')?;
    if !meta.starts_with("data:") || !meta.ends_with(";base64") {
        tracing::warn!("Background is not a base64 data URL; skipped");
        return None;
    }
    let bytes = match base64::engine::general_purpose::STANDARD.decode(payload.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Background image base64 invalid: {}", e);
            return None;
        }
    };
    match image::load_from_memory(&bytes) {
        Ok(img) => Some(img.to_rgb8()),
        Err(e) => {
            tracing::warn!("Background image could not be decoded: {}", e);
            None
        }
    }
}

struct PageWriter<'a, D: VectorDocument> {
    doc: &'a mut D,
    layout: PageLayout,
}

impl<D: VectorDocument> PageWriter<'_, D> {
    fn render_level(
        &mut self,
        garage: &Garage,
        level: &Level,
        timestamp: &str,
        page: usize,
        total: usize,
    ) {
        let layout = self.layout;
        self.fill(
            Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT).corners(),
            PAGE_BG,
        );

        self.fill(layout.header.corners(), HEADER_BG);
        let header_baseline = layout.header.y + layout.header.h / 2.0 + 6.0;
        self.text(
            &garage.name,
            layout.header.x + 12.0,
            header_baseline,
            18.0,
            Font::Bold,
            TEXT,
            Align::Left,
        );
        self.text(
            &format!("{} - Layout Plan", level.name),
            layout.header.right() - 12.0,
            header_baseline,
            12.0,
            Font::Regular,
            TEXT,
            Align::Right,
        );

        self.fill(layout.stats.corners(), STATS_BG);
        let stats_baseline = layout.stats.y + layout.stats.h / 2.0 + 3.5;
        self.text(
            &level.summary().to_string(),
            layout.stats.x + 10.0,
            stats_baseline,
            10.0,
            Font::Regular,
            TEXT,
            Align::Left,
        );
        self.text(
            timestamp,
            layout.stats.right() - 10.0,
            stats_baseline,
            9.0,
            Font::Regular,
            MUTED_TEXT,
            Align::Right,
        );

        self.fill(layout.canvas.corners(), CANVAS_BG);
        let (max_x, max_y) = scene_extent(level);
        let proj = Projection::fit(layout.canvas, max_x, max_y);
        if let Some(bg) = level.bg_image.as_deref().and_then(decode_data_url) {
            let (ox, oy) = proj.point(0.0, 0.0);
            let (iw, ih) = bg.dimensions();
            self.doc.draw(DrawOp::Image {
                dest: Rect::new(ox, oy, proj.length(iw as f64), proj.length(ih as f64)),
                clip: layout.canvas,
                image: bg,
            });
        }
        self.scene(garage, level, &proj);

        self.legend();
        self.text(
            &format!("Page {page} of {total}"),
            layout.footer.x + layout.footer.w / 2.0,
            layout.footer.bottom() - 4.0,
            9.0,
            Font::Regular,
            MUTED_TEXT,
            Align::Center,
        );
    }

    fn scene(&mut self, garage: &Garage, level: &Level, proj: &Projection) {
        let of_kind = |pred: fn(&ElementKind) -> bool| {
            level
                .layout_elements
                .iter()
                .filter(move |e| pred(&e.kind))
        };
        for e in of_kind(|k| matches!(k, ElementKind::Lane { .. })) {
            self.lane(e, proj);
        }
        for e in of_kind(|k| matches!(k, ElementKind::Curve { .. })) {
            self.curve(e, proj);
        }
        for e in of_kind(|k| matches!(k, ElementKind::Spot { .. })) {
            self.spot(e, proj);
        }
        for e in of_kind(|k| matches!(k, ElementKind::Entrance { .. })) {
            self.entrance(e, proj);
        }
        for e in of_kind(|k| matches!(k, ElementKind::Ramp { .. })) {
            self.ramp(e, garage, proj);
        }
        for d in &level.devices {
            self.device(d, proj);
        }
    }

    fn lane(&mut self, e: &LayoutElement, proj: &Projection) {
        let ElementKind::Lane { direction, .. } = &e.kind else {
            return;
        };
        let (w, h) = e.footprint();
        self.fill(element_rect(e, proj, -w / 2.0, -h / 2.0, w / 2.0, h / 2.0), LANE_FILL);

        let (from, to, heading) = match direction {
            LaneDirection::Up => ((0.0, h / 2.0), (0.0, -h / 2.0), -90.0),
            LaneDirection::Down => ((0.0, -h / 2.0), (0.0, h / 2.0), 90.0),
            LaneDirection::Left => ((w / 2.0, 0.0), (-w / 2.0, 0.0), 180.0),
            LaneDirection::Right => ((-w / 2.0, 0.0), (w / 2.0, 0.0), 0.0),
        };
        self.stroke(
            vec![element_point(e, proj, from), element_point(e, proj, to)],
            false,
            LANE_MARK,
            1.0,
            Some(LANE_DASH),
        );
        let (cx, cy) = proj.point(e.x, e.y);
        let size = proj.length(w.min(h) * 0.25).max(2.0);
        self.fill(arrow_head(cx, cy, size, heading + e.rotation), LANE_MARK);
    }

    fn curve(&mut self, e: &LayoutElement, proj: &Projection) {
        let ElementKind::Curve {
            width,
            height,
            direction,
        } = &e.kind
        else {
            return;
        };
        let (l, t, r, b) = e.local_extent();
        self.fill(element_rect(e, proj, l, t, r, b), LANE_FILL);

        // The turn runs through the middle of the track.
        let radius = ((height - width) / 2.0).max(width / 2.0);
        let (center_x, start) = match direction {
            CurveDirection::Right => (r - width / 2.0 - radius, -90.0),
            CurveDirection::Left => (l + width / 2.0 + radius, 90.0),
        };
        let points = arc_points(center_x, 0.0, radius, start, 180.0)
            .into_iter()
            .map(|p| element_point(e, proj, p))
            .collect();
        self.stroke(points, false, LANE_MARK, 1.0, Some(LANE_DASH));
    }

    fn spot(&mut self, e: &LayoutElement, proj: &Projection) {
        let ElementKind::Spot {
            spot_type,
            width,
            height,
            spot_number,
        } = &e.kind
        else {
            return;
        };
        let (fill, stroke) = spot_colors(*spot_type);
        let outline = element_rect(e, proj, -width / 2.0, -height / 2.0, width / 2.0, height / 2.0);
        self.fill(outline.clone(), fill);
        self.stroke(outline, true, stroke, 0.75, Some(SPOT_DASH));

        let (cx, cy) = proj.point(e.x, e.y);
        let size = proj.length(width * 0.3).clamp(3.0, 10.0);
        if let Some(glyph) = spot_glyph(*spot_type) {
            self.text(glyph, cx, cy, size, Font::Bold, stroke, Align::Center);
        }
        if let Some(n) = spot_number {
            let y = match spot_type {
                SpotType::Regular => cy + size / 3.0,
                _ => cy + size * 1.2,
            };
            self.text(&n.to_string(), cx, y, size, Font::Regular, TEXT, Align::Center);
        }
    }

    fn entrance(&mut self, e: &LayoutElement, proj: &Projection) {
        let ElementKind::Entrance { width, direction } = &e.kind else {
            return;
        };
        let (_, depth) = e.footprint();
        let color = gate_color(*direction);
        self.fill(
            element_rect(e, proj, -width / 2.0, -depth / 2.0, width / 2.0, depth / 2.0),
            color,
        );

        let (heading, label_offset) = match direction {
            FlowDirection::In => (90.0, depth * 1.5),
            FlowDirection::Out => (-90.0, -depth * 1.5),
        };
        let (cx, cy) = proj.point(e.x, e.y);
        self.fill(
            arrow_head(cx, cy, proj.length(depth * 0.4).max(2.0), heading + e.rotation),
            TEXT,
        );
        let (lx, ly) = element_point(e, proj, (0.0, label_offset));
        let size = proj.length(depth * 0.6).clamp(4.0, 9.0);
        self.text(
            gate_label(*direction),
            lx,
            ly + size / 3.0,
            size,
            Font::Bold,
            color,
            Align::Center,
        );
    }

    fn ramp(&mut self, e: &LayoutElement, garage: &Garage, proj: &Projection) {
        let ElementKind::Ramp { target_level, .. } = &e.kind else {
            return;
        };
        let (w, h) = e.footprint();
        let outline = element_rect(e, proj, -w / 2.0, -h / 2.0, w / 2.0, h / 2.0);
        self.fill(outline.clone(), RAMP_FILL);
        self.stroke(outline, true, RAMP_STROKE, 1.0, None);

        let (cx, cy) = proj.point(e.x, e.y);
        let size = proj.length(w * 0.2).clamp(4.0, 10.0);
        self.text("RAMP", cx, cy, size, Font::Bold, TEXT, Align::Center);
        if let Some(target) = target_level {
            self.text(
                &format!("\u{2192} {}", garage.destination_label(target)),
                cx,
                cy + size * 1.2,
                size * 0.8,
                Font::Regular,
                TEXT,
                Align::Center,
            );
        }
    }

    fn device(&mut self, d: &Device, proj: &Projection) {
        let (cx, cy) = proj.point(d.x, d.y);
        let color = device_color(d.family());
        if d.family() == DeviceFamily::Camera {
            self.doc.draw(DrawOp::TranslucentFill {
                points: wedge(
                    cx,
                    cy,
                    proj.length(CONE_RADIUS),
                    d.rotation() - 90.0,
                    CONE_SPREAD_DEG,
                ),
                color,
                alpha: CONE_ALPHA,
            });
        }
        let r = proj.length(DEVICE_RADIUS).max(2.0);
        self.fill(circle(cx, cy, r), color);
        self.text(
            &d.name,
            cx,
            cy + r + 8.0,
            7.0,
            Font::Regular,
            TEXT,
            Align::Center,
        );
    }

    fn legend(&mut self) {
        let area = self.layout.legend;
        let rows: [&[(&str, Rgb)]; 2] = [
            &[
                ("Regular", spot_colors(SpotType::Regular).1),
                ("EV \u{26A1}", spot_colors(SpotType::Ev).1),
                ("ADA \u{267F}", spot_colors(SpotType::Ada).1),
                ("Lane / Curve", LANE_FILL),
                ("Ramp", RAMP_FILL),
            ],
            &[
                ("Entry", ENTRY_COLOR),
                ("Exit", EXIT_COLOR),
                ("Camera", CAMERA_COLOR),
                ("Sensor", SENSOR_COLOR),
                ("Sign", SIGN_COLOR),
            ],
        ];
        let row_h = area.h / 2.0;
        let col_w = area.w / 5.0;
        for (r, row) in rows.iter().enumerate() {
            let y = area.y + r as f64 * row_h;
            for (c, (label, color)) in row.iter().enumerate() {
                let x = area.x + c as f64 * col_w;
                self.fill(Rect::new(x, y + 5.0, 10.0, 10.0).corners(), *color);
                self.text(
                    label,
                    x + 16.0,
                    y + 13.5,
                    9.0,
                    Font::Regular,
                    TEXT,
                    Align::Left,
                );
            }
        }
    }

    fn fill(&mut self, points: Vec<(f64, f64)>, color: Rgb) {
        self.doc.draw(DrawOp::FillPolygon { points, color });
    }

    fn stroke(
        &mut self,
        points: Vec<(f64, f64)>,
        closed: bool,
        color: Rgb,
        width: f64,
        dash: Option<Dash>,
    ) {
        self.doc.draw(DrawOp::StrokePolyline {
            points,
            closed,
            color,
            width,
            dash,
        });
    }

    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        size: f64,
        font: Font,
        color: Rgb,
        align: Align,
    ) {
        self.doc.draw(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            size,
            font,
            color,
            align,
        });
    }
}

/// Projects a point given relative to the element center, applying its
/// rotation.
fn element_point(e: &LayoutElement, proj: &Projection, (lx, ly): (f64, f64)) -> (f64, f64) {
    let (wx, wy) = rotate_about(e.x, e.y, lx, ly, e.rotation);
    proj.point(wx, wy)
}

fn element_rect(
    e: &LayoutElement,
    proj: &Projection,
    l: f64,
    t: f64,
    r: f64,
    b: f64,
) -> Vec<(f64, f64)> {
    [(l, t), (r, t), (r, b), (l, b)]
        .into_iter()
        .map(|p| element_point(e, proj, p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingDocument;
    use chrono::TimeZone;
    use garagelayout_core::{DeviceType, ElementType, NewDevice};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn fill_colors(ops: &[DrawOp]) -> Vec<Rgb> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::FillPolygon { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_page_layout_stacks_regions() {
        let l = PageLayout::landscape_a4();
        assert_eq!(l.header.x, MARGIN);
        assert!(l.stats.y > l.header.bottom());
        assert!(l.canvas.y > l.stats.bottom());
        assert!(l.legend.y > l.canvas.bottom());
        assert!((l.footer.bottom() - (PAGE_HEIGHT - MARGIN)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_level_extent() {
        assert_eq!(scene_extent(&Level::new("l", "Empty")), (1200.0, 800.0));
    }

    #[test]
    fn test_extent_includes_padding() {
        let mut level = Level::new("l", "L");
        level
            .layout_elements
            .push(LayoutElement::default_spot("s", 100.0, 100.0));
        level
            .devices
            .push(NewDevice::new(DeviceType::SensorSpace, "S").at(500.0, 50.0).build("d", "", ""));
        assert_eq!(scene_extent(&level), (600.0, 230.0));
    }

    #[test]
    fn test_header_and_stats_text() {
        let mut garage = Garage::new("g", "North Deck");
        let mut level = Level::new("l1", "Level 1");
        level
            .layout_elements
            .push(LayoutElement::default_spot("s", 100.0, 100.0));
        garage.levels.push(level);

        let mut doc = RecordingDocument::default();
        assert_eq!(render_garage(&garage, &mut doc, at()).unwrap(), 1);
        let page = &doc.pages[0];
        assert!(page.has_text("North Deck"));
        assert!(page.has_text("Level 1 - Layout Plan"));
        assert!(page.has_text("Spots: 1 | EV: 0 | ADA: 0 | Cameras: 0 | Sensors: 0 | Signs: 0"));
        assert!(page.has_text("2026-03-01T12:00:00Z"));
        assert!(page.has_text("Page 1 of 1"));
        assert_eq!(page.width, PAGE_WIDTH);
    }

    #[test]
    fn test_no_levels_is_an_error() {
        let garage = Garage::new("g", "Empty");
        let mut doc = RecordingDocument::default();
        assert!(matches!(
            render_garage(&garage, &mut doc, at()),
            Err(RenderError::NoLevels(_))
        ));
        assert!(doc.pages.is_empty());
    }

    #[test]
    fn test_z_order() {
        let mut garage = Garage::new("g", "G");
        let mut level = Level::new("l1", "L1");
        // Inserted in reverse of the drawing order.
        level
            .devices
            .push(NewDevice::new(DeviceType::SignLed, "Sign").at(50.0, 50.0).build("d", "", ""));
        for (id, t) in [
            ("r", ElementType::Ramp),
            ("e", ElementType::Entrance),
            ("s", ElementType::Spot),
            ("c", ElementType::Curve),
            ("ln", ElementType::Lane),
        ] {
            level
                .layout_elements
                .push(LayoutElement::new(id, t, 200.0, 200.0, 0.0));
        }
        garage.levels.push(level);

        let mut doc = RecordingDocument::default();
        render_garage(&garage, &mut doc, at()).unwrap();
        let colors = fill_colors(&doc.pages[0].ops);
        let first = |c: Rgb| colors.iter().position(|x| *x == c).unwrap();

        let lane = first(LANE_FILL);
        let spot = first(spot_colors(SpotType::Regular).0);
        let gate = first(ENTRY_COLOR);
        let ramp = first(RAMP_FILL);
        let sign = first(SIGN_COLOR);
        assert!(lane < spot && spot < gate && gate < ramp && ramp < sign);
    }

    #[test]
    fn test_camera_cone_is_translucent() {
        let mut garage = Garage::new("g", "G");
        let mut level = Level::new("l1", "L1");
        level
            .devices
            .push(NewDevice::new(DeviceType::CamDome, "Cam A").at(100.0, 100.0).build("d", "", ""));
        garage.levels.push(level);

        let mut doc = RecordingDocument::default();
        render_garage(&garage, &mut doc, at()).unwrap();
        let page = &doc.pages[0];
        let cone_at = page
            .ops
            .iter()
            .position(|op| {
                matches!(
                    op,
                    DrawOp::TranslucentFill { color, alpha, .. }
                        if *color == CAMERA_COLOR && *alpha == CONE_ALPHA
                )
            })
            .unwrap();
        let body_at = page
            .ops
            .iter()
            .position(|op| {
                matches!(op, DrawOp::FillPolygon { color, .. } if *color == CAMERA_COLOR)
            })
            .unwrap();
        assert!(cone_at < body_at);
        assert!(page.has_text("Cam A"));
    }

    #[test]
    fn test_ramp_labels() {
        let mut garage = Garage::new("g", "G");
        let mut l1 = Level::new("l1", "Ground");
        let mut ramp = LayoutElement::new("r", ElementType::Ramp, 100.0, 100.0, 0.0);
        if let ElementKind::Ramp { target_level, .. } = &mut ramp.kind {
            *target_level = Some("l2".into());
        }
        let mut dangling = LayoutElement::new("r2", ElementType::Ramp, 300.0, 100.0, 0.0);
        if let ElementKind::Ramp { target_level, .. } = &mut dangling.kind {
            *target_level = Some("gone".into());
        }
        l1.layout_elements.push(ramp);
        l1.layout_elements.push(dangling);
        garage.levels.push(l1);
        garage.levels.push(Level::new("l2", "Upper"));

        let mut doc = RecordingDocument::default();
        assert_eq!(render_garage(&garage, &mut doc, at()).unwrap(), 2);
        let page = &doc.pages[0];
        assert!(page.has_text("RAMP"));
        assert!(page.has_text("\u{2192} Upper"));
        assert!(page.has_text("\u{2192} (unresolved)"));
    }

    #[test]
    fn test_bad_background_is_skipped() {
        let mut garage = Garage::new("g", "G");
        let mut level = Level::new("l1", "L1");
        level.bg_image = Some("data:image/png;base64,not-an-image".into());
        garage.levels.push(level);

        let mut doc = RecordingDocument::default();
        render_garage(&garage, &mut doc, at()).unwrap();
        let page = &doc.pages[0];
        assert!(!page.ops.iter().any(|op| matches!(op, DrawOp::Image { .. })));
        assert!(page.has_text("Page 1 of 1"));
    }

    #[test]
    fn test_decode_data_url() {
        let mut png = Vec::new();
        image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]))
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let url = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&png)
        );
        let img = decode_data_url(&url).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30]);

        assert!(decode_data_url("https://example.com/a.png").is_none());
        assert!(decode_data_url("data:image/png;base64,@@@").is_none());
    }
}
