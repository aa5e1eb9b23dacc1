//! Dark theme palette and page metrics.

use garagelayout_core::{DeviceFamily, FlowDirection, SpotType};

use crate::surface::Rgb;

pub const MARGIN: f64 = 30.0;
pub const HEADER_HEIGHT: f64 = 40.0;
pub const STATS_HEIGHT: f64 = 24.0;
pub const LEGEND_HEIGHT: f64 = 40.0;
pub const FOOTER_HEIGHT: f64 = 16.0;
pub const GAP: f64 = 6.0;

pub const PAGE_BG: Rgb = Rgb(30, 32, 38);
pub const HEADER_BG: Rgb = Rgb(45, 48, 56);
pub const STATS_BG: Rgb = Rgb(38, 40, 48);
pub const CANVAS_BG: Rgb = Rgb(24, 26, 32);
pub const TEXT: Rgb = Rgb(235, 237, 242);
pub const MUTED_TEXT: Rgb = Rgb(150, 156, 170);

pub const LANE_FILL: Rgb = Rgb(80, 90, 110);
pub const LANE_MARK: Rgb = Rgb(240, 200, 80);
pub const RAMP_FILL: Rgb = Rgb(100, 70, 40);
pub const RAMP_STROKE: Rgb = Rgb(170, 120, 70);
pub const ENTRY_COLOR: Rgb = Rgb(60, 190, 100);
pub const EXIT_COLOR: Rgb = Rgb(225, 80, 70);

pub const CAMERA_COLOR: Rgb = Rgb(70, 150, 255);
pub const SENSOR_COLOR: Rgb = Rgb(245, 180, 40);
pub const SIGN_COLOR: Rgb = Rgb(60, 200, 120);
/// Fill opacity of a camera view cone.
pub const CONE_ALPHA: f64 = 0.35;
pub const CONE_SPREAD_DEG: f64 = 60.0;
/// Cone radius in canvas pixels.
pub const CONE_RADIUS: f64 = 60.0;

/// `(fill, stroke)` for a spot type.
pub fn spot_colors(spot_type: SpotType) -> (Rgb, Rgb) {
    match spot_type {
        SpotType::Regular => (Rgb(30, 45, 80), Rgb(70, 130, 230)),
        SpotType::Ev => (Rgb(25, 60, 40), Rgb(60, 190, 100)),
        SpotType::Ada => (Rgb(50, 35, 75), Rgb(150, 95, 225)),
    }
}

/// Glyph drawn inside a spot, if any.
pub fn spot_glyph(spot_type: SpotType) -> Option<&'static str> {
    match spot_type {
        SpotType::Regular => None,
        SpotType::Ev => Some("\u{26A1}"),
        SpotType::Ada => Some("\u{267F}"),
    }
}

pub fn gate_color(direction: FlowDirection) -> Rgb {
    match direction {
        FlowDirection::In => ENTRY_COLOR,
        FlowDirection::Out => EXIT_COLOR,
    }
}

pub fn gate_label(direction: FlowDirection) -> &'static str {
    match direction {
        FlowDirection::In => "ENTRY",
        FlowDirection::Out => "EXIT",
    }
}

pub fn device_color(family: DeviceFamily) -> Rgb {
    match family {
        DeviceFamily::Camera => CAMERA_COLOR,
        DeviceFamily::Sensor => SENSOR_COLOR,
        DeviceFamily::Sign => SIGN_COLOR,
    }
}
