//! # GarageLayout Designer
//!
//! Geometry engine for parking-garage floor plans.
//!
//! ## Core Components
//!
//! - **Grid**: grid quantization and smart snapping of spots and lanes
//! - **Auto-layout**: double-loaded aisle topology generated from spot counts
//! - **Editor**: tool state, placement, drag-end, resize handles, property
//!   edits and device management over an immutable [`Site`] snapshot
//!
//! ## Usage
//!
//! ```rust
//! use garagelayout_core::{ElementType, Site};
//! use garagelayout_designer::Editor;
//!
//! let mut site = Site::default();
//! let garage = site.add_garage("North", "");
//! let level = site.garage_mut(&garage).map(|g| g.add_level("P1")).unwrap();
//!
//! let mut editor = Editor::new(site);
//! editor.select_level(&garage, &level);
//! let id = editor.place_element(ElementType::Lane, 403.0, 297.0).unwrap();
//! let lane = editor.current_level().unwrap().element(&id).unwrap();
//! assert_eq!((lane.x, lane.y), (400.0, 300.0));
//! ```
//!
//! [`Site`]: garagelayout_core::Site

pub mod autolayout;
pub mod editor;
pub mod grid;

pub use autolayout::{generate as generate_layout, AisleGeometry, AutoLayout, AutoLayoutParams};
pub use editor::{Editor, Handle, Notice, PropertyEdit, Selected, Severity, Tool};
pub use grid::{smart_snap, snap_to_grid, SnapResult, GRID, SNAP_THRESHOLD};
