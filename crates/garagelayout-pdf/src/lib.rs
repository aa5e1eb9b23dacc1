//! # GarageLayout PDF
//!
//! Renders each level of a garage as one dark-themed landscape A4 page:
//! header, statistics, the projected scene, a legend and page numbers.
//!
//! [`render::render_garage`] writes to any [`VectorDocument`]; the
//! [`PdfOutput`] backend produces the PDF bytes.

pub mod backend;
pub mod error;
pub mod geometry;
pub mod render;
pub mod style;
pub mod surface;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use garagelayout_core::{sanitize_file_name, Garage};

pub use backend::PdfOutput;
pub use error::{RenderError, RenderResult};
pub use render::{render_garage, PageLayout};
pub use surface::{DrawOp, RecordedPage, RecordingDocument, VectorDocument};

/// `{garage}_Layout_{YYYY-MM-DD}.pdf` with the garage name sanitized.
pub fn pdf_file_name(garage_name: &str, date: NaiveDate) -> String {
    format!(
        "{}_Layout_{}.pdf",
        sanitize_file_name(garage_name),
        date.format("%Y-%m-%d")
    )
}

/// Renders the garage to PDF bytes.
pub fn render_garage_pdf(garage: &Garage, generated_at: DateTime<Utc>) -> RenderResult<Vec<u8>> {
    let mut output = PdfOutput::new(&format!("{} Layout", garage.name))?;
    render_garage(garage, &mut output, generated_at)?;
    output.into_bytes()
}

/// Renders the garage and writes it into `dir` under [`pdf_file_name`].
pub fn export_garage_pdf(garage: &Garage, dir: &Path) -> RenderResult<PathBuf> {
    let now = Utc::now();
    let bytes = render_garage_pdf(garage, now)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(pdf_file_name(&garage.name, now.date_naive()));
    fs::write(&path, bytes)?;
    tracing::info!("Exported layout PDF to {}", path.display());
    Ok(path)
}
