//! Command line interface.
//!
//! Every command loads the site, runs one operation and writes the site back
//! when it changed. The site comes from `--site <file>` or, by default, from
//! the snapshot store in the configured storage directory.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use garagelayout_core::{Garage, IdGenerator, Level, Site};
use garagelayout_designer::Editor;
use garagelayout_devices::{
    export_all, read_text_file, try_parse_camera_hub_config, try_parse_devices_config,
    ImportPlacement,
};
use garagelayout_pdf::export_garage_pdf;
use garagelayout_settings::{Config, SiteStore, StoredSite};

#[derive(Debug, Parser)]
#[command(name = "garagelayout", version, about = "Parking garage layout tools")]
pub struct Cli {
    /// Site JSON file to operate on instead of the stored snapshot
    #[arg(long, global = true)]
    pub site: Option<PathBuf>,

    /// Configuration file (JSON or TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a garage
    AddGarage {
        name: String,
        #[arg(long, default_value = "")]
        address: String,
    },
    /// Add a level to a garage
    AddLevel {
        #[arg(long)]
        garage: String,
        name: String,
    },
    /// Replace a level's layout with a generated aisle layout
    Autolayout {
        #[arg(long)]
        garage: String,
        #[arg(long)]
        level: String,
        /// Total spot count; keeps the level's value when omitted
        #[arg(long)]
        total: Option<u32>,
        #[arg(long)]
        ev: Option<u32>,
        #[arg(long)]
        ada: Option<u32>,
    },
    /// Import devices from a DevicesConfig or CameraHub document
    ImportXml {
        file: PathBuf,
        #[arg(long)]
        garage: String,
        #[arg(long)]
        level: String,
        #[arg(long, value_enum, default_value_t = XmlKind::Devices)]
        kind: XmlKind,
        /// Scatter imported devices with this seed instead of stacking them
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write DevicesConfig, CameraHub and FLI documents
    ExportXml {
        /// Output directory; defaults to the configured export directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render one garage to a PDF layout plan
    ExportPdf {
        #[arg(long)]
        garage: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print per-level counts
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum XmlKind {
    Devices,
    CameraHub,
}

/// Where the site is read from and written to.
#[derive(Debug, Clone)]
pub enum SiteSource {
    File(PathBuf),
    Store(SiteStore),
}

impl SiteSource {
    pub fn load(&self) -> Result<Site> {
        match self {
            Self::File(path) if path.exists() => {
                let content = read_text_file(path)?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Invalid site file {}", path.display()))
            }
            Self::File(_) => Ok(Site::default()),
            // Load failures stop the command before anything is saved.
            Self::Store(store) => {
                let stored = store.load().with_context(|| {
                    format!("Failed to read stored site {}", store.path().display())
                })?;
                Ok(stored.map(StoredSite::into_site).unwrap_or_default())
            }
        }
    }

    pub fn save(&self, site: &Site) -> Result<()> {
        match self {
            Self::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, serde_json::to_string_pretty(site)?)
                    .with_context(|| format!("Failed to write {}", path.display()))
            }
            Self::Store(store) => {
                store.save(site)?;
                Ok(())
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_file(path)?,
        None => match Config::default_path() {
            Ok(path) => Config::load_or_default(&path)?,
            Err(e) => {
                tracing::warn!("No config directory ({}); using defaults", e);
                Config::default()
            }
        },
    };
    config.validate()?;
    Ok(config)
}

/// Resolves a garage by id or, failing that, by name.
pub fn find_garage<'a>(site: &'a Site, key: &str) -> Result<&'a Garage> {
    site.garage(key)
        .or_else(|| site.garages.iter().find(|g| g.name == key))
        .ok_or_else(|| anyhow!("No garage with id or name '{key}'"))
}

/// Resolves a level of `garage` by id or name.
pub fn find_level<'a>(garage: &'a Garage, key: &str) -> Result<&'a Level> {
    garage
        .level(key)
        .or_else(|| garage.levels.iter().find(|l| l.name == key))
        .ok_or_else(|| anyhow!("No level '{key}' in garage '{}'", garage.name))
}

fn editor_at(site: Site, garage: &str, level: &str) -> Result<Editor> {
    let (gid, lid) = {
        let g = find_garage(&site, garage)?;
        (g.id.clone(), find_level(g, level)?.id.clone())
    };
    let mut editor = Editor::new(site);
    if !editor.select_level(&gid, &lid) {
        bail!("Level '{level}' could not be selected");
    }
    Ok(editor)
}

/// Runs one command and returns the text to print.
pub fn run(cli: Cli) -> Result<String> {
    let config = load_config(cli.config.as_deref())?;
    let source = match cli.site {
        Some(path) => SiteSource::File(path),
        None => SiteSource::Store(SiteStore::from_config(&config)),
    };
    let site = source.load()?;

    match cli.command {
        Command::AddGarage { name, address } => {
            let mut site = site;
            let id = site.add_garage(&name, address);
            source.save(&site)?;
            Ok(format!("Added garage '{name}' ({id})"))
        }
        Command::AddLevel { garage, name } => {
            let mut site = site;
            let gid = find_garage(&site, &garage)?.id.clone();
            let id = site
                .garage_mut(&gid)
                .map(|g| g.add_level(&name))
                .ok_or_else(|| anyhow!("Garage '{garage}' disappeared"))?;
            source.save(&site)?;
            Ok(format!("Added level '{name}' ({id})"))
        }
        Command::Autolayout {
            garage,
            level,
            total,
            ev,
            ada,
        } => {
            let (gid, lid) = {
                let g = find_garage(&site, &garage)?;
                (g.id.clone(), find_level(g, &level)?.id.clone())
            };
            let site = site.map_level(&gid, &lid, |l| {
                l.total_spots = total.unwrap_or(l.total_spots);
                l.ev_spots = ev.unwrap_or(l.ev_spots);
                l.ada_spots = ada.unwrap_or(l.ada_spots);
            });
            let mut editor = editor_at(site, &gid, &lid)?;
            let count = editor.auto_layout(config.canvas.width, config.canvas.height)?;
            source.save(editor.site())?;
            Ok(format!("Generated {count} layout elements"))
        }
        Command::ImportXml {
            file,
            garage,
            level,
            kind,
            seed,
        } => {
            let xml = read_text_file(&file)?;
            let placement = match seed {
                Some(seed) => ImportPlacement::Scattered { seed },
                None => ImportPlacement::default(),
            };
            let mut ids = IdGenerator::for_site("dev", &site);
            let devices = match kind {
                XmlKind::Devices => try_parse_devices_config(&xml, &mut ids, placement),
                XmlKind::CameraHub => try_parse_camera_hub_config(&xml, &mut ids, placement),
            }
            .with_context(|| format!("Failed to parse {}", file.display()))?;
            let mut editor = editor_at(site, &garage, &level)?;
            let notice = editor.import_devices(devices);
            source.save(editor.site())?;
            Ok(notice.message)
        }
        Command::ExportXml { out } => {
            let dir = out.unwrap_or_else(|| config.export.directory.clone());
            let written = export_all(&site, &dir)?;
            Ok(written
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join("\n"))
        }
        Command::ExportPdf { garage, out } => {
            let garage = find_garage(&site, &garage)?;
            let dir = out.unwrap_or_else(|| config.export.directory.clone());
            let path = export_garage_pdf(garage, &dir)?;
            Ok(path.display().to_string())
        }
        Command::Summary => Ok(summary(&site)),
    }
}

/// One line per level, grouped under each garage.
pub fn summary(site: &Site) -> String {
    if site.garages.is_empty() {
        return "No garages".to_string();
    }
    let mut lines = Vec::new();
    for garage in &site.garages {
        lines.push(format!("{} ({} levels)", garage.name, garage.levels.len()));
        for level in &garage.levels {
            lines.push(format!("  {}: {}", level.name, level.summary()));
        }
    }
    lines.join("\n")
}
