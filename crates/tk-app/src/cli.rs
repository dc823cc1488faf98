//! Command-line front end of the `tk` binary
//!
//! Parses arguments with clap, loads the configuration and hands each
//! subcommand to [`crate::runner`]. Reports go to stdout as JSON or paths.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use glam::Vec3;
use serde::Serialize;
use tk_core::properties::FiberBoardParams;
use tk_core::{ArraySpec, ExportFormat, ProfileParams};

use crate::config::{CONFIG_FILE_NAME, ConfigManager, create_shared_config};
use crate::error::{AppError, Result};
use crate::runner::{self, ExportRequest, NewLayout};
use crate::services::BomKind;

#[derive(Debug, Parser)]
#[command(name = "tk", about = "Square-tube array layouts from the command line", version)]
pub struct Cli {
    /// Configuration file, created with defaults when missing
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Never contact the tubekit services
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a project with a fresh array.
    Init(InitArgs),

    /// Write the layout as STL, DXF or SVG.
    Export(ExportArgs),

    /// Print member and total section properties.
    Properties(ProjectArgs),

    /// Print properties of a fiber-reinforced board.
    #[command(name = "fiber-board")]
    FiberBoard(FiberBoardArgs),

    /// Print the bill of materials, or render it remotely.
    Bom(BomArgs),

    /// Move one member by an offset.
    Move(MoveArgs),

    /// Soft-delete one member.
    Delete(MemberArgs),

    /// Fetch the latest designed plate into the project.
    Plate(ProjectArgs),

    /// Write the configuration file.
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    pub project: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    pub project: PathBuf,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "count-x", default_value_t = 1)]
    pub count_x: u32,

    #[arg(long = "count-y", default_value_t = 1)]
    pub count_y: u32,

    #[arg(long = "spacing-x", default_value_t = 50.0)]
    pub spacing_x: f32,

    #[arg(long = "spacing-y", default_value_t = 50.0)]
    pub spacing_y: f32,

    #[arg(long, default_value_t = 20.0)]
    pub width: f32,

    #[arg(long, default_value_t = 20.0)]
    pub height: f32,

    #[arg(long, default_value_t = 2.0)]
    pub thickness: f32,

    #[arg(long, default_value_t = 200.0)]
    pub length: f32,

    #[arg(long, default_value = "Q235")]
    pub material: String,
}

impl InitArgs {
    fn layout(&self) -> NewLayout {
        NewLayout {
            name: self.name.clone(),
            profile: ProfileParams {
                width: self.width,
                height: self.height,
                thickness: self.thickness,
                length: self.length,
                material: self.material.clone(),
                ..Default::default()
            },
            array: ArraySpec {
                count_x: self.count_x,
                count_y: self.count_y,
                spacing_x: self.spacing_x,
                spacing_y: self.spacing_y,
            },
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct FiberBoardArgs {
    #[arg(long, default_value_t = 1000.0)]
    pub width: f32,

    #[arg(long, default_value_t = 1000.0)]
    pub height: f32,

    #[arg(long, default_value_t = 5.0)]
    pub thickness: f32,

    #[arg(long = "fiber-type", default_value = "E-glass")]
    pub fiber_type: String,

    #[arg(long = "resin-type", default_value = "epoxy")]
    pub resin_type: String,
}

impl From<FiberBoardArgs> for FiberBoardParams {
    fn from(args: FiberBoardArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
            thickness: args.thickness,
            fiber_type: args.fiber_type,
            resin_type: args.resin_type,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    pub project: PathBuf,

    #[arg(long = "out-dir")]
    pub out_dir: Option<PathBuf>,

    #[arg(long)]
    pub stem: Option<String>,

    /// stl, stl-binary, dxf or svg; repeatable
    #[arg(long = "format")]
    pub formats: Vec<ExportFormat>,

    /// Apply the latest designed plate before exporting
    #[arg(long = "fetch-plate")]
    pub fetch_plate: bool,
}

#[derive(Debug, Clone, Args)]
pub struct BomArgs {
    pub project: PathBuf,

    #[arg(long = "page-size")]
    pub page_size: Option<usize>,

    /// Render a spreadsheet through the BOM service
    #[arg(long, conflicts_with = "print")]
    pub excel: bool,

    /// Render a printable page through the BOM service
    #[arg(long)]
    pub print: bool,
}

impl BomArgs {
    fn remote(&self) -> Option<BomKind> {
        if self.excel {
            Some(BomKind::Excel)
        } else if self.print {
            Some(BomKind::Print)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct MemberArgs {
    pub project: PathBuf,
    pub index: u32,
}

#[derive(Debug, Clone, Args)]
pub struct MoveArgs {
    pub project: PathBuf,
    pub index: u32,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub dx: f32,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub dy: f32,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub dz: f32,
}

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Overwrite the file with the defaults
    #[arg(long)]
    pub reset: bool,
}

pub fn run_from_env() -> Result<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<()> {
    let shared = create_shared_config(ConfigManager::load(&cli.config)?);
    let mut config = shared.read().config().clone();
    if cli.offline {
        config.services.enabled = false;
    }

    match cli.command {
        Commands::Init(args) => {
            let project = runner::create_project(&config, &args.project, args.layout())?;
            println!("{} ({} members)", args.project.display(), project.model.active_count());
        }
        Commands::Export(args) => {
            let request = ExportRequest {
                out_dir: args.out_dir,
                stem: args.stem,
                formats: args.formats,
                fetch_plate: args.fetch_plate,
            };
            for path in runner::export_project(&config, &args.project, request)? {
                println!("{}", path.display());
            }
        }
        Commands::Properties(args) => {
            print_json(&runner::project_properties(&config, &args.project)?)?;
        }
        Commands::FiberBoard(args) => {
            print_json(&runner::fiber_board_report(&config, args.into()))?;
        }
        Commands::Bom(args) => {
            let report = runner::project_bom(&config, &args.project, args.page_size, args.remote())?;
            print_json(&report)?;
        }
        Commands::Move(args) => {
            let delta = Vec3::new(args.dx, args.dy, args.dz);
            report_edit(&args.project, runner::move_member(&config, &args.project, args.index, delta)?);
        }
        Commands::Delete(args) => {
            report_edit(&args.project, runner::delete_member(&config, &args.project, args.index)?);
        }
        Commands::Plate(args) => {
            report_edit(&args.project, runner::update_plate(&config, &args.project)?);
        }
        Commands::Config(args) => {
            let mut manager = shared.write();
            if args.reset {
                manager.reset_to_defaults();
            }
            manager.save()?;
            println!("{}", manager.path().display());
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| AppError::Json(e.to_string()))?;
    println!("{json}");
    Ok(())
}

fn report_edit(project: &Path, changed: bool) {
    if changed {
        println!("{} updated", project.display());
    } else {
        println!("{} unchanged", project.display());
    }
}
