//! Command implementations
//!
//! Each runner takes the loaded [`AppConfig`] and returns what it produced;
//! printing is left to the CLI.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Serialize;
use tk_core::bom::{BomItem, bom_items, paginate};
use tk_core::properties::{
    FiberBoardParams, SectionProperties, estimate_price, fiber_board_properties,
};
use tk_core::scene::derive;
use tk_core::{
    ArrayModel, ArraySpec, Editor, ExportFormat, GeometryFactory, LogicalIndex, Project,
    ProfileParams, export_to_file,
};

use crate::config::{AppConfig, ServiceConfig};
use crate::error::{AppError, Result};
use crate::services::{
    BomClient, BomKind, ExportedFile, HttpCollaborators, ModelingClient, PlateClient, ServiceError,
};

/// Parameters of a freshly created layout
#[derive(Debug, Clone, Default)]
pub struct NewLayout {
    pub name: Option<String>,
    pub profile: ProfileParams,
    pub array: ArraySpec,
}

/// Write a new project holding one untouched array
pub fn create_project(config: &AppConfig, path: &Path, layout: NewLayout) -> Result<Project> {
    let name = layout.name.unwrap_or_else(|| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("layout")
            .to_string()
    });
    let model = ArrayModel::new(layout.profile, layout.array);
    let project = Project::new(name, model, config.editor.clone());
    project.save(path)?;
    tracing::info!(
        "Created project {} with {} members",
        path.display(),
        project.model.active_count()
    );
    Ok(project)
}

/// File name for one export format. Both STL flavours share an extension.
pub fn export_file_name(stem: &str, format: ExportFormat) -> String {
    match format {
        ExportFormat::StlBinary => format!("{stem}_binary.{}", format.extension()),
        _ => format!("{stem}.{}", format.extension()),
    }
}

/// Where and how to export; empty fields fall back to the config
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    pub out_dir: Option<PathBuf>,
    pub stem: Option<String>,
    pub formats: Vec<ExportFormat>,
    pub fetch_plate: bool,
}

/// Export a project's layout in every requested format
pub fn export_project(config: &AppConfig, path: &Path, request: ExportRequest) -> Result<Vec<PathBuf>> {
    let mut project = Project::load(path)?;
    if request.fetch_plate {
        apply_latest_plate(&config.services, &mut project)?;
    }

    let out_dir = request
        .out_dir
        .unwrap_or_else(|| config.export.output_dir.clone());
    let stem = request
        .stem
        .unwrap_or_else(|| config.export.file_stem.clone());
    let formats = if request.formats.is_empty() {
        config.export.formats.clone()
    } else {
        request.formats
    };
    std::fs::create_dir_all(&out_dir)?;

    let batch = derive(&project.model, &project.settings.holes);
    let mesh = GeometryFactory::new().profile_mesh(&project.model.profile);

    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let target = out_dir.join(export_file_name(&stem, format));
        export_to_file(&target, format, &batch, &mesh)?;
        written.push(target);
    }
    Ok(written)
}

/// Replace the project's plate with the latest designed one
///
/// Returns `false` when the service has no plate or it is already applied.
pub fn apply_latest_plate(services: &ServiceConfig, project: &mut Project) -> Result<bool> {
    if !services.enabled {
        return Err(AppError::ServicesDisabled);
    }
    let Some(plate) = PlateClient::new(services).latest()? else {
        tracing::info!("No plate designed yet");
        return Ok(false);
    };
    match project.model.with_plate(Some(plate)) {
        Some(model) => {
            project.model = model;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Fetch the plate into the project file
pub fn update_plate(config: &AppConfig, path: &Path) -> Result<bool> {
    let mut project = Project::load(path)?;
    let changed = apply_latest_plate(&config.services, &mut project)?;
    if changed {
        project.save(path)?;
        tracing::info!("Plate applied to {}", path.display());
    }
    Ok(changed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertySource {
    Service,
    Local,
}

/// Ask the modeling service, falling back to `local` when it is disabled or
/// unreachable
fn remote_or_local(
    services: &ServiceConfig,
    remote: impl FnOnce(&ModelingClient) -> std::result::Result<SectionProperties, ServiceError>,
    local: impl FnOnce() -> SectionProperties,
) -> (SectionProperties, PropertySource) {
    if services.enabled {
        match remote(&ModelingClient::new(services)) {
            Ok(properties) => return (properties, PropertySource::Service),
            Err(e) => tracing::warn!("Modeling service unavailable, computing locally: {}", e),
        }
    }
    (local(), PropertySource::Local)
}

/// Properties of one member, from the modeling service when reachable
pub fn section_properties(
    services: &ServiceConfig,
    profile: &ProfileParams,
) -> (SectionProperties, PropertySource) {
    remote_or_local(
        services,
        |client| client.square_tube(profile),
        || SectionProperties::of(profile),
    )
}

pub fn board_properties(
    services: &ServiceConfig,
    board: &FiberBoardParams,
) -> (SectionProperties, PropertySource) {
    remote_or_local(
        services,
        |client| client.fiber_board(board),
        || fiber_board_properties(board),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiberBoardReport {
    pub source: PropertySource,
    pub board: FiberBoardParams,
    pub properties: SectionProperties,
}

pub fn fiber_board_report(config: &AppConfig, board: FiberBoardParams) -> FiberBoardReport {
    let (properties, source) = board_properties(&config.services, &board);
    FiberBoardReport {
        source,
        board,
        properties,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesReport {
    pub source: PropertySource,
    pub member: SectionProperties,
    /// Active array members plus free members
    pub count: usize,
    pub total: SectionProperties,
    pub estimated_price: f32,
}

pub fn project_properties(config: &AppConfig, path: &Path) -> Result<PropertiesReport> {
    let project = Project::load(path)?;
    let model = &project.model;
    let (member, source) = section_properties(&config.services, &model.profile);
    let count = model.active_count() + model.free_members().len();
    let total = member.times(count);

    Ok(PropertiesReport {
        source,
        member,
        count,
        total,
        estimated_price: estimate_price(&model.profile.material, total.weight),
    })
}

/// BOM pages, plus the rendered files when the service produced them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BomReport {
    pub pages: Vec<Vec<BomItem>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<ExportedFile>,
}

pub fn project_bom(
    config: &AppConfig,
    path: &Path,
    page_size: Option<usize>,
    remote: Option<BomKind>,
) -> Result<BomReport> {
    let project = Project::load(path)?;
    let items = bom_items(&project.model);
    let page_size = page_size.unwrap_or(config.services.bom_page_size).max(1);

    let files = match remote {
        Some(kind) if config.services.enabled => {
            BomClient::new(&config.services).export(&items, page_size, kind)?
        }
        Some(_) => return Err(AppError::ServicesDisabled),
        None => Vec::new(),
    };

    Ok(BomReport {
        pages: paginate(&items, page_size),
        files,
    })
}

/// Open an editor on the project, wired to the configured collaborators
fn open_editor(project: &Project, services: &ServiceConfig) -> (Editor, Option<HttpCollaborators>) {
    let editor = Editor::new(project.model.clone(), project.settings.clone());
    if services.enabled {
        let http = HttpCollaborators::new(services);
        (editor.with_collaborators(http.clone()), Some(http))
    } else {
        (editor, None)
    }
}

/// Run one editor command against a project and save it if anything changed
fn edit_project(
    config: &AppConfig,
    path: &Path,
    index: u32,
    command: impl FnOnce(&mut Editor, LogicalIndex) -> bool,
) -> Result<bool> {
    let mut project = Project::load(path)?;
    let index = LogicalIndex(index);
    if !project.model.contains(index) {
        return Err(AppError::NoSuchMember(index.0));
    }

    let (mut editor, http) = open_editor(&project, &config.services);
    let changed = command(&mut editor, index);
    if changed {
        project.model = editor.model().clone();
        project.save(path)?;
    }
    if let Some(http) = http {
        http.flush();
    }
    Ok(changed)
}

/// Nudge one member. Locked members stay put; a deleted member keeps its
/// offset for when it is restored, so it can still be moved.
pub fn move_member(config: &AppConfig, path: &Path, index: u32, delta: Vec3) -> Result<bool> {
    let moved = edit_project(config, path, index, |editor, index| editor.nudge(index, delta))?;
    if !moved {
        tracing::warn!("Member {} was not moved", index);
    }
    Ok(moved)
}

pub fn delete_member(config: &AppConfig, path: &Path, index: u32) -> Result<bool> {
    edit_project(config, path, index, |editor, index| editor.delete_member(index))
}
