//! HTTP collaborator clients
//!
//! Blocking `ureq` calls against the tubekit API. The editor-facing
//! [`HttpCollaborators`] runs each request on its own thread and only logs
//! failures; the other clients return their errors to the caller.

use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tk_core::bom::BomItem;
use tk_core::properties::{FiberBoardParams, SectionProperties};
use tk_core::{Collaborators, LogEntry, PlateSpec, PositionRecord, ProfileParams};

use crate::config::ServiceConfig;

const POSITIONS_SAVE: &str = "/api/positions/save";
const LOGS_WRITE: &str = "/api/logs/write";
const MODELING_SQUARE_TUBE: &str = "/api/modeling/square-tube";
const MODELING_FIBER_BOARD: &str = "/api/modeling/fiber-board";
const BOM_EXPORT_EXCEL: &str = "/api/bom/export/excel";
const BOM_EXPORT_PRINT: &str = "/api/bom/export/pdf";
const PLATE_LATEST: &str = "/api/plate/latest";

/// Service call errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Unexpected status {0}")]
    Status(u16),
}

impl From<ureq::Error> for ServiceError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(code) => ServiceError::Status(code),
            other => ServiceError::Http(other.to_string()),
        }
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn post_json<B: Serialize, R: DeserializeOwned>(url: &str, body: &B) -> Result<R, ServiceError> {
    let response = ureq::post(url)
        .header("User-Agent", concat!("tubekit/", env!("CARGO_PKG_VERSION")))
        .send_json(body)?;
    response
        .into_body()
        .read_json()
        .map_err(|e| ServiceError::Decode(e.to_string()))
}

fn get_json<R: DeserializeOwned>(url: &str) -> Result<R, ServiceError> {
    let response = ureq::get(url)
        .header("User-Agent", concat!("tubekit/", env!("CARGO_PKG_VERSION")))
        .call()?;
    response
        .into_body()
        .read_json()
        .map_err(|e| ServiceError::Decode(e.to_string()))
}

/// Fire-and-forget position and log persistence
///
/// Clones share the list of in-flight requests, so a short-lived host can
/// keep one clone and [`flush`](Self::flush) before exiting.
#[derive(Debug, Clone)]
pub struct HttpCollaborators {
    base_url: String,
    group: String,
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl HttpCollaborators {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            group: config.positions_group.clone(),
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn spawn_post<T: Serialize + Send + 'static>(&self, path: &str, body: T) {
        let url = endpoint(&self.base_url, path);
        let handle = std::thread::spawn(move || {
            if let Err(e) = post_json::<T, serde_json::Value>(&url, &body) {
                tracing::warn!("Collaborator call to {} failed: {}", url, e);
            }
        });
        let mut pending = self.pending.lock();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Wait for every request still in flight
    pub fn flush(&self) {
        let handles: Vec<_> = self.pending.lock().drain(..).collect();
        for handle in handles {
            if handle.join().is_err() {
                tracing::warn!("Collaborator thread panicked");
            }
        }
    }

    /// The record as sent: the configured group replaces the editor's
    fn outgoing(&self, mut record: PositionRecord) -> PositionRecord {
        record.group.clone_from(&self.group);
        record
    }
}

impl Collaborators for HttpCollaborators {
    fn save_position(&self, record: PositionRecord) {
        self.spawn_post(POSITIONS_SAVE, self.outgoing(record));
    }

    fn write_log(&self, entry: LogEntry) {
        self.spawn_post(LOGS_WRITE, entry);
    }
}

#[derive(Debug, Serialize)]
struct ModelingRequest<'a> {
    width: f32,
    height: f32,
    thickness: f32,
    length: f32,
    material: &'a str,
    standard: &'a str,
}

impl<'a> From<&'a ProfileParams> for ModelingRequest<'a> {
    fn from(p: &'a ProfileParams) -> Self {
        Self {
            width: p.width,
            height: p.height,
            thickness: p.thickness,
            length: p.length,
            material: &p.material,
            standard: &p.standard,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelingResponse {
    properties: SectionProperties,
}

/// Remote section-property calculation
#[derive(Debug, Clone)]
pub struct ModelingClient {
    base_url: String,
}

impl ModelingClient {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
        }
    }

    pub fn square_tube(&self, profile: &ProfileParams) -> Result<SectionProperties, ServiceError> {
        let url = endpoint(&self.base_url, MODELING_SQUARE_TUBE);
        let response: ModelingResponse = post_json(&url, &ModelingRequest::from(profile))?;
        Ok(response.properties)
    }

    pub fn fiber_board(&self, board: &FiberBoardParams) -> Result<SectionProperties, ServiceError> {
        let url = endpoint(&self.base_url, MODELING_FIBER_BOARD);
        let response: ModelingResponse = post_json(&url, board)?;
        Ok(response.properties)
    }
}

/// Output flavour of the BOM service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BomKind {
    /// Spreadsheet-compatible table
    #[default]
    Excel,
    /// Printable page
    Print,
}

impl BomKind {
    fn path(&self) -> &'static str {
        match self {
            BomKind::Excel => BOM_EXPORT_EXCEL,
            BomKind::Print => BOM_EXPORT_PRINT,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BomExportRequest<'a> {
    items: &'a [BomItem],
    page_size: usize,
}

/// A file produced by the BOM service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedFile {
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
struct BomExportResponse {
    #[serde(default)]
    files: Vec<ExportedFile>,
}

#[derive(Debug, Clone)]
pub struct BomClient {
    base_url: String,
}

impl BomClient {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
        }
    }

    /// Render `items` remotely, one file per page of `page_size` lines
    pub fn export(
        &self,
        items: &[BomItem],
        page_size: usize,
        kind: BomKind,
    ) -> Result<Vec<ExportedFile>, ServiceError> {
        let url = endpoint(&self.base_url, kind.path());
        let request = BomExportRequest {
            items,
            page_size: page_size.max(1),
        };
        let response: BomExportResponse = post_json(&url, &request)?;
        Ok(response.files)
    }
}

#[derive(Debug, Deserialize)]
struct PlateResponse {
    #[serde(default)]
    plate: Option<PlateSpec>,
}

/// Source of the latest designed base plate
#[derive(Debug, Clone)]
pub struct PlateClient {
    base_url: String,
}

impl PlateClient {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
        }
    }

    /// `None` when no plate has been designed yet
    pub fn latest(&self) -> Result<Option<PlateSpec>, ServiceError> {
        let url = endpoint(&self.base_url, PLATE_LATEST);
        let response: PlateResponse = get_json(&url)?;
        Ok(response.plate)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use tk_core::LogicalIndex;

    use super::*;

    /// Nothing listens on the discard port
    fn unreachable() -> ServiceConfig {
        ServiceConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_joins_once() {
        assert_eq!(
            endpoint("http://localhost:3001/", POSITIONS_SAVE),
            "http://localhost:3001/api/positions/save"
        );
        assert_eq!(
            endpoint("http://localhost:3001", LOGS_WRITE),
            "http://localhost:3001/api/logs/write"
        );
    }

    #[test]
    fn test_modeling_request_fields() {
        let profile = ProfileParams::default();
        let json = serde_json::to_value(ModelingRequest::from(&profile)).unwrap();
        assert_eq!(json["width"], 20.0);
        assert_eq!(json["material"], "Q235");
        assert_eq!(json["standard"], "GB/T 6728-2017");
    }

    #[test]
    fn test_response_decoding() {
        let modeling: ModelingResponse = serde_json::from_str(
            r#"{"modelId":"x","properties":{"volume":28800,"weight":0.22608,"surfaceArea":29088}}"#,
        )
        .unwrap();
        assert_eq!(modeling.properties.surface_area, 29088.0);

        let bom: BomExportResponse = serde_json::from_str(
            r#"{"success":true,"files":[{"url":"/exports/bom_1.xls","filename":"bom_1.xls"}]}"#,
        )
        .unwrap();
        assert_eq!(bom.files[0].filename, "bom_1.xls");

        let plate: PlateResponse = serde_json::from_str(
            r#"{"plate":{"width":600,"height":400,"thickness":8,"holes":[{"x":10,"y":20,"r":5}]}}"#,
        )
        .unwrap();
        let plate = plate.plate.unwrap();
        assert_eq!(plate.thickness, 8.0);
        assert_eq!(plate.holes.len(), 1);

        let empty: PlateResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.plate.is_none());
    }

    #[test]
    fn test_bom_request_uses_camel_case() {
        let json = serde_json::to_value(BomExportRequest {
            items: &[],
            page_size: 20,
        })
        .unwrap();
        assert_eq!(json["pageSize"], 20);
    }

    #[test]
    fn test_unreachable_service_errors() {
        let config = unreachable();
        let client = ModelingClient::new(&config);
        let result = client.square_tube(&ProfileParams::default());
        assert!(matches!(result, Err(ServiceError::Http(_))));
        let result = client.fiber_board(&FiberBoardParams::default());
        assert!(matches!(result, Err(ServiceError::Http(_))));
        assert!(PlateClient::new(&config).latest().is_err());
    }

    #[test]
    fn test_collaborators_override_group_and_swallow_failures() {
        let config = ServiceConfig {
            positions_group: "frame-a".to_string(),
            ..unreachable()
        };
        let collaborators = HttpCollaborators::new(&config);
        let record = PositionRecord::new("square-tube", LogicalIndex(3), Vec3::X);
        assert_eq!(collaborators.outgoing(record.clone()).group, "frame-a");

        collaborators.save_position(record);
        collaborators.write_log(LogEntry::new("move", "Moved member", serde_json::Value::Null));
        collaborators.flush();
        assert!(collaborators.pending.lock().is_empty());
    }
}
