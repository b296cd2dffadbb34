//! # Calculation Project Store
//!
//! Versioned, named, persisted aggregate of one or more calculations,
//! owned by a user, with a draft/final/archived lifecycle and template
//! promotion.
//!
//! ## Structure
//!
//! ```text
//! CalculationProject
//! ├── owner, name, tags, timestamps
//! ├── calculation_type (immutable after creation)
//! ├── status: Draft -> Final -> Archived (Draft -> Archived allowed)
//! ├── version_number (optimistic concurrency)
//! └── project_data: typed child records per calculation_type
//! ```
//!
//! Writers must present the version they read; a mismatch is rejected with
//! `VersionConflict` rather than silently overwritten. Persistence is
//! delegated to a [`ProjectRepository`] collaborator; the store itself
//! performs no disk or network I/O.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::project::{CalculationType, ProjectPatch, ProjectStore};
//!
//! let mut store = ProjectStore::in_memory();
//! let project = store
//!     .create("user-1", CalculationType::Sealcoat, "Main lot resurfacing")
//!     .unwrap();
//! assert_eq!(project.version_number, 1);
//!
//! let patch = ProjectPatch {
//!     description: Some("Two-coat sealcoat, fall schedule".to_string()),
//!     ..ProjectPatch::default()
//! };
//! let updated = store.update(project.id, 1, patch).unwrap();
//! assert_eq!(updated.version_number, 2);
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EstimateError, EstimateResult};
use crate::estimators::{
    asphalt, sealcoat, striping, AsphaltInput, AsphaltOutput, SealcoatInput, SealcoatOutput,
    StripingInput, StripingOutput,
};
use crate::history::CalculationHistoryEntry;

/// The kind of work a project estimates. Immutable after creation, since it
/// determines which child record type is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationType {
    Sealcoat,
    Striping,
    MaterialEstimate,
    CostAnalysis,
    AsphaltMix,
}

impl CalculationType {
    /// Display name for UI listings
    pub fn display_name(&self) -> &'static str {
        match self {
            CalculationType::Sealcoat => "Sealcoat",
            CalculationType::Striping => "Striping",
            CalculationType::MaterialEstimate => "Material Estimate",
            CalculationType::CostAnalysis => "Cost Analysis",
            CalculationType::AsphaltMix => "Asphalt Mix",
        }
    }
}

/// Project lifecycle state.
///
/// `Draft -> Final -> Archived`, plus `Draft -> Archived` directly.
/// `Archived` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    Final,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Final => "final",
            ProjectStatus::Archived => "archived",
        }
    }
}

/// Sealcoat child record: the input dimensions plus computed quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealcoatCalculation {
    pub input: SealcoatInput,
    pub computed: Option<SealcoatOutput>,
}

/// Striping child record: ordered lines plus computed totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripingCalculation {
    pub input: StripingInput,
    pub computed: Option<StripingOutput>,
}

/// Material estimation child record: ordered zones plus computed totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEstimation {
    pub input: AsphaltInput,
    pub computed: Option<AsphaltOutput>,
}

/// Typed structural data for a project, matching its `calculation_type`.
///
/// `CostAnalysis` and `AsphaltMix` projects carry free-form data; the
/// other three carry the structured estimator records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ProjectData {
    Sealcoat(SealcoatCalculation),
    Striping(StripingCalculation),
    MaterialEstimate(MaterialEstimation),
    CostAnalysis(serde_json::Value),
    AsphaltMix(serde_json::Value),
}

impl ProjectData {
    /// The calculation type this data is valid for.
    pub fn calculation_type(&self) -> CalculationType {
        match self {
            ProjectData::Sealcoat(_) => CalculationType::Sealcoat,
            ProjectData::Striping(_) => CalculationType::Striping,
            ProjectData::MaterialEstimate(_) => CalculationType::MaterialEstimate,
            ProjectData::CostAnalysis(_) => CalculationType::CostAnalysis,
            ProjectData::AsphaltMix(_) => CalculationType::AsphaltMix,
        }
    }

    /// Run the matching estimator over the stored input and fill in the
    /// computed results. Returns the headline numeric result (gallons,
    /// tons, or total cost) for ledger recording, or `None` for free-form
    /// data that has no estimator.
    pub fn recalculate(&mut self) -> EstimateResult<Option<f64>> {
        match self {
            ProjectData::Sealcoat(calc) => {
                let output = sealcoat::calculate(&calc.input)?;
                let headline = output.gallons_needed;
                calc.computed = Some(output);
                Ok(Some(headline))
            }
            ProjectData::Striping(calc) => {
                let output = striping::calculate(&calc.input)?;
                let headline = output.total_gallons;
                calc.computed = Some(output);
                Ok(Some(headline))
            }
            ProjectData::MaterialEstimate(calc) => {
                let output = asphalt::calculate(&calc.input)?;
                let headline = output.total_tons;
                calc.computed = Some(output);
                Ok(Some(headline))
            }
            ProjectData::CostAnalysis(_) | ProjectData::AsphaltMix(_) => Ok(None),
        }
    }

    /// The stored input flattened to a field map, for ledger recording.
    pub fn input_snapshot(&self) -> HashMap<String, serde_json::Value> {
        let value = match self {
            ProjectData::Sealcoat(calc) => serde_json::to_value(&calc.input),
            ProjectData::Striping(calc) => serde_json::to_value(&calc.input),
            ProjectData::MaterialEstimate(calc) => serde_json::to_value(&calc.input),
            ProjectData::CostAnalysis(v) | ProjectData::AsphaltMix(v) => Ok(v.clone()),
        };
        match value {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => HashMap::new(),
        }
    }
}

/// Root project aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationProject {
    /// Unique project id
    pub id: Uuid,
    /// Owning user
    pub owner_id: String,
    /// Project name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Immutable after creation
    pub calculation_type: CalculationType,
    /// Lifecycle state
    pub status: ProjectStatus,
    /// Typed structural data; `None` until the first structural edit
    pub project_data: Option<ProjectData>,
    /// Free-form results snapshot for the UI
    pub results_data: Option<serde_json::Value>,
    /// Free-form cost breakdown for the UI
    pub cost_breakdown: Option<serde_json::Value>,
    /// Monotonic version; writers must present the version they read
    pub version_number: u64,
    /// Read-only blueprint flag
    pub is_template: bool,
    /// Search tags
    pub tags: Vec<String>,
    /// When the project was created
    pub created: DateTime<Utc>,
    /// When the project was last persisted
    pub modified: DateTime<Utc>,
}

/// Partial update applied through `ProjectStore::update`.
///
/// `project_data` is a structural edit and is rejected on `Final` projects;
/// the remaining fields are metadata and stay editable until archival.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub project_data: Option<ProjectData>,
    pub results_data: Option<serde_json::Value>,
    pub cost_breakdown: Option<serde_json::Value>,
}

/// Persistence collaborator for projects and per-owner history.
///
/// The core depends only on these signatures, never on a storage
/// technology. `save_project` enforces optimistic versioning: the stored
/// version must equal `expected_version` (or the project must be absent
/// and `expected_version` zero), and the persisted copy carries
/// `expected_version + 1`.
pub trait ProjectRepository {
    fn load_project(&self, id: Uuid) -> EstimateResult<CalculationProject>;
    fn save_project(
        &mut self,
        project: CalculationProject,
        expected_version: u64,
    ) -> EstimateResult<CalculationProject>;
    fn append_history(&mut self, owner_id: &str, entry: CalculationHistoryEntry);
    fn list_history(&self, owner_id: &str) -> Vec<CalculationHistoryEntry>;
}

/// In-memory repository: an indexed arena of projects plus per-owner
/// history, suitable for tests and single-process callers. A durable
/// backend substitutes for this without touching evaluation logic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    projects: HashMap<Uuid, CalculationProject>,
    history: HashMap<String, Vec<CalculationHistoryEntry>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectRepository for InMemoryRepository {
    fn load_project(&self, id: Uuid) -> EstimateResult<CalculationProject> {
        self.projects
            .get(&id)
            .cloned()
            .ok_or_else(|| EstimateError::not_found("Project", id))
    }

    fn save_project(
        &mut self,
        mut project: CalculationProject,
        expected_version: u64,
    ) -> EstimateResult<CalculationProject> {
        match self.projects.get(&project.id) {
            Some(stored) => {
                if stored.version_number != expected_version {
                    return Err(EstimateError::version_conflict(
                        project.id,
                        expected_version,
                        stored.version_number,
                    ));
                }
            }
            None => {
                if expected_version != 0 {
                    return Err(EstimateError::not_found("Project", project.id));
                }
            }
        }
        project.version_number = expected_version + 1;
        project.modified = Utc::now();
        self.projects.insert(project.id, project.clone());
        Ok(project)
    }

    fn append_history(&mut self, owner_id: &str, entry: CalculationHistoryEntry) {
        self.history
            .entry(owner_id.to_string())
            .or_default()
            .push(entry);
    }

    fn list_history(&self, owner_id: &str) -> Vec<CalculationHistoryEntry> {
        self.history.get(owner_id).cloned().unwrap_or_default()
    }
}

/// Project operations over a persistence collaborator.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore<R: ProjectRepository> {
    repo: R,
}

impl ProjectStore<InMemoryRepository> {
    /// A store backed by the in-memory repository.
    pub fn in_memory() -> Self {
        ProjectStore {
            repo: InMemoryRepository::new(),
        }
    }
}

impl<R: ProjectRepository> ProjectStore<R> {
    /// Wrap an existing repository.
    pub fn with_repository(repo: R) -> Self {
        ProjectStore { repo }
    }

    /// Create a new draft project with `version_number = 1`.
    pub fn create(
        &mut self,
        owner_id: impl Into<String>,
        calculation_type: CalculationType,
        name: impl Into<String>,
    ) -> EstimateResult<CalculationProject> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EstimateError::invalid_input(
                "name",
                name,
                "Project name must not be empty",
            ));
        }
        let now = Utc::now();
        let project = CalculationProject {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            name,
            description: String::new(),
            calculation_type,
            status: ProjectStatus::Draft,
            project_data: None,
            results_data: None,
            cost_breakdown: None,
            version_number: 1,
            is_template: false,
            tags: Vec::new(),
            created: now,
            modified: now,
        };
        self.repo.save_project(project, 0)
    }

    /// Load a project by id.
    pub fn get(&self, id: Uuid) -> EstimateResult<CalculationProject> {
        self.repo.load_project(id)
    }

    /// Apply a patch, bumping the version on success.
    ///
    /// Fails with `VersionConflict` when `expected_version` does not match
    /// the stored version; re-read and retry. Structural data is locked on
    /// `Final` projects; archived projects and templates are read-only.
    pub fn update(
        &mut self,
        id: Uuid,
        expected_version: u64,
        patch: ProjectPatch,
    ) -> EstimateResult<CalculationProject> {
        let mut project = self.repo.load_project(id)?;

        if project.status == ProjectStatus::Archived {
            return Err(EstimateError::invalid_input(
                "status",
                project.status.as_str(),
                "Archived projects are read-only",
            ));
        }
        if project.is_template {
            return Err(EstimateError::invalid_input(
                "is_template",
                "true",
                "Templates are read-only blueprints; instantiate a draft instead",
            ));
        }

        if let Some(data) = patch.project_data {
            if project.status == ProjectStatus::Final {
                return Err(EstimateError::invalid_input(
                    "project_data",
                    "(structural edit)",
                    "Final projects lock structural data; only metadata may change",
                ));
            }
            if data.calculation_type() != project.calculation_type {
                return Err(EstimateError::invalid_input(
                    "project_data",
                    format!("{:?}", data.calculation_type()),
                    format!(
                        "Project type is {:?} and cannot change",
                        project.calculation_type
                    ),
                ));
            }
            project.project_data = Some(data);
        }
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(EstimateError::invalid_input(
                    "name",
                    name,
                    "Project name must not be empty",
                ));
            }
            project.name = name;
        }
        if let Some(description) = patch.description {
            project.description = description;
        }
        if let Some(tags) = patch.tags {
            project.tags = tags;
        }
        if let Some(results) = patch.results_data {
            project.results_data = Some(results);
        }
        if let Some(costs) = patch.cost_breakdown {
            project.cost_breakdown = Some(costs);
        }

        self.repo.save_project(project, expected_version)
    }

    /// Run the project's estimator over its structural data, persist the
    /// computed results, and append a ledger entry to the owner's history.
    ///
    /// Returns the updated project. Fails when the project has no
    /// structural data yet.
    pub fn recalculate(
        &mut self,
        id: Uuid,
        expected_version: u64,
    ) -> EstimateResult<CalculationProject> {
        let mut project = self.repo.load_project(id)?;

        // Recalculation mutates computed results, so the same read-only
        // gates as update() apply.
        if project.status == ProjectStatus::Archived {
            return Err(EstimateError::invalid_input(
                "status",
                project.status.as_str(),
                "Archived projects are read-only",
            ));
        }
        if project.is_template {
            return Err(EstimateError::invalid_input(
                "is_template",
                "true",
                "Templates are read-only blueprints; instantiate a draft instead",
            ));
        }

        let data = project.project_data.as_mut().ok_or_else(|| {
            EstimateError::invalid_input(
                "project_data",
                "null",
                "Project has no calculation data to recalculate",
            )
        })?;

        let inputs = data.input_snapshot();
        let headline = data.recalculate()?;

        // Persist first; a version conflict must not leave a ledger entry.
        let saved = self.repo.save_project(project, expected_version)?;

        if let Some(result) = headline {
            let entry = CalculationHistoryEntry {
                id: Uuid::new_v4(),
                timestamp: Utc::now(),
                calculator_type: match saved.calculation_type {
                    CalculationType::Sealcoat => crate::estimators::CalculatorType::Sealcoat,
                    CalculationType::Striping => crate::estimators::CalculatorType::Striping,
                    _ => crate::estimators::CalculatorType::AsphaltTonnage,
                },
                inputs,
                result,
                description: format!("Recalculated '{}'", saved.name),
                starred: false,
            };
            self.repo.append_history(&saved.owner_id, entry);
        }
        Ok(saved)
    }

    /// Transition `Draft -> Final`, locking structural edits.
    pub fn commit(&mut self, id: Uuid) -> EstimateResult<CalculationProject> {
        let mut project = self.repo.load_project(id)?;
        if project.status != ProjectStatus::Draft {
            return Err(EstimateError::invalid_transition(
                id,
                project.status.as_str(),
                ProjectStatus::Final.as_str(),
            ));
        }
        let version = project.version_number;
        project.status = ProjectStatus::Final;
        self.repo.save_project(project, version)
    }

    /// Transition to `Archived` from `Draft` or `Final`. Terminal.
    pub fn archive(&mut self, id: Uuid) -> EstimateResult<CalculationProject> {
        let mut project = self.repo.load_project(id)?;
        if project.status == ProjectStatus::Archived {
            return Err(EstimateError::invalid_transition(
                id,
                project.status.as_str(),
                ProjectStatus::Archived.as_str(),
            ));
        }
        let version = project.version_number;
        project.status = ProjectStatus::Archived;
        self.repo.save_project(project, version)
    }

    /// Duplicate a project's structural data into a new read-only template
    /// with a fresh id and `version_number = 1`.
    pub fn clone_as_template(&mut self, id: Uuid) -> EstimateResult<CalculationProject> {
        let source = self.repo.load_project(id)?;
        let now = Utc::now();
        let template = CalculationProject {
            id: Uuid::new_v4(),
            owner_id: source.owner_id.clone(),
            name: format!("{} (template)", source.name),
            description: source.description.clone(),
            calculation_type: source.calculation_type,
            status: ProjectStatus::Draft,
            project_data: source.project_data.clone(),
            results_data: None,
            cost_breakdown: None,
            version_number: 1,
            is_template: true,
            tags: source.tags.clone(),
            created: now,
            modified: now,
        };
        self.repo.save_project(template, 0)
    }

    /// Create a fresh draft from a template, copying structural data and
    /// resetting ownership, version, and results.
    pub fn instantiate_from_template(
        &mut self,
        template_id: Uuid,
        owner_id: impl Into<String>,
        name: impl Into<String>,
    ) -> EstimateResult<CalculationProject> {
        let template = self.repo.load_project(template_id)?;
        if !template.is_template {
            return Err(EstimateError::invalid_input(
                "template_id",
                template_id.to_string(),
                "Project is not a template",
            ));
        }
        let now = Utc::now();
        let project = CalculationProject {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            name: name.into(),
            description: template.description.clone(),
            calculation_type: template.calculation_type,
            status: ProjectStatus::Draft,
            project_data: template.project_data.clone(),
            results_data: None,
            cost_breakdown: None,
            version_number: 1,
            is_template: false,
            tags: template.tags.clone(),
            created: now,
            modified: now,
        };
        self.repo.save_project(project, 0)
    }

    /// Append a history entry to an owner's persisted ledger.
    pub fn record_history(&mut self, owner_id: &str, entry: CalculationHistoryEntry) {
        self.repo.append_history(owner_id, entry);
    }

    /// All persisted history entries for an owner, oldest first.
    pub fn history(&self, owner_id: &str) -> Vec<CalculationHistoryEntry> {
        self.repo.list_history(owner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimators::{SurfaceCondition, SurfaceType};

    fn sealcoat_data() -> ProjectData {
        ProjectData::Sealcoat(SealcoatCalculation {
            input: SealcoatInput {
                length_ft: 200.0,
                width_ft: 50.0,
                number_of_coats: 2,
                surface_type: SurfaceType::Asphalt,
                surface_condition: SurfaceCondition::Good,
                sealer_cost_per_gallon: 3.25,
                labor_rate_per_sqft: 0.05,
            },
            computed: None,
        })
    }

    #[test]
    fn test_create_defaults() {
        let mut store = ProjectStore::in_memory();
        let project = store
            .create("user-1", CalculationType::Sealcoat, "Main lot")
            .unwrap();
        assert_eq!(project.status, ProjectStatus::Draft);
        assert_eq!(project.version_number, 1);
        assert!(!project.is_template);
        assert!(project.project_data.is_none());
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let mut store = ProjectStore::in_memory();
        assert!(store
            .create("user-1", CalculationType::Striping, "  ")
            .is_err());
    }

    #[test]
    fn test_update_bumps_version() {
        let mut store = ProjectStore::in_memory();
        let project = store
            .create("user-1", CalculationType::Sealcoat, "Main lot")
            .unwrap();

        let patch = ProjectPatch {
            project_data: Some(sealcoat_data()),
            ..ProjectPatch::default()
        };
        let updated = store.update(project.id, 1, patch).unwrap();
        assert_eq!(updated.version_number, 2);
        assert!(updated.project_data.is_some());
    }

    #[test]
    fn test_stale_version_conflicts() {
        let mut store = ProjectStore::in_memory();
        let project = store
            .create("user-1", CalculationType::Sealcoat, "Main lot")
            .unwrap();

        // First writer wins.
        store
            .update(
                project.id,
                1,
                ProjectPatch {
                    description: Some("first".to_string()),
                    ..ProjectPatch::default()
                },
            )
            .unwrap();

        // Second writer still holds version 1.
        let err = store
            .update(
                project.id,
                1,
                ProjectPatch {
                    description: Some("second".to_string()),
                    ..ProjectPatch::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "VERSION_CONFLICT");

        // Re-read and retry succeeds.
        let current = store.get(project.id).unwrap();
        let updated = store
            .update(
                project.id,
                current.version_number,
                ProjectPatch {
                    description: Some("second".to_string()),
                    ..ProjectPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.description, "second");
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let mut store = ProjectStore::in_memory();
        let project = store
            .create("user-1", CalculationType::Striping, "Lines only")
            .unwrap();
        let err = store
            .update(
                project.id,
                1,
                ProjectPatch {
                    project_data: Some(sealcoat_data()),
                    ..ProjectPatch::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_commit_locks_structure_not_metadata() {
        let mut store = ProjectStore::in_memory();
        let project = store
            .create("user-1", CalculationType::Sealcoat, "Main lot")
            .unwrap();
        let committed = store.commit(project.id).unwrap();
        assert_eq!(committed.status, ProjectStatus::Final);
        assert_eq!(committed.version_number, 2);

        // Structural edit rejected.
        let err = store
            .update(
                project.id,
                2,
                ProjectPatch {
                    project_data: Some(sealcoat_data()),
                    ..ProjectPatch::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        // Metadata edit allowed.
        let renamed = store
            .update(
                project.id,
                2,
                ProjectPatch {
                    name: Some("Main lot 2025".to_string()),
                    ..ProjectPatch::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.name, "Main lot 2025");
    }

    #[test]
    fn test_commit_requires_draft() {
        let mut store = ProjectStore::in_memory();
        let project = store
            .create("user-1", CalculationType::Sealcoat, "Main lot")
            .unwrap();
        store.commit(project.id).unwrap();
        let err = store.commit(project.id).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
    }

    #[test]
    fn test_archive_from_draft_and_final() {
        let mut store = ProjectStore::in_memory();

        let draft = store
            .create("user-1", CalculationType::Sealcoat, "Draft lot")
            .unwrap();
        assert_eq!(
            store.archive(draft.id).unwrap().status,
            ProjectStatus::Archived
        );

        let finalized = store
            .create("user-1", CalculationType::Sealcoat, "Final lot")
            .unwrap();
        store.commit(finalized.id).unwrap();
        assert_eq!(
            store.archive(finalized.id).unwrap().status,
            ProjectStatus::Archived
        );
    }

    #[test]
    fn test_archived_is_terminal() {
        let mut store = ProjectStore::in_memory();
        let project = store
            .create("user-1", CalculationType::Sealcoat, "Main lot")
            .unwrap();
        store.archive(project.id).unwrap();

        assert_eq!(
            store.archive(project.id).unwrap_err().error_code(),
            "INVALID_TRANSITION"
        );
        assert_eq!(
            store.commit(project.id).unwrap_err().error_code(),
            "INVALID_TRANSITION"
        );
        let err = store
            .update(
                project.id,
                2,
                ProjectPatch {
                    name: Some("rename".to_string()),
                    ..ProjectPatch::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_template_round_trip() {
        let mut store = ProjectStore::in_memory();
        let project = store
            .create("user-1", CalculationType::Sealcoat, "Main lot")
            .unwrap();
        store
            .update(
                project.id,
                1,
                ProjectPatch {
                    project_data: Some(sealcoat_data()),
                    ..ProjectPatch::default()
                },
            )
            .unwrap();

        let template = store.clone_as_template(project.id).unwrap();
        assert!(template.is_template);
        assert_eq!(template.version_number, 1);
        assert_ne!(template.id, project.id);

        // Templates are read-only.
        let err = store
            .update(
                template.id,
                1,
                ProjectPatch {
                    name: Some("edited".to_string()),
                    ..ProjectPatch::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let draft = store
            .instantiate_from_template(template.id, "user-2", "Copy of main lot")
            .unwrap();
        assert!(!draft.is_template);
        assert_eq!(draft.status, ProjectStatus::Draft);
        assert_eq!(draft.version_number, 1);
        assert_eq!(draft.owner_id, "user-2");
        assert_eq!(
            draft.calculation_type,
            CalculationType::Sealcoat
        );
        assert!(draft.project_data.is_some());
    }

    #[test]
    fn test_instantiate_requires_template() {
        let mut store = ProjectStore::in_memory();
        let project = store
            .create("user-1", CalculationType::Sealcoat, "Main lot")
            .unwrap();
        let err = store
            .instantiate_from_template(project.id, "user-2", "Copy")
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_recalculate_fills_results_and_history() {
        let mut store = ProjectStore::in_memory();
        let project = store
            .create("user-1", CalculationType::Sealcoat, "Main lot")
            .unwrap();
        store
            .update(
                project.id,
                1,
                ProjectPatch {
                    project_data: Some(sealcoat_data()),
                    ..ProjectPatch::default()
                },
            )
            .unwrap();

        let recalced = store.recalculate(project.id, 2).unwrap();
        assert_eq!(recalced.version_number, 3);
        match recalced.project_data {
            Some(ProjectData::Sealcoat(calc)) => {
                let computed = calc.computed.expect("computed results filled");
                assert_eq!(computed.total_area_sqft, 10_000.0);
            }
            other => panic!("unexpected project data: {:?}", other),
        }

        // The ledger entry carries the evaluation's inputs, not a stub.
        let history = store.history("user-1");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].inputs["length_ft"], serde_json::json!(200.0));
        assert_eq!(history[0].inputs["number_of_coats"], serde_json::json!(2));
        assert_eq!(
            history[0].inputs["surface_condition"],
            serde_json::json!("good")
        );
    }

    #[test]
    fn test_recalculate_rejected_on_archived() {
        let mut store = ProjectStore::in_memory();
        let project = store
            .create("user-1", CalculationType::Sealcoat, "Main lot")
            .unwrap();
        store
            .update(
                project.id,
                1,
                ProjectPatch {
                    project_data: Some(sealcoat_data()),
                    ..ProjectPatch::default()
                },
            )
            .unwrap();
        let archived = store.archive(project.id).unwrap();

        let err = store
            .recalculate(project.id, archived.version_number)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        // Untouched: same version, no computed results, no history entry.
        let stored = store.get(project.id).unwrap();
        assert_eq!(stored.version_number, archived.version_number);
        match stored.project_data {
            Some(ProjectData::Sealcoat(calc)) => assert!(calc.computed.is_none()),
            other => panic!("unexpected project data: {:?}", other),
        }
        assert!(store.history("user-1").is_empty());
    }

    #[test]
    fn test_recalculate_rejected_on_template() {
        let mut store = ProjectStore::in_memory();
        let project = store
            .create("user-1", CalculationType::Sealcoat, "Main lot")
            .unwrap();
        store
            .update(
                project.id,
                1,
                ProjectPatch {
                    project_data: Some(sealcoat_data()),
                    ..ProjectPatch::default()
                },
            )
            .unwrap();
        let template = store.clone_as_template(project.id).unwrap();

        let err = store.recalculate(template.id, 1).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let stored = store.get(template.id).unwrap();
        assert_eq!(stored.version_number, 1);
        assert!(store.history("user-1").is_empty());
    }

    #[test]
    fn test_unknown_project_not_found() {
        let store = ProjectStore::in_memory();
        let err = store.get(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_project_serialization() {
        let mut store = ProjectStore::in_memory();
        let project = store
            .create("user-1", CalculationType::MaterialEstimate, "Overlay job")
            .unwrap();
        let json = serde_json::to_string_pretty(&project).unwrap();
        let roundtrip: CalculationProject = serde_json::from_str(&json).unwrap();
        assert_eq!(project, roundtrip);
    }
}
