//! # Project Data Structures
//!
//! The `Project` struct is the root container for one estimate: an ordered
//! list of structures, each with its dimensions and the quantities computed
//! from them. Projects serialize to `.rab` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, estimator, location, timestamps)
//! ├── settings: ProjectSettings (overhead, tax used to price this project)
//! └── items: Vec<LineItem> (structures in entry order)
//! ```
//!
//! Stored results are authoritative: loading a project never recomputes them,
//! so a file priced last year still shows last year's quantities.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::{ChannelInput, StructureInput};
//! use calc_core::project::Project;
//!
//! let mut project = Project::new("Saluran Induk", "A. Estimator", "Kab. Bandung");
//! project.append("Ruas 1", StructureInput::ReinforcedChannel(ChannelInput::default()));
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("Ruas 1"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{QuantityResult, StructureInput, StructureKind};
use crate::config::{EstimatorConfig, DEFAULT_OVERHEAD_PCT, DEFAULT_TAX_PCT};
use crate::errors::{CalcError, CalcResult};

/// Current schema version for .rab files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Suffix appended to the name of a rehabilitation item
pub const REHAB_SUFFIX: &str = " (REHAB)";

/// Root project container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,

    #[serde(default)]
    pub settings: ProjectSettings,

    /// Line items in the order they were entered
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Example
    ///
    /// ```rust
    /// use calc_core::project::Project;
    ///
    /// let project = Project::new("Drainase Kota", "B. Surveyor", "Cimahi");
    /// assert!(project.is_empty());
    /// assert_eq!(project.meta.estimator, "B. Surveyor");
    /// ```
    pub fn new(name: impl Into<String>, estimator: impl Into<String>, location: impl Into<String>) -> Self {
        Project::with_settings(name, estimator, location, ProjectSettings::default())
    }

    /// Create a new empty project priced with `settings`.
    pub fn with_settings(
        name: impl Into<String>,
        estimator: impl Into<String>,
        location: impl Into<String>,
        settings: ProjectSettings,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                estimator: estimator.into(),
                location: location.into(),
                created: now,
                modified: now,
            },
            settings,
            items: Vec::new(),
        }
    }

    /// Compute a structure and append it as a new line item.
    ///
    /// Rehabilitation items get " (REHAB)" appended to their name. Returns
    /// the stored item.
    pub fn append(&mut self, name: impl Into<String>, input: StructureInput) -> &LineItem {
        let result = input.compute();
        let mut name = name.into();
        if input.is_rehabilitation() && !name.ends_with(REHAB_SUFFIX) {
            name.push_str(REHAB_SUFFIX);
        }
        tracing::debug!(name = %name, kind = ?input.kind(), status = result.status.label(), "append item");
        let item = LineItem {
            id: Uuid::new_v4(),
            name,
            kind: input.kind(),
            dimensions: Some(input),
            result,
        };
        self.push_item(item)
    }

    /// Append an already computed item as-is.
    pub fn push_item(&mut self, item: LineItem) -> &LineItem {
        self.items.push(item);
        self.touch();
        &self.items[self.items.len() - 1]
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// The whole project as pretty JSON, for handing to an external assistant
    /// or report generator as context.
    pub fn snapshot_json(&self) -> CalcResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CalcError::serialization(e.to_string()))
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Project or package name
    pub name: String,

    /// Name of the responsible estimator
    pub estimator: String,

    /// Site location
    #[serde(default)]
    pub location: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Percentages applied when the project is priced.
///
/// Fixed when the project is created; later edits to the configuration file
/// do not reprice an existing project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Overhead and profit on unit prices (%)
    pub overhead_pct: f64,

    /// Tax on the bill total (%)
    pub tax_pct: f64,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        ProjectSettings {
            overhead_pct: DEFAULT_OVERHEAD_PCT,
            tax_pct: DEFAULT_TAX_PCT,
        }
    }
}

impl From<&EstimatorConfig> for ProjectSettings {
    fn from(config: &EstimatorConfig) -> Self {
        ProjectSettings {
            overhead_pct: config.overhead_pct,
            tax_pct: config.tax_pct,
        }
    }
}

/// One computed structure in the project.
///
/// `dimensions` is `None` for records written before dimensions were kept;
/// such items still price normally but have no detailed back-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Uuid,

    /// Display name, e.g. "Ruas 1 (REHAB)"
    pub name: String,

    pub kind: StructureKind,

    #[serde(default)]
    pub dimensions: Option<StructureInput>,

    pub result: QuantityResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{BoxCulvertInput, ChannelInput, QuantityKey, SteppedDropInput};

    #[test]
    fn test_project_creation() {
        let project = Project::new("Saluran Induk", "Estimator", "Garut");
        assert_eq!(project.meta.name, "Saluran Induk");
        assert_eq!(project.meta.location, "Garut");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.settings.tax_pct, 11.0);
        assert!(project.is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut project = Project::default();
        project.append("A", StructureInput::BoxCulvert(BoxCulvertInput::default()));
        project.append("B", StructureInput::SteppedDrop(SteppedDropInput::default()));
        project.append("C", StructureInput::ReinforcedChannel(ChannelInput::default()));

        let names: Vec<_> = project.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(project.items()[1].kind, StructureKind::SteppedDrop);
    }

    #[test]
    fn test_rehab_suffix() {
        let mut project = Project::default();
        let item = project.append(
            "Ruas 2",
            StructureInput::ReinforcedChannel(ChannelInput {
                rehabilitation: true,
                ..ChannelInput::default()
            }),
        );
        assert_eq!(item.name, "Ruas 2 (REHAB)");
        assert!(item.result.get(QuantityKey::Demolition) > 0.0);
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut project = Project::default();
        project.append("A", StructureInput::BoxCulvert(BoxCulvertInput::default()));
        project.append("B", StructureInput::BoxCulvert(BoxCulvertInput::default()));
        let before = project.meta.modified;

        project.clear();
        assert!(project.is_empty());
        assert!(project.meta.modified >= before);
    }

    #[test]
    fn test_settings_seeded_from_config() {
        let config = EstimatorConfig {
            overhead_pct: 10.0,
            tax_pct: 0.0,
            ..EstimatorConfig::default()
        };
        let project = Project::with_settings("Induk", "Estimator", "Garut", ProjectSettings::from(&config));
        assert_eq!(project.settings.overhead_pct, 10.0);
        assert_eq!(project.settings.tax_pct, 0.0);
    }

    #[test]
    fn test_roundtrip_keeps_stored_results() {
        let mut project = Project::default();
        project.append("Box", StructureInput::BoxCulvert(BoxCulvertInput::default()));

        // Tamper with the stored result; loading must not recompute it
        project.items[0].result.quantities.set(QuantityKey::Concrete, 123.0);

        let json = project.snapshot_json().unwrap();
        let loaded: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.items[0].result.get(QuantityKey::Concrete), 123.0);
        assert_eq!(loaded, project);
    }

    #[test]
    fn test_missing_dimensions_tolerated() {
        let json = r#"{
            "meta": {"version": "0.1.0", "name": "Lama", "estimator": "X",
                     "created": "2024-01-01T00:00:00Z", "modified": "2024-01-01T00:00:00Z"},
            "items": [{
                "id": "6f1c2a52-3a4b-4bd2-9a0e-0d6f2f1f9c11",
                "name": "Saluran lama",
                "kind": "ReinforcedChannel",
                "result": {"status": "computed", "quantities": {"concrete": 4.5}}
            }]
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.len(), 1);
        assert!(project.items()[0].dimensions.is_none());
        assert_eq!(project.items()[0].result.get(QuantityKey::Concrete), 4.5);
        assert_eq!(project.settings, ProjectSettings::default());
    }
}
