//! Catalog of the reference lists backing the wizard dropdowns.
//!
//! Every list is served by its own endpoint and uses its own key names on the wire; a
//! [`WireShape`] names the two keys that carry the option value and its label.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// A uniform dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

impl DropdownOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireShape {
    pub value_key: &'static str,
    pub label_key: &'static str,
}

/// The lists fetched once when a wizard session starts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ReferenceList {
    Departments,
    Impairments,
    StudentStatuses,
    SchoolBackgrounds,
    ProgramModalities,
    Regions,
    Bcys,
}

impl ReferenceList {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Departments => "/api/departments",
            Self::Impairments => "/api/impairments",
            Self::StudentStatuses => "/api/student-statuses",
            Self::SchoolBackgrounds => "/api/school-backgrounds",
            Self::ProgramModalities => "/api/program-modalities",
            Self::Regions => "/api/regions",
            Self::Bcys => "/api/bcys",
        }
    }

    #[must_use]
    pub const fn shape(self) -> WireShape {
        let (value_key, label_key) = match self {
            Self::Departments => ("dptID", "deptName"),
            Self::Impairments => ("impairmentCode", "impairment"),
            Self::StudentStatuses => ("id", "statusName"),
            Self::SchoolBackgrounds => ("id", "background"),
            Self::ProgramModalities => ("modalityCode", "modality"),
            Self::Regions => ("regionCode", "region"),
            Self::Bcys => ("bcysID", "bcysDisplayName"),
        };
        WireShape { value_key, label_key }
    }
}

/// Dependent lists fetched on demand for a parent code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum CascadeLevel {
    Zones,
    Woredas,
}

impl CascadeLevel {
    /// Request path for the children of `parent_code`.
    #[must_use]
    pub fn path(self, parent_code: &str) -> String {
        match self {
            Self::Zones => format!("/api/zones/region/{parent_code}"),
            Self::Woredas => format!("/api/woredas/zone/{parent_code}"),
        }
    }

    #[must_use]
    pub const fn shape(self) -> WireShape {
        match self {
            Self::Zones => WireShape { value_key: "zoneCode", label_key: "zone" },
            Self::Woredas => WireShape { value_key: "woredaCode", label_key: "woreda" },
        }
    }
}

/// Which address block a cascade belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CascadeTarget {
    Birth,
    Current,
}
