//! Project payload types.

use serde::{Deserialize, Serialize};

/// One project as returned by the projects listing endpoint.
///
/// The payload shape is an external contract we parse defensively:
/// every field tolerates absence. A project without an id is unusable
/// and gets skipped by the aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub status: ProjectStatus,

    /// Creation time, epoch milliseconds.
    #[serde(default)]
    pub created_date: Option<i64>,

    /// Last modification time, epoch milliseconds.
    #[serde(default)]
    pub modification_date: Option<i64>,
}

/// Lifecycle status reported by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Finished,
    InProgress,
    Started,
    /// Any status value this client does not recognize.
    #[serde(other)]
    #[default]
    Other,
}

impl ProjectStatus {
    /// Wire representation usable as a server-side filter value.
    /// `Other` has no stable wire form and yields `None`.
    pub fn as_query(self) -> Option<&'static str> {
        match self {
            ProjectStatus::Finished => Some("FINISHED"),
            ProjectStatus::InProgress => Some("IN_PROGRESS"),
            ProjectStatus::Started => Some("STARTED"),
            ProjectStatus::Other => None,
        }
    }
}
