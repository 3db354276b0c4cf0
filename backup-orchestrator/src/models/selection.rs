//! Resource references and the selections that group one trigger's jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle of a protected resource (an ARN in practice).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceReference(String);

impl ResourceReference {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceReference {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResourceReference {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSelector {
    pub key: String,
    pub value: String,
}

impl TagSelector {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Where the resources of one trigger invocation came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Resources listed in the invocation payload.
    Explicit(Vec<ResourceReference>),
    /// Resources carrying the configured tag, resolved through the control plane.
    Tag(TagSelector),
    /// Placeholder resource from configuration, for bootstrap and demo runs only.
    Demo(ResourceReference),
}

impl Selection {
    pub fn kind(&self) -> SelectionKind {
        match self {
            Selection::Explicit(_) => SelectionKind::Explicit,
            Selection::Tag(_) => SelectionKind::Tag,
            Selection::Demo(_) => SelectionKind::Demo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionKind {
    Explicit,
    Tag,
    Demo,
}

impl SelectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionKind::Explicit => "Explicit",
            SelectionKind::Tag => "Tag",
            SelectionKind::Demo => "Demo",
        }
    }
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selection whose resources are known, ready to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSelection {
    pub kind: SelectionKind,
    pub resources: Vec<ResourceReference>,
}

const SELECTION_NAME_PREFIX: &str = "on-demand-";
const SELECTION_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Named, time-stamped grouping of the jobs launched by one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupSelection {
    pub name: String,
    pub kind: SelectionKind,
    pub created_at: DateTime<Utc>,
}

impl BackupSelection {
    /// Names are `on-demand-<UTC timestamp>` at second granularity. Two
    /// invocations in the same second share a name unless `unique` adds a
    /// random suffix.
    pub fn new(kind: SelectionKind, created_at: DateTime<Utc>, unique: bool) -> Self {
        let mut name = format!(
            "{SELECTION_NAME_PREFIX}{}",
            created_at.format(SELECTION_TIMESTAMP_FORMAT)
        );
        if unique {
            let suffix = uuid::Uuid::new_v4().simple().to_string();
            name.push('-');
            name.push_str(&suffix[..8]);
        }
        Self {
            name,
            kind,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap()
    }

    #[test]
    fn test_selection_name_format() {
        let selection = BackupSelection::new(SelectionKind::Explicit, at(), false);
        assert_eq!(selection.name, "on-demand-20260304T050607Z");
    }

    #[test]
    fn test_same_second_names_collide_without_suffix() {
        let a = BackupSelection::new(SelectionKind::Tag, at(), false);
        let b = BackupSelection::new(SelectionKind::Tag, at(), false);
        assert_eq!(a.name, b.name);
    }

    #[test]
    fn test_unique_names_carry_suffix() {
        let a = BackupSelection::new(SelectionKind::Tag, at(), true);
        let b = BackupSelection::new(SelectionKind::Tag, at(), true);
        assert!(a.name.starts_with("on-demand-20260304T050607Z-"));
        assert_eq!(a.name.len(), "on-demand-20260304T050607Z-".len() + 8);
        assert_ne!(a.name, b.name);
    }

    #[test]
    fn test_selection_kind_labels() {
        assert_eq!(Selection::Explicit(vec![]).kind().as_str(), "Explicit");
        assert_eq!(
            Selection::Tag(TagSelector::new("Backup", "Yes")).kind().as_str(),
            "Tag"
        );
        assert_eq!(Selection::Demo("r".into()).kind().as_str(), "Demo");
    }

    #[test]
    fn test_resource_reference_is_transparent() {
        let json = serde_json::to_string(&ResourceReference::new("r1")).unwrap();
        assert_eq!(json, "\"r1\"");
    }
}
