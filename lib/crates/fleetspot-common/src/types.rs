use serde::{Deserialize, Serialize};

/// A provider-level resource tag.
///
/// Serialized with the provider's `Key`/`Value` field names so a slice of
/// tags can be handed to `create-tags` as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A tag the owning group wants on every member instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTag {
    pub key: String,
    #[serde(default)]
    pub value: String,
    /// Launch-time inheritance flag of the group. Meaningless for an
    /// instance that is tagged after it is already running.
    #[serde(default)]
    pub propagate_at_launch: bool,
}

impl GroupTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>, propagate_at_launch: bool) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            propagate_at_launch,
        }
    }

    /// The provider tag for this entry, without the launch flag.
    #[must_use]
    pub fn to_tag(&self) -> Tag {
        Tag::new(self.key.clone(), self.value.clone())
    }
}

/// The logical owner of a set of instances (autoscaling group analogue).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetGroup {
    pub name: String,
    /// Desired tags, in declaration order.
    #[serde(default)]
    pub tags: Vec<GroupTag>,
}

impl FleetGroup {
    pub fn new(name: impl Into<String>, tags: Vec<GroupTag>) -> Self {
        Self {
            name: name.into(),
            tags,
        }
    }
}
