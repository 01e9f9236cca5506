//! Tag set construction for out-of-band instance tagging.

use fleetspot_common::{GroupTag, Tag};

/// Key of the audit tag recorded on a spot request once its instance has
/// been tagged. The value is the owning group's name.
pub const LAUNCHED_FOR_GROUP_TAG: &str = "fleetspot:launched-for-group";

/// Build the provider tag list for a running instance from a group's
/// desired tags.
///
/// `propagate_at_launch` is dropped. Duplicate keys collapse to a single
/// entry that keeps the position of the first occurrence and the value of
/// the last.
#[must_use]
pub fn instance_tags(group_tags: &[GroupTag]) -> Vec<Tag> {
    let mut tags: Vec<Tag> = Vec::with_capacity(group_tags.len());
    for group_tag in group_tags {
        match tags.iter_mut().find(|t| t.key == group_tag.key) {
            Some(existing) => existing.value.clone_from(&group_tag.value),
            None => tags.push(group_tag.to_tag()),
        }
    }
    tags
}
