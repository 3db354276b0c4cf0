//! Decides which resources one trigger invocation backs up.

use crate::config::VaultConfig;
use crate::control_plane::SharedControlPlane;
use crate::models::{
    ResolvedSelection, ResourceReference, Selection, SelectionKind, TagSelector, TriggerPayload,
};
use crate::Result;

pub struct ResourceSelector {
    control_plane: SharedControlPlane,
    tag: Option<TagSelector>,
    demo_resource: ResourceReference,
}

impl ResourceSelector {
    pub fn new(
        control_plane: SharedControlPlane,
        tag: Option<TagSelector>,
        demo_resource: ResourceReference,
    ) -> Self {
        Self {
            control_plane,
            tag,
            demo_resource,
        }
    }

    /// Tag selection is enabled unless the configured tag key is empty.
    pub fn from_config(control_plane: SharedControlPlane, config: &VaultConfig) -> Self {
        let tag = (!config.tag_key.is_empty())
            .then(|| TagSelector::new(&config.tag_key, &config.tag_value));
        Self::new(
            control_plane,
            tag,
            ResourceReference::new(&config.demo_resource_arn),
        )
    }

    /// Explicit resources win over tag configuration; with neither, the demo
    /// resource is selected.
    pub fn select(&self, payload: &TriggerPayload) -> Selection {
        if let Some(resources) = payload.explicit_resources() {
            return Selection::Explicit(resources.to_vec());
        }
        match &self.tag {
            Some(tag) => Selection::Tag(tag.clone()),
            None => Selection::Demo(self.demo_resource.clone()),
        }
    }

    /// Turn a selection into a non-empty list of resources. A tag that
    /// matches nothing falls back to the demo resource.
    pub async fn resolve(&self, selection: Selection) -> Result<ResolvedSelection> {
        match selection {
            Selection::Explicit(resources) => Ok(ResolvedSelection {
                kind: SelectionKind::Explicit,
                resources,
            }),
            Selection::Tag(tag) => {
                let resources = self.control_plane.resources_by_tag(&tag).await?;
                if resources.is_empty() {
                    tracing::warn!(
                        tag_key = %tag.key,
                        tag_value = %tag.value,
                        demo_resource = %self.demo_resource,
                        "No resources carry the backup tag, falling back to demo resource"
                    );
                    return Ok(self.demo());
                }
                tracing::debug!(count = resources.len(), tag_key = %tag.key, "Resolved tagged resources");
                Ok(ResolvedSelection {
                    kind: SelectionKind::Tag,
                    resources,
                })
            }
            Selection::Demo(resource) => Ok(ResolvedSelection {
                kind: SelectionKind::Demo,
                resources: vec![resource],
            }),
        }
    }

    fn demo(&self) -> ResolvedSelection {
        ResolvedSelection {
            kind: SelectionKind::Demo,
            resources: vec![self.demo_resource.clone()],
        }
    }
}
