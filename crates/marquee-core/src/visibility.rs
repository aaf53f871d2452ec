//! Section visibility gate
//!
//! One singleton document maps section name to a boolean. The policy is
//! default-open: an absent document, or an absent key within it, means the
//! section is visible. Only an explicit `false` hides a section, so a page
//! can consult the gate before mounting a binding at all.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::binding::{DocumentBinding, Snapshot};
use crate::document::to_fields;
use crate::error::StoreResult;
use crate::sections::{Section, SectionKind, SINGLETON_ID};
use crate::store::ContentStore;
use crate::writer::ContentWriter;

/// The visibility singleton: section name -> shown?
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VisibilityMap {
    #[serde(default, skip_serializing)]
    pub id: String,
    #[serde(flatten)]
    pub sections: HashMap<String, bool>,
}

impl Section for VisibilityMap {
    const COLLECTION: &'static str = "sectionVisibility";
    const KIND: SectionKind = SectionKind::Singleton;
}

/// Whether a section should render
///
/// `true` unless the map exists and explicitly marks the key `false`.
pub fn is_visible(map: Option<&VisibilityMap>, section: &str) -> bool {
    map.map_or(true, |m| m.sections.get(section).copied().unwrap_or(true))
}

/// Live visibility gate backed by a document binding
///
/// While the underlying document is still loading the gate answers
/// default-open, matching the policy for an absent document.
pub struct VisibilityGate {
    binding: DocumentBinding<VisibilityMap>,
}

impl VisibilityGate {
    pub fn bind(store: Arc<dyn ContentStore>) -> Self {
        Self {
            binding: DocumentBinding::bind(store, VisibilityMap::COLLECTION, SINGLETON_ID),
        }
    }

    /// Whether a section should render, per the latest snapshot
    pub fn is_visible(&self, section: &str) -> bool {
        is_visible(self.binding.current().value.as_ref(), section)
    }

    /// The latest snapshot of the whole map
    pub fn current(&self) -> Snapshot<VisibilityMap> {
        self.binding.current()
    }

    /// Wait until the initial load has completed
    pub async fn wait_settled(&mut self) -> Snapshot<VisibilityMap> {
        self.binding.wait_settled().await
    }
}

/// Toggle one section's visibility
///
/// Written as a merge-upsert so the first toggle also creates the document
/// and untouched keys keep their values.
pub async fn set_visible(writer: &ContentWriter, section: &str, visible: bool) -> StoreResult<()> {
    let mut map = VisibilityMap::default();
    map.sections.insert(section.to_string(), visible);
    writer.patch_section::<VisibilityMap>(to_fields(&map)?).await
}
