//! Document rendering port

use async_trait::async_trait;
use council_domain::{DataTable, DocumentArtifact, JournalFormat, ManuscriptSections};
use std::collections::BTreeMap;

/// Port for turning manuscript sections into a document
///
/// Never fails: when the preferred format cannot be produced the adapter
/// falls back to [`DocumentArtifact::PlainText`].
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(
        &self,
        sections: &ManuscriptSections,
        tables: &BTreeMap<String, DataTable>,
        journal: &JournalFormat,
    ) -> DocumentArtifact;
}

/// Renderer that always produces the plain-text layout
pub struct PlainTextRenderer;

#[async_trait]
impl DocumentRenderer for PlainTextRenderer {
    async fn render(
        &self,
        sections: &ManuscriptSections,
        _tables: &BTreeMap<String, DataTable>,
        _journal: &JournalFormat,
    ) -> DocumentArtifact {
        DocumentArtifact::PlainText {
            text: sections.to_plain_text(),
        }
    }
}
