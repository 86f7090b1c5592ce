use serde::Serialize;

/// Input the layout refuses to work on. Nothing is positioned when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedGraph {
    #[error("edge `{edge_id}` references unknown node `{node_id}`")]
    MissingEndpoint { edge_id: String, node_id: String },
    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),
    #[error("duplicate edge id `{0}`")]
    DuplicateEdge(String),
}

pub type Result<T> = std::result::Result<T, MalformedGraph>;

/// Soft conditions met while laying out a graph that is still being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// A union without exactly two parent edges; it groups nothing.
    #[serde(rename_all = "camelCase")]
    UnresolvedUnion { union_id: String, parent_count: usize },
    /// A union whose parent edge comes from something other than a person.
    #[serde(rename_all = "camelCase")]
    NonPersonPartner { union_id: String, partner_id: String },
    /// Wrappers that no root reaches; their nodes keep their positions.
    #[serde(rename_all = "camelCase")]
    NoRootFound { anchor_ids: Vec<String> },
}

impl Diagnostic {
    pub(crate) fn emit(&self) {
        match self {
            Diagnostic::UnresolvedUnion {
                union_id,
                parent_count,
            } => tracing::warn!(
                union = %union_id,
                parents = parent_count,
                "union does not have exactly two parents; leaving its partners ungrouped"
            ),
            Diagnostic::NonPersonPartner {
                union_id,
                partner_id,
            } => tracing::warn!(
                union = %union_id,
                partner = %partner_id,
                "union partner is not a person node; leaving union ungrouped"
            ),
            Diagnostic::NoRootFound { anchor_ids } => tracing::warn!(
                count = anchor_ids.len(),
                anchors = ?anchor_ids,
                "no root reaches these family units; keeping their positions"
            ),
        }
    }
}
