#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod workspace;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{LayoutConfig, load_config};
pub use ir::{Edge, FamilyGraph, Handle, Node, NodeKind, Position};
pub use layout::{Bounds, Diagnostic, FamilyLayout, MalformedGraph, compute_layout, layout};
pub use workspace::{ChangeSet, RowState, TrackedWorkspace, WorkspaceSnapshot};
