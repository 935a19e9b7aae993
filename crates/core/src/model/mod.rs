pub mod document;
pub mod index;
pub mod node;

pub use document::NavTreeData;
pub use index::{IndexChunk, NavIndex};
pub use node::{Children, EXTERNAL_LINK_MARKER, Link, NavNode};

/// Global holding the navigation tree.
pub const NAVTREE_VAR: &str = "NAVTREE";
/// Global holding the index sequence.
pub const NAVTREE_INDEX_VAR: &str = "NAVTREEINDEX";
pub const SYNC_ON_VAR: &str = "SYNCONMSG";
pub const SYNC_OFF_VAR: &str = "SYNCOFFMSG";

/// Child positions from the top-level `NAVTREE` list down to a node.
pub type TreePath = Vec<usize>;

/// Renders a tree path as `[0,1,2]`, the way index chunks write it.
pub fn format_path(path: &[usize]) -> String {
    let parts: Vec<String> = path.iter().map(|i| i.to_string()).collect();
    format!("[{}]", parts.join(","))
}
