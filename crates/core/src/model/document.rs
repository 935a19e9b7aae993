use super::{NavIndex, NavNode};
use crate::error::Result;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SYNC_ON_MSG: &str = "click to disable panel synchronisation";
pub const DEFAULT_SYNC_OFF_MSG: &str = "click to enable panel synchronisation";

/// Everything one `navtreedata.js` declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTreeData {
    /// Leading block comment, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preamble: Option<String>,
    pub tree: Vec<NavNode>,
    #[serde(default)]
    pub index: NavIndex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_off: Option<String>,
}

impl NavTreeData {
    /// A tree with Doxygen's default synchronisation tooltips.
    pub fn new(tree: Vec<NavNode>) -> Self {
        Self {
            preamble: None,
            tree,
            index: NavIndex::default(),
            sync_on: Some(DEFAULT_SYNC_ON_MSG.to_string()),
            sync_off: Some(DEFAULT_SYNC_OFF_MSG.to_string()),
        }
    }

    /// Node at `path`; the first index selects a top-level entry.
    pub fn node(&self, path: &[usize]) -> Option<&NavNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.tree.get(*first)?;
        for i in rest {
            node = node.children.nodes().get(*i)?;
        }
        Some(node)
    }

    /// Entries at `path`: the top-level list for an empty path.
    pub fn children_at(&self, path: &[usize]) -> Option<&[NavNode]> {
        if path.is_empty() {
            return Some(&self.tree);
        }
        self.node(path).map(|n| n.children.nodes())
    }

    /// Number of nodes held in memory, including resolved deferred children.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[NavNode]) -> usize {
            nodes
                .iter()
                .map(|n| 1 + count(n.children.nodes()))
                .sum()
        }
        count(&self.tree)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        Ok(if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
