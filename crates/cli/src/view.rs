use navtree_core::model::format_path;
use navtree_core::{Children, NavNode};
use tabled::Tabled;

/// A table row for one navigation node.
#[derive(Tabled)]
pub struct NodeRow {
    #[tabled(rename = "Path")]
    pub path: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Link")]
    pub link: String,
    #[tabled(rename = "Children")]
    pub children: String,
}

impl NodeRow {
    pub fn from_node(path: &[usize], node: &NavNode) -> Self {
        Self {
            path: format_path(path),
            title: node.title.clone(),
            link: node
                .link
                .as_ref()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "-".to_string()),
            children: describe_children(&node.children),
        }
    }
}

pub fn describe_children(children: &Children) -> String {
    match children {
        Children::Leaf => "-".to_string(),
        Children::Inline { nodes } => nodes.len().to_string(),
        Children::Deferred {
            script,
            nodes: Some(nodes),
        } => format!("{} ({}.js)", nodes.len(), script),
        Children::Deferred { script, nodes: None } => format!("? ({}.js)", script),
    }
}

/// A `Metric | Value` row.
#[derive(Tabled)]
pub struct StatRow {
    #[tabled(rename = "Metric")]
    pub metric: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl StatRow {
    pub fn new(metric: &'static str, value: impl ToString) -> Self {
        Self {
            metric,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navtree_core::Link;

    #[test]
    fn test_node_row() {
        let node = NavNode::deferred("API Reference", Link::page("modules.html"), "modules");
        let row = NodeRow::from_node(&[0, 1], &node);
        assert_eq!(row.path, "[0,1]");
        assert_eq!(row.link, "modules.html");
        assert_eq!(row.children, "? (modules.js)");
    }

    #[test]
    fn test_describe_children() {
        assert_eq!(describe_children(&Children::Leaf), "-");
        assert_eq!(
            describe_children(&Children::Inline {
                nodes: vec![NavNode::leaf("A", Link::page("a.html"))]
            }),
            "1"
        );
    }
}
