use crate::error::{NavtreeError, Result};
use crate::parser::value::JsValue;
use crate::util::split_anchor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Leading character that marks an off-site link in the data format.
pub const EXTERNAL_LINK_MARKER: char = '^';

/// Target of a navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Link {
    /// A page of the generated site, optionally pointing into it.
    Page {
        file: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchor: Option<String>,
    },
    /// An off-site URL, stored without the marker.
    External { url: String },
}

impl Link {
    pub fn parse(raw: &str) -> Self {
        if let Some(url) = raw.strip_prefix(EXTERNAL_LINK_MARKER) {
            return Link::External {
                url: url.to_string(),
            };
        }
        let (file, anchor) = split_anchor(raw);
        Link::Page {
            file: file.to_string(),
            anchor: anchor.map(str::to_string),
        }
    }

    pub fn page(file: impl Into<String>) -> Self {
        Link::Page {
            file: file.into(),
            anchor: None,
        }
    }

    pub fn external(url: impl Into<String>) -> Self {
        Link::External { url: url.into() }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Link::External { .. })
    }

    /// The page file for in-site links.
    pub fn file(&self) -> Option<&str> {
        match self {
            Link::Page { file, .. } => Some(file),
            Link::External { .. } => None,
        }
    }

    pub fn anchor(&self) -> Option<&str> {
        match self {
            Link::Page { anchor, .. } => anchor.as_deref(),
            Link::External { .. } => None,
        }
    }

    /// The link as a browser would follow it: `file#anchor` or the bare URL.
    pub fn target(&self) -> String {
        match self {
            Link::Page { file, anchor: None } => file.clone(),
            Link::Page {
                file,
                anchor: Some(anchor),
            } => format!("{}#{}", file, anchor),
            Link::External { url } => url.clone(),
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::External { url } => write!(f, "{}{}", EXTERNAL_LINK_MARKER, url),
            page => f.write_str(&page.target()),
        }
    }
}

/// Third element of a navigation entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Children {
    /// `null`
    #[default]
    Leaf,
    /// An array literal written in place.
    Inline { nodes: Vec<NavNode> },
    /// A script name; the children live in `<script>.js`.
    /// `nodes` is filled when a site loader resolves the script.
    Deferred {
        script: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nodes: Option<Vec<NavNode>>,
    },
}

impl Children {
    /// Children that are available in memory.
    pub fn nodes(&self) -> &[NavNode] {
        match self {
            Children::Leaf => &[],
            Children::Inline { nodes } => nodes,
            Children::Deferred { nodes, .. } => nodes.as_deref().unwrap_or(&[]),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Children::Leaf)
    }

    pub fn deferred_script(&self) -> Option<&str> {
        match self {
            Children::Deferred { script, .. } => Some(script),
            _ => None,
        }
    }
}

/// One `[ title, link, children ]` entry of the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavNode {
    pub title: String,
    pub link: Option<Link>,
    #[serde(default)]
    pub children: Children,
}

impl NavNode {
    pub fn leaf(title: impl Into<String>, link: Link) -> Self {
        Self {
            title: title.into(),
            link: Some(link),
            children: Children::Leaf,
        }
    }

    pub fn branch(title: impl Into<String>, link: Link, nodes: Vec<NavNode>) -> Self {
        Self {
            title: title.into(),
            link: Some(link),
            children: Children::Inline { nodes },
        }
    }

    pub fn deferred(title: impl Into<String>, link: Link, script: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: Some(link),
            children: Children::Deferred {
                script: script.into(),
                nodes: None,
            },
        }
    }

    /// Converts a parsed `[ title, link, children ]` array.
    ///
    /// `path` is the position of `value` in the tree and is only used for
    /// error messages; it is restored before returning.
    pub fn from_value(value: &JsValue, path: &mut Vec<usize>) -> Result<Self> {
        let items = match value {
            JsValue::Array(items) if (2..=3).contains(&items.len()) => items,
            JsValue::Array(items) => {
                return Err(NavtreeError::shape(
                    path,
                    format!("expected 2 or 3 elements, found {}", items.len()),
                ));
            }
            other => {
                return Err(NavtreeError::shape(
                    path,
                    format!("expected array, found {}", other.kind_name()),
                ));
            }
        };

        let title = items[0].as_str().ok_or_else(|| {
            NavtreeError::shape(
                path,
                format!("title must be a string, found {}", items[0].kind_name()),
            )
        })?;

        let link = match &items[1] {
            JsValue::Null => None,
            JsValue::Str(raw) => Some(Link::parse(raw)),
            other => {
                return Err(NavtreeError::shape(
                    path,
                    format!("link must be a string or null, found {}", other.kind_name()),
                ));
            }
        };

        let children = match items.get(2) {
            None | Some(JsValue::Null) => Children::Leaf,
            Some(JsValue::Str(script)) => Children::Deferred {
                script: script.clone(),
                nodes: None,
            },
            Some(JsValue::Array(child_values)) => {
                let mut nodes = Vec::with_capacity(child_values.len());
                for (i, child) in child_values.iter().enumerate() {
                    path.push(i);
                    let node = NavNode::from_value(child, path);
                    path.pop();
                    nodes.push(node?);
                }
                Children::Inline { nodes }
            }
            Some(other) => {
                return Err(NavtreeError::shape(
                    path,
                    format!(
                        "children must be an array, a script name or null, found {}",
                        other.kind_name()
                    ),
                ));
            }
        };

        Ok(Self {
            title: title.to_string(),
            link,
            children,
        })
    }

    /// Inverse of [`NavNode::from_value`]. Resolved deferred children are
    /// written back as the script name.
    pub fn to_value(&self) -> JsValue {
        let link = match &self.link {
            Some(link) => JsValue::Str(link.to_string()),
            None => JsValue::Null,
        };
        let children = match &self.children {
            Children::Leaf => JsValue::Null,
            Children::Inline { nodes } => {
                JsValue::Array(nodes.iter().map(NavNode::to_value).collect())
            }
            Children::Deferred { script, .. } => JsValue::Str(script.clone()),
        };
        JsValue::Array(vec![JsValue::Str(self.title.clone()), link, children])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_parse_and_display() {
        for raw in [
            "index.html",
            "group__adc.html#ga5",
            "^https://github.com/Infineon/mtb-pdl-cat1",
            "page.html#",
        ] {
            assert_eq!(Link::parse(raw).to_string(), raw);
        }
    }

    #[test]
    fn test_link_accessors() {
        let link = Link::parse("group__adc.html#ga5");
        assert_eq!(link.file(), Some("group__adc.html"));
        assert_eq!(link.anchor(), Some("ga5"));
        assert!(!link.is_external());

        let ext = Link::parse("^https://example.com/a#b");
        assert!(ext.is_external());
        assert_eq!(ext.file(), None);
        assert_eq!(ext.target(), "https://example.com/a#b");
    }

    #[test]
    fn test_from_value_two_elements_is_leaf() {
        let value = JsValue::Array(vec!["Main".into(), "index.html".into()]);
        let node = NavNode::from_value(&value, &mut vec![0]).unwrap();
        assert_eq!(node, NavNode::leaf("Main", Link::page("index.html")));
    }

    #[test]
    fn test_from_value_null_link() {
        let value = JsValue::Array(vec!["Group".into(), JsValue::Null, JsValue::Null]);
        let node = NavNode::from_value(&value, &mut vec![]).unwrap();
        assert!(node.link.is_none());
    }

    #[test]
    fn test_from_value_rejects_bad_children() {
        let value = JsValue::Array(vec!["A".into(), "a.html".into(), JsValue::Number(1)]);
        let mut path = vec![2, 4];
        let err = NavNode::from_value(&value, &mut path).unwrap_err();
        assert!(matches!(err, NavtreeError::Shape { path, .. } if path == "[2,4]"));
    }

    #[test]
    fn test_path_restored_after_child_error() {
        let value = JsValue::Array(vec![
            "A".into(),
            "a.html".into(),
            JsValue::Array(vec![JsValue::Null]),
        ]);
        let mut path = vec![0];
        assert!(NavNode::from_value(&value, &mut path).is_err());
        assert_eq!(path, vec![0]);
    }

    #[test]
    fn test_to_value_inverse() {
        let node = NavNode::branch(
            "Root",
            Link::page("index.html"),
            vec![
                NavNode::leaf("Ext", Link::external("https://example.com")),
                NavNode::deferred("Mods", Link::page("modules.html"), "modules"),
            ],
        );
        let back = NavNode::from_value(&node.to_value(), &mut vec![]).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_json_shape() {
        let node = NavNode::leaf("Main", Link::parse("index.html#top"));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["link"]["kind"], "page");
        assert_eq!(json["link"]["anchor"], "top");
        assert_eq!(json["children"]["type"], "leaf");
    }
}
