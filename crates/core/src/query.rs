use crate::model::{IndexChunk, NavNode, NavTreeData, TreePath};
use crate::site::DocSite;
use crate::util::split_anchor;
use serde::Serialize;

/// Result of resolving a user-provided title path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveResult {
    /// Exactly one node. An empty path is the top level.
    Found(TreePath),
    /// Several nodes match; the caller needs to disambiguate.
    Ambiguous(Vec<TreePath>),
    NotFound,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub max_depth: usize,
    pub external_links: usize,
    pub deferred: usize,
    pub index_entries: usize,
    pub index_chunks: usize,
}

/// Read-only navigation over loaded tree data.
pub struct Navigator<'a> {
    data: &'a NavTreeData,
    chunks: &'a [IndexChunk],
}

impl<'a> Navigator<'a> {
    pub fn new(data: &'a NavTreeData) -> Self {
        Self { data, chunks: &[] }
    }

    pub fn for_site(site: &'a DocSite) -> Self {
        Self {
            data: &site.data,
            chunks: &site.chunks,
        }
    }

    pub fn node_at(&self, path: &[usize]) -> Option<&'a NavNode> {
        self.data.node(path)
    }

    /// Titles from the top-level entry down to the node at `path`.
    pub fn breadcrumbs(&self, path: &[usize]) -> Option<Vec<&'a str>> {
        (1..=path.len())
            .map(|len| self.data.node(&path[..len]).map(|n| n.title.as_str()))
            .collect()
    }

    /// Finds the tree position of a page URL (`file.html` or `file.html#anchor`).
    ///
    /// Index chunks are consulted first, the way the browser script does it;
    /// without a usable chunk the tree itself is searched by link.
    pub fn locate(&self, url: &str) -> Option<TreePath> {
        if let Some(path) = self.locate_in_index(url) {
            return Some(path);
        }
        tracing::debug!("{} not found in index chunks, searching the tree", url);

        let mut page_match = None;
        let (file, _) = split_anchor(url);
        for (path, node) in self.walk() {
            let Some(link) = &node.link else { continue };
            if link.target() == url {
                return Some(path);
            }
            if page_match.is_none() && link.file() == Some(file) && link.anchor().is_none() {
                page_match = Some(path);
            }
        }
        page_match
    }

    fn locate_in_index(&self, url: &str) -> Option<TreePath> {
        if self.chunks.is_empty() {
            return None;
        }
        let number = self.data.index.chunk_for(url);
        let chunk = self
            .chunks
            .binary_search_by_key(&number, |c| c.number)
            .ok()
            .map(|i| &self.chunks[i])?;
        let path = chunk.locate(url)?;
        // Chunks can be stale relative to the tree
        self.data.node(&path).map(|_| path)
    }

    /// Resolves a title path.
    ///
    /// - `/` is the top level; `/A/B` walks titles from there.
    /// - `..`, `.` and `A/B` are relative to `context` (default: top level).
    /// - A bare title is searched everywhere, exact (case-insensitive)
    ///   matches first, then substrings.
    pub fn resolve(&self, query: &str, context: Option<&[usize]>) -> ResolveResult {
        let query = query.trim();
        if query.is_empty() || query == "/" {
            return ResolveResult::Found(Vec::new());
        }

        if let Some(absolute) = query.strip_prefix('/') {
            return self.resolve_segments(Vec::new(), absolute);
        }

        if query.contains('/') || query == ".." || query == "." {
            let start = context.map(<[usize]>::to_vec).unwrap_or_default();
            return self.resolve_segments(start, query);
        }

        self.search(query)
    }

    fn resolve_segments(&self, mut path: TreePath, segments: &str) -> ResolveResult {
        for segment in segments.split('/').filter(|s| !s.is_empty()) {
            match segment {
                "." => {}
                ".." => {
                    path.pop();
                }
                title => {
                    let Some(children) = self.data.children_at(&path) else {
                        return ResolveResult::NotFound;
                    };
                    let position = children
                        .iter()
                        .position(|n| n.title == title)
                        .or_else(|| {
                            children
                                .iter()
                                .position(|n| n.title.eq_ignore_ascii_case(title))
                        });
                    match position {
                        Some(i) => path.push(i),
                        None => return ResolveResult::NotFound,
                    }
                }
            }
        }
        ResolveResult::Found(path)
    }

    fn search(&self, needle: &str) -> ResolveResult {
        let lower = needle.to_lowercase();
        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for (path, node) in self.walk() {
            let title = node.title.to_lowercase();
            if title == lower {
                exact.push(path);
            } else if title.contains(&lower) {
                partial.push(path);
            }
        }

        let mut candidates = if exact.is_empty() { partial } else { exact };
        match candidates.len() {
            0 => ResolveResult::NotFound,
            1 => ResolveResult::Found(candidates.swap_remove(0)),
            _ => ResolveResult::Ambiguous(candidates),
        }
    }

    /// Pre-order traversal of every node in memory.
    pub fn walk(&self) -> Walk<'a> {
        Walk {
            stack: self
                .data
                .tree
                .iter()
                .enumerate()
                .rev()
                .map(|(i, n)| (vec![i], n))
                .collect(),
        }
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            index_entries: self.data.index.len(),
            index_chunks: self.chunks.len(),
            ..Default::default()
        };
        for (path, node) in self.walk() {
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(path.len());
            if node.children.is_leaf() {
                stats.leaves += 1;
            }
            if node.children.deferred_script().is_some() {
                stats.deferred += 1;
            }
            if node.link.as_ref().is_some_and(|l| l.is_external()) {
                stats.external_links += 1;
            }
        }
        stats
    }
}

pub struct Walk<'a> {
    stack: Vec<(TreePath, &'a NavNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (TreePath, &'a NavNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        for (i, child) in node.children.nodes().iter().enumerate().rev() {
            let mut child_path = path.clone();
            child_path.push(i);
            self.stack.push((child_path, child));
        }
        Some((path, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Link;

    fn sample() -> NavTreeData {
        NavTreeData::new(vec![NavNode::branch(
            "PDL",
            Link::page("index.html"),
            vec![
                NavNode::branch(
                    "Overview",
                    Link::page("page_overview.html"),
                    vec![
                        NavNode::leaf("Quick Start", Link::parse("page_overview.html#start")),
                        NavNode::leaf("Infineon", Link::external("https://www.infineon.com")),
                    ],
                ),
                NavNode::branch(
                    "API Reference",
                    Link::page("modules.html"),
                    vec![
                        NavNode::branch(
                            "ADC (SAR)",
                            Link::page("group__group__sar.html"),
                            vec![NavNode::leaf(
                                "Functions",
                                Link::parse("group__group__sar__functions.html"),
                            )],
                        ),
                        NavNode::branch(
                            "GPIO",
                            Link::page("group__group__gpio.html"),
                            vec![NavNode::leaf(
                                "Functions",
                                Link::parse("group__group__gpio__functions.html"),
                            )],
                        ),
                    ],
                ),
                NavNode::deferred("Files", Link::page("files.html"), "files"),
            ],
        )])
    }

    #[test]
    fn test_walk_is_preorder() {
        let data = sample();
        let titles: Vec<&str> = Navigator::new(&data)
            .walk()
            .map(|(_, n)| n.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec![
                "PDL",
                "Overview",
                "Quick Start",
                "Infineon",
                "API Reference",
                "ADC (SAR)",
                "Functions",
                "GPIO",
                "Functions",
                "Files",
            ]
        );
    }

    #[test]
    fn test_breadcrumbs() {
        let data = sample();
        let nav = Navigator::new(&data);
        assert_eq!(
            nav.breadcrumbs(&[0, 1, 1, 0]),
            Some(vec!["PDL", "API Reference", "GPIO", "Functions"])
        );
        assert_eq!(nav.breadcrumbs(&[0, 5]), None);
    }

    #[test]
    fn test_locate_by_tree_walk() {
        let data = sample();
        let nav = Navigator::new(&data);
        assert_eq!(nav.locate("page_overview.html#start"), Some(vec![0, 0, 0]));
        assert_eq!(nav.locate("group__group__gpio.html"), Some(vec![0, 1, 1]));
        // Unknown anchor falls back to the page itself
        assert_eq!(nav.locate("group__group__gpio.html#ga1"), Some(vec![0, 1, 1]));
        assert_eq!(nav.locate("missing.html"), None);
    }

    #[test]
    fn test_resolve_absolute_and_relative() {
        let data = sample();
        let nav = Navigator::new(&data);
        assert_eq!(nav.resolve("/", None), ResolveResult::Found(vec![]));
        assert_eq!(
            nav.resolve("/PDL/api reference/GPIO", None),
            ResolveResult::Found(vec![0, 1, 1])
        );
        assert_eq!(
            nav.resolve("../ADC (SAR)/Functions", Some(&[0, 1, 1])),
            ResolveResult::Found(vec![0, 1, 0, 0])
        );
        assert_eq!(nav.resolve("..", Some(&[0, 1])), ResolveResult::Found(vec![0]));
        assert_eq!(nav.resolve("/PDL/Nope", None), ResolveResult::NotFound);
    }

    #[test]
    fn test_resolve_search() {
        let data = sample();
        let nav = Navigator::new(&data);
        assert_eq!(nav.resolve("gpio", None), ResolveResult::Found(vec![0, 1, 1]));
        assert_eq!(
            nav.resolve("Functions", None),
            ResolveResult::Ambiguous(vec![vec![0, 1, 0, 0], vec![0, 1, 1, 0]])
        );
        // Substring match when nothing matches exactly
        assert_eq!(nav.resolve("quick", None), ResolveResult::Found(vec![0, 0, 0]));
        assert_eq!(nav.resolve("usb", None), ResolveResult::NotFound);
    }

    #[test]
    fn test_stats() {
        let data = sample();
        let stats = Navigator::new(&data).stats();
        assert_eq!(stats.nodes, 10);
        assert_eq!(stats.leaves, 4);
        assert_eq!(stats.max_depth, 4);
        assert_eq!(stats.external_links, 1);
        assert_eq!(stats.deferred, 1);
        assert_eq!(stats.index_entries, 0);
    }
}
