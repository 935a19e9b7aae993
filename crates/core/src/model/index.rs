use super::TreePath;
use crate::util::{js_cmp, split_anchor};
use std::cmp::Ordering;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The `NAVTREEINDEX` sequence.
///
/// Entry `n` is the first key of `navtreeindex<n>.js`, so the sequence is
/// a sorted list of chunk boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavIndex(Vec<String>);

impl NavIndex {
    pub fn new(entries: Vec<String>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of the chunk that would hold `url`: the last entry that does
    /// not sort after it, or 0 when `url` sorts before every entry.
    ///
    /// Strings compare by UTF-16 code units, matching the browser script.
    pub fn chunk_for(&self, url: &str) -> usize {
        self.0
            .partition_point(|entry| js_cmp(entry, url) != Ordering::Greater)
            .saturating_sub(1)
    }

    /// Whether the entries are in non-decreasing UTF-16 order.
    pub fn is_sorted(&self) -> bool {
        self.0
            .windows(2)
            .all(|w| js_cmp(&w[0], &w[1]) != Ordering::Greater)
    }
}

/// One `navtreeindex<number>.js` map from page URL to chunk path.
///
/// Chunk paths start below the root entry: the browser prepends `0`
/// before walking `NAVTREE`, so `[]` is `NAVTREE[0]` and `[1, 2]` is
/// `NAVTREE[0]`'s second child's third child. Use [`IndexChunk::tree_path`]
/// to get a [`TreePath`] usable with `NavTreeData::node`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexChunk {
    pub number: usize,
    pub entries: IndexMap<String, TreePath>,
}

impl IndexChunk {
    pub fn variable_name(number: usize) -> String {
        format!("NAVTREEINDEX{}", number)
    }

    pub fn file_name(number: usize) -> String {
        format!("navtreeindex{}.js", number)
    }

    pub fn get(&self, url: &str) -> Option<&TreePath> {
        self.entries.get(url)
    }

    /// Looks `url` up, retrying with the anchor dropped.
    pub fn lookup(&self, url: &str) -> Option<&TreePath> {
        self.get(url).or_else(|| match split_anchor(url) {
            (file, Some(_)) => self.get(file),
            _ => None,
        })
    }

    /// Converts a stored chunk path to a path from the top of `NAVTREE`.
    pub fn tree_path(chunk_path: &[usize]) -> TreePath {
        let mut path = Vec::with_capacity(chunk_path.len() + 1);
        path.push(0);
        path.extend_from_slice(chunk_path);
        path
    }

    /// [`IndexChunk::lookup`] with the result converted by [`IndexChunk::tree_path`].
    pub fn locate(&self, url: &str) -> Option<TreePath> {
        self.lookup(url).map(|p| Self::tree_path(p))
    }

    pub fn first_key(&self) -> Option<&str> {
        self.entries.keys().next().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(entries: &[&str]) -> NavIndex {
        NavIndex::new(entries.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_chunk_for() {
        let idx = index(&["annotated.html", "group__gpio.html#ga3", "struct__x.html"]);
        assert_eq!(idx.chunk_for("annotated.html"), 0);
        assert_eq!(idx.chunk_for("classes.html"), 0);
        assert_eq!(idx.chunk_for("group__gpio.html#ga3"), 1);
        assert_eq!(idx.chunk_for("group__sysint.html"), 1);
        assert_eq!(idx.chunk_for("zzz.html"), 2);
        // Sorts before the first boundary
        assert_eq!(idx.chunk_for("Abc.html"), 0);
    }

    #[test]
    fn test_chunk_for_orders_like_the_browser() {
        // "\u{1f4d6}" sorts after "\u{ff41}" by code point but before it in UTF-16
        let idx = index(&["a.html", "\u{ff41}.html"]);
        assert_eq!(idx.chunk_for("\u{1f4d6}.html"), 0);
        assert_eq!(idx.chunk_for("\u{ff41}z.html"), 1);
        assert!(index(&["\u{1f4d6}.html", "\u{ff41}.html"]).is_sorted());
    }

    #[test]
    fn test_chunk_for_empty_index() {
        assert_eq!(NavIndex::default().chunk_for("index.html"), 0);
    }

    #[test]
    fn test_is_sorted() {
        assert!(index(&["a.html", "a.html", "b.html"]).is_sorted());
        assert!(!index(&["b.html", "a.html"]).is_sorted());
    }

    #[test]
    fn test_chunk_lookup_falls_back_to_page() {
        let mut chunk = IndexChunk::default();
        chunk.entries.insert("group__adc.html".to_string(), vec![0, 2, 1]);
        assert_eq!(chunk.lookup("group__adc.html#ga77"), Some(&vec![0, 2, 1]));
        assert_eq!(chunk.lookup("group__dma.html#ga77"), None);
    }

    #[test]
    fn test_chunk_paths_are_below_root() {
        assert_eq!(IndexChunk::tree_path(&[]), vec![0]);
        assert_eq!(IndexChunk::tree_path(&[1, 2]), vec![0, 1, 2]);

        let mut chunk = IndexChunk::default();
        chunk.entries.insert("index.html".to_string(), vec![]);
        chunk.entries.insert("pages.html".to_string(), vec![0]);
        assert_eq!(chunk.locate("index.html#intro"), Some(vec![0]));
        assert_eq!(chunk.locate("pages.html"), Some(vec![0, 0]));
        assert_eq!(chunk.locate("files.html"), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(IndexChunk::variable_name(3), "NAVTREEINDEX3");
        assert_eq!(IndexChunk::file_name(3), "navtreeindex3.js");
    }
}
