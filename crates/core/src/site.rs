//! Loading a whole Doxygen HTML output directory.

use crate::error::{NavtreeError, Result};
use crate::model::{Children, IndexChunk, NavNode, NavTreeData};
use crate::parser::{parse_children_script, parse_index_chunk, parse_navtree_data};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const NAVTREE_DATA_FILE: &str = "navtreedata.js";

static CHUNK_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^navtreeindex(\d+)\.js$").expect("valid chunk file pattern"));

/// What [`DocSite::open`] loads besides `navtreedata.js`.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Load `<name>.js` for deferred child lists.
    pub resolve_deferred: bool,
    /// Load `navtreeindex<N>.js` chunks.
    pub load_index: bool,
    /// Fail on a missing deferred script instead of recording it.
    pub strict: bool,
    /// Maximum nesting of deferred scripts.
    pub max_depth: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            resolve_deferred: true,
            load_index: true,
            strict: false,
            max_depth: 32,
        }
    }
}

impl LoadOptions {
    /// Only `navtreedata.js`.
    pub fn data_only() -> Self {
        Self {
            resolve_deferred: false,
            load_index: false,
            ..Self::default()
        }
    }

    pub fn with_resolve_deferred(mut self, enabled: bool) -> Self {
        self.resolve_deferred = enabled;
        self
    }

    pub fn with_load_index(mut self, enabled: bool) -> Self {
        self.load_index = enabled;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Navigation data of one generated documentation site.
#[derive(Debug, Clone)]
pub struct DocSite {
    pub root: PathBuf,
    pub data: NavTreeData,
    /// Index chunks ordered by number.
    pub chunks: Vec<IndexChunk>,
    /// Deferred scripts that could not be loaded.
    pub unresolved: Vec<String>,
}

impl DocSite {
    /// Opens `path`, which is either the output directory or the
    /// `navtreedata.js` file inside it.
    pub fn open(path: &Path, options: &LoadOptions) -> Result<Self> {
        let (root, data_file) = if path.is_dir() {
            (path.to_path_buf(), path.join(NAVTREE_DATA_FILE))
        } else {
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            (root, path.to_path_buf())
        };

        tracing::debug!("Reading {}", data_file.display());
        let source = std::fs::read_to_string(&data_file)?;
        let mut data = parse_navtree_data(&source)?;

        let mut unresolved = Vec::new();
        if options.resolve_deferred {
            resolve_nodes(&root, &mut data.tree, 0, options, &mut unresolved)?;
        }

        let chunks = if options.load_index {
            load_chunks(&root)?
        } else {
            Vec::new()
        };

        tracing::info!(
            "Loaded {} ({} nodes, {} index chunks, {} unresolved scripts)",
            data_file.display(),
            data.node_count(),
            chunks.len(),
            unresolved.len()
        );

        Ok(Self {
            root,
            data,
            chunks,
            unresolved,
        })
    }

    /// Wraps data that was parsed elsewhere.
    pub fn from_data(root: PathBuf, data: NavTreeData) -> Self {
        Self {
            root,
            data,
            chunks: Vec::new(),
            unresolved: Vec::new(),
        }
    }

    pub fn chunk(&self, number: usize) -> Option<&IndexChunk> {
        self.chunks
            .binary_search_by_key(&number, |c| c.number)
            .ok()
            .map(|i| &self.chunks[i])
    }
}

/// Script names are plain identifiers; anything else could escape `root`.
fn is_script_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn resolve_nodes(
    root: &Path,
    nodes: &mut [NavNode],
    depth: usize,
    options: &LoadOptions,
    unresolved: &mut Vec<String>,
) -> Result<()> {
    for node in nodes.iter_mut() {
        match &mut node.children {
            Children::Leaf => {}
            Children::Inline { nodes } => resolve_nodes(root, nodes, depth, options, unresolved)?,
            Children::Deferred { script, nodes } => {
                if depth >= options.max_depth {
                    return Err(NavtreeError::DepthLimit(options.max_depth));
                }
                if !is_script_name(script) {
                    if options.strict {
                        return Err(NavtreeError::UnresolvedScript(script.clone()));
                    }
                    tracing::warn!("Skipping deferred script with unusable name {:?}", script);
                    unresolved.push(script.clone());
                    continue;
                }

                let file = root.join(format!("{}.js", script));
                let source = match std::fs::read_to_string(&file) {
                    Ok(source) => source,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        if options.strict {
                            return Err(NavtreeError::UnresolvedScript(script.clone()));
                        }
                        tracing::warn!("Deferred script {} not found", file.display());
                        unresolved.push(script.clone());
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };

                let mut children = parse_children_script(&source, script)?;
                tracing::trace!("Resolved {} with {} entries", script, children.len());
                resolve_nodes(root, &mut children, depth + 1, options, unresolved)?;
                *nodes = Some(children);
            }
        }
    }
    Ok(())
}

fn load_chunks(root: &Path) -> Result<Vec<IndexChunk>> {
    let files: Vec<(usize, PathBuf)> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?;
            let number = CHUNK_FILE.captures(name)?.get(1)?.as_str().parse().ok()?;
            Some((number, entry.path().to_path_buf()))
        })
        .collect();

    let mut chunks = files
        .par_iter()
        .map(|(number, path)| {
            let source = std::fs::read_to_string(path)?;
            parse_index_chunk(&source, *number)
        })
        .collect::<Result<Vec<_>>>()?;

    chunks.sort_by_key(|c| c.number);
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_file_pattern() {
        let number = |name: &str| {
            CHUNK_FILE
                .captures(name)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        };
        assert_eq!(number("navtreeindex0.js").as_deref(), Some("0"));
        assert_eq!(number("navtreeindex12.js").as_deref(), Some("12"));
        assert_eq!(number("navtreeindex.js"), None);
        assert_eq!(number("navtreedata.js"), None);
        assert_eq!(number("navtreeindex1.js.bak"), None);
    }

    #[test]
    fn test_script_names() {
        assert!(is_script_name("group__adc"));
        assert!(!is_script_name("../secret"));
        assert!(!is_script_name(""));
    }

    #[test]
    fn test_load_options_builders() {
        let opts = LoadOptions::data_only().with_strict(true).with_max_depth(3);
        assert!(!opts.resolve_deferred);
        assert!(!opts.load_index);
        assert!(opts.strict);
        assert_eq!(opts.max_depth, 3);
        let opts = opts.with_resolve_deferred(true).with_load_index(true);
        assert!(opts.resolve_deferred && opts.load_index);
    }
}
