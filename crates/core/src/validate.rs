//! Structural checks over parsed navigation data.
//!
//! The data format enforces nothing by itself, so rule violations are
//! collected into a report rather than returned as errors.

use crate::model::{Children, IndexChunk, Link, NavNode, NavTreeData, TreePath, format_path};
use crate::site::DocSite;
use crate::util::js_cmp;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// Page extensions Doxygen can be configured to write.
pub const PAGE_EXTENSIONS: &[&str] = &[".html", ".htm", ".xhtml", ".php"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "at", rename_all = "snake_case")]
pub enum Location {
    Node { path: TreePath },
    IndexEntry { position: usize },
    Chunk { number: usize, key: Option<String> },
    Script { name: String },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Node { path } => write!(f, "node {}", format_path(path)),
            Location::IndexEntry { position } => write!(f, "NAVTREEINDEX[{}]", position),
            Location::Chunk { number, key: None } => write!(f, "navtreeindex{}.js", number),
            Location::Chunk {
                number,
                key: Some(key),
            } => write!(f, "navtreeindex{}.js \"{}\"", number, key),
            Location::Script { name } => write!(f, "{}.js", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum IssueKind {
    EmptyTitle,
    EmptyChildList,
    MissingLink,
    EmptyLink,
    UnrecognizedPage { file: String },
    EmptyExternalLink,
    EmptyScriptName,
    AdjacentEmptyIndexEntries,
    UnsortedIndex { previous: String, current: String },
    DuplicateIndexEntry { entry: String },
    UnresolvedScript,
    ChunkCountMismatch { chunks: usize, entries: usize },
    ChunkKeyMismatch { expected: String, found: String },
    DanglingIndexPath { path: TreePath },
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::UnsortedIndex { .. }
            | IssueKind::DuplicateIndexEntry { .. }
            | IssueKind::ChunkKeyMismatch { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::EmptyTitle => f.write_str("title is empty"),
            IssueKind::EmptyChildList => f.write_str("child list is empty; use null for a leaf"),
            IssueKind::MissingLink => f.write_str("link is null"),
            IssueKind::EmptyLink => f.write_str("link is empty"),
            IssueKind::UnrecognizedPage { file } => {
                write!(f, "'{}' is not a recognized page file", file)
            }
            IssueKind::EmptyExternalLink => f.write_str("external link has no URL after the marker"),
            IssueKind::EmptyScriptName => f.write_str("deferred child script name is empty"),
            IssueKind::AdjacentEmptyIndexEntries => {
                f.write_str("empty entry follows another empty entry")
            }
            IssueKind::UnsortedIndex { previous, current } => write!(
                f,
                "'{}' sorts before the preceding '{}'; chunk lookup will miss pages",
                current, previous
            ),
            IssueKind::DuplicateIndexEntry { entry } => {
                write!(f, "'{}' appears more than once", entry)
            }
            IssueKind::UnresolvedScript => f.write_str("deferred child script could not be loaded"),
            IssueKind::ChunkCountMismatch { chunks, entries } => write!(
                f,
                "{} index chunks found for {} index entries",
                chunks, entries
            ),
            IssueKind::ChunkKeyMismatch { expected, found } => write!(
                f,
                "first key is '{}' but the index entry is '{}'",
                found, expected
            ),
            IssueKind::DanglingIndexPath { path } => {
                write!(f, "path {} does not name a node", format_path(path))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub location: Location,
    pub severity: Severity,
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.location, self.kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    fn push(&mut self, location: Location, kind: IssueKind) {
        self.issues.push(Issue {
            location,
            severity: kind.severity(),
            kind,
        });
    }

    /// True when there are no errors. Warnings do not count.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }
}

pub fn validate(data: &NavTreeData) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut path = Vec::new();
    check_nodes(&data.tree, &mut path, &mut report);
    check_index(data.index.entries(), &mut report);
    report
}

/// [`validate`] plus the checks that need the whole output directory.
pub fn validate_site(site: &DocSite) -> ValidationReport {
    let mut report = validate(&site.data);

    for name in &site.unresolved {
        report.push(
            Location::Script { name: name.clone() },
            IssueKind::UnresolvedScript,
        );
    }

    if !site.chunks.is_empty() || !site.data.index.is_empty() {
        if site.chunks.len() != site.data.index.len() {
            report.push(
                Location::Chunk {
                    number: site.chunks.len(),
                    key: None,
                },
                IssueKind::ChunkCountMismatch {
                    chunks: site.chunks.len(),
                    entries: site.data.index.len(),
                },
            );
        }

        for chunk in &site.chunks {
            if let (Some(expected), Some(found)) = (
                site.data.index.entries().get(chunk.number),
                chunk.first_key(),
            ) {
                if expected != found {
                    report.push(
                        Location::Chunk {
                            number: chunk.number,
                            key: None,
                        },
                        IssueKind::ChunkKeyMismatch {
                            expected: expected.clone(),
                            found: found.to_string(),
                        },
                    );
                }
            }

            for (url, path) in &chunk.entries {
                if site.data.node(&IndexChunk::tree_path(path)).is_none() {
                    report.push(
                        Location::Chunk {
                            number: chunk.number,
                            key: Some(url.clone()),
                        },
                        IssueKind::DanglingIndexPath { path: path.clone() },
                    );
                }
            }
        }
    }

    report
}

fn check_nodes(nodes: &[NavNode], path: &mut Vec<usize>, report: &mut ValidationReport) {
    for (i, node) in nodes.iter().enumerate() {
        path.push(i);
        check_node(node, path, report);
        check_nodes(node.children.nodes(), path, report);
        path.pop();
    }
}

fn check_node(node: &NavNode, path: &[usize], report: &mut ValidationReport) {
    let here = || Location::Node {
        path: path.to_vec(),
    };

    if node.title.trim().is_empty() {
        report.push(here(), IssueKind::EmptyTitle);
    }

    match &node.link {
        None => report.push(here(), IssueKind::MissingLink),
        Some(Link::External { url }) if url.trim().is_empty() => {
            report.push(here(), IssueKind::EmptyExternalLink)
        }
        Some(Link::External { .. }) => {}
        Some(Link::Page { file, anchor }) => {
            if file.is_empty() && anchor.is_none() {
                report.push(here(), IssueKind::EmptyLink);
            } else if !is_page_file(file) {
                report.push(here(), IssueKind::UnrecognizedPage { file: file.clone() });
            }
        }
    }

    match &node.children {
        Children::Inline { nodes } if nodes.is_empty() => {
            report.push(here(), IssueKind::EmptyChildList)
        }
        Children::Deferred { script, .. } if script.trim().is_empty() => {
            report.push(here(), IssueKind::EmptyScriptName)
        }
        Children::Deferred {
            nodes: Some(nodes), ..
        } if nodes.is_empty() => report.push(here(), IssueKind::EmptyChildList),
        _ => {}
    }
}

fn check_index(entries: &[String], report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    for (position, entry) in entries.iter().enumerate() {
        let location = || Location::IndexEntry { position };

        if position > 0 {
            let previous = &entries[position - 1];
            if entry.is_empty() && previous.is_empty() {
                report.push(location(), IssueKind::AdjacentEmptyIndexEntries);
            } else if !entry.is_empty()
                && !previous.is_empty()
                && js_cmp(entry, previous) == Ordering::Less
            {
                report.push(
                    location(),
                    IssueKind::UnsortedIndex {
                        previous: previous.clone(),
                        current: entry.clone(),
                    },
                );
            }
        }

        if !entry.is_empty() && !seen.insert(entry.as_str()) {
            report.push(
                location(),
                IssueKind::DuplicateIndexEntry {
                    entry: entry.clone(),
                },
            );
        }
    }
}

pub fn is_page_file(file: &str) -> bool {
    let lower = file.to_ascii_lowercase();
    PAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.len() > ext.len() && lower.ends_with(ext))
}
