//! Writes the model back in Doxygen's layout.
//!
//! Output parses back to an equal value; it is not guaranteed to be
//! byte-identical to what Doxygen produced.

use crate::model::{
    Children, IndexChunk, NAVTREE_INDEX_VAR, NAVTREE_VAR, NavNode, NavTreeData, SYNC_OFF_VAR,
    SYNC_ON_VAR, format_path,
};
use crate::util::js_string;
use std::fmt::Write;

const INDENT: &str = "  ";

pub fn write_navtree_data(data: &NavTreeData) -> String {
    let mut out = String::new();
    if let Some(preamble) = &data.preamble {
        out.push_str(preamble);
        out.push('\n');
    }

    write_node_list(&mut out, NAVTREE_VAR, &data.tree);

    if !data.index.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "var {} =\n[", NAVTREE_INDEX_VAR);
        let entries = data.index.entries();
        for (i, entry) in entries.iter().enumerate() {
            out.push_str(&js_string(entry, '"'));
            if i + 1 < entries.len() {
                out.push(',');
            }
            out.push('\n');
        }
        out.push_str("];\n");
    }

    if data.sync_on.is_some() || data.sync_off.is_some() {
        out.push('\n');
    }
    if let Some(msg) = &data.sync_on {
        let _ = writeln!(out, "var {} = {};", SYNC_ON_VAR, js_string(msg, '\''));
    }
    if let Some(msg) = &data.sync_off {
        let _ = writeln!(out, "var {} = {};", SYNC_OFF_VAR, js_string(msg, '\''));
    }
    out
}

/// Writes a deferred child script declaring `var <name> = [ ... ];`.
pub fn write_children_script(name: &str, nodes: &[NavNode]) -> String {
    let mut out = String::new();
    write_node_list(&mut out, name, nodes);
    out
}

pub fn write_index_chunk(chunk: &IndexChunk) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "var {} =\n{{", IndexChunk::variable_name(chunk.number));
    let count = chunk.entries.len();
    for (i, (url, path)) in chunk.entries.iter().enumerate() {
        let _ = write!(out, "{}:{}", js_string(url, '"'), format_path(path));
        if i + 1 < count {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("};\n");
    out
}

fn write_node_list(out: &mut String, name: &str, nodes: &[NavNode]) {
    let _ = writeln!(out, "var {} =\n[", name);
    write_nodes(out, nodes, 1);
    out.push_str("];\n");
}

fn write_nodes(out: &mut String, nodes: &[NavNode], depth: usize) {
    for (i, node) in nodes.iter().enumerate() {
        write_node(out, node, depth);
        if i + 1 < nodes.len() {
            out.push(',');
        }
        out.push('\n');
    }
}

fn write_node(out: &mut String, node: &NavNode, depth: usize) {
    let indent = INDENT.repeat(depth);
    let link = match &node.link {
        Some(link) => js_string(&link.to_string(), '"'),
        None => "null".to_string(),
    };
    let _ = write!(out, "{}[ {}, {}, ", indent, js_string(&node.title, '"'), link);

    match &node.children {
        Children::Leaf => out.push_str("null ]"),
        Children::Deferred { script, .. } => {
            let _ = write!(out, "{} ]", js_string(script, '"'));
        }
        Children::Inline { nodes } if nodes.is_empty() => out.push_str("[ ] ]"),
        Children::Inline { nodes } => {
            out.push_str("[\n");
            write_nodes(out, nodes, depth + 1);
            let _ = write!(out, "{}] ]", indent);
        }
    }
}
