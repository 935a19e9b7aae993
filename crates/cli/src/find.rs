use crate::source::load_site;
use crate::view::NodeRow;
use anyhow::bail;
use navtree_core::{LoadOptions, Navigator, ResolveResult, TreePath};
use std::path::Path;
use std::process::ExitCode;
use tabled::Table;
use tabled::settings::Style;

pub fn run(path: &Path, query: &str, from: Option<&str>) -> anyhow::Result<ExitCode> {
    let site = load_site(path, &LoadOptions::default().with_load_index(false))?;
    let nav = Navigator::for_site(&site);

    let context: Option<TreePath> = match from {
        None => None,
        Some(base) => match nav.resolve(base, None) {
            ResolveResult::Found(p) => Some(p),
            ResolveResult::Ambiguous(_) => bail!("--from '{}' matches several entries", base),
            ResolveResult::NotFound => bail!("--from '{}' does not match any entry", base),
        },
    };

    let paths = match nav.resolve(query, context.as_deref()) {
        ResolveResult::Found(p) if p.is_empty() => {
            // The top level has no node of its own
            (0..site.data.tree.len()).map(|i| vec![i]).collect()
        }
        ResolveResult::Found(p) => vec![p],
        ResolveResult::Ambiguous(paths) => paths,
        ResolveResult::NotFound => {
            println!("No entry matches '{}'.", query);
            return Ok(ExitCode::FAILURE);
        }
    };

    let rows: Vec<NodeRow> = paths
        .iter()
        .filter_map(|p| nav.node_at(p).map(|node| NodeRow::from_node(p, node)))
        .collect();
    println!("{}", Table::new(&rows).with(Style::psql()));
    Ok(ExitCode::SUCCESS)
}
