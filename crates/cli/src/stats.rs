use crate::source::load_site;
use crate::view::StatRow;
use navtree_core::{LoadOptions, Navigator};
use std::path::Path;
use std::process::ExitCode;
use tabled::Table;

pub fn run(path: &Path) -> anyhow::Result<ExitCode> {
    let site = load_site(path, &LoadOptions::default())?;
    let stats = Navigator::for_site(&site).stats();

    let rows = vec![
        StatRow::new("Nodes", stats.nodes),
        StatRow::new("Leaves", stats.leaves),
        StatRow::new("Max depth", stats.max_depth),
        StatRow::new("External links", stats.external_links),
        StatRow::new("Deferred child lists", stats.deferred),
        StatRow::new("Unresolved scripts", site.unresolved.len()),
        StatRow::new("Index entries", stats.index_entries),
        StatRow::new("Index chunks", stats.index_chunks),
    ];
    println!("{}", Table::new(rows));
    Ok(ExitCode::SUCCESS)
}
