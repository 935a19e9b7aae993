use crate::source::load_site;
use anyhow::bail;
use navtree_core::model::format_path;
use navtree_core::{LoadOptions, Navigator};
use nu_ansi_term::Color;
use std::path::Path;
use std::process::ExitCode;

pub fn run(path: &Path, url: &str) -> anyhow::Result<ExitCode> {
    let site = load_site(path, &LoadOptions::default())?;
    let nav = Navigator::for_site(&site);

    let Some(tree_path) = nav.locate(url) else {
        bail!("{} is not in the navigation tree", url);
    };

    let crumbs = nav.breadcrumbs(&tree_path).unwrap_or_default();
    println!("{}", Color::Cyan.paint(format_path(&tree_path)));
    println!("{}", crumbs.join(" > "));
    if let Some(link) = nav.node_at(&tree_path).and_then(|n| n.link.as_ref()) {
        println!("{}", Color::DarkGray.paint(link.to_string()));
    }
    Ok(ExitCode::SUCCESS)
}
