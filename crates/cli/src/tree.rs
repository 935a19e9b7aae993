use crate::source::load_site;
use navtree_core::{Children, LoadOptions, NavNode};
use nu_ansi_term::{Color, Style};
use std::path::Path;
use std::process::ExitCode;

pub fn run(
    path: &Path,
    depth: Option<usize>,
    links: bool,
    no_resolve: bool,
) -> anyhow::Result<ExitCode> {
    let options = LoadOptions::default()
        .with_load_index(false)
        .with_resolve_deferred(!no_resolve);
    let site = load_site(path, &options)?;

    let mut out = String::new();
    render(&mut out, &site.data.tree, "", 1, depth, links);
    print!("{}", out);
    Ok(ExitCode::SUCCESS)
}

fn render(
    out: &mut String,
    nodes: &[NavNode],
    prefix: &str,
    level: usize,
    max_depth: Option<usize>,
    links: bool,
) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let branch = if last { "└── " } else { "├── " };

        let title = if node.children.is_leaf() {
            Style::new().paint(node.title.as_str())
        } else {
            Style::new().bold().paint(node.title.as_str())
        };
        out.push_str(&format!("{}{}{}", prefix, branch, title));

        if links {
            match &node.link {
                Some(link) if link.is_external() => {
                    out.push_str(&format!("  {}", Color::LightBlue.paint(link.to_string())));
                }
                Some(link) => {
                    out.push_str(&format!("  {}", Color::DarkGray.paint(link.to_string())));
                }
                None => {}
            }
        }
        if let Children::Deferred { script, nodes: None } = &node.children {
            out.push_str(&format!("  {}", Color::Yellow.paint(format!("[{}.js]", script))));
        }
        out.push('\n');

        if max_depth.is_some_and(|max| level >= max) {
            continue;
        }
        let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
        render(
            out,
            node.children.nodes(),
            &child_prefix,
            level + 1,
            max_depth,
            links,
        );
    }
}
