use crate::source::load_site;
use navtree_core::{IndexChunk, LoadOptions, NavTreeData};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

#[derive(Serialize)]
struct Export<'a> {
    #[serde(flatten)]
    data: &'a NavTreeData,
    #[serde(skip_serializing_if = "is_empty")]
    chunks: &'a [IndexChunk],
    #[serde(skip_serializing_if = "is_empty")]
    unresolved: &'a [String],
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

pub fn run(path: &Path, compact: bool, with_index: bool) -> anyhow::Result<ExitCode> {
    let site = load_site(path, &LoadOptions::default().with_load_index(with_index))?;
    let export = Export {
        data: &site.data,
        chunks: &site.chunks,
        unresolved: &site.unresolved,
    };

    let json = if compact {
        serde_json::to_string(&export)?
    } else {
        serde_json::to_string_pretty(&export)?
    };
    println!("{}", json);
    Ok(ExitCode::SUCCESS)
}
