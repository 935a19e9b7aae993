use anyhow::{Context, bail};
use navtree_core::emit::{write_children_script, write_index_chunk, write_navtree_data};
use navtree_core::parser::{parse_children_script, parse_index_chunk, parse_navtree_data};
use navtree_core::site::NAVTREE_DATA_FILE;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

/// Which writer a file needs, judged by its name.
#[derive(Debug, PartialEq, Eq)]
enum ScriptKind {
    Data,
    IndexChunk(usize),
    Children(String),
}

fn classify(file: &Path) -> anyhow::Result<ScriptKind> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", file.display()))?;
    if name == NAVTREE_DATA_FILE {
        return Ok(ScriptKind::Data);
    }
    let Some(stem) = name.strip_suffix(".js") else {
        bail!("{} is not a .js file", file.display());
    };
    if let Some(number) = stem
        .strip_prefix("navtreeindex")
        .and_then(|n| n.parse::<usize>().ok())
    {
        return Ok(ScriptKind::IndexChunk(number));
    }
    Ok(ScriptKind::Children(stem.to_string()))
}

fn canonical(source: &str, kind: &ScriptKind) -> navtree_core::Result<String> {
    Ok(match kind {
        ScriptKind::Data => write_navtree_data(&parse_navtree_data(source)?),
        ScriptKind::IndexChunk(number) => write_index_chunk(&parse_index_chunk(source, *number)?),
        ScriptKind::Children(name) => {
            write_children_script(name, &parse_children_script(source, name)?)
        }
    })
}

pub fn run(file: &Path, output: Option<&Path>, check: bool) -> anyhow::Result<ExitCode> {
    let kind = classify(file)?;
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let formatted =
        canonical(&source, &kind).with_context(|| format!("failed to parse {}", file.display()))?;

    if check {
        if formatted == source {
            info!("{} is canonical", file.display());
            return Ok(ExitCode::SUCCESS);
        }
        println!("would reformat {}", file.display());
        return Ok(ExitCode::FAILURE);
    }

    match output {
        Some(target) => {
            std::fs::write(target, &formatted)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!("Wrote {}", target.display());
        }
        None => print!("{}", formatted),
    }
    Ok(ExitCode::SUCCESS)
}
