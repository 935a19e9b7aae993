use crate::source::load_site;
use navtree_core::LoadOptions;
use navtree_core::validate::{Severity, validate, validate_site};
use nu_ansi_term::Color;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

pub fn run(path: &Path, strict: bool, json: bool) -> anyhow::Result<ExitCode> {
    // A lone data file is checked without its sibling scripts
    let whole_site = path.is_dir();
    let options = if whole_site {
        LoadOptions::default().with_strict(strict)
    } else {
        LoadOptions::data_only()
    };
    let site = load_site(path, &options)?;

    info!("Checking {}", path.display());
    let report = if whole_site {
        validate_site(&site)
    } else {
        validate(&site.data)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for issue in &report.issues {
            let label = match issue.severity {
                Severity::Error => Color::Red.bold().paint("error"),
                Severity::Warning => Color::Yellow.bold().paint("warning"),
            };
            println!("{}: {}: {}", label, issue.location, issue.kind);
        }
        let summary = format!(
            "{} nodes checked, {} errors, {} warnings",
            site.data.node_count(),
            report.error_count(),
            report.warning_count()
        );
        if report.is_ok() {
            println!("{}", Color::Green.paint(summary));
        } else {
            println!("{}", summary);
        }
    }

    Ok(if report.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
