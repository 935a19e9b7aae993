use anyhow::Context;
use navtree_core::{DocSite, LoadOptions};
use std::path::Path;

pub fn load_site(path: &Path, options: &LoadOptions) -> anyhow::Result<DocSite> {
    DocSite::open(path, options)
        .with_context(|| format!("failed to load navigation data from {}", path.display()))
}
