use crate::output::{print_json, rel};
use anyhow::Context;
use bench_core::scaffold;
use std::path::Path;

/// `bench-manager create-patch`
pub fn run(
    root: &Path,
    app_name: &str,
    patch_name: &str,
    patch_version: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let bench = super::open_bench(root)?;
    let created = scaffold::create_patch(&bench, app_name, patch_name, patch_version)
        .with_context(|| format!("failed to create patch '{patch_name}'"))?;

    if json {
        print_json(&created)?;
    } else {
        println!("  created: {}", rel(root, &created.path));
        println!("  updated: {}", rel(root, &created.index));
        println!("Registered patch: {}", created.identifier);
    }
    Ok(())
}
