use crate::output::{print_json, rel};
use anyhow::Context;
use bench_core::scaffold;
use std::path::Path;

/// `bench-manager create-module`
pub fn run(
    root: &Path,
    app_name: &str,
    module_name: &str,
    site_name: &str,
    json: bool,
) -> anyhow::Result<()> {
    let bench = super::open_bench(root)?;
    let connector = super::site_connector(&bench);
    let created = scaffold::create_module(&bench, &connector, app_name, module_name, site_name)
        .with_context(|| format!("failed to create module '{module_name}'"))?;

    if json {
        print_json(&created)?;
        return Ok(());
    }

    println!("  package: {}", rel(root, &created.path));
    for site in &created.sites {
        let status = if site.inserted { "created" } else { "exists: " };
        println!("  {status} Module Def '{}' on {}", created.module, site.site);
    }
    println!("  updated: {}", rel(root, &created.index));
    println!("Module ready: {} ({})", created.module, created.app);
    Ok(())
}
