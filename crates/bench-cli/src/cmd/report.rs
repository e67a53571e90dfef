use crate::output::{print_json, rel};
use anyhow::Context;
use bench_core::scaffold;
use std::path::Path;

/// `bench-manager create-report`
pub fn create(
    root: &Path,
    module_name: &str,
    reference_doctype: &str,
    report_name: &str,
    site_name: &str,
    json: bool,
) -> anyhow::Result<()> {
    let bench = super::open_bench(root)?;
    let connector = super::site_connector(&bench);
    let created = scaffold::create_report(
        &bench,
        &connector,
        module_name,
        reference_doctype,
        report_name,
        site_name,
    )
    .with_context(|| format!("failed to create report '{report_name}'"))?;

    if json {
        print_json(&created)?;
        return Ok(());
    }

    for site in &created.sites {
        let status = if site.inserted { "created" } else { "exists: " };
        println!("  {status} Report '{}' on {}", created.report, site.site);
    }
    if created.existed {
        println!("  skipped: boilerplate (report already existed)");
    }
    for file in &created.files {
        println!("  created: {}", rel(root, file));
    }
    println!("Report ready: {} ({} / {})", created.report, created.app, created.module);
    Ok(())
}

/// `bench-manager create-report-files`
pub fn files(root: &Path, report_name: &str, site_name: &str, json: bool) -> anyhow::Result<()> {
    let bench = super::open_bench(root)?;
    let connector = super::site_connector(&bench);
    let written = scaffold::create_report_files(&bench, &connector, report_name, site_name)
        .with_context(|| format!("failed to write files for report '{report_name}'"))?;

    if json {
        print_json(&written)?;
        return Ok(());
    }

    if written.files.is_empty() {
        println!("Nothing to write: boilerplate for '{}' already exists", written.report);
        return Ok(());
    }
    for file in &written.files {
        println!("  created: {}", rel(root, file));
    }
    println!("Report files ready: {}", written.report);
    Ok(())
}
