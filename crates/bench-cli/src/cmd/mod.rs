pub mod module;
pub mod patch;
pub mod report;

use anyhow::Context;
use bench_core::{bench::Bench, paths, store::RedbConnector};
use std::path::Path;

fn open_bench(root: &Path) -> anyhow::Result<Bench> {
    Bench::open(root).with_context(|| format!("failed to open bench at {}", root.display()))
}

/// Document store connector for every site of `bench`.
fn site_connector(bench: &Bench) -> RedbConnector {
    RedbConnector::new(
        paths::sites_dir(bench.root()),
        bench.config().site_db_file.clone(),
    )
}
