use bench_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the bench root directory.
///
/// Priority:
/// 1. `--bench-path` flag / `BENCH_PATH` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `sites/apps.txt`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_bench(&cwd).unwrap_or(cwd)
}

fn find_bench(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| paths::apps_txt(dir).is_file())
        .map(Path::to_path_buf)
}
