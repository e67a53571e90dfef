use crate::error::{BenchError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const APPS_DIR: &str = "apps";
pub const SITES_DIR: &str = "sites";
pub const PATCHES_DIR: &str = "patches";
pub const REPORT_DIR: &str = "report";

pub const APPS_TXT: &str = "apps.txt";
pub const SITE_CONFIG: &str = "site_config.json";
pub const PATCHES_TXT: &str = "patches.txt";
pub const MODULES_TXT: &str = "modules.txt";
pub const HOOKS_PY: &str = "hooks.py";
pub const CONFIG_FILE: &str = "bench_manager.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn sites_dir(root: &Path) -> PathBuf {
    root.join(SITES_DIR)
}

pub fn apps_txt(root: &Path) -> PathBuf {
    sites_dir(root).join(APPS_TXT)
}

pub fn site_dir(root: &Path, site: &str) -> PathBuf {
    sites_dir(root).join(site)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// The python package of an app: `apps/<app>/<app>`.
pub fn app_package(root: &Path, app: &str) -> PathBuf {
    root.join(APPS_DIR).join(app).join(app)
}

pub fn hooks_py(root: &Path, app: &str) -> PathBuf {
    app_package(root, app).join(HOOKS_PY)
}

pub fn patches_txt(root: &Path, app: &str) -> PathBuf {
    app_package(root, app).join(PATCHES_TXT)
}

pub fn modules_txt(root: &Path, app: &str) -> PathBuf {
    app_package(root, app).join(MODULES_TXT)
}

pub fn patches_dir(root: &Path, app: &str) -> PathBuf {
    app_package(root, app).join(PATCHES_DIR)
}

pub fn patch_version_dir(root: &Path, app: &str, version: &str) -> PathBuf {
    patches_dir(root, app).join(version)
}

pub fn patch_file(root: &Path, app: &str, version: &str, patch: &str) -> PathBuf {
    patch_version_dir(root, app, version).join(format!("{patch}.py"))
}

/// `apps/<app>/<app>/<module>`; `module` must already be scrubbed.
pub fn module_dir(root: &Path, app: &str, module: &str) -> PathBuf {
    app_package(root, app).join(module)
}

/// `apps/<app>/<app>/<module>/report/<report>`; both names scrubbed.
pub fn report_dir(root: &Path, app: &str, module: &str, report: &str) -> PathBuf {
    module_dir(root, app, module).join(REPORT_DIR).join(report)
}

/// Dotted identifier a patch is registered under in `patches.txt`.
pub fn patch_identifier(app: &str, version: &str, patch: &str) -> String {
    format!("{app}.{PATCHES_DIR}.{version}.{patch}")
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// Normalise a user supplied name into a python identifier: trim, replace
/// spaces and hyphens with underscores, lowercase.
pub fn scrub(name: &str) -> String {
    name.trim().replace([' ', '-'], "_").to_lowercase()
}

/// Reject names that would escape their directory once joined into a path.
pub fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed.contains('/')
        || trimmed.contains('\\')
        || trimmed.contains("..")
        || trimmed.contains('\0')
    {
        return Err(BenchError::InvalidName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
