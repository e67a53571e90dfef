//! The on-disk bench: installed apps, sites, and per-app metadata.
//!
//! Layout:
//! ```text
//! <root>/
//!   bench_manager.yaml        optional, see `Config`
//!   apps/<app>/<app>/         python package of each app
//!     hooks.py                app_publisher = "..."
//!     modules.txt, patches.txt
//!   sites/apps.txt            installed apps, one per line
//!   sites/<site>/site_config.json
//! ```

use crate::config::Config;
use crate::error::{BenchError, Result};
use crate::{index, paths};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Site selector meaning "every site in the bench".
pub const ALL_SITES: &str = "all";

#[derive(Debug, Clone)]
pub struct Bench {
    root: PathBuf,
    config: Config,
}

impl Bench {
    /// Open the bench rooted at `root`. Fails unless `sites/apps.txt` exists.
    pub fn open(root: &Path) -> Result<Self> {
        if !paths::apps_txt(root).is_file() {
            return Err(BenchError::BenchNotFound(root.to_path_buf()));
        }
        let config = Config::load(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    pub fn with_config(root: &Path, config: Config) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ---------------------------------------------------------------------------
    // Apps
    // ---------------------------------------------------------------------------

    /// Apps listed in `sites/apps.txt`.
    pub fn apps(&self) -> Result<Vec<String>> {
        index::read(&paths::apps_txt(&self.root))
    }

    /// Exact line match against `sites/apps.txt`.
    pub fn require_app(&self, app: &str) -> Result<()> {
        if self.apps()?.iter().any(|a| a == app) {
            Ok(())
        } else {
            Err(BenchError::AppNotFound(app.to_string()))
        }
    }

    /// `app_publisher` from the app's hooks.py, or the configured default.
    pub fn app_publisher(&self, app: &str) -> Result<String> {
        let hooks = paths::hooks_py(&self.root, app);
        if hooks.is_file() {
            let content = std::fs::read_to_string(&hooks)?;
            if let Some(publisher) = parse_app_publisher(&content) {
                return Ok(publisher);
            }
        }
        tracing::debug!(app, "no app_publisher in hooks.py, using default");
        Ok(self.config.default_publisher.clone())
    }

    /// Find the installed app whose `modules.txt` lists `module`.
    ///
    /// Matches either the name as written or its scrubbed form.
    pub fn module_app(&self, module: &str) -> Result<String> {
        let wanted = paths::scrub(module);
        for app in self.apps()? {
            let modules = index::read(&paths::modules_txt(&self.root, &app))?;
            if modules
                .iter()
                .any(|m| m == module || paths::scrub(m) == wanted)
            {
                return Ok(app);
            }
        }
        Err(BenchError::ModuleNotFound(module.to_string()))
    }

    // ---------------------------------------------------------------------------
    // Sites
    // ---------------------------------------------------------------------------

    /// Site directories (those holding a `site_config.json`), sorted by name.
    /// Symlinked entries are skipped.
    pub fn sites(&self) -> Result<Vec<String>> {
        let dir = paths::sites_dir(&self.root);
        let mut sites = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if !file_type.is_dir() || file_type.is_symlink() {
                continue;
            }
            if !entry.path().join(paths::SITE_CONFIG).is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                sites.push(name.to_string());
            }
        }
        sites.sort();
        Ok(sites)
    }

    /// Resolve a `--site-name` value into the sites to operate on.
    ///
    /// `all` selects every site; anything else must name an existing site,
    /// as written or in its scrubbed form.
    pub fn select_sites(&self, site: &str) -> Result<Vec<String>> {
        let site = site.trim();
        let sites = self.sites()?;
        if site == ALL_SITES {
            return Ok(sites);
        }
        let scrubbed = paths::scrub(site);
        sites
            .iter()
            .find(|s| *s == site)
            .or_else(|| sites.iter().find(|s| **s == scrubbed))
            .map(|s| vec![s.clone()])
            .ok_or_else(|| BenchError::SiteNotFound(site.to_string()))
    }
}

static PUBLISHER_RE: OnceLock<Regex> = OnceLock::new();

fn publisher_re() -> &'static Regex {
    PUBLISHER_RE.get_or_init(|| {
        Regex::new(r#"(?m)^\s*app_publisher\s*=\s*(?:u?"([^"]*)"|u?'([^']*)')"#).unwrap()
    })
}

/// Pull the `app_publisher = "..."` assignment out of a hooks.py source.
pub fn parse_app_publisher(hooks: &str) -> Option<String> {
    let caps = publisher_re().captures(hooks)?;
    let value = caps.get(1).or_else(|| caps.get(2))?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
