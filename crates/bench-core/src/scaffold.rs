//! The four scaffolding operations.
//!
//! Every operation validates its inputs (app, site, module) before touching
//! the filesystem or any site store, so a rejected command leaves the bench
//! exactly as it was. Sites are visited one at a time, each through its own
//! `SiteSession`.

use crate::bench::Bench;
use crate::error::{BenchError, Result};
use crate::records::{self, MODULE_DEF, REPORT};
use crate::store::{Connector, DocumentStore, SiteSession};
use crate::template::{self, StubContext};
use crate::{index, io, paths};
use serde::Serialize;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct PatchCreated {
    pub app: String,
    pub patch: String,
    pub version: String,
    pub identifier: String,
    pub path: PathBuf,
    pub index: PathBuf,
}

/// Per-site result of a record insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteRecord {
    pub site: String,
    pub inserted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleCreated {
    pub app: String,
    pub module: String,
    pub path: PathBuf,
    pub index: PathBuf,
    pub sites: Vec<SiteRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportCreated {
    pub report: String,
    pub module: String,
    pub app: String,
    /// True if the report was already present on at least one site, in which
    /// case no boilerplate was written.
    pub existed: bool,
    pub sites: Vec<SiteRecord>,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportFiles {
    pub report: String,
    pub sites: Vec<String>,
    pub files: Vec<PathBuf>,
}

// ---------------------------------------------------------------------------
// create-patch
// ---------------------------------------------------------------------------

/// Write a patch stub under `patches/<version>/` and register it in
/// `patches.txt`. An existing patch file is never touched.
pub fn create_patch(
    bench: &Bench,
    app_name: &str,
    patch_name: &str,
    patch_version: Option<&str>,
) -> Result<PatchCreated> {
    let version = patch_version
        .unwrap_or(&bench.config().default_patch_version)
        .trim()
        .to_string();
    paths::validate_name(app_name)?;
    paths::validate_name(patch_name)?;
    paths::validate_name(&version)?;

    let app = paths::scrub(app_name);
    let patch = paths::scrub(patch_name);
    bench.require_app(&app)?;

    let root = bench.root();
    let target = paths::patch_file(root, &app, &version, &patch);
    if target.exists() {
        return Err(BenchError::PatchExists(patch_name.to_string()));
    }

    io::ensure_package_dir(&paths::patches_dir(root, &app))?;
    io::ensure_package_dir(&paths::patch_version_dir(root, &app, &version))?;

    let publisher = bench.app_publisher(&app)?;
    let ctx = StubContext::now(&publisher);
    if !io::write_if_missing(&target, template::patch_py(&ctx).as_bytes())? {
        return Err(BenchError::PatchExists(patch_name.to_string()));
    }

    let identifier = paths::patch_identifier(&app, &version, &patch);
    let index_path = paths::patches_txt(root, &app);
    index::register(&index_path, &identifier)?;

    tracing::info!(%identifier, path = %target.display(), "patch created");
    Ok(PatchCreated {
        app,
        patch,
        version,
        identifier,
        path: target,
        index: index_path,
    })
}

// ---------------------------------------------------------------------------
// create-module
// ---------------------------------------------------------------------------

/// Create the module package, a `Module Def` on each selected site, and
/// register the module in `modules.txt`.
pub fn create_module<C: Connector>(
    bench: &Bench,
    connector: &C,
    app_name: &str,
    module_name: &str,
    site_name: &str,
) -> Result<ModuleCreated> {
    paths::validate_name(app_name)?;
    paths::validate_name(module_name)?;

    let app = paths::scrub(app_name);
    let module = module_name.trim();
    let scrubbed = paths::scrub(module_name);
    bench.require_app(&app)?;
    let sites = bench.select_sites(site_name)?;

    let root = bench.root();
    let module_dir = paths::module_dir(root, &app, &scrubbed);
    io::ensure_package_dir(&module_dir)?;

    let mut outcomes = Vec::with_capacity(sites.len());
    for site in &sites {
        let mut session = SiteSession::open(connector, site)?;
        let known = session.exists(MODULE_DEF, "module_name", module)?
            || session.exists(MODULE_DEF, "module_name", &scrubbed)?;
        if !known {
            session.insert(records::module_def(module, &app))?;
        }
        session.commit()?;
        tracing::info!(site = %site, module, inserted = !known, "module def checked");
        outcomes.push(SiteRecord {
            site: site.clone(),
            inserted: !known,
        });
    }

    let index_path = paths::modules_txt(root, &app);
    index::register(&index_path, module)?;

    Ok(ModuleCreated {
        app,
        module: module.to_string(),
        path: module_dir,
        index: index_path,
        sites: outcomes,
    })
}

// ---------------------------------------------------------------------------
// create-report
// ---------------------------------------------------------------------------

/// Register a script report on each selected site.
///
/// Boilerplate is written only when no selected site had the report before
/// this run, so controllers of an existing report are never regenerated.
pub fn create_report<C: Connector>(
    bench: &Bench,
    connector: &C,
    module_name: &str,
    reference_doctype: &str,
    report_name: &str,
    site_name: &str,
) -> Result<ReportCreated> {
    paths::validate_name(module_name)?;
    paths::validate_name(report_name)?;

    let module = module_name.trim();
    let report = report_name.trim();
    let sites = bench.select_sites(site_name)?;
    let app = bench.module_app(module)?;

    let mut existed = false;
    for site in &sites {
        let session = SiteSession::open(connector, site)?;
        if session.exists(REPORT, "report_name", report)? {
            tracing::info!(site = %site, report, "report already present, skipping boilerplate");
            existed = true;
            break;
        }
    }

    let mut outcomes = Vec::with_capacity(sites.len());
    let mut files = Vec::new();
    for site in &sites {
        let mut session = SiteSession::open(connector, site)?;
        let doc = records::script_report(report, module, reference_doctype.trim());
        let inserted = match session.insert(doc) {
            Ok(()) => true,
            Err(BenchError::DuplicateEntry { .. }) => false,
            Err(e) => return Err(e),
        };
        if !existed {
            files.extend(write_report_boilerplate(bench, &app, module, report)?);
        }
        session.commit()?;
        outcomes.push(SiteRecord {
            site: site.clone(),
            inserted,
        });
    }

    Ok(ReportCreated {
        report: report.to_string(),
        module: module.to_string(),
        app,
        existed,
        sites: outcomes,
        files,
    })
}

// ---------------------------------------------------------------------------
// create-report-files
// ---------------------------------------------------------------------------

/// Write any missing boilerplate for a report that already has a record on
/// the selected sites. Existing files are left as they are.
///
/// Sites without the record are skipped; it is an error only when none of
/// the selected sites has it.
pub fn create_report_files<C: Connector>(
    bench: &Bench,
    connector: &C,
    report_name: &str,
    site_name: &str,
) -> Result<ReportFiles> {
    paths::validate_name(report_name)?;
    let report = report_name.trim();
    let sites = bench.select_sites(site_name)?;

    let mut found = Vec::new();
    let mut files = Vec::new();
    for site in &sites {
        let session = SiteSession::open(connector, site)?;
        let Some(doc) = session.get(REPORT, report)? else {
            tracing::debug!(site = %site, report, "no report record, skipping site");
            continue;
        };
        let module = doc
            .get_str("module")
            .ok_or_else(|| BenchError::Store(format!("{REPORT} {report} has no module")))?;
        let app = bench.module_app(module)?;
        files.extend(write_report_boilerplate(bench, &app, module, report)?);
        found.push(site.clone());
    }

    if found.is_empty() {
        return Err(BenchError::RecordNotFound {
            doctype: REPORT.to_string(),
            name: report.to_string(),
        });
    }

    Ok(ReportFiles {
        report: report.to_string(),
        sites: found,
        files,
    })
}

/// Create `<module>/report/<report>/` as a python package and write the
/// report controller and script if missing. Returns the files written.
pub fn write_report_boilerplate(
    bench: &Bench,
    app: &str,
    module: &str,
    report: &str,
) -> Result<Vec<PathBuf>> {
    let root = bench.root();
    let module_dir = paths::module_dir(root, app, &paths::scrub(module));
    let name = paths::scrub(report);
    let report_dir = paths::report_dir(root, app, &paths::scrub(module), &name);

    io::ensure_package_dir(&module_dir)?;
    io::ensure_package_dir(&module_dir.join(paths::REPORT_DIR))?;
    io::ensure_package_dir(&report_dir)?;

    let publisher = bench.app_publisher(app)?;
    let ctx = StubContext::now(&publisher);
    let stubs = [
        (report_dir.join(format!("{name}.py")), template::report_py(&ctx)),
        (report_dir.join(format!("{name}.js")), template::report_js(&ctx, report)),
    ];

    let mut written = Vec::new();
    for (path, content) in stubs {
        if io::write_if_missing(&path, content.as_bytes())? {
            tracing::info!(path = %path.display(), "report boilerplate written");
            written.push(path);
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::RedbConnector;
    use chrono::{Datelike, Local};
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        bench: Bench,
        conn: RedbConnector,
    }

    fn fixture(sites: &[&str]) -> Fixture {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(paths::sites_dir(root)).unwrap();
        std::fs::write(paths::apps_txt(root), "frappe\nshop\n").unwrap();
        for site in sites {
            let site_dir = paths::site_dir(root, site);
            std::fs::create_dir_all(&site_dir).unwrap();
            std::fs::write(site_dir.join(paths::SITE_CONFIG), "{}").unwrap();
        }
        let pkg = paths::app_package(root, "shop");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join(paths::HOOKS_PY), "app_publisher = \"Acme Corp\"\n").unwrap();
        std::fs::write(pkg.join(paths::MODULES_TXT), "Shop\nSelling\n").unwrap();

        let config = Config::default();
        let conn = RedbConnector::new(paths::sites_dir(root), config.site_db_file.clone());
        let bench = Bench::with_config(root, config);
        Fixture { dir, bench, conn }
    }

    fn read(path: &std::path::Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    // -- create_patch --------------------------------------------------------

    #[test]
    fn patch_writes_stub_and_registers() {
        let f = fixture(&[]);
        let out = create_patch(&f.bench, "Shop", "Fix Totals", None).unwrap();

        assert_eq!(out.identifier, "shop.patches.v1.fix_totals");
        let content = read(&out.path);
        let year = Local::now().year();
        assert!(content.contains(&format!("# Copyright (c) {year}, Acme Corp and contributors")));
        assert_eq!(read(&out.index), "shop.patches.v1.fix_totals\n");
        assert!(paths::patches_dir(f.dir.path(), "shop").join(io::INIT_PY).is_file());
        assert!(out.path.parent().unwrap().join(io::INIT_PY).is_file());
    }

    #[test]
    fn existing_patch_is_left_alone() {
        let f = fixture(&[]);
        let out = create_patch(&f.bench, "shop", "fix_totals", Some("v2")).unwrap();
        std::fs::write(&out.path, "# hand edited\n").unwrap();

        let err = create_patch(&f.bench, "shop", "fix_totals", Some("v2")).unwrap_err();
        assert!(matches!(err, BenchError::PatchExists(_)));
        assert_eq!(read(&out.path), "# hand edited\n");
        assert_eq!(read(&out.index), "shop.patches.v2.fix_totals\n");
    }

    #[test]
    fn patch_for_unknown_app_fails_cleanly() {
        let f = fixture(&[]);
        let err = create_patch(&f.bench, "nope", "fix", None).unwrap_err();
        assert!(matches!(err, BenchError::AppNotFound(_)));
        assert!(!f.dir.path().join("apps/nope").exists());
    }

    #[test]
    fn patch_publisher_falls_back_to_config() {
        let f = fixture(&[]);
        let out = create_patch(&f.bench, "frappe", "tidy", None).unwrap();
        assert!(read(&out.path).contains(crate::config::DEFAULT_PUBLISHER));
    }

    // -- create_module -------------------------------------------------------

    #[test]
    fn module_on_all_sites() {
        let f = fixture(&["a.local", "b.local"]);
        let out = create_module(&f.bench, &f.conn, "shop", "Stock Ledger", "all").unwrap();

        assert!(out.path.ends_with("apps/shop/shop/stock_ledger"));
        assert!(out.path.join(io::INIT_PY).is_file());
        assert_eq!(out.sites.len(), 2);
        assert!(out.sites.iter().all(|s| s.inserted));
        assert_eq!(read(&out.index), "Shop\nSelling\nStock Ledger\n");

        let session = SiteSession::open(&f.conn, "b.local").unwrap();
        let doc = session.get(MODULE_DEF, "Stock Ledger").unwrap().unwrap();
        assert_eq!(doc.get_str("app_name"), Some("shop"));
    }

    #[test]
    fn module_is_idempotent() {
        let f = fixture(&["a.local"]);
        create_module(&f.bench, &f.conn, "shop", "Stock Ledger", "all").unwrap();
        let again = create_module(&f.bench, &f.conn, "shop", "Stock Ledger", "a.local").unwrap();
        assert_eq!(
            again.sites,
            vec![SiteRecord {
                site: "a.local".into(),
                inserted: false
            }]
        );
        assert_eq!(read(&again.index).matches("Stock Ledger").count(), 1);
    }

    #[test]
    fn module_matches_scrubbed_def() {
        let f = fixture(&["a.local"]);
        {
            let mut session = SiteSession::open(&f.conn, "a.local").unwrap();
            session.insert(records::module_def("stock_ledger", "shop")).unwrap();
            session.commit().unwrap();
        }
        let out = create_module(&f.bench, &f.conn, "shop", "Stock Ledger", "all").unwrap();
        assert!(!out.sites[0].inserted);
    }

    #[test]
    fn module_on_unknown_site_mutates_nothing() {
        let f = fixture(&["a.local"]);
        let err = create_module(&f.bench, &f.conn, "shop", "Stock", "c.local").unwrap_err();
        assert!(matches!(err, BenchError::SiteNotFound(_)));
        assert!(!paths::module_dir(f.dir.path(), "shop", "stock").exists());
        assert_eq!(read(&paths::modules_txt(f.dir.path(), "shop")), "Shop\nSelling\n");
        assert!(!f.conn.db_path("a.local").exists());
    }

    // -- create_report -------------------------------------------------------

    #[test]
    fn report_inserts_and_writes_boilerplate() {
        let f = fixture(&["a.local", "b.local"]);
        let out = create_report(
            &f.bench,
            &f.conn,
            "Selling",
            "Sales Invoice",
            "Sales Register",
            "all",
        )
        .unwrap();

        assert!(!out.existed);
        assert_eq!(out.app, "shop");
        assert!(out.sites.iter().all(|s| s.inserted));
        assert_eq!(out.files.len(), 2);

        let dir = paths::report_dir(f.dir.path(), "shop", "selling", "sales_register");
        assert!(dir.join(io::INIT_PY).is_file());
        assert!(dir.parent().unwrap().join(io::INIT_PY).is_file());
        assert!(read(&dir.join("sales_register.js")).contains("\"Sales Register\""));
        assert!(read(&dir.join("sales_register.py")).contains("Acme Corp"));
    }

    #[test]
    fn report_present_anywhere_suppresses_boilerplate() {
        let f = fixture(&["a.local", "b.local"]);
        {
            let mut session = SiteSession::open(&f.conn, "b.local").unwrap();
            session
                .insert(records::script_report("Sales Register", "Selling", "Sales Invoice"))
                .unwrap();
            session.commit().unwrap();
        }
        let out = create_report(
            &f.bench,
            &f.conn,
            "Selling",
            "Sales Invoice",
            "Sales Register",
            "all",
        )
        .unwrap();

        assert!(out.existed);
        assert!(out.files.is_empty());
        assert_eq!(
            out.sites,
            vec![
                SiteRecord { site: "a.local".into(), inserted: true },
                SiteRecord { site: "b.local".into(), inserted: false },
            ]
        );
        assert!(!paths::report_dir(f.dir.path(), "shop", "selling", "sales_register").exists());
    }

    #[test]
    fn report_for_unknown_module_fails_before_writing() {
        let f = fixture(&["a.local"]);
        let err = create_report(&f.bench, &f.conn, "Buying", "PO", "Open POs", "all").unwrap_err();
        assert!(matches!(err, BenchError::ModuleNotFound(_)));
        assert!(!f.conn.db_path("a.local").exists());
    }

    #[test]
    fn report_on_unknown_site_fails() {
        let f = fixture(&["a.local"]);
        let err =
            create_report(&f.bench, &f.conn, "Selling", "SI", "Sales Register", "z.local").unwrap_err();
        assert!(matches!(err, BenchError::SiteNotFound(_)));
        assert!(!paths::module_dir(f.dir.path(), "shop", "selling").exists());
        assert!(!f.conn.db_path("a.local").exists());
    }

    #[test]
    fn report_accepts_free_form_names() {
        let f = fixture(&["a.local"]);
        for name in ["Sales Register (Detailed)", "Relatório de Vendas", "P&L Statement"] {
            let out =
                create_report(&f.bench, &f.conn, "Selling", "Sales Invoice v2.0", name, "all").unwrap();
            assert!(out.sites[0].inserted, "expected insert for {name}");
        }
        let dir = paths::report_dir(f.dir.path(), "shop", "selling", "relatório_de_vendas");
        assert!(dir.join("relatório_de_vendas.js").is_file());
    }

    #[test]
    fn hyphenated_site_is_found_as_written() {
        let f = fixture(&["erp-demo.local"]);
        let out = create_module(&f.bench, &f.conn, "shop", "Stock", "erp-demo.local").unwrap();
        assert_eq!(out.sites[0].site, "erp-demo.local");
        assert!(out.sites[0].inserted);

        let out = create_report(&f.bench, &f.conn, "Selling", "SI", "Stock Ageing", "erp-demo.local")
            .unwrap();
        assert_eq!(out.sites[0].site, "erp-demo.local");
    }

    // -- create_report_files -------------------------------------------------

    #[test]
    fn report_files_restore_missing_stubs_only() {
        let f = fixture(&["a.local"]);
        create_report(&f.bench, &f.conn, "Selling", "SI", "Sales Register", "all").unwrap();
        let dir = paths::report_dir(f.dir.path(), "shop", "selling", "sales_register");
        std::fs::write(dir.join("sales_register.py"), "# edited\n").unwrap();
        std::fs::remove_file(dir.join("sales_register.js")).unwrap();

        let out = create_report_files(&f.bench, &f.conn, "Sales Register", "a.local").unwrap();
        assert_eq!(out.files, vec![dir.join("sales_register.js")]);
        assert_eq!(read(&dir.join("sales_register.py")), "# edited\n");
    }

    #[test]
    fn report_files_skip_sites_without_the_record() {
        let f = fixture(&["a.local", "b.local"]);
        {
            let mut session = SiteSession::open(&f.conn, "b.local").unwrap();
            session
                .insert(records::script_report("Stock Ageing", "Selling", "Item"))
                .unwrap();
            session.commit().unwrap();
        }

        let out = create_report_files(&f.bench, &f.conn, "Stock Ageing", "all").unwrap();
        assert_eq!(out.sites, vec!["b.local".to_string()]);
        assert_eq!(out.files.len(), 2);

        let err = create_report_files(&f.bench, &f.conn, "Stock Ageing", "a.local").unwrap_err();
        assert!(matches!(err, BenchError::RecordNotFound { .. }));
    }

    #[test]
    fn report_files_need_a_record() {
        let f = fixture(&["a.local"]);
        let err = create_report_files(&f.bench, &f.conn, "Missing", "all").unwrap_err();
        assert!(matches!(err, BenchError::RecordNotFound { .. }));
    }
}
