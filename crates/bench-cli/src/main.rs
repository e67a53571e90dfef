mod cmd;
mod output;
mod root;

use bench_core::bench::ALL_SITES;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bench-manager",
    about = "Scaffold patches, modules and script reports into a bench",
    version,
    propagate_version = true
)]
struct Cli {
    /// Bench root (default: auto-detect from sites/apps.txt)
    #[arg(long, global = true, env = "BENCH_PATH")]
    bench_path: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Creates a boilerplate for a patch ready to run
    CreatePatch {
        /// Name of the app where the patch is going to be placed
        #[arg(long)]
        app_name: String,
        /// Name of the patch `my_patch_name`
        #[arg(long)]
        patch_name: String,
        /// Version of the patch (default: `default_patch_version` from config, else `v1`)
        #[arg(long)]
        patch_version: Option<String>,
    },

    /// Creates an empty module ready to use
    CreateModule {
        /// Name of the app where the module is going to be placed
        #[arg(long)]
        app_name: String,
        /// Name of the module `my_module`
        #[arg(long)]
        module_name: String,
        /// Site where the module is going to be registered
        #[arg(long, default_value = ALL_SITES)]
        site_name: String,
    },

    /// Registers a script report and writes its boilerplate
    CreateReport {
        /// Module where the report is going to be placed
        #[arg(long)]
        module_name: String,
        /// Doctype the report is going to show from
        #[arg(long)]
        reference_doctype: String,
        /// Name of the report, e.g. `Sales Register`
        #[arg(long)]
        report_name: String,
        /// Site where the record is going to be saved
        #[arg(long, default_value = ALL_SITES)]
        site_name: String,
    },

    /// Writes missing boilerplate for an existing report
    CreateReportFiles {
        /// Name of the report, e.g. `Sales Register`
        #[arg(long)]
        report_name: String,
        /// Site where the record is going to be fetched from
        #[arg(long, default_value = ALL_SITES)]
        site_name: String,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.bench_path.as_deref());
    tracing::debug!(root = %root.display(), "bench root");

    let result = match cli.command {
        Commands::CreatePatch {
            app_name,
            patch_name,
            patch_version,
        } => cmd::patch::run(
            &root,
            &app_name,
            &patch_name,
            patch_version.as_deref(),
            cli.json,
        ),
        Commands::CreateModule {
            app_name,
            module_name,
            site_name,
        } => cmd::module::run(&root, &app_name, &module_name, &site_name, cli.json),
        Commands::CreateReport {
            module_name,
            reference_doctype,
            report_name,
            site_name,
        } => cmd::report::create(
            &root,
            &module_name,
            &reference_doctype,
            &report_name,
            &site_name,
            cli.json,
        ),
        Commands::CreateReportFiles {
            report_name,
            site_name,
        } => cmd::report::files(&root, &report_name, &site_name, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
