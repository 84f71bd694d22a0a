//! xcbundle CLI
//!
//! Entry point for the `xcbundle` command-line tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use xcbundle::{
    ConsoleReporter, Manifest, Pipeline, PipelineConfig, Reporter, XcodebuildRunner,
    DEFAULT_MANIFEST_PATH,
};

#[derive(Parser)]
#[command(name = "xcbundle")]
#[command(about = "Manifest-driven XCFramework builder", version)]
struct Cli {
    /// Disable ANSI colors in output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Archive every target and merge the archives into an XCFramework
    Run {
        /// Path to the build manifest (default: xcbundle.toml)
        #[arg(long, short = 'm')]
        manifest: Option<PathBuf>,

        /// Number of targets to archive in parallel
        #[arg(long, short = 'j', default_value_t = 1)]
        jobs: usize,
    },

    /// Validate the manifest and print a summary
    Check {
        /// Path to the build manifest (default: xcbundle.toml)
        #[arg(long, short = 'm')]
        manifest: Option<PathBuf>,
    },

    /// Write a starter manifest
    Init {
        /// Write a JSON manifest instead of TOML
        #[arg(long)]
        json: bool,

        /// Overwrite an existing manifest
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let reporter = ConsoleReporter::new(!cli.no_color);

    match cli.command {
        Commands::Run { manifest, jobs } => {
            run_build(manifest, jobs, &reporter);
        }
        Commands::Check { manifest } => {
            run_check(manifest);
        }
        Commands::Init { json, force } => {
            run_init(json, force, &reporter);
        }
    }
}

fn run_build(manifest: Option<PathBuf>, jobs: usize, reporter: &ConsoleReporter) {
    let config = PipelineConfig {
        manifest_path: manifest.unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_PATH)),
        jobs: jobs.max(1),
    };
    let runner = XcodebuildRunner;
    let mut pipeline = Pipeline::new(config, &runner, reporter);

    match pipeline.run() {
        Ok(bundle) => {
            reporter.info(&format!("Done: {}", bundle.display()));
        }
        Err(e) => {
            reporter.error(&format!("Error: {}", e));
            process::exit(1);
        }
    }
}

fn run_check(manifest_path: Option<PathBuf>) {
    let path = manifest_path.unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_PATH));

    match Manifest::from_file(&path) {
        Ok(manifest) => {
            println!("Manifest valid: {}", path.display());
            println!();
            println!("  Output path: {}", manifest.output_path);
            println!("  Framework: {}", manifest.framework);
            println!("  Targets: {}", manifest.targets.len());
            for (index, target) in manifest.targets.iter().enumerate() {
                println!("    {}. {}", index + 1, target.describe());
                if target.source().is_none() {
                    println!(
                        "       warning: no workspace or project reference; \
                         this target will be skipped"
                    );
                }
            }
        }
        Err(e) => {
            eprintln!("Manifest error: {}", e);
            process::exit(1);
        }
    }
}

const TOML_TEMPLATE: &str = r#"output_path = "frameworks"
framework = "MyLib"

[[targets]]
sdk = "iOS"
workspace = "MyLib.xcworkspace"
scheme = "MyLib"

[[targets]]
sdk = "iOSSimulator"
workspace = "MyLib.xcworkspace"
scheme = "MyLib"
"#;

const JSON_TEMPLATE: &str = r#"{
  "output_path": "frameworks",
  "framework": "MyLib",
  "targets": [
    { "sdk": "iOS", "workspace": "MyLib.xcworkspace", "scheme": "MyLib" },
    { "sdk": "iOSSimulator", "workspace": "MyLib.xcworkspace", "scheme": "MyLib" }
  ]
}
"#;

fn run_init(json: bool, force: bool, reporter: &ConsoleReporter) {
    let (path, template) = if json {
        (PathBuf::from("xcbundle.json"), JSON_TEMPLATE)
    } else {
        (PathBuf::from(DEFAULT_MANIFEST_PATH), TOML_TEMPLATE)
    };

    if path.exists() && !force {
        reporter.error(&format!(
            "Refusing to overwrite {} (use --force to replace it)",
            path.display()
        ));
        process::exit(1);
    }

    if let Err(e) = std::fs::write(&path, template) {
        reporter.error(&format!("Failed to write {}: {}", path.display(), e));
        process::exit(1);
    }

    reporter.info(&format!("Wrote starter manifest: {}", path.display()));
}
