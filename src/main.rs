use anyhow::{bail, Context};
use clap::Parser;
use protomock::adapters::catalog::{EntryKind, SchemaCatalog};
use protomock::adapters::mock_synth::MockSynthesizer;
use protomock::adapters::schema_loader::{
    expand_schema_paths, load_schema_files, DescriptorFileSource, LoadReport,
};
use protomock::cli::{Cli, Command, ListArgs, MockArgs};
use protomock::config::{watcher::SchemaWatcher, Settings};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::new_with_cli(&cli)?;

    // Logs go to stderr so stdout only carries payloads
    tracing_subscriber::fmt()
        .with_max_level(settings.log_level())
        .with_writer(std::io::stderr)
        .init();

    let paths = expand_schema_paths(&settings.schemas.paths)?;
    if paths.is_empty() {
        bail!("No schema files given. Pass them on the command line or set schemas.paths in the config file.");
    }

    let mut catalog = SchemaCatalog::new();
    let report = load_schema_files(&mut catalog, &DescriptorFileSource, &paths).await;
    check_report(&report)?;

    match &cli.command {
        Command::List(args) => list(&catalog, args),
        Command::Mock(args) => {
            print_mock(&catalog, args, settings.output.pretty)?;
            if args.watch {
                watch(&mut catalog, args, &paths, settings.output.pretty).await?;
            }
            Ok(())
        }
    }
}

fn check_report(report: &LoadReport) -> anyhow::Result<()> {
    for (path, e) in &report.failed {
        error!("{}: {}", path.display(), e);
    }
    if report.loaded.is_empty() {
        bail!("None of the {} schema file(s) could be loaded", report.failed.len());
    }
    info!(
        loaded = report.loaded.len(),
        failed = report.failed.len(),
        "schema files loaded"
    );
    Ok(())
}

fn list(catalog: &SchemaCatalog, args: &ListArgs) -> anyhow::Result<()> {
    let entries = catalog.entries();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut current_file: Option<&str> = None;
    for entry in &entries {
        if current_file != Some(entry.filepath.as_str()) {
            println!("{}", entry.filepath);
            current_file = Some(entry.filepath.as_str());
        }
        let kind = match entry.kind {
            EntryKind::Message => "message",
            EntryKind::Enum => "enum",
        };
        println!("  {:<8} {}", kind, entry.qualified_name());
    }
    Ok(())
}

fn print_mock(catalog: &SchemaCatalog, args: &MockArgs, pretty: bool) -> anyhow::Result<()> {
    let (package, name) = args.target();
    let record = MockSynthesizer::new(catalog)
        .synthesize_selected(args.file.as_deref(), &package, &name)
        .with_context(|| format!("Cannot synthesize {}", args.message))?;

    let json = if pretty {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    println!("{}", json);
    Ok(())
}

async fn watch(
    catalog: &mut SchemaCatalog,
    args: &MockArgs,
    paths: &[PathBuf],
    pretty: bool,
) -> anyhow::Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let _watcher = SchemaWatcher::new(paths, move || {
        let _ = tx.send(());
    })?;

    while rx.recv().await.is_some() {
        catalog.clear();
        let report = load_schema_files(catalog, &DescriptorFileSource, paths).await;
        for (path, e) in &report.failed {
            warn!("{}: {}", path.display(), e);
        }
        if let Err(e) = print_mock(catalog, args, pretty) {
            error!("{:#}", e);
        }
    }
    Ok(())
}
