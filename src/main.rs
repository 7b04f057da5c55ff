use android_l10n::changes::{ChangeTracker, GitDiffTracker, StaticChangeTracker};
use android_l10n::export::{ExportSink, ExportTable};
use android_l10n::resources::ResourceDir;
use android_l10n::{Config, Language, RunOptions, TranslationRun};
use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn language(code: &str) -> Result<Language, String> {
    Language::lookup(code).ok_or_else(|| format!("Unknown language code '{}'", code))
}

/// `RUST_LOG` when it is set and parses, else `debug` with `--verbose` or `info`.
fn log_filter(rust_log: Option<String>, verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("android-l10n")
        .version("0.1.0")
        .about("Translate Android string resources with machine translation")
        .arg(
            Arg::new("res-dir")
                .help("Android res directory containing values/")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .short('f')
                .help("Values file to translate")
                .default_value(ResourceDir::DEFAULT_FILE_NAME),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .short('s')
                .help("Resource code of the source language (default: en)")
                .default_value("en"),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .short('t')
                .help("Target language resource code, repeatable (e.g. fr, zh-rCN)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("provider")
                .long("provider")
                .short('p')
                .help("Provider key: google, google-api, deepl or mock (default: L10N_PROVIDER or google)"),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .help("Retranslate entries that already have a translation")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-cache")
                .long("no-cache")
                .help("Disable the translation cache")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("interval-ms")
                .long("interval-ms")
                .help("Pause after every provider call, in milliseconds")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("export-dir")
                .long("export-dir")
                .help("Directory for the CSV export report")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("changed")
                .long("changed")
                .help("Comma separated entry names to retranslate (default: read from git diff)")
                .value_delimiter(','),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log every provider call")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            std::env::var("RUST_LOG").ok(),
            matches.get_flag("verbose"),
        ))
        .init();

    let mut config = Config::from_env();
    if let Some(provider) = matches.get_one::<String>("provider") {
        config.selected_provider = provider.clone();
    }
    if matches.get_flag("overwrite") {
        config.overwrite_existing = true;
    }
    if matches.get_flag("no-cache") {
        config.cache_enabled = false;
    }
    if let Some(ms) = matches.get_one::<u64>("interval-ms") {
        config.translation_interval = Duration::from_millis(*ms);
    }
    if let Some(dir) = matches.get_one::<PathBuf>("export-dir") {
        config.export_dir = Some(dir.clone());
    }

    let res_dir = matches
        .get_one::<PathBuf>("res-dir")
        .ok_or("RES_DIR is required")?;
    let file = matches
        .get_one::<String>("file")
        .map(String::as_str)
        .unwrap_or(ResourceDir::DEFAULT_FILE_NAME);
    let source = language(
        matches
            .get_one::<String>("source")
            .map(String::as_str)
            .unwrap_or("en"),
    )?;
    let targets = matches
        .get_many::<String>("target")
        .unwrap_or_default()
        .map(|code| language(code))
        .collect::<Result<Vec<_>, _>>()?;

    let store = Arc::new(ResourceDir::new(res_dir).with_file_name(file));
    let tracker: Arc<dyn ChangeTracker> = match matches.get_many::<String>("changed") {
        Some(names) => Arc::new(StaticChangeTracker::new(names.cloned().collect())),
        None => Arc::new(GitDiffTracker::new(store.source_path())),
    };
    let export: Box<dyn ExportSink> = match &config.export_dir {
        Some(dir) => Box::new(ExportTable::with_output_dir(dir)),
        None => Box::new(ExportTable::new()),
    };

    let options = RunOptions {
        source_language: source,
        targets,
        overwrite_existing: config.overwrite_existing,
    };
    let orchestrator = Arc::new(config.build_orchestrator()?);
    let handle = TranslationRun::new(orchestrator, store, tracker, export, options).spawn();

    let cancel = handle.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current call");
            cancel.cancel();
        }
    });

    let report = handle.wait().await?;

    for language in &report.languages {
        match (&language.written_to, &language.write_error) {
            (_, Some(error)) => println!("❌ {}: {}", language.language, error),
            (Some(path), None) => println!(
                "✅ {}: {} translated, {} kept → {}",
                language.language,
                language.retranslated,
                language.reused,
                path.display()
            ),
            (None, None) => println!("➖ {}: nothing to write", language.language),
        }
    }
    if let Some(path) = &report.export_path {
        println!("📄 Export: {}", path.display());
    }
    if report.cancelled {
        println!("⚠️  Cancelled");
    }

    Ok(())
}
