use anyhow::Result;
use clap::{Parser, ValueEnum};
use media_renamer_core::{rename_directory, RenameOptions, RenameReport};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "media-renamer")]
#[command(about = "写真・動画を撮影日時 (YYYYMMDDHHMMSS) のファイル名に一括リネームします")]
struct Cli {
    /// 対象フォルダ (サブフォルダは走査しません)
    directory: PathBuf,
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let options = RenameOptions {
        dry_run: cli.dry_run,
    };
    let report = rename_directory(&cli.directory, &options)?;

    match cli.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            print_table(&report);
        }
    }

    if cli.dry_run {
        eprintln!("dry-runモード: 実ファイルは変更していません。");
    }
    if report.stats.failed > 0 {
        anyhow::bail!("{}件のファイルを処理できませんでした", report.stats.failed);
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("ログの初期化に失敗しました: {err}"))
}

fn print_table(report: &RenameReport) {
    for (original, target) in report.renamed() {
        println!("{} → {}", file_name(original), file_name(target));
    }
    for (path, error) in report.failures() {
        eprintln!("失敗: {} ({})", file_name(path), error);
    }

    let stats = &report.stats;
    println!(
        "\n集計: scanned={} supported={} unsupported_skip={} no_date_skip={} renamed={} unchanged={} failed={}",
        stats.scanned_files,
        stats.supported_files,
        stats.skipped_unsupported,
        stats.skipped_no_date,
        stats.renamed,
        stats.unchanged,
        stats.failed
    );
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
