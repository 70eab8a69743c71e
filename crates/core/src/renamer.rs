use crate::dispatcher::{creation_token, lowercase_extension, MediaKind};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct RenameOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenameOutcome {
    Renamed {
        original_path: PathBuf,
        target_path: PathBuf,
    },
    Unchanged {
        path: PathBuf,
    },
    NoDate {
        path: PathBuf,
    },
    Failed {
        path: PathBuf,
        error: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RenameStats {
    pub scanned_files: usize,
    pub supported_files: usize,
    pub skipped_unsupported: usize,
    pub skipped_no_date: usize,
    pub renamed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameReport {
    pub directory: PathBuf,
    pub dry_run: bool,
    pub outcomes: Vec<RenameOutcome>,
    pub stats: RenameStats,
}

impl RenameReport {
    pub fn renamed(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            RenameOutcome::Renamed {
                original_path,
                target_path,
            } => Some((original_path.as_path(), target_path.as_path())),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            RenameOutcome::Failed { path, error } => Some((path.as_path(), error.as_str())),
            _ => None,
        })
    }
}

/// 最終ファイル名 -> 名前を確保した元ファイル。1回の走査の間だけ保持する。
type ExistingNames = HashMap<String, PathBuf>;

/// フォルダ直下の写真・動画を撮影日時のファイル名にリネームする。
///
/// 走査順はOSの列挙順のまま。1ファイルの失敗は `Failed` として記録し、残りの処理を続ける。
pub fn rename_directory(directory: &Path, options: &RenameOptions) -> Result<RenameReport> {
    if !directory.is_dir() {
        bail!("対象フォルダが存在しません: {}", directory.display());
    }

    let mut stats = RenameStats::default();
    let mut outcomes = Vec::new();
    let mut existing_names = ExistingNames::new();

    // リネーム中の read_dir は変更後のエントリを再び返しうるので、先に一覧を確定させる
    for path in collect_files(directory, &mut stats)? {
        let Some(extension) = supported_extension(&path) else {
            stats.skipped_unsupported += 1;
            continue;
        };
        stats.supported_files += 1;

        let outcome = process_file(path, &extension, &mut existing_names, options);
        match &outcome {
            RenameOutcome::Renamed { .. } => stats.renamed += 1,
            RenameOutcome::Unchanged { .. } => stats.unchanged += 1,
            RenameOutcome::NoDate { .. } => stats.skipped_no_date += 1,
            RenameOutcome::Failed { .. } => stats.failed += 1,
        }
        outcomes.push(outcome);
    }

    Ok(RenameReport {
        directory: directory.to_path_buf(),
        dry_run: options.dry_run,
        outcomes,
        stats,
    })
}

/// 直下の通常ファイルを列挙順のまま集める。
fn collect_files(directory: &Path, stats: &mut RenameStats) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(directory)
        .with_context(|| format!("フォルダを読めませんでした: {}", directory.display()))?
    {
        let entry =
            entry.with_context(|| format!("エントリ読み取り失敗: {}", directory.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        stats.scanned_files += 1;
        out.push(path);
    }
    Ok(out)
}

fn supported_extension(path: &Path) -> Option<String> {
    MediaKind::from_path(path)?;
    lowercase_extension(path)
}

fn process_file(
    path: PathBuf,
    extension: &str,
    existing_names: &mut ExistingNames,
    options: &RenameOptions,
) -> RenameOutcome {
    let token = match creation_token(&path) {
        Ok(Some(token)) => token,
        Ok(None) => {
            debug!("撮影日時が見つからないためスキップします: {}", path.display());
            return RenameOutcome::NoDate { path };
        }
        Err(err) => {
            warn!("メタデータを読めませんでした: {err:#}");
            return RenameOutcome::Failed {
                path,
                error: format!("{err:#}"),
            };
        }
    };

    let final_name = claim_name(&token, extension, &path, existing_names);
    let target = path.with_file_name(&final_name);
    if target == path {
        debug!("既に撮影日時のファイル名です: {}", path.display());
        return RenameOutcome::Unchanged { path };
    }

    if !options.dry_run {
        if let Err(err) = fs::rename(&path, &target).with_context(|| {
            format!(
                "リネームに失敗しました: {} -> {}",
                path.display(),
                target.display()
            )
        }) {
            warn!("{err:#}");
            return RenameOutcome::Failed {
                path,
                error: format!("{err:#}"),
            };
        }
    }

    info!("{} → {}", display_name(&path), final_name);
    RenameOutcome::Renamed {
        original_path: path,
        target_path: target,
    }
}

/// `token.ext` が使えなければ `token_1.ext`, `token_2.ext`, ... と空きを探して確保する。
fn claim_name(
    token: &str,
    extension: &str,
    original_path: &Path,
    existing_names: &mut ExistingNames,
) -> String {
    let mut candidate = format!("{}.{}", token, extension);
    let mut counter = 1usize;
    while !is_available(&candidate, original_path, existing_names) {
        candidate = format!("{}_{}.{}", token, counter, extension);
        counter += 1;
    }

    existing_names.insert(candidate.clone(), original_path.to_path_buf());
    candidate
}

fn is_available(name: &str, original_path: &Path, existing_names: &ExistingNames) -> bool {
    if existing_names.contains_key(name) {
        return false;
    }
    let candidate = original_path.with_file_name(name);
    if candidate == original_path {
        return true;
    }
    // 壊れたシンボリックリンクも上書きしない
    fs::symlink_metadata(&candidate).is_err()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
