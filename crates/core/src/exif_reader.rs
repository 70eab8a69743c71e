use anyhow::{Context, Result};
use exif::{Exif, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// kamadak-exif がコンテナ判定に失敗したときの `InvalidFormat` メッセージ
const UNKNOWN_CONTAINER: &str = "Unknown image format";

/// ファイル内のEXIFから `DateTimeOriginal` の生文字列を読む。
///
/// JPEG / TIFF / HEIF (Exifアイテム) を `read_from_container` に任せる。
/// EXIFブロックが無い場合と、コンテナ形式を判別できない場合 (独自RAWなど) は `Ok(None)`。
/// 壊れたEXIFはエラーとして返す。
pub fn read_date_time_original(path: &Path) -> Result<Option<String>> {
    let file = File::open(path)
        .with_context(|| format!("EXIF読み込み対象を開けませんでした: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    let exif = match Reader::new().read_from_container(&mut buf) {
        Err(exif::Error::NotFound(_)) => return Ok(None),
        Err(exif::Error::InvalidFormat(msg)) if msg == UNKNOWN_CONTAINER => {
            debug!("EXIFを持てない形式のためスキップします: {}", path.display());
            return Ok(None);
        }
        other => other
            .with_context(|| format!("EXIFを解析できませんでした: {}", path.display()))?,
    };

    Ok(find_date_time_original(&exif))
}

/// TIFFヘッダから始まるEXIFペイロードを直接解析する。
#[cfg(test)]
pub fn read_date_time_original_from_tiff(data: Vec<u8>) -> Result<Option<String>> {
    let exif = match Reader::new().read_raw(data) {
        Err(exif::Error::NotFound(_)) => return Ok(None),
        other => other.context("埋め込みEXIFを解析できませんでした")?,
    };

    Ok(find_date_time_original(&exif))
}

fn find_date_time_original(exif: &Exif) -> Option<String> {
    let field = exif
        .fields()
        .find(|field| field.tag == Tag::DateTimeOriginal)?;

    let raw = match &field.value {
        Value::Ascii(parts) => parts
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).to_string()),
        _ => Some(field.display_value().to_string()),
    };

    raw.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
