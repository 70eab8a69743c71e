use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use mp4::{BoxHeader, BoxType, MoovBox, ReadBox};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::debug;

/// mvhd の creation_time を読み、1904-01-01 起点の日時に直す。
///
/// 古いQuickTimeには `ftyp` が無いものがあるため、`Mp4Reader::read_header` ではなく
/// トップレベルのボックスを順に見て `moov` だけを読む。
/// コンテナとして解析できない場合や creation_time が 0 の場合は `Ok(None)`。
pub fn read_creation_date(path: &Path) -> Result<Option<NaiveDateTime>> {
    let file = File::open(path)
        .with_context(|| format!("動画ファイルを開けませんでした: {}", path.display()))?;
    let size = file
        .metadata()
        .with_context(|| format!("動画ファイルのサイズを取得できませんでした: {}", path.display()))?
        .len();
    let mut reader = BufReader::new(file);

    match read_mvhd_creation_time(&mut reader, size) {
        Ok(Some(seconds)) => Ok(from_mp4_time(seconds)),
        Ok(None) => {
            debug!("moovが見つからないためスキップします: {}", path.display());
            Ok(None)
        }
        Err(err) => {
            debug!("コンテナを解析できないためスキップします: {} ({err})", path.display());
            Ok(None)
        }
    }
}

fn read_mvhd_creation_time<R: Read + Seek>(
    reader: &mut R,
    size: u64,
) -> mp4::Result<Option<u64>> {
    let mut current = reader.stream_position()?;
    while current < size {
        let header = BoxHeader::read(reader)?;
        if header.size == 0 || header.size > size {
            break;
        }

        match header.name {
            BoxType::MoovBox => {
                let moov = MoovBox::read_box(reader, header.size)?;
                return Ok(Some(moov.mvhd.creation_time));
            }
            _ => mp4::skip_box(reader, header.size)?,
        }
        current = reader.stream_position()?;
    }
    Ok(None)
}

fn from_mp4_time(seconds: u64) -> Option<NaiveDateTime> {
    if seconds == 0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1904, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let seconds = i64::try_from(seconds).ok()?;
    epoch.checked_add_signed(Duration::try_seconds(seconds)?)
}
