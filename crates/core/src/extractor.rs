use crate::exif_reader::read_date_time_original;
use crate::video_reader::read_creation_date;
use anyhow::Result;
use chrono::NaiveDateTime;
use std::path::Path;

/// 抽出器が返す整形前の日時。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDate {
    /// EXIF `DateTimeOriginal` の文字列 (`YYYY:MM:DD HH:MM:SS`)
    Text(String),
    /// コンテナに記録された作成日時
    Timestamp(NaiveDateTime),
}

pub trait DateExtractor {
    fn extract(&self, path: &Path) -> Result<Option<RawDate>>;
}

/// JPEG / TIFF / RAW
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifExtractor;

/// HEIF の `meta` から Exif アイテムを取り出し、JPEGと同じ `DateTimeOriginal` 走査にかける
#[derive(Debug, Clone, Copy, Default)]
pub struct HeicExtractor;

/// MP4 / MOV / M4V
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoExtractor;

impl DateExtractor for ExifExtractor {
    fn extract(&self, path: &Path) -> Result<Option<RawDate>> {
        Ok(read_date_time_original(path)?.map(RawDate::Text))
    }
}

impl DateExtractor for HeicExtractor {
    fn extract(&self, path: &Path) -> Result<Option<RawDate>> {
        // Exifアイテムの特定とヘッダ除去は kamadak-exif の HEIF 対応に任せる
        Ok(read_date_time_original(path)?.map(RawDate::Text))
    }
}

impl DateExtractor for VideoExtractor {
    fn extract(&self, path: &Path) -> Result<Option<RawDate>> {
        Ok(read_creation_date(path)?.map(RawDate::Timestamp))
    }
}
