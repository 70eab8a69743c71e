use crate::date_format::{format_exif_date, format_video_date};
use crate::extractor::{DateExtractor, ExifExtractor, HeicExtractor, RawDate, VideoExtractor};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaKind {
    Still,
    Heic,
    Video,
}

const ROUTES: &[(&str, MediaKind)] = &[
    ("jpg", MediaKind::Still),
    ("jpeg", MediaKind::Still),
    ("tiff", MediaKind::Still),
    ("raw", MediaKind::Still),
    ("heic", MediaKind::Heic),
    ("m4v", MediaKind::Video),
    ("mov", MediaKind::Video),
    ("mp4", MediaKind::Video),
];

impl MediaKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = lowercase_extension(path)?;
        ROUTES
            .iter()
            .find(|(route, _)| *route == ext)
            .map(|(_, kind)| *kind)
    }

    fn extractor(self) -> &'static dyn DateExtractor {
        match self {
            MediaKind::Still => &ExifExtractor,
            MediaKind::Heic => &HeicExtractor,
            MediaKind::Video => &VideoExtractor,
        }
    }
}

pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
    ROUTES.iter().map(|(ext, _)| *ext)
}

pub(crate) fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|v| v.to_str())
        .map(str::to_ascii_lowercase)
}

/// 拡張子で抽出器を選び、`YYYYMMDDHHMMSS` のトークンを返す。
///
/// 対象外の拡張子はファイルに触れずに `Ok(None)`。
pub fn creation_token(path: &Path) -> Result<Option<String>> {
    let Some(kind) = MediaKind::from_path(path) else {
        return Ok(None);
    };

    let raw = kind.extractor().extract(path)?;
    Ok(raw.and_then(normalize))
}

fn normalize(raw: RawDate) -> Option<String> {
    match raw {
        RawDate::Text(value) => format_exif_date(&value),
        RawDate::Timestamp(created) => format_video_date(created),
    }
}
