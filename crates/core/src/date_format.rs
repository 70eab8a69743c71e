use chrono::{Duration, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

/// 動画コンテナの作成日時に加算する時間数
pub const VIDEO_HOUR_SHIFT: i64 = 3;

static EXIF_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):(\d+):(\d+) (\d+):(\d+):(\d+)").expect("EXIF date pattern must compile")
});

/// `"YYYY:MM:DD HH:MM:SS"` 形式の文字列を `YYYYMMDDHHMMSS` に詰める。
///
/// 桁数や値の範囲は検証しない。先頭が形式に一致しなければ `None`。
pub fn format_exif_date(input: &str) -> Option<String> {
    let caps = EXIF_DATE_RE.captures(input)?;
    let mut out = String::with_capacity(14);
    for index in 1..=6 {
        out.push_str(caps.get(index)?.as_str());
    }
    Some(out)
}

pub fn format_video_date(created: NaiveDateTime) -> Option<String> {
    let shifted = created.checked_add_signed(Duration::hours(VIDEO_HOUR_SHIFT))?;
    Some(shifted.format("%Y%m%d%H%M%S").to_string())
}
