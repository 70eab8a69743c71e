mod date_format;
mod dispatcher;
mod exif_reader;
mod extractor;
mod renamer;
mod video_reader;

#[cfg(test)]
mod test_support;

pub use date_format::{format_exif_date, format_video_date, VIDEO_HOUR_SHIFT};
pub use dispatcher::{creation_token, supported_extensions, MediaKind};
pub use extractor::{DateExtractor, ExifExtractor, HeicExtractor, RawDate, VideoExtractor};
pub use renamer::{rename_directory, RenameOptions, RenameOutcome, RenameReport, RenameStats};
