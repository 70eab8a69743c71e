use chrono::{NaiveDate, NaiveDateTime};
use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use std::io::Cursor;

pub fn tiff_with_tags(fields: &[&Field]) -> Vec<u8> {
    let mut writer = Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false).expect("exif must be writable");
    buf.into_inner()
}

pub fn tiff_with_date_time_original(value: &str) -> Vec<u8> {
    let field = Field {
        tag: Tag::DateTimeOriginal,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![value.as_bytes().to_vec()]),
    };
    tiff_with_tags(&[&field])
}

/// SOI + APP1(Exif) + EOI だけの最小JPEG。
pub fn jpeg_with_exif(tiff: &[u8]) -> Vec<u8> {
    let segment_len = u16::try_from(2 + 6 + tiff.len()).expect("exif segment too large");
    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    out.extend(segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend([0xFF, 0xD9]);
    out
}

/// HEIF Exifアイテムの形式 (TIFFヘッダまでのオフセット + `Exif\0\0` + TIFF)。
pub fn heif_exif_item(tiff: &[u8]) -> Vec<u8> {
    let mut out = 6u32.to_be_bytes().to_vec();
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out
}

pub fn isobmff_box(kind: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let size = u32::try_from(8 + body.len()).expect("box too large");
    let mut out = size.to_be_bytes().to_vec();
    out.extend_from_slice(kind);
    out.extend_from_slice(body);
    out
}

/// ftyp + meta(iinf, iloc) + mdat で構成したHEIF。各アイテムはmdat内の1エクステント。
pub fn heif_with_items(items: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
    let mut brands = b"heic".to_vec();
    brands.extend([0u8; 4]);
    brands.extend_from_slice(b"mif1heic");
    let ftyp = isobmff_box(b"ftyp", &brands);

    let build_meta = |data_start: usize| {
        let count = u16::try_from(items.len()).expect("too many items");
        let mut iinf = vec![0, 0, 0, 0];
        iinf.extend(count.to_be_bytes());
        let mut iloc = vec![0, 0, 0, 0, 0x44, 0x00];
        iloc.extend(count.to_be_bytes());

        let mut offset = data_start;
        for (index, (item_type, data)) in items.iter().enumerate() {
            let item_id = u16::try_from(index + 1).expect("item id");
            let mut infe = vec![2, 0, 0, 0];
            infe.extend(item_id.to_be_bytes());
            infe.extend(0u16.to_be_bytes());
            infe.extend_from_slice(item_type.as_slice());
            infe.push(0);
            iinf.extend(isobmff_box(b"infe", &infe));

            iloc.extend(item_id.to_be_bytes());
            iloc.extend(0u16.to_be_bytes());
            iloc.extend(1u16.to_be_bytes());
            iloc.extend(u32::try_from(offset).expect("offset").to_be_bytes());
            iloc.extend(u32::try_from(data.len()).expect("length").to_be_bytes());
            offset += data.len();
        }

        let mut meta = vec![0, 0, 0, 0];
        meta.extend(isobmff_box(b"iinf", &iinf));
        meta.extend(isobmff_box(b"iloc", &iloc));
        isobmff_box(b"meta", &meta)
    };

    let meta_len = build_meta(0).len();
    let meta = build_meta(ftyp.len() + meta_len + 8);
    let mdat: Vec<u8> = items
        .iter()
        .flat_map(|(_, data)| data.iter().copied())
        .collect();

    [ftyp, meta, isobmff_box(b"mdat", &mdat)].concat()
}

pub fn mp4_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1904, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid epoch")
}

/// ftyp + moov(mvhd v0) だけの最小コンテナ。`None` なら creation_time = 0。
pub fn mp4_with_creation_date(created: Option<NaiveDateTime>) -> Vec<u8> {
    let mut brands = b"qt  ".to_vec();
    brands.extend([0u8, 0, 2, 0]);
    brands.extend_from_slice(b"qt  ");
    let ftyp = isobmff_box(b"ftyp", &brands);
    [ftyp, moov_with_creation_date(created)].concat()
}

/// ftyp を持たない旧QuickTime形式 (wide + mdat + moov)。
pub fn mov_without_ftyp(created: NaiveDateTime) -> Vec<u8> {
    [
        isobmff_box(b"wide", &[]),
        isobmff_box(b"mdat", b"frames"),
        moov_with_creation_date(Some(created)),
    ]
    .concat()
}

fn moov_with_creation_date(created: Option<NaiveDateTime>) -> Vec<u8> {
    let seconds = created
        .map(|dt| (dt - mp4_epoch()).num_seconds())
        .map(|s| u32::try_from(s).expect("creation time fits in u32"))
        .unwrap_or(0);

    let mut mvhd = vec![0, 0, 0, 0];
    mvhd.extend(seconds.to_be_bytes());
    mvhd.extend(seconds.to_be_bytes());
    mvhd.extend(1000u32.to_be_bytes());
    mvhd.extend(0u32.to_be_bytes());
    mvhd.extend(0x0001_0000u32.to_be_bytes());
    mvhd.extend(0x0100u16.to_be_bytes());
    mvhd.extend([0u8; 10]);
    for value in [0x0001_0000u32, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000] {
        mvhd.extend(value.to_be_bytes());
    }
    mvhd.extend([0u8; 24]);
    mvhd.extend(1u32.to_be_bytes());

    isobmff_box(b"moov", &isobmff_box(b"mvhd", &mvhd))
}

pub fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, s))
        .expect("valid date")
}
