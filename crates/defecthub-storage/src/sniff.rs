//! Content type detection from leading bytes.
//!
//! Follows the WHATWG MIME sniffing signatures for the formats a defect
//! tracker actually receives: images, documents, archives and media.
//! Anything that is not recognised falls back to `text/plain` when the
//! prefix contains no binary control bytes, or `application/octet-stream`.

/// Number of leading bytes consulted.
pub const SNIFF_LEN: usize = 512;

/// Fallback for unrecognised binary content.
pub const OCTET_STREAM: &str = "application/octet-stream";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// A signature matched against the start of the content.
enum Signature {
    /// Exact byte prefix.
    Prefix(&'static [u8], &'static str),
    /// Exact byte prefix after any leading whitespace.
    PrefixAfterWs(&'static [u8], &'static str),
    /// Prefix compared under a mask (`0x00` mask bytes are wildcards).
    Masked {
        mask: &'static [u8],
        pattern: &'static [u8],
        content_type: &'static str,
    },
    /// HTML tag, matched case-insensitively after leading whitespace and
    /// followed by a space or `>`.
    HtmlTag(&'static [u8]),
    /// ISO base media file with an `mp4` brand.
    Mp4,
}

const SIGNATURES: &[Signature] = &[
    Signature::HtmlTag(b"<!DOCTYPE HTML"),
    Signature::HtmlTag(b"<HTML"),
    Signature::HtmlTag(b"<HEAD"),
    Signature::HtmlTag(b"<SCRIPT"),
    Signature::HtmlTag(b"<IFRAME"),
    Signature::HtmlTag(b"<H1"),
    Signature::HtmlTag(b"<DIV"),
    Signature::HtmlTag(b"<FONT"),
    Signature::HtmlTag(b"<TABLE"),
    Signature::HtmlTag(b"<A"),
    Signature::HtmlTag(b"<STYLE"),
    Signature::HtmlTag(b"<TITLE"),
    Signature::HtmlTag(b"<B"),
    Signature::HtmlTag(b"<BODY"),
    Signature::HtmlTag(b"<BR"),
    Signature::HtmlTag(b"<P"),
    Signature::HtmlTag(b"<!--"),
    Signature::PrefixAfterWs(b"<?xml", "text/xml; charset=utf-8"),
    Signature::Prefix(b"%PDF-", "application/pdf"),
    Signature::Prefix(b"%!PS-Adobe-", "application/postscript"),
    Signature::Prefix(b"\xFE\xFF", "text/plain; charset=utf-16be"),
    Signature::Prefix(b"\xFF\xFE", "text/plain; charset=utf-16le"),
    Signature::Prefix(b"\xEF\xBB\xBF", TEXT_PLAIN),
    Signature::Prefix(b"\x00\x00\x01\x00", "image/x-icon"),
    Signature::Prefix(b"\x00\x00\x02\x00", "image/x-icon"),
    Signature::Prefix(b"BM", "image/bmp"),
    Signature::Prefix(b"GIF87a", "image/gif"),
    Signature::Prefix(b"GIF89a", "image/gif"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00WEBPVP",
        content_type: "image/webp",
    },
    Signature::Prefix(b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    Signature::Prefix(b"\xFF\xD8\xFF", "image/jpeg"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"FORM\x00\x00\x00\x00AIFF",
        content_type: "audio/aiff",
    },
    Signature::Prefix(b"ID3", "audio/mpeg"),
    Signature::Prefix(b"OggS\x00", "application/ogg"),
    Signature::Prefix(b"MThd\x00\x00\x00\x06", "audio/midi"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00AVI ",
        content_type: "video/avi",
    },
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        pattern: b"RIFF\x00\x00\x00\x00WAVE",
        content_type: "audio/wave",
    },
    Signature::Mp4,
    Signature::Prefix(b"\x1A\x45\xDF\xA3", "video/webm"),
    Signature::Prefix(b"wOFF", "font/woff"),
    Signature::Prefix(b"wOF2", "font/woff2"),
    Signature::Prefix(b"\x1F\x8B\x08", "application/x-gzip"),
    Signature::Prefix(b"PK\x03\x04", "application/zip"),
    Signature::Prefix(b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    Signature::Prefix(b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    Signature::Prefix(b"\x00\x61\x73\x6D", "application/wasm"),
];

/// Detect the content type of `data`, which should be the first
/// [`SNIFF_LEN`] bytes of the content (or all of it, if shorter).
///
/// Always returns a valid MIME type.
pub fn detect(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];
    let first_non_ws = data
        .iter()
        .position(|b| !is_whitespace(*b))
        .unwrap_or(data.len());

    for signature in SIGNATURES {
        if let Some(content_type) = signature.matches(data, first_non_ws) {
            return content_type;
        }
    }

    if data.iter().any(|b| is_binary(*b)) {
        OCTET_STREAM
    } else {
        TEXT_PLAIN
    }
}

impl Signature {
    fn matches(&self, data: &[u8], first_non_ws: usize) -> Option<&'static str> {
        match self {
            Self::Prefix(prefix, content_type) => {
                data.starts_with(prefix).then_some(*content_type)
            }
            Self::PrefixAfterWs(prefix, content_type) => data[first_non_ws..]
                .starts_with(prefix)
                .then_some(*content_type),
            Self::Masked {
                mask,
                pattern,
                content_type,
            } => {
                if data.len() < pattern.len() {
                    return None;
                }
                mask.iter()
                    .zip(pattern.iter())
                    .zip(data.iter())
                    .all(|((m, p), d)| d & m == *p)
                    .then_some(*content_type)
            }
            Self::HtmlTag(tag) => {
                let data = &data[first_non_ws..];
                if data.len() < tag.len() + 1 {
                    return None;
                }
                let name_matches = tag
                    .iter()
                    .zip(data.iter())
                    .all(|(t, d)| t.eq_ignore_ascii_case(d));
                let terminated = matches!(data[tag.len()], b' ' | b'>');
                (name_matches && terminated).then_some("text/html; charset=utf-8")
            }
            Self::Mp4 => is_mp4(data).then_some("video/mp4"),
        }
    }
}

/// An `ftyp` box whose major or compatible brands include `mp4`.
fn is_mp4(data: &[u8]) -> bool {
    if data.len() < 12 {
        return false;
    }
    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if data.len() < box_size || box_size % 4 != 0 || &data[4..8] != b"ftyp" {
        return false;
    }
    (8..box_size)
        .step_by(4)
        .filter(|offset| *offset != 12)
        .any(|offset| data.get(offset..offset + 3) == Some(b"mp4".as_slice()))
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

fn is_binary(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}
