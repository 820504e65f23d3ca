//! Byte-encoding detection and in-place UTF-8 normalization.
//!
//! Metadata strings arrive from tag readers and file systems in whatever
//! encoding the authoring tool used: UTF-8, UTF-16 with or without BOM, or
//! one of the single-byte Cyrillic code pages. [`normalize_utf8`] classifies
//! a raw buffer and rewrites it as UTF-8 so the rest of the system can treat
//! every string uniformly.
//!
//! The single-byte classifier is tuned for Cyrillic text: when the CP1251 and
//! KOI8-R scores tie, CP1251 wins. The rule ordering below is deliberate and
//! must not be rearranged.

mod tables;

use tables::{CP1251_TO_UNICODE, KOI8R_TO_UNICODE};
use tracing::trace;

/// Detected byte encoding of a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8 (by BOM or structural validity).
    Utf8,
    /// UTF-16, little-endian code units.
    Utf16Le,
    /// UTF-16, big-endian code units.
    Utf16Be,
    /// Windows-1251 Cyrillic code page.
    Cp1251,
    /// KOI8-R Cyrillic code page.
    Koi8R,
    /// ISO-8859-1 (Latin-1).
    Latin1,
}

/// Classify a byte buffer into exactly one encoding.
///
/// Ordered rules, first match wins:
/// 1. A byte-order mark is trusted unconditionally.
/// 2. Structural UTF-8 validity over the whole buffer.
/// 3. UTF-16 zero-byte pattern (even length, every unit's high or low byte
///    zero).
/// 4. Single-byte scoring with a CP1251-favoring tie-break.
pub fn detect(bytes: &[u8]) -> Encoding {
    if let Some(encoding) = detect_bom(bytes) {
        return encoding;
    }

    if is_structurally_utf8(bytes) {
        return Encoding::Utf8;
    }

    if bytes.len() >= 2 && bytes.len() % 2 == 0 {
        let mut is_le = true;
        let mut is_be = true;
        for unit in bytes.chunks_exact(2) {
            if unit[1] != 0 {
                is_le = false;
            }
            if unit[0] != 0 {
                is_be = false;
            }
            if !is_le && !is_be {
                break;
            }
        }
        if is_le {
            return Encoding::Utf16Le;
        }
        if is_be {
            return Encoding::Utf16Be;
        }
    }

    classify_single_byte(bytes)
}

/// Leading byte-order marks: 3-byte UTF-8, 2-byte UTF-16 LE/BE.
fn detect_bom(bytes: &[u8]) -> Option<Encoding> {
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        return Some(Encoding::Utf8);
    }
    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
        return Some(Encoding::Utf16Le);
    }
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        return Some(Encoding::Utf16Be);
    }
    None
}

/// Structural UTF-8 check: every lead byte is followed by the right number
/// of continuation bytes. Deliberately looser than `str::from_utf8` (overlong
/// forms and surrogate code points pass), matching the classifier this
/// engine has always shipped.
fn is_structurally_utf8(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        let len = if b & 0x80 == 0x00 {
            1
        } else if b & 0xE0 == 0xC0 {
            2
        } else if b & 0xF0 == 0xE0 {
            3
        } else if b & 0xF8 == 0xF0 {
            4
        } else {
            return false;
        };
        if i + len > bytes.len() {
            return false;
        }
        for &cont in &bytes[i + 1..i + len] {
            if cont & 0xC0 != 0x80 {
                return false;
            }
        }
        i += len;
    }
    true
}

/// Score the buffer against the single-byte candidates.
///
/// CP1251 counts 0xC0..=0xFF plus Ё/ё (0xA8/0xB8); KOI8-R counts
/// 0xC0..=0xFF; Latin-1 penalizes the 0x80..=0x9F control block and rewards
/// 0xA0 and above. Decision order, including the `>=` tie-break, is fixed.
fn classify_single_byte(bytes: &[u8]) -> Encoding {
    let mut cp1251_score = 0usize;
    let mut koi8r_score = 0usize;
    let mut latin1_score = 0isize;

    for &c in bytes {
        if (0xC0..=0xFF).contains(&c) || c == 0xA8 || c == 0xB8 {
            cp1251_score += 1;
        }
        if c >= 0xC0 {
            koi8r_score += 1;
        }
        if (0x80..=0x9F).contains(&c) {
            latin1_score -= 1;
        } else if c >= 0xA0 {
            latin1_score += 1;
        }
    }

    trace!(cp1251_score, koi8r_score, latin1_score, "single-byte scores");

    if cp1251_score > 0 && cp1251_score >= koi8r_score {
        return Encoding::Cp1251;
    }
    if koi8r_score > 0 && koi8r_score > cp1251_score {
        return Encoding::Koi8R;
    }
    if latin1_score > 0 {
        return Encoding::Latin1;
    }

    // High bytes present but nothing scored cleanly: assume Cyrillic.
    if cp1251_score > 0 {
        Encoding::Cp1251
    } else {
        Encoding::Latin1
    }
}

/// Detect the encoding of `buf` and rewrite it as UTF-8 in place, bounded by
/// `max_len` output bytes (excess input is truncated, never overflowed).
///
/// Returns the resulting byte length, with two historical sentinels kept for
/// compatibility: `1` for an already-empty input and for input that is
/// already UTF-8 (the buffer is left untouched in both cases), and `0` when
/// the transcode buffer cannot be allocated.
pub fn normalize_utf8(buf: &mut Vec<u8>, max_len: usize) -> usize {
    if max_len == 0 {
        return 0;
    }
    if buf.is_empty() {
        return 1;
    }

    let encoding = detect(buf);
    trace!(?encoding, len = buf.len(), "normalizing metadata string");

    match encoding {
        Encoding::Utf8 => 1,
        Encoding::Utf16Le => transcode_utf16(buf, max_len, false),
        Encoding::Utf16Be => transcode_utf16(buf, max_len, true),
        Encoding::Cp1251 => transcode_codepage(buf, max_len, &CP1251_TO_UNICODE),
        Encoding::Koi8R => transcode_codepage(buf, max_len, &KOI8R_TO_UNICODE),
        Encoding::Latin1 => transcode_latin1(buf, max_len),
    }
}

/// Convenience wrapper for callers holding a raw tag field: normalize and
/// hand back an owned `String` (lossy only for buffers the structural check
/// admitted but strict UTF-8 rejects).
pub fn sanitize(raw: &[u8], max_len: usize) -> String {
    let mut buf = raw.to_vec();
    if normalize_utf8(&mut buf, max_len) == 0 {
        return String::new();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// UTF-16 → UTF-8. The input length is the number of code units before the
/// first zero unit, bounded by `max_len`; a leading BOM is transcoded like
/// any other unit. Unpaired surrogates end the conversion.
fn transcode_utf16(buf: &mut Vec<u8>, max_len: usize, big_endian: bool) -> usize {
    let unit_at = |buf: &[u8], i: usize| -> u16 {
        let raw = u16::from_le_bytes([buf[2 * i], buf[2 * i + 1]]);
        if big_endian {
            raw.swap_bytes()
        } else {
            raw
        }
    };

    let mut units = 0usize;
    while (units + 1) * 2 <= buf.len() && units * 2 < max_len {
        if unit_at(buf, units) == 0 {
            break;
        }
        units += 1;
    }

    let mut dst: Vec<u8> = Vec::new();
    if dst.try_reserve_exact(max_len).is_err() {
        return 0;
    }

    let mut i = 0usize;
    while i < units {
        if dst.len() >= max_len.saturating_sub(4) {
            break;
        }
        let wc = unit_at(buf, i);
        if wc < 0x80 {
            dst.push(wc as u8);
        } else if wc < 0x800 {
            if dst.len() + 2 >= max_len {
                break;
            }
            dst.push(0xC0 | (wc >> 6) as u8);
            dst.push(0x80 | (wc & 0x3F) as u8);
        } else if (0xD800..=0xDBFF).contains(&wc) {
            if i + 1 >= units {
                break;
            }
            let wc2 = unit_at(buf, i + 1);
            if !(0xDC00..=0xDFFF).contains(&wc2) {
                break;
            }
            let code = 0x10000u32 + ((u32::from(wc) & 0x3FF) << 10) + (u32::from(wc2) & 0x3FF);
            if dst.len() + 4 >= max_len {
                break;
            }
            dst.push(0xF0 | (code >> 18) as u8);
            dst.push(0x80 | ((code >> 12) & 0x3F) as u8);
            dst.push(0x80 | ((code >> 6) & 0x3F) as u8);
            dst.push(0x80 | (code & 0x3F) as u8);
            i += 1;
        } else {
            if dst.len() + 3 >= max_len {
                break;
            }
            dst.push(0xE0 | (wc >> 12) as u8);
            dst.push(0x80 | ((wc >> 6) & 0x3F) as u8);
            dst.push(0x80 | (wc & 0x3F) as u8);
        }
        i += 1;
    }

    let len = dst.len();
    *buf = dst;
    len
}

/// Single-byte codepage → UTF-8 through a 128-entry high-half table.
/// A zero table entry means the byte has no defined code point; it is
/// dropped from the output.
fn transcode_codepage(buf: &mut Vec<u8>, max_len: usize, table: &[u16; 128]) -> usize {
    let mut dst: Vec<u8> = Vec::new();
    if dst.try_reserve_exact(max_len).is_err() {
        return 0;
    }

    for &c in buf.iter() {
        if dst.len() >= max_len.saturating_sub(3) {
            break;
        }
        if c < 0x80 {
            dst.push(c);
            continue;
        }
        let u = table[usize::from(c - 0x80)];
        if u == 0 {
            continue;
        }
        if u < 0x80 {
            dst.push(u as u8);
        } else if u < 0x800 {
            if dst.len() + 1 >= max_len {
                break;
            }
            dst.push(0xC0 | (u >> 6) as u8);
            dst.push(0x80 | (u & 0x3F) as u8);
        } else {
            if dst.len() + 2 >= max_len {
                break;
            }
            dst.push(0xE0 | (u >> 12) as u8);
            dst.push(0x80 | ((u >> 6) & 0x3F) as u8);
            dst.push(0x80 | (u & 0x3F) as u8);
        }
    }

    let len = dst.len();
    *buf = dst;
    len
}

/// ISO-8859-1 → UTF-8: every byte maps 1:1 to the same code point.
fn transcode_latin1(buf: &mut Vec<u8>, max_len: usize) -> usize {
    let mut dst: Vec<u8> = Vec::new();
    if dst.try_reserve_exact(max_len).is_err() {
        return 0;
    }

    for &c in buf.iter() {
        if dst.len() >= max_len.saturating_sub(1) {
            break;
        }
        if c < 0x80 {
            dst.push(c);
        } else {
            if dst.len() + 2 >= max_len {
                break;
            }
            dst.push(0xC0 | (c >> 6));
            dst.push(0x80 | (c & 0x3F));
        }
    }

    let len = dst.len();
    *buf = dst;
    len
}
