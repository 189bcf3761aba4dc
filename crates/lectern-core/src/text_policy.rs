//! Bounded paragraph text and character-boundary-safe helpers.

use core::str;

use heapless::String;

use crate::error::ConfigError;

pub const MAX_PARAGRAPH_CHARS: usize = 140;
pub const PARAGRAPH_TEXT_BYTES: usize = MAX_PARAGRAPH_CHARS * 4;
pub const MAX_SPEAKER_NAME_CHARS: usize = 24;
pub const SPEAKER_NAME_BYTES: usize = MAX_SPEAKER_NAME_CHARS * 4;

pub const PREVIEW_MAX_CHARS: usize = 24;

pub type ParagraphText = String<PARAGRAPH_TEXT_BYTES>;
pub type SpeakerName = String<SPEAKER_NAME_BYTES>;

/// Copies `source` into a bounded string, rejecting text over `max_chars`
/// characters instead of silently truncating it.
pub fn bounded_text<const N: usize>(source: &str, max_chars: usize) -> Result<String<N>, ConfigError> {
    let chars = source.chars().count();
    if chars > max_chars {
        return Err(ConfigError::TextTooLong { chars });
    }

    let mut out = String::new();
    out.push_str(source)
        .map_err(|_| ConfigError::CapacityExceeded)?;
    Ok(out)
}

/// Character starting at `byte_cursor` and the cursor just past it.
pub fn char_at(text: &str, byte_cursor: usize) -> Option<(char, usize)> {
    let ch = text.get(byte_cursor..)?.chars().next()?;
    Some((ch, byte_cursor + ch.len_utf8()))
}

/// Log-friendly excerpt: the first `max_chars` characters, with `...` when cut.
pub fn preview_limited<'a>(source: &str, out: &'a mut [u8], max_chars: usize) -> &'a str {
    if out.is_empty() {
        return "";
    }

    let mut len = 0usize;
    let mut truncated = false;

    for (char_count, ch) in source.chars().enumerate() {
        let mut utf8 = [0u8; 4];
        let encoded = ch.encode_utf8(&mut utf8).as_bytes();
        if char_count >= max_chars || len + encoded.len() > out.len() {
            truncated = true;
            break;
        }

        out[len..len + encoded.len()].copy_from_slice(encoded);
        len += encoded.len();
    }

    if truncated && len + 3 <= out.len() {
        out[len..len + 3].copy_from_slice(b"...");
        len += 3;
    }

    str::from_utf8(&out[..len]).unwrap_or("?")
}

pub fn preview_compact<'a>(source: &str, out: &'a mut [u8]) -> &'a str {
    preview_limited(source, out, PREVIEW_MAX_CHARS)
}

/// `"index/total"` label, e.g. `2/5`.
pub fn progress_label(index: u16, total: u16, out: &mut [u8]) -> &str {
    let mut len = 0usize;
    len += write_u16_ascii(index, &mut out[len..]);
    if len + 1 >= out.len() {
        return str::from_utf8(&out[..len]).unwrap_or("");
    }
    out[len] = b'/';
    len += 1;
    len += write_u16_ascii(total, &mut out[len..]);

    str::from_utf8(&out[..len]).unwrap_or("")
}

pub fn write_u16_ascii(mut value: u16, out: &mut [u8]) -> usize {
    if out.is_empty() {
        return 0;
    }

    if value == 0 {
        out[0] = b'0';
        return 1;
    }

    let mut tmp = [0u8; 5];
    let mut n = 0usize;
    while value > 0 && n < tmp.len() {
        tmp[n] = b'0' + (value % 10) as u8;
        value /= 10;
        n += 1;
    }

    let len = n.min(out.len());
    for i in 0..len {
        out[i] = tmp[n - 1 - i];
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_text_counts_characters_not_bytes() {
        let accented = "á".repeat(MAX_PARAGRAPH_CHARS);
        let text: ParagraphText = bounded_text(&accented, MAX_PARAGRAPH_CHARS).unwrap();
        assert_eq!(text.chars().count(), MAX_PARAGRAPH_CHARS);

        let too_long = "a".repeat(MAX_PARAGRAPH_CHARS + 1);
        let err = bounded_text::<PARAGRAPH_TEXT_BYTES>(&too_long, MAX_PARAGRAPH_CHARS).unwrap_err();
        assert_eq!(err, ConfigError::TextTooLong { chars: 141 });
    }

    #[test]
    fn char_at_walks_multibyte_text() {
        let text = "sí!";
        assert_eq!(char_at(text, 0), Some(('s', 1)));
        assert_eq!(char_at(text, 1), Some(('í', 3)));
        assert_eq!(char_at(text, 3), Some(('!', 4)));
        assert_eq!(char_at(text, 4), None);
    }

    #[test]
    fn preview_marks_truncation() {
        let mut out = [0u8; 32];
        assert_eq!(preview_limited("hola mundo", &mut out, 4), "hola...");
        assert_eq!(preview_limited("hola", &mut out, 4), "hola");
    }

    #[test]
    fn progress_label_formats_fraction() {
        let mut out = [0u8; 12];
        assert_eq!(progress_label(2, 15, &mut out), "2/15");
    }
}
