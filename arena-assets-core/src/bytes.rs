//! Low-level reads shared by the binary decoders: little-endian integers,
//! null-terminated strings, and getline-style line splitting.

/// Reads a little-endian u16 at `offset`, or `None` if the buffer is too
/// short.
pub(crate) fn get_u16_le(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Reads a null-terminated string starting at `offset`. Returns the decoded
/// string and the number of bytes consumed including the terminator, or
/// `None` if no terminator exists before the end of the buffer.
pub(crate) fn read_cstr(data: &[u8], offset: usize) -> Option<(String, usize)> {
    let tail = data.get(offset..)?;
    let nul_pos = tail.iter().position(|&b| b == 0)?;
    let text = String::from_utf8_lossy(&tail[..nul_pos]).into_owned();
    Some((text, nul_pos + 1))
}

/// Splits `text` into lines the way `std::getline` does: split on '\n',
/// keep any '\r' in the line, and don't produce a trailing empty line for
/// input that ends in '\n'.
pub(crate) fn lines(text: &str) -> impl Iterator<Item = &str> {
    let count = if text.is_empty() {
        0
    } else {
        let pieces = text.split('\n').count();
        if text.ends_with('\n') {
            pieces - 1
        } else {
            pieces
        }
    };
    text.split('\n').take(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_u16_le() {
        let data = [0x34, 0x12, 0xFF];
        assert_eq!(get_u16_le(&data, 0), Some(0x1234));
        assert_eq!(get_u16_le(&data, 1), Some(0xFF12));
        assert_eq!(get_u16_le(&data, 2), None);
    }

    #[test]
    fn reads_null_terminated_strings() {
        let data = b"abc\0de\0";
        let (first, consumed) = read_cstr(data, 0).unwrap();
        assert_eq!(first, "abc");
        assert_eq!(consumed, 4);

        let (second, consumed) = read_cstr(data, 4).unwrap();
        assert_eq!(second, "de");
        assert_eq!(consumed, 3);

        assert!(read_cstr(b"no terminator", 0).is_none());
    }

    #[test]
    fn splits_lines_like_getline() {
        let collect = |s: &'static str| lines(s).collect::<Vec<_>>();
        assert_eq!(collect("a\r\nb"), vec!["a\r", "b"]);
        assert_eq!(collect("a\nb\n"), vec!["a", "b"]);
        assert_eq!(collect("\n"), vec![""]);
        assert!(collect("").is_empty());
    }
}
