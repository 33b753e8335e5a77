//! Local filenames for downloaded URL basenames.

/// Fallback when a basename sanitizes to nothing.
const DEFAULT_FILE_NAME: &str = "download";

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Turns a (percent-encoded) URL basename into a safe local filename.
///
/// - Percent-decodes (`caf%C3%A9.jpg` → `café.jpg`)
/// - Replaces NUL, `/`, `\`, whitespace and control characters with `_`,
///   collapsing runs
/// - Trims leading/trailing dots and underscores
/// - Truncates to 255 bytes, keeping the extension when there is one
pub fn local_file_name(basename: &str) -> String {
    let decoded = percent_decode(basename);

    let mut out = String::with_capacity(decoded.len());
    let mut prev_underscore = false;
    for c in decoded.chars() {
        let unsafe_char = c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace();
        if unsafe_char || c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        return DEFAULT_FILE_NAME.to_string();
    }
    truncate_keeping_extension(trimmed)
}

fn truncate_keeping_extension(name: &str) -> String {
    if name.len() <= NAME_MAX {
        return name.to_string();
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if ext.len() < 16 => (stem, Some(ext)),
        _ => (name, None),
    };
    let budget = NAME_MAX - ext.map_or(0, |e| e.len() + 1);
    let mut take = budget.min(stem.len());
    while take > 0 && !stem.is_char_boundary(take) {
        take -= 1;
    }
    match ext {
        Some(ext) => format!("{}.{}", &stem[..take], ext),
        None => stem[..take].to_string(),
    }
}

/// Lossy percent-decoding; malformed escapes are kept as-is.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(h << 4 | l);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_name_unchanged() {
        assert_eq!(local_file_name("photo.jpg"), "photo.jpg");
    }

    #[test]
    fn percent_decoding() {
        assert_eq!(local_file_name("caf%C3%A9.jpg"), "café.jpg");
        assert_eq!(local_file_name("my%20photo.png"), "my_photo.png");
        assert_eq!(local_file_name("100%.txt"), "100%.txt");
        assert_eq!(local_file_name("bad%zzname"), "bad%zzname");
    }

    #[test]
    fn unsafe_chars_replaced() {
        assert_eq!(local_file_name("a%2Fb%5Cc.txt"), "a_b_c.txt");
        assert_eq!(local_file_name("file%00name.txt"), "file_name.txt");
        assert_eq!(local_file_name("file___name.txt"), "file_name.txt");
    }

    #[test]
    fn empty_or_dots_fall_back() {
        assert_eq!(local_file_name(".."), "download");
        assert_eq!(local_file_name("%20"), "download");
    }

    #[test]
    fn long_names_keep_extension() {
        let long = format!("{}.jpg", "a".repeat(300));
        let name = local_file_name(&long);
        assert_eq!(name.len(), 255);
        assert!(name.ends_with(".jpg"));
    }
}
