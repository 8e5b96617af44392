use std::path::PathBuf;

/// Local filesystem path named by a `file:` URI.
///
/// Accepts `file:///p`, `file://localhost/p`, the single-slash `file:/p` form and bare absolute
/// paths. Remote authorities, other schemes, relative paths and broken escapes yield `None`.
/// Case and symlinks are left alone so the engine sees the same paths the client does.
pub fn path_from_file_uri(uri: &str) -> Option<PathBuf> {
    let uri = uri.trim();
    if uri.starts_with('/') {
        return Some(PathBuf::from(uri));
    }
    let encoded = local_file_path(uri)?;
    let decoded = decode_escapes(encoded)?;
    Some(PathBuf::from(platform_path(decoded)))
}

/// Paths for a batch of URIs, skipping (and logging) the ones that are not local files.
pub(crate) fn paths_from_uris<'a>(uris: impl IntoIterator<Item = &'a str>) -> Vec<PathBuf> {
    uris.into_iter()
        .filter_map(|uri| {
            let path = path_from_file_uri(uri);
            if path.is_none() {
                log::warn!("Ignoring non-file URI {uri}");
            }
            path
        })
        .collect()
}

/// Still-encoded absolute path of a `file:` URI whose authority is empty or `localhost`.
fn local_file_path(uri: &str) -> Option<&str> {
    let (scheme, rest) = uri.split_once(':')?;
    if !scheme.eq_ignore_ascii_case("file") {
        return None;
    }
    let path = match rest.strip_prefix("//") {
        Some(authority_and_path) => {
            let (authority, path) = authority_and_path.split_at(authority_and_path.find('/')?);
            if !authority.is_empty() && !authority.eq_ignore_ascii_case("localhost") {
                return None;
            }
            path
        }
        None => rest,
    };
    path.starts_with('/').then_some(path)
}

fn decode_escapes(encoded: &str) -> Option<String> {
    if !encoded.contains('%') {
        return Some(encoded.to_string());
    }
    let mut decoded = Vec::with_capacity(encoded.len());
    let mut rest = encoded.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        if byte == b'%' {
            let [hi, lo, ..] = tail else {
                return None;
            };
            decoded.push((hex_value(*hi)? << 4) | hex_value(*lo)?);
            rest = &tail[2..];
        } else {
            decoded.push(byte);
            rest = tail;
        }
    }
    String::from_utf8(decoded).ok()
}

fn hex_value(digit: u8) -> Option<u8> {
    (digit as char).to_digit(16).map(|value| value as u8)
}

#[cfg(not(windows))]
fn platform_path(decoded: String) -> String {
    decoded
}

// `/C:/dir` carries a slash before the drive letter.
#[cfg(windows)]
fn platform_path(decoded: String) -> String {
    let has_drive = matches!(
        decoded.as_bytes(),
        [b'/', drive, b':', ..] if drive.is_ascii_alphabetic()
    );
    if has_drive {
        decoded[1..].to_string()
    } else {
        decoded
    }
}
