//! map module urls to files under the vendor root

use std::path::{Component, Path, PathBuf};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

/// Characters escaped when a vendored file name is written back as a url path
/// segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// `<host>/<url-path>` with forward slashes, relative to the vendor root.
///
/// Path segments are percent-decoded. A path whose last segment has no
/// extension gets `/index.js` appended. The query string and fragment are
/// not part of the result.
pub fn vendor_sub_path(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let mut parts = vec![match url.port() {
        Some(port) => format!("{}_PORT{}", sanitize_segment(host), port),
        None => sanitize_segment(host),
    }];

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.collect())
        .unwrap_or_default();
    parts.extend(
        segments
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| sanitize_segment(&percent_decode(s))),
    );

    let has_extension = segments.last().is_some_and(|s| s.contains('.'));
    if !has_extension {
        parts.push("index.js".to_owned());
    }

    parts.join("/")
}

pub fn vendor_path(root: &Path, url: &Url) -> PathBuf {
    vendor_sub_path(url)
        .split('/')
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Specifier leading from the module vendored at `from` to the one at `to`,
/// both as returned by [`vendor_sub_path`].
pub fn relative_specifier(from: &str, to: &str) -> String {
    let from_dir = Path::new(from).parent().unwrap_or(Path::new(""));
    let diff = pathdiff::diff_paths(Path::new(to), from_dir).unwrap_or_else(|| PathBuf::from(to));

    let parts: Vec<String> = diff
        .components()
        .filter_map(|c| match c {
            Component::ParentDir => Some("..".to_owned()),
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let text = encode_sub_path(&parts.join("/"));
    if text.starts_with("../") {
        text
    } else {
        format!("./{text}")
    }
}

/// Percent-encodes every segment of a vendored path so a browser resolving
/// it lands on the decoded file name.
pub fn encode_sub_path(sub_path: &str) -> String {
    sub_path
        .split('/')
        .map(|part| utf8_percent_encode(part, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn percent_decode(text: &str) -> String {
    match percent_decode_str(text).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => text.to_owned(),
    }
}

fn sanitize_segment(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' | '\\' | '/' => '_',
            c => c,
        })
        .collect()
}
