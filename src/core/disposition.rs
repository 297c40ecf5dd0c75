//! Filename extraction from `Content-Disposition` headers

/// Name used when the server does not supply a usable filename
pub const DEFAULT_FILENAME: &str = "translated_document.docx";

/// Pull the `filename=` parameter out of a `Content-Disposition` value.
///
/// Only the last path component is kept. Returns `None` when the
/// parameter is missing or yields no usable name.
///
/// The value is taken literally: percent-escapes are not decoded and the
/// RFC 5987 `filename*=` form is ignored, so a server that only sends an
/// encoded name gets it saved under that encoded name.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let raw = header.split(';').find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("filename")
            .then_some(value)
    })?;

    let unquoted = raw.trim().trim_matches('"').trim();
    let name = unquoted.rsplit(['/', '\\']).next().unwrap_or("").trim();

    match name {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// Resolve the storage name for a download response
pub fn resolve_filename(header: Option<&str>) -> String {
    header
        .and_then(filename_from_disposition)
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}
