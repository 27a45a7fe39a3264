//! Multipart form-data parsing module
//!
//! Extracts named form fields from an in-memory `multipart/form-data` body.
//! Only what a single-file upload form needs: no streaming, no nested parts,
//! no charset handling. Field payloads are returned as raw bytes.

use std::collections::HashMap;
use std::io::Read;
use thiserror::Error;

/// Field name -> raw payload. Last occurrence of a name wins.
pub type FormFields = HashMap<String, Vec<u8>>;

const HEADER_SEPARATOR: &[u8] = b"\r\n\r\n";
const LINE_BREAK: &[u8] = b"\r\n";

/// Reasons a multipart body could not be parsed
#[derive(Debug, Error)]
pub enum MultipartError {
    #[error("No boundary in Content-Type header")]
    MissingBoundary,

    #[error("request body truncated: expected {expected} bytes, received {received}")]
    Truncated { expected: usize, received: usize },

    #[error("failed to read request body: {0}")]
    Read(#[from] std::io::Error),

    #[error("field name is not valid UTF-8")]
    InvalidFieldName,
}

/// Parse a multipart body read from `source`.
///
/// Exactly `content_length` bytes are consumed. A source that ends early is
/// reported as [`MultipartError::Truncated`] rather than parsed partially.
pub fn parse_multipart<R: Read>(
    source: R,
    content_type: &str,
    content_length: usize,
) -> Result<FormFields, MultipartError> {
    let boundary = extract_boundary(content_type)?;

    let mut body = Vec::with_capacity(content_length);
    let received = source.take(content_length as u64).read_to_end(&mut body)?;
    if received < content_length {
        return Err(MultipartError::Truncated {
            expected: content_length,
            received,
        });
    }

    parse_body(&body, boundary)
}

/// Extract the `boundary=` parameter from a `Content-Type` header value
pub fn extract_boundary(content_type: &str) -> Result<&[u8], MultipartError> {
    content_type
        .split(';')
        .map(str::trim)
        .find_map(|segment| segment.strip_prefix("boundary="))
        .map(str::trim)
        .filter(|boundary| !boundary.is_empty())
        .map(str::as_bytes)
        .ok_or(MultipartError::MissingBoundary)
}

/// Split a complete body on `--<boundary>` and collect the named parts.
///
/// Segments without a header block (preamble, epilogue, the closing `--`)
/// are skipped without error, as are parts with no field name.
pub fn parse_body(body: &[u8], boundary: &[u8]) -> Result<FormFields, MultipartError> {
    let mut delimiter = Vec::with_capacity(boundary.len() + 2);
    delimiter.extend_from_slice(b"--");
    delimiter.extend_from_slice(boundary);

    let mut fields = FormFields::new();

    for chunk in split_on(body, &delimiter) {
        let Some((headers_raw, data)) = split_once(chunk, HEADER_SEPARATOR) else {
            continue;
        };

        let headers_raw = trim_line_breaks(headers_raw);
        if headers_raw.is_empty() || headers_raw == b"--" {
            continue;
        }

        let data = trim_trailing_line_breaks(data);

        if let Some(name) = field_name(headers_raw)? {
            fields.insert(name, data.to_vec());
        }
    }

    Ok(fields)
}

/// Find the `name="..."` parameter of the part's Content-Disposition header
fn field_name(headers_raw: &[u8]) -> Result<Option<String>, MultipartError> {
    let mut name = None;

    for line in split_on(headers_raw, LINE_BREAK) {
        if !line.to_ascii_lowercase().starts_with(b"content-disposition") {
            continue;
        }
        for param in line.split(|&b| b == b';') {
            let param = param.trim_ascii();
            if let Some(value) = param
                .strip_prefix(b"name=\"")
                .and_then(|rest| rest.strip_suffix(b"\""))
            {
                let value =
                    std::str::from_utf8(value).map_err(|_| MultipartError::InvalidFieldName)?;
                name = Some(value.to_string());
            }
        }
    }

    Ok(name.filter(|n| !n.is_empty()))
}

/// Split `haystack` on every occurrence of `needle`
fn split_on<'a>(haystack: &'a [u8], needle: &'a [u8]) -> impl Iterator<Item = &'a [u8]> + 'a {
    let mut rest = Some(haystack);
    std::iter::from_fn(move || {
        let current = rest?;
        match find(current, needle) {
            Some(pos) => {
                rest = Some(&current[pos + needle.len()..]);
                Some(&current[..pos])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

fn split_once<'a>(haystack: &'a [u8], needle: &[u8]) -> Option<(&'a [u8], &'a [u8])> {
    find(haystack, needle).map(|pos| (&haystack[..pos], &haystack[pos + needle.len()..]))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

const fn is_line_break(b: u8) -> bool {
    b == b'\r' || b == b'\n'
}

fn trim_line_breaks(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&b| !is_line_break(b))
        .unwrap_or(bytes.len());
    trim_trailing_line_breaks(&bytes[start..])
}

fn trim_trailing_line_breaks(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| !is_line_break(b))
        .map_or(0, |pos| pos + 1);
    &bytes[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "----WebKitFormBoundary7MA4YWxkTrZu0gW";

    fn content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    fn part(name: &str, payload: &[u8]) -> Vec<u8> {
        let mut out = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n"
        )
        .into_bytes();
        out.extend_from_slice(payload);
        out.extend_from_slice(b"\r\n");
        out
    }

    fn closing() -> Vec<u8> {
        format!("--{BOUNDARY}--\r\n").into_bytes()
    }

    fn body(parts: &[Vec<u8>]) -> Vec<u8> {
        let mut out: Vec<u8> = parts.concat();
        out.extend_from_slice(&closing());
        out
    }

    fn parse(body: &[u8]) -> FormFields {
        parse_multipart(body, &content_type(), body.len()).unwrap()
    }

    #[test]
    fn test_extract_boundary() {
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=abc123").unwrap(),
            b"abc123"
        );
        assert_eq!(
            extract_boundary("multipart/form-data;boundary=  xyz  ").unwrap(),
            b"xyz"
        );
    }

    #[test]
    fn test_missing_boundary() {
        assert!(matches!(
            extract_boundary("multipart/form-data"),
            Err(MultipartError::MissingBoundary)
        ));
        assert!(matches!(
            extract_boundary("multipart/form-data; boundary="),
            Err(MultipartError::MissingBoundary)
        ));
        let err = parse_multipart(&b""[..], "multipart/form-data; charset=utf-8", 0).unwrap_err();
        assert_eq!(err.to_string(), "No boundary in Content-Type header");
    }

    #[test]
    fn test_single_image_field() {
        let payload: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x00, 0xff, 0x10, 0x42];
        let fields = parse(&body(&[part("image", &payload)]));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["image"], payload);
    }

    #[test]
    fn test_file_part_with_filename_and_content_type() {
        let mut raw = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"scan.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
        )
        .into_bytes();
        raw.extend_from_slice(b"\xff\xd8jpeg-bytes\xff\xd9");
        raw.extend_from_slice(b"\r\n");
        raw.extend_from_slice(&closing());

        let fields = parse(&raw);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["image"], b"\xff\xd8jpeg-bytes\xff\xd9");
    }

    #[test]
    fn test_two_distinct_fields() {
        let fields = parse(&body(&[part("image", b"abc"), part("note", b"hello")]));
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["image"], b"abc");
        assert_eq!(fields["note"], b"hello");
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let fields = parse(&body(&[part("image", b"first"), part("image", b"second")]));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["image"], b"second");
    }

    #[test]
    fn test_part_without_content_disposition_dropped() {
        let mut raw = format!("--{BOUNDARY}\r\nContent-Type: text/plain\r\n\r\norphan\r\n").into_bytes();
        raw.extend_from_slice(&part("note", b"kept"));
        raw.extend_from_slice(&closing());

        let fields = parse(&raw);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["note"], b"kept");
    }

    #[test]
    fn test_empty_payload_is_present() {
        let fields = parse(&body(&[part("image", b"")]));
        assert_eq!(fields.get("image").map(Vec::len), Some(0));
        assert!(!fields.contains_key("other"));
    }

    #[test]
    fn test_preamble_and_epilogue_ignored() {
        let mut raw = b"This is the preamble.\r\n".to_vec();
        raw.extend_from_slice(&part("image", b"data"));
        raw.extend_from_slice(&closing());
        raw.extend_from_slice(b"epilogue text");

        let fields = parse(&raw);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["image"], b"data");
    }

    #[test]
    fn test_boundary_is_case_sensitive() {
        let raw = b"--abc\r\nContent-Disposition: form-data; name=\"image\"\r\n\r\ndata\r\n--abc--\r\n";
        let fields = parse_multipart(&raw[..], "multipart/form-data; boundary=ABC", raw.len()).unwrap();
        // Nothing splits the body, so the payload runs on into the closing marker.
        assert_eq!(fields["image"], b"data\r\n--abc--");
    }

    #[test]
    fn test_header_name_case_insensitive() {
        let mut raw =
            format!("--{BOUNDARY}\r\ncontent-DISPOSITION: form-data; name=\"image\"\r\n\r\nx\r\n")
                .into_bytes();
        raw.extend_from_slice(&closing());
        assert_eq!(parse(&raw)["image"], b"x");
    }

    #[test]
    fn test_trailing_line_breaks_stripped_from_payload() {
        // Payload bytes that genuinely end in CR/LF are indistinguishable from
        // the part terminator and are stripped with it.
        let fields = parse(&body(&[part("note", b"line\r\n\n")]));
        assert_eq!(fields["note"], b"line");
    }

    #[test]
    fn test_truncated_body() {
        let raw = body(&[part("image", b"data")]);
        let err = parse_multipart(&raw[..], &content_type(), raw.len() + 10).unwrap_err();
        match err {
            MultipartError::Truncated { expected, received } => {
                assert_eq!(expected, raw.len() + 10);
                assert_eq!(received, raw.len());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bytes_past_content_length_ignored() {
        let first = body(&[part("image", b"data")]);
        let mut raw = first.clone();
        raw.extend_from_slice(&part("extra", b"ignored"));

        let fields = parse_multipart(&raw[..], &content_type(), first.len()).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["image"], b"data");
    }

    #[test]
    fn test_invalid_utf8_name() {
        let mut raw = format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"").into_bytes();
        raw.extend_from_slice(b"\xff\xfe\"\r\n\r\nx\r\n");
        raw.extend_from_slice(&closing());

        assert!(matches!(
            parse_multipart(&raw[..], &content_type(), raw.len()),
            Err(MultipartError::InvalidFieldName)
        ));
    }

    #[test]
    fn test_empty_body() {
        assert!(parse(b"").is_empty());
    }
}
