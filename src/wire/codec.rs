// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Encoding and decoding of `key=value` payloads.

use crate::error::ParseError;
use crate::wire::RawRecord;
use crate::wire::status::{STATUS_KEY, STATUS_PREFIX};

/// Decodes a response body into a [`RawRecord`].
///
/// The body is split on `,` and each segment on its first `=`. The status
/// token stays in the record under the `ret` key; use
/// [`validate`](crate::wire::validate) to interpret it.
///
/// Values are returned exactly as received; URL-encoded fields such as the
/// unit name are decoded by the typed views.
///
/// # Errors
///
/// Returns [`ParseError::UnexpectedFormat`] if the body is empty, is not
/// UTF-8, or does not start with `ret=`. The same error is returned for a
/// segment without `=` and for a second `ret` segment.
///
/// # Examples
///
/// ```
/// use daikin_lib::wire::decode;
///
/// let record = decode(b"ret=OK,htemp=23.5,otemp=-").unwrap();
/// assert_eq!(record.get("ret"), Some("OK"));
/// assert_eq!(record.get("otemp"), Some("-"));
///
/// assert!(decode(b"").is_err());
/// assert!(decode(b"DAIKIN_UDP/common/basic_info").is_err());
/// ```
pub fn decode(bytes: &[u8]) -> Result<RawRecord, ParseError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ParseError::UnexpectedFormat(format!("response is not UTF-8: {e}")))?
        .trim();

    if text.is_empty() {
        return Err(ParseError::UnexpectedFormat("empty response".to_string()));
    }

    if !text.starts_with(STATUS_PREFIX) {
        return Err(ParseError::UnexpectedFormat(format!(
            "response does not start with '{STATUS_PREFIX}': {}",
            truncate(text)
        )));
    }

    let mut record = RawRecord::new();
    for (index, segment) in text.split(',').filter(|s| !s.is_empty()).enumerate() {
        let (key, value) = segment.split_once('=').ok_or_else(|| {
            ParseError::UnexpectedFormat(format!("segment without '=': {}", truncate(segment)))
        })?;
        // The status is the first segment only.
        if index > 0 && key == STATUS_KEY {
            return Err(ParseError::UnexpectedFormat(format!(
                "repeated '{STATUS_KEY}' segment: {}",
                truncate(segment)
            )));
        }
        record.insert(key, value);
    }

    Ok(record)
}

/// Encodes a record as an HTTP query string.
///
/// Pairs are joined with `&` and values are percent-encoded. Keys are
/// protocol identifiers and are emitted as-is.
///
/// # Examples
///
/// ```
/// use daikin_lib::wire::{RawRecord, encode_query};
///
/// let record: RawRecord = [("pow", "1"), ("stemp", "24.0")].into_iter().collect();
/// assert_eq!(encode_query(&record), "pow=1&stemp=24.0");
/// ```
#[must_use]
pub fn encode_query(record: &RawRecord) -> String {
    record
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Renders a record in response shape, prefixed with `ret=OK`.
///
/// This is the inverse of [`decode`] for values free of `,` and `=`. A `ret`
/// entry in `record` is ignored.
#[must_use]
pub fn encode_response(record: &RawRecord) -> String {
    std::iter::once(format!("{STATUS_PREFIX}OK"))
        .chain(
            record
                .iter()
                .filter(|(k, _)| *k != STATUS_KEY)
                .map(|(k, v)| format!("{k}={v}")),
        )
        .collect::<Vec<_>>()
        .join(",")
}

/// Shortens text quoted in error messages.
fn truncate(text: &str) -> &str {
    const MAX: usize = 64;
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_splits_on_first_equals() {
        let record = decode(b"ret=OK,name=%4c%69%76%69%6e%67,grp_name=a=b").unwrap();
        assert_eq!(record.get("name"), Some("%4c%69%76%69%6e%67"));
        assert_eq!(record.get("grp_name"), Some("a=b"));
    }

    #[test]
    fn decode_keeps_status_and_unknown_keys() {
        let record = decode(b"ret=OK,port=30050,future_key=xyz").unwrap();
        assert_eq!(record.get("ret"), Some("OK"));
        assert_eq!(record.get("port"), Some("30050"));
        assert_eq!(record.get("future_key"), Some("xyz"));
    }

    #[test]
    fn decode_tolerates_trailing_newline_and_comma() {
        let record = decode(b"ret=OK,pow=1,\r\n").unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("pow"), Some("1"));
    }

    #[test]
    fn decode_empty_value() {
        let record = decode(b"ret=OK,adp_kind=").unwrap();
        assert_eq!(record.get("adp_kind"), Some(""));
    }

    #[test]
    fn decode_rejects_empty_input() {
        assert!(matches!(decode(b""), Err(ParseError::UnexpectedFormat(_))));
        assert!(matches!(decode(b"  \n"), Err(ParseError::UnexpectedFormat(_))));
    }

    #[test]
    fn decode_rejects_missing_status_prefix() {
        assert!(matches!(
            decode(b"pow=1,ret=OK"),
            Err(ParseError::UnexpectedFormat(_))
        ));
        assert!(matches!(
            decode(b"<html>Not Found</html>"),
            Err(ParseError::UnexpectedFormat(_))
        ));
    }

    #[test]
    fn decode_rejects_segment_without_separator() {
        assert!(matches!(
            decode(b"ret=OK,garbage"),
            Err(ParseError::UnexpectedFormat(_))
        ));
    }

    #[test]
    fn decode_rejects_repeated_status() {
        for body in [
            &b"ret=OK,pow=1,ret=PARAM NG"[..],
            &b"ret=PARAM NG,pow=1,ret=OK"[..],
        ] {
            assert!(matches!(decode(body), Err(ParseError::UnexpectedFormat(_))));
        }
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        assert!(matches!(
            decode(&[b'r', b'e', b't', b'=', 0xff, 0xfe]),
            Err(ParseError::UnexpectedFormat(_))
        ));
    }

    #[test]
    fn encode_query_percent_encodes_values() {
        let record: RawRecord = [("name", "Living room"), ("f_rate", "A")]
            .into_iter()
            .collect();
        assert_eq!(encode_query(&record), "f_rate=A&name=Living%20room");
    }

    #[test]
    fn encode_query_empty_record() {
        assert_eq!(encode_query(&RawRecord::new()), "");
    }

    #[test]
    fn response_shape_round_trips() {
        let record: RawRecord = [
            ("pow", "1"),
            ("mode", "3"),
            ("stemp", "22.0"),
            ("shum", "0"),
            ("f_rate", "A"),
            ("f_dir", "0"),
        ]
        .into_iter()
        .collect();

        let body = encode_response(&record);
        assert!(body.starts_with("ret=OK,"));

        let mut decoded = decode(body.as_bytes()).unwrap();
        assert_eq!(decoded.remove("ret").as_deref(), Some("OK"));
        assert_eq!(decoded, record);
    }

    #[test]
    fn truncate_limits_length() {
        let long = "x".repeat(200);
        assert_eq!(truncate(&long).len(), 64);
        assert_eq!(truncate("short"), "short");
    }
}
