//! Limit/offset handling shared by the list and text endpoints.
//!
//! A client may only shrink the page size below the default, never grow it.
//! The offset is taken as given and validated later by [`safe_slice`] (or by
//! the storage engine for database queries).

use crate::error::PaginationError;

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_OFFSET: i64 = 0;

/// Raw pagination query parameters. Kept as strings so a malformed number
/// falls back to the default instead of rejecting the request.
#[derive(Debug, Default)]
pub struct PaginationParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// First value of `key` among decoded query pairs. Repeats are ignored.
pub fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

impl PaginationParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            limit: first_value(pairs, "limit"),
            offset: first_value(pairs, "offset"),
        }
    }

    pub fn limit_and_offset(&self, default_limit: i64, default_offset: i64) -> (i64, i64) {
        parse_limit_and_offset(
            self.limit.as_deref(),
            self.offset.as_deref(),
            default_limit,
            default_offset,
        )
    }
}

pub fn parse_limit_and_offset(
    limit: Option<&str>,
    offset: Option<&str>,
    default_limit: i64,
    default_offset: i64,
) -> (i64, i64) {
    let mut parsed_limit = default_limit;
    if let Some(Ok(value)) = limit.map(|s| s.parse::<i64>()) {
        if value <= parsed_limit {
            parsed_limit = value;
        }
    }

    let parsed_offset = match offset.map(|s| s.parse::<i64>()) {
        Some(Ok(value)) => value,
        _ => default_offset,
    };

    (parsed_limit, parsed_offset)
}

/// Returns `items[offset..min(offset + limit, len)]`, or an empty slice when
/// the offset is past the end.
pub fn safe_slice<T>(offset: i64, limit: i64, items: &[T]) -> Result<&[T], PaginationError> {
    if limit < 0 || offset < 0 {
        return Err(PaginationError::InvalidRange);
    }

    let len = items.len();
    let start = usize::try_from(offset).unwrap_or(usize::MAX);
    if items.is_empty() || start >= len {
        return Ok(&[]);
    }

    let end = offset
        .saturating_add(limit)
        .try_into()
        .map_or(len, |end: usize| end.min(len));

    Ok(&items[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_params() {
        assert_eq!(
            parse_limit_and_offset(None, None, DEFAULT_LIMIT, DEFAULT_OFFSET),
            (10, 0)
        );
        assert_eq!(PaginationParams::default().limit_and_offset(10, 0), (10, 0));
    }

    #[test]
    fn test_limit_only_shrinks() {
        assert_eq!(parse_limit_and_offset(Some("5"), None, 10, 0), (5, 0));
        assert_eq!(parse_limit_and_offset(Some("10"), None, 10, 0), (10, 0));
        assert_eq!(parse_limit_and_offset(Some("11"), None, 10, 0), (10, 0));
        assert_eq!(parse_limit_and_offset(Some("1000"), None, 10, 0), (10, 0));
    }

    #[test]
    fn test_zero_and_negative_limit_are_accepted() {
        assert_eq!(parse_limit_and_offset(Some("0"), None, 10, 0), (0, 0));
        assert_eq!(parse_limit_and_offset(Some("-3"), None, 10, 0), (-3, 0));
    }

    #[test]
    fn test_offset_is_not_clamped() {
        assert_eq!(parse_limit_and_offset(None, Some("250"), 10, 0), (10, 250));
        assert_eq!(parse_limit_and_offset(None, Some("-1"), 10, 0), (10, -1));
    }

    #[test]
    fn test_malformed_values_fall_back() {
        assert_eq!(parse_limit_and_offset(Some("ten"), Some("1.5"), 10, 2), (10, 2));
        assert_eq!(parse_limit_and_offset(Some(""), Some(""), 10, 0), (10, 0));
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_params_from_query_pairs() {
        let params = PaginationParams::from_pairs(&pairs(&[("limit", "3"), ("offset", "abc")]));
        assert_eq!(params.limit_and_offset(10, 0), (3, 0));

        let params = PaginationParams::from_pairs(&pairs(&[("group", "Muse")]));
        assert_eq!(params.limit_and_offset(10, 0), (10, 0));
    }

    #[test]
    fn test_repeated_params_take_first_value() {
        let params = PaginationParams::from_pairs(&pairs(&[
            ("limit", "5"),
            ("offset", "2"),
            ("limit", "6"),
            ("offset", "9"),
        ]));
        assert_eq!(params.limit.as_deref(), Some("5"));
        assert_eq!(params.limit_and_offset(10, 0), (5, 2));
    }

    #[test]
    fn test_slice_within_bounds() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(safe_slice(0, 2, &items).unwrap(), &[1, 2]);
        assert_eq!(safe_slice(1, 3, &items).unwrap(), &[2, 3, 4]);
        assert_eq!(safe_slice(3, 10, &items).unwrap(), &[4, 5]);
        assert_eq!(safe_slice(0, 0, &items).unwrap(), &[] as &[i32]);
    }

    #[test]
    fn test_slice_past_end_is_empty() {
        let items = ["a", "b"];
        assert!(safe_slice(2, 1, &items).unwrap().is_empty());
        assert!(safe_slice(i64::MAX, i64::MAX, &items).unwrap().is_empty());
        assert!(safe_slice(0, 5, &[] as &[&str]).unwrap().is_empty());
    }

    #[test]
    fn test_slice_huge_limit_does_not_overflow() {
        let items = [1, 2, 3];
        assert_eq!(safe_slice(1, i64::MAX, &items).unwrap(), &[2, 3]);
    }

    #[test]
    fn test_slice_rejects_negative_range() {
        let items = [1, 2, 3];
        assert_eq!(safe_slice(-1, 2, &items), Err(PaginationError::InvalidRange));
        assert_eq!(safe_slice(0, -2, &items), Err(PaginationError::InvalidRange));
        assert_eq!(safe_slice(-1, 2, &[] as &[i32]), Err(PaginationError::InvalidRange));
    }

    #[test]
    fn test_slice_length_matches_window() {
        let items: Vec<i32> = (0..7).collect();
        for offset in 0..10_i64 {
            for limit in 0..10_i64 {
                let slice = safe_slice(offset, limit, &items).unwrap();
                let expected = limit.min((items.len() as i64 - offset).max(0)) as usize;
                assert_eq!(slice.len(), expected);
                if let Some(first) = slice.first() {
                    assert_eq!(*first as i64, offset);
                }
            }
        }
    }
}
