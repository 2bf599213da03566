//! Query string parsing for the recordings endpoint
//!
//! Values are parsed leniently: `tstart=abc` is a bound of 0, not an error,
//! and a present-but-empty parameter still counts as given.

use std::collections::HashMap;

use crate::index::record::leading_int;
use crate::index::QueryFilter;

/// Characters stripped from both ends of `nest`
const TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Build a [`QueryFilter`] from raw query parameters
pub fn filter_from_params(params: &HashMap<String, String>) -> QueryFilter {
    QueryFilter {
        tstart: params.get("tstart").map(|v| leading_int(v)),
        tend: params.get("tend").map(|v| leading_int(v)),
        nest: params
            .get("nest")
            .map(|v| v.trim_matches(TRIM_CHARS).to_string()),
    }
}
