//! Keyword denylist scan.

use super::{QueryCheck, Rejection};

/// Lowercase keywords that mark a query as mutating.
pub const DENYLIST: [&str; 7] = [
    "remove", "drop", "delete", "insert", "update", "save", "write",
];

/// Checks query text against the denylist.
///
/// Matching is case-insensitive and by substring, so `deleted_at` or
/// `"Drop zone"` are rejected as well. Whitespace-only text is not treated as
/// empty; it is left for the backend to fail on.
pub fn check_query(query: Option<&str>) -> QueryCheck {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return QueryCheck::Rejected(Rejection::Empty);
    };

    let lowered = query.to_lowercase();
    DENYLIST
        .iter()
        .copied()
        .find(|keyword| lowered.contains(keyword))
        .map(|keyword| QueryCheck::Rejected(Rejection::Keyword(keyword)))
        .unwrap_or(QueryCheck::Allowed)
}
