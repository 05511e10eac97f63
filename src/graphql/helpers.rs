/// Clamps GraphQL pagination arguments the same way the REST query params are.
pub fn page_bounds(offset: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    (offset.unwrap_or(0).max(0), limit.unwrap_or(20).clamp(1, 100))
}
