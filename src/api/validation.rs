use super::ApiError;

/// Order ids arrive as raw path segments; anything that is not a positive
/// `i32` is treated as an order that does not exist.
pub fn validate_order_id(raw: &str) -> Result<i32, ApiError> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::NotFound("Order not found".to_string())),
    }
}

/// Search input is optional; surrounding whitespace never counts.
pub fn normalize_search_query(query: &str) -> &str {
    query.trim()
}
