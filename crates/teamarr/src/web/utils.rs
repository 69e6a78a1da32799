//! Web utility functions
//!
//! This module provides utility functions for common web operations
//! like logging, metrics, and request processing.

use axum::http::{HeaderMap, Method, Uri};
use tracing::{info, warn};
use uuid::Uuid;

use super::extractors::RequestContext;

/// Log an incoming HTTP request
pub fn log_request(method: &Method, uri: &Uri, context: &RequestContext) {
    info!(
        method = %method,
        uri = %uri,
        request_id = %context.request_id,
        user_agent = ?context.user_agent,
        real_ip = ?context.real_ip,
        "HTTP request"
    );
}

/// Log the completion of an HTTP request
pub fn log_response(
    method: &Method,
    uri: &Uri,
    status: u16,
    context: &RequestContext,
    duration_ms: u64,
) {
    if status >= 400 {
        warn!(
            method = %method,
            uri = %uri,
            status = status,
            request_id = %context.request_id,
            duration_ms = duration_ms,
            "HTTP request completed with error"
        );
    } else {
        info!(
            method = %method,
            uri = %uri,
            status = status,
            request_id = %context.request_id,
            duration_ms = duration_ms,
            "HTTP request completed"
        );
    }
}

/// Extract UUID from path parameter
pub fn extract_uuid_param(param: &str) -> Result<Uuid, String> {
    Uuid::parse_str(param).map_err(|_| format!("Invalid UUID format: {}", param))
}

/// Validate content type for JSON requests
pub fn validate_json_content_type(headers: &HeaderMap) -> Result<(), String> {
    if let Some(content_type) = headers.get("content-type") {
        let content_type_str = content_type
            .to_str()
            .map_err(|_| "Invalid content-type header")?;
        
        if content_type_str.starts_with("application/json") {
            Ok(())
        } else {
            Err(format!("Expected application/json, got: {}", content_type_str))
        }
    } else {
        Err("Missing content-type header".to_string())
    }
}

/// Generate correlation ID for request tracking
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parses a comma-separated query parameter (`?leagues=nfl,nba`) into a
/// list, treating a missing or empty parameter as "no filter".
pub fn parse_comma_separated(value: &Option<String>) -> Vec<String> {
    value
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Same as [`parse_comma_separated`], parsing each entry as a UUID; a
/// malformed entry is dropped rather than failing the whole request.
pub fn parse_comma_separated_uuids(value: &Option<String>) -> Option<Vec<Uuid>> {
    let ids: Vec<Uuid> = parse_comma_separated(value)
        .iter()
        .filter_map(|s| Uuid::parse_str(s).ok())
        .collect();
    if ids.is_empty() { None } else { Some(ids) }
}

/// Sanitize search query to prevent injection attacks
pub fn sanitize_search_query(query: &str) -> String {
    // Remove SQL injection patterns and limit length
    query
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || "-_".contains(*c))
        .take(255)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Helper to build query parameters for services
pub fn build_service_query_params(
    search: Option<String>,
    sort_by: Option<String>,
    sort_ascending: bool,
    page: u32,
    limit: u32,
) -> (Option<String>, Option<String>, bool, Option<u32>, Option<u32>) {
    let sanitized_search = search.map(|s| sanitize_search_query(&s)).filter(|s| !s.is_empty());
    let page_option = if page > 1 { Some(page) } else { None };
    let limit_option = if limit != 50 { Some(limit) } else { None };
    
    (sanitized_search, sort_by, sort_ascending, page_option, limit_option)
}

/// Rate limiting helper (placeholder for future implementation)
pub struct RateLimiter;

impl RateLimiter {
    pub fn new() -> Self {
        Self
    }
    
    pub async fn check_rate_limit(&self, _key: &str) -> Result<(), String> {
        // Rate limiting not implemented yet
        Ok(())
    }
}

/// Request size validation
pub fn validate_request_size(content_length: Option<usize>, max_size: usize) -> Result<(), String> {
    if let Some(size) = content_length {
        if size > max_size {
            return Err(format!("Request too large: {} bytes (max: {})", size, max_size));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_search_query() {
        assert_eq!(sanitize_search_query("normal query"), "normal query");
        assert_eq!(sanitize_search_query("query-with_dashes"), "query-with_dashes");
        assert_eq!(sanitize_search_query("'; DROP TABLE users; --"), " DROP TABLE users ");
        assert_eq!(sanitize_search_query("<script>alert('xss')</script>"), "scriptalertxssscript");
    }

    #[test]
    fn test_extract_uuid_param() {
        let uuid = Uuid::new_v4();
        assert_eq!(extract_uuid_param(&uuid.to_string()).unwrap(), uuid);
        assert!(extract_uuid_param("invalid-uuid").is_err());
    }
}