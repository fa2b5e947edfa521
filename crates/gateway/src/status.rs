//! Static HTTP status → human-readable reason table.

/// Map a non-success gateway HTTP status to the reason recorded for the
/// recipient. Statuses outside the table render as `HTTP {code}`.
pub fn reason_for_status(code: u16) -> String {
    match code {
        400 => "Bad Request - malformed request payload".to_string(),
        401 => "Unauthorized - invalid API key".to_string(),
        403 => "Forbidden - insufficient permissions".to_string(),
        404 => "Not Found - unknown endpoint".to_string(),
        500 => "Internal Server Error".to_string(),
        503 => "Service Unavailable".to_string(),
        other => format!("HTTP {}", other),
    }
}
