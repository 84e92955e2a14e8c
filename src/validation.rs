/// Region used when the caller supplies nothing. Clients default to it.
pub const DEFAULT_REGION: &str = "us-east-1";

/// True for `None`, the empty string and whitespace-only strings.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Lower-cases a region code, substituting [`DEFAULT_REGION`] for blank input.
/// The region syntax itself is not checked.
pub fn normalize_region(region: &str) -> String {
    if is_blank(Some(region)) {
        DEFAULT_REGION.to_string()
    } else {
        region.to_lowercase()
    }
}

/// Validate stored credential ids: non-empty, no whitespace or control characters.
pub fn is_valid_credentials_id(id: &str) -> bool {
    !id.is_empty() && !id.chars().any(|c| c.is_whitespace() || c.is_control())
}
