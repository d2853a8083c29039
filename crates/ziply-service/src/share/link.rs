//! Link content normalization.

use ziply_core::AppError;
use ziply_core::result::AppResult;

/// Trim the link and prefix `https://` when no http(s) scheme is present.
pub fn normalize_link(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Link content is required"));
    }

    let lower = trimmed.get(..8).unwrap_or(trimmed).to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("https://{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_link() {
        assert_eq!(normalize_link("example.com").unwrap(), "https://example.com");
        assert_eq!(normalize_link("  http://a.io/x ").unwrap(), "http://a.io/x");
        assert_eq!(normalize_link("HTTPS://A.io").unwrap(), "HTTPS://A.io");
        assert_eq!(normalize_link("ftp://a.io").unwrap(), "https://ftp://a.io");
        assert!(normalize_link("   ").is_err());
    }
}
