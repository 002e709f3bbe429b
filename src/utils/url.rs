//! URL helpers for building Gemini endpoints.
//!
//! Base URLs come from user configuration and may carry trailing slashes; model
//! identifiers may be given either bare (`gemini-2.5-flash`) or in the resource
//! form the API lists them in (`models/gemini-2.5-flash`).

/// Normalize a base URL by removing trailing slashes.
///
/// ```
/// use spark::utils::url::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("https://generativelanguage.googleapis.com/v1beta/"),
///     "https://generativelanguage.googleapis.com/v1beta"
/// );
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash between them.
///
/// ```
/// use spark::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://example.test/v1beta/", "/models"),
///     "https://example.test/v1beta/models"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}

/// Path of the `generateContent` action for a model, relative to the API base.
pub fn generate_content_path(model: &str) -> String {
    let model = model.trim();
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!("models/{model}:generateContent")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_slashes_and_whitespace() {
        assert_eq!(
            normalize_base_url("https://example.test/v1beta"),
            "https://example.test/v1beta"
        );
        assert_eq!(
            normalize_base_url("https://example.test/v1beta///"),
            "https://example.test/v1beta"
        );
        assert_eq!(
            normalize_base_url("  https://example.test/ \n"),
            "https://example.test"
        );
    }

    #[test]
    fn construct_avoids_double_slashes() {
        let expected = "https://example.test/v1beta/models";
        assert_eq!(construct_api_url("https://example.test/v1beta", "models"), expected);
        assert_eq!(construct_api_url("https://example.test/v1beta/", "models"), expected);
        assert_eq!(construct_api_url("https://example.test/v1beta", "/models"), expected);
        assert_eq!(construct_api_url("https://example.test/v1beta//", "//models"), expected);
    }

    #[test]
    fn generate_content_path_accepts_resource_names() {
        assert_eq!(
            generate_content_path("gemini-2.5-flash"),
            "models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            generate_content_path("models/gemini-2.5-flash"),
            "models/gemini-2.5-flash:generateContent"
        );
    }
}
