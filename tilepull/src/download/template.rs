//! Tile URL templating.

use crate::coord::TileCoord;

use super::error::DownloadError;

/// Placeholders every tile URL template must contain.
const PLACEHOLDERS: [&str; 3] = ["{z}", "{x}", "{y}"];

/// A tile URL template containing `{z}`, `{x}` and `{y}` placeholders.
///
/// Construction validates that all three placeholders are present;
/// [`UrlTemplate::fill`] substitutes the first occurrence of each with the
/// coordinate's decimal representation.
#[derive(Debug, Clone)]
pub struct UrlTemplate {
    template: String,
}

impl UrlTemplate {
    /// Validates and wraps a template string.
    pub fn new(template: impl Into<String>) -> Result<Self, DownloadError> {
        let template = template.into();

        for placeholder in PLACEHOLDERS {
            if !template.contains(placeholder) {
                return Err(DownloadError::BadTemplate {
                    url: template,
                    placeholder,
                });
            }
        }

        Ok(Self { template })
    }

    /// Builds the URL for one tile.
    pub fn fill(&self, coord: &TileCoord) -> String {
        self.template
            .replacen("{z}", &coord.zoom.to_string(), 1)
            .replacen("{x}", &coord.x.to_string(), 1)
            .replacen("{y}", &coord.y.to_string(), 1)
    }

    /// The raw template string.
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_substitutes_all_placeholders() {
        let template = UrlTemplate::new("https://x/{z}/{x}/{y}.png").unwrap();
        let url = template.fill(&TileCoord::new(1, 2, 3));
        assert_eq!(url, "https://x/3/1/2.png");
    }

    #[test]
    fn test_fill_replaces_only_the_first_occurrence() {
        let template = UrlTemplate::new("https://{z}/{x}/{y}?echo={z}").unwrap();
        let url = template.fill(&TileCoord::new(7, 8, 9));
        assert_eq!(url, "https://9/7/8?echo={z}");
    }

    #[test]
    fn test_fill_with_negative_coordinates() {
        // Degenerate bounds can project to negative indices; they still
        // substitute as plain decimal strings.
        let template = UrlTemplate::new("https://x/{z}/{x}/{y}").unwrap();
        let url = template.fill(&TileCoord::new(-1, -6, 2));
        assert_eq!(url, "https://x/2/-1/-6");
    }

    #[test]
    fn test_missing_placeholder_is_rejected() {
        let err = UrlTemplate::new("https://x/{z}/{x}.png").unwrap_err();
        match err {
            DownloadError::BadTemplate { placeholder, .. } => assert_eq!(placeholder, "{y}"),
            other => panic!("expected BadTemplate, got {other:?}"),
        }
    }
}
