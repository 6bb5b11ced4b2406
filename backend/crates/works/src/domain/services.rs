//! Domain Services
//!
//! Pure input cleaning and the moderation transition check.

use url::Url;

use crate::application::config::WorksConfig;
use crate::domain::value_objects::{ChapterContent, ModerationStatus};
use crate::error::{WorksError, WorksResult};

/// `<` followed by at least one non-`>` character and a closing `>`.
pub fn has_html_like_tag(value: &str) -> bool {
    let mut rest = value;
    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        match after.find('>') {
            Some(close) if close > 0 => return true,
            Some(_) => rest = &after[1..],
            None => return false,
        }
    }
    false
}

/// Trim and check length (in characters) and absence of markup.
pub fn clean_text(label: &str, value: &str, min: usize, max: usize) -> WorksResult<String> {
    let trimmed = value.trim();
    let length = trimmed.chars().count();

    if length < min || length > max {
        return Err(WorksError::Validation(if min > 0 {
            format!("{label} must be between {min} and {max} characters")
        } else {
            format!("{label} cannot exceed {max} characters")
        }));
    }
    if has_html_like_tag(trimmed) {
        return Err(WorksError::Validation(format!(
            "{label} must not contain HTML tags"
        )));
    }

    Ok(trimmed.to_string())
}

/// Optional free text; blank becomes `None`.
pub fn clean_optional_text(
    label: &str,
    value: Option<&str>,
    max: usize,
) -> WorksResult<Option<String>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => clean_text(label, v, 1, max).map(Some),
        None => Ok(None),
    }
}

pub fn clean_list(
    label: &str,
    items: &[String],
    max_items: usize,
    item_max: usize,
) -> WorksResult<Vec<String>> {
    if items.len() > max_items {
        return Err(WorksError::Validation(format!(
            "{label} must have at most {max_items} items"
        )));
    }
    items
        .iter()
        .map(|item| clean_text(label, item, 1, item_max))
        .collect()
}

/// Absolute `http`/`https` URL.
pub fn clean_http_url(label: &str, value: &str, max: usize) -> WorksResult<String> {
    let trimmed = value.trim();
    let invalid = || WorksError::Validation(format!("{label} must be a valid http(s) URL"));

    if trimmed.is_empty() || trimmed.len() > max {
        return Err(invalid());
    }
    let url = Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }

    Ok(trimmed.to_string())
}

/// Non-empty prose, or a non-empty list of page image URLs.
pub fn clean_content(content: &ChapterContent, config: &WorksConfig) -> WorksResult<ChapterContent> {
    const MESSAGE: &str = "Content must be non-empty text or a non-empty array of valid image URLs";

    match content {
        ChapterContent::Text(text) => {
            let trimmed = text.trim();
            let length = trimmed.chars().count();
            if length == 0 || length > config.text_content_max {
                return Err(WorksError::Validation(MESSAGE.into()));
            }
            Ok(ChapterContent::Text(trimmed.to_string()))
        }
        ChapterContent::Images(pages) => {
            if pages.is_empty() || pages.len() > config.image_pages_max {
                return Err(WorksError::Validation(MESSAGE.into()));
            }
            let pages = pages
                .iter()
                .map(|page| clean_http_url("Image URL", page, config.url_max))
                .collect::<WorksResult<Vec<_>>>()
                .map_err(|_| WorksError::Validation(MESSAGE.into()))?;
            Ok(ChapterContent::Images(pages))
        }
    }
}

/// Moderation state machine: only the listed moves are legal.
pub fn check_transition(from: ModerationStatus, to: ModerationStatus) -> WorksResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(WorksError::InvalidTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_like_tags() {
        assert!(has_html_like_tag("<b>bold</b>"));
        assert!(has_html_like_tag("x <script src=a> y"));
        assert!(!has_html_like_tag("1 < 2"));
        assert!(!has_html_like_tag("<>"));
        assert!(!has_html_like_tag("plain text"));
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("Title", "  Hello  ", 1, 10).unwrap(), "Hello");
        assert!(clean_text("Title", "   ", 1, 10).is_err());
        assert!(clean_text("Title", "x".repeat(11).as_str(), 1, 10).is_err());
        assert!(clean_text("Title", "<i>x</i>", 1, 20).is_err());
        // Length is counted in characters, not bytes
        assert!(clean_text("Title", "ééééé", 1, 5).is_ok());
    }

    #[test]
    fn test_clean_optional_text() {
        assert_eq!(clean_optional_text("Language", Some("  "), 40).unwrap(), None);
        assert_eq!(
            clean_optional_text("Language", Some(" en "), 40).unwrap(),
            Some("en".to_string())
        );
        assert_eq!(clean_optional_text("Language", None, 40).unwrap(), None);
    }

    #[test]
    fn test_clean_list() {
        let items = vec!["action".to_string(), " drama ".to_string()];
        assert_eq!(
            clean_list("Genre", &items, 20, 40).unwrap(),
            vec!["action", "drama"]
        );
        assert!(clean_list("Genre", &vec!["a".to_string(); 21], 20, 40).is_err());
        assert!(clean_list("Genre", &["".to_string()], 20, 40).is_err());
    }

    #[test]
    fn test_clean_http_url() {
        assert!(clean_http_url("Cover", "https://cdn.example.com/c.png", 2048).is_ok());
        assert!(clean_http_url("Cover", "http://example.com", 2048).is_ok());
        assert!(clean_http_url("Cover", "javascript:alert(1)", 2048).is_err());
        assert!(clean_http_url("Cover", "ftp://example.com/x", 2048).is_err());
        assert!(clean_http_url("Cover", "not a url", 2048).is_err());
    }

    #[test]
    fn test_clean_content() {
        let config = WorksConfig::default();

        let text = clean_content(&ChapterContent::Text("  It begins. ".into()), &config).unwrap();
        assert_eq!(text, ChapterContent::Text("It begins.".into()));
        assert!(clean_content(&ChapterContent::Text("  ".into()), &config).is_err());

        let pages = ChapterContent::Images(vec!["https://cdn.example/1.png".into()]);
        assert!(clean_content(&pages, &config).is_ok());
        assert!(clean_content(&ChapterContent::Images(vec![]), &config).is_err());
        assert!(
            clean_content(&ChapterContent::Images(vec!["file:///etc/passwd".into()]), &config)
                .is_err()
        );
    }

    #[test]
    fn test_check_transition() {
        use ModerationStatus::*;
        assert!(check_transition(Pending, Published).is_ok());
        assert!(matches!(
            check_transition(Published, Pending),
            Err(WorksError::InvalidTransition {
                from: Published,
                to: Pending
            })
        ));
    }
}
