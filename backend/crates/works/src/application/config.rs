//! Application Configuration
//!
//! Input limits for the content application layer.

/// Works application configuration
#[derive(Debug, Clone)]
pub struct WorksConfig {
    /// Max characters in a work title
    pub work_title_max: usize,
    pub description_max: usize,
    /// Max entries in genres / tags / content warnings
    pub list_max_items: usize,
    /// Max characters per genre or tag
    pub label_max: usize,
    pub content_warning_max: usize,
    pub language_max: usize,
    pub chapter_title_max: usize,
    pub chapter_number_max: i32,
    /// Max characters of prose in a text chapter
    pub text_content_max: usize,
    /// Max pages in an image chapter
    pub image_pages_max: usize,
    pub url_max: usize,
    pub comment_max: usize,
    pub feedback_name_max: usize,
    pub feedback_message_max: usize,
}

impl Default for WorksConfig {
    fn default() -> Self {
        Self {
            work_title_max: 120,
            description_max: 5000,
            list_max_items: 20,
            label_max: 40,
            content_warning_max: 80,
            language_max: 40,
            chapter_title_max: 200,
            chapter_number_max: 100_000,
            text_content_max: 200_000,
            image_pages_max: 500,
            url_max: 2048,
            comment_max: 1000,
            feedback_name_max: 80,
            feedback_message_max: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = WorksConfig::default();
        assert_eq!(config.work_title_max, 120);
        assert_eq!(config.chapter_title_max, 200);
        assert_eq!(config.comment_max, 1000);
        assert_eq!(config.image_pages_max, 500);
    }
}
