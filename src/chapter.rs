use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Matches any HTML tag, for stripping tags out of display titles
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Matches <img ... src="..." ...> with single or double quotes,
/// attributes allowed on either side of src
static IMG_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img\s+[^>]*src\s*=\s*["']([^"']+)["'][^>]*>"#).unwrap());

/// One titled unit of book content, normalized to an XHTML fragment.
pub struct Chapter {
    /// Display title. For HTML chapters this is the tag-stripped title.
    pub title: String,
    /// XHTML fragment used as the chapter body
    pub content: String,
    /// Language tag, defaults to "eng"
    pub language: String,
}

impl Chapter {
    /// Build a chapter from plain text. The title becomes an `<h1>` and each
    /// newline-delimited line becomes a `<p>` (empty lines included).
    pub fn from_text(title: &str, text: &str) -> Self {
        let mut content = format!("<h1>{}</h1>", title);
        for line in text.split('\n') {
            content.push_str(&format!("<p>{}</p>", line));
        }

        Self {
            title: title.to_string(),
            content,
            language: "eng".to_string(),
        }
    }

    /// Build a chapter from pre-formatted HTML. The tagged title and body are
    /// concatenated verbatim as content; only the display title is stripped
    /// of tags.
    pub fn from_html(title: &str, body: &str) -> Self {
        Self {
            title: strip_tags(title),
            content: format!("{}{}", title, body),
            language: "eng".to_string(),
        }
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    /// Distinct local image paths referenced by `<img src="...">` in the
    /// current content, in order of first appearance. Recomputed on every
    /// call so it never goes stale after content rewrites.
    pub fn image_paths(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut paths = Vec::new();

        for caps in IMG_SRC_RE.captures_iter(&self.content) {
            let path = caps[1].to_string();
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }

        paths
    }
}

/// Best-effort tag removal. Not a parser: unbalanced markup outside
/// recognized `<...>` runs passes through unchanged.
fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_chapter_wraps_title_and_lines() {
        let chapter = Chapter::from_text("T", "a\nb");
        assert_eq!(chapter.content, "<h1>T</h1><p>a</p><p>b</p>");
        assert_eq!(chapter.title, "T");
    }

    #[test]
    fn empty_lines_become_empty_paragraphs() {
        let chapter = Chapter::from_text("T", "a\n\nb");
        assert_eq!(chapter.content, "<h1>T</h1><p>a</p><p></p><p>b</p>");
    }

    #[test]
    fn html_chapter_strips_title_tags_but_keeps_content_verbatim() {
        let chapter = Chapter::from_html("<h1>T</h1>", "<p>body</p>");
        assert_eq!(chapter.title, "T");
        assert_eq!(chapter.content, "<h1>T</h1><p>body</p>");
    }

    #[test]
    fn malformed_title_passes_through_outside_tags() {
        let chapter = Chapter::from_html("<h1>T</h1> < open", "");
        assert_eq!(chapter.title, "T < open");
    }

    #[test]
    fn default_language_is_eng() {
        assert_eq!(Chapter::from_text("T", "a").language, "eng");
        assert_eq!(
            Chapter::from_text("T", "a").with_language("ru").language,
            "ru"
        );
    }

    #[test]
    fn image_paths_handles_quote_styles_and_attribute_order() {
        let chapter = Chapter::from_html(
            "T",
            r#"<img src="a.jpg" alt="x"/>
               <img alt='y' src='b.png'/>
               <img class="z" src="c.gif" width="10"/>"#,
        );
        assert_eq!(chapter.image_paths(), vec!["a.jpg", "b.png", "c.gif"]);
    }

    #[test]
    fn image_paths_deduplicates_repeated_references() {
        let chapter = Chapter::from_html(
            "T",
            r#"<img src="a.jpg"/><p>mid</p><img src="a.jpg"/><img src="b.jpg"/>"#,
        );
        assert_eq!(chapter.image_paths(), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn image_paths_is_empty_without_images() {
        assert!(Chapter::from_text("T", "no pictures").image_paths().is_empty());
    }
}
