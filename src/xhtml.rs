//! XHTML document templates.
//!
//! `epub-builder` stores content bytes verbatim, so chapter fragments and the
//! table-of-contents page are wrapped into complete XHTML documents here.

/// Wrap an XHTML fragment into a complete chapter document.
pub(crate) fn document(title: &str, language: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html
 xmlns="http://www.w3.org/1999/xhtml"
 xmlns:epub="http://www.idpf.org/2007/ops"
 xml:lang="{}"
>
<head>
<meta charset="UTF-8"/>
<title>{}</title>
</head>
<body>
{}
</body>
</html>"#,
        language, title, body
    )
}

/// Build the visible navigation page: an ordered list with one link per
/// (file name, title) entry, in entry order.
pub(crate) fn nav_page(language: &str, entries: &[(String, String)]) -> String {
    let items: Vec<String> = entries
        .iter()
        .map(|(file_name, title)| format!(r#"<li><a href="{}">{}</a></li>"#, file_name, title))
        .collect();

    let body = format!(
        "<nav epub:type=\"toc\">\n<ol>\n{}\n</ol>\n</nav>",
        items.join("\n")
    );
    document("Table of Contents", language, &body)
}
