/// HTML-escape a string for text and attribute positions
///
/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape for XML text nodes (sitemap)
pub fn xml_escape(s: &str) -> String {
    html_escape(s).replace("&#x27;", "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;"
        );
        assert_eq!(html_escape("zażółć gęślą jaźń"), "zażółć gęślą jaźń");
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("a'b&c"), "a&apos;b&amp;c");
    }
}
