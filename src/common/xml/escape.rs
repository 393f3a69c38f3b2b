use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

/// Escape XML special characters.
///
/// Control characters other than tab, line feed and carriage return are not
/// allowed in XML 1.0 and are dropped.
///
/// # Examples
///
/// ```
/// use slidewright::common::xml::escape_xml;
/// assert_eq!(escape_xml("Bees & Wasps"), "Bees &amp; Wasps");
/// assert_eq!(escape_xml("<b>\"hive\"</b>"), "&lt;b&gt;&quot;hive&quot;&lt;/b&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    let escaped = XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"]);
    if escaped.contains(is_disallowed_control) {
        escaped.chars().filter(|&c| !is_disallowed_control(c)).collect()
    } else {
        escaped
    }
}

#[inline]
fn is_disallowed_control(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_leaves_plain_text() {
        assert_eq!(escape_xml("Habitat"), "Habitat");
    }

    #[test]
    fn test_escape_apostrophe_and_ampersand() {
        assert_eq!(escape_xml("bee's & hive"), "bee&apos;s &amp; hive");
    }

    #[test]
    fn test_escape_drops_disallowed_controls() {
        assert_eq!(escape_xml("Nectar\u{0C} and\u{0B} pollen\u{0}"), "Nectar and pollen");
        assert_eq!(escape_xml("a\tb\r\nc"), "a\tb\r\nc");
    }
}
