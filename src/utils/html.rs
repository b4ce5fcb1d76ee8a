use ammonia::Builder;

/// Longest value kept for a single free-text form field.
pub const MAX_FIELD_LEN: usize = 100;

/// Turn untrusted form input into plain, HTML-safe text.
///
/// The input is trimmed and cut to [`MAX_FIELD_LEN`] characters first, then
/// passed through an ammonia builder that allows no tags at all: markup is
/// dropped, text content is kept and characters such as `&` and `<` come
/// out as entities.
pub fn sanitize_text(input: &str) -> String {
    let truncated: String = input.trim().chars().take(MAX_FIELD_LEN).collect();

    Builder::empty()
        .clean(&truncated)
        .to_string()
        .trim()
        .to_string()
}

/// Length of sanitized text as the user typed it: every character entity
/// (`&amp;`, `&lt;`, `&#39;`, ...) counts as one character.
pub fn display_len(sanitized: &str) -> usize {
    let mut len = 0;
    let mut rest = sanitized;

    while let Some(c) = rest.chars().next() {
        let step = entity_len(rest).unwrap_or(c.len_utf8());
        rest = &rest[step..];
        len += 1;
    }
    len
}

/// Byte length of the entity `rest` starts with, if it starts with one.
fn entity_len(rest: &str) -> Option<usize> {
    let body = rest.strip_prefix('&')?;
    let end = body.find(';')?;
    let name = &body[..end];

    let is_entity =
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '#');
    is_entity.then_some(end + 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_keeps_text() {
        assert_eq!(sanitize_text("<b>Ali</b>"), "Ali");
    }

    #[test]
    fn escapes_ampersand() {
        assert_eq!(sanitize_text("Tom & Jerry"), "Tom &amp; Jerry");
    }

    #[test]
    fn trims_and_truncates() {
        assert_eq!(sanitize_text("   Vali  "), "Vali");

        let long = "a".repeat(250);
        assert_eq!(sanitize_text(&long).chars().count(), MAX_FIELD_LEN);
    }

    #[test]
    fn escaping_does_not_count_towards_length() {
        let raw = format!("{}&{}", "a".repeat(49), "b".repeat(50));
        let clean = sanitize_text(&raw);

        assert!(clean.contains("&amp;"));
        assert_eq!(display_len(&clean), 100);
        assert_eq!(display_len("x &lt; y &amp;&amp; z"), 10);
        assert_eq!(display_len("&"), 1);
        assert_eq!(display_len("a & b;"), 6);
    }

    #[test]
    fn keeps_apostrophes_in_names() {
        assert_eq!(sanitize_text("G'ulomov"), "G'ulomov");
    }
}
