//! Recognizers for the lexical pieces the binder steps over.

use super::PlaceholderStyle;

fn has_pair(bytes: &[u8], idx: usize, pair: [u8; 2]) -> bool {
    bytes.get(idx..idx + 2) == Some(&pair[..])
}

/// `--` opens a comment to end of line in every dialect; MySQL also accepts `#`.
pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize, style: PlaceholderStyle) -> bool {
    has_pair(bytes, idx, *b"--")
        || (style == PlaceholderStyle::Mysql && bytes.get(idx) == Some(&b'#'))
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    has_pair(bytes, idx, *b"/*")
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    has_pair(bytes, idx, *b"*/")
}

/// Postgres dollar-quote opener at `start`: `$$` or `$tag$`.
///
/// Returns the tag (empty for `$$`) and the index of the `$` that ends the opener. A tag
/// cannot begin with a digit, so positional `$1` is never taken for an opener.
pub(super) fn try_start_dollar_quote(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let rest = bytes.get(start + 1..)?;
    let len = rest
        .iter()
        .position(|b| !(b.is_ascii_alphanumeric() || *b == b'_'))?;
    if rest[len] != b'$' || rest.first().is_some_and(u8::is_ascii_digit) {
        return None;
    }
    let tag = std::str::from_utf8(&rest[..len]).ok()?;
    Some((tag.to_owned(), start + 1 + len))
}

/// True when `$tag$` closes at `idx`.
pub(super) fn matches_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    match bytes.get(idx..) {
        Some([b'$', rest @ ..]) => {
            rest.starts_with(tag.as_bytes()) && rest.get(tag.len()) == Some(&b'$')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_comments_are_mysql_only() {
        let sql = b"# note";
        assert!(is_line_comment_start(sql, 0, PlaceholderStyle::Mysql));
        assert!(!is_line_comment_start(sql, 0, PlaceholderStyle::Postgres));
        assert!(is_line_comment_start(b"-- x", 0, PlaceholderStyle::Sqlite));
    }

    #[test]
    fn dollar_quote_openers() {
        assert_eq!(try_start_dollar_quote(b"$$ body $$", 0), Some((String::new(), 1)));
        assert_eq!(
            try_start_dollar_quote(b"x $fn$ body $fn$", 2),
            Some(("fn".to_owned(), 5))
        );
        assert_eq!(try_start_dollar_quote(b"$1$", 0), None);
        assert_eq!(try_start_dollar_quote(b"$1 AND", 0), None);
    }

    #[test]
    fn closing_tag_must_match_exactly() {
        let sql = b"$fn$ $f$ $fn$";
        assert!(!matches_tag(sql, 5, "fn"));
        assert!(matches_tag(sql, 9, "fn"));
        assert!(!matches_tag(b"$fn", 0, "fn"));
    }
}
