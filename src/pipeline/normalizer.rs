//! Lexical normalization: raw post body to unique, normalized words
//!
//! Order matters:
//! 1. strip markup (fails closed on an unterminated tag)
//! 2. decode character entities
//! 3. lower-case
//! 4. split on single spaces
//! 5. trim the trim-set from both ends of each token
//! 6. drop empty tokens
//! 7. dedup within the post (first occurrence wins)
//!
//! The tokenizer is deliberately naive: two consecutive spaces yield an empty
//! token (dropped at step 6) and newlines or tabs do not separate words.

use std::collections::HashSet;

/// Default punctuation trimmed from token edges
pub const DEFAULT_TRIM_CHARS: &str = "()[]{}!.,;?'`\"";

/// Elements whose text content is dropped together with the tags
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Characters stripped from both ends of every token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimSet {
    chars: Vec<char>,
}

impl TrimSet {
    pub fn new(chars: &str) -> Self {
        let mut set: Vec<char> = Vec::new();
        for c in chars.chars() {
            if !set.contains(&c) {
                set.push(c);
            }
        }
        Self { chars: set }
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn trim<'a>(&self, token: &'a str) -> &'a str {
        token.trim_matches(|c: char| self.contains(c))
    }
}

impl Default for TrimSet {
    fn default() -> Self {
        Self::new(DEFAULT_TRIM_CHARS)
    }
}

/// Words extracted from a single post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedPost {
    /// Unique words in first-occurrence order
    pub words: Vec<String>,
    /// Raw tokens produced by the space split (before trim/dedup)
    pub total_tokens: usize,
    /// Non-empty tokens dropped because they repeated an earlier word
    pub duplicates: usize,
}

/// One markup construct found at a `<`
enum Markup<'a> {
    /// `<!-- ... -->`
    Comment,
    /// Tag body between `<` and `>`, e.g. `a href="..."` or `/p`
    Tag(&'a str),
}

/// Scan the markup starting at `s` (which begins with `<`)
///
/// Returns the construct and the number of bytes it spans, or `None` if it
/// never terminates. A `>` inside a quoted attribute value does not end the tag.
fn scan_markup(s: &str) -> Option<(Markup<'_>, usize)> {
    if let Some(body) = s.strip_prefix("<!--") {
        let end = body.find("-->")?;
        return Some((Markup::Comment, 4 + end + 3));
    }

    let mut quote: Option<u8> = None;
    let mut last_significant = b'<';
    for (idx, &b) in s.as_bytes().iter().enumerate().skip(1) {
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                    last_significant = b;
                }
            }
            None => match b {
                b'>' => return Some((Markup::Tag(&s[1..idx]), idx + 1)),
                b'"' | b'\'' if last_significant == b'=' => quote = Some(b),
                _ if b.is_ascii_whitespace() => {}
                _ => last_significant = b,
            },
        }
    }
    None
}

/// Remove all markup tags and comments from `input`
///
/// Returns an empty string if a tag or comment is left unterminated, so that
/// partial markup never leaks into tokens or logs.
pub fn strip_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pos = 0;
    let mut skip_until: Option<&'static str> = None;

    loop {
        let open = match skip_until {
            // Raw text: only the matching end tag closes the element
            Some(element) => {
                let closing = format!("</{}", element);
                match input[pos..].to_ascii_lowercase().find(&closing) {
                    Some(offset) => pos + offset,
                    None => return String::new(),
                }
            }
            None => match input[pos..].find('<') {
                Some(offset) => {
                    out.push_str(&input[pos..pos + offset]);
                    pos + offset
                }
                None => break,
            },
        };

        let (markup, len) = match scan_markup(&input[open..]) {
            Some(found) => found,
            None => return String::new(),
        };
        pos = open + len;

        let tag = match markup {
            Markup::Comment => continue,
            Markup::Tag(tag) => tag,
        };

        let name = tag_name(tag);
        match skip_until {
            Some(element) => {
                if tag.starts_with('/') && name == element {
                    skip_until = None;
                }
            }
            None => {
                if !tag.starts_with('/') && !tag.ends_with('/') {
                    skip_until = RAW_TEXT_ELEMENTS.iter().copied().find(|e| *e == name);
                }
            }
        }
    }

    out.push_str(&input[pos..]);
    out
}

/// Lower-cased element name of a tag body such as `/p` or `a href="..."`
fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Decode character-entity escapes (`&amp;`, `&#39;`, `&#x27;`, ...)
pub fn decode_entities(input: &str) -> String {
    html_escape::decode_html_entities(input).into_owned()
}

/// Run the full normalization pipeline over a raw post body
pub fn normalize(content: &str, trim: &TrimSet) -> NormalizedPost {
    let stripped = strip_markup(content);
    let decoded = decode_entities(&stripped);
    let lowered = decoded.to_lowercase();

    let mut result = NormalizedPost::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for token in lowered.split(' ') {
        result.total_tokens += 1;

        let word = trim.trim(token);
        if word.is_empty() {
            continue;
        }

        if seen.insert(word) {
            result.words.push(word.to_string());
        } else {
            result.duplicates += 1;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_simple_tags() {
        assert_eq!(strip_markup("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_markup("no markup here"), "no markup here");
        assert_eq!(strip_markup("line<br/>break"), "linebreak");
    }

    #[test]
    fn test_strip_drops_script_and_style_content() {
        assert_eq!(
            strip_markup("a <script type=\"x\">alert(1)</script>b"),
            "a b"
        );
        assert_eq!(strip_markup("<style>p { color: red }</style>text"), "text");
    }

    #[test]
    fn test_unterminated_tag_fails_closed() {
        assert_eq!(strip_markup("hello <a href=\"x\""), "");
        assert_eq!(strip_markup("<p>ok</p> <"), "");
    }

    #[test]
    fn test_angle_bracket_inside_attribute_value() {
        assert_eq!(
            strip_markup(r#"<a href="https://x.example" title="a>b">link</a> ok"#),
            "link ok"
        );
        assert_eq!(strip_markup("<span title='1 > 0'>quoted</span>"), "quoted");

        let post = normalize(
            r#"<p><a href="https://x.example" title="1 > 0">link</a> ok</p>"#,
            &TrimSet::default(),
        );
        assert_eq!(post.words, vec!["link", "ok"]);
    }

    #[test]
    fn test_comments_removed() {
        assert_eq!(strip_markup("<!-- if a > b --><p>hi</p>"), "hi");
        assert_eq!(strip_markup("before<!-- <b>x</b> -->after"), "beforeafter");
        assert_eq!(strip_markup("text <!-- never closed"), "");
    }

    #[test]
    fn test_script_content_with_angle_brackets() {
        assert_eq!(
            strip_markup("x <SCRIPT>if (a < b && c > d) {}</Script> y"),
            "x  y"
        );
        assert_eq!(strip_markup("<script>no end"), "");
    }

    #[test]
    fn test_entities_decoded_after_stripping() {
        // An escaped tag must survive as literal text, not be stripped
        let post = normalize("<p>&lt;b&gt; fish &amp; chips</p>", &TrimSet::default());
        assert_eq!(post.words, vec!["<b>", "fish", "&", "chips"]);
    }

    #[test]
    fn test_lowercase_and_trim() {
        let post = normalize("The Cat sat on the MAT.", &TrimSet::default());
        assert_eq!(post.words, vec!["the", "cat", "sat", "on", "mat"]);
        assert_eq!(post.total_tokens, 6);
        assert_eq!(post.duplicates, 1);
    }

    #[test]
    fn test_trim_set_punctuation() {
        let post = normalize("(hello) \"world\" [rust]! {ok}? `tick`", &TrimSet::default());
        assert_eq!(post.words, vec!["hello", "world", "rust", "ok", "tick"]);
    }

    #[test]
    fn test_inner_punctuation_kept() {
        let post = normalize("don't e.g. co-op", &TrimSet::default());
        assert_eq!(post.words, vec!["don't", "e.g", "co-op"]);
    }

    #[test]
    fn test_empty_tokens_discarded() {
        let post = normalize("a  ... !!  b", &TrimSet::default());
        assert_eq!(post.words, vec!["a", "b"]);
        assert_eq!(post.duplicates, 0);
    }

    #[test]
    fn test_newline_is_not_a_separator() {
        let post = normalize("one\ntwo three", &TrimSet::default());
        assert_eq!(post.words, vec!["one\ntwo", "three"]);
    }

    #[test]
    fn test_dedup_within_post() {
        let post = normalize("hello Hello HELLO hello!", &TrimSet::default());
        assert_eq!(post.words, vec!["hello"]);
        assert_eq!(post.duplicates, 3);
    }

    #[test]
    fn test_custom_trim_set() {
        let trim = TrimSet::new("#");
        let post = normalize("#rust rust. #rust#", &trim);
        assert_eq!(post.words, vec!["rust", "rust."]);
        assert_eq!(post.duplicates, 1);
    }

    #[test]
    fn test_empty_content() {
        let post = normalize("", &TrimSet::default());
        assert!(post.words.is_empty());
        assert_eq!(post.total_tokens, 1);
    }
}
