//! Markup reduction.
//!
//! Strips an HTML document down to prose with regex passes. Paragraph
//! boundaries survive as newlines; everything else collapses to single
//! spaces. There is no DOM: nested elements with the same tag name are
//! not balanced (a `<nav>` inside a `<nav>` ends the removal at the first
//! `</nav>`).

use regex::Regex;
use std::sync::OnceLock;

/// Entities decoded by [`reduce`], in application order.
const ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", "\u{a0}"),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

/// A reduction pass, in the order [`reduce`] applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    ScriptsAndStyles,
    Comments,
    PageChrome,
    BlockClose,
    AnyTag,
    ControlChars,
    HorizontalSpace,
    NewlineSpaces,
    BlankLines,
}

impl Pass {
    /// Returns the compiled regex for this pass.
    #[allow(clippy::expect_used)]
    fn regex(self) -> &'static Regex {
        macro_rules! static_regex {
            ($name:ident, $pattern:expr) => {{
                static $name: OnceLock<Regex> = OnceLock::new();
                $name.get_or_init(|| Regex::new($pattern).expect("valid regex"))
            }};
        }

        match self {
            Self::ScriptsAndStyles => static_regex!(
                SCRIPTS_AND_STYLES,
                r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>"
            ),
            Self::Comments => static_regex!(COMMENTS, r"(?s)<!--.*?-->"),
            Self::PageChrome => static_regex!(
                PAGE_CHROME,
                r"(?is)<nav\b[^>]*>.*?</nav\s*>|<header\b[^>]*>.*?</header\s*>|<footer\b[^>]*>.*?</footer\s*>|<aside\b[^>]*>.*?</aside\s*>|<menu\b[^>]*>.*?</menu\s*>"
            ),
            Self::BlockClose => static_regex!(
                BLOCK_CLOSE,
                r"(?i)</(?:div|p|h[1-6]|li|section|article|blockquote|pre)\s*>"
            ),
            Self::AnyTag => static_regex!(ANY_TAG, r"<[^>]*>"),
            Self::ControlChars => static_regex!(CONTROL_CHARS, r"[\p{Cc}&&[^\n]]"),
            Self::HorizontalSpace => static_regex!(HORIZONTAL_SPACE, r"[^\S\n]+"),
            Self::NewlineSpaces => static_regex!(NEWLINE_SPACES, r" *\n *"),
            Self::BlankLines => static_regex!(BLANK_LINES, r"\n{2,}"),
        }
    }

    /// What a match is replaced with.
    const fn replacement(self) -> &'static str {
        match self {
            Self::ScriptsAndStyles | Self::Comments | Self::PageChrome => "",
            Self::BlockClose | Self::NewlineSpaces => "\n",
            Self::AnyTag | Self::ControlChars | Self::HorizontalSpace => " ",
            Self::BlankLines => "\n\n",
        }
    }

    fn apply(self, text: &str) -> String {
        self.regex()
            .replace_all(text, self.replacement())
            .into_owned()
    }
}

/// Reduces an HTML document to plain text.
///
/// Never fails; malformed markup is handled best-effort. Passes:
///
/// 1. drop `<script>` and `<style>` blocks with their content
/// 2. drop comments
/// 3. drop `<nav>`, `<header>`, `<footer>`, `<aside>`, `<menu>` elements
/// 4. turn closing block tags into newlines
/// 5. replace every remaining tag with a space
/// 6. decode `&nbsp; &amp; &lt; &gt; &quot; &#39;` until none remain, then
///    replace any tags the decoding revealed with a space
/// 7. normalize whitespace (spaces around a newline are dropped, blank-line
///    runs become one blank line) and trim
///
/// # Examples
///
/// ```
/// use sitesift::markup::reduce;
///
/// let text = reduce("<p>The quick brown fox</p><script>evil()</script>");
/// assert_eq!(text, "The quick brown fox");
/// ```
#[must_use]
pub fn reduce(html: &str) -> String {
    let mut text = html.to_string();
    for pass in [
        Pass::ScriptsAndStyles,
        Pass::Comments,
        Pass::PageChrome,
        Pass::BlockClose,
        Pass::AnyTag,
    ] {
        text = pass.apply(&text);
    }

    // Escaped markup decodes into tags; strip those too so a second
    // reduction finds nothing left to remove.
    text = Pass::AnyTag.apply(&decode_until_stable(&text));

    for pass in [
        Pass::ControlChars,
        Pass::HorizontalSpace,
        Pass::NewlineSpaces,
        Pass::BlankLines,
    ] {
        text = pass.apply(&text);
    }

    text.trim().to_string()
}

/// Decodes the six common HTML entities.
///
/// Replacements are applied one entity at a time, so `&amp;lt;` ends up
/// as `<`.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, literal)| {
            acc.replace(entity, literal)
        })
}

/// Applies [`decode_entities`] until the text stops changing.
///
/// Terminates because every replacement shortens the text.
fn decode_until_stable(text: &str) -> String {
    let mut current = decode_entities(text);
    loop {
        let next = decode_entities(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}
