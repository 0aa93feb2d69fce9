//! Entity escaping for attribute values and text content.
//!
//! Only the five XML special characters are touched:
//! `&` → `&amp;`, `<` → `&lt;`, `>` → `&gt;`, `"` → `&quot;`, `'` → `&apos;`.
//! The input is encoded in a single pass, so entities introduced for one character are never escaped again.
use crate::error::{XmlErrorKind, XmlResult};
use htmlentity::entity::ICodedDataTrait;
use htmlentity::entity::{CharacterSet, EncodeType, decode, encode};

/// Escape the XML special characters of `input`.
///
/// # Errors
/// Fails if the encoder cannot produce valid UTF-8, which cannot happen for `&str` input in practice.
///
/// # Example
/// ```rust
/// use xmlentity::escape;
/// assert_eq!(escape("a < b & 'c'").unwrap(), "a &lt; b &amp; &apos;c&apos;");
/// ```
pub fn escape(input: &str) -> XmlResult<String> {
    if !needs_escape(input) {
        return Ok(input.to_string());
    }

    encode(
        input.as_bytes(),
        &EncodeType::Named,
        &CharacterSet::SpecialChars,
    )
    .to_string()
    .map_err(|e| XmlErrorKind::Encoding(e.to_string()).into())
}

/// Reverse of [`escape`]: decodes character entities back into text.
///
/// # Errors
/// Fails if the decoded bytes are not valid UTF-8.
pub fn unescape(input: &str) -> XmlResult<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    decode(input.as_bytes())
        .to_string()
        .map_err(|e| XmlErrorKind::Encoding(e.to_string()).into())
}

fn needs_escape(input: &str) -> bool {
    input.contains(['&', '<', '>', '"', '\''])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_specials() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#).unwrap(),
            "&lt;a href=&quot;x&quot;&gt;&apos;&amp;&apos;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_ampersand_once() {
        assert_eq!(escape("&lt;").unwrap(), "&amp;lt;");
        assert_eq!(escape("fish & chips").unwrap(), "fish &amp; chips");
    }

    #[test]
    fn test_escape_leaves_unicode() {
        assert_eq!(escape("Jötunheim").unwrap(), "Jötunheim");
        assert_eq!(escape("Lago Dos Nove").unwrap(), "Lago Dos Nove");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("a &lt; b &amp;&amp; c").unwrap(), "a < b && c");
        assert_eq!(unescape("plain").unwrap(), "plain");
    }
}
