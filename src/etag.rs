//! ETag ヘッダー (RFC 9110 Section 8.8.3)
//!
//! ## 概要
//!
//! Weak / Strong の Entity Tag を扱います。
//!
//! パースは寛容で、先頭の `W/` と両端の `"` を取り除くだけです。
//! 出力時はタグ値をそのまま `"` で囲みます。タグ値に含まれる `"` はエスケープしません。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_headers::etag::EntityTag;
//!
//! let etag = EntityTag::parse("W/\"abc123\"");
//! assert!(etag.is_weak());
//! assert_eq!(etag.tag(), "abc123");
//! assert_eq!(etag.to_string(), "W/\"abc123\"");
//!
//! let strong = EntityTag::strong("abc123");
//! assert!(etag.weak_compare(&strong));
//! assert!(!etag.strong_compare(&strong));
//! ```

use core::fmt;

/// Entity Tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityTag {
    tag: String,
    weak: bool,
}

impl EntityTag {
    /// ETag ヘッダー値をパース
    ///
    /// 前後の空白を除いたあと、先頭の `W/` を Weak フラグとして取り除き、
    /// 先頭と末尾の `"` をそれぞれ 1 つだけ取り除きます。
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (weak, rest) = match input.strip_prefix("W/") {
            Some(rest) => (true, rest),
            None => (false, input),
        };
        let rest = rest.strip_prefix('"').unwrap_or(rest);
        let rest = rest.strip_suffix('"').unwrap_or(rest);

        EntityTag {
            tag: rest.to_string(),
            weak,
        }
    }

    /// 新しい ETag を作成
    pub fn new(tag: &str, weak: bool) -> Self {
        EntityTag {
            tag: tag.to_string(),
            weak,
        }
    }

    /// Strong ETag を作成
    pub fn strong(tag: &str) -> Self {
        Self::new(tag, false)
    }

    /// Weak ETag を作成
    pub fn weak(tag: &str) -> Self {
        Self::new(tag, true)
    }

    /// Weak ETag かどうか
    pub fn is_weak(&self) -> bool {
        self.weak
    }

    /// Strong ETag かどうか
    pub fn is_strong(&self) -> bool {
        !self.weak
    }

    /// タグ値を取得 (引用符なし)
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Strong 比較 (RFC 9110 Section 8.8.3.2)
    ///
    /// 両方が Strong で、タグ値が一致する場合に true
    pub fn strong_compare(&self, other: &EntityTag) -> bool {
        self.is_strong() && other.is_strong() && self.tag == other.tag
    }

    /// Weak 比較 (RFC 9110 Section 8.8.3.2)
    ///
    /// Weak フラグに関係なくタグ値が一致する場合に true
    pub fn weak_compare(&self, other: &EntityTag) -> bool {
        self.tag == other.tag
    }

    /// ヘッダー値を生成
    pub fn to_header_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.weak {
            write!(f, "W/")?;
        }
        write!(f, "\"{}\"", self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strong() {
        let etag = EntityTag::parse("\"abc\"");
        assert!(etag.is_strong());
        assert_eq!(etag.tag(), "abc");
    }

    #[test]
    fn test_parse_weak() {
        let etag = EntityTag::parse("W/\"abc\"");
        assert_eq!(etag, EntityTag::weak("abc"));
        assert_eq!(etag.to_header_value(), "W/\"abc\"");
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(EntityTag::parse("abc"), EntityTag::strong("abc"));
        assert_eq!(EntityTag::parse("W/abc"), EntityTag::weak("abc"));
        assert_eq!(EntityTag::parse("\"abc"), EntityTag::strong("abc"));
        assert_eq!(EntityTag::parse(""), EntityTag::strong(""));
        // 小文字の w/ は Weak として扱わない
        assert_eq!(EntityTag::parse("w/\"abc\""), EntityTag::strong("w/\"abc"));
    }

    #[test]
    fn test_format() {
        assert_eq!(EntityTag::strong("v1").to_string(), "\"v1\"");
        assert_eq!(EntityTag::weak("").to_string(), "W/\"\"");
    }

    #[test]
    fn test_format_does_not_escape_quotes() {
        // タグ値の `"` はエスケープされず、不正なヘッダー値になる
        let etag = EntityTag::strong("a\"b");
        assert_eq!(etag.to_string(), "\"a\"b\"");
        assert_eq!(EntityTag::parse(&etag.to_string()), etag);

        let etag = EntityTag::strong("\"");
        assert_eq!(etag.to_string(), "\"\"\"");
    }

    #[test]
    fn test_compare() {
        let strong = EntityTag::strong("1");
        let weak = EntityTag::weak("1");
        let other = EntityTag::strong("2");

        assert!(strong.strong_compare(&strong));
        assert!(!strong.strong_compare(&weak));
        assert!(!weak.strong_compare(&weak));
        assert!(strong.weak_compare(&weak));
        assert!(weak.weak_compare(&weak));
        assert!(!strong.weak_compare(&other));
    }
}
