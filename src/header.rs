//! ヘッダーの種類によるコーデックの振り分け
//!
//! ## 概要
//!
//! ヘッダー名から [`HeaderKind`] を決め、対応するコーデックで [`HeaderValue`] に変換します。
//! 対応するヘッダーの種類は固定で、振り分けはすべてコンパイル時に決まります。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_headers::header::{HeaderKind, HeaderValue};
//!
//! let kind = HeaderKind::from_header_name("cache-control").unwrap();
//! let value = HeaderValue::decode(kind, "no-store, max-age=0").unwrap();
//! assert_eq!(value.kind(), HeaderKind::CacheControl);
//! assert_eq!(value.encode().unwrap(), "no-store, max-age=0");
//! ```

use core::fmt;

use crate::cache::CacheControl;
use crate::cookie::{Cookie, SetCookie};
use crate::error::HeaderError;
use crate::etag::EntityTag;
use crate::link::Link;
use crate::media_type::{MediaType, MediaTypeCodec};

/// コーデックを持つヘッダーの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKind {
    /// Cache-Control
    CacheControl,
    /// Cookie
    Cookie,
    /// Set-Cookie
    SetCookie,
    /// ETag
    ETag,
    /// Link
    Link,
    /// Content-Type などのメディアタイプ
    MediaType,
}

impl HeaderKind {
    /// ヘッダー名から種類を決める (大文字小文字を区別しない)
    ///
    /// 対応していないヘッダー名の場合は `None` を返します。
    pub fn from_header_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let kind = if name.eq_ignore_ascii_case("cache-control") {
            HeaderKind::CacheControl
        } else if name.eq_ignore_ascii_case("cookie") {
            HeaderKind::Cookie
        } else if name.eq_ignore_ascii_case("set-cookie") {
            HeaderKind::SetCookie
        } else if name.eq_ignore_ascii_case("etag") {
            HeaderKind::ETag
        } else if name.eq_ignore_ascii_case("link") {
            HeaderKind::Link
        } else if name.eq_ignore_ascii_case("content-type") {
            HeaderKind::MediaType
        } else {
            return None;
        };
        Some(kind)
    }

    /// 代表的なヘッダー名
    pub fn header_name(&self) -> &'static str {
        match self {
            HeaderKind::CacheControl => "Cache-Control",
            HeaderKind::Cookie => "Cookie",
            HeaderKind::SetCookie => "Set-Cookie",
            HeaderKind::ETag => "ETag",
            HeaderKind::Link => "Link",
            HeaderKind::MediaType => "Content-Type",
        }
    }
}

impl fmt::Display for HeaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_name())
    }
}

/// パース済みのヘッダー値
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    /// Cache-Control
    CacheControl(CacheControl),
    /// Cookie (1 つのヘッダーに含まれるすべての Cookie)
    Cookie(Vec<Cookie>),
    /// Set-Cookie
    SetCookie(SetCookie),
    /// ETag
    ETag(EntityTag),
    /// Link
    Link(Link),
    /// メディアタイプ
    MediaType(MediaType),
}

impl HeaderValue {
    /// ヘッダー値をパース (メディアタイプは共有キャッシュを使用)
    pub fn decode(kind: HeaderKind, raw: &str) -> Result<Self, HeaderError> {
        Self::decode_with(&MediaTypeCodec::default(), kind, raw)
    }

    /// メディアタイプのコーデックを指定してヘッダー値をパース
    pub fn decode_with(
        codec: &MediaTypeCodec,
        kind: HeaderKind,
        raw: &str,
    ) -> Result<Self, HeaderError> {
        let value = match kind {
            HeaderKind::CacheControl => HeaderValue::CacheControl(CacheControl::parse(raw)?),
            HeaderKind::Cookie => HeaderValue::Cookie(Cookie::parse_all(raw)?),
            HeaderKind::SetCookie => HeaderValue::SetCookie(SetCookie::parse(raw)?),
            HeaderKind::ETag => HeaderValue::ETag(EntityTag::parse(raw)),
            HeaderKind::Link => HeaderValue::Link(Link::parse(raw)?),
            HeaderKind::MediaType => HeaderValue::MediaType(codec.parse(raw)?),
        };
        Ok(value)
    }

    /// 値の種類
    pub fn kind(&self) -> HeaderKind {
        match self {
            HeaderValue::CacheControl(_) => HeaderKind::CacheControl,
            HeaderValue::Cookie(_) => HeaderKind::Cookie,
            HeaderValue::SetCookie(_) => HeaderKind::SetCookie,
            HeaderValue::ETag(_) => HeaderKind::ETag,
            HeaderValue::Link(_) => HeaderKind::Link,
            HeaderValue::MediaType(_) => HeaderKind::MediaType,
        }
    }

    /// ヘッダー値を生成 (メディアタイプは共有キャッシュを使用)
    pub fn encode(&self) -> Result<String, HeaderError> {
        self.encode_with(&MediaTypeCodec::default())
    }

    /// メディアタイプのコーデックを指定してヘッダー値を生成
    ///
    /// 複数の Cookie は `; ` で連結します。
    pub fn encode_with(&self, codec: &MediaTypeCodec) -> Result<String, HeaderError> {
        match self {
            HeaderValue::CacheControl(cc) => Ok(cc.to_header_value()),
            HeaderValue::Cookie(cookies) => {
                if cookies.is_empty() {
                    return Err(HeaderError::NullArgument { name: "cookie" });
                }
                let parts = cookies
                    .iter()
                    .map(Cookie::to_header_value)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(parts.join("; "))
            }
            HeaderValue::SetCookie(set_cookie) => set_cookie.to_header_value(),
            HeaderValue::ETag(etag) => Ok(etag.to_header_value()),
            HeaderValue::Link(link) => Ok(link.to_header_value()),
            HeaderValue::MediaType(media_type) => Ok(codec.format(media_type)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::limits::CacheLimits;
    use crate::media_type::MediaTypeCache;

    #[test]
    fn test_from_header_name() {
        assert_eq!(
            HeaderKind::from_header_name("Cache-Control"),
            Some(HeaderKind::CacheControl)
        );
        assert_eq!(
            HeaderKind::from_header_name("SET-COOKIE"),
            Some(HeaderKind::SetCookie)
        );
        assert_eq!(
            HeaderKind::from_header_name("etag"),
            Some(HeaderKind::ETag)
        );
        assert_eq!(
            HeaderKind::from_header_name("Content-Type"),
            Some(HeaderKind::MediaType)
        );
        assert_eq!(HeaderKind::from_header_name("X-Unknown"), None);
    }

    #[test]
    fn test_header_name_roundtrip() {
        let kinds = [
            HeaderKind::CacheControl,
            HeaderKind::Cookie,
            HeaderKind::SetCookie,
            HeaderKind::ETag,
            HeaderKind::Link,
            HeaderKind::MediaType,
        ];
        for kind in kinds {
            assert_eq!(HeaderKind::from_header_name(kind.header_name()), Some(kind));
            assert_eq!(kind.to_string(), kind.header_name());
        }
    }

    #[test]
    fn test_decode_encode() {
        let codec =
            MediaTypeCodec::new(Arc::new(MediaTypeCache::new(CacheLimits::default())));
        let cases = [
            (HeaderKind::CacheControl, "no-cache, max-age=60"),
            (HeaderKind::Cookie, "a=b; c=d"),
            (HeaderKind::SetCookie, "id=1; Version=1; Secure"),
            (HeaderKind::ETag, "W/\"xyz\""),
            (HeaderKind::Link, "<http://x/>; rel=\"next\""),
            (HeaderKind::MediaType, "text/html;charset=utf-8"),
        ];
        for (kind, raw) in cases {
            let value = HeaderValue::decode_with(&codec, kind, raw).unwrap();
            assert_eq!(value.kind(), kind);
            assert_eq!(value.encode_with(&codec).unwrap(), raw, "{kind}");
        }
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            HeaderValue::decode(HeaderKind::MediaType, "nope"),
            Err(HeaderError::InvalidMediaType { .. })
        ));
        assert!(matches!(
            HeaderValue::decode(HeaderKind::CacheControl, "max-age"),
            Err(HeaderError::MissingDirectiveValue { .. })
        ));
        assert_eq!(
            HeaderValue::Cookie(vec![]).encode(),
            Err(HeaderError::NullArgument { name: "cookie" })
        );
    }
}
