//! Accept / Accept-Language ヘッダー (RFC 9110 Section 12.5)
//!
//! ## 概要
//!
//! Accept ヘッダーをメディアタイプの列に、Accept-Language ヘッダーを言語タグの列に変換し、
//! q 値の降順に並べます。
//!
//! - Accept が空の場合は `*/*` だけを返します。
//! - カンマを含まない Accept は q 値を解釈せずに 1 要素として返します。
//! - Accept-Language が空または `*` の場合は空の列を返します。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_headers::accept::{accept_languages, accept_media_types};
//!
//! let types = accept_media_types("text/html;q=0.5,text/plain,text/xml;q=0.9").unwrap();
//! let types: Vec<String> = types.iter().map(|mt| mt.mime_type()).collect();
//! assert_eq!(types, ["text/plain", "text/xml", "text/html"]);
//!
//! let languages = accept_languages("fr;q=0.4, EN-us, de;q=0.7").unwrap();
//! let languages: Vec<&str> = languages.iter().map(|tag| tag.as_str()).collect();
//! assert_eq!(languages, ["en-US", "de", "fr"]);
//! ```

use core::fmt;

use crate::error::HeaderError;
use crate::media_type::{MediaType, MediaTypeCodec};
use crate::weighted::{Weighted, rank_by};

/// Accept ヘッダーをメディアタイプの列に変換 (共有キャッシュを使用)
pub fn accept_media_types(input: &str) -> Result<Vec<MediaType>, HeaderError> {
    accept_media_types_with(&MediaTypeCodec::default(), input)
}

/// Accept ヘッダーをメディアタイプの列に変換
///
/// 各メディアタイプは `codec` でパースします。`q` パラメータはメディアタイプのパラメータに残ります。
///
/// # エラー
///
/// - 不正なメディアタイプは [`HeaderError::InvalidMediaType`]
/// - 不正な `q` は [`HeaderError::InvalidWeight`] / [`HeaderError::WeightOutOfRange`]
pub fn accept_media_types_with(
    codec: &MediaTypeCodec,
    input: &str,
) -> Result<Vec<MediaType>, HeaderError> {
    if input.trim().is_empty() {
        return Ok(vec![MediaType::wildcard()]);
    }
    if !input.contains(',') {
        return Ok(vec![codec.parse(input)?]);
    }

    rank_by(input, |item| {
        let media_type = codec.parse(item)?;
        if item.contains(';') {
            let q = media_type.parameter("q").map(str::to_string);
            Weighted::from_q(media_type, q.as_deref())
        } else {
            Ok(Weighted::new(media_type))
        }
    })
}

/// Accept-Language ヘッダーを言語タグの列に変換
///
/// # エラー
///
/// 不正な `q` は [`HeaderError::InvalidWeight`] / [`HeaderError::WeightOutOfRange`]
pub fn accept_languages(input: &str) -> Result<Vec<LanguageTag>, HeaderError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "*" {
        return Ok(Vec::new());
    }
    if !input.contains(',') {
        return Ok(vec![LanguageTag::parse(strip_parameters(input))]);
    }

    rank_by(input, |item| {
        let tag = LanguageTag::parse(strip_parameters(item));
        if item.contains(';') {
            Weighted::from_parameters(tag, &Weighted::<LanguageTag>::parse_parameters(item))
        } else {
            Ok(Weighted::new(tag))
        }
    })
}

fn strip_parameters(item: &str) -> &str {
    item.split(';').next().unwrap_or_default().trim()
}

/// 言語タグ (BCP 47)
///
/// サブタグの大文字小文字を慣例に合わせて正規化します。
///
/// - 言語: 小文字 (`en`)
/// - 文字体系 (4 文字): 先頭だけ大文字 (`Hant`)
/// - 地域 (2 文字の英字か 3 桁の数字): 大文字 (`US`)
/// - その他と `x` 以降の私用サブタグ: 小文字
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag {
    tag: String,
}

impl LanguageTag {
    /// 言語タグをパース
    pub fn parse(input: &str) -> Self {
        let mut subtags = Vec::new();
        let mut private_use = false;

        for (i, subtag) in input.trim().split('-').enumerate() {
            let normalized = if i == 0 || private_use {
                subtag.to_ascii_lowercase()
            } else if subtag.len() == 4 && subtag.bytes().all(|b| b.is_ascii_alphabetic()) {
                let mut titled = subtag.to_ascii_lowercase();
                titled[..1].make_ascii_uppercase();
                titled
            } else if (subtag.len() == 2 && subtag.bytes().all(|b| b.is_ascii_alphabetic()))
                || (subtag.len() == 3 && subtag.bytes().all(|b| b.is_ascii_digit()))
            {
                subtag.to_ascii_uppercase()
            } else {
                subtag.to_ascii_lowercase()
            };
            if normalized == "x" {
                private_use = true;
            }
            subtags.push(normalized);
        }

        Self {
            tag: subtags.join("-"),
        }
    }

    /// 正規化されたタグを取得
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// 言語サブタグを取得
    pub fn primary_language(&self) -> &str {
        self.tag.split('-').next().unwrap_or_default()
    }

    /// 地域サブタグを取得
    pub fn region(&self) -> Option<&str> {
        self.tag
            .split('-')
            .skip(1)
            .take_while(|s| *s != "x")
            .find(|s| {
                (s.len() == 2 && s.bytes().all(|b| b.is_ascii_uppercase()))
                    || (s.len() == 3 && s.bytes().all(|b| b.is_ascii_digit()))
            })
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::limits::CacheLimits;
    use crate::media_type::MediaTypeCache;

    fn codec() -> MediaTypeCodec {
        MediaTypeCodec::new(Arc::new(MediaTypeCache::new(CacheLimits::default())))
    }

    fn mime_types(types: &[MediaType]) -> Vec<String> {
        types.iter().map(|mt| mt.mime_type()).collect()
    }

    #[test]
    fn test_accept_ranking() {
        let types =
            accept_media_types_with(&codec(), "text/html;q=0.5,text/plain,text/xml;q=0.9").unwrap();
        assert_eq!(
            mime_types(&types),
            vec!["text/plain", "text/xml", "text/html"]
        );
        // q はパラメータに残る
        assert_eq!(types[1].parameter("q"), Some("0.9"));
    }

    #[test]
    fn test_accept_empty() {
        assert_eq!(
            accept_media_types_with(&codec(), "").unwrap(),
            vec![MediaType::wildcard()]
        );
    }

    #[test]
    fn test_accept_single_skips_weight() {
        let types = accept_media_types_with(&codec(), "application/json;q=1.5").unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].parameter("q"), Some("1.5"));
    }

    #[test]
    fn test_accept_dedup() {
        let types =
            accept_media_types_with(&codec(), "text/html;q=0.5, application/json, TEXT/HTML;q=0.5")
                .unwrap();
        assert_eq!(mime_types(&types), vec!["application/json", "text/html"]);
    }

    #[test]
    fn test_accept_errors() {
        assert!(matches!(
            accept_media_types_with(&codec(), "text/html, bogus"),
            Err(HeaderError::InvalidMediaType { .. })
        ));
        assert!(matches!(
            accept_media_types_with(&codec(), "text/html;q=2, */*"),
            Err(HeaderError::WeightOutOfRange { .. })
        ));
        assert!(matches!(
            accept_media_types_with(&codec(), "text/html;q=x, */*"),
            Err(HeaderError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_accept_global_codec() {
        let types = accept_media_types("image/png, image/*;q=0.1").unwrap();
        assert_eq!(mime_types(&types), vec!["image/png", "image/*"]);
    }

    #[test]
    fn test_accept_languages() {
        let tags = accept_languages("da, en-gb;q=0.8, en;q=0.7").unwrap();
        let tags: Vec<&str> = tags.iter().map(LanguageTag::as_str).collect();
        assert_eq!(tags, vec!["da", "en-GB", "en"]);
    }

    #[test]
    fn test_accept_languages_empty() {
        assert!(accept_languages("").unwrap().is_empty());
        assert!(accept_languages("*").unwrap().is_empty());
    }

    #[test]
    fn test_accept_languages_single() {
        let tags = accept_languages("ZH-hant-tw;q=0.3").unwrap();
        assert_eq!(tags, vec![LanguageTag::parse("zh-Hant-TW")]);
    }

    #[test]
    fn test_accept_languages_errors() {
        assert!(matches!(
            accept_languages("en;q=1.01, fr"),
            Err(HeaderError::WeightOutOfRange { .. })
        ));
    }

    #[test]
    fn test_language_tag() {
        let tag = LanguageTag::parse("EN-us");
        assert_eq!(tag.as_str(), "en-US");
        assert_eq!(tag.primary_language(), "en");
        assert_eq!(tag.region(), Some("US"));

        let tag = LanguageTag::parse("es-419");
        assert_eq!(tag.region(), Some("419"));

        let tag = LanguageTag::parse("zh-HANT");
        assert_eq!(tag.to_string(), "zh-Hant");
        assert_eq!(tag.region(), None);

        let tag = LanguageTag::parse("de-x-PHONEBK-AB");
        assert_eq!(tag.as_str(), "de-x-phonebk-ab");
        assert_eq!(tag.region(), None);
    }
}
