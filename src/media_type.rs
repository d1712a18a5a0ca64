//! メディアタイプ (RFC 9110 Section 8.3.1)
//!
//! ## 概要
//!
//! `type/subtype;name=value` 形式のメディアタイプを扱います。
//!
//! - `*` 単独は `*/*` として扱います。
//! - 出力時は type / subtype を小文字にします。
//! - パラメータ値は特殊文字を含む場合だけ `"` で囲みます。
//!
//! 文字列との相互変換は [`MediaTypeCodec`] を通すと [`MediaTypeCache`] にキャッシュされます。
//! キャッシュは明示的に生成して共有するか、[`MediaTypeCache::global`] を使います。
//!
//! ## 使い方
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use shiguredo_http_headers::limits::CacheLimits;
//! use shiguredo_http_headers::media_type::{MediaType, MediaTypeCache, MediaTypeCodec};
//!
//! let mt = MediaType::parse("Text/HTML; charset=UTF-8").unwrap();
//! assert_eq!(mt.main_type(), "Text");
//! assert_eq!(mt.charset(), Some("UTF-8"));
//! assert_eq!(mt.to_string(), "text/html;charset=UTF-8");
//!
//! let codec = MediaTypeCodec::new(Arc::new(MediaTypeCache::new(CacheLimits::default())));
//! let parsed = codec.parse("application/json").unwrap();
//! assert_eq!(codec.format(&parsed), "application/json");
//! assert_eq!(codec.cache().parsed_len(), 1);
//! ```

use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::error::HeaderError;
use crate::limits::CacheLimits;
use crate::lru::LruMap;
use crate::token::{needs_media_quoting, parse_parameters};

/// ワイルドカード
pub const WILDCARD: &str = "*";

/// type / subtype に使えない文字
const INVALID_TYPE_CHARS: &[char] = &[
    '/', '\\', '?', ':', '<', '>', ';', '(', ')', '@', ',', '[', ']', '=',
];

/// メディアタイプ
///
/// type / subtype は大文字小文字を区別せずに比較します。パラメータは挿入順を含めて比較します。
#[derive(Debug, Clone)]
pub struct MediaType {
    main_type: String,
    subtype: String,
    params: Vec<(String, String)>,
}

impl MediaType {
    /// 新しいメディアタイプを作成
    pub fn new(main_type: &str, subtype: &str) -> Self {
        Self {
            main_type: main_type.to_string(),
            subtype: subtype.to_string(),
            params: Vec::new(),
        }
    }

    /// `*/*` を作成
    pub fn wildcard() -> Self {
        Self::new(WILDCARD, WILDCARD)
    }

    /// メディアタイプをパース (キャッシュなし)
    ///
    /// # エラー
    ///
    /// 次の場合は [`HeaderError::InvalidMediaType`]
    ///
    /// - `/` がなく、`;` より前が `*` でない
    /// - type または subtype が空、または使えない文字を含む
    /// - type が `*` で subtype が `*` でない
    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        let input = input.trim();
        let param_index = input.find(';');
        let head = &input[..param_index.unwrap_or(input.len())];

        let (main_type, subtype) = match head.split_once('/') {
            Some((main_type, subtype)) => (main_type, subtype),
            None if head == WILDCARD => (WILDCARD, WILDCARD),
            None => return Err(HeaderError::invalid_media_type(input)),
        };

        if !is_valid_type(main_type) || !is_valid_type(subtype) {
            return Err(HeaderError::invalid_media_type(input));
        }
        if main_type == WILDCARD && subtype != WILDCARD {
            return Err(HeaderError::invalid_media_type(input));
        }

        let mut media_type = Self::new(main_type, subtype);
        if let Some(index) = param_index {
            for (name, value) in parse_parameters(&input[index + 1..], ';') {
                media_type.params.push((name, value.unwrap_or_default()));
            }
        }
        Ok(media_type)
    }

    /// パラメータを追加 (同じ名前は上書き)
    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        if let Some(entry) = self
            .params
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            entry.1 = value.to_string();
        } else {
            self.params.push((name.to_string(), value.to_string()));
        }
        self
    }

    /// type を取得
    pub fn main_type(&self) -> &str {
        &self.main_type
    }

    /// subtype を取得
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// `type/subtype` を小文字で取得
    pub fn mime_type(&self) -> String {
        format!(
            "{}/{}",
            self.main_type.to_ascii_lowercase(),
            self.subtype.to_ascii_lowercase()
        )
    }

    /// パラメータ値を取得 (名前は大文字小文字を区別しない)
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// パラメータを挿入順に取得
    pub fn parameters(&self) -> &[(String, String)] {
        &self.params
    }

    /// charset パラメータを取得
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// type が `*` かどうか
    pub fn is_wildcard_type(&self) -> bool {
        self.main_type == WILDCARD
    }

    /// subtype が `*` かどうか
    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype == WILDCARD
    }

    /// ワイルドカードを考慮して互換性があるか
    ///
    /// パラメータは比較しません。
    pub fn is_compatible(&self, other: &MediaType) -> bool {
        if self.is_wildcard_type() || other.is_wildcard_type() {
            return true;
        }
        self.main_type.eq_ignore_ascii_case(&other.main_type)
            && (self.is_wildcard_subtype()
                || other.is_wildcard_subtype()
                || self.subtype.eq_ignore_ascii_case(&other.subtype))
    }

    /// ヘッダー値を生成 (キャッシュなし)
    pub fn to_header_value(&self) -> String {
        self.to_string()
    }
}

fn is_valid_type(s: &str) -> bool {
    !s.is_empty() && !s.contains(INVALID_TYPE_CHARS)
}

impl PartialEq for MediaType {
    fn eq(&self, other: &Self) -> bool {
        self.main_type.eq_ignore_ascii_case(&other.main_type)
            && self.subtype.eq_ignore_ascii_case(&other.subtype)
            && self.params == other.params
    }
}

impl Eq for MediaType {}

impl Hash for MediaType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.main_type.to_ascii_lowercase().hash(state);
        self.subtype.to_ascii_lowercase().hash(state);
        self.params.hash(state);
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.main_type.to_ascii_lowercase(),
            self.subtype.to_ascii_lowercase()
        )?;
        for (name, value) in &self.params {
            if needs_media_quoting(value) {
                write!(f, ";{}=\"{}\"", name, value)?;
            } else {
                write!(f, ";{}={}", name, value)?;
            }
        }
        Ok(())
    }
}

static GLOBAL_CACHE: Lazy<Arc<MediaTypeCache>> =
    Lazy::new(|| Arc::new(MediaTypeCache::new(CacheLimits::default())));

#[derive(Debug)]
struct CacheMaps {
    /// 文字列からの変換結果
    parsed: LruMap<String, MediaType>,
    /// 文字列への変換結果
    formatted: LruMap<MediaType, String>,
}

/// メディアタイプの変換キャッシュ
///
/// 文字列からメディアタイプへの変換と、メディアタイプから文字列への変換を
/// それぞれ上限付きの LRU マップに保持します。2 つのマップは 1 つのロックで守られ、
/// ロック中はマップ操作だけを行います。
#[derive(Debug)]
pub struct MediaTypeCache {
    limits: CacheLimits,
    maps: Mutex<CacheMaps>,
}

impl MediaTypeCache {
    /// 新しいキャッシュを作成
    pub fn new(limits: CacheLimits) -> Self {
        let maps = CacheMaps {
            parsed: LruMap::new(limits.max_entries),
            formatted: LruMap::new(limits.max_entries),
        };
        Self {
            limits,
            maps: Mutex::new(maps),
        }
    }

    /// プロセス全体で共有するキャッシュを取得
    pub fn global() -> Arc<MediaTypeCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    /// 制限設定を取得
    pub fn limits(&self) -> &CacheLimits {
        &self.limits
    }

    fn lookup_parsed(&self, input: &str) -> Option<MediaType> {
        self.maps.lock().parsed.get(input).cloned()
    }

    fn lookup_formatted(&self, media_type: &MediaType) -> Option<String> {
        self.maps.lock().formatted.get(media_type).cloned()
    }

    /// 変換結果を両方のマップに登録
    fn store(&self, input: &str, media_type: &MediaType, formatted: &str) {
        let mut maps = self.maps.lock();
        if let Some((evicted, _)) = maps.parsed.insert(input.to_string(), media_type.clone()) {
            tracing::trace!(evicted = %evicted, "media type parse cache eviction");
        }
        if let Some((evicted, _)) = maps
            .formatted
            .insert(media_type.clone(), formatted.to_string())
        {
            tracing::trace!(evicted = %evicted, "media type format cache eviction");
        }
    }

    /// 文字列からの変換結果を保持しているか (LRU の順序は変えない)
    pub fn contains_parsed(&self, input: &str) -> bool {
        self.maps.lock().parsed.contains_key(input)
    }

    /// 文字列からの変換結果の件数
    pub fn parsed_len(&self) -> usize {
        self.maps.lock().parsed.len()
    }

    /// 文字列への変換結果の件数
    pub fn formatted_len(&self) -> usize {
        self.maps.lock().formatted.len()
    }

    /// すべてのエントリを削除
    pub fn clear(&self) {
        let mut maps = self.maps.lock();
        maps.parsed.clear();
        maps.formatted.clear();
    }
}

/// キャッシュ付きのメディアタイプ変換
///
/// `Default` はプロセス全体で共有するキャッシュを使います。
#[derive(Debug, Clone)]
pub struct MediaTypeCodec {
    cache: Arc<MediaTypeCache>,
}

impl Default for MediaTypeCodec {
    fn default() -> Self {
        Self::new(MediaTypeCache::global())
    }
}

impl MediaTypeCodec {
    /// キャッシュを指定して作成
    pub fn new(cache: Arc<MediaTypeCache>) -> Self {
        Self { cache }
    }

    /// キャッシュを取得
    pub fn cache(&self) -> &Arc<MediaTypeCache> {
        &self.cache
    }

    /// メディアタイプをパース
    ///
    /// 同じ文字列のパース結果がキャッシュにあればそれを返します。
    pub fn parse(&self, input: &str) -> Result<MediaType, HeaderError> {
        if let Some(hit) = self.cache.lookup_parsed(input) {
            tracing::trace!(input, "media type parse cache hit");
            return Ok(hit);
        }
        tracing::trace!(input, "media type parse cache miss");

        let media_type = MediaType::parse(input)?;
        let formatted = media_type.to_string();
        self.cache.store(input, &media_type, &formatted);
        Ok(media_type)
    }

    /// メディアタイプを文字列にする
    ///
    /// 等しいメディアタイプの変換結果がキャッシュにあればそれを返します。
    pub fn format(&self, media_type: &MediaType) -> String {
        if let Some(hit) = self.cache.lookup_formatted(media_type) {
            tracing::trace!(formatted = %hit, "media type format cache hit");
            return hit;
        }

        let formatted = media_type.to_string();
        tracing::trace!(formatted = %formatted, "media type format cache miss");
        self.cache.store(&formatted, media_type, &formatted);
        formatted
    }
}
