//! Cache-Control ヘッダー (RFC 9111 Section 5.2)
//!
//! ## 概要
//!
//! Cache-Control ヘッダーのディレクティブ列と構造化された値を相互に変換します。
//!
//! 出力時のディレクティブは入力の順序によらず次の順序に正規化されます。
//!
//! `no-cache`, `must-revalidate`, `no-transform`, `no-store`, `proxy-revalidate`,
//! `s-maxage`, `max-age`, `private`, 拡張ディレクティブ
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_headers::cache::CacheControl;
//!
//! let cc = CacheControl::parse("max-age=3600, no-store, private=\"x-user\"").unwrap();
//! assert_eq!(cc.max_age(), Some(3600));
//! assert!(cc.is_no_store());
//! assert_eq!(cc.private_fields(), ["x-user"]);
//!
//! assert_eq!(
//!     cc.to_header_value(),
//!     "no-store, max-age=3600, private=\"x-user\""
//! );
//! ```

use core::fmt;

use crate::error::HeaderError;

const NO_CACHE: &str = "no-cache";
const PRIVATE: &str = "private";
const NO_STORE: &str = "no-store";
const MAX_AGE: &str = "max-age";
const S_MAXAGE: &str = "s-maxage";
const NO_TRANSFORM: &str = "no-transform";
const MUST_REVALIDATE: &str = "must-revalidate";
const PROXY_REVALIDATE: &str = "proxy-revalidate";

/// Cache-Control ヘッダー
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CacheControl {
    no_cache: bool,
    no_cache_fields: Vec<String>,
    private: bool,
    private_fields: Vec<String>,
    no_store: bool,
    max_age: Option<i32>,
    s_maxage: Option<i32>,
    no_transform: bool,
    must_revalidate: bool,
    proxy_revalidate: bool,
    /// 未知のディレクティブ (値なしは空文字列)
    extensions: Vec<(String, String)>,
}

impl CacheControl {
    /// 新しい Cache-Control を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache-Control ヘッダーをパース
    ///
    /// ディレクティブ名は大文字小文字を区別しません。
    /// 値の先頭と末尾の `"` はそれぞれ 1 つだけ取り除きます。
    ///
    /// # エラー
    ///
    /// - `max-age` / `s-maxage` に値がない場合は [`HeaderError::MissingDirectiveValue`]
    /// - `max-age` / `s-maxage` の値が整数でない場合は [`HeaderError::InvalidDirectiveValue`]
    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        let mut cc = CacheControl::new();

        for directive in input.split(',') {
            let directive = directive.trim();
            if directive.is_empty() {
                continue;
            }

            let (name, value) = match directive.split_once('=') {
                Some((name, value)) => (name.trim(), Some(strip_quotes(value.trim()))),
                None => (directive, None),
            };

            match name.to_ascii_lowercase().as_str() {
                NO_CACHE => {
                    cc.no_cache = true;
                    if let Some(field) = value.filter(|v| !v.is_empty()) {
                        cc.no_cache_fields.push(field.to_string());
                    }
                }
                PRIVATE => {
                    cc.private = true;
                    if let Some(field) = value.filter(|v| !v.is_empty()) {
                        cc.private_fields.push(field.to_string());
                    }
                }
                NO_STORE => cc.no_store = true,
                MAX_AGE => cc.max_age = Some(parse_seconds(MAX_AGE, value, input)?),
                S_MAXAGE => cc.s_maxage = Some(parse_seconds(S_MAXAGE, value, input)?),
                NO_TRANSFORM => cc.no_transform = true,
                MUST_REVALIDATE => cc.must_revalidate = true,
                PROXY_REVALIDATE => cc.proxy_revalidate = true,
                _ => cc.set_extension(name, value.unwrap_or_default()),
            }
        }

        Ok(cc)
    }

    fn set_extension(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.extensions.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value.to_string();
        } else {
            self.extensions.push((name.to_string(), value.to_string()));
        }
    }

    /// no-cache を設定
    pub fn with_no_cache(mut self) -> Self {
        self.no_cache = true;
        self
    }

    /// フィールド名付きの no-cache を追加
    pub fn with_no_cache_field(mut self, field: &str) -> Self {
        self.no_cache = true;
        self.no_cache_fields.push(field.to_string());
        self
    }

    /// private を設定
    pub fn with_private(mut self) -> Self {
        self.private = true;
        self
    }

    /// フィールド名付きの private を追加
    pub fn with_private_field(mut self, field: &str) -> Self {
        self.private = true;
        self.private_fields.push(field.to_string());
        self
    }

    /// no-store を設定
    pub fn with_no_store(mut self) -> Self {
        self.no_store = true;
        self
    }

    /// max-age を設定
    pub fn with_max_age(mut self, seconds: i32) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// s-maxage を設定
    pub fn with_s_maxage(mut self, seconds: i32) -> Self {
        self.s_maxage = Some(seconds);
        self
    }

    /// no-transform を設定
    pub fn with_no_transform(mut self) -> Self {
        self.no_transform = true;
        self
    }

    /// must-revalidate を設定
    pub fn with_must_revalidate(mut self) -> Self {
        self.must_revalidate = true;
        self
    }

    /// proxy-revalidate を設定
    pub fn with_proxy_revalidate(mut self) -> Self {
        self.proxy_revalidate = true;
        self
    }

    /// 拡張ディレクティブを設定
    ///
    /// 値が空の場合は名前だけが出力されます。同じ名前は上書きします。
    pub fn with_extension(mut self, name: &str, value: &str) -> Self {
        self.set_extension(name, value);
        self
    }

    /// no-cache かどうか
    pub fn is_no_cache(&self) -> bool {
        self.no_cache
    }

    /// no-cache のフィールド名
    pub fn no_cache_fields(&self) -> &[String] {
        &self.no_cache_fields
    }

    /// private かどうか
    pub fn is_private(&self) -> bool {
        self.private
    }

    /// private のフィールド名
    pub fn private_fields(&self) -> &[String] {
        &self.private_fields
    }

    /// no-store かどうか
    pub fn is_no_store(&self) -> bool {
        self.no_store
    }

    /// max-age を取得
    pub fn max_age(&self) -> Option<i32> {
        self.max_age
    }

    /// s-maxage を取得
    pub fn s_maxage(&self) -> Option<i32> {
        self.s_maxage
    }

    /// no-transform かどうか
    pub fn is_no_transform(&self) -> bool {
        self.no_transform
    }

    /// must-revalidate かどうか
    pub fn is_must_revalidate(&self) -> bool {
        self.must_revalidate
    }

    /// proxy-revalidate かどうか
    pub fn is_proxy_revalidate(&self) -> bool {
        self.proxy_revalidate
    }

    /// 拡張ディレクティブの値を取得
    pub fn extension(&self, name: &str) -> Option<&str> {
        self.extensions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// 拡張ディレクティブを挿入順に取得
    pub fn extensions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extensions
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// ヘッダー値を生成
    pub fn to_header_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CacheControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        push_field_directive(&mut parts, NO_CACHE, self.no_cache, &self.no_cache_fields);
        if self.must_revalidate {
            parts.push(MUST_REVALIDATE.to_string());
        }
        if self.no_transform {
            parts.push(NO_TRANSFORM.to_string());
        }
        if self.no_store {
            parts.push(NO_STORE.to_string());
        }
        if self.proxy_revalidate {
            parts.push(PROXY_REVALIDATE.to_string());
        }
        if let Some(s_maxage) = self.s_maxage {
            parts.push(format!("{}={}", S_MAXAGE, s_maxage));
        }
        if let Some(max_age) = self.max_age {
            parts.push(format!("{}={}", MAX_AGE, max_age));
        }
        push_field_directive(&mut parts, PRIVATE, self.private, &self.private_fields);
        for (name, value) in &self.extensions {
            if value.is_empty() {
                parts.push(name.clone());
            } else {
                parts.push(format!("{}=\"{}\"", name, value));
            }
        }

        write!(f, "{}", parts.join(", "))
    }
}

/// no-cache / private を出力 (フィールド名ごとに 1 ディレクティブ)
fn push_field_directive(parts: &mut Vec<String>, name: &str, enabled: bool, fields: &[String]) {
    if !enabled {
        return;
    }
    if fields.is_empty() {
        parts.push(name.to_string());
    } else {
        for field in fields {
            parts.push(format!("{}=\"{}\"", name, field));
        }
    }
}

/// 先頭と末尾の `"` をそれぞれ 1 つだけ取り除く
fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

fn parse_seconds(
    directive: &'static str,
    value: Option<&str>,
    header: &str,
) -> Result<i32, HeaderError> {
    let value = value.ok_or_else(|| HeaderError::MissingDirectiveValue {
        directive,
        header: header.to_string(),
    })?;
    value
        .parse::<i32>()
        .map_err(|_| HeaderError::InvalidDirectiveValue {
            directive,
            value: value.to_string(),
        })
}
