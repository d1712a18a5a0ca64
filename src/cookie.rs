//! Cookie / Set-Cookie ヘッダー (RFC 2109 / Netscape 形式)
//!
//! ## 概要
//!
//! リクエストの Cookie ヘッダーとレスポンスの Set-Cookie ヘッダーを扱います。
//!
//! - Cookie: 1 つのヘッダー値に複数の Cookie を含められます。
//!   `$Version` / `$Path` / `$Domain` 属性は、それ以降に現れる Cookie に適用されます。
//! - Set-Cookie: Version 0 (Netscape 形式) と Version 1 (RFC 2109) で
//!   値の引用符付けと有効期限の出力形式が変わります。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_headers::cookie::{Cookie, SetCookie};
//!
//! let cookies = Cookie::parse_all("$Version=1; foo=bar; $Path=/x; baz=qux").unwrap();
//! assert_eq!(cookies.len(), 2);
//! assert_eq!(cookies[1].path(), Some("/x"));
//!
//! let set_cookie = SetCookie::parse("session=abc; Path=/; Max-Age=60; HttpOnly").unwrap();
//! assert_eq!(set_cookie.name(), "session");
//! assert_eq!(set_cookie.max_age(), Some(60));
//! assert_eq!(
//!     set_cookie.to_header_value().unwrap(),
//!     "session=abc; Version=1; Max-Age=60; Path=\"/\"; HttpOnly"
//! );
//! ```

use chrono::{DateTime, Duration, Utc};

use crate::date::{ANCIENT_DATE, format_cookie_date, parse_cookie_date};
use crate::error::HeaderError;
use crate::token::{maybe_quote_cookie_value, parse_parameters, unquote};

/// Set-Cookie のデフォルトバージョン
pub const DEFAULT_SET_COOKIE_VERSION: u32 = 1;

/// リクエストの Cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
    path: Option<String>,
    domain: Option<String>,
    version: u32,
}

impl Cookie {
    /// 新しい Cookie を作成 (version 0)
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            path: None,
            domain: None,
            version: 0,
        }
    }

    /// Cookie ヘッダーをパースしてすべての Cookie を返す
    ///
    /// `;` と `,` で分割します。`$` で始まらない `name=value` が現れるたびに新しい
    /// Cookie を開始し、それまでの `$Version` / `$Path` / `$Domain` を適用します。
    /// 空の区間は無視します。
    ///
    /// # エラー
    ///
    /// `$Version` が 0 以上の整数でない場合は [`HeaderError::InvalidCookieHeader`]
    pub fn parse_all(input: &str) -> Result<Vec<Cookie>, HeaderError> {
        parse_cookie_segments(input).map_err(|reason| {
            tracing::debug!(header = input, %reason, "rejecting malformed cookie header");
            HeaderError::invalid_cookie_header(reason)
        })
    }

    /// Cookie ヘッダーをパースして最初の Cookie を返す
    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        Self::parse_all(input)?
            .into_iter()
            .next()
            .ok_or_else(|| HeaderError::invalid_cookie_header(format!("no cookie in {input:?}")))
    }

    /// パスを設定
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    /// ドメインを設定
    pub fn with_domain(mut self, domain: &str) -> Self {
        self.domain = Some(domain.to_string());
        self
    }

    /// バージョンを設定
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// 名前を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 値を取得
    pub fn value(&self) -> &str {
        &self.value
    }

    /// パスを取得
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// ドメインを取得
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// バージョンを取得
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Cookie ヘッダー値を生成
    ///
    /// 属性は Cookie より前に出力するため、生成した値を [`Cookie::parse`] すると同じ Cookie になります。
    pub fn to_header_value(&self) -> Result<String, HeaderError> {
        let mut parts = Vec::new();
        if self.version > 0 {
            parts.push(format!("$Version={}", self.version));
        }
        if let Some(path) = &self.path {
            parts.push(format!(
                "$Path={}",
                maybe_quote_cookie_value(self.version, path)?
            ));
        }
        if let Some(domain) = &self.domain {
            parts.push(format!(
                "$Domain={}",
                maybe_quote_cookie_value(self.version, domain)?
            ));
        }
        parts.push(format!(
            "{}={}",
            self.name,
            maybe_quote_cookie_value(self.version, &self.value)?
        ));
        Ok(parts.join("; "))
    }
}

/// Cookie ヘッダーを走査する
///
/// エラーは理由の文字列で返し、呼び出し側で [`HeaderError::InvalidCookieHeader`] に包む。
fn parse_cookie_segments(input: &str) -> Result<Vec<Cookie>, String> {
    let mut cookies = Vec::new();
    let mut version = 0;
    let mut path: Option<String> = None;
    let mut domain: Option<String> = None;

    for part in input.split([';', ',']) {
        if part.trim().is_empty() {
            continue;
        }

        let (name, value) = match part.split_once('=') {
            Some((name, value)) => (name.trim(), unquote(value.trim())),
            None => (part.trim(), ""),
        };

        if !name.starts_with('$') {
            cookies.push(Cookie {
                name: name.to_string(),
                value: value.to_string(),
                path: path.clone(),
                domain: domain.clone(),
                version,
            });
        } else if name.eq_ignore_ascii_case("$Version") {
            version = value
                .parse::<u32>()
                .map_err(|e| format!("invalid $Version {value:?}: {e}"))?;
        } else if name.eq_ignore_ascii_case("$Path") {
            path = Some(value.to_string());
        } else if name.eq_ignore_ascii_case("$Domain") {
            domain = Some(value.to_string());
        }
    }

    Ok(cookies)
}

/// レスポンスの Set-Cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    name: String,
    value: String,
    path: Option<String>,
    domain: Option<String>,
    version: u32,
    comment: Option<String>,
    /// 負の値と `None` はセッション Cookie
    max_age: Option<i32>,
    expiry: Option<DateTime<Utc>>,
    secure: bool,
    http_only: bool,
}

impl SetCookie {
    /// 新しい Set-Cookie を作成 (version 1)
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            path: None,
            domain: None,
            version: DEFAULT_SET_COOKIE_VERSION,
            comment: None,
            max_age: None,
            expiry: None,
            secure: false,
            http_only: false,
        }
    }

    /// リクエストの Cookie から作成
    ///
    /// 名前、値、パス、ドメイン、バージョンを引き継ぎます。
    pub fn from_cookie(cookie: &Cookie) -> Self {
        Self {
            path: cookie.path.clone(),
            domain: cookie.domain.clone(),
            version: cookie.version,
            ..Self::new(&cookie.name, &cookie.value)
        }
    }

    /// Set-Cookie ヘッダーをパース
    ///
    /// 属性名は大文字小文字を区別しません。既知の属性でない最初のパラメータを
    /// Cookie の名前と値とみなします。解釈できない `Expires` は無視します。
    ///
    /// # エラー
    ///
    /// - Cookie の名前がない場合は [`HeaderError::NullArgument`]
    /// - `Max-Age` が整数でない場合は [`HeaderError::InvalidCookieHeader`]
    /// - `Version` が 0 以上の整数でない場合は [`HeaderError::InvalidCookieHeader`]
    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        let mut cookie: Option<(String, String)> = None;
        let mut path = None;
        let mut domain = None;
        let mut version = DEFAULT_SET_COOKIE_VERSION;
        let mut comment = None;
        let mut max_age = None;
        let mut expiry = None;
        let mut secure = false;
        let mut http_only = false;

        for (name, value) in parse_parameters(input, ';') {
            match name.to_ascii_lowercase().as_str() {
                "comment" => comment = value,
                "domain" => domain = value,
                "max-age" => max_age = Some(parse_int_attribute("Max-Age", value.as_deref())?),
                "path" => path = value,
                "secure" => secure = true,
                "version" => {
                    version = parse_int_attribute("Version", value.as_deref())?;
                }
                "httponly" => http_only = true,
                "expires" => {
                    expiry = value.as_deref().and_then(parse_cookie_date);
                    if expiry.is_none() {
                        tracing::debug!(value = ?value, "ignoring malformed Set-Cookie Expires");
                    }
                }
                _ => {
                    if cookie.is_none() {
                        cookie = Some((name, value.unwrap_or_default()));
                    }
                }
            }
        }

        let (name, value) = cookie.ok_or(HeaderError::NullArgument { name: "name" })?;

        Ok(Self {
            name,
            value,
            path,
            domain,
            version,
            comment,
            max_age,
            expiry,
            secure,
            http_only,
        })
    }

    /// パスを設定
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    /// ドメインを設定
    pub fn with_domain(mut self, domain: &str) -> Self {
        self.domain = Some(domain.to_string());
        self
    }

    /// バージョンを設定
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// コメントを設定 (version 1 以上でのみ出力)
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Max-Age を設定
    pub fn with_max_age(mut self, seconds: i32) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// 有効期限を設定
    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Secure を設定
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// HttpOnly を設定
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// 名前を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 値を取得
    pub fn value(&self) -> &str {
        &self.value
    }

    /// パスを取得
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// ドメインを取得
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// バージョンを取得
    pub fn version(&self) -> u32 {
        self.version
    }

    /// コメントを取得
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Max-Age を取得
    pub fn max_age(&self) -> Option<i32> {
        self.max_age
    }

    /// 有効期限を取得
    pub fn expiry(&self) -> Option<&DateTime<Utc>> {
        self.expiry.as_ref()
    }

    /// Secure かどうか
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// HttpOnly かどうか
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// Set-Cookie ヘッダー値を生成
    ///
    /// Version 0 では Max-Age を現在時刻からの `Expires` に変換します。
    /// Max-Age が 0 の場合は [`ANCIENT_DATE`] を使います。
    ///
    /// # エラー
    ///
    /// 値、コメント、ドメイン、パスに制御文字が含まれる場合は [`HeaderError::InvalidCookieValue`]
    pub fn to_header_value(&self) -> Result<String, HeaderError> {
        let version = self.version;
        let mut buf = format!(
            "{}={}",
            self.name,
            maybe_quote_cookie_value(version, &self.value)?
        );

        if version >= 1 {
            buf.push_str(&format!("; Version={}", version));
            if let Some(comment) = &self.comment {
                buf.push_str("; Comment=");
                buf.push_str(&maybe_quote_cookie_value(version, comment)?);
            }
        }

        if let Some(domain) = &self.domain {
            buf.push_str("; Domain=");
            buf.push_str(&maybe_quote_cookie_value(version, domain)?);
        }

        let mut expires_written = false;
        if let Some(max_age) = self.max_age.filter(|age| *age >= 0) {
            if version == 0 {
                buf.push_str("; Expires=");
                if max_age == 0 {
                    buf.push_str(ANCIENT_DATE);
                } else {
                    let expires = Utc::now() + Duration::seconds(i64::from(max_age));
                    buf.push_str(&format_cookie_date(&expires));
                }
                expires_written = true;
            } else {
                buf.push_str(&format!("; Max-Age={}", max_age));
            }
        }

        if let Some(path) = &self.path {
            buf.push_str("; Path=");
            buf.push_str(&maybe_quote_cookie_value(version, path)?);
        }

        if self.secure {
            buf.push_str("; Secure");
        }
        if self.http_only {
            buf.push_str("; HttpOnly");
        }

        if let Some(expiry) = self.expiry.filter(|_| !expires_written) {
            buf.push_str("; Expires=");
            buf.push_str(&format_cookie_date(&expiry));
        }

        Ok(buf)
    }
}

fn parse_int_attribute<T: core::str::FromStr>(
    attribute: &str,
    value: Option<&str>,
) -> Result<T, HeaderError> {
    let value = value.unwrap_or_default();
    value.parse::<T>().map_err(|_| {
        HeaderError::invalid_cookie_header(format!("invalid {attribute} value: {value:?}"))
    })
}
