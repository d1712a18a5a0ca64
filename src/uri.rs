//! Link ヘッダー用の URI 処理 (RFC 3986 / RFC 6570 の簡易サブセット)
//!
//! ## 概要
//!
//! Link ヘッダーのターゲット URI を扱うための処理を提供します。
//!
//! - URI の分解 (scheme / authority / path / query / fragment)
//! - 基底 URI に対する相対参照の解決
//! - URI の相対化
//! - `{name}` 形式のテンプレートへの位置指定での値の埋め込み
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_headers::uri::{Uri, expand_template, relativize, resolve};
//!
//! let base = Uri::parse("http://example.com/a/b/c").unwrap();
//! let resolved = resolve(&base, &Uri::parse("../d").unwrap()).unwrap();
//! assert_eq!(resolved.as_str(), "http://example.com/a/d");
//!
//! let relative = relativize(&base, &resolved).unwrap();
//! assert_eq!(relative.as_str(), "../d");
//!
//! let expanded = expand_template("/users/{id}/posts/{post}", &["42", "a b"]).unwrap();
//! assert_eq!(expanded, "/users/42/posts/a%20b");
//! ```

use core::fmt;

use thiserror::Error;

use crate::error::HeaderError;

/// URI パースエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    /// 空の URI
    #[error("empty URI")]
    Empty,
    /// 不正なポート番号
    #[error("invalid port")]
    InvalidPort,
    /// 不正なスキーム
    #[error("invalid scheme")]
    InvalidScheme,
    /// 不正なホスト
    #[error("invalid host")]
    InvalidHost,
    /// 閉じていないテンプレート変数
    #[error("unterminated template variable: {0}")]
    UnterminatedTemplate(String),
}

/// パース済み URI
///
/// ```text
///   foo://example.com:8042/over/there?name=ferret#nose
///   \_/   \______________/\_________/ \_________/ \__/
///    |           |            |            |        |
/// scheme     authority       path        query   fragment
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uri {
    source: String,
    scheme: Option<String>,
    authority: Option<String>,
    port: Option<u16>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl Uri {
    /// URI 文字列をパース
    ///
    /// # 例
    ///
    /// ```rust
    /// use shiguredo_http_headers::uri::Uri;
    ///
    /// let uri = Uri::parse("https://example.com:8443/path?q#top").unwrap();
    /// assert_eq!(uri.scheme(), Some("https"));
    /// assert_eq!(uri.host(), Some("example.com"));
    /// assert_eq!(uri.port(), Some(8443));
    /// assert_eq!(uri.path(), "/path");
    /// assert_eq!(uri.query(), Some("q"));
    /// assert_eq!(uri.fragment(), Some("top"));
    /// ```
    pub fn parse(input: &str) -> Result<Self, UriError> {
        if input.is_empty() {
            return Err(UriError::Empty);
        }

        let (rest, fragment) = match input.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (input, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query.to_string())),
            None => (rest, None),
        };

        let (scheme, rest) = match scheme_end(rest) {
            Some(end) => {
                let scheme = &rest[..end];
                if !scheme.starts_with(|c: char| c.is_ascii_alphabetic()) {
                    return Err(UriError::InvalidScheme);
                }
                (Some(scheme.to_string()), &rest[end + 1..])
            }
            None => (None, rest),
        };

        let (authority, port, path) = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after.find('/').unwrap_or(after.len());
                let authority = &after[..end];
                let port = parse_port(authority)?;
                (Some(authority.to_string()), port, &after[end..])
            }
            None => (None, None, rest),
        };

        Ok(Uri {
            source: input.to_string(),
            scheme,
            authority,
            port,
            path: path.to_string(),
            query,
            fragment,
        })
    }

    /// 各要素から URI を組み立てる
    fn from_parts(
        scheme: Option<&str>,
        authority: Option<&str>,
        path: &str,
        query: Option<&str>,
        fragment: Option<&str>,
    ) -> Result<Self, UriError> {
        let mut source = String::new();
        if let Some(scheme) = scheme {
            source.push_str(scheme);
            source.push(':');
        }
        if let Some(authority) = authority {
            source.push_str("//");
            source.push_str(authority);
        }
        source.push_str(path);
        if let Some(query) = query {
            source.push('?');
            source.push_str(query);
        }
        if let Some(fragment) = fragment {
            source.push('#');
            source.push_str(fragment);
        }

        if source.is_empty() {
            // 空の相対参照 (同一ドキュメント)
            return Ok(Uri {
                source,
                scheme: None,
                authority: None,
                port: None,
                path: String::new(),
                query: None,
                fragment: None,
            });
        }
        Uri::parse(&source)
    }

    /// スキームを取得
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// authority 全体を取得
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// ホストを取得 (userinfo とポートを除く)
    pub fn host(&self) -> Option<&str> {
        let authority = self.authority.as_deref()?;
        let host_port = match authority.rfind('@') {
            Some(at) => &authority[at + 1..],
            None => authority,
        };
        if host_port.starts_with('[') {
            let end = host_port.find(']').map(|p| p + 1).unwrap_or(host_port.len());
            return Some(&host_port[..end]);
        }
        Some(match (self.port, host_port.rfind(':')) {
            (Some(_), Some(colon)) => &host_port[..colon],
            _ => host_port,
        })
    }

    /// ポート番号を取得
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// パスを取得
    pub fn path(&self) -> &str {
        &self.path
    }

    /// クエリを取得
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// フラグメントを取得
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// 元の URI 文字列を取得
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// 絶対 URI かどうか
    pub fn is_absolute(&self) -> bool {
        self.scheme.is_some()
    }

    /// 相対参照かどうか
    pub fn is_relative(&self) -> bool {
        self.scheme.is_none()
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// スキームの終端 (`:` の位置) を探す
fn scheme_end(input: &str) -> Option<usize> {
    for (i, b) in input.bytes().enumerate() {
        match b {
            b':' if i > 0 => return Some(i),
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'+' | b'-' | b'.' => {}
            _ => return None,
        }
    }
    None
}

/// authority からポート番号を取り出す
fn parse_port(authority: &str) -> Result<Option<u16>, UriError> {
    let host_port = match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    };

    let port_str = if let Some(ipv6) = host_port.strip_prefix('[') {
        let end = ipv6.find(']').ok_or(UriError::InvalidHost)?;
        let after = &ipv6[end + 1..];
        if after.is_empty() {
            return Ok(None);
        }
        after.strip_prefix(':').ok_or(UriError::InvalidHost)?
    } else {
        match host_port.rsplit_once(':') {
            Some((_, port)) => port,
            None => return Ok(None),
        }
    };

    if port_str.is_empty() {
        return Ok(None);
    }
    port_str
        .parse::<u16>()
        .map(Some)
        .map_err(|_| UriError::InvalidPort)
}

/// 相対参照を基底 URI に対して解決 (RFC 3986 Section 5.2.2)
///
/// # 例
///
/// ```rust
/// use shiguredo_http_headers::uri::{Uri, resolve};
///
/// let base = Uri::parse("http://example.com/a/b/c").unwrap();
/// let resolved = resolve(&base, &Uri::parse("g?x").unwrap()).unwrap();
/// assert_eq!(resolved.as_str(), "http://example.com/a/b/g?x");
/// ```
pub fn resolve(base: &Uri, reference: &Uri) -> Result<Uri, UriError> {
    if reference.is_absolute() {
        return Uri::from_parts(
            reference.scheme(),
            reference.authority(),
            &remove_dot_segments(reference.path()),
            reference.query(),
            reference.fragment(),
        );
    }

    if reference.authority().is_some() {
        return Uri::from_parts(
            base.scheme(),
            reference.authority(),
            &remove_dot_segments(reference.path()),
            reference.query(),
            reference.fragment(),
        );
    }

    if reference.path().is_empty() {
        return Uri::from_parts(
            base.scheme(),
            base.authority(),
            base.path(),
            reference.query().or(base.query()),
            reference.fragment(),
        );
    }

    let path = if reference.path().starts_with('/') {
        remove_dot_segments(reference.path())
    } else {
        remove_dot_segments(&merge_paths(base, reference.path()))
    };

    Uri::from_parts(
        base.scheme(),
        base.authority(),
        &path,
        reference.query(),
        reference.fragment(),
    )
}

/// URI を基底 URI からの相対参照にする
///
/// scheme と authority が一致する場合、共通のパスセグメントを除き、
/// 残りの基底セグメント分だけ `..` を並べた相対パスを返します。
/// 結果のパスが空になる場合と、先頭セグメントに `:` を含む場合は `./` を付けます。
/// 一致しない場合は `target` をそのまま返します。
pub fn relativize(base: &Uri, target: &Uri) -> Result<Uri, UriError> {
    let same_scheme = match (base.scheme(), target.scheme()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    };
    if !same_scheme || base.authority() != target.authority() {
        return Ok(target.clone());
    }

    let base_segments = directory_segments(base.path());
    let target_segments: Vec<&str> = target
        .path()
        .trim_start_matches('/')
        .split('/')
        .collect();

    // 最後のセグメントはファイル名なのでディレクトリとしては比較しない
    let target_directories = &target_segments[..target_segments.len().saturating_sub(1)];
    let common = base_segments
        .iter()
        .zip(target_directories.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(std::iter::repeat_n("..", base_segments.len() - common));
    parts.extend(target_segments[common..].iter().copied());
    let mut path = parts.join("/");

    // 空のパスと `:` を含む先頭セグメントには `./` を付ける (RFC 3986 Section 4.2)
    let first_segment = path.split('/').next().unwrap_or_default();
    if path.is_empty() || first_segment.contains(':') {
        path.insert_str(0, "./");
    }

    Uri::from_parts(None, None, &path, target.query(), target.fragment())
}

/// 最後のセグメントを除いたディレクトリ部分のセグメント
fn directory_segments(path: &str) -> Vec<&str> {
    let path = path.trim_start_matches('/');
    match path.rfind('/') {
        Some(last) => path[..last].split('/').collect(),
        None => Vec::new(),
    }
}

/// 基底パスと相対パスをマージ (RFC 3986 Section 5.2.3)
fn merge_paths(base: &Uri, reference_path: &str) -> String {
    if base.authority().is_some() && base.path().is_empty() {
        return format!("/{}", reference_path);
    }
    match base.path().rfind('/') {
        Some(last) => format!("{}{}", &base.path()[..=last], reference_path),
        None => reference_path.to_string(),
    }
}

/// `.` と `..` セグメントを除去 (RFC 3986 Section 5.2.4)
fn remove_dot_segments(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut output: Vec<&str> = Vec::new();
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let last_index = segments.len().saturating_sub(1);
    let mut trailing_slash = false;

    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            "." => trailing_slash = i == last_index,
            ".." => {
                output.pop();
                trailing_slash = i == last_index;
            }
            _ => {
                output.push(segment);
                trailing_slash = false;
            }
        }
    }

    let mut result = String::with_capacity(path.len());
    if absolute {
        result.push('/');
    }
    result.push_str(&output.join("/"));
    if trailing_slash && !result.is_empty() && !result.ends_with('/') {
        result.push('/');
    }
    result
}

/// パーセントエンコーディング
///
/// RFC 3986 の unreserved 文字以外をエンコードします。
pub fn percent_encode(input: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut result = String::with_capacity(input.len() * 3);
    for b in input.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            result.push(b as char);
        } else {
            result.push('%');
            result.push(HEX[(b >> 4) as usize] as char);
            result.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    result
}

/// URI テンプレートに値を埋め込む
///
/// `{name}` または `{name: regex}` 形式の変数を、出現順に `values` の値で置き換えます。
/// 同じ名前の変数が再度現れた場合は最初の値を使います。値はパーセントエンコードされます。
pub fn expand_template(template: &str, values: &[&str]) -> Result<String, HeaderError> {
    let mut result = String::with_capacity(template.len());
    let mut names: Vec<&str> = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = find_closing_brace(after)
            .ok_or_else(|| UriError::UnterminatedTemplate(template.to_string()))?;

        let variable = &after[..close];
        let name = variable
            .split_once(':')
            .map_or(variable, |(name, _)| name)
            .trim();

        let index = match names.iter().position(|n| *n == name) {
            Some(index) => index,
            None => {
                names.push(name);
                names.len() - 1
            }
        };
        let value = values
            .get(index)
            .ok_or_else(|| HeaderError::MissingTemplateValue {
                name: name.to_string(),
            })?;
        result.push_str(&percent_encode(value));

        rest = &after[close + 1..];
    }
    result.push_str(rest);

    Ok(result)
}

/// 変数の閉じ括弧の位置を探す
///
/// 正規表現内の `{m,n}` のような入れ子の括弧は読み飛ばす。
fn find_closing_brace(input: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(i),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}
