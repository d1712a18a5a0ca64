//! トークン判定とパラメータスキャナ
//!
//! ## 概要
//!
//! 各ヘッダーコーデックが共有する字句レベルの処理を提供します。
//!
//! - トークン判定 (旧 Netscape 形式の Cookie 用と RFC 2109 形式の Cookie 用の 2 種類)
//! - 制御文字の検出
//! - 引用符を考慮した `name=value` パラメータの分割
//! - 引用符付き文字列のエスケープ
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_headers::token::{is_token, is_token2, parse_parameters};
//!
//! assert!(is_token("abc"));
//! assert!(!is_token("a b"));
//! assert!(!is_token2("a/b"));
//!
//! let params = parse_parameters("charset=utf-8; name=\"a;b\"", ';');
//! assert_eq!(params.get("charset"), Some("utf-8"));
//! assert_eq!(params.get("name"), Some("a;b"));
//! ```

use crate::error::HeaderError;

/// Version 0 Cookie の区切り文字
const TSPECIALS: &str = ",; ";

/// Version 1 Cookie の区切り文字 (RFC 2109)
const TSPECIALS_2: &str = "()<>@,;:\\\"/[]?={} \t";

/// メディアタイプのパラメータ値で引用符が必要な文字
const MEDIA_QUOTED_CHARS: &str = "()<>@,;:\\\"/[]?= \t\r\n";

/// Version 0 Cookie のトークンかどうか
///
/// `,` `;` 空白のいずれも含まない場合に true
pub fn is_token(s: &str) -> bool {
    !s.chars().any(|c| TSPECIALS.contains(c))
}

/// Version 1 Cookie のトークンかどうか
///
/// RFC 2109 の tspecials と空白/タブを含まない場合に true
pub fn is_token2(s: &str) -> bool {
    !s.chars().any(|c| TSPECIALS_2.contains(c))
}

/// 制御文字を含むかどうか
///
/// 0x20 未満または 0x7F 以上の文字を制御文字とみなす。水平タブのみ許可。
pub fn contains_control_char(s: &str) -> bool {
    s.chars()
        .any(|c| c != '\t' && ((c as u32) < 0x20 || (c as u32) >= 0x7F))
}

/// メディアタイプのパラメータ値に引用符が必要かどうか
pub fn needs_media_quoting(s: &str) -> bool {
    s.chars().any(|c| MEDIA_QUOTED_CHARS.contains(c))
}

/// 両端の `"` を 1 組だけ取り除く
pub fn unquote(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// 順序付きパラメータマップ
///
/// 挿入順を保持します。同じ名前を再度挿入すると、位置はそのままで値だけ置き換わります。
/// 値のないパラメータ (`Secure` など) は `None` を保持します。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ParameterMap {
    entries: Vec<(String, Option<String>)>,
}

impl ParameterMap {
    /// 空のマップを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// パラメータを挿入
    pub fn insert(&mut self, name: &str, value: Option<String>) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name.to_string(), value));
        }
    }

    /// 値を取得 (名前は大文字小文字を区別)
    ///
    /// 値のないパラメータも `None` を返します。存在確認には [`ParameterMap::contains`] を使ってください。
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// 値を取得 (名前は大文字小文字を区別しない)
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.as_deref())
    }

    /// パラメータが存在するか
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// パラメータ数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 挿入順に走査
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_deref()))
    }
}

impl IntoIterator for ParameterMap {
    type Item = (String, Option<String>);
    type IntoIter = std::vec::IntoIter<(String, Option<String>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// `name=value` の並びをパース
///
/// `separator` で区切られたパラメータを挿入順のマップにします。
///
/// - 名前と値の前後の空白は除去
/// - `"` で囲まれた区間の中の `separator` は区切りとみなさない
/// - 値の両端の `"` は 1 組だけ除去 (エスケープは解除しない)
/// - 空の値と値なしのパラメータは `None`
/// - 名前が空のパラメータは捨てる
pub fn parse_parameters(input: &str, separator: char) -> ParameterMap {
    let mut params = ParameterMap::new();
    let mut rest = input;

    while !rest.is_empty() {
        let name_end = rest
            .find(|c: char| c == '=' || c == separator)
            .unwrap_or(rest.len());
        let name = rest[..name_end].trim();
        rest = &rest[name_end..];

        let mut value = None;
        if let Some(after_eq) = rest.strip_prefix('=') {
            let value_end = find_unquoted(after_eq, separator);
            let raw = unquote(after_eq[..value_end].trim());
            if !raw.is_empty() {
                value = Some(raw.to_string());
            }
            rest = &after_eq[value_end..];
        }

        if let Some(after_separator) = rest.strip_prefix(separator) {
            rest = after_separator;
        }

        if !name.is_empty() {
            params.insert(name, value);
        }
    }

    params
}

/// 引用符の外にある最初の `separator` の位置を探す
fn find_unquoted(input: &str, separator: char) -> usize {
    let mut quoted = false;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        if !quoted && c == separator {
            return i;
        }
        if !escaped && c == '"' {
            quoted = !quoted;
        }
        escaped = !escaped && c == '\\';
    }

    input.len()
}

/// `"` を `\"` にエスケープ
///
/// `\` の直後の文字はそのまま残す。末尾が単独の `\` の場合はエラー。
pub fn escape_double_quotes(s: &str) -> Result<String, HeaderError> {
    let mut result = String::with_capacity(s.len() + 2);
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                result.push(c);
                let next = chars
                    .next()
                    .ok_or_else(|| HeaderError::invalid_cookie_value(s))?;
                result.push(next);
            }
            '"' => result.push_str("\\\""),
            _ => result.push(c),
        }
    }
    Ok(result)
}

/// Cookie のバージョンに応じて値を必要なら引用符で囲む
///
/// - 空の値は `""`
/// - 制御文字を含む値はエラー
/// - すでに引用符で囲まれた値は内側をエスケープして囲み直す
/// - Version 0 は [`is_token`]、Version 1 以上は [`is_token2`] で判定
pub fn maybe_quote_cookie_value(version: u32, value: &str) -> Result<String, HeaderError> {
    if value.is_empty() {
        return Ok("\"\"".to_string());
    }
    if contains_control_char(value) {
        return Err(HeaderError::invalid_cookie_value(value));
    }

    let already_quoted = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');
    let needs_quote = if version == 0 {
        !is_token(value)
    } else {
        !is_token2(value)
    };

    if already_quoted {
        Ok(format!(
            "\"{}\"",
            escape_double_quotes(&value[1..value.len() - 1])?
        ))
    } else if needs_quote {
        Ok(format!("\"{}\"", escape_double_quotes(value)?))
    } else {
        Ok(value.to_string())
    }
}
