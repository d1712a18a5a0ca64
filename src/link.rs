//! Link ヘッダー (RFC 8288)
//!
//! ## 概要
//!
//! `<uri>; name="value"` 形式の Link ヘッダーを扱います。
//!
//! - 1 つのヘッダー値に含められる URI は 1 つだけです。
//! - `rel` パラメータは複数回指定すると空白区切りで連結されます。
//! - 出力時のパラメータ値は常に `"` で囲みます。
//!
//! [`LinkBuilder`] は URI テンプレートと基底 URI を保持し、
//! [`LinkBuilder::build`] で不変の [`Link`] を生成します。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_headers::link::Link;
//! use shiguredo_http_headers::uri::Uri;
//!
//! let link = Link::parse("<http://example.com/items?page=2>; rel=next; title=\"Next\"").unwrap();
//! assert_eq!(link.uri().as_str(), "http://example.com/items?page=2");
//! assert_eq!(link.rel(), Some("next"));
//! assert_eq!(
//!     link.to_string(),
//!     "<http://example.com/items?page=2>; rel=\"next\"; title=\"Next\""
//! );
//!
//! let link = Link::builder()
//!     .uri_str("/users/{id}")
//!     .base_uri(Uri::parse("http://example.com/").unwrap())
//!     .rel("self")
//!     .build(&["42"])
//!     .unwrap();
//! assert_eq!(link.to_string(), "<http://example.com/users/42>; rel=\"self\"");
//! ```

use core::fmt;

use crate::error::HeaderError;
use crate::uri::{Uri, expand_template, relativize, resolve};

/// `rel` パラメータ名
pub const REL: &str = "rel";
/// `title` パラメータ名
pub const TITLE: &str = "title";
/// `type` パラメータ名
pub const TYPE: &str = "type";

/// Link ヘッダーの値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    uri: Uri,
    params: Vec<(String, String)>,
}

impl Link {
    /// 新しい Link を作成
    pub fn new(uri: Uri) -> Self {
        Self {
            uri,
            params: Vec::new(),
        }
    }

    /// ビルダーを作成
    pub fn builder() -> LinkBuilder {
        LinkBuilder::new()
    }

    /// Link ヘッダー値をパース
    ///
    /// # エラー
    ///
    /// - `<` が 2 回以上現れる場合は [`HeaderError::MultipleLinksInHeader`]
    /// - `>` がない場合は [`HeaderError::UnterminatedLinkUri`]
    /// - パラメータの値がない、または `"` が閉じていない場合は [`HeaderError::UnterminatedLinkParam`]
    /// - パラメータに `=` がない場合は [`HeaderError::InvalidLinkParam`]
    /// - URI がない場合は [`HeaderError::NullArgument`]
    pub fn parse(input: &str) -> Result<Self, HeaderError> {
        let bytes = input.as_bytes();
        let mut pos = 0;
        let mut href: Option<&str> = None;
        let mut staged = LinkBuilder::new();

        while pos < bytes.len() {
            match bytes[pos] {
                b'<' => {
                    if href.is_some() {
                        return Err(HeaderError::MultipleLinksInHeader {
                            header: input.to_string(),
                        });
                    }
                    let end = input[pos..].find('>').map(|i| pos + i).ok_or_else(|| {
                        HeaderError::UnterminatedLinkUri {
                            header: input.to_string(),
                        }
                    })?;
                    href = Some(&input[pos + 1..end]);
                    pos = end + 1;
                }
                b';' | b',' | b' ' | b'\t' => pos += 1,
                _ => {
                    let (name, value, next) = parse_param(input, pos)?;
                    staged.apply(name, value);
                    pos = next;
                }
            }
        }

        let href = href.ok_or(HeaderError::NullArgument { name: "uri" })?;
        Ok(Link {
            uri: Uri::parse(href)?,
            params: staged.params,
        })
    }

    /// ターゲット URI を取得
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// `rel` パラメータを取得
    pub fn rel(&self) -> Option<&str> {
        self.param(REL)
    }

    /// `rel` パラメータを空白で分割して取得
    pub fn rels(&self) -> Vec<&str> {
        self.rel()
            .map(|rel| rel.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// `title` パラメータを取得
    pub fn title(&self) -> Option<&str> {
        self.param(TITLE)
    }

    /// `type` パラメータを取得
    pub fn link_type(&self) -> Option<&str> {
        self.param(TYPE)
    }

    /// パラメータを取得
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// パラメータを挿入順に取得
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// ヘッダー値を生成
    pub fn to_header_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.uri)?;
        for (name, value) in &self.params {
            write!(f, "; {}=\"{}\"", name, escape_quoted(value))?;
        }
        Ok(())
    }
}

/// `"` と `\` をエスケープ
fn escape_quoted(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' || c == '\\' {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// `pos` から始まるパラメータを 1 つ読む
///
/// 名前、値、次の読み取り位置を返す。
fn parse_param(input: &str, pos: usize) -> Result<(&str, String, usize), HeaderError> {
    let unterminated = || HeaderError::UnterminatedLinkParam {
        header: input.to_string(),
    };

    let eq = input[pos..]
        .find('=')
        .map(|i| pos + i)
        .ok_or_else(|| HeaderError::InvalidLinkParam {
            header: input.to_string(),
        })?;
    if eq + 1 >= input.len() {
        return Err(unterminated());
    }

    let name = input[pos..eq].trim();
    let start = eq + 1;
    let rest = &input[start..];

    if let Some(quoted) = rest.strip_prefix('"') {
        let mut value = String::new();
        let mut chars = quoted.char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => return Ok((name, value, start + 1 + i + 1)),
                '\\' => {
                    let (_, escaped) = chars.next().ok_or_else(unterminated)?;
                    value.push(escaped);
                }
                _ => value.push(c),
            }
        }
        Err(unterminated())
    } else {
        let end = rest.find([',', ';']).unwrap_or(rest.len());
        Ok((name, rest[..end].trim().to_string(), start + end))
    }
}

/// Link のビルダー
///
/// ターゲット URI (テンプレート) と基底 URI、パラメータを保持します。
/// [`LinkBuilder::build`] はビルダーを変更しないため、同じビルダーから複数の Link を生成できます。
#[derive(Debug, Clone, Default)]
pub struct LinkBuilder {
    template: Option<String>,
    base_uri: Option<Uri>,
    params: Vec<(String, String)>,
}

impl LinkBuilder {
    /// 空のビルダーを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存の Link からターゲット URI とパラメータをコピー
    ///
    /// それまでに設定したパラメータは破棄されます。
    pub fn link(mut self, link: &Link) -> Self {
        self.template = Some(link.uri.as_str().to_string());
        self.params = link.params.clone();
        self
    }

    /// Link ヘッダー値をパースしてターゲット URI とパラメータをコピー
    pub fn link_str(self, link: &str) -> Result<Self, HeaderError> {
        let link = Link::parse(link)?;
        Ok(self.link(&link))
    }

    /// ターゲット URI を設定
    pub fn uri(mut self, uri: &Uri) -> Self {
        self.template = Some(uri.as_str().to_string());
        self
    }

    /// ターゲット URI をテンプレート文字列で設定
    ///
    /// `{name}` 形式の変数は [`LinkBuilder::build`] の引数で置き換えられます。
    pub fn uri_str(mut self, template: &str) -> Self {
        self.template = Some(template.to_string());
        self
    }

    /// 基底 URI を設定
    pub fn base_uri(mut self, base_uri: Uri) -> Self {
        self.base_uri = Some(base_uri);
        self
    }

    /// `rel` を追加 (既存の値に空白区切りで連結)
    pub fn rel(mut self, rel: &str) -> Self {
        self.add_rel(rel);
        self
    }

    /// `title` を設定
    pub fn title(self, title: &str) -> Self {
        self.param(TITLE, title)
    }

    /// `type` を設定
    pub fn media_type(self, media_type: &str) -> Self {
        self.param(TYPE, media_type)
    }

    /// 任意のパラメータを設定
    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.set_param(name, value);
        self
    }

    fn add_rel(&mut self, rel: &str) {
        let joined = match self.params.iter().find(|(n, _)| n == REL) {
            Some((_, existing)) => format!("{} {}", existing, rel),
            None => rel.to_string(),
        };
        self.set_param(REL, &joined);
    }

    fn set_param(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.params.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value.to_string();
        } else {
            self.params.push((name.to_string(), value.to_string()));
        }
    }

    /// パース時のパラメータ振り分け
    fn apply(&mut self, name: &str, value: String) {
        match name {
            REL => self.add_rel(&value),
            _ => self.set_param(name, &value),
        }
    }

    /// Link を生成
    ///
    /// テンプレートを `values` で展開し、相対 URI であれば基底 URI に対して解決します。
    /// ターゲット URI がなければ基底 URI をそのまま使います。
    ///
    /// # エラー
    ///
    /// - ターゲット URI と基底 URI のどちらもない場合は [`HeaderError::NullArgument`]
    /// - テンプレートの値が足りない場合は [`HeaderError::MissingTemplateValue`]
    /// - URI が不正な場合は [`HeaderError::InvalidUri`]
    pub fn build(&self, values: &[&str]) -> Result<Link, HeaderError> {
        let built = match &self.template {
            Some(template) => Uri::parse(&expand_template(template, values)?)?,
            None => self
                .base_uri
                .clone()
                .ok_or(HeaderError::NullArgument { name: "uri" })?,
        };

        let uri = match &self.base_uri {
            Some(base) if built.is_relative() => resolve(base, &built)?,
            _ => built,
        };

        Ok(Link {
            uri,
            params: self.params.clone(),
        })
    }

    /// `uri` からの相対 URI を持つ Link を生成
    ///
    /// テンプレートを展開して基底 URI に対して解決したあと、`uri` に対して相対化します。
    pub fn build_relativized(&self, uri: &Uri, values: &[&str]) -> Result<Link, HeaderError> {
        let template = self
            .template
            .as_deref()
            .ok_or(HeaderError::NullArgument { name: "uri" })?;
        let built = Uri::parse(&expand_template(template, values)?)?;
        let with = match &self.base_uri {
            Some(base) => resolve(base, &built)?,
            None => built,
        };

        Ok(Link {
            uri: relativize(uri, &with)?,
            params: self.params.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uri::UriError;

    #[test]
    fn test_parse() {
        let link = Link::parse("<http://x/y>; rel=\"self\"; title=\"T\"").unwrap();
        assert_eq!(link.uri().as_str(), "http://x/y");
        assert_eq!(link.rel(), Some("self"));
        assert_eq!(link.title(), Some("T"));
        assert_eq!(link.link_type(), None);
    }

    #[test]
    fn test_roundtrip() {
        let input = "<http://x/y>; rel=\"self\"; title=\"T\"";
        let link = Link::parse(input).unwrap();
        assert_eq!(link.to_header_value(), input);
        assert_eq!(Link::parse(&link.to_string()).unwrap(), link);
    }

    #[test]
    fn test_parse_bare_values() {
        let link = Link::parse("<../a>;rel=prev;type=text/html;hreflang=en").unwrap();
        assert_eq!(link.uri().as_str(), "../a");
        assert_eq!(link.rel(), Some("prev"));
        assert_eq!(link.link_type(), Some("text/html"));
        assert_eq!(link.param("hreflang"), Some("en"));
        assert_eq!(
            link.params().collect::<Vec<_>>(),
            vec![("rel", "prev"), ("type", "text/html"), ("hreflang", "en")]
        );
    }

    #[test]
    fn test_parse_rel_concatenation() {
        let link = Link::parse("<http://x/>; rel=next; title=a; rel=\"last\"; title=b").unwrap();
        assert_eq!(link.rel(), Some("next last"));
        assert_eq!(link.rels(), vec!["next", "last"]);
        assert_eq!(link.title(), Some("b"));
        assert_eq!(
            link.to_string(),
            "<http://x/>; rel=\"next last\"; title=\"b\""
        );
    }

    #[test]
    fn test_parse_quoted_special_chars() {
        let link = Link::parse("<http://x/>; title=\"a; b, <c>\"").unwrap();
        assert_eq!(link.title(), Some("a; b, <c>"));

        let link = Link::parse("<http://x/>; title=\"say \\\"hi\\\"\"").unwrap();
        assert_eq!(link.title(), Some("say \"hi\""));
        assert_eq!(
            link.to_string(),
            "<http://x/>; title=\"say \\\"hi\\\"\""
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Link::parse("<http://a/>; rel=x; <http://b/>"),
            Err(HeaderError::MultipleLinksInHeader { .. })
        ));
        assert!(matches!(
            Link::parse("<http://a/>; rel=\"x\", <http://b/>; rel=\"y\""),
            Err(HeaderError::MultipleLinksInHeader { .. })
        ));
        assert!(matches!(
            Link::parse("<http://a/; rel=x"),
            Err(HeaderError::UnterminatedLinkUri { .. })
        ));
        assert!(matches!(
            Link::parse("<http://a/>; title=\"abc"),
            Err(HeaderError::UnterminatedLinkParam { .. })
        ));
        assert!(matches!(
            Link::parse("<http://a/>; rel="),
            Err(HeaderError::UnterminatedLinkParam { .. })
        ));
        assert!(matches!(
            Link::parse("<http://a/>; rel"),
            Err(HeaderError::InvalidLinkParam { .. })
        ));
        assert_eq!(
            Link::parse("rel=next"),
            Err(HeaderError::NullArgument { name: "uri" })
        );
        assert_eq!(
            Link::parse("<>; rel=next"),
            Err(HeaderError::InvalidUri(UriError::Empty))
        );
    }

    #[test]
    fn test_builder_resolve() {
        let base = Uri::parse("http://example.com/api/").unwrap();
        let builder = Link::builder()
            .uri_str("items/{id}")
            .base_uri(base)
            .rel("item")
            .title("Item")
            .media_type("application/json");

        let link = builder.build(&["a b"]).unwrap();
        assert_eq!(link.uri().as_str(), "http://example.com/api/items/a%20b");
        assert_eq!(
            link.to_string(),
            "<http://example.com/api/items/a%20b>; rel=\"item\"; title=\"Item\"; type=\"application/json\""
        );

        // ビルダーは再利用できる
        let link = builder.build(&["2"]).unwrap();
        assert_eq!(link.uri().as_str(), "http://example.com/api/items/2");
    }

    #[test]
    fn test_builder_absolute_ignores_base() {
        let link = Link::builder()
            .uri(&Uri::parse("https://other.example/x").unwrap())
            .base_uri(Uri::parse("http://example.com/").unwrap())
            .build(&[])
            .unwrap();
        assert_eq!(link.uri().as_str(), "https://other.example/x");
    }

    #[test]
    fn test_builder_base_only() {
        let link = Link::builder()
            .base_uri(Uri::parse("http://example.com/").unwrap())
            .build(&[])
            .unwrap();
        assert_eq!(link.uri().as_str(), "http://example.com/");

        assert_eq!(
            Link::builder().rel("x").build(&[]),
            Err(HeaderError::NullArgument { name: "uri" })
        );
    }

    #[test]
    fn test_builder_missing_template_value() {
        assert_eq!(
            Link::builder().uri_str("/{a}").build(&[]),
            Err(HeaderError::MissingTemplateValue {
                name: "a".to_string()
            })
        );
    }

    #[test]
    fn test_builder_link_copy() {
        let source = Link::parse("<http://x/a>; rel=up; foo=bar").unwrap();
        let link = Link::builder()
            .title("dropped")
            .link(&source)
            .rel("parent")
            .build(&[])
            .unwrap();
        assert_eq!(link.uri(), source.uri());
        assert_eq!(link.rels(), vec!["up", "parent"]);
        assert_eq!(link.param("foo"), Some("bar"));
        assert_eq!(link.title(), None);

        let link = Link::builder()
            .link_str("<http://x/b>; rel=next")
            .unwrap()
            .build(&[])
            .unwrap();
        assert_eq!(link.uri().as_str(), "http://x/b");
        assert!(Link::builder().link_str("<http://x/b").is_err());
    }

    #[test]
    fn test_build_relativized() {
        let builder = Link::builder()
            .uri_str("/a/b/{leaf}")
            .base_uri(Uri::parse("http://example.com/").unwrap())
            .rel("self");
        let current = Uri::parse("http://example.com/a/c").unwrap();

        let link = builder.build_relativized(&current, &["d"]).unwrap();
        assert_eq!(link.uri().as_str(), "b/d");
        assert_eq!(link.to_string(), "<b/d>; rel=\"self\"");

        let elsewhere = Uri::parse("https://example.org/a/c").unwrap();
        let link = builder.build_relativized(&elsewhere, &["d"]).unwrap();
        assert_eq!(link.uri().as_str(), "http://example.com/a/b/d");
    }

    #[test]
    fn test_build_relativized_colon_segment() {
        let builder = Link::builder()
            .uri_str("/dir/c:d")
            .base_uri(Uri::parse("http://example.com/").unwrap())
            .rel("self");
        let current = Uri::parse("http://example.com/dir/page").unwrap();

        let link = builder.build_relativized(&current, &[]).unwrap();
        assert_eq!(link.uri().as_str(), "./c:d");
        assert!(link.uri().scheme().is_none());
        assert_eq!(link.to_string(), "<./c:d>; rel=\"self\"");
    }
}
