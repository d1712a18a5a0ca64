use thiserror::Error;

use crate::uri::UriError;

/// ヘッダー値のパース/生成エラー
///
/// すべてのコーデックが同じエラー型を返すため、呼び出し側は
/// ヘッダーの種類を問わず 400 系のレスポンスへ変換できます。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// 値が必須の Cache-Control ディレクティブに値がない
    #[error("Cache-Control {directive} directive does not have a value: {header}")]
    MissingDirectiveValue {
        directive: &'static str,
        header: String,
    },

    /// Cache-Control ディレクティブの値が数値ではない
    #[error("invalid Cache-Control {directive} value: {value}")]
    InvalidDirectiveValue {
        directive: &'static str,
        value: String,
    },

    /// Cookie / Set-Cookie ヘッダーの形式が不正
    #[error("invalid cookie header: {reason}")]
    InvalidCookieHeader { reason: String },

    /// Cookie 値に使えない文字が含まれている
    #[error("invalid cookie value: {value}")]
    InvalidCookieValue { value: String },

    /// Link ヘッダーに複数の URI が含まれている
    #[error("too many links in Link header: {header}")]
    MultipleLinksInHeader { header: String },

    /// Link ヘッダーの `<` が閉じていない
    #[error("no end to link URI in Link header: {header}")]
    UnterminatedLinkUri { header: String },

    /// Link ヘッダーのパラメータ値の `"` が閉じていない
    #[error("no end to parameter in Link header: {header}")]
    UnterminatedLinkParam { header: String },

    /// Link ヘッダーのパラメータに `=` がない
    #[error("invalid parameter in Link header: {header}")]
    InvalidLinkParam { header: String },

    /// 不正なメディアタイプ
    #[error("invalid media type: {value}")]
    InvalidMediaType { value: String },

    /// q 値が数値ではない
    #[error("invalid weight: {value}")]
    InvalidWeight { value: String },

    /// q 値が 1.0 を超えている
    #[error("weight [{value}] cannot be greater than 1.0")]
    WeightOutOfRange { value: String },

    /// 必須の値がない
    #[error("{name} must not be null")]
    NullArgument { name: &'static str },

    /// URI が不正
    #[error("invalid URI: {0}")]
    InvalidUri(#[from] UriError),

    /// URI テンプレートの値が足りない
    #[error("missing value for URI template parameter: {name}")]
    MissingTemplateValue { name: String },
}

impl HeaderError {
    pub(crate) fn invalid_cookie_header<S: ToString>(reason: S) -> Self {
        Self::InvalidCookieHeader {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_cookie_value<S: ToString>(value: S) -> Self {
        Self::InvalidCookieValue {
            value: value.to_string(),
        }
    }

    pub(crate) fn invalid_media_type<S: ToString>(value: S) -> Self {
        Self::InvalidMediaType {
            value: value.to_string(),
        }
    }
}
