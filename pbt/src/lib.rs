//! PBT テスト共通ユーティリティ

use proptest::prelude::*;

// ========================================
// トークン生成
// ========================================

/// ヘッダーのトークン (英数字と `-`)
pub fn token() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9-]{0,15}".prop_map(|s| s)
}

/// 小文字のトークン
pub fn lower_token() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}".prop_map(|s| s)
}

/// `"` `\` `,` `;` を含まない印字可能な値 (空白を含む)
pub fn plain_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ./:@?=_-]{0,24}".prop_map(|s| s)
}

// ========================================
// Cache-Control 生成
// ========================================

/// Cache-Control の既知ディレクティブと衝突しない拡張ディレクティブ名
pub fn extension_directive() -> impl Strategy<Value = String> {
    "x-[a-z]{1,10}".prop_map(|s| s)
}

// ========================================
// メディアタイプ生成
// ========================================

/// type / subtype に使える文字列
pub fn media_type_part() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9.+-]{0,15}".prop_map(|s| s)
}

/// メディアタイプのパラメータ値 (引用符が必要な文字を含むことがある)
pub fn media_parameter_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ./=-]{1,16}".prop_map(|s| s)
}

// ========================================
// 言語タグ生成 (BCP 47/RFC 5646)
// ========================================

/// 先頭サブタグ: ALPHA のみ (1-8 文字)
pub fn language_primary_subtag() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,8}".prop_map(|s| s)
}

/// 後続サブタグ: ALPHA / DIGIT (1-8 文字)
pub fn language_subsequent_subtag() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{1,8}".prop_map(|s| s)
}

/// 言語タグ: primary-subtag *("-" subtag)
pub fn language_tag() -> impl Strategy<Value = String> {
    (
        language_primary_subtag(),
        proptest::collection::vec(language_subsequent_subtag(), 0..=2),
    )
        .prop_map(|(primary, rest)| {
            if rest.is_empty() {
                primary
            } else {
                format!("{}-{}", primary, rest.join("-"))
            }
        })
}

// ========================================
// q 値生成
// ========================================

/// 小数点以下 3 桁までの q 値 (0.000 - 1.000)
pub fn qvalue() -> impl Strategy<Value = String> {
    (0u16..=1000).prop_map(|n| {
        if n == 1000 {
            "1".to_string()
        } else {
            format!("0.{:03}", n)
        }
    })
}
