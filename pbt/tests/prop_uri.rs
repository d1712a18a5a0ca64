//! URI の解決、相対化、テンプレート展開のプロパティテスト

use proptest::prelude::*;
use shiguredo_http_headers::HeaderError;
use shiguredo_http_headers::uri::{Uri, expand_template, percent_encode, relativize, resolve};

// ========================================
// Strategy 定義
// ========================================

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,8}".prop_map(|s| s)
}

// 基底 URI のディレクトリ `b` と衝突しないセグメント
fn tail_segment() -> impl Strategy<Value = String> {
    "x[a-z0-9]{0,6}".prop_map(|s| s)
}

fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).unwrap();
            out.push(u8::from_str_radix(hex, 16).unwrap());
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    out
}

// ========================================
// パーセントエンコーディング
// ========================================

proptest! {
    #[test]
    fn prop_percent_encode_charset(input in any::<String>()) {
        let encoded = percent_encode(&input);
        for c in encoded.chars() {
            prop_assert!(c.is_ascii_alphanumeric() || "-._~%".contains(c), "{}", c);
        }
        prop_assert_eq!(percent_decode(&encoded), input.as_bytes().to_vec());
    }
}

proptest! {
    #[test]
    fn prop_percent_encode_unreserved_unchanged(input in "[a-zA-Z0-9._~-]{0,32}") {
        prop_assert_eq!(percent_encode(&input), input);
    }
}

// ========================================
// テンプレート展開
// ========================================

proptest! {
    #[test]
    fn prop_expand_template_reuses_names(first in segment(), second in segment()) {
        let values = [first.as_str(), second.as_str()];
        let expanded = expand_template("/users/{id}/items/{item: [0-9]+}/{id}", &values).unwrap();
        prop_assert_eq!(expanded, format!("/users/{}/items/{}/{}", first, second, first));
    }
}

proptest! {
    #[test]
    fn prop_expand_template_missing_value(first in segment()) {
        let result = expand_template("/{a}/{b}", &[first.as_str()]);
        prop_assert_eq!(
            result,
            Err(HeaderError::MissingTemplateValue { name: "b".to_string() })
        );
    }
}

proptest! {
    #[test]
    fn prop_expand_template_without_variables(path in "/[a-z0-9/]{0,16}") {
        prop_assert_eq!(expand_template(&path, &[]).unwrap(), path);
    }
}

// ========================================
// 解決と相対化
// ========================================

proptest! {
    #[test]
    fn prop_resolve_sibling(name in segment()) {
        let base = Uri::parse("http://example.com/a/b/c").unwrap();
        let resolved = resolve(&base, &Uri::parse(&name).unwrap()).unwrap();
        let expected = format!("http://example.com/a/b/{}", name);
        prop_assert_eq!(resolved.as_str(), expected.as_str());
    }
}

proptest! {
    #[test]
    fn prop_relativize_sibling(name in segment()) {
        let base = Uri::parse("http://example.com/a/b/c").unwrap();
        let target = Uri::parse(&format!("http://example.com/a/b/{}", name)).unwrap();
        let relative = relativize(&base, &target).unwrap();
        prop_assert_eq!(relative.as_str(), name.as_str());
    }
}

proptest! {
    #[test]
    fn prop_relativize_then_resolve(tail in proptest::collection::vec(tail_segment(), 1..4)) {
        let base = Uri::parse("http://example.com/a/b/c").unwrap();
        let target = Uri::parse(&format!("http://example.com/a/{}", tail.join("/"))).unwrap();

        let relative = relativize(&base, &target).unwrap();
        prop_assert!(relative.is_relative());
        let resolved = resolve(&base, &relative).unwrap();
        prop_assert_eq!(resolved.as_str(), target.as_str());
    }
}

proptest! {
    #[test]
    fn prop_relativize_other_authority(host in "[a-z]{1,8}", name in segment()) {
        prop_assume!(host != "example");
        let base = Uri::parse("http://example.com/a/").unwrap();
        let target = Uri::parse(&format!("http://{}.com/{}", host, name)).unwrap();
        prop_assert_eq!(relativize(&base, &target).unwrap(), target);
    }
}
