#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http_headers::uri::{Uri, expand_template, percent_encode, relativize, resolve};

fuzz_target!(|data: &[u8]| {
    // UTF-8 文字列として解釈できる場合のみテスト
    if let Ok(s) = std::str::from_utf8(data) {
        // パーセントエンコーディング
        let encoded = percent_encode(s);
        assert!(
            encoded
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b"-._~%".contains(&b))
        );

        // テンプレート展開
        let _ = expand_template(s, &["a", "b"]);

        if let Ok(uri) = Uri::parse(s) {
            let _ = uri.host();
            let _ = uri.port();
            assert_eq!(uri.is_absolute(), !uri.is_relative());

            // 解決と相対化
            if let Ok(base) = Uri::parse("http://example.com/a/b/c?q") {
                if let Ok(resolved) = resolve(&base, &uri) {
                    let _ = relativize(&base, &resolved);
                }
            }
        }
    }
});
