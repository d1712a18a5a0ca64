#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http_headers::etag::EntityTag;

fuzz_target!(|data: &[u8]| {
    // UTF-8 文字列として解釈できる場合のみテスト
    if let Ok(s) = std::str::from_utf8(data) {
        let etag = EntityTag::parse(s);

        // Display 実装のテスト
        let displayed = etag.to_string();

        // ラウンドトリップ
        let reparsed = EntityTag::parse(&displayed);
        assert_eq!(etag, reparsed);

        // 比較メソッド
        assert!(etag.weak_compare(&reparsed));
        assert_eq!(etag.strong_compare(&reparsed), etag.is_strong());
    }
});
