#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http_headers::cache::CacheControl;

fuzz_target!(|data: &[u8]| {
    // UTF-8 文字列として解釈できる場合のみテスト
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(cc) = CacheControl::parse(s) {
            let _ = cc.is_no_cache();
            let _ = cc.no_cache_fields();
            let _ = cc.is_private();
            let _ = cc.private_fields();
            let _ = cc.extensions().count();

            // Display 実装のテスト
            let displayed = cc.to_header_value();

            // ラウンドトリップ
            if let Ok(reparsed) = CacheControl::parse(&displayed) {
                assert_eq!(cc.is_no_store(), reparsed.is_no_store());
                assert_eq!(cc.max_age(), reparsed.max_age());
                assert_eq!(cc.s_maxage(), reparsed.s_maxage());
            }
        }
    }
});
