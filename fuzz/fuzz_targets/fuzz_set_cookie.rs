#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http_headers::cookie::SetCookie;

fuzz_target!(|data: &[u8]| {
    // UTF-8 文字列として解釈できる場合のみテスト
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(set_cookie) = SetCookie::parse(s) {
            let _ = set_cookie.comment();
            let _ = set_cookie.expiry();

            if let Ok(header) = set_cookie.to_header_value() {
                // ラウンドトリップ
                if let Ok(reparsed) = SetCookie::parse(&header) {
                    assert_eq!(set_cookie.name(), reparsed.name());
                }
            }

            // Version 0 では Max-Age を Expires に変換する
            let _ = set_cookie.clone().with_version(0).to_header_value();
        }
    }
});
