#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http_headers::cookie::{Cookie, SetCookie};

fuzz_target!(|data: &[u8]| {
    // UTF-8 文字列として解釈できる場合のみテスト
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(cookies) = Cookie::parse_all(s) {
            for cookie in &cookies {
                let _ = cookie.path();
                let _ = cookie.domain();

                // 制御文字を含む値は生成できない
                if let Ok(header) = cookie.to_header_value() {
                    if let Ok(reparsed) = Cookie::parse(&header) {
                        assert_eq!(cookie.name(), reparsed.name());
                        assert_eq!(cookie.version(), reparsed.version());
                    }
                }

                // Set-Cookie への変換
                let set_cookie = SetCookie::from_cookie(cookie);
                assert_eq!(set_cookie.name(), cookie.name());
            }
        }
    }
});
