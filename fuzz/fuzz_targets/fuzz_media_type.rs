#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use shiguredo_http_headers::limits::CacheLimits;
use shiguredo_http_headers::media_type::{MediaType, MediaTypeCache, MediaTypeCodec};

fuzz_target!(|data: &[u8]| {
    // UTF-8 文字列として解釈できる場合のみテスト
    if let Ok(s) = std::str::from_utf8(data) {
        let codec = MediaTypeCodec::new(Arc::new(MediaTypeCache::new(CacheLimits {
            max_entries: 4,
        })));

        let direct = MediaType::parse(s);
        let cached = codec.parse(s);
        assert_eq!(direct.is_ok(), cached.is_ok());

        if let (Ok(direct), Ok(cached)) = (direct, cached) {
            assert_eq!(direct, cached);
            let _ = direct.charset();
            let _ = direct.is_compatible(&MediaType::wildcard());

            // Display 実装のテスト
            let displayed = codec.format(&direct);
            assert_eq!(displayed, direct.to_string());

            // ラウンドトリップ
            if let Ok(reparsed) = MediaType::parse(&displayed) {
                assert_eq!(direct.mime_type(), reparsed.mime_type());
            }
        }

        assert!(codec.cache().parsed_len() <= 4);
        assert!(codec.cache().formatted_len() <= 4);
    }
});
