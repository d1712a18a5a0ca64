#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use shiguredo_http_headers::accept::{accept_languages, accept_media_types_with};
use shiguredo_http_headers::limits::CacheLimits;
use shiguredo_http_headers::media_type::{MediaTypeCache, MediaTypeCodec};

fuzz_target!(|data: &[u8]| {
    // UTF-8 文字列として解釈できる場合のみテスト
    if let Ok(s) = std::str::from_utf8(data) {
        let codec = MediaTypeCodec::new(Arc::new(MediaTypeCache::new(CacheLimits::default())));
        let items = s.split(',').count();

        if let Ok(types) = accept_media_types_with(&codec, s) {
            assert!(!types.is_empty() || s.contains(','));
            assert!(types.len() <= items.max(1));
            for mt in &types {
                let _ = mt.to_string();
            }
        }

        if let Ok(languages) = accept_languages(s) {
            assert!(languages.len() <= items);
            for tag in &languages {
                let _ = tag.primary_language();
                let _ = tag.region();
            }
        }
    }
});
