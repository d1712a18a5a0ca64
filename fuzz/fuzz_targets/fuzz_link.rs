#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http_headers::link::Link;

fuzz_target!(|data: &[u8]| {
    // UTF-8 文字列として解釈できる場合のみテスト
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(link) = Link::parse(s) {
            let _ = link.rels();
            let _ = link.title();
            let _ = link.link_type();

            // Display 実装のテスト
            let displayed = link.to_string();

            // ラウンドトリップ
            if let Ok(reparsed) = Link::parse(&displayed) {
                assert_eq!(link.uri(), reparsed.uri());
                assert_eq!(link.rel(), reparsed.rel());
            }

            // ビルダー経由の再構築
            if let Ok(rebuilt) = Link::builder().link(&link).build(&[]) {
                assert_eq!(link.params().count(), rebuilt.params().count());
            }
        }
    }
});
