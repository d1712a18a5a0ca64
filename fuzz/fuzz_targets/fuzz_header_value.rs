#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiguredo_http_headers::header::{HeaderKind, HeaderValue};

#[derive(Arbitrary, Debug)]
struct FuzzHeader {
    kind: u8,
    raw: String,
}

const KINDS: [HeaderKind; 6] = [
    HeaderKind::CacheControl,
    HeaderKind::Cookie,
    HeaderKind::SetCookie,
    HeaderKind::ETag,
    HeaderKind::Link,
    HeaderKind::MediaType,
];

fuzz_target!(|input: FuzzHeader| {
    let kind = KINDS[input.kind as usize % KINDS.len()];

    // ヘッダー名から同じ種類に戻る
    assert_eq!(HeaderKind::from_header_name(kind.header_name()), Some(kind));
    let _ = HeaderKind::from_header_name(&input.raw);

    if let Ok(value) = HeaderValue::decode(kind, &input.raw) {
        assert_eq!(value.kind(), kind);
        if let Ok(encoded) = value.encode() {
            if let Ok(reparsed) = HeaderValue::decode(kind, &encoded) {
                assert_eq!(reparsed.kind(), kind);
            }
        }
    }
});
