//! # shiguredo_http_headers
//!
//! HTTP ヘッダー値のパース/生成ライブラリ
//!
//! ## 特徴
//!
//! - **双方向**: ヘッダー値の文字列と構造化された値を相互に変換
//! - **Sans I/O**: I/O を持たない同期的な変換のみ
//! - **共有キャッシュ**: メディアタイプの変換結果を上限付き LRU でキャッシュ
//!
//! ## 対応ヘッダー
//!
//! | ヘッダー | 型 |
//! |---|---|
//! | Cache-Control | [`cache::CacheControl`] |
//! | Cookie | [`cookie::Cookie`] |
//! | Set-Cookie | [`cookie::SetCookie`] |
//! | ETag | [`etag::EntityTag`] |
//! | Link | [`link::Link`] / [`link::LinkBuilder`] |
//! | Content-Type など | [`media_type::MediaType`] |
//! | Accept / Accept-Language | [`accept::accept_media_types`] / [`accept::accept_languages`] |
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http_headers::{CacheControl, EntityTag, HeaderKind, HeaderValue, MediaTypeCodec};
//!
//! let cc = CacheControl::parse("max-age=60, must-revalidate").unwrap();
//! assert_eq!(cc.to_header_value(), "must-revalidate, max-age=60");
//!
//! let etag = EntityTag::parse("W/\"v1\"");
//! assert!(etag.is_weak());
//!
//! let codec = MediaTypeCodec::default();
//! let mt = codec.parse("Application/JSON").unwrap();
//! assert_eq!(codec.format(&mt), "application/json");
//!
//! let kind = HeaderKind::from_header_name("Set-Cookie").unwrap();
//! let value = HeaderValue::decode(kind, "id=abc; Path=/; Version=1").unwrap();
//! assert_eq!(value.encode().unwrap(), "id=abc; Version=1; Path=\"/\"");
//! ```

pub mod accept;
pub mod cache;
pub mod cookie;
pub mod date;
mod error;
pub mod etag;
pub mod header;
pub mod limits;
pub mod link;
mod lru;
pub mod media_type;
pub mod token;
pub mod uri;
pub mod weighted;

pub use cache::CacheControl;
pub use cookie::{Cookie, SetCookie};
pub use error::HeaderError;
pub use etag::EntityTag;
pub use header::{HeaderKind, HeaderValue};
pub use limits::CacheLimits;
pub use link::{Link, LinkBuilder};
pub use lru::LruMap;
pub use media_type::{MediaType, MediaTypeCache, MediaTypeCodec};
pub use uri::{Uri, UriError};
pub use weighted::Weighted;
