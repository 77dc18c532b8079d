//! 캐싱 레이어.
//!
//! - TTL 캐시: 조회 결과를 정해진 시간 동안 메모리에 보관

pub mod ttl;

pub use ttl::{CacheStats, TtlCache};
