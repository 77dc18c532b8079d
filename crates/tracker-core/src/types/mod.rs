//! 핵심 타입 정의.

pub mod decimal;
pub mod period;
pub mod ticker;

pub use decimal::*;
pub use period::*;
pub use ticker::*;
