//! 도메인 모델.

pub mod chat;
pub mod metrics;
pub mod profile;
pub mod quote;
pub mod series;
pub mod session;

pub use chat::*;
pub use metrics::*;
pub use profile::*;
pub use quote::*;
pub use series::*;
pub use session::*;
