//! 주식 대시보드 터미널 도구.
//!
//! - `context`: 설정에서 처리기와 세션을 구성
//! - `commands`: 서브커맨드 구현
//! - `display`: 텍스트 출력 포맷

pub mod commands;
pub mod context;
pub mod display;

pub use context::{CliContext, SessionOptions};
