//! CLI 명령어 구현 모듈.
//!
//! 모든 명령은 출력 대상(`Write`)을 받아 테스트에서 그대로 검증할 수 있습니다.

pub mod analyze;
pub mod chat;
pub mod dashboard;
pub mod market;
pub mod periods;
