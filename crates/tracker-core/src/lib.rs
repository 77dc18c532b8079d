//! # Tracker Core
//!
//! 주식 대시보드의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 워크스페이스 전반에서 사용되는 기본 타입을 제공합니다:
//! - 티커 및 조회 기간 정의
//! - 시세, 과거 시계열, 기업 프로필 구조체
//! - AI 프롬프트용 지표 맵과 채팅 기록
//! - 사용자 세션 컨텍스트
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
