//! # Tracker Dashboard
//!
//! 사용자 동작을 받아 화면 모델을 만드는 요청 처리 계층입니다.
//!
//! - `chart`: 시계열을 plotly 호환 차트 명세로 변환
//! - `render`: 표시 계층이 그대로 그리는 렌더 모델
//! - `handler`: 세션 갱신, 게이트웨이/브리지 호출, 렌더 모델 조립

pub mod chart;
pub mod handler;
pub mod render;

pub use chart::{render_price_chart, ChartError, ChartSpec, ChartStats};
pub use handler::{DashboardHandler, UserAction};
pub use render::*;
