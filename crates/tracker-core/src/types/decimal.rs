//! 가격 계산용 Decimal 유틸리티.
//!
//! 가격과 비율은 부동소수점 오차를 피하기 위해 `rust_decimal`을 사용합니다.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// 가격 타입 별칭.
pub type Price = Decimal;

/// 백분율 타입 별칭 (예: 2.5 = 2.5%).
pub type Percentage = Decimal;

/// 표시용 소수 자릿수.
pub const DISPLAY_DP: u32 = 2;

/// Decimal 확장 트레이트.
pub trait DecimalExt {
    /// 표시용 소수 둘째 자리로 반올림합니다.
    fn round_display(&self) -> Decimal;

    /// 반올림한 뒤 소수 둘째 자리까지 문자열로 만듭니다.
    ///
    /// `Decimal`의 `{:.2}`는 반올림하지 않고 잘라내므로 표시용 포맷은 이 메서드를 씁니다.
    fn fmt2(&self) -> String;

    /// 차트 직렬화를 위해 f64로 변환합니다. 범위를 벗어나면 0.
    fn to_f64_lossy(&self) -> f64;

    /// `self`가 `base` 대비 몇 퍼센트 변했는지 계산합니다.
    ///
    /// `base`가 0이면 0을 반환합니다.
    fn pct_change_from(&self, base: Decimal) -> Percentage;
}

impl DecimalExt for Decimal {
    fn round_display(&self) -> Decimal {
        self.round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero)
    }

    fn fmt2(&self) -> String {
        format!("{:.2}", self.round_display())
    }

    fn to_f64_lossy(&self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }

    fn pct_change_from(&self, base: Decimal) -> Percentage {
        if base.is_zero() {
            return Decimal::ZERO;
        }
        (*self - base) / base * Decimal::ONE_HUNDRED
    }
}

/// 원시 f64 값을 Decimal로 변환합니다. NaN/무한대는 `None`.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if value.is_finite() {
        Decimal::from_f64_retain(value)
    } else {
        None
    }
}
