//! 가격 차트 렌더러.
//!
//! 캔들스틱(기본 y축)과 거래량 막대(보조 y축 `y2`)를 같은 날짜 x축에 겹친
//! 차트 명세를 만듭니다. 직렬화 결과는 plotly의 `{data, layout}` 형식과
//! 호환됩니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracker_core::{DecimalExt, HistoricalSeries, Percentage, Period, Price};

/// 차트 높이 (px).
pub const CHART_HEIGHT: u32 = 500;

/// 거래량 막대 색상.
pub const VOLUME_COLOR: &str = "rgba(100, 100, 250, 0.3)";

/// 차트 렌더링 에러.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChartError {
    #[error("no bars to render for {0}")]
    EmptySeries(String),
}

/// 차트 명세.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

/// 차트 레이어.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Candlestick(CandlestickTrace),
    Bar(BarTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickTrace {
    pub name: String,
    pub x: Vec<DateTime<Utc>>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub yaxis: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<DateTime<Utc>>,
    pub y: Vec<u64>,
    pub yaxis: &'static str,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub yaxis2: Axis,
    pub height: u32,
    pub hovermode: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

/// 축 설정. 비어 있는 필드는 직렬화하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub axis_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}

fn title(text: impl Into<String>) -> Option<Title> {
    Some(Title { text: text.into() })
}

/// 시계열을 차트 명세로 변환합니다.
///
/// 빈 시계열은 [`ChartError::EmptySeries`].
pub fn render_price_chart(series: &HistoricalSeries) -> Result<ChartSpec, ChartError> {
    if series.is_empty() {
        return Err(ChartError::EmptySeries(series.ticker.to_string()));
    }

    let bars = series.bars();
    let x: Vec<DateTime<Utc>> = bars.iter().map(|b| b.date).collect();
    let column = |f: fn(&tracker_core::Bar) -> Decimal| -> Vec<f64> {
        bars.iter().map(|b| f(b).to_f64_lossy()).collect()
    };

    let candles = CandlestickTrace {
        name: series.ticker.to_string(),
        x: x.clone(),
        open: column(|b| b.open),
        high: column(|b| b.high),
        low: column(|b| b.low),
        close: column(|b| b.close),
        yaxis: "y",
    };

    let volume = BarTrace {
        name: "Volume".to_string(),
        x,
        y: bars.iter().map(|b| b.volume).collect(),
        yaxis: "y2",
        marker: Marker {
            color: VOLUME_COLOR,
        },
    };

    let layout = Layout {
        title: Title {
            text: chart_title(series),
        },
        xaxis: Axis {
            axis_type: Some("date"),
            rangeslider: Some(RangeSlider { visible: false }),
            ..Default::default()
        },
        yaxis: Axis {
            title: title("Price ($)"),
            ..Default::default()
        },
        yaxis2: Axis {
            title: title("Volume"),
            overlaying: Some("y"),
            side: Some("right"),
            ..Default::default()
        },
        height: CHART_HEIGHT,
        hovermode: "x unified",
    };

    Ok(ChartSpec {
        data: vec![Trace::Candlestick(candles), Trace::Bar(volume)],
        layout,
    })
}

fn chart_title(series: &HistoricalSeries) -> String {
    format!("{} Stock Price History ({})", series.ticker, series.period)
}

/// 차트 아래 표시하는 기간 통계.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartStats {
    pub period: Period,
    pub start: Price,
    pub end: Price,
    pub change: Decimal,
    pub change_pct: Percentage,
}

impl ChartStats {
    /// 시계열에서 통계를 계산합니다. 비었거나 시작가가 0이면 `None`.
    pub fn from_series(series: &HistoricalSeries) -> Option<Self> {
        let change = series.period_change()?;
        Some(Self {
            period: series.period,
            start: change.start.round_display(),
            end: change.end.round_display(),
            change: change.change.round_display(),
            change_pct: change.change_pct.round_display(),
        })
    }

    /// `"+1.23%"` 형식의 변동률.
    pub fn change_pct_display(&self) -> String {
        if self.change_pct.is_sign_negative() {
            format!("{}%", self.change_pct.fmt2())
        } else {
            format!("+{}%", self.change_pct.fmt2())
        }
    }
}
