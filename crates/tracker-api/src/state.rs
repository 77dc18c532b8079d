//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 `Arc`로 래핑되어 여러 요청 간에 공유됩니다.
//! 세션마다 `Mutex`를 두어 같은 세션의 동작은 순서대로, 다른 세션의 동작은 동시에 처리됩니다.
//! 유휴 시간이 지난 세션은 조회나 생성 시점에 정리되고, 세션 수가 상한에 닿으면
//! 가장 오래 쓰이지 않은 세션부터 내보냅니다.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;
use tracker_core::{AppConfig, SessionConfig, SessionContext};
use tracker_dashboard::DashboardHandler;
use uuid::Uuid;

/// 공유 세션 핸들.
pub type SharedSession = Arc<Mutex<SessionContext>>;

struct SessionEntry {
    session: SharedSession,
    last_seen: Instant,
}

impl SessionEntry {
    fn is_idle(&self, timeout: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.last_seen) >= timeout
    }
}

/// 애플리케이션 공유 상태.
pub struct AppState {
    /// 대시보드 요청 처리기 (게이트웨이 + AI 브리지)
    pub handler: Arc<DashboardHandler>,

    /// 세션 저장소
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,

    /// 새 세션의 기본값
    session_defaults: SessionConfig,

    /// 환경변수에서 읽은 기본 API 키
    default_api_key: Option<SecretString>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(
        handler: DashboardHandler,
        config: &AppConfig,
        default_api_key: Option<SecretString>,
    ) -> Self {
        Self {
            handler: Arc::new(handler),
            sessions: RwLock::new(HashMap::new()),
            session_defaults: config.session.clone(),
            default_api_key,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }

    /// 기본 API 키 설정 여부.
    pub fn has_default_api_key(&self) -> bool {
        self.default_api_key.is_some()
    }

    /// 새 세션을 만들고 ID를 반환합니다.
    ///
    /// 세션은 서버의 기본 API 키를 복사해 시작합니다.
    pub async fn create_session(&self) -> (Uuid, SharedSession) {
        let api_key = self
            .default_api_key
            .as_ref()
            .map(|key| SecretString::from(key.expose_secret().to_string()));
        let session = Arc::new(Mutex::new(SessionContext::new(
            &self.session_defaults,
            api_key,
        )));

        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.evict(&mut sessions, now);
        sessions.insert(
            id,
            SessionEntry {
                session: Arc::clone(&session),
                last_seen: now,
            },
        );
        crate::metrics::set_active_sessions(sessions.len());
        (id, session)
    }

    /// 세션 조회. 조회 시각을 갱신하며, 유휴 시간이 지난 세션은 삭제하고 `None`.
    pub async fn session(&self, id: &Uuid) -> Option<SharedSession> {
        let now = Instant::now();
        let timeout = self.session_defaults.idle_timeout();
        let mut sessions = self.sessions.write().await;

        let entry = sessions.get_mut(id)?;
        if entry.is_idle(timeout, now) {
            sessions.remove(id);
            crate::metrics::set_active_sessions(sessions.len());
            debug!(session_id = %id, "idle session expired");
            return None;
        }
        entry.last_seen = now;
        Some(Arc::clone(&entry.session))
    }

    /// 유휴 세션을 지우고, 새 세션이 들어갈 자리가 없으면 가장 오래된 세션부터 내보냅니다.
    fn evict(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: Instant) {
        let timeout = self.session_defaults.idle_timeout();
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_idle(timeout, now));
        let expired = before - sessions.len();

        let capacity = self.session_defaults.max_sessions.max(1);
        let mut evicted = 0;
        while sessions.len() >= capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    evicted += 1;
                }
                None => break,
            }
        }

        if expired > 0 || evicted > 0 {
            debug!(expired, evicted, remaining = sessions.len(), "sessions pruned");
        }
    }

    /// 세션 삭제. 존재했으면 `true`.
    pub async fn remove_session(&self, id: &Uuid) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(id).is_some();
        crate::metrics::set_active_sessions(sessions.len());
        removed
    }

    /// 활성 세션 수.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// 테스트용 AppState 생성.
///
/// 고정 데이터를 돌려주는 시세 소스와 에코 AI 백엔드를 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use tracker_ai::AssistantBridge;
    use tracker_data::MarketDataGateway;

    let config = AppConfig::default();
    let gateway = Arc::new(MarketDataGateway::new(
        Arc::new(testing::StaticSource),
        &config.market_data,
    ));
    let bridge = Arc::new(AssistantBridge::with_backend(
        Arc::new(testing::EchoBackend),
        &config.ai,
    ));

    AppState::new(DashboardHandler::new(gateway, bridge), &config, None)
}

#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    //! 테스트용 고정 소스와 백엔드.

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use secrecy::SecretString;
    use tracker_ai::{AiResult, ChatCompletion, ChatRequest};
    use tracker_core::{Bar, CompanyProfile, Period, Ticker};
    use tracker_data::{LatestCloses, MarketDataSource, Result};

    /// 데이터가 없는 티커.
    pub const EMPTY_TICKER: &str = "EMPTY";

    /// 고정 시세 소스. `EMPTY` 티커는 데이터 없음으로 응답합니다.
    pub struct StaticSource;

    #[async_trait]
    impl MarketDataSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn latest_closes(&self, ticker: &Ticker) -> Result<Option<LatestCloses>> {
            if ticker.as_str() == EMPTY_TICKER {
                return Ok(None);
            }
            Ok(Some(LatestCloses {
                current: Decimal::from(153),
                previous: Some(Decimal::from(150)),
                timestamp: Utc::now(),
            }))
        }

        async fn history(&self, ticker: &Ticker, _period: Period) -> Result<Vec<Bar>> {
            if ticker.as_str() == EMPTY_TICKER {
                return Ok(Vec::new());
            }
            let start = Utc
                .with_ymd_and_hms(2024, 1, 2, 0, 0, 0)
                .single()
                .unwrap_or_else(Utc::now);
            Ok([100, 102, 104]
                .iter()
                .enumerate()
                .map(|(i, close)| {
                    let close = Decimal::from(*close);
                    Bar {
                        date: start + Duration::days(i as i64),
                        open: close,
                        high: close,
                        low: close,
                        close,
                        volume: 1_500_000,
                    }
                })
                .collect())
        }

        async fn profile(&self, ticker: &Ticker) -> Result<Option<CompanyProfile>> {
            if ticker.as_str() == EMPTY_TICKER {
                return Ok(None);
            }
            let mut profile = CompanyProfile::new(ticker.clone())
                .with_company(Some(format!("{} Corp.", ticker)));
            profile.sector = Some("Technology".to_string());
            profile.market_cap = Some(2_500_000_000_000);
            Ok(Some(profile))
        }
    }

    /// 사용자 메시지 길이를 알려주는 에코 백엔드.
    pub struct EchoBackend;

    #[async_trait]
    impl ChatCompletion for EchoBackend {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, _api_key: &SecretString, request: &ChatRequest) -> AiResult<String> {
            let user = request
                .messages
                .last()
                .map(|m| m.content.len())
                .unwrap_or_default();
            Ok(format!("echo: {} chars", user))
        }
    }
}
