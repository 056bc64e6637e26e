//! Guardrail behaviour: caching, throttling, cooldown breaker, daily cap,
//! date rollover and persistence.

use chrono::{TimeZone, Utc};
use spellkit_core::{
    Fingerprint, GenerationError, GenerationRequest, GuardrailConfig, GuardrailError, LlmError,
    SpellError, SpellResult, Timestamp,
};
use spellkit_guard::{
    Availability, Clock, FileStore, Guardrail, KeyValueStore, ManualClock, MemoryStore,
    SystemClock, CACHE_KEY, USAGE_KEY,
};
use spellkit_llm::GenerationProvider;
use spellkit_test_utils::assertions::assert_guardrail_error;
use spellkit_test_utils::ScriptedProvider;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

fn fp(name: &str) -> Fingerprint {
    Fingerprint::from_raw(name)
}

fn manual_guard(config: GuardrailConfig) -> (Guardrail, ManualClock, Arc<MemoryStore>) {
    let clock = ManualClock::new(t0());
    let store = Arc::new(MemoryStore::new());
    let guard = Guardrail::new(config, store.clone(), Arc::new(clock.clone())).unwrap();
    (guard, clock, store)
}

#[tokio::test]
async fn test_same_fingerprint_calls_once() {
    let (guard, _clock, _store) = manual_guard(GuardrailConfig::default());
    let calls = AtomicUsize::new(0);

    for _ in 0..3 {
        let words: Vec<String> = guard
            .execute(&fp("wordlist|c=2"), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec!["koning".to_string(), "bank".to_string()])
            })
            .await
            .unwrap();
        assert_eq!(words, vec!["koning", "bank"]);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(guard.status().await.count_today, 1);
}

#[tokio::test]
async fn test_cache_expires_after_ttl() {
    let config = GuardrailConfig::default().with_cache_ttl(Duration::from_secs(60));
    let (guard, clock, _store) = manual_guard(config);
    let calls = AtomicUsize::new(0);

    let call = || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, SpellError>(1u32)
    };
    guard.execute(&fp("a"), call).await.unwrap();
    clock.advance(Duration::from_secs(61));
    guard.execute(&fp("a"), call).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_min_interval_between_invocations() {
    let config = GuardrailConfig::default().with_min_interval(Duration::from_secs(3));
    let (guard, clock, _store) = manual_guard(config);
    let started: Mutex<Vec<Timestamp>> = Mutex::new(Vec::new());

    for i in 0..3 {
        guard
            .execute(&fp(&format!("distinct-{}", i)), || async {
                started.lock().unwrap().push(clock.now());
                Ok::<_, SpellError>(i)
            })
            .await
            .unwrap();
    }

    let started = started.into_inner().unwrap();
    for pair in started.windows(2) {
        assert!(pair[1] - pair[0] >= chrono::Duration::seconds(3));
    }
    assert_eq!(clock.slept().len(), 2);
}

#[tokio::test]
async fn test_min_interval_real_time() {
    let interval = Duration::from_millis(40);
    let config = GuardrailConfig::default().with_min_interval(interval);
    let guard = Guardrail::new(config, Arc::new(MemoryStore::new()), Arc::new(SystemClock)).unwrap();
    let started: Mutex<Vec<Instant>> = Mutex::new(Vec::new());

    for i in 0..3 {
        guard
            .execute(&fp(&format!("rt-{}", i)), || async {
                started.lock().unwrap().push(Instant::now());
                Ok::<_, SpellError>(i)
            })
            .await
            .unwrap();
    }

    let started = started.into_inner().unwrap();
    for pair in started.windows(2) {
        // Timestamps are stored with millisecond precision.
        assert!(pair[1] - pair[0] + Duration::from_millis(1) >= interval);
    }
}

#[tokio::test]
async fn test_quota_error_opens_breaker() {
    let config = GuardrailConfig::default().with_cooldown(Duration::from_secs(60));
    let (guard, clock, _store) = manual_guard(config);

    let provider = ScriptedProvider::new();
    provider.push_error(LlmError::RequestFailed {
        provider: "scripted".to_string(),
        status: 429,
        message: "RESOURCE_EXHAUSTED".to_string(),
    });
    provider.push_text("after cooldown");

    let ask = || async {
        provider
            .generate(&GenerationRequest::text("hint"))
            .await
            .map(|r| r.text)
            .map_err(SpellError::from)
    };

    let first = guard.execute(&fp("hint-1"), ask).await;
    assert!(matches!(
        first,
        Err(SpellError::Guardrail(GuardrailError::QuotaLimit { cooldown_secs: 60 }))
    ));

    clock.advance(Duration::from_secs(10));
    let second = guard.execute(&fp("hint-2"), ask).await;
    assert!(matches!(
        second,
        Err(SpellError::Guardrail(GuardrailError::CooldownActive { remaining_secs: 50 }))
    ));
    assert!(second.unwrap_err().is_retryable());
    assert_eq!(provider.call_count(), 1);

    assert!(matches!(
        guard.status().await.availability,
        Availability::CoolingDown { .. }
    ));

    clock.advance(Duration::from_secs(51));
    let third = guard.execute(&fp("hint-3"), ask).await.unwrap();
    assert_eq!(third, "after cooldown");
    assert_eq!(provider.call_count(), 2);
    assert_eq!(guard.status().await.availability, Availability::Available);
}

#[tokio::test]
async fn test_other_errors_propagate_unchanged() {
    let (guard, _clock, _store) = manual_guard(GuardrailConfig::default());

    let result: SpellResult<u32> = guard
        .execute(&fp("x"), || async {
            Err(GenerationError::GenerationUnavailable {
                reason: "empty".to_string(),
            }
            .into())
        })
        .await;
    assert_eq!(
        result,
        Err(SpellError::Generation(GenerationError::GenerationUnavailable {
            reason: "empty".to_string()
        }))
    );

    let server_error = LlmError::RequestFailed {
        provider: "gemini".to_string(),
        status: 500,
        message: "internal".to_string(),
    };
    let result: SpellResult<u32> = guard
        .execute(&fp("y"), || async { Err(server_error.clone().into()) })
        .await;
    assert_eq!(result, Err(SpellError::Llm(server_error)));

    let status = guard.status().await;
    assert_eq!(status.count_today, 0);
    assert_eq!(status.availability, Availability::Available);
}

#[tokio::test]
async fn test_daily_cap_blocks_until_rollover() {
    let config = GuardrailConfig::default()
        .with_max_daily_requests(2)
        .with_min_interval(Duration::ZERO);
    let (guard, clock, _store) = manual_guard(config);
    let calls = AtomicUsize::new(0);
    let call = || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, SpellError>(())
    };

    guard.execute(&fp("a"), call).await.unwrap();
    guard.execute(&fp("b"), call).await.unwrap();
    let blocked = guard.execute(&fp("c"), call).await;
    assert_guardrail_error(&blocked);
    assert!(matches!(
        blocked,
        Err(SpellError::Guardrail(GuardrailError::DailyQuotaExceeded { limit: 2 }))
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(guard.status().await.availability, Availability::Blocked);

    clock.set(Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 5).unwrap());
    guard.execute(&fp("c"), call).await.unwrap();
    let status = guard.status().await;
    assert_eq!(status.count_today, 1);
    assert_eq!(status.availability, Availability::Available);
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(t0());
    let calls = AtomicUsize::new(0);
    let call = || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, SpellError>(vec![1, 2, 3])
    };

    {
        let guard = Guardrail::new(
            GuardrailConfig::default(),
            Arc::new(FileStore::new(dir.path())),
            Arc::new(clock.clone()),
        )
        .unwrap();
        guard.execute(&fp("persisted"), call).await.unwrap();
    }

    clock.advance(Duration::from_secs(3600));
    let guard = Guardrail::new(
        GuardrailConfig::default(),
        Arc::new(FileStore::new(dir.path())),
        Arc::new(clock.clone()),
    )
    .unwrap();
    assert_eq!(guard.status().await.count_today, 1);

    let cached = guard.execute(&fp("persisted"), call).await.unwrap();
    assert_eq!(cached, vec![1, 2, 3]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_restart_next_day_resets_counts() {
    let store = Arc::new(MemoryStore::new());
    let clock = ManualClock::new(t0());
    {
        let guard =
            Guardrail::new(GuardrailConfig::default(), store.clone(), Arc::new(clock.clone()))
                .unwrap();
        guard
            .execute(&fp("a"), || async { Ok::<_, SpellError>(0) })
            .await
            .unwrap();
    }

    clock.set(Utc.with_ymd_and_hms(2025, 3, 2, 8, 0, 0).unwrap());
    let guard =
        Guardrail::new(GuardrailConfig::default(), store.clone(), Arc::new(clock.clone())).unwrap();
    assert_eq!(guard.status().await.count_today, 0);
}

#[tokio::test]
async fn test_reset_clears_both_keys() {
    let (guard, _clock, store) = manual_guard(GuardrailConfig::default());
    guard
        .execute(&fp("a"), || async { Ok::<_, SpellError>("x".to_string()) })
        .await
        .unwrap();
    assert!(store.get(USAGE_KEY).unwrap().is_some());
    assert!(store.get(CACHE_KEY).unwrap().is_some());

    guard.reset().await.unwrap();
    assert!(store.get(USAGE_KEY).unwrap().is_none());
    assert!(store.get(CACHE_KEY).unwrap().is_none());
    assert_eq!(guard.status().await.count_today, 0);

    let calls = AtomicUsize::new(0);
    guard
        .execute(&fp("a"), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, SpellError>("y".to_string())
        })
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cache_capacity_evicts_oldest() {
    let config = GuardrailConfig::default()
        .with_cache_capacity(2)
        .with_min_interval(Duration::ZERO);
    let (guard, clock, _store) = manual_guard(config);
    let calls = AtomicUsize::new(0);
    let call = || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, SpellError>(())
    };

    for key in ["a", "b", "c"] {
        guard.execute(&fp(key), call).await.unwrap();
        clock.advance(Duration::from_secs(1));
    }
    guard.execute(&fp("c"), call).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    guard.execute(&fp("a"), call).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}
