//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 模拟 e2e 测试（mock settings client + mock backend factory）
//! - 缓存 → 回放 → 实时分发的顺序与 exactly-once 验证

#[cfg(test)]
mod contract_tests {
    use contracts::{BackendId, EventRecord, ProjectSettings};

    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_settings_document_snapshot() {
        let doc = r#"{
            "integrations": {
                "Amplitude": { "apiKey": "amp" },
                "Google Analytics": { "mobileTrackingId": "UA-1" },
                "Mixpanel": false,
                "Segment.io": { "apiKey": "ignored" }
            },
            "plan": { "track": {} }
        }"#;
        let settings =
            settings_fetcher::parse_settings(doc, config_loader::ConfigFormat::Json).unwrap();
        assert_eq!(
            settings.enabled(),
            vec![BackendId::Amplitude, BackendId::GoogleAnalytics]
        );
        assert!(settings.settings_for(BackendId::Mixpanel).is_none());

        let roundtrip: ProjectSettings =
            serde_json::from_str(&settings_fetcher::parser::to_json(&settings).unwrap()).unwrap();
        assert_eq!(roundtrip.enabled(), settings.enabled());
    }

    #[test]
    fn test_event_wire_shape() {
        let event: EventRecord = serde_json::from_str(
            r#"{"type":"screen","userId":"u1","name":"Home","category":"Main"}"#,
        )
        .unwrap();
        assert_eq!(event.kind(), "screen");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{BackendId, EventRecord, LifecycleContext, LifecycleKind, ProjectSettings};
    use dispatcher::{Dispatcher, DispatcherBuilder, Phase};
    use integration_registry::{
        CapabilityProber, MockBackendFactory, MockConfig, Recorder,
    };
    use serde_json::json;
    use settings_fetcher::{
        BackoffPolicy, RetryPolicy, ScriptedSettingsClient, SettingsClient, SettingsGate,
    };

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            backoff: BackoffPolicy {
                first: Duration::from_millis(1),
                max: Duration::from_millis(10),
                factor: 2.0,
            },
            max_attempts: None,
        }
    }

    fn start(
        client: Arc<dyn SettingsClient>,
        factory: MockBackendFactory,
        linked: &'static [BackendId],
    ) -> Dispatcher {
        DispatcherBuilder::new(client, Arc::new(factory))
            .retry_policy(fast_retry())
            .prober(CapabilityProber::new(move |id: BackendId| linked.contains(&id)))
            .start()
    }

    fn track(n: usize) -> EventRecord {
        EventRecord::track("user-1", format!("event-{n}"))
    }

    /// A 可用且已配置，B 可用未配置，C 已配置未链接：只有 A 激活，
    /// 缓存事件与 3 个实时事件各到达 A 一次且有序
    #[tokio::test]
    async fn test_e2e_available_and_configured_only() {
        let settings = ProjectSettings::default()
            .with_backend(BackendId::Amplitude, json!({ "apiKey": "a" }))
            .with_backend(BackendId::Flurry, json!({ "apiKey": "c" }));
        let gate = SettingsGate::new();
        let client = ScriptedSettingsClient::new(vec![Ok(settings)]).gated(Arc::clone(&gate));
        let recorder = Recorder::new();

        let dispatcher = start(
            Arc::new(client),
            MockBackendFactory::new(recorder.clone()),
            &[BackendId::Amplitude, BackendId::Bugsnag],
        );
        let handle = dispatcher.handle();

        for n in 0..2 {
            handle.submit(track(n)).unwrap();
        }
        handle.flush().await.unwrap();
        assert_eq!(handle.phase(), Phase::Buffering);

        gate.open();
        handle.wait_until_live().await.unwrap();
        for n in 2..5 {
            handle.submit(track(n)).unwrap();
        }
        handle.flush().await.unwrap();

        let expected: Vec<EventRecord> = (0..5).map(track).collect();
        assert_eq!(recorder.events_for(BackendId::Amplitude), expected);
        assert!(recorder.events_for(BackendId::Bugsnag).is_empty());
        assert!(recorder.events_for(BackendId::Flurry).is_empty());
        assert_eq!(handle.registry().unwrap().ids(), vec![BackendId::Amplitude]);

        let stats = dispatcher.shutdown().await;
        assert_eq!(stats.replayed, 2);
        assert_eq!(stats.live, 3);
        assert_eq!(stats.discarded, 0);
    }

    /// settings 拉取失败两次后成功：激活完成，无丢失、无重复回放
    #[tokio::test]
    async fn test_e2e_fetch_fails_twice_then_succeeds() {
        let settings =
            ProjectSettings::default().with_backend(BackendId::Mixpanel, json!({ "token": "m" }));
        let client = Arc::new(ScriptedSettingsClient::failing_then(2, settings));
        let recorder = Recorder::new();

        let dispatcher = start(
            client.clone(),
            MockBackendFactory::new(recorder.clone()),
            &[BackendId::Mixpanel],
        );
        let handle = dispatcher.handle();

        for n in 0..4 {
            handle.submit(track(n)).unwrap();
        }
        handle.wait_until_live().await.unwrap();
        for n in 4..6 {
            handle.submit(track(n)).unwrap();
        }
        handle.flush().await.unwrap();

        assert_eq!(client.attempts(), 3);
        let expected: Vec<EventRecord> = (0..6).map(track).collect();
        assert_eq!(recorder.events_for(BackendId::Mixpanel), expected);

        let stats = dispatcher.shutdown().await;
        assert_eq!(stats.submitted, 6);
        assert_eq!(stats.replayed + stats.live, 6);
    }

    /// 单个 backend 构造失败不影响其他 backend 的激活与投递
    #[tokio::test]
    async fn test_e2e_config_error_is_isolated() {
        let settings = ProjectSettings::default()
            .with_backend(BackendId::Amplitude, json!({ "apiKey": "a" }))
            .with_backend(BackendId::Countly, json!({ "appKey": "c" }));
        let recorder = Recorder::new();
        let factory = MockBackendFactory::with_config(
            recorder.clone(),
            MockConfig {
                fail_construct: vec![BackendId::Amplitude],
                ..Default::default()
            },
        );
        let gate = SettingsGate::new();
        let client = ScriptedSettingsClient::new(vec![Ok(settings)]).gated(Arc::clone(&gate));

        let dispatcher = start(
            Arc::new(client),
            factory,
            &[BackendId::Amplitude, BackendId::Countly],
        );
        let handle = dispatcher.handle();

        handle.submit(track(0)).unwrap();
        gate.open();
        handle.wait_until_live().await.unwrap();
        handle.submit(track(1)).unwrap();
        handle.flush().await.unwrap();

        assert_eq!(handle.registry().unwrap().ids(), vec![BackendId::Countly]);
        assert_eq!(recorder.events_for(BackendId::Countly), vec![track(0), track(1)]);
        assert!(recorder.events_for(BackendId::Amplitude).is_empty());

        dispatcher.shutdown().await;
    }

    /// 某个 backend 处理事件失败（错误或 panic）时其他 backend 仍收到该事件
    #[tokio::test]
    async fn test_e2e_dispatch_failure_is_isolated() {
        let settings = ProjectSettings::default()
            .with_backend(BackendId::Amplitude, json!({ "apiKey": "a" }))
            .with_backend(BackendId::Localytics, json!({ "appKey": "l" }))
            .with_backend(BackendId::Tapstream, json!({ "accountName": "t" }));
        let recorder = Recorder::new();
        let factory = MockBackendFactory::with_config(
            recorder.clone(),
            MockConfig {
                fail_dispatch: vec![BackendId::Amplitude],
                panic_dispatch: vec![BackendId::Localytics],
                ..Default::default()
            },
        );

        let dispatcher = start(
            Arc::new(ScriptedSettingsClient::new(vec![Ok(settings)])),
            factory,
            &BackendId::ALL,
        );
        let handle = dispatcher.handle();

        handle.submit(track(0)).unwrap();
        handle.wait_until_live().await.unwrap();
        handle.submit(track(1)).unwrap();
        handle.flush().await.unwrap();

        assert_eq!(recorder.events_for(BackendId::Tapstream), vec![track(0), track(1)]);

        let registry = handle.registry().unwrap();
        let amplitude = registry.get(BackendId::Amplitude).unwrap();
        assert_eq!(amplitude.metrics().failure_count(), 2);
        let localytics = registry.get(BackendId::Localytics).unwrap();
        assert_eq!(localytics.metrics().failure_count(), 2);

        let stats = dispatcher.shutdown().await;
        assert_eq!(stats.delivery_failures, 4);
    }

    /// 激活过程中持续提交：每个事件恰好到达一次，且保持提交顺序
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_e2e_exactly_once_across_transition() {
        let settings = ProjectSettings::default()
            .with_backend(BackendId::Quantcast, json!({ "apiKey": "q" }));
        let gate = SettingsGate::new();
        let client = ScriptedSettingsClient::new(vec![Ok(settings)]).gated(Arc::clone(&gate));
        let recorder = Recorder::new();

        let dispatcher = start(
            Arc::new(client),
            MockBackendFactory::new(recorder.clone()),
            &[BackendId::Quantcast],
        );
        let handle = dispatcher.handle();

        let producer = {
            let handle = handle.clone();
            tokio::spawn(async move {
                for n in 0..500 {
                    handle.submit(track(n)).unwrap();
                    if n % 50 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
            })
        };

        tokio::time::sleep(Duration::from_millis(5)).await;
        gate.open();
        producer.await.unwrap();
        handle.wait_until_live().await.unwrap();
        handle.flush().await.unwrap();

        let expected: Vec<EventRecord> = (0..500).map(track).collect();
        assert_eq!(recorder.events_for(BackendId::Quantcast), expected);

        let stats = dispatcher.shutdown().await;
        assert_eq!(stats.replayed + stats.live, 500);
        assert_eq!(stats.discarded, 0);
    }

    /// 生命周期通知不缓存：激活前丢弃，激活后直接转发
    #[tokio::test]
    async fn test_e2e_lifecycle_not_buffered() {
        let settings = ProjectSettings::default()
            .with_backend(BackendId::Crittercism, json!({ "appId": "c" }));
        let gate = SettingsGate::new();
        let client = ScriptedSettingsClient::new(vec![Ok(settings)]).gated(Arc::clone(&gate));
        let recorder = Recorder::new();

        let dispatcher = start(
            Arc::new(client),
            MockBackendFactory::new(recorder.clone()),
            &[BackendId::Crittercism],
        );
        let handle = dispatcher.handle();
        let ctx = LifecycleContext::new("LoginActivity");

        handle.notify_lifecycle(LifecycleKind::Created, &ctx);
        handle.notify_lifecycle(LifecycleKind::Started, &ctx);

        gate.open();
        handle.wait_until_live().await.unwrap();
        handle.notify_lifecycle(LifecycleKind::Resumed, &ctx);

        assert_eq!(
            recorder.lifecycle_for(BackendId::Crittercism),
            vec![LifecycleKind::Resumed]
        );

        let stats = dispatcher.shutdown().await;
        assert_eq!(stats.lifecycle_dropped, 2);
        assert_eq!(stats.lifecycle_forwarded, 1);
    }

    #[test]
    fn test_probe_is_idempotent() {
        let prober = CapabilityProber::new(|id: BackendId| id != BackendId::Bugsnag);
        let first = prober.probe();
        assert_eq!(first, prober.probe());
        assert_eq!(first.missing(), vec![BackendId::Bugsnag]);
    }
}

#[cfg(test)]
mod config_tests {
    use std::io::Write;
    use std::sync::Arc;

    use contracts::{BackendId, EventRecord};
    use dispatcher::DispatcherBuilder;
    use integration_registry::{CapabilityProber, MockBackendFactory, Recorder};
    use settings_fetcher::{CachedSettingsClient, FileSettingsClient, SettingsClient};

    /// 配置文件 → 文件 settings client（带缓存）→ dispatcher
    #[tokio::test]
    async fn test_config_file_to_live_dispatcher() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        let cache_path = dir.path().join("cache").join("settings.json");
        std::fs::write(
            &settings_path,
            r#"{ "integrations": { "Amplitude": { "apiKey": "a" } } }"#,
        )
        .unwrap();

        let mut config_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            config_file,
            r#"
[settings]
source = {source:?}
cache_path = {cache:?}

[retry]
first_delay_ms = 1
max_delay_ms = 10
max_attempts = 3
"#,
            source = settings_path.display().to_string(),
            cache = cache_path.display().to_string(),
        )
        .unwrap();

        let config = config_loader::ConfigLoader::load_from_path(config_file.path()).unwrap();
        let file: Arc<dyn SettingsClient> =
            Arc::new(FileSettingsClient::new(&config.settings.source));
        let client = Arc::new(CachedSettingsClient::new(file, cache_path.clone()));
        let recorder = Recorder::new();

        let dispatcher = DispatcherBuilder::from_config(
            &config,
            client,
            Arc::new(MockBackendFactory::new(recorder.clone())),
        )
        .prober(CapabilityProber::new(|_: BackendId| true))
        .start();
        let handle = dispatcher.handle();

        handle.submit(EventRecord::track("u1", "Opened")).unwrap();
        handle.wait_until_live().await.unwrap();
        handle.flush().await.unwrap();

        assert_eq!(
            recorder.events_for(BackendId::Amplitude),
            vec![EventRecord::track("u1", "Opened")]
        );
        assert!(cache_path.exists());

        dispatcher.shutdown().await;
    }
}
