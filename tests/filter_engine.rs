//! Filter engine integration tests
//!
//! Exercises the engine end to end: config on disk, rule loading, matching,
//! side effects through the host hooks, and reload behaviour.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chatfilter::filter::{
    Destination, FilterAction, FilterEngine, FilterError, MessageContext, MessageKind,
};
use chatfilter::host::{ChannelRef, HostCall, LogLevel, RecordingHooks, SessionId, UserRef};
use tempfile::{tempdir, TempDir};

/// Test fixture with a server config pointing at a separate rule file
struct Fixture {
    _dir: TempDir,
    config_path: PathBuf,
    rules_path: PathBuf,
    hooks: Arc<RecordingHooks>,
    engine: FilterEngine,
}

impl Fixture {
    fn new(rules: &str) -> Self {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("server.yaml");
        let rules_path = dir.path().join("filter.yaml");

        fs::write(&config_path, "filter:\n  file: filter.yaml\n").unwrap();
        fs::write(&rules_path, rules).unwrap();

        let hooks = Arc::new(RecordingHooks::new());
        let engine = FilterEngine::new(&config_path, hooks.clone());

        Self {
            _dir: dir,
            config_path,
            rules_path,
            hooks,
            engine,
        }
    }

    fn started(rules: &str) -> Self {
        let fixture = Self::new(rules);
        fixture.engine.initialize().unwrap();
        fixture.hooks.clear();
        fixture
    }

    fn write_rules(&self, rules: &str) {
        fs::write(&self.rules_path, rules).unwrap();
    }

    fn write_config(&self, config: &str) {
        fs::write(&self.config_path, config).unwrap();
    }
}

fn sender() -> UserRef {
    UserRef::new(42, "spammer")
}

fn channel(name: &str) -> Destination {
    Destination::Channel(ChannelRef::new(name))
}

const RULES: &str = r#"
keywords:
  - pattern: "*free money*"
    reason: "spam"
    action: block
  - pattern: "*idiot*"
    reason: "abuse"
    action: kill
  - pattern: "stop *"
    reason: "stop words"
  - pattern: "BADWORD*"
    reason: "language"
    action: none
  - pattern: "*money*"
    reason: "second rule"
    action: kill
"#;

#[test]
fn test_no_match_delivers_without_side_effects() {
    let fx = Fixture::started(RULES);

    for text in ["hello world", "stopping by", "", "my badword"] {
        assert!(!fx.engine.on_pre_message(&sender(), &channel("#a"), text));
        assert!(!fx.engine.on_pre_notice(&sender(), &channel("#a"), text));
    }

    assert!(fx.hooks.is_empty());
    assert!(fx.engine.events().is_empty());
}

#[test]
fn test_first_declared_rule_wins() {
    let fx = Fixture::started(RULES);

    // Matches both "*free money*" (block) and "*money*" (kill)
    assert!(fx
        .engine
        .on_pre_message(&sender(), &channel("#a"), "get FREE MONEY here"));

    assert!(fx.hooks.quits().is_empty());
    assert_eq!(fx.hooks.alerts().len(), 1);
    assert!(fx.hooks.logs()[0].1.ends_with("spam Action: block"));
}

#[test]
fn test_case_insensitive_match() {
    let fx = Fixture::started(RULES);

    assert!(fx
        .engine
        .on_pre_message(&sender(), &channel("#a"), "badword here"));
}

#[test]
fn test_trailing_wildcard_matches_bare_word() {
    let fx = Fixture::started(RULES);

    assert!(fx.engine.on_pre_message(&sender(), &channel("#a"), "stop"));
    assert!(fx.engine.on_pre_message(&sender(), &channel("#a"), "stop now"));
    assert_eq!(fx.hooks.logs().len(), 2);
}

#[test]
fn test_block_action() {
    let fx = Fixture::started(RULES);

    let intervened = fx
        .engine
        .on_pre_message(&sender(), &channel("#lobby"), "free money!!!");

    assert!(intervened);
    assert_eq!(
        fx.hooks.alerts(),
        vec!["FILTER: spammer had their message filtered, target was #lobby: spam".to_string()]
    );
    let notices = fx.hooks.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].0, SessionId(42));
    assert!(notices[0].1.contains("spam"));
    assert_eq!(fx.hooks.logs().len(), 1);
    assert!(fx.hooks.quits().is_empty());
}

#[test]
fn test_kill_action() {
    let fx = Fixture::started(RULES);
    let target = Destination::User(UserRef::new(7, "victim"));

    let intervened = fx
        .engine
        .on_pre_notice(&sender(), &target, "you idiot");

    assert!(intervened);
    assert_eq!(fx.hooks.quits(), vec![(SessionId(42), "abuse".to_string())]);
    assert_eq!(
        fx.hooks.logs(),
        vec![(
            LogLevel::Info,
            "FILTER: spammer had their notice filtered, target was victim: abuse Action: kill"
                .to_string()
        )]
    );
    assert!(fx.hooks.alerts().is_empty());
    assert!(fx.hooks.notices().is_empty());
}

#[test]
fn test_none_action_still_suppresses() {
    let fx = Fixture::started(RULES);

    let outcome = fx.engine.check(
        MessageKind::Message,
        &MessageContext::new(&sender(), &channel("#a"), "stop it"),
    );

    assert!(outcome.intervened);
    assert_eq!(outcome.action, Some(FilterAction::None));
    assert_eq!(fx.hooks.len(), 1);
    assert!(matches!(
        &fx.hooks.calls()[0],
        HostCall::Log { level: LogLevel::Info, message } if message.ends_with("Action: none")
    ));
}

#[test]
fn test_initialize_reports_source() {
    let fx = Fixture::new(RULES);

    let report = fx.engine.initialize().unwrap();
    assert_eq!(report.source, fx.rules_path);
    assert_eq!(report.rules, 5);
    assert!(fx.engine.is_active());

    let logs = fx.hooks.logs();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].1.starts_with("m_filter: read configuration from"));
}

#[test]
fn test_initialize_without_file_setting_stays_inert() {
    let fx = Fixture::new(RULES);
    fx.write_config("telemetry:\n  log_level: info\n");

    let result = fx.engine.initialize();
    assert!(matches!(result, Err(FilterError::ConfigMissing)));
    assert!(!fx.engine.is_active());

    assert_eq!(fx.hooks.alerts().len(), 1);
    assert!(fx.hooks.alerts()[0].contains("inactive"));
    assert_eq!(fx.hooks.logs()[0].0, LogLevel::Error);

    fx.hooks.clear();
    assert!(!fx
        .engine
        .on_pre_message(&sender(), &channel("#a"), "free money"));
    assert!(fx.hooks.is_empty());
}

#[test]
fn test_initialize_with_unreadable_rules_stays_inert() {
    let fx = Fixture::new(RULES);
    fs::remove_file(&fx.rules_path).unwrap();

    assert!(matches!(
        fx.engine.initialize(),
        Err(FilterError::ConfigUnreadable { .. })
    ));
    assert!(!fx.engine.is_active());
}

#[test]
fn test_reload_activates_new_rules() {
    let fx = Fixture::started(RULES);

    let before = fx.engine.rules();
    assert!(!fx.engine.on_pre_message(&sender(), &channel("#a"), "rust"));

    fx.write_rules("keywords:\n  - pattern: \"*rust*\"\n    reason: \"crab\"\n");
    let report = fx.engine.on_reload("").unwrap();
    assert_eq!(report.rules, 1);

    assert!(fx.engine.on_pre_message(&sender(), &channel("#a"), "rust"));
    assert!(!fx
        .engine
        .on_pre_message(&sender(), &channel("#a"), "free money"));

    // A snapshot taken before the reload still sees the old rules
    assert_eq!(before.len(), 5);
    assert!(before.first_match("free money").is_some());
}

#[test]
fn test_failed_reload_keeps_previous_rules() {
    let fx = Fixture::started(RULES);

    fx.write_rules("");
    let result = fx.engine.on_reload("");
    assert!(matches!(result, Err(FilterError::ConfigUnreadable { .. })));

    assert!(fx.engine.is_active());
    assert_eq!(fx.engine.rules().len(), 5);
    assert!(fx.hooks.alerts()[0].contains("keeping previous rules"));

    fx.hooks.clear();
    assert!(fx
        .engine
        .on_pre_message(&sender(), &channel("#a"), "free money"));
}

#[test]
fn test_reload_with_invalid_action_keeps_previous_rules() {
    let fx = Fixture::started(RULES);

    fx.write_rules("keywords:\n  - pattern: \"*x*\"\n    action: gline\n");
    match fx.engine.on_reload("") {
        Err(FilterError::InvalidRule { index, .. }) => assert_eq!(index, 0),
        other => panic!("expected InvalidRule, got {:?}", other),
    }

    assert_eq!(fx.engine.rules().len(), 5);
}

#[test]
fn test_reload_after_missing_file_setting_recovers() {
    let fx = Fixture::started(RULES);

    fx.write_config("filter:\n  file: \"\"\n");
    assert!(matches!(
        fx.engine.on_reload(""),
        Err(FilterError::ConfigMissing)
    ));
    assert_eq!(fx.engine.rules().len(), 5);

    fx.write_config("filter:\n  file: filter.yaml\n");
    fx.write_rules("keywords: []\n");
    let report = fx.engine.on_reload("").unwrap();
    assert_eq!(report.rules, 0);
    assert!(fx.engine.is_active());
    assert!(!fx
        .engine
        .on_pre_message(&sender(), &channel("#a"), "free money"));
}

#[test]
fn test_rules_in_main_config_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("server.yaml");
    fs::write(
        &config_path,
        r#"
filter:
  file: server.yaml
keywords:
  - pattern: "*spam*"
    reason: "spam"
    action: block
"#,
    )
    .unwrap();

    let hooks = Arc::new(RecordingHooks::new());
    let engine = FilterEngine::new(&config_path, hooks.clone());
    let report = engine.initialize().unwrap();

    assert_eq!(report.source, config_path);
    assert!(engine.on_pre_message(&sender(), &channel("#a"), "SPAM"));
}

#[test]
fn test_stats_track_rule_hits() {
    let fx = Fixture::started(RULES);

    fx.engine
        .on_pre_message(&sender(), &channel("#a"), "free money");
    fx.engine.on_pre_message(&sender(), &channel("#a"), "stop");
    fx.engine.on_pre_message(&sender(), &channel("#a"), "stop go");

    let stats = fx.engine.stats();
    assert!(stats.active);
    assert_eq!(stats.source.as_deref(), Some(fx.rules_path.as_path()));
    let hits: Vec<u64> = stats.rule_hits.iter().map(|r| r.hits).collect();
    assert_eq!(hits, vec![1, 0, 2, 0, 0]);

    let events = fx.engine.events().stats();
    assert_eq!(events.blocked, 1);
    assert_eq!(events.suppressed, 2);
}

#[test]
fn test_concurrent_checks_during_reload() {
    let fx = Arc::new(Fixture::started(RULES));
    let dest = channel("#a");

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let fx = fx.clone();
            let dest = dest.clone();
            scope.spawn(move || {
                for _ in 0..200 {
                    // Both old and new tables filter this text
                    assert!(fx.engine.on_pre_message(&sender(), &dest, "free money"));
                }
            });
        }

        for _ in 0..20 {
            fx.write_rules("keywords:\n  - pattern: \"*money*\"\n");
            let _ = fx.engine.on_reload("");
            fx.write_rules(RULES);
            let _ = fx.engine.on_reload("");
        }
    });
}
