use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use autostream_cli::commands::chat::{self, ChatArgs};
use autostream_cli::commands::{config, doctor};
use serde_json::Value;
use tempfile::TempDir;

const KNOWLEDGE: &str = r#"{
    "pricing": {
        "basic": {"price": "$9", "videos": "10 videos/month", "resolution": "720p"},
        "pro": {"price": "$29", "videos": "Unlimited videos", "resolution": "4K"}
    },
    "policies": {"refund": "No refunds after 7 days", "support": "24/7 on Pro"}
}"#;

#[test]
fn config_reports_env_sources_and_redacts_api_key() {
    with_env(
        &[("AUTOSTREAM_LLM_MODEL", "gemini-2.5-pro"), ("GEMINI_API_KEY", "AIza-secret-value")],
        || {
            let result = config::run();
            assert_eq!(result.exit_code, 0);

            let output = result.output;
            assert!(output.contains("- llm.model = gemini-2.5-pro (source: env (AUTOSTREAM_LLM_MODEL))"));
            assert!(output.contains("- llm.api_key = <redacted> (source: env (GEMINI_API_KEY))"));
            assert!(output.contains("- conversation.history_capacity = 6 (source: default)"));
            assert!(!output.contains("AIza-secret-value"));
        },
    );
}

#[test]
fn config_returns_validation_failure_payload() {
    with_env(&[("AUTOSTREAM_LLM_TIMEOUT_SECS", "0")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn doctor_passes_with_knowledge_and_skips_fallback_without_key() {
    let dir = TempDir::new().expect("tempdir");
    let knowledge_path = write_knowledge(&dir);

    with_env(&[("AUTOSTREAM_KNOWLEDGE_PATH", knowledge_path.to_str().unwrap_or_default())], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0);

        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "pass");
        assert_eq!(check_status(&report, "config_validation"), "pass");
        assert_eq!(check_status(&report, "knowledge_document"), "pass");
        assert_eq!(check_status(&report, "llm_fallback"), "skipped");
    });
}

#[test]
fn doctor_fails_when_knowledge_document_is_missing() {
    with_env(&[("AUTOSTREAM_KNOWLEDGE_PATH", "does-not-exist/rag_knowledge.json")], || {
        let result = doctor::run(false);
        assert_eq!(result.exit_code, 1);
        assert!(result.output.starts_with("doctor: one or more readiness checks failed"));
        assert!(result.output.contains("- [fail] knowledge_document:"));
    });
}

#[test]
fn chat_exits_with_knowledge_failure_when_document_is_missing() {
    with_env(&[], || {
        let result = chat::run(ChatArgs {
            knowledge: Some(PathBuf::from("does-not-exist/rag_knowledge.json")),
            ..ChatArgs::default()
        });
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "chat");
        assert_eq!(payload["error_class"], "knowledge_document");
        let message = payload["message"].as_str().unwrap_or_default();
        assert!(message.contains("rag_knowledge.json"));
    });
}

#[test]
fn chat_exits_with_config_failure_for_missing_explicit_file() {
    with_env(&[], || {
        let result = chat::run(ChatArgs {
            config: Some(PathBuf::from("does-not-exist/autostream.toml")),
            ..ChatArgs::default()
        });
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
    });
}

fn write_knowledge(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("rag_knowledge.json");
    fs::write(&path, KNOWLEDGE).expect("write knowledge fixture");
    path
}

fn check_status(report: &Value, name: &str) -> String {
    report["checks"]
        .as_array()
        .and_then(|checks| checks.iter().find(|check| check["name"] == name))
        .and_then(|check| check["status"].as_str())
        .unwrap_or_default()
        .to_string()
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "AUTOSTREAM_KNOWLEDGE_PATH",
        "AUTOSTREAM_LLM_API_KEY",
        "GEMINI_API_KEY",
        "AUTOSTREAM_LLM_BASE_URL",
        "AUTOSTREAM_LLM_MODEL",
        "AUTOSTREAM_LLM_TEMPERATURE",
        "AUTOSTREAM_LLM_TIMEOUT_SECS",
        "AUTOSTREAM_CONVERSATION_HISTORY_CAPACITY",
        "AUTOSTREAM_LOGGING_LEVEL",
        "AUTOSTREAM_LOGGING_FORMAT",
        "AUTOSTREAM_LOG_LEVEL",
        "AUTOSTREAM_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
