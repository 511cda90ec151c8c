use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use autostream_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

struct ConfigLine {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            )
        }
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for line in effective_lines(&config) {
        let source = field_source(
            line.key,
            line.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(line.key, &line.value, source));
    }

    CommandResult::report(0, lines.join("\n"))
}

fn effective_lines(config: &AppConfig) -> Vec<ConfigLine> {
    let api_key = if config.llm.has_api_key() { "<redacted>" } else { "<unset>" };

    vec![
        ConfigLine {
            key: "knowledge.path",
            value: config.knowledge.path.display().to_string(),
            env_keys: &["AUTOSTREAM_KNOWLEDGE_PATH"],
        },
        ConfigLine {
            key: "llm.api_key",
            value: api_key.to_string(),
            env_keys: &["AUTOSTREAM_LLM_API_KEY", "GEMINI_API_KEY"],
        },
        ConfigLine {
            key: "llm.base_url",
            value: config.llm.base_url.clone(),
            env_keys: &["AUTOSTREAM_LLM_BASE_URL"],
        },
        ConfigLine {
            key: "llm.model",
            value: config.llm.model.clone(),
            env_keys: &["AUTOSTREAM_LLM_MODEL"],
        },
        ConfigLine {
            key: "llm.temperature",
            value: config.llm.temperature.to_string(),
            env_keys: &["AUTOSTREAM_LLM_TEMPERATURE"],
        },
        ConfigLine {
            key: "llm.timeout_secs",
            value: config.llm.timeout_secs.to_string(),
            env_keys: &["AUTOSTREAM_LLM_TIMEOUT_SECS"],
        },
        ConfigLine {
            key: "conversation.history_capacity",
            value: config.conversation.history_capacity.to_string(),
            env_keys: &["AUTOSTREAM_CONVERSATION_HISTORY_CAPACITY"],
        },
        ConfigLine {
            key: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["AUTOSTREAM_LOGGING_LEVEL", "AUTOSTREAM_LOG_LEVEL"],
        },
        ConfigLine {
            key: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["AUTOSTREAM_LOGGING_FORMAT", "AUTOSTREAM_LOG_FORMAT"],
        },
    ]
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let set_env_key = env_keys.iter().find(|key| {
        env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
    });
    if let Some(env_key) = set_env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("config file"));
            return format!("file ({})", file_path.display());
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
