use autostream_agent::GeminiClient;
use autostream_core::config::{AppConfig, LoadOptions};
use autostream_core::KnowledgeBase;
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Fail { 1 } else { 0 };

    if json_output {
        let output = serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
        return CommandResult::report(exit_code, output);
    }

    CommandResult::report(exit_code, render_human(&report))
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_knowledge_document(&config));
            checks.push(check_llm_fallback(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["knowledge_document", "llm_fallback"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let any_failed = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let overall_status = if any_failed { CheckStatus::Fail } else { CheckStatus::Pass };
    let summary = if any_failed {
        "doctor: one or more readiness checks failed".to_string()
    } else {
        "doctor: all readiness checks passed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_knowledge_document(config: &AppConfig) -> DoctorCheck {
    match KnowledgeBase::load(&config.knowledge.path) {
        Ok(_) => DoctorCheck {
            name: "knowledge_document",
            status: CheckStatus::Pass,
            details: format!("loaded `{}`", config.knowledge.path.display()),
        },
        Err(error) => DoctorCheck {
            name: "knowledge_document",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_llm_fallback(config: &AppConfig) -> DoctorCheck {
    match GeminiClient::from_config(&config.llm) {
        Ok(Some(_)) => DoctorCheck {
            name: "llm_fallback",
            status: CheckStatus::Pass,
            details: format!("gemini client configured for model `{}`", config.llm.model),
        },
        Ok(None) => DoctorCheck {
            name: "llm_fallback",
            status: CheckStatus::Skipped,
            details: "no API key configured; free-text questions get the fixed fallback reply"
                .to_string(),
        },
        Err(error) => DoctorCheck {
            name: "llm_fallback",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
