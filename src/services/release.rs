//! Post-publish collaborators: release history, QA checklist, chat notification.
//!
//! These only consume the identity record; they never resolve identity.

use crate::domain::constants::{QA_CHECKLIST, QA_DIR};
use crate::domain::models::{IdentityRecord, NotifyReport, QaChecklist, ReleaseMetadata};
use crate::services::storage::{append_release_csv, append_release_history, save_json};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const SLACK_WEBHOOK_VAR: &str = "SLACK_WEBHOOK_URL";

pub struct ReleaseInput {
    pub platform: String,
    pub version: String,
    pub build_number: String,
    pub changelog: String,
}

/// Delivery channel for release messages. Single attempt, no retry.
pub trait Notifier {
    fn channel(&self) -> &str;
    fn notify(&self, message: &serde_json::Value) -> anyhow::Result<()>;
}

pub struct SlackWebhook {
    pub url: String,
    pub timeout_ms: u64,
}

impl SlackWebhook {
    pub fn from_env() -> Option<Self> {
        std::env::var(SLACK_WEBHOOK_VAR)
            .ok()
            .filter(|u| !u.trim().is_empty())
            .map(|url| Self {
                url,
                timeout_ms: 10_000,
            })
    }
}

impl Notifier for SlackWebhook {
    fn channel(&self) -> &str {
        "slack"
    }

    fn notify(&self, message: &serde_json::Value) -> anyhow::Result<()> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .build()?;
        client
            .post(&self.url)
            .json(message)
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

fn git_output(root: &Path, args: &[&str]) -> Option<String> {
    let out = std::process::Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let s = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!s.is_empty()).then_some(s)
}

fn env_or(var: &str, fallback: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Branch comes from the identity record when one exists, else from
/// `branch_env_var`.
pub fn collect_metadata(
    root: &Path,
    input: &ReleaseInput,
    record: Option<&IdentityRecord>,
    branch_env_var: &str,
) -> ReleaseMetadata {
    let branch_name = match record {
        Some(r) => r.branch.clone(),
        None => env_or(branch_env_var, "unknown"),
    };
    ReleaseMetadata {
        timestamp: chrono::Utc::now().to_rfc3339(),
        platform: input.platform.to_lowercase(),
        version: input.version.clone(),
        build_number: input.build_number.clone(),
        commit_hash: git_output(root, &["rev-parse", "HEAD"]).unwrap_or_else(|| "unknown".to_string()),
        branch_name,
        triggered_by: env_or("GITHUB_ACTOR", "automated"),
        status: "success".to_string(),
    }
}

pub fn download_instructions(platform: &str) -> &'static str {
    if platform.eq_ignore_ascii_case("ios") {
        "• Open TestFlight app on your iOS device\n• Check for new builds\n• Install and test the latest version"
    } else {
        "• Open Play Console Internal Testing link\n• Download and install the latest AAB\n• Test on your Android device"
    }
}

fn store_name(platform: &str) -> &'static str {
    if platform.eq_ignore_ascii_case("ios") {
        "TestFlight"
    } else {
        "Play Store Internal"
    }
}

pub fn build_release_message(
    meta: &ReleaseMetadata,
    changelog: &str,
    record: Option<&IdentityRecord>,
) -> serde_json::Value {
    let platform = meta.platform.to_uppercase();
    let short_commit: String = meta.commit_hash.chars().take(8).collect();
    let mut fields = vec![
        serde_json::json!({"type": "mrkdwn", "text": format!("*Version:* {}", meta.version)}),
        serde_json::json!({"type": "mrkdwn", "text": format!("*Build:* {}", meta.build_number)}),
        serde_json::json!({"type": "mrkdwn", "text": format!("*Platform:* {}", store_name(&meta.platform))}),
        serde_json::json!({"type": "mrkdwn", "text": format!("*Branch:* {}", meta.branch_name)}),
        serde_json::json!({"type": "mrkdwn", "text": format!("*Commit:* {}", short_commit)}),
        serde_json::json!({"type": "mrkdwn", "text": format!("*Triggered by:* {}", meta.triggered_by)}),
    ];
    if let Some(r) = record {
        let id = if meta.platform == "ios" {
            &r.ios_bundle_id
        } else {
            &r.android_package_name
        };
        fields.push(serde_json::json!({"type": "mrkdwn", "text": format!("*Environment:* {} ({})", r.environment, id)}));
    }
    serde_json::json!({
        "text": format!("New {} Release Available!", platform),
        "blocks": [
            {"type": "header", "text": {"type": "plain_text", "text": format!("{} Release - v{}", platform, meta.version)}},
            {"type": "section", "fields": fields},
            {"type": "section", "text": {"type": "mrkdwn", "text": format!("*What's New:*\n```{}```", changelog)}},
            {"type": "section", "text": {"type": "mrkdwn", "text": format!("*Download Instructions:*\n{}", download_instructions(&meta.platform))}}
        ]
    })
}

/// Missing webhook configuration is a skip, not an error.
pub fn send_notification(notifier: Option<&dyn Notifier>, message: &serde_json::Value) -> NotifyReport {
    let Some(n) = notifier else {
        warn!("{} not configured, notification skipped", SLACK_WEBHOOK_VAR);
        return NotifyReport {
            channel: "slack".to_string(),
            sent: false,
            reason: Some(format!("{} not configured", SLACK_WEBHOOK_VAR)),
        };
    };
    match n.notify(message) {
        Ok(()) => {
            info!(channel = n.channel(), "notification sent");
            NotifyReport {
                channel: n.channel().to_string(),
                sent: true,
                reason: None,
            }
        }
        Err(e) => {
            warn!(channel = n.channel(), error = %e, "notification failed");
            NotifyReport {
                channel: n.channel().to_string(),
                sent: false,
                reason: Some(e.to_string()),
            }
        }
    }
}

pub fn log_release(root: &Path, meta: &ReleaseMetadata) -> anyhow::Result<usize> {
    let count = append_release_history(root, meta.clone())?;
    let csv = append_release_csv(root, meta)?;
    info!(entries = count, csv = %csv.display(), "release history updated");
    Ok(count)
}

pub fn qa_checklist_path(root: &Path, version: &str, platform: &str) -> PathBuf {
    root.join(QA_DIR)
        .join(format!("qa-checklist-v{}-{}.json", version, platform.to_lowercase()))
}

pub fn write_qa_checklist(root: &Path, meta: &ReleaseMetadata, changelog: &str) -> anyhow::Result<PathBuf> {
    let checklist = QaChecklist {
        title: format!("QA Testing - {} v{}", meta.platform.to_uppercase(), meta.version),
        platform: meta.platform.clone(),
        version: meta.version.clone(),
        build_number: meta.build_number.clone(),
        download_instructions: download_instructions(&meta.platform).to_string(),
        changelog: changelog.to_string(),
        checklist: QA_CHECKLIST.iter().map(|s| s.to_string()).collect(),
        assigned_qa: env_or("QA_ASSIGNEE", "QA Team"),
        created_at: meta.timestamp.clone(),
    };
    let path = qa_checklist_path(root, &meta.version, &meta.platform);
    save_json(&path, &checklist)?;
    Ok(path)
}
