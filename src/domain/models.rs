use crate::domain::constants::{
    BRANCH_ENV_VAR, DEFAULT_BRANCH, DEFAULT_RECORD_PATH, DEFAULT_TEMPLATES_ROOT,
};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Deployment tier. Both naming conventions (`dev`/`development`, ...) map here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[serde(alias = "dev")]
    #[value(alias = "dev")]
    Development,
    #[serde(alias = "stg")]
    #[value(alias = "stg")]
    Staging,
    #[serde(alias = "prod")]
    #[value(alias = "prod")]
    Production,
}

impl Environment {
    pub fn label(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Suffix used in template file names.
    pub fn short(self) -> &'static str {
        match self {
            Environment::Development => "dev",
            Environment::Staging => "stg",
            Environment::Production => "prod",
        }
    }

    pub fn package_suffix(self) -> Option<&'static str> {
        match self {
            Environment::Development => Some("dev"),
            Environment::Staging => Some("stg"),
            Environment::Production => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Environment::Development => "Development environment for feature branches",
            Environment::Staging => "Staging environment for QA and testing",
            Environment::Production => "Production environment for releases",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Flutter,
    Android,
    Ios,
}

impl Platform {
    pub fn label(self) -> &'static str {
        match self {
            Platform::Flutter => "flutter",
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedIdentitySet {
    pub package_name: String,
    pub android_application_id: String,
    pub ios_bundle_id: String,
}

impl DerivedIdentitySet {
    pub fn for_platform(&self, platform: Platform) -> &str {
        match platform {
            Platform::Flutter => &self.package_name,
            Platform::Android => &self.android_application_id,
            Platform::Ios => &self.ios_bundle_id,
        }
    }
}

/// How a target file stores its identifier. Matching/rewriting lives in
/// `services::rewrite`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatKind {
    /// Line-anchored top-level `field: value` in a YAML-like manifest.
    ManifestScalar { field: String },
    /// `key = "value"` assignment in a Gradle build script.
    BuildScriptAssignment { key: String },
    /// `attribute="value"` on an XML element.
    MarkupAttribute { attribute: String },
    /// `<key>KEY</key><string>value</string>` pair in a property list.
    PlistKeyString { key: String },
    /// File owned entirely by envstamp; the value is the full content.
    GeneratedNote,
}

#[derive(Clone, Debug)]
pub struct TargetFile {
    pub platform: Platform,
    pub role: &'static str,
    pub path: PathBuf,
    pub format: FormatKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Updated,
    Unchanged,
    PatternNotFound,
    Missing,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PropagationOutcome {
    pub found: bool,
    pub updated: bool,
    pub error: Option<String>,
    pub status: OutcomeStatus,
}

#[derive(Clone, Debug, Serialize)]
pub struct FileReport {
    pub platform: Platform,
    pub role: String,
    pub path: String,
    #[serde(flatten)]
    pub outcome: PropagationOutcome,
}

#[derive(Clone, Debug, Serialize)]
pub struct TemplateOutcome {
    pub platform: Platform,
    pub source: String,
    pub destination: String,
    pub copied: bool,
    pub message: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub branch: String,
    pub environment: Environment,
    pub base_package_name: String,
    pub identity: DerivedIdentitySet,
    pub files: Vec<FileReport>,
    pub templates: Vec<TemplateOutcome>,
    pub record_path: String,
    pub record_error: Option<String>,
    pub files_applied: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.files_failed > 0
            || self.record_error.is_some()
            || self.templates.iter().any(|t| !t.copied)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TemplateRunReport {
    pub environment: Environment,
    pub templates: Vec<TemplateOutcome>,
    pub record_error: Option<String>,
}

/// Last known configuration, overwritten on every `apply`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub environment: Environment,
    pub branch: String,
    pub base_package_name: String,
    pub flutter_package_name: String,
    pub android_package_name: String,
    pub ios_bundle_id: String,
    pub files_applied: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConfigEnvironmentRecord {
    pub environment: String,
    pub android_config: String,
    pub ios_config: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Resolution {
    pub branch: String,
    pub environment: Environment,
    pub base_package_name: String,
    pub identity: DerivedIdentitySet,
}

#[derive(Clone, Debug, Serialize)]
pub struct SetupReport {
    pub project_name: String,
    pub package_name: String,
    pub organization: String,
    pub android_package_name: String,
    pub ios_bundle_id: String,
    pub files: Vec<FileReport>,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_branch_env_var() -> String {
    BRANCH_ENV_VAR.to_string()
}

fn default_templates_root() -> String {
    DEFAULT_TEMPLATES_ROOT.to_string()
}

fn default_record_path() -> String {
    DEFAULT_RECORD_PATH.to_string()
}

/// Project-level settings, read from `envstamp.toml`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub base_identity: Option<String>,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    #[serde(default = "default_branch_env_var")]
    pub branch_env_var: String,
    #[serde(default = "default_templates_root")]
    pub templates_root: String,
    #[serde(default = "default_record_path")]
    pub record_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            organization: None,
            base_identity: None,
            default_branch: default_branch(),
            branch_env_var: default_branch_env_var(),
            templates_root: default_templates_root(),
            record_path: default_record_path(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseMetadata {
    pub timestamp: String,
    pub platform: String,
    pub version: String,
    pub build_number: String,
    pub commit_hash: String,
    pub branch_name: String,
    pub triggered_by: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QaChecklist {
    pub title: String,
    pub platform: String,
    pub version: String,
    pub build_number: String,
    pub download_instructions: String,
    pub changelog: String,
    pub checklist: Vec<String>,
    pub assigned_qa: String,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct NotifyReport {
    pub channel: String,
    pub sent: bool,
    pub reason: Option<String>,
}
