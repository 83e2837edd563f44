use crate::domain::constants::CONFIG_RECORD_PATH;
use crate::domain::models::{ConfigEnvironmentRecord, Environment, Platform, TemplateOutcome};
use crate::services::storage::save_config_record;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

fn template_file_name(platform: Platform, env: Environment) -> Option<String> {
    match platform {
        Platform::Android => Some(format!("google-services-{}.json", env.short())),
        Platform::Ios => Some(format!("GoogleService-Info-{}.plist", env.short())),
        Platform::Flutter => None,
    }
}

/// `<templates_root>/<platform>/<prefix>-<env>.<ext>`
pub fn template_source(templates_root: &Path, platform: Platform, env: Environment) -> Option<PathBuf> {
    template_file_name(platform, env).map(|f| templates_root.join(platform.label()).join(f))
}

/// Fixed per platform, independent of the environment.
pub fn template_destination(root: &Path, platform: Platform) -> Option<PathBuf> {
    match platform {
        Platform::Android => Some(root.join("android/app/google-services.json")),
        Platform::Ios => Some(root.join("ios/Runner/GoogleService-Info.plist")),
        Platform::Flutter => None,
    }
}

fn copy_template(source: &Path, destination: &Path) -> anyhow::Result<()> {
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(source, destination)?;
    Ok(())
}

/// Copy the environment's template into place. A missing template is an
/// outcome with an actionable message, never an error.
pub fn select_and_copy(
    root: &Path,
    templates_root: &Path,
    platform: Platform,
    env: Environment,
) -> TemplateOutcome {
    let (Some(source), Some(destination)) = (
        template_source(templates_root, platform, env),
        template_destination(root, platform),
    ) else {
        return TemplateOutcome {
            platform,
            source: String::new(),
            destination: String::new(),
            copied: false,
            message: Some(format!("no template convention for {}", platform.label())),
        };
    };

    let mut out = TemplateOutcome {
        platform,
        source: source.to_string_lossy().to_string(),
        destination: destination.to_string_lossy().to_string(),
        copied: false,
        message: None,
    };

    if !source.is_file() {
        warn!(source = %source.display(), "template not found");
        out.message = Some(format!(
            "template not found: {} (please create it)",
            source.display()
        ));
        return out;
    }

    match copy_template(&source, &destination) {
        Ok(()) => {
            info!(source = %source.display(), destination = %destination.display(), "template copied");
            out.copied = true;
        }
        Err(e) => {
            warn!(source = %source.display(), error = %e, "template copy failed");
            out.message = Some(format!("failed to copy {}: {}", source.display(), e));
        }
    }
    out
}

pub fn config_record(env: Environment) -> ConfigEnvironmentRecord {
    ConfigEnvironmentRecord {
        environment: env.short().to_string(),
        android_config: template_file_name(Platform::Android, env).unwrap_or_default(),
        ios_config: template_file_name(Platform::Ios, env).unwrap_or_default(),
        description: env.description().to_string(),
    }
}

/// Android then iOS, then the config record. The record write is the only
/// fallible step.
pub fn apply_templates(
    root: &Path,
    templates_root: &Path,
    env: Environment,
) -> (Vec<TemplateOutcome>, anyhow::Result<()>) {
    let outcomes = [Platform::Android, Platform::Ios]
        .into_iter()
        .map(|p| select_and_copy(root, templates_root, p, env))
        .collect();
    let saved = save_config_record(&root.join(CONFIG_RECORD_PATH), &config_record(env));
    (outcomes, saved)
}
