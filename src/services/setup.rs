use crate::domain::constants::TEMPLATE_PLACEHOLDER_ID;
use crate::domain::models::{
    Environment, FileReport, FormatKind, OutcomeStatus, Platform, PropagationOutcome, SetupReport,
};
use crate::services::identity::resolve;
use crate::services::propagate::target_files;
use crate::services::rewrite::{apply_identifier, write_atomic};
use crate::services::templates::template_source;
use std::path::Path;
use tracing::info;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SetupError {
    #[error("project name cannot be empty")]
    EmptyProjectName,
    #[error("invalid package name '{0}': must start with a lowercase letter and contain only lowercase letters, digits and underscores")]
    InvalidPackage(String),
    #[error("invalid organization '{0}': expected reverse-domain form like 'com.yourcompany' (lowercase, dots allowed)")]
    InvalidOrganization(String),
}

/// `My Awesome App!` -> `my_awesome_app`
pub fn suggest_package_name(project_name: &str) -> String {
    let lower = project_name.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    for c in lower.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

pub fn validate_package_name(name: &str) -> Result<(), SetupError> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SetupError::InvalidPackage(name.to_string()))
    }
}

pub fn validate_organization(org: &str) -> Result<(), SetupError> {
    let valid = org.split('.').all(|seg| {
        seg.chars().next().is_some_and(|c| c.is_ascii_lowercase())
            && seg.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    });
    if valid {
        Ok(())
    } else {
        Err(SetupError::InvalidOrganization(org.to_string()))
    }
}

fn replace_placeholder(path: &Path, from: &str, to: &str) -> PropagationOutcome {
    let status = if !path.exists() {
        Ok(OutcomeStatus::Missing)
    } else {
        std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|raw| {
                if !raw.contains(from) {
                    return Ok(OutcomeStatus::PatternNotFound);
                }
                let next = raw.replace(from, to);
                if next == raw {
                    return Ok(OutcomeStatus::Unchanged);
                }
                write_atomic(path, &next)?;
                Ok(OutcomeStatus::Updated)
            })
    };
    match status {
        Ok(s) => PropagationOutcome {
            found: matches!(s, OutcomeStatus::Updated | OutcomeStatus::Unchanged),
            updated: s == OutcomeStatus::Updated,
            error: None,
            status: s,
        },
        Err(e) => PropagationOutcome {
            found: false,
            updated: false,
            error: Some(e.to_string()),
            status: OutcomeStatus::Failed,
        },
    }
}

/// Stamp a fresh identity into a project created from the template.
///
/// Inputs are validated first; nothing is written when validation fails.
pub fn setup_project(
    root: &Path,
    templates_root: &Path,
    project_name: &str,
    package: Option<&str>,
    organization: &str,
) -> anyhow::Result<SetupReport> {
    let project_name = project_name.trim();
    if project_name.is_empty() {
        return Err(SetupError::EmptyProjectName.into());
    }
    let package = package
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| suggest_package_name(project_name));
    validate_package_name(&package)?;
    validate_organization(organization)?;

    let identity = resolve(&package, Environment::Production, Some(organization));
    info!(package = %package, organization, "setting up project");

    let mut files = Vec::new();
    for t in target_files(root) {
        if t.format == FormatKind::GeneratedNote {
            continue;
        }
        let value = identity.for_platform(t.platform);
        files.push(FileReport {
            platform: t.platform,
            role: t.role.to_string(),
            path: t.path.to_string_lossy().to_string(),
            outcome: apply_identifier(&t.path, &t.format, value),
        });
        if t.role == "pubspec" {
            let description = FormatKind::ManifestScalar {
                field: "description".to_string(),
            };
            files.push(FileReport {
                platform: t.platform,
                role: "pubspec_description".to_string(),
                path: t.path.to_string_lossy().to_string(),
                outcome: apply_identifier(&t.path, &description, project_name),
            });
        }
    }

    for env in [
        Environment::Development,
        Environment::Staging,
        Environment::Production,
    ] {
        let placeholder = match env.package_suffix() {
            Some(s) => format!("{}.{}", TEMPLATE_PLACEHOLDER_ID, s),
            None => TEMPLATE_PLACEHOLDER_ID.to_string(),
        };
        let derived = resolve(&package, env, Some(organization));
        for platform in [Platform::Android, Platform::Ios] {
            let Some(path) = template_source(templates_root, platform, env) else {
                continue;
            };
            files.push(FileReport {
                platform,
                role: format!("template_{}", env.short()),
                path: path.to_string_lossy().to_string(),
                outcome: replace_placeholder(&path, &placeholder, derived.for_platform(platform)),
            });
        }
    }

    Ok(SetupReport {
        project_name: project_name.to_string(),
        package_name: package,
        organization: organization.to_string(),
        android_package_name: identity.android_application_id,
        ios_bundle_id: identity.ios_bundle_id,
        files,
    })
}
