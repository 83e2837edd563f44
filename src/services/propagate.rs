use crate::domain::constants::{
    ANDROID_BUILD_SCRIPT, ANDROID_MANIFESTS, DEFAULT_BASE_IDENTITY, IOS_ENVIRONMENT_NOTE,
    IOS_INFO_PLIST, PUBSPEC_PATH,
};
use crate::domain::models::{
    FileReport, FormatKind, IdentityRecord, OutcomeStatus, Platform, Resolution, RunReport,
    TargetFile,
};
use crate::services::identity::base_identity;
use crate::services::rewrite::apply_identifier;
use crate::services::storage::save_identity_record;
use crate::services::templates::apply_templates;
use std::path::Path;
use tracing::{info, warn};

const MANIFEST_ROLES: [&str; 3] = ["manifest_main", "manifest_debug", "manifest_profile"];

/// Every file envstamp keeps in sync, in processing order.
pub fn target_files(root: &Path) -> Vec<TargetFile> {
    let mut out = vec![
        TargetFile {
            platform: Platform::Flutter,
            role: "pubspec",
            path: root.join(PUBSPEC_PATH),
            format: FormatKind::ManifestScalar {
                field: "name".to_string(),
            },
        },
        TargetFile {
            platform: Platform::Android,
            role: "build_script",
            path: root.join(ANDROID_BUILD_SCRIPT),
            format: FormatKind::BuildScriptAssignment {
                key: "applicationId".to_string(),
            },
        },
    ];
    for (role, manifest) in MANIFEST_ROLES.into_iter().zip(ANDROID_MANIFESTS) {
        out.push(TargetFile {
            platform: Platform::Android,
            role,
            path: root.join(manifest),
            format: FormatKind::MarkupAttribute {
                attribute: "package".to_string(),
            },
        });
    }
    out.push(TargetFile {
        platform: Platform::Ios,
        role: "info_plist",
        path: root.join(IOS_INFO_PLIST),
        format: FormatKind::PlistKeyString {
            key: "CFBundleIdentifier".to_string(),
        },
    });
    out.push(TargetFile {
        platform: Platform::Ios,
        role: "environment_note",
        path: root.join(IOS_ENVIRONMENT_NOTE),
        format: FormatKind::GeneratedNote,
    });
    out
}

/// Base identity from the pubspec `name:` field, suffixes stripped.
/// Unreadable or nameless manifests fall back to the template default.
pub fn manifest_base_identity(root: &Path) -> String {
    let path = root.join(PUBSPEC_PATH);
    let field = FormatKind::ManifestScalar {
        field: "name".to_string(),
    };
    let raw = match std::fs::read_to_string(&path) {
        Ok(r) => r,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "pubspec unreadable, using default base identity");
            return DEFAULT_BASE_IDENTITY.to_string();
        }
    };
    match field.current_value(&raw) {
        Ok(Some(name)) if !name.is_empty() => base_identity(&name),
        _ => DEFAULT_BASE_IDENTITY.to_string(),
    }
}

pub fn render_note(resolution: &Resolution) -> String {
    format!(
        "# iOS Bundle ID Configuration\n# Environment: {}\n# Bundle ID: {}\n# Branch: {}\n",
        resolution.environment.label(),
        resolution.identity.ios_bundle_id,
        resolution.branch
    )
}

/// Rewrite each target in order. Failures are collected, never short-circuit.
pub fn apply_targets(resolution: &Resolution, targets: &[TargetFile]) -> Vec<FileReport> {
    let note = render_note(resolution);
    targets
        .iter()
        .map(|t| {
            let value = match t.format {
                FormatKind::GeneratedNote => note.as_str(),
                _ => resolution.identity.for_platform(t.platform),
            };
            FileReport {
                platform: t.platform,
                role: t.role.to_string(),
                path: t.path.to_string_lossy().to_string(),
                outcome: apply_identifier(&t.path, &t.format, value),
            }
        })
        .collect()
}

pub struct Tally {
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub fn tally(files: &[FileReport]) -> Tally {
    let mut t = Tally {
        applied: 0,
        skipped: 0,
        failed: 0,
    };
    for f in files {
        match f.outcome.status {
            OutcomeStatus::Updated | OutcomeStatus::Unchanged => t.applied += 1,
            OutcomeStatus::Missing | OutcomeStatus::PatternNotFound => t.skipped += 1,
            OutcomeStatus::Failed => t.failed += 1,
        }
    }
    t
}

pub fn identity_record(resolution: &Resolution, t: &Tally) -> IdentityRecord {
    IdentityRecord {
        environment: resolution.environment,
        branch: resolution.branch.clone(),
        base_package_name: resolution.base_package_name.clone(),
        flutter_package_name: resolution.identity.package_name.clone(),
        android_package_name: resolution.identity.android_application_id.clone(),
        ios_bundle_id: resolution.identity.ios_bundle_id.clone(),
        files_applied: t.applied,
        files_skipped: t.skipped,
        files_failed: t.failed,
    }
}

/// Run one full propagation: targets, then templates (when a root is given),
/// then the identity record. Always returns a complete report.
pub fn propagate(
    root: &Path,
    resolution: &Resolution,
    targets: &[TargetFile],
    templates_root: Option<&Path>,
    record_path: &Path,
) -> RunReport {
    info!(
        branch = %resolution.branch,
        environment = %resolution.environment,
        package = %resolution.identity.package_name,
        "propagating identity"
    );
    let files = apply_targets(resolution, targets);
    let t = tally(&files);

    let mut record_error = None;
    let templates = match templates_root {
        Some(tr) => {
            let (outcomes, saved) = apply_templates(root, tr, resolution.environment);
            if let Err(e) = saved {
                record_error = Some(format!("config record: {}", e));
            }
            outcomes
        }
        None => Vec::new(),
    };

    if let Err(e) = save_identity_record(record_path, &identity_record(resolution, &t)) {
        warn!(path = %record_path.display(), error = %e, "identity record not written");
        record_error = Some(format!("identity record: {}", e));
    }

    info!(
        applied = t.applied,
        skipped = t.skipped,
        failed = t.failed,
        "propagation finished"
    );
    RunReport {
        branch: resolution.branch.clone(),
        environment: resolution.environment,
        base_package_name: resolution.base_package_name.clone(),
        identity: resolution.identity.clone(),
        files,
        templates,
        record_path: record_path.to_string_lossy().to_string(),
        record_error,
        files_applied: t.applied,
        files_skipped: t.skipped,
        files_failed: t.failed,
    }
}
