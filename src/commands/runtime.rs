use crate::*;

fn branch_source(root: &std::path::Path, settings: &Settings, branch: Option<&str>) -> Box<dyn BranchSource> {
    match branch {
        Some(b) => Box::new(FixedBranch(b.to_string())),
        None => Box::new(GitBranchSource {
            root: root.to_path_buf(),
            env_var: settings.branch_env_var.clone(),
            default_branch: settings.default_branch.clone(),
        }),
    }
}

pub fn build_resolution(
    root: &std::path::Path,
    settings: &Settings,
    args: &ResolveArgs,
) -> Resolution {
    let source = branch_source(root, settings, args.branch.as_deref());
    let (branch, environment) =
        resolve_environment(args.env, source.as_ref(), &settings.default_branch);
    let raw_base = args
        .base
        .clone()
        .or_else(|| settings.base_identity.clone())
        .unwrap_or_else(|| manifest_base_identity(root));
    let base = base_identity(&raw_base);
    let org = args.org.as_deref().or(settings.organization.as_deref());
    Resolution {
        identity: resolve(&base, environment, org),
        branch,
        environment,
        base_package_name: base,
    }
}

fn environment_note(env: Environment) -> [&'static str; 3] {
    match env {
        Environment::Development => [
            "DEVELOPMENT environment (.dev)",
            "  - for feature branches and development work",
            "  - separate app instance for testing",
        ],
        Environment::Staging => [
            "STAGING environment (.stg)",
            "  - for QA and pre-production testing",
            "  - mirrors production configuration",
        ],
        Environment::Production => [
            "PRODUCTION environment",
            "  - for release branches and production builds",
            "  - original package name",
        ],
    }
}

fn summary_lines(r: &Resolution) -> Vec<String> {
    let mut out = vec![
        format!("branch: {}", r.branch),
        format!("environment: {}", r.environment.label().to_uppercase()),
        format!("flutter package: {}", r.identity.package_name),
        format!("android package: {}", r.identity.android_application_id),
        format!("ios bundle id: {}", r.identity.ios_bundle_id),
    ];
    out.extend(environment_note(r.environment).iter().map(|s| s.to_string()));
    out
}

fn run_report_lines(r: &RunReport, resolution: &Resolution) -> Vec<String> {
    let mut out = summary_lines(resolution);
    for f in &r.files {
        let status = serde_json::to_value(f.outcome.status)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let mut line = format!("{}\t{}\t{}\t{}", f.platform.label(), f.role, status, f.path);
        if let Some(e) = &f.outcome.error {
            line.push_str(&format!("\t{}", e));
        }
        out.push(line);
    }
    for t in &r.templates {
        match &t.message {
            Some(m) => out.push(format!("{}\ttemplate\t{}", t.platform.label(), m)),
            None => out.push(format!(
                "{}\ttemplate\tcopied {} -> {}",
                t.platform.label(),
                t.source,
                t.destination
            )),
        }
    }
    if let Some(e) = &r.record_error {
        out.push(format!("record error: {}", e));
    }
    out.push(format!(
        "applied={} skipped={} failed={} record={}",
        r.files_applied, r.files_skipped, r.files_failed, r.record_path
    ));
    out
}

pub fn handle_runtime_commands(cli: &Cli, settings: &Settings) -> anyhow::Result<()> {
    let root = &cli.root;
    match &cli.command {
        Commands::Resolve { args } => {
            let resolution = build_resolution(root, settings, args);
            print_report(cli.json, true, &resolution, summary_lines)?;
        }
        Commands::Apply {
            args,
            skip_templates,
            strict,
        } => {
            let resolution = build_resolution(root, settings, args);
            let templates_root = root.join(&settings.templates_root);
            let report = propagate(
                root,
                &resolution,
                &target_files(root),
                (!*skip_templates).then_some(templates_root.as_path()),
                &root.join(&settings.record_path),
            );
            let ok = !report.has_failures();
            print_report(cli.json, ok, &report, |r| run_report_lines(r, &resolution))?;
            if *strict && !ok {
                std::process::exit(1);
            }
        }
        Commands::Templates { env, branch } => {
            let source = branch_source(root, settings, branch.as_deref());
            let (_, environment) =
                resolve_environment(*env, source.as_ref(), &settings.default_branch);
            let (templates, saved) =
                apply_templates(root, &root.join(&settings.templates_root), environment);
            let report = TemplateRunReport {
                environment,
                templates,
                record_error: saved.err().map(|e| format!("config record: {}", e)),
            };
            let ok = report.record_error.is_none() && report.templates.iter().all(|o| o.copied);
            print_report(cli.json, ok, &report, |r| {
                let mut lines = vec![format!(
                    "environment: {} ({})",
                    r.environment.short().to_uppercase(),
                    r.environment.description()
                )];
                for o in &r.templates {
                    lines.push(match &o.message {
                        Some(m) => format!("{}\t{}", o.platform.label(), m),
                        None => format!("{}\tcopied {} -> {}", o.platform.label(), o.source, o.destination),
                    });
                }
                if let Some(e) = &r.record_error {
                    lines.push(format!("record error: {}", e));
                }
                lines
            })?;
        }
        Commands::Init { .. } | Commands::Release { .. } => {}
    }
    Ok(())
}
