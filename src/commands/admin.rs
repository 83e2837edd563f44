use crate::*;

pub fn handle_project_commands(cli: &Cli, settings: &Settings) -> anyhow::Result<bool> {
    let Commands::Init { name, package, org } = &cli.command else {
        return Ok(false);
    };

    let root = &cli.root;
    let report = setup_project(
        root,
        &root.join(&settings.templates_root),
        name,
        package.as_deref(),
        org,
    )?;

    let settings_file = settings_path(root, cli.config.as_deref());
    let mut updated = settings.clone();
    updated.organization = Some(report.organization.clone());
    save_settings(&settings_file, &updated)?;

    let ok = report.files.iter().all(|f| f.outcome.error.is_none());
    print_report(cli.json, ok, &report, |r| {
        let mut lines = vec![
            format!("project: {}", r.project_name),
            format!("package: {}", r.package_name),
            format!("organization: {}", r.organization),
            format!("android package: {}", r.android_package_name),
            format!("ios bundle id: {}", r.ios_bundle_id),
        ];
        for f in &r.files {
            lines.push(format!(
                "{}\t{}\t{:?}\t{}",
                f.platform.label(),
                f.role,
                f.outcome.status,
                f.path
            ));
        }
        lines.push(format!("settings written to {}", settings_file.display()));
        lines
    })?;
    Ok(true)
}

pub fn handle_release_commands(cli: &Cli, settings: &Settings) -> anyhow::Result<bool> {
    let Commands::Release { command } = &cli.command else {
        return Ok(false);
    };

    let root = &cli.root;
    let args = match command {
        ReleaseCommands::Log { args }
        | ReleaseCommands::Qa { args }
        | ReleaseCommands::Notify { args } => args,
    };
    let record = load_identity_record(&root.join(&settings.record_path))?;
    let input = ReleaseInput {
        platform: args.platform.clone(),
        version: args.release_version.clone(),
        build_number: args.build.clone(),
        changelog: args.changelog.clone(),
    };
    let meta = collect_metadata(root, &input, record.as_ref(), &settings.branch_env_var);

    match command {
        ReleaseCommands::Log { .. } => {
            let count = log_release(root, &meta)?;
            print_one(cli.json, &meta, |m| {
                format!(
                    "logged {} v{} ({} entries in {})",
                    m.platform, m.version, count, RELEASE_HISTORY_PATH
                )
            })?;
        }
        ReleaseCommands::Qa { .. } => {
            let path = write_qa_checklist(root, &meta, &input.changelog)?;
            print_one(cli.json, path.to_string_lossy().to_string(), |p| {
                format!("qa checklist created: {}", p)
            })?;
        }
        ReleaseCommands::Notify { .. } => {
            let message = build_release_message(&meta, &input.changelog, record.as_ref());
            let webhook = SlackWebhook::from_env();
            let report = send_notification(webhook.as_ref().map(|w| w as &dyn Notifier), &message);
            print_report(cli.json, report.sent, &report, |r| {
                vec![match &r.reason {
                    None => format!("{} notification sent", r.channel),
                    Some(why) => format!("{} notification not sent: {}", r.channel, why),
                }]
            })?;
        }
    }

    Ok(true)
}
