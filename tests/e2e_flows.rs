mod common;

use common::{snapshot, TestEnv};
use predicates::prelude::*;
use std::fs;

const TARGETS: [&str; 5] = [
    "pubspec.yaml",
    "android/app/build.gradle.kts",
    "android/app/src/main/AndroidManifest.xml",
    "ios/Runner/Info.plist",
    "ios/configuration/environment.txt",
];

#[test]
fn staging_branch_stamps_every_present_file() {
    let env = TestEnv::new();
    let v = env.run_json(&["apply", "--branch", "qa/regression-2"]);

    assert_eq!(v["ok"], false, "templates are absent so the run is not clean");
    let data = &v["data"];
    assert_eq!(data["environment"], "staging");
    assert_eq!(data["identity"]["package_name"], "my_app.stg");
    assert_eq!(data["identity"]["android_application_id"], "com.example.my.app.stg");
    assert_eq!(data["files_applied"], 5);
    assert_eq!(data["files_skipped"], 2);
    assert_eq!(data["files_failed"], 0);

    let roles: Vec<&str> = data["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["role"].as_str().unwrap())
        .collect();
    assert_eq!(
        roles,
        [
            "pubspec",
            "build_script",
            "manifest_main",
            "manifest_debug",
            "manifest_profile",
            "info_plist",
            "environment_note"
        ]
    );
    assert_eq!(data["files"][3]["status"], "missing");

    assert!(env.read("pubspec.yaml").starts_with("name: my_app.stg\n"));
    assert!(env
        .read("android/app/build.gradle.kts")
        .contains("applicationId = \"com.example.my.app.stg\""));
    let manifest = env.read("android/app/src/main/AndroidManifest.xml");
    assert!(manifest.contains("package=\"com.example.my.app.stg\""));
    assert!(manifest.contains("android:name=\"android.permission.INTERNET\""));
    let plist = env.read("ios/Runner/Info.plist");
    assert!(plist.contains("<string>com.example.my.app.stg</string>"));
    assert!(plist.contains("<string>flutter_projects</string>"));
    assert!(env
        .read("ios/configuration/environment.txt")
        .contains("# Environment: staging"));
    assert!(!env.path("android/app/src/debug/AndroidManifest.xml").exists());

    let record: serde_json::Value =
        serde_json::from_str(&env.read("build_config/environment.json")).unwrap();
    assert_eq!(record["environment"], "staging");
    assert_eq!(record["branch"], "qa/regression-2");
    assert_eq!(record["base_package_name"], "my_app");
    assert_eq!(record["ios_bundle_id"], "com.example.my.app.stg");
    assert_eq!(record["files_applied"], 5);
    assert_eq!(record["files_skipped"], 2);
}

#[test]
fn second_apply_is_a_no_op() {
    let env = TestEnv::new();
    env.run_json(&["apply", "--branch", "main", "--skip-templates"]);
    let before = snapshot(&env.root, &TARGETS);

    let v = env.run_json(&["apply", "--branch", "main", "--skip-templates"]);
    assert_eq!(v["ok"], true);
    for f in v["data"]["files"].as_array().unwrap() {
        assert_eq!(f["updated"], false, "{}", f["role"]);
    }
    assert_eq!(snapshot(&env.root, &TARGETS), before);
}

#[test]
fn switching_environment_does_not_stack_suffixes() {
    let env = TestEnv::new();
    env.run_json(&["apply", "--branch", "feature/cart", "--skip-templates"]);
    assert!(env.read("pubspec.yaml").starts_with("name: my_app.dev\n"));

    let v = env.run_json(&["apply", "--branch", "develop", "--skip-templates"]);
    assert_eq!(v["data"]["base_package_name"], "my_app");
    assert!(env.read("pubspec.yaml").starts_with("name: my_app.stg\n"));

    env.run_json(&["apply", "--branch", "main", "--skip-templates"]);
    assert!(env.read("pubspec.yaml").starts_with("name: my_app\n"));
    assert!(env
        .read("android/app/build.gradle.kts")
        .contains("applicationId = \"com.example.my.app\""));
}

#[test]
fn branch_falls_back_to_ci_variable_then_default() {
    let env = TestEnv::new();
    let out = env
        .cmd()
        .env("GITHUB_REF_NAME", "qa/nightly")
        .args(["--json", "resolve"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["data"]["branch"], "qa/nightly");
    assert_eq!(v["data"]["environment"], "staging");

    let v = env.run_json(&["resolve"]);
    assert_eq!(v["data"]["branch"], "main");
    assert_eq!(v["data"]["environment"], "production");
}

#[test]
fn explicit_env_wins_over_branch() {
    let env = TestEnv::new();
    let v = env.run_json(&["resolve", "--branch", "hotfix/crash", "--env", "dev"]);
    assert_eq!(v["data"]["environment"], "development");
    assert_eq!(v["data"]["identity"]["ios_bundle_id"], "com.example.my.app.dev");
    assert!(!env.path("build_config/environment.json").exists());
}

#[test]
fn org_prefix_is_applied_to_platform_ids() {
    let env = TestEnv::new();
    let v = env.run_json(&["resolve", "--branch", "main", "--org", "com.acme"]);
    assert_eq!(v["data"]["identity"]["android_application_id"], "com.acme.my.app");
    assert_eq!(v["data"]["identity"]["package_name"], "my_app");
}

#[test]
fn unwritable_target_fails_without_blocking_the_rest() {
    let env = TestEnv::new();
    let gradle = env.path("android/app/build.gradle.kts");
    fs::remove_file(&gradle).unwrap();
    fs::create_dir_all(&gradle).unwrap();

    let v = env.run_json(&["apply", "--branch", "feature/cart", "--skip-templates"]);
    assert_eq!(v["ok"], false);
    assert_eq!(v["data"]["files_failed"], 1);
    assert_eq!(v["data"]["files"][1]["status"], "failed");
    assert!(v["data"]["files"][1]["error"].is_string());
    assert!(env
        .read("ios/Runner/Info.plist")
        .contains("<string>com.example.my.app.dev</string>"));

    env.cmd()
        .args(["apply", "--branch", "feature/cart", "--skip-templates", "--strict"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn templates_are_copied_for_the_resolved_environment() {
    let env = TestEnv::new();
    env.with_templates();

    let v = env.run_json(&["apply", "--branch", "feature/login"]);
    assert_eq!(v["ok"], true);
    assert_eq!(
        env.read("android/app/google-services.json"),
        "{\"project_id\": \"demo-dev\"}"
    );
    assert_eq!(
        env.read("ios/Runner/GoogleService-Info.plist"),
        "<plist><string>demo-dev</string></plist>"
    );
    let cfg: serde_json::Value =
        serde_json::from_str(&env.read("build_config/config_environment.json")).unwrap();
    assert_eq!(cfg["environment"], "dev");
    assert_eq!(cfg["android_config"], "google-services-dev.json");
}

#[test]
fn templates_command_reports_missing_template() {
    let env = TestEnv::new();
    env.write(
        "config/templates/android/google-services-prod.json",
        "{\"project_id\": \"demo-prod\"}",
    );

    env.cmd()
        .args(["templates", "prod"])
        .assert()
        .success()
        .stdout(predicate::str::contains("environment: PROD"))
        .stdout(predicate::str::contains("template not found"))
        .stdout(predicate::str::contains("please create it"));
    assert_eq!(
        env.read("android/app/google-services.json"),
        "{\"project_id\": \"demo-prod\"}"
    );
    assert!(!env.path("ios/Runner/GoogleService-Info.plist").exists());
}

#[test]
fn templates_command_survives_unwritable_config_record() {
    let env = TestEnv::new();
    env.with_templates();
    env.write("build_config", "not a directory");

    let v = env.run_json(&["templates", "stg"]);
    assert_eq!(v["ok"], false);
    assert_eq!(v["data"]["environment"], "staging");
    assert!(v["data"]["record_error"]
        .as_str()
        .unwrap()
        .starts_with("config record:"));
    assert_eq!(v["data"]["templates"][0]["copied"], true);
    assert_eq!(
        env.read("android/app/google-services.json"),
        "{\"project_id\": \"demo-stg\"}"
    );
}

#[test]
fn init_configures_project_and_persists_organization() {
    let env = TestEnv::new();
    env.write(
        "config/templates/android/google-services-stg.json",
        "{\"package_name\": \"com.example.flutter.projects.stg\"}",
    );

    let v = env.run_json(&["init", "--name", "Shop Front", "--org", "com.acme"]);
    assert_eq!(v["data"]["package_name"], "shop_front");
    assert_eq!(v["data"]["android_package_name"], "com.acme.shop.front");

    assert!(env.read("pubspec.yaml").starts_with("name: shop_front\n"));
    assert!(env
        .read("android/app/build.gradle.kts")
        .contains("applicationId = \"com.acme.shop.front\""));
    assert_eq!(
        env.read("config/templates/android/google-services-stg.json"),
        "{\"package_name\": \"com.acme.shop.front.stg\"}"
    );
    assert!(env.read("envstamp.toml").contains("com.acme"));

    let v = env.run_json(&["resolve", "--branch", "develop"]);
    assert_eq!(v["data"]["environment"], "staging");
    assert_eq!(v["data"]["identity"]["android_application_id"], "com.acme.shop.front.stg");
    let v = env.run_json(&["resolve", "--branch", "feature/search"]);
    assert_eq!(v["data"]["identity"]["android_application_id"], "com.acme.shop.front.dev");
}

#[test]
fn init_rejects_invalid_input_and_writes_nothing() {
    let env = TestEnv::new();
    let before = snapshot(&env.root, &TARGETS);

    env.cmd()
        .args(["init", "--name", "Shop", "--org", "Com.Acme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid organization"));
    env.cmd()
        .args(["init", "--name", "Shop", "--package", "9lives", "--org", "com.acme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid package name"));

    assert_eq!(snapshot(&env.root, &TARGETS), before);
    assert!(!env.path("envstamp.toml").exists());
}

#[test]
fn release_log_and_qa_use_the_identity_record() {
    let env = TestEnv::new();
    env.run_json(&["apply", "--branch", "release/1.2", "--skip-templates"]);

    let v = env.run_json(&["release", "log", "android", "1.2.0", "42"]);
    assert_eq!(v["data"]["platform"], "android");
    assert_eq!(v["data"]["branch_name"], "release/1.2");
    assert_eq!(v["data"]["triggered_by"], "automated");
    env.run_json(&["release", "log", "ios", "1.2.0", "43"]);

    let history: Vec<serde_json::Value> =
        serde_json::from_str(&env.read("logs/release_history.json")).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["build_number"], "43");
    let csv = env.read("logs/release_history.csv");
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.starts_with("timestamp,platform,version,build_number,"));

    env.cmd()
        .args(["release", "qa", "iOS", "1.2.0", "43", "--changelog", "- new checkout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("qa-checklist-v1.2.0-ios.json"));
    let qa: serde_json::Value =
        serde_json::from_str(&env.read("qa/qa-checklist-v1.2.0-ios.json")).unwrap();
    assert_eq!(qa["changelog"], "- new checkout");
    assert_eq!(qa["assigned_qa"], "QA Team");
}

#[test]
fn notify_without_webhook_is_skipped() {
    let env = TestEnv::new();
    let v = env.run_json(&["release", "notify", "android", "1.0.0", "1"]);
    assert_eq!(v["ok"], false);
    assert_eq!(v["data"]["sent"], false);
    assert!(v["data"]["reason"]
        .as_str()
        .unwrap()
        .contains("SLACK_WEBHOOK_URL"));
}

#[test]
fn notify_delivery_failure_is_reported_not_fatal() {
    let env = TestEnv::new();
    let out = env
        .cmd()
        .env("SLACK_WEBHOOK_URL", "http://127.0.0.1:9/hook")
        .args(["--json", "release", "notify", "ios", "1.0.0", "1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["data"]["sent"], false);
    assert_eq!(v["data"]["channel"], "slack");
}

#[test]
fn release_branch_uses_configured_variable_without_record() {
    let env = TestEnv::new();
    env.write("envstamp.toml", "branch_env_var = \"CI_BRANCH\"\n");
    let out = env
        .cmd()
        .env("CI_BRANCH", "qa/rc-4")
        .env("GITHUB_REF_NAME", "main")
        .args(["--json", "release", "log", "ios", "3.0.0", "9"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["data"]["branch_name"], "qa/rc-4");
}
