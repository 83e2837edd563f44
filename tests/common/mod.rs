#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const GRADLE: &str = r#"plugins {
    id("com.android.application")
}

android {
    namespace = "com.example.flutter_projects"
    defaultConfig {
        applicationId = "com.example.flutter.projects"
        minSdk = flutter.minSdkVersion
    }
}
"#;

pub const MANIFEST: &str = r#"<manifest xmlns:android="http://schemas.android.com/apk/res/android"
    package="com.example.flutter.projects">
    <uses-permission android:name="android.permission.INTERNET"/>
</manifest>
"#;

pub const PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
	<key>CFBundleIdentifier</key>
	<string>com.example.flutter.projects</string>
	<key>CFBundleName</key>
	<string>flutter_projects</string>
</dict>
</plist>
"#;

pub const PUBSPEC: &str = "name: my_app\ndescription: \"A new Flutter project.\"\nversion: 1.0.0+1\n\nenvironment:\n  sdk: ^3.5.0\n";

pub struct TestEnv {
    _tmp: TempDir,
    pub base: PathBuf,
    pub root: PathBuf,
}

impl TestEnv {
    /// Project with pubspec, gradle, main manifest and Info.plist. The debug
    /// and profile manifests are deliberately absent.
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let base = tmp.path().to_path_buf();
        let root = base.join("project");
        fs::create_dir_all(&root).expect("create project root");
        let env = Self {
            _tmp: tmp,
            base,
            root,
        };
        env.write("pubspec.yaml", PUBSPEC);
        env.write("android/app/build.gradle.kts", GRADLE);
        env.write("android/app/src/main/AndroidManifest.xml", MANIFEST);
        env.write("ios/Runner/Info.plist", PLIST);
        env
    }

    pub fn write(&self, rel: &str, content: &str) {
        let p = self.root.join(rel);
        fs::create_dir_all(p.parent().expect("parent")).expect("create parent");
        fs::write(p, content).expect("write fixture");
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.root.join(rel)).expect("read fixture")
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn with_templates(&self) -> &Self {
        for env in ["dev", "stg", "prod"] {
            self.write(
                &format!("config/templates/android/google-services-{}.json", env),
                &format!("{{\"project_id\": \"demo-{}\"}}", env),
            );
            self.write(
                &format!("config/templates/ios/GoogleService-Info-{}.plist", env),
                &format!("<plist><string>demo-{}</string></plist>", env),
            );
        }
        self
    }

    /// Binary pointed at the fixture project, isolated from the caller's git
    /// checkout and CI variables.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("envstamp");
        cmd.env("GIT_CEILING_DIRECTORIES", &self.base)
            .env_remove("GITHUB_REF_NAME")
            .env_remove("GITHUB_ACTOR")
            .env_remove("SLACK_WEBHOOK_URL")
            .env_remove("QA_ASSIGNEE")
            .env_remove("RUST_LOG")
            .arg("--root")
            .arg(&self.root);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

pub fn snapshot(root: &Path, rels: &[&str]) -> Vec<Option<Vec<u8>>> {
    rels.iter().map(|r| fs::read(root.join(r)).ok()).collect()
}
