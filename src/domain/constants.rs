pub const DEFAULT_BRANCH: &str = "main";
pub const BRANCH_ENV_VAR: &str = "GITHUB_REF_NAME";
pub const DEFAULT_BASE_IDENTITY: &str = "flutter_projects";
pub const DEFAULT_ORG_PREFIX: &str = "com.example";
/// Any identifier already rooted here is treated as reverse-domain qualified
/// when no organization is configured.
pub const REVERSE_DOMAIN_ROOT: &str = "com.";
pub const TEMPLATE_PLACEHOLDER_ID: &str = "com.example.flutter.projects";

pub const SETTINGS_FILE: &str = "envstamp.toml";
pub const DEFAULT_TEMPLATES_ROOT: &str = "config/templates";
pub const DEFAULT_RECORD_PATH: &str = "build_config/environment.json";
pub const CONFIG_RECORD_PATH: &str = "build_config/config_environment.json";

pub const PUBSPEC_PATH: &str = "pubspec.yaml";
pub const ANDROID_BUILD_SCRIPT: &str = "android/app/build.gradle.kts";
pub const ANDROID_MANIFESTS: [&str; 3] = [
    "android/app/src/main/AndroidManifest.xml",
    "android/app/src/debug/AndroidManifest.xml",
    "android/app/src/profile/AndroidManifest.xml",
];
pub const IOS_INFO_PLIST: &str = "ios/Runner/Info.plist";
pub const IOS_ENVIRONMENT_NOTE: &str = "ios/configuration/environment.txt";

pub const RELEASE_HISTORY_PATH: &str = "logs/release_history.json";
pub const RELEASE_HISTORY_CSV_PATH: &str = "logs/release_history.csv";
pub const QA_DIR: &str = "qa";
pub const QA_CHECKLIST: [&str; 8] = [
    "App launches successfully",
    "Core functionality works",
    "UI/UX is consistent",
    "Performance is acceptable",
    "No crashes or critical bugs",
    "Firebase analytics working",
    "Push notifications working (if applicable)",
    "Regression testing completed",
];
