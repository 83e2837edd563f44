use crate::domain::models::Environment;
use std::path::PathBuf;
use tracing::debug;

const PRODUCTION_PREFIXES: [&str; 1] = ["release/"];
const STAGING_BRANCHES: [&str; 3] = ["development", "develop", "dev"];
const STAGING_PREFIXES: [&str; 1] = ["qa/"];
const DEVELOPMENT_PREFIXES: [&str; 5] = ["feature/", "feat/", "fix/", "hotfix/", "bugfix/"];

/// Map a branch name to its environment. First matching rule wins;
/// anything unrecognised (including empty input) is `Development`.
pub fn classify(branch: &str) -> Environment {
    let b = branch.trim().to_ascii_lowercase();

    if b == "main" || PRODUCTION_PREFIXES.iter().any(|p| b.starts_with(p)) {
        return Environment::Production;
    }
    if STAGING_BRANCHES.contains(&b.as_str()) || STAGING_PREFIXES.iter().any(|p| b.starts_with(p))
    {
        return Environment::Staging;
    }
    if DEVELOPMENT_PREFIXES.iter().any(|p| b.starts_with(p)) {
        return Environment::Development;
    }
    Environment::Development
}

/// Where the current branch name comes from. Keeps process state
/// (git, env vars) out of the classifier.
pub trait BranchSource {
    fn current_branch(&self) -> Option<String>;
}

pub struct FixedBranch(pub String);

impl BranchSource for FixedBranch {
    fn current_branch(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Asks git first, then an env var, then a fixed default.
pub struct GitBranchSource {
    pub root: PathBuf,
    pub env_var: String,
    pub default_branch: String,
}

impl GitBranchSource {
    fn from_git(&self) -> Option<String> {
        let out = std::process::Command::new("git")
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .current_dir(&self.root)
            .output()
            .ok()?;
        if !out.status.success() {
            return None;
        }
        let branch = String::from_utf8_lossy(&out.stdout).trim().to_string();
        // detached checkouts report the literal "HEAD"
        if branch.is_empty() || branch == "HEAD" {
            return None;
        }
        Some(branch)
    }
}

impl BranchSource for GitBranchSource {
    fn current_branch(&self) -> Option<String> {
        if let Some(b) = self.from_git() {
            debug!(branch = %b, "branch from git");
            return Some(b);
        }
        if let Ok(b) = std::env::var(&self.env_var) {
            if !b.trim().is_empty() {
                debug!(branch = %b, var = %self.env_var, "branch from environment");
                return Some(b);
            }
        }
        debug!(branch = %self.default_branch, "branch from default");
        Some(self.default_branch.clone())
    }
}

pub fn resolve_branch(source: &dyn BranchSource, fallback: &str) -> String {
    source
        .current_branch()
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Explicit environment beats an explicit branch, which beats the source.
pub fn resolve_environment(
    explicit: Option<Environment>,
    source: &dyn BranchSource,
    fallback_branch: &str,
) -> (String, Environment) {
    let branch = resolve_branch(source, fallback_branch);
    let env = explicit.unwrap_or_else(|| classify(&branch));
    (branch, env)
}
