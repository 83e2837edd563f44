use crate::domain::constants::{DEFAULT_ORG_PREFIX, REVERSE_DOMAIN_ROOT};
use crate::domain::models::{DerivedIdentitySet, Environment};

const ENV_SUFFIXES: [&str; 2] = [".dev", ".stg"];

/// Strip environment suffixes until none remain, so
/// `base_identity(base_identity(x)) == base_identity(x)`.
pub fn base_identity(name: &str) -> String {
    let mut base = name.trim();
    while let Some(stripped) = ENV_SUFFIXES.iter().find_map(|s| base.strip_suffix(s)) {
        base = stripped;
    }
    base.to_string()
}

pub fn package_name(base: &str, env: Environment) -> String {
    match env.package_suffix() {
        Some(suffix) => format!("{}.{}", base, suffix),
        None => base.to_string(),
    }
}

/// Dot-delimited, reverse-domain prefixed platform identifier.
///
/// With an organization the identifier must start with `<org>.`; without one
/// anything already rooted at `com.` is kept, otherwise `com.example.` is
/// prepended.
pub fn platform_id(package: &str, org: Option<&str>) -> String {
    let dotted = package.replace('_', ".");
    let (prefix, already) = match org {
        Some(o) => (o, dotted.starts_with(&format!("{}.", o))),
        None => (DEFAULT_ORG_PREFIX, dotted.starts_with(REVERSE_DOMAIN_ROOT)),
    };
    if already {
        dotted
    } else {
        format!("{}.{}", prefix, dotted)
    }
}

/// Derive every platform identifier for `base` in `env`.
///
/// `base` and `org` are not validated here; callers (see `setup`) check them.
pub fn resolve(base: &str, env: Environment, org: Option<&str>) -> DerivedIdentitySet {
    let org = org.map(str::trim).filter(|o| !o.is_empty());
    let package = package_name(base, env);
    let id = platform_id(&package, org);
    DerivedIdentitySet {
        android_application_id: id.clone(),
        ios_bundle_id: id,
        package_name: package,
    }
}
