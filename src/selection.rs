//! Choosing the profile an invocation operates on.

use crate::error::Result;
use crate::store::ProfileStore;

/// Environment variable that overrides the persisted active profile
pub const PROFILE_OVERRIDE_ENV: &str = "PINGCLI_ACTIVE_PROFILE";

/// The explicit override for this invocation: `--profile`, then the environment
pub fn profile_override(flag: Option<String>) -> Option<String> {
    flag.filter(|name| !name.is_empty()).or_else(|| {
        std::env::var(PROFILE_OVERRIDE_ENV)
            .ok()
            .filter(|name| !name.is_empty())
    })
}

/// Name of the profile to use. A non-empty override is returned verbatim and
/// is not checked for existence; see [`resolve_target`].
pub fn resolve_active_profile(store: &ProfileStore, explicit: Option<&str>) -> String {
    match explicit {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => store.active_profile().to_string(),
    }
}

/// Resolve the target profile and check it exists; returns its stored casing
pub fn resolve_target(store: &ProfileStore, explicit: Option<&str>) -> Result<String> {
    let name = resolve_active_profile(store, explicit);
    Ok(store.require_profile(&name)?.name.clone())
}
