pub mod show;
pub mod validate;

use stratus_config::{Cloud, CloudConfig, ProcessEnv};

/// Resolve one cloud entry from the standard file trio plus environment.
pub fn resolve(cloud: Option<String>) -> anyhow::Result<Cloud> {
    let mut config = CloudConfig::new();
    if let Some(name) = cloud {
        config = config.with_cloud(name);
    }
    Ok(config.resolve(&ProcessEnv)?)
}

/// Replace a secret with a fixed marker, leaving unset fields visible.
pub fn mask(value: &str) -> &str {
    if value.is_empty() {
        "<unset>"
    } else {
        "********"
    }
}
