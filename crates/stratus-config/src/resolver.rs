//! Layered resolution of a cloud entry.
//!
//! Three sources are consulted, lowest to highest precedence: the public
//! profile file (shared provider defaults), the primary clouds file, and the
//! secure file (sensitive overrides). Field-level precedence within a layer
//! merge follows the rules in [`crate::merge`].

use crate::cloud::{Cloud, Clouds, PublicClouds};
use crate::env::EnvSource;
use crate::error::{ConfigError, Result};
use crate::locate::{
    CLOUDS_FILENAME, CONFIG_FILE_ENV, PUBLIC_CLOUDS_FILENAME, SECURE_FILENAME, SECURE_FILE_ENV,
    VENDOR_FILE_ENV, find_config_file,
};
use crate::merge::merge_clouds;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_ENV_PREFIX: &str = "OS_";

/// Selection hints and source overrides for one resolution call.
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Explicit cloud entry name. Takes precedence over `<PREFIX>CLOUD`.
    pub cloud_name: Option<String>,

    /// Prefix for credential environment variables, `OS_` by default.
    pub env_prefix: String,

    /// Explicit clouds.yaml path, bypassing the search path.
    pub config_file: Option<PathBuf>,

    /// Explicit clouds-public.yaml path.
    pub vendor_file: Option<PathBuf>,

    /// Explicit secure.yaml path.
    pub secure_file: Option<PathBuf>,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            cloud_name: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            config_file: None,
            vendor_file: None,
            secure_file: None,
        }
    }
}

impl CloudConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cloud(mut self, name: impl Into<String>) -> Self {
        self.cloud_name = Some(name.into());
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Resolve the selected cloud entry, or fail with
    /// [`ConfigError::CloudNotFound`] when nothing could be determined.
    pub fn resolve(&self, env: &dyn EnvSource) -> Result<Cloud> {
        match self.try_resolve(env)? {
            Some(cloud) => Ok(cloud),
            None => Err(ConfigError::CloudNotFound(
                self.requested_name(env).unwrap_or_default(),
            )),
        }
    }

    /// Resolve the selected cloud entry, treating the total absence of all
    /// sources as `Ok(None)` rather than an error. A named lookup that fails
    /// against a non-empty source still errors.
    pub fn try_resolve(&self, env: &dyn EnvSource) -> Result<Option<Cloud>> {
        let clouds: HashMap<String, Cloud> = self.load_primary(env)?;
        let cloud_name = self.requested_name(env);

        let mut cloud: Option<Cloud> = None;
        if let Some(name) = &cloud_name {
            match clouds.get(name) {
                Some(entry) => cloud = Some(entry.clone()),
                None if !clouds.is_empty() => {
                    return Err(ConfigError::CloudNotFound(name.clone()));
                }
                None => {}
            }
        } else if clouds.len() == 1 {
            // Single-entry convenience: no name needed when there is no choice.
            cloud = clouds.values().next().cloned();
        }

        // A profile points into the public clouds file. Profile values only
        // fill gaps: the primary entry stays the override side of the merge.
        if let Some(entry) = &cloud {
            let profile = if entry.profile.is_empty() {
                entry.cloud.clone()
            } else {
                entry.profile.clone()
            };
            if !profile.is_empty() {
                let public = self.load_public(env)?;
                match public.get(&profile) {
                    Some(profile_entry) => {
                        cloud = Some(merge_clouds(entry, profile_entry)?);
                    }
                    None => {
                        warn!(
                            profile,
                            "profile does not exist in {PUBLIC_CLOUDS_FILENAME}, continuing without it"
                        );
                    }
                }
            }
        }

        // Secure values win over both the primary and the public layer.
        let secure = self.load_secure(env)?;
        if !secure.is_empty() {
            if cloud.is_none() && cloud_name.is_none() && secure.len() == 1 {
                // Mirror the primary source's single-entry convenience.
                cloud = secure.values().next().cloned();
            } else if let Some(name) = &cloud_name {
                match secure.get(name) {
                    Some(secure_entry) => {
                        cloud = Some(match &cloud {
                            Some(resolved) => merge_clouds(secure_entry, resolved)?,
                            None => secure_entry.clone(),
                        });
                    }
                    None if cloud.is_none() => {
                        return Err(ConfigError::CloudNotFound(name.clone()));
                    }
                    None => {}
                }
            }
        }

        let Some(mut cloud) = cloud else {
            return Ok(None);
        };

        apply_defaults(&mut cloud);
        Ok(Some(cloud))
    }

    fn requested_name(&self, env: &dyn EnvSource) -> Option<String> {
        self.cloud_name
            .clone()
            .or_else(|| env.get(&format!("{}CLOUD", self.env_prefix)))
    }

    fn load_primary(&self, env: &dyn EnvSource) -> Result<HashMap<String, Cloud>> {
        let path = self
            .config_file
            .clone()
            .or_else(|| find_config_file(CLOUDS_FILENAME, CONFIG_FILE_ENV, env));
        match path {
            // A source that is simply absent is an empty layer; only read or
            // parse failures of a present file propagate.
            Some(path) if path.exists() => Ok(load_yaml::<Clouds>(&path)?.clouds),
            _ => Ok(HashMap::new()),
        }
    }

    fn load_public(&self, env: &dyn EnvSource) -> Result<HashMap<String, Cloud>> {
        let path = self
            .vendor_file
            .clone()
            .or_else(|| find_config_file(PUBLIC_CLOUDS_FILENAME, VENDOR_FILE_ENV, env));
        match path {
            Some(path) if path.exists() => Ok(load_yaml::<PublicClouds>(&path)?.clouds),
            _ => Ok(HashMap::new()),
        }
    }

    fn load_secure(&self, env: &dyn EnvSource) -> Result<HashMap<String, Cloud>> {
        let path = self
            .secure_file
            .clone()
            .or_else(|| find_config_file(SECURE_FILENAME, SECURE_FILE_ENV, env));
        match path {
            Some(path) if path.exists() => Ok(load_yaml::<Clouds>(&path)?.clouds),
            _ => Ok(HashMap::new()),
        }
    }
}

fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_defaults(cloud: &mut Cloud) {
    if cloud.verify.is_none() {
        cloud.verify = Some(true);
    }

    // Both interface and endpoint_type are valid settings, but endpoint_type
    // is the sole field used downstream.
    if !cloud.interface.is_empty() && cloud.endpoint_type.is_empty() {
        cloud.endpoint_type = cloud.interface.clone();
    }
    cloud.interface.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::StaticEnv;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn config_in(dir: &TempDir) -> CloudConfig {
        CloudConfig {
            config_file: Some(dir.path().join(CLOUDS_FILENAME)),
            vendor_file: Some(dir.path().join(PUBLIC_CLOUDS_FILENAME)),
            secure_file: Some(dir.path().join(SECURE_FILENAME)),
            ..CloudConfig::default()
        }
    }

    const PRIMARY: &str = r#"
clouds:
  test:
    auth:
      auth_url: http://url-from-clouds.yaml
      username: otc
      password: "Qwerty123!"
      project_name: eu-de
"#;

    #[test]
    fn single_entry_needs_no_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CLOUDS_FILENAME, PRIMARY);

        let cloud = config_in(&dir).resolve(&StaticEnv::new()).unwrap();
        assert_eq!(cloud.auth.unwrap().username, "otc");
        assert_eq!(cloud.verify, Some(true));
    }

    #[test]
    fn env_variable_selects_the_cloud() {
        let dir = tempfile::tempdir().unwrap();
        let two_clouds = format!("{PRIMARY}  other:\n    auth:\n      auth_url: http://other\n");
        write(dir.path(), CLOUDS_FILENAME, &two_clouds);

        let env = StaticEnv::new().set("OS_CLOUD", "other");
        let cloud = config_in(&dir).resolve(&env).unwrap();
        assert_eq!(cloud.auth.unwrap().auth_url, "http://other");
    }

    #[test]
    fn explicit_name_beats_env_variable() {
        let dir = tempfile::tempdir().unwrap();
        let two_clouds = format!("{PRIMARY}  other:\n    auth:\n      auth_url: http://other\n");
        write(dir.path(), CLOUDS_FILENAME, &two_clouds);

        let env = StaticEnv::new().set("OS_CLOUD", "other");
        let cloud = config_in(&dir).with_cloud("test").resolve(&env).unwrap();
        assert_eq!(cloud.auth.unwrap().auth_url, "http://url-from-clouds.yaml");
    }

    #[test]
    fn named_entry_missing_from_populated_source_errors() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CLOUDS_FILENAME, PRIMARY);

        let err = config_in(&dir)
            .with_cloud("absent")
            .resolve(&StaticEnv::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::CloudNotFound(name) if name == "absent"));
    }

    #[test]
    fn missing_everything_with_a_name_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = config_in(&dir)
            .with_cloud("test")
            .resolve(&StaticEnv::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::CloudNotFound(_)));
    }

    #[test]
    fn missing_everything_without_a_name_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = config_in(&dir).resolve(&StaticEnv::new()).unwrap_err();
        assert!(matches!(err, ConfigError::CloudNotFound(_)));
    }

    #[test]
    fn try_resolve_treats_total_absence_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = config_in(&dir)
            .with_cloud("test-me")
            .try_resolve(&StaticEnv::new())
            .unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn profile_fills_gaps_but_never_overrides() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            CLOUDS_FILENAME,
            r#"
clouds:
  test:
    profile: otc
    auth:
      username: otc
      password: "Qwerty123!"
"#,
        );
        write(
            dir.path(),
            PUBLIC_CLOUDS_FILENAME,
            r#"
public-clouds:
  otc:
    auth:
      auth_url: http://url-from-clouds-public.yaml
      username: from-profile
"#,
        );

        let cloud = config_in(&dir).with_cloud("test").resolve(&StaticEnv::new()).unwrap();
        let auth = cloud.auth.unwrap();
        assert_eq!(auth.auth_url, "http://url-from-clouds-public.yaml");
        assert_eq!(auth.username, "otc");
        assert_eq!(auth.password, "Qwerty123!");
    }

    #[test]
    fn missing_profile_is_a_warning_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            CLOUDS_FILENAME,
            "clouds:\n  test:\n    profile: nope\n    auth:\n      auth_url: http://primary\n",
        );

        let cloud = config_in(&dir).with_cloud("test").resolve(&StaticEnv::new()).unwrap();
        assert_eq!(cloud.auth.unwrap().auth_url, "http://primary");
    }

    #[test]
    fn secure_values_win_over_primary() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CLOUDS_FILENAME, PRIMARY);
        write(
            dir.path(),
            SECURE_FILENAME,
            "clouds:\n  test:\n    auth:\n      password: \"SecuredPa$$w0rd1@\"\n",
        );

        let cloud = config_in(&dir).with_cloud("test").resolve(&StaticEnv::new()).unwrap();
        let auth = cloud.auth.unwrap();
        assert_eq!(auth.password, "SecuredPa$$w0rd1@");
        assert_eq!(auth.auth_url, "http://url-from-clouds.yaml");
    }

    #[test]
    fn single_secure_entry_is_a_last_resort() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            SECURE_FILENAME,
            "clouds:\n  fallback:\n    auth:\n      auth_url: http://secure-only\n",
        );

        let cloud = config_in(&dir).resolve(&StaticEnv::new()).unwrap();
        assert_eq!(cloud.auth.unwrap().auth_url, "http://secure-only");
    }

    #[test]
    fn interface_is_normalized_into_endpoint_type() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            CLOUDS_FILENAME,
            "clouds:\n  test:\n    interface: internal\n    auth:\n      auth_url: http://x\n",
        );

        let cloud = config_in(&dir).resolve(&StaticEnv::new()).unwrap();
        assert_eq!(cloud.endpoint_type, "internal");
        assert!(cloud.interface.is_empty());
    }

    #[test]
    fn endpoint_type_wins_over_interface() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            CLOUDS_FILENAME,
            "clouds:\n  test:\n    interface: internal\n    endpoint_type: admin\n    auth:\n      auth_url: http://x\n",
        );

        let cloud = config_in(&dir).resolve(&StaticEnv::new()).unwrap();
        assert_eq!(cloud.endpoint_type, "admin");
        assert!(cloud.interface.is_empty());
    }

    #[test]
    fn unparsable_primary_source_errors() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CLOUDS_FILENAME, "clouds: [not, a, mapping\n");

        let err = config_in(&dir).resolve(&StaticEnv::new()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
