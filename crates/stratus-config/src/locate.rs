//! Search paths for the three configuration sources.

use crate::env::EnvSource;
use std::path::PathBuf;

pub const CLOUDS_FILENAME: &str = "clouds.yaml";
pub const PUBLIC_CLOUDS_FILENAME: &str = "clouds-public.yaml";
pub const SECURE_FILENAME: &str = "secure.yaml";

/// Explicit path overrides, one per source.
pub const CONFIG_FILE_ENV: &str = "OS_CLIENT_CONFIG_FILE";
pub const VENDOR_FILE_ENV: &str = "OS_CLIENT_VENDOR_FILE";
pub const SECURE_FILE_ENV: &str = "OS_CLIENT_SECURE_FILE";

const SITE_CONFIG_DIR: &str = "/etc/openstack";

/// Locate one configuration source, first match wins:
///
/// 1. the explicit path from `env_var`
/// 2. the current working directory
/// 3. the unix user config directory (`~/.config/openstack`)
/// 4. the unix site config directory (`/etc/openstack`)
pub fn find_config_file(file_name: &str, env_var: &str, env: &dyn EnvSource) -> Option<PathBuf> {
    if let Some(explicit) = env.get(env_var) {
        let path = PathBuf::from(explicit);
        if path.exists() {
            return Some(path);
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(file_name);
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("openstack").join(file_name);
        if path.exists() {
            return Some(path);
        }
    }

    let path = PathBuf::from(SITE_CONFIG_DIR).join(file_name);
    if path.exists() {
        return Some(path);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::StaticEnv;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom-clouds.yaml");
        fs::write(&path, "clouds: {}\n").unwrap();

        let env = StaticEnv::new().set(CONFIG_FILE_ENV, path.to_str().unwrap());
        let found = find_config_file(CLOUDS_FILENAME, CONFIG_FILE_ENV, &env);
        assert_eq!(found, Some(path));
    }

    #[test]
    fn missing_explicit_path_is_skipped() {
        let env = StaticEnv::new().set(CONFIG_FILE_ENV, "/nonexistent/clouds.yaml");
        // Falls through to the remaining search legs; with a filename that
        // exists nowhere, the search comes up empty.
        let found = find_config_file("definitely-not-a-real-file.yaml", CONFIG_FILE_ENV, &env);
        assert_eq!(found, None);
    }

    #[test]
    #[serial]
    fn current_directory_is_searched() {
        let dir = tempfile::tempdir().unwrap();
        let original = std::env::current_dir().unwrap();
        fs::write(dir.path().join(CLOUDS_FILENAME), "clouds: {}\n").unwrap();

        std::env::set_current_dir(&dir).unwrap();
        let found = find_config_file(CLOUDS_FILENAME, CONFIG_FILE_ENV, &StaticEnv::new());
        std::env::set_current_dir(original).unwrap();

        assert!(found.is_some_and(|p| p.ends_with(CLOUDS_FILENAME)));
    }
}
