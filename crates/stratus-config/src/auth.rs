//! Final credential assembly: environment overlay on top of a resolved
//! cloud entry, split into token/password or access-key parameter styles.

use crate::cloud::{AuthInfo, Cloud};
use crate::env::EnvSource;
use crate::error::{ConfigError, Result};

/// Access-key credentials come from a fixed variable pair, independent of
/// the configurable prefix.
pub const ACCESS_KEY_ENV: &str = "S3_ACCESS_KEY_ID";
pub const SECRET_KEY_ENV: &str = "S3_SECRET_ACCESS_KEY";

/// Token/password-style authentication parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasswordAuth {
    pub identity_endpoint: String,
    pub token: String,
    pub username: String,
    pub user_id: String,
    pub password: String,
    pub project_id: String,
    pub project_name: String,
    pub domain_id: String,
    pub domain_name: String,
}

/// Access-key/secret-key-style authentication parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AkSkAuth {
    pub identity_endpoint: String,
    pub region: String,
    pub domain_id: String,
    pub project_id: String,
    pub project_name: String,
    pub access_key: String,
    pub secret_key: String,
}

/// The final parameters handed to the authentication collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthParameters {
    Password(PasswordAuth),
    AkSk(AkSkAuth),
}

/// Overlay environment variables onto a resolved cloud entry and produce
/// final authentication parameters.
///
/// Only fields left unset by resolution are filled from the environment.
/// The auth URL is the sole hard requirement afterwards.
pub fn assemble(cloud: &Cloud, env: &dyn EnvSource, env_prefix: &str) -> Result<AuthParameters> {
    let mut cloud = cloud.clone();
    let auth = cloud.auth.get_or_insert_with(AuthInfo::default);

    set_domain_if_needed(auth);
    overlay_environment(auth, env, env_prefix);

    if auth.auth_url.is_empty() {
        return Err(ConfigError::MissingRequiredField("auth_url"));
    }

    if !auth.access_key.is_empty() {
        return Ok(AuthParameters::AkSk(AkSkAuth {
            identity_endpoint: auth.auth_url.clone(),
            region: cloud.region_name.clone(),
            domain_id: auth.user_domain_id.clone(),
            project_id: auth.project_id.clone(),
            project_name: auth.project_name.clone(),
            access_key: auth.access_key.clone(),
            secret_key: auth.secret_key.clone(),
        }));
    }

    Ok(AuthParameters::Password(PasswordAuth {
        identity_endpoint: auth.auth_url.clone(),
        token: auth.token.clone(),
        username: auth.username.clone(),
        user_id: auth.user_id.clone(),
        password: auth.password.clone(),
        project_id: auth.project_id.clone(),
        project_name: auth.project_name.clone(),
        domain_id: auth.user_domain_id.clone(),
        domain_name: auth.user_domain_name.clone(),
    }))
}

/// Copy a generic domain id/name onto the user- and project-domain fields
/// where those are unset, then fall back to the default domain for either
/// side that still has neither an id nor a name.
fn set_domain_if_needed(auth: &mut AuthInfo) {
    if !auth.domain_id.is_empty() {
        if auth.user_domain_id.is_empty() {
            auth.user_domain_id = auth.domain_id.clone();
        }
        if auth.project_domain_id.is_empty() {
            auth.project_domain_id = auth.domain_id.clone();
        }
    }

    if !auth.domain_name.is_empty() {
        if auth.user_domain_name.is_empty() {
            auth.user_domain_name = auth.domain_name.clone();
        }
        if auth.project_domain_name.is_empty() {
            auth.project_domain_name = auth.domain_name.clone();
        }
    }

    if !auth.default_domain.is_empty() {
        if auth.user_domain_name.is_empty() && auth.user_domain_id.is_empty() {
            auth.user_domain_id = auth.default_domain.clone();
        }
        if auth.project_domain_name.is_empty() && auth.project_domain_id.is_empty() {
            auth.project_domain_id = auth.default_domain.clone();
        }
    }
}

fn overlay_environment(auth: &mut AuthInfo, env: &dyn EnvSource, prefix: &str) {
    // Fields with two accepted suffixes list the legacy name first; the
    // second write wins when both are set.
    fill(&mut auth.auth_url, env, prefix, &["AUTH_URL"]);
    fill(&mut auth.token, env, prefix, &["TOKEN", "AUTH_TOKEN"]);
    fill(&mut auth.username, env, prefix, &["USERNAME"]);
    fill(&mut auth.user_id, env, prefix, &["USER_ID"]);
    fill(&mut auth.password, env, prefix, &["PASSWORD"]);
    fill(&mut auth.project_id, env, prefix, &["TENANT_ID", "PROJECT_ID"]);
    fill(&mut auth.project_name, env, prefix, &["TENANT_NAME", "PROJECT_NAME"]);
    fill(&mut auth.domain_id, env, prefix, &["DOMAIN_ID"]);
    fill(&mut auth.domain_name, env, prefix, &["DOMAIN_NAME"]);
    fill(&mut auth.default_domain, env, prefix, &["DEFAULT_DOMAIN"]);
    fill(&mut auth.user_domain_id, env, prefix, &["USER_DOMAIN_ID"]);
    fill(&mut auth.user_domain_name, env, prefix, &["USER_DOMAIN_NAME"]);
    fill(&mut auth.project_domain_id, env, prefix, &["PROJECT_DOMAIN_ID"]);
    fill(
        &mut auth.project_domain_name,
        env,
        prefix,
        &["PROJECT_DOMAIN_NAME"],
    );
    fill(
        &mut auth.application_credential_id,
        env,
        prefix,
        &["APPLICATION_CREDENTIAL_ID"],
    );
    fill(
        &mut auth.application_credential_name,
        env,
        prefix,
        &["APPLICATION_CREDENTIAL_NAME"],
    );
    fill(
        &mut auth.application_credential_secret,
        env,
        prefix,
        &["APPLICATION_CREDENTIAL_SECRET"],
    );

    if auth.access_key.is_empty() {
        if let Some(v) = env.get(ACCESS_KEY_ENV) {
            auth.access_key = v;
        }
    }
    if auth.secret_key.is_empty() {
        if let Some(v) = env.get(SECRET_KEY_ENV) {
            auth.secret_key = v;
        }
    }
}

fn fill(field: &mut String, env: &dyn EnvSource, prefix: &str, suffixes: &[&str]) {
    if !field.is_empty() {
        return;
    }
    for suffix in suffixes {
        if let Some(value) = env.get(&format!("{prefix}{suffix}")) {
            *field = value;
        }
    }
}
