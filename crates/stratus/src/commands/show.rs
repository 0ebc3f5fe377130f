use super::{mask, resolve};
use colored::Colorize;
use stratus_config::{normalize_endpoint_type, AuthInfo};

pub fn run(cloud: Option<String>) -> anyhow::Result<()> {
    let resolved = resolve(cloud)?;

    println!("{}", "Resolved cloud configuration".bold());
    print_field("region_name", &resolved.region_name);
    print_field(
        "endpoint_type",
        normalize_endpoint_type(&resolved.endpoint_type),
    );
    if let Some(verify) = resolved.verify {
        println!("  {:<28} {}", "verify".cyan(), verify);
    }
    if !resolved.volume_api_version.is_empty() {
        print_field("volume_api_version", &resolved.volume_api_version);
    }

    let auth = resolved.auth.unwrap_or_else(AuthInfo::default);
    println!("{}", "Auth".bold());
    print_field("auth_url", &auth.auth_url);
    print_field("username", &auth.username);
    print_field("user_id", &auth.user_id);
    print_field("password", mask(&auth.password));
    print_field("token", mask(&auth.token));
    print_field("project_id", &auth.project_id);
    print_field("project_name", &auth.project_name);
    print_field("user_domain_id", &auth.user_domain_id);
    print_field("user_domain_name", &auth.user_domain_name);
    print_field("project_domain_id", &auth.project_domain_id);
    print_field("project_domain_name", &auth.project_domain_name);
    print_field(
        "application_credential_id",
        &auth.application_credential_id,
    );
    print_field(
        "application_credential_secret",
        mask(&auth.application_credential_secret),
    );
    print_field("access_key", &auth.access_key);
    print_field("secret_key", mask(&auth.secret_key));

    Ok(())
}

fn print_field(name: &str, value: &str) {
    let shown = if value.is_empty() { "<unset>" } else { value };
    println!("  {:<28} {}", name.cyan(), shown);
}
