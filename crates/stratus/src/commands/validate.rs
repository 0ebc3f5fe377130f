use super::resolve;
use colored::Colorize;
use stratus_config::{assemble, AuthParameters, ProcessEnv, DEFAULT_ENV_PREFIX};

pub fn run(cloud: Option<String>) -> anyhow::Result<()> {
    let resolved = resolve(cloud)?;
    let params = assemble(&resolved, &ProcessEnv, DEFAULT_ENV_PREFIX)?;

    match &params {
        AuthParameters::Password(auth) => {
            println!("{} password-style credentials", "✓".green());
            if auth.password.is_empty() && auth.token.is_empty() {
                println!(
                    "{} neither a password nor a token is set; authentication will be interactive or fail",
                    "!".yellow()
                );
            }
            if auth.username.is_empty() && auth.user_id.is_empty() && auth.token.is_empty() {
                anyhow::bail!("no username, user id, or token resolved");
            }
        }
        AuthParameters::AkSk(auth) => {
            println!("{} access-key credentials", "✓".green());
            if auth.secret_key.is_empty() {
                anyhow::bail!("access key is set but the secret key is missing");
            }
        }
    }

    println!("{} configuration is usable", "✓".green());
    Ok(())
}
