use anyhow::anyhow;
use serde_json::json;

use crate::auth::{Role, TokenCodec};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

/// Mints a token without touching the database, for bootstrapping the first
/// admin or for scripted tests.
pub fn handle(config: AppConfig, user_id: i32, role: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let role = Role::from_name(role).ok_or_else(|| anyhow!("Role {} does not exist. Available roles: USER, ADMIN", role))?;
    let codec = TokenCodec::from_config(&config.security);
    let token = codec.issue(user_id, role)?;

    output_success(
        output_format,
        &format!("Issued {} token for user {}", role, user_id),
        Some(json!({ "token": token, "expires_in": codec.ttl_secs() })),
    )
}
