use crate::config::UserSource;
use anyhow::Context;
use promo_smith::{UserId, validate_user_entries, validate_user_list};

/// Reads, normalizes, deduplicates and validates the user list.
pub async fn load_users(source: &UserSource) -> anyhow::Result<Vec<UserId>> {
    let users = match source {
        UserSource::Inline(raw) => validate_user_list(raw)?,
        UserSource::File(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read users from {}", path.display()))?;
            validate_user_entries(first_column(&raw))?
        }
    };

    #[cfg(feature = "tracing")]
    tracing::info!(users = users.len(), "user list validated");
    Ok(users)
}

/// First comma separated field of every non-blank line, unquoted.
fn first_column(raw: &str) -> impl Iterator<Item = &str> {
    raw.lines()
        .filter_map(|line| line.split(',').next())
        .map(|field| field.trim().trim_matches('"').trim())
        .filter(|field| !field.is_empty())
}
