use folio_core::feed::PAGE_SIZE;

pub const DEFAULT_HOST: &str = "https://api.github.com";

pub fn host_or_default(host: Option<&str>) -> String {
    host.unwrap_or(DEFAULT_HOST).trim_end_matches('/').to_string()
}

/// GitHub logins are ASCII alphanumerics and single inner hyphens.
pub fn parse_identity(identity: &str) -> anyhow::Result<&str> {
    let identity = identity.trim();
    if identity.is_empty() {
        anyhow::bail!("github identity must not be empty");
    }
    let valid = identity
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !identity.starts_with('-')
        && !identity.ends_with('-')
        && !identity.contains("--");
    if !valid {
        anyhow::bail!("invalid github identity: {identity:?}");
    }
    Ok(identity)
}

pub fn repos_url(host: &str, identity: &str) -> String {
    format!("{host}/users/{identity}/repos?per_page={PAGE_SIZE}&sort=updated")
}
