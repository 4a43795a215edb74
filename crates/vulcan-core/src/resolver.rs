//! Asset type resolution.
//!
//! Classifies a bare identifier into one or more `(identifier, AssetType)`
//! candidates through an ordered cascade of format predicates. Checks that
//! need DNS go through [`NameResolver`] and cloud account aliases through
//! [`AccountNameLookup`], so the cascade itself stays deterministic under
//! test.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::asset_type::{
    host_prefix_len, is_aws_arn, is_docker_image, is_domain_syntax, is_git_repository,
    is_hostname_syntax, is_ip, is_web_address, parse_cidr, AssetType,
};
use crate::error::{Result, VulcanError};

/// Second-level labels under which registrations happen one level deeper
/// (`example.co.uk`).
const REGISTRY_SECOND_LEVELS: &[&str] = &["ac", "co", "com", "edu", "gov", "net", "org"];

/// DNS checks used by the cascade.
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Whether `hostname` resolves to at least one address.
    async fn resolves(&self, hostname: &str) -> bool;

    /// Whether `name` is the apex of a registered zone.
    async fn is_zone_apex(&self, name: &str) -> bool;
}

/// Looks up the human-readable name of a cloud account.
#[async_trait]
pub trait AccountNameLookup: Send + Sync {
    async fn account_name(&self, asset_type: AssetType, identifier: &str) -> Result<String>;
}

/// [`NameResolver`] backed by the system resolver.
///
/// Zone apex detection is a heuristic: the name must resolve and sit
/// directly under a public suffix (two labels, or three when the middle
/// label is a well-known registry level such as `co.uk`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNameResolver;

#[async_trait]
impl NameResolver for SystemNameResolver {
    async fn resolves(&self, hostname: &str) -> bool {
        match tokio::net::lookup_host((hostname, 0)).await {
            Ok(mut addrs) => addrs.next().is_some(),
            Err(e) => {
                tracing::debug!(hostname = %hostname, error = %e, "DNS resolution failed");
                false
            }
        }
    }

    async fn is_zone_apex(&self, name: &str) -> bool {
        is_registrable_apex(name) && self.resolves(name).await
    }
}

fn is_registrable_apex(name: &str) -> bool {
    let name = name.strip_suffix('.').unwrap_or(name);
    let labels: Vec<&str> = name.split('.').collect();
    match labels.as_slice() {
        [_, _] => true,
        [_, second, _] => REGISTRY_SECOND_LEVELS.contains(second),
        _ => false,
    }
}

/// One classification of an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AssetCandidate {
    pub identifier: String,
    pub asset_type: AssetType,
}

impl AssetCandidate {
    pub fn new(identifier: impl Into<String>, asset_type: AssetType) -> Self {
        Self {
            identifier: identifier.into(),
            asset_type,
        }
    }
}

/// Resolves and validates asset identifiers.
#[derive(Clone)]
pub struct AssetResolver {
    names: Arc<dyn NameResolver>,
    accounts: Arc<dyn AccountNameLookup>,
}

impl AssetResolver {
    pub fn new(names: Arc<dyn NameResolver>, accounts: Arc<dyn AccountNameLookup>) -> Self {
        Self { names, accounts }
    }

    /// Classify `identifier`, returning every candidate in cascade order.
    pub async fn resolve(&self, identifier: &str) -> Result<Vec<AssetCandidate>> {
        let identifier = identifier.trim();

        if is_aws_arn(identifier) {
            return Ok(vec![AssetCandidate::new(identifier, AssetType::AwsAccount)]);
        }
        if is_docker_image(identifier) {
            return Ok(vec![AssetCandidate::new(identifier, AssetType::DockerImage)]);
        }
        if is_git_repository(identifier) {
            return Ok(vec![AssetCandidate::new(identifier, AssetType::GitRepository)]);
        }
        if is_ip(identifier) {
            return Ok(vec![AssetCandidate::new(identifier, AssetType::Ip)]);
        }
        if let Some((addr, prefix)) = parse_cidr(identifier) {
            let candidate = if prefix == host_prefix_len(&addr) {
                AssetCandidate::new(addr.to_string(), AssetType::Ip)
            } else {
                AssetCandidate::new(identifier, AssetType::IpRange)
            };
            return Ok(vec![candidate]);
        }

        // URLs are classified by their host; the original string becomes a
        // WebAddress when the host is a live hostname.
        let (host, is_url) = match url::Url::parse(identifier) {
            Ok(parsed) => match parsed.host_str() {
                Some(h) => (h.to_string(), true),
                None => (identifier.to_string(), false),
            },
            Err(_) => (identifier.to_string(), false),
        };

        let mut candidates = Vec::new();
        if is_hostname_syntax(&host) && self.names.resolves(&host).await {
            candidates.push(AssetCandidate::new(host.as_str(), AssetType::Hostname));
            if is_url && is_web_address(identifier) {
                candidates.push(AssetCandidate::new(identifier, AssetType::WebAddress));
            }
        }
        if is_domain_syntax(&host) && self.names.is_zone_apex(&host).await {
            candidates.push(AssetCandidate::new(host.as_str(), AssetType::DomainName));
        }

        if candidates.is_empty() {
            return Err(VulcanError::validation(
                identifier,
                "cannot parse asset type from identifier",
            ));
        }

        tracing::debug!(
            identifier = %identifier,
            candidates = candidates.len(),
            "Resolved asset types"
        );
        Ok(candidates)
    }

    /// Check `identifier` against the full predicate for `asset_type`,
    /// including DNS checks for hostnames and domains.
    pub async fn validate(&self, identifier: &str, asset_type: AssetType) -> Result<()> {
        let valid = asset_type.matches_format(identifier)
            && match asset_type {
                AssetType::Hostname => self.names.resolves(identifier).await,
                AssetType::DomainName => self.names.is_zone_apex(identifier).await,
                _ => true,
            };
        if valid {
            Ok(())
        } else {
            Err(VulcanError::validation(
                identifier,
                format!("not a valid {asset_type}"),
            ))
        }
    }

    /// Fill an empty alias from the account name lookup.
    ///
    /// Best effort: a failed lookup is logged and leaves the alias empty.
    pub async fn resolve_alias(&self, identifier: &str, asset_type: AssetType, alias: &str) -> String {
        if !alias.is_empty() || !asset_type.has_account_alias() {
            return alias.to_string();
        }
        match self.accounts.account_name(asset_type, identifier).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(
                    identifier = %identifier,
                    asset_type = %asset_type,
                    error = %e,
                    "Account name lookup failed, leaving alias empty"
                );
                String::new()
            }
        }
    }
}

impl std::fmt::Debug for AssetResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct StubNames {
        live: HashSet<&'static str>,
        apexes: HashSet<&'static str>,
    }

    #[async_trait]
    impl NameResolver for StubNames {
        async fn resolves(&self, hostname: &str) -> bool {
            self.live.contains(hostname)
        }

        async fn is_zone_apex(&self, name: &str) -> bool {
            self.apexes.contains(name)
        }
    }

    struct StubAccounts;

    #[async_trait]
    impl AccountNameLookup for StubAccounts {
        async fn account_name(&self, _asset_type: AssetType, identifier: &str) -> Result<String> {
            if identifier.ends_with("000000000000:root") {
                Err(VulcanError::Collaborator {
                    collaborator: "account lookup".to_string(),
                    message: "unavailable".to_string(),
                })
            } else {
                Ok("production".to_string())
            }
        }
    }

    fn resolver() -> AssetResolver {
        let names = StubNames {
            live: ["adevinta.com", "www.example.com"].into_iter().collect(),
            apexes: ["adevinta.com", "example.com"].into_iter().collect(),
        };
        AssetResolver::new(Arc::new(names), Arc::new(StubAccounts))
    }

    #[tokio::test]
    async fn test_host_cidr_becomes_ip() {
        let candidates = resolver().resolve("192.0.2.1/32").await.unwrap();
        assert_eq!(candidates, vec![AssetCandidate::new("192.0.2.1", AssetType::Ip)]);
    }

    #[tokio::test]
    async fn test_network_cidr_is_range() {
        let candidates = resolver().resolve("192.0.2.0/24").await.unwrap();
        assert_eq!(
            candidates,
            vec![AssetCandidate::new("192.0.2.0/24", AssetType::IpRange)]
        );
    }

    #[tokio::test]
    async fn test_apex_domain_yields_hostname_and_domain() {
        let candidates = resolver().resolve("adevinta.com").await.unwrap();
        assert_eq!(
            candidates,
            vec![
                AssetCandidate::new("adevinta.com", AssetType::Hostname),
                AssetCandidate::new("adevinta.com", AssetType::DomainName),
            ]
        );
    }

    #[tokio::test]
    async fn test_url_yields_hostname_and_web_address() {
        let candidates = resolver().resolve("https://www.example.com").await.unwrap();
        assert_eq!(
            candidates,
            vec![
                AssetCandidate::new("www.example.com", AssetType::Hostname),
                AssetCandidate::new("https://www.example.com", AssetType::WebAddress),
            ]
        );
    }

    #[tokio::test]
    async fn test_unresolvable_name_fails() {
        let err = resolver()
            .resolve("thisprobablydoesnotexist.invalidtld")
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("cannot parse asset type"));
    }

    #[tokio::test]
    async fn test_cascade_stops_at_first_structural_match() {
        let r = resolver();
        assert_eq!(
            r.resolve("arn:aws:iam::123456789012:root").await.unwrap()[0].asset_type,
            AssetType::AwsAccount
        );
        assert_eq!(
            r.resolve("registry.example.com/app:1.0").await.unwrap()[0].asset_type,
            AssetType::DockerImage
        );
        assert_eq!(
            r.resolve("git@github.com:org/repo.git").await.unwrap()[0].asset_type,
            AssetType::GitRepository
        );
        assert_eq!(r.resolve("2001:db8::1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_validate_uses_dns_for_hostnames() {
        let r = resolver();
        assert!(r.validate("www.example.com", AssetType::Hostname).await.is_ok());
        assert!(r.validate("down.example.com", AssetType::Hostname).await.is_err());
        assert!(r.validate("example.com", AssetType::DomainName).await.is_ok());
        assert!(r.validate("10.0.0.0/8", AssetType::Ip).await.is_err());
    }

    #[tokio::test]
    async fn test_alias_lookup_is_best_effort() {
        let r = resolver();
        let alias = r
            .resolve_alias("arn:aws:iam::123456789012:root", AssetType::AwsAccount, "")
            .await;
        assert_eq!(alias, "production");

        let alias = r
            .resolve_alias("arn:aws:iam::000000000000:root", AssetType::AwsAccount, "")
            .await;
        assert_eq!(alias, "");

        let alias = r
            .resolve_alias("arn:aws:iam::123456789012:root", AssetType::AwsAccount, "kept")
            .await;
        assert_eq!(alias, "kept");

        let alias = r.resolve_alias("10.0.0.1", AssetType::Ip, "").await;
        assert_eq!(alias, "");
    }

    #[test]
    fn test_registrable_apex_heuristic() {
        assert!(is_registrable_apex("example.com"));
        assert!(is_registrable_apex("example.co.uk"));
        assert!(!is_registrable_apex("www.example.com"));
        assert!(!is_registrable_apex("localhost"));
    }
}
