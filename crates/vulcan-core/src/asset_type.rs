//! Asset types and their identifier format predicates.
//!
//! The predicates here are purely syntactic. Checks that need the network
//! (a hostname must resolve, a domain must be a zone apex) live in
//! [`crate::resolver`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::VulcanError;

static AWS_ACCOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^arn:aws:iam::\d{12}:root$").expect("AWS_ACCOUNT_RE is a valid regex pattern")
});

static GCP_PROJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9-]{4,28}[a-z0-9]$").expect("GCP_PROJECT_RE is a valid regex pattern")
});

// [registry[:port]/]repository[/repository...](:tag | @sha256:digest)
static DOCKER_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[a-zA-Z0-9.-]+(?::\d+)?/)?[a-z0-9]+(?:[._-][a-z0-9]+)*(?:/[a-z0-9]+(?:[._-][a-z0-9]+)*)*(?::\w[\w.-]{0,127}|@sha256:[a-f0-9]{64})$",
    )
    .expect("DOCKER_IMAGE_RE is a valid regex pattern")
});

static SCP_GIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.-]+@[\w.-]+:[\w./-]+\.git$").expect("SCP_GIT_RE is a valid regex pattern")
});

static DNS_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$")
        .expect("DNS_LABEL_RE is a valid regex pattern")
});

/// Maximum length of a fully qualified DNS name.
const MAX_DNS_NAME_LEN: usize = 253;

/// Kind of asset a team can scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetType {
    #[serde(rename = "AWSAccount")]
    AwsAccount,
    #[serde(rename = "GCPProject")]
    GcpProject,
    DockerImage,
    GitRepository,
    #[serde(rename = "IP")]
    Ip,
    #[serde(rename = "IPRange")]
    IpRange,
    Hostname,
    DomainName,
    WebAddress,
}

impl AssetType {
    /// All known asset types.
    pub const ALL: [AssetType; 9] = [
        AssetType::AwsAccount,
        AssetType::GcpProject,
        AssetType::DockerImage,
        AssetType::GitRepository,
        AssetType::Ip,
        AssetType::IpRange,
        AssetType::Hostname,
        AssetType::DomainName,
        AssetType::WebAddress,
    ];

    /// Name used by the remote API and the local format.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::AwsAccount => "AWSAccount",
            AssetType::GcpProject => "GCPProject",
            AssetType::DockerImage => "DockerImage",
            AssetType::GitRepository => "GitRepository",
            AssetType::Ip => "IP",
            AssetType::IpRange => "IPRange",
            AssetType::Hostname => "Hostname",
            AssetType::DomainName => "DomainName",
            AssetType::WebAddress => "WebAddress",
        }
    }

    /// Whether the alias of this asset type can be looked up from the cloud
    /// provider account name.
    #[must_use]
    pub fn has_account_alias(&self) -> bool {
        matches!(self, AssetType::AwsAccount | AssetType::GcpProject)
    }

    /// Syntactic check of `identifier` against this type's format.
    #[must_use]
    pub fn matches_format(&self, identifier: &str) -> bool {
        match self {
            AssetType::AwsAccount => is_aws_arn(identifier),
            AssetType::GcpProject => GCP_PROJECT_RE.is_match(identifier),
            AssetType::DockerImage => is_docker_image(identifier),
            AssetType::GitRepository => is_git_repository(identifier),
            AssetType::Ip => is_ip(identifier),
            AssetType::IpRange => parse_cidr(identifier).is_some(),
            AssetType::Hostname => is_hostname_syntax(identifier),
            AssetType::DomainName => is_domain_syntax(identifier),
            AssetType::WebAddress => is_web_address(identifier),
        }
    }
}

impl Display for AssetType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = VulcanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                VulcanError::validation("asset_type", format!("unknown asset type '{s}'"))
            })
    }
}

/// `arn:aws:iam::<12 digits>:root`
pub fn is_aws_arn(identifier: &str) -> bool {
    AWS_ACCOUNT_RE.is_match(identifier)
}

/// A container image reference with a repository path and a tag or digest.
pub fn is_docker_image(identifier: &str) -> bool {
    identifier.contains('/') && DOCKER_IMAGE_RE.is_match(identifier)
}

/// A git remote: a URL ending in `.git` or the scp-like `user@host:path.git`.
pub fn is_git_repository(identifier: &str) -> bool {
    if SCP_GIT_RE.is_match(identifier) {
        return true;
    }
    match url::Url::parse(identifier) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https" | "ssh" | "git")
                && parsed.host_str().is_some()
                && parsed.path().ends_with(".git")
        }
        Err(_) => false,
    }
}

/// A single IPv4 or IPv6 address.
pub fn is_ip(identifier: &str) -> bool {
    identifier.parse::<IpAddr>().is_ok()
}

/// Parse `addr/prefix`, returning the address and prefix length.
pub fn parse_cidr(identifier: &str) -> Option<(IpAddr, u8)> {
    let (addr, prefix) = identifier.split_once('/')?;
    let addr: IpAddr = addr.parse().ok()?;
    let prefix: u8 = prefix.parse().ok()?;
    if prefix > host_prefix_len(&addr) {
        return None;
    }
    Some((addr, prefix))
}

/// Prefix length that makes a CIDR block a single host.
pub fn host_prefix_len(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

/// RFC 1123 host name syntax.
pub fn is_hostname_syntax(identifier: &str) -> bool {
    let name = identifier.strip_suffix('.').unwrap_or(identifier);
    if name.is_empty() || name.len() > MAX_DNS_NAME_LEN || is_ip(name) {
        return false;
    }
    let labels: Vec<&str> = name.split('.').collect();
    if labels.iter().any(|l| !DNS_LABEL_RE.is_match(l)) {
        return false;
    }
    // An all-numeric last label is never a valid TLD.
    labels
        .last()
        .is_some_and(|tld| !tld.chars().all(|c| c.is_ascii_digit()))
}

/// Host name syntax with at least two labels and an alphabetic TLD.
pub fn is_domain_syntax(identifier: &str) -> bool {
    if !is_hostname_syntax(identifier) {
        return false;
    }
    let name = identifier.strip_suffix('.').unwrap_or(identifier);
    let labels: Vec<&str> = name.split('.').collect();
    labels.len() >= 2
        && labels
            .last()
            .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}

/// An absolute `http`/`https` URL with a host.
pub fn is_web_address(identifier: &str) -> bool {
    match url::Url::parse(identifier) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
        }
        Err(_) => false,
    }
}
