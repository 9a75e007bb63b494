//! The fixed upstream origin.
//!
//! # Responsibilities
//! - Parse the configured base URL once at startup
//! - Expose scheme and authority for request retargeting
//! - Reject URLs the plain-HTTP transport cannot reach

use std::fmt;
use std::str::FromStr;

use axum::http::uri::{Authority, Scheme};
use url::Url;

/// Error produced when the upstream URL is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid URL: {0}")]
    Invalid(#[from] url::ParseError),
    #[error("unsupported scheme `{0}`, only http is supported")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
    #[error("invalid authority `{0}`")]
    InvalidAuthority(String),
}

/// Scheme and authority of the origin every request is sent to.
///
/// Built once and shared read-only by every request handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    scheme: Scheme,
    authority: Authority,
}

impl UpstreamTarget {
    /// Parse a base URL such as `http://127.0.0.1:55000/`.
    ///
    /// Any path, query or fragment on the URL is ignored.
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let url = Url::parse(raw)?;

        if url.scheme() != "http" {
            return Err(TargetError::UnsupportedScheme(url.scheme().to_string()));
        }

        let host = url.host_str().ok_or(TargetError::MissingHost)?;
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let authority = Authority::from_str(&authority)
            .map_err(|_| TargetError::InvalidAuthority(authority))?;

        Ok(Self {
            scheme: Scheme::HTTP,
            authority,
        })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Host (with port, if any) as sent in the `Host` header.
    pub fn host(&self) -> &str {
        self.authority.as_str()
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}
