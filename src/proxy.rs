use std::{fmt, str::FromStr, time::Duration};

use reqwest::{Client, Proxy};

use crate::errors::{Error, Result};

const LABEL_MAX_CHARS: usize = 20;

#[derive(Clone, PartialEq, Eq)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ProxyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Parsed `scheme://[user:password@]host:port`.
///
/// The scheme is stored lower-cased but is not checked here; [`HttpTransport::new`]
/// rejects anything it cannot tunnel through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyDescriptor {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub auth: Option<ProxyAuth>,
}

impl ProxyDescriptor {
    pub fn parse(raw: &str) -> Result<Self> {
        let input = raw.trim();
        let invalid = |reason: &str| Error::Parse(format!("invalid proxy `{input}`: {reason}"));

        let (scheme, rest) = input
            .split_once("://")
            .ok_or_else(|| invalid("missing `://` separator"))?;

        let (credentials, host_port) = match rest.rsplit_once('@') {
            Some((credentials, host_port)) => (Some(credentials), host_port),
            None => (None, rest),
        };

        // Everything after the first `:` must be the port, so trailing segments
        // and bracketed IPv6 hosts are rejected
        let (host, port) = host_port
            .split_once(':')
            .ok_or_else(|| invalid("missing port"))?;
        if host.is_empty() {
            return Err(invalid("missing host"));
        }
        let port = port.parse::<u16>().map_err(|_| invalid("bad port"))?;

        // Credentials without a `:` or with an empty side are dropped, not rejected
        let auth = credentials
            .and_then(|c| c.split_once(':'))
            .filter(|(username, password)| !username.is_empty() && !password.is_empty())
            .map(|(username, password)| ProxyAuth {
                username: username.to_string(),
                password: password.to_string(),
            });

        Ok(Self {
            scheme: scheme.to_lowercase(),
            host: host.to_string(),
            port,
            auth,
        })
    }

    pub fn to_url(&self) -> String {
        match &self.auth {
            Some(auth) => format!(
                "{}://{}:{}@{}:{}",
                self.scheme, auth.username, auth.password, self.host, self.port
            ),
            None => format!("{}://{}:{}", self.scheme, self.host, self.port),
        }
    }

    /// Credential-free label for the account table.
    pub fn masked_label(&self) -> String {
        let label: String = format!("{}://{}:{}", self.scheme, self.host, self.port)
            .chars()
            .take(LABEL_MAX_CHARS)
            .collect();
        format!("{label}...")
    }
}

impl FromStr for ProxyDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Direct,
    Socks,
    Http,
}

/// Outbound client bound to one proxy descriptor, or to none.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    kind: TransportKind,
    client: Client,
}

impl HttpTransport {
    pub fn new(proxy: Option<&ProxyDescriptor>, timeout: Duration) -> Result<Self> {
        let builder = Client::builder().timeout(timeout);

        let Some(descriptor) = proxy else {
            return Ok(Self {
                kind: TransportKind::Direct,
                client: builder.no_proxy().build()?,
            });
        };

        let kind = match descriptor.scheme.as_str() {
            "socks4" | "socks5" => TransportKind::Socks,
            "http" | "https" => TransportKind::Http,
            other => return Err(Error::UnsupportedProxyType(other.to_string())),
        };

        let client = builder.proxy(Proxy::all(descriptor.to_url())?).build()?;

        Ok(Self { kind, client })
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
