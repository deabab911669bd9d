//! TLS options: renegotiation policy and the settings a client was built with

use std::fmt;
use std::str::FromStr;

use oras_core::error::OrasError;

/// Whether a TLS client lets the server renegotiate a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenegotiationPolicy {
    /// Renegotiation is refused
    #[default]
    Never,
    /// The server may renegotiate once per connection
    OnceAsClient,
    /// The server may renegotiate repeatedly
    FreelyAsClient,
}

impl RenegotiationPolicy {
    pub const ALL: [RenegotiationPolicy; 3] = [
        RenegotiationPolicy::Never,
        RenegotiationPolicy::OnceAsClient,
        RenegotiationPolicy::FreelyAsClient,
    ];

    /// Symbolic option name
    pub fn as_str(&self) -> &'static str {
        match self {
            RenegotiationPolicy::Never => "RenegotiateNever",
            RenegotiationPolicy::OnceAsClient => "RenegotiateOnceAsClient",
            RenegotiationPolicy::FreelyAsClient => "RenegotiateFreelyAsClient",
        }
    }

    /// True for the policies that let the server start a renegotiation
    pub fn allows_renegotiation(&self) -> bool {
        !matches!(self, RenegotiationPolicy::Never)
    }

    /// Resolve a symbolic name.
    ///
    /// Unknown names, the empty string included, return `Never` together with
    /// an `InvalidOption` error, so callers that only warn still get a usable
    /// policy.
    pub fn resolve(name: &str) -> (Self, Option<OrasError>) {
        match name.parse() {
            Ok(policy) => (policy, None),
            Err(err) => (Self::default(), Some(err)),
        }
    }
}

impl FromStr for RenegotiationPolicy {
    type Err = OrasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str() == s)
            .ok_or_else(|| OrasError::InvalidOption {
                option: "TLS renegotiation strategy".to_string(),
                value: s.to_string(),
                expected: Self::ALL
                    .iter()
                    .map(|policy| policy.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl fmt::Display for RenegotiationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TLS settings a client was built with.
///
/// `renegotiation` is the requested policy, `None` when the client uses the
/// backend default. Clients run on rustls, which never renegotiates, so the
/// policy in force is always [`RenegotiationPolicy::Never`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TlsSettings {
    pub insecure_skip_verify: bool,
    pub renegotiation: Option<RenegotiationPolicy>,
}

impl TlsSettings {
    /// Policy the transport actually applies
    pub fn effective_renegotiation(&self) -> RenegotiationPolicy {
        RenegotiationPolicy::Never
    }

    /// True when the requested policy is looser than what the transport applies
    pub fn renegotiation_downgraded(&self) -> bool {
        self.renegotiation
            .is_some_and(|policy| policy != self.effective_renegotiation())
    }
}
