/// Errors raised by the router session client
///
/// The variants separate failures to reach the router at all ([`RouterError::Connect`])
/// from failures of a command the router did receive. Callers report the first
/// kind generically and pass the second kind's message through to the operator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    /// The session could not be established (unreachable host, TLS, bad login)
    #[error("Router connection failed: {0}")]
    Connect(String),

    /// The router rejected the command; carries the router's own message
    #[error("{0}")]
    Trap(String),

    /// The transport broke while a command was in flight
    #[error("Router transport error: {0}")]
    Transport(String),

    /// The router answered with a reply that could not be understood
    #[error("Unexpected router reply: {0}")]
    Decode(String),
}

impl RouterError {
    /// Whether the failure happened before any command reached the router
    pub fn is_connect(&self) -> bool {
        matches!(self, RouterError::Connect(_))
    }

    /// Message suitable for passing back to the operator verbatim
    pub fn message(&self) -> String {
        match self {
            RouterError::Trap(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for RouterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RouterError::Decode(err.to_string())
        } else {
            RouterError::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for RouterError {
    fn from(err: url::ParseError) -> Self {
        RouterError::Connect(format!("invalid router address: {}", err))
    }
}
