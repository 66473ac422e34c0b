use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Opaque key a bucket is filed under.
///
/// The limiter never inspects the contents; two identities are the same
/// client exactly when their strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ClientIdentity {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for ClientIdentity {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<IpAddr> for ClientIdentity {
    fn from(ip: IpAddr) -> Self {
        Self(ip.to_string())
    }
}

/// Keyed by IP only, so every connection from one host shares a bucket.
impl From<SocketAddr> for ClientIdentity {
    fn from(addr: SocketAddr) -> Self {
        Self::from(addr.ip())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr_drops_port() {
        let a: ClientIdentity = "10.0.0.1:5000".parse::<SocketAddr>().unwrap().into();
        let b: ClientIdentity = "10.0.0.1:6000".parse::<SocketAddr>().unwrap().into();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "10.0.0.1");
    }

    #[test]
    fn test_ipv6_identity() {
        let id: ClientIdentity = "[::1]:8080".parse::<SocketAddr>().unwrap().into();
        assert_eq!(id.to_string(), "::1");
    }

    #[test]
    fn test_opaque_string_identity() {
        assert_eq!(ClientIdentity::from("A"), ClientIdentity::new("A"));
        assert_ne!(ClientIdentity::from("A"), ClientIdentity::from("B"));
    }
}
