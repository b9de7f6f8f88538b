//! Access control collaborator
//!
//! The credential travels with each request; no ambient "already
//! authenticated" state is held anywhere.

/// Per-request access decision
pub trait AccessGate {
    /// Accept or reject a caller-supplied credential
    fn authorize(&self, credential: &str) -> bool;
}

/// Gate backed by a single shared secret
#[derive(Debug, Clone)]
pub struct SharedSecretGate {
    secret: String,
}

impl SharedSecretGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl AccessGate for SharedSecretGate {
    fn authorize(&self, credential: &str) -> bool {
        let a = credential.as_bytes();
        let b = self.secret.as_bytes();
        if a.len() != b.len() {
            return false;
        }
        // Full-width comparison, no early exit
        a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_matching_secret() {
        let gate = SharedSecretGate::new("timber-gold");
        assert!(gate.authorize("timber-gold"));
    }

    #[test]
    fn test_rejects_wrong_or_empty_credential() {
        let gate = SharedSecretGate::new("timber-gold");
        assert!(!gate.authorize("timber-g0ld"));
        assert!(!gate.authorize("timber-gold "));
        assert!(!gate.authorize(""));
    }
}
