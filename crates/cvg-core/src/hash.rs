use sha2::{Digest, Sha256};

/// Hex encoded SHA-256 digest of a program text.
pub fn program_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    format!("{:x}", digest)
}
