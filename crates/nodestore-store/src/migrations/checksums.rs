//! Checksum validation for migrations
//!
//! SHA-256 of a migration's canonical declaration, used to detect a schema
//! that changed after it was applied

use sha2::{Digest, Sha256};

/// Compute SHA256 checksum of a string
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_checksum() {
        let checksum = compute_checksum("contacts(id:store_assigned,name:string)");
        assert_eq!(checksum.len(), 64);
    }

    #[test]
    fn test_checksum_tracks_declaration() {
        let a = compute_checksum("contacts(id:store_assigned,name:string)");
        let b = compute_checksum("contacts(id:store_assigned,name:string,email:string)");
        assert_eq!(a, compute_checksum("contacts(id:store_assigned,name:string)"));
        assert_ne!(a, b);
    }
}
