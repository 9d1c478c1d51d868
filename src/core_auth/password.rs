use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

pub fn is_bcrypt_hash(stored: &str) -> bool {
    stored.starts_with("$2")
}

/// Checks a supplied password against the stored secret.
///
/// Bcrypt hashes are verified with `bcrypt::verify`; anything else is a
/// legacy plaintext entry and compared byte for byte.
pub fn verify_password(supplied: &str, stored: &str) -> bool {
    if is_bcrypt_hash(stored) {
        return verify(supplied, stored).unwrap_or(false);
    }
    constant_time_eq(supplied.as_bytes(), stored.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
