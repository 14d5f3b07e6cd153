use argon2::{password_hash::Output, Algorithm, Argon2, Params, Version};
use rand::{rngs::OsRng, RngCore};
use serde::Deserialize;
use tracing::error;

const SALT_LEN: usize = 16;

/// Argon2id cost settings. Stored hashes do not record them, so changing
/// them invalidates every existing password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PasswordParams {
    pub time_cost: u32,
    pub memory_kib: u32,
    pub parallelism: u32,
    pub output_len: usize,
}

impl Default for PasswordParams {
    fn default() -> Self {
        Self {
            time_cost: 1,
            memory_kib: 64 * 1024,
            parallelism: 4,
            output_len: 32,
        }
    }
}

impl PasswordParams {
    fn hasher(&self) -> anyhow::Result<Argon2<'static>> {
        let params = Params::new(
            self.memory_kib,
            self.time_cost,
            self.parallelism,
            Some(self.output_len),
        )
        .map_err(|e| anyhow::anyhow!("argon2 params: {e}"))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn derive(&self, plain: &str, salt: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut out = vec![0u8; self.output_len];
        self.hasher()?
            .hash_password_into(plain.as_bytes(), salt, &mut out)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password_into error");
                anyhow::anyhow!(e.to_string())
            })?;
        Ok(out)
    }
}

/// Returns `hex(salt):hex(hash)` with a fresh random salt.
pub fn hash_password(plain: &str, params: &PasswordParams) -> anyhow::Result<String> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let hash = params.derive(plain, &salt)?;
    Ok(format!("{}:{}", hex::encode(salt), hex::encode(hash)))
}

/// Malformed stored values verify as `false`.
pub fn verify_password(plain: &str, stored: &str, params: &PasswordParams) -> bool {
    let mut parts = stored.split(':');
    let (Some(salt_hex), Some(hash_hex), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(hash_hex)) else {
        return false;
    };
    if salt.is_empty() || expected.len() != params.output_len {
        return false;
    }
    let Ok(candidate) = params.derive(plain, &salt) else {
        return false;
    };
    // Output's PartialEq is constant-time.
    match (Output::new(&expected), Output::new(&candidate)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
