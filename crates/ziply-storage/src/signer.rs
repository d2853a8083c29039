//! HMAC-SHA256 signatures for local blob URLs.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use ziply_core::AppError;
use ziply_core::result::AppResult;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies `(method, key, expires, extra)` tuples.
///
/// `extra` binds request details into the signature: the download filename
/// for `GET`, the declared content type for `PUT`.
#[derive(Clone)]
pub struct UrlSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner").finish_non_exhaustive()
    }
}

impl UrlSigner {
    /// Create a signer with the given secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self, method: &str, key: &str, expires: i64, extra: &str) -> AppResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::internal(format!("Invalid signing key: {e}")))?;
        mac.update(method.as_bytes());
        mac.update(b"\n");
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        mac.update(b"\n");
        mac.update(extra.as_bytes());
        Ok(mac)
    }

    /// Hex-encoded signature.
    pub fn sign(&self, method: &str, key: &str, expires: i64, extra: &str) -> AppResult<String> {
        let tag = self.mac(method, key, expires, extra)?.finalize().into_bytes();
        Ok(hex::encode(tag))
    }

    /// Check a signature and expiry. Comparison is constant-time.
    pub fn verify(
        &self,
        method: &str,
        key: &str,
        expires: i64,
        extra: &str,
        signature: &str,
        now_unix: i64,
    ) -> AppResult<()> {
        if now_unix > expires {
            return Err(AppError::forbidden("Signed URL has expired"));
        }
        let provided =
            hex::decode(signature).map_err(|_| AppError::forbidden("Malformed signature"))?;
        self.mac(method, key, expires, extra)?
            .verify_slice(&provided)
            .map_err(|_| AppError::forbidden("Signature mismatch"))
    }
}
