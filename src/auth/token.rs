// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and verification.
//!
//! Tokens are HMAC-signed JWTs carrying subject, issue time, and expiry.
//! Verification is a pure, single-shot check: signature first (delegated to
//! `jsonwebtoken`, whose HMAC comparison is constant-time), then expiry
//! against the validator's clock. The clock is injectable so expiry
//! behavior can be tested deterministically.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::Claims;
use super::error::TokenError;

/// Time source for issuance and expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time. The default outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Issues and verifies signed tokens against a single symmetric secret.
///
/// The key material is read-only after construction and safe to share
/// across request-handling tasks.
#[derive(Clone)]
pub struct TokenValidator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    clock: Arc<dyn Clock>,
}

impl TokenValidator {
    /// Create a validator for the given secret and HMAC algorithm.
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source (used by tests to freeze the clock).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sign a token for `subject` expiring `ttl` from now.
    ///
    /// The authority labels are embedded as advisory `roles` claims; the
    /// authenticator resolves the authoritative set from the directory.
    pub fn issue(
        &self,
        subject: &str,
        authorities: &[String],
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = self.clock.now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            roles: authorities.to_vec(),
        };
        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
    }

    /// Verify a presented token and return its claims.
    ///
    /// Fails with `Malformed` when the string does not parse as a token,
    /// `BadSignature` when the signature does not verify, and `Expired`
    /// when the clock is at or past the embedded expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against the injected clock
        validation.validate_exp = false;
        validation.required_spec_claims.remove("exp");
        validation.validate_aud = false;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::BadSignature,
                jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
                _ => TokenError::Malformed,
            }
        })?;

        if self.clock.now().timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SECRET: &[u8] = b"test-secret-test-secret-test-secret";

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
    }

    fn validator_at(now: DateTime<Utc>) -> TokenValidator {
        TokenValidator::new(SECRET, Algorithm::HS256).with_clock(Arc::new(FixedClock(now)))
    }

    #[test]
    fn issue_then_verify_returns_subject_and_roles() {
        let validator = validator_at(t0());
        let token = validator
            .issue("alice", &["ROLE_USER".to_string()], Duration::seconds(3600))
            .unwrap();

        let claims = validator.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.roles, vec!["ROLE_USER"]);
        assert_eq!(claims.iat, t0().timestamp());
        assert_eq!(claims.exp, t0().timestamp() + 3600);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let issuer = validator_at(t0());
        let token = issuer.issue("alice", &[], Duration::seconds(3600)).unwrap();

        // One second before expiry still verifies
        let near_expiry = validator_at(t0() + Duration::seconds(3599));
        assert!(near_expiry.verify(&token).is_ok());

        // Exactly at expiry is already expired
        let at_expiry = validator_at(t0() + Duration::seconds(3600));
        assert_eq!(at_expiry.verify(&token), Err(TokenError::Expired));

        let past_expiry = validator_at(t0() + Duration::seconds(7200));
        assert_eq!(past_expiry.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn verify_rejects_garbage_as_malformed() {
        let validator = validator_at(t0());
        assert_eq!(validator.verify("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(validator.verify(""), Err(TokenError::Malformed));
        assert_eq!(
            validator.verify("only.two"),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn verify_rejects_tampered_signature() {
        let validator = validator_at(t0());
        let token = validator
            .issue("alice", &[], Duration::seconds(3600))
            .unwrap();

        let (rest, signature) = token.rsplit_once('.').unwrap();
        let mut sig_bytes: Vec<u8> = signature.bytes().collect();
        // Flip one character of the signature segment
        sig_bytes[0] = if sig_bytes[0] == b'A' { b'B' } else { b'A' };
        let tampered = format!("{rest}.{}", String::from_utf8(sig_bytes).unwrap());

        assert_eq!(validator.verify(&tampered), Err(TokenError::BadSignature));
    }

    #[test]
    fn verify_rejects_token_signed_with_other_secret() {
        let issuer =
            TokenValidator::new(b"a-completely-different-secret", Algorithm::HS256)
                .with_clock(Arc::new(FixedClock(t0())));
        let token = issuer.issue("alice", &[], Duration::seconds(3600)).unwrap();

        let validator = validator_at(t0());
        assert_eq!(validator.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

        let validator = validator_at(t0());
        let token = validator
            .issue("alice", &[], Duration::seconds(3600))
            .unwrap();

        // Swap the subject in the payload without re-signing
        let parts: Vec<&str> = token.split('.').collect();
        let payload = String::from_utf8(URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        let forged_payload = payload.replace("alice", "mallory");
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(forged_payload.as_bytes()),
            parts[2]
        );

        assert_eq!(validator.verify(&forged), Err(TokenError::BadSignature));
    }
}
