// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! TC3-HMAC-SHA256 request signing.

use chrono::DateTime;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::error::{CloudError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Signature algorithm name.
pub(crate) const ALGORITHM: &str = "TC3-HMAC-SHA256";

/// Content type used for every request; it is part of the signature.
pub(crate) const CONTENT_TYPE: &str = "application/json; charset=utf-8";

const SIGNED_HEADERS: &str = "content-type;host;x-tc-action";

/// Inputs that identify one signed call.
pub(crate) struct SigningRequest<'a> {
    pub secret_id: &'a str,
    pub secret_key: &'a str,
    pub service: &'a str,
    pub host: &'a str,
    pub action: &'a str,
    pub payload: &'a str,
    pub timestamp: i64,
}

/// Build the `Authorization` header value for a POST with a JSON body.
pub(crate) fn authorization(req: &SigningRequest<'_>) -> Result<String> {
    let date = DateTime::from_timestamp(req.timestamp, 0)
        .ok_or_else(|| CloudError::Signing(format!("invalid timestamp {}", req.timestamp)))?
        .format("%Y-%m-%d")
        .to_string();

    let canonical_headers = format!(
        "content-type:{}\nhost:{}\nx-tc-action:{}\n",
        CONTENT_TYPE,
        req.host,
        req.action.to_lowercase()
    );
    let canonical_request = format!(
        "POST\n/\n\n{}\n{}\n{}",
        canonical_headers,
        SIGNED_HEADERS,
        sha256_hex(req.payload.as_bytes())
    );

    let credential_scope = format!("{}/{}/tc3_request", date, req.service);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        req.timestamp,
        credential_scope,
        sha256_hex(canonical_request.as_bytes())
    );

    let secret_date = hmac_sha256(format!("TC3{}", req.secret_key).as_bytes(), &date)?;
    let secret_service = hmac_sha256(&secret_date, req.service)?;
    let secret_signing = hmac_sha256(&secret_service, "tc3_request")?;
    let signature = hex::encode(hmac_sha256(&secret_signing, &string_to_sign)?);

    Ok(format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, req.secret_id, credential_scope, SIGNED_HEADERS, signature
    ))
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &str) -> Result<Vec<u8>> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| CloudError::Signing(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(payload: &str) -> SigningRequest<'_> {
        SigningRequest {
            secret_id: "AKIDEXAMPLE",
            secret_key: "secret",
            service: "apm",
            host: "apm.tencentcloudapi.com",
            action: "DescribeApmInstances",
            payload,
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_authorization_layout() {
        let header = authorization(&request("{}")).unwrap();
        assert!(header.starts_with(
            "TC3-HMAC-SHA256 Credential=AKIDEXAMPLE/2023-11-14/apm/tc3_request, \
             SignedHeaders=content-type;host;x-tc-action, Signature="
        ));
        let signature = header.rsplit("Signature=").next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signature_is_deterministic_and_payload_bound() {
        let a = authorization(&request("{\"InstanceIds\":[\"ins-1\"]}")).unwrap();
        let b = authorization(&request("{\"InstanceIds\":[\"ins-1\"]}")).unwrap();
        let c = authorization(&request("{\"InstanceIds\":[\"ins-2\"]}")).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_sha256_hex_of_empty_body() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
