// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Client address extraction and pseudonymous fingerprinting.
//!
//! The fingerprint is the first 16 hex characters of SHA-256 over the client
//! address. Truncation is deliberate: it keeps the value stable per address
//! while making collisions common enough that it cannot single out a client.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest.
pub const FINGERPRINT_LEN: usize = 16;

/// Pick the client address from transport metadata.
///
/// The first entry of a comma-separated forwarding header wins when it is
/// non-empty, otherwise the transport peer address is used. Returns `None`
/// when neither yields a non-blank value.
pub fn client_address(forwarded_for: Option<&str>, peer: Option<&str>) -> Option<String> {
    let forwarded = forwarded_for
        .and_then(|header| header.split(',').next())
        .map(str::trim)
        .filter(|addr| !addr.is_empty());

    forwarded
        .or_else(|| peer.map(str::trim).filter(|addr| !addr.is_empty()))
        .map(str::to_owned)
}

/// Derive the fingerprint of a client address.
///
/// Blank input produces `None`.
pub fn fingerprint(address: &str) -> Option<String> {
    let address = address.trim();
    if address.is_empty() {
        return None;
    }

    let digest = Sha256::digest(address.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(FINGERPRINT_LEN);
    Some(encoded)
}
