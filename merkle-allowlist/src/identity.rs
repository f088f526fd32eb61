//! Canonical identities.
//!
//! An identity is the text of a wallet address exactly as it was supplied.
//! Its bytes are what gets hashed into a leaf; the encoding only decides
//! which texts are accepted. Nothing is trimmed, case-folded or re-encoded.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{AllowlistError, Result};

/// Length in bytes of a decoded base58 wallet address.
pub const ADDRESS_LEN: usize = 32;

/// Accepted textual encoding of the identities in one allowlist.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityEncoding {
    /// Any non-empty text without surrounding whitespace.
    #[default]
    Raw,
    /// Base58 text that decodes to a 32-byte public key.
    Base58,
    /// Non-empty, even-length lowercase hex without a `0x` prefix.
    Hex,
}

impl FromStr for IdentityEncoding {
    type Err = AllowlistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(IdentityEncoding::Raw),
            "base58" => Ok(IdentityEncoding::Base58),
            "hex" => Ok(IdentityEncoding::Hex),
            other => Err(AllowlistError::Config(format!(
                "unknown identity encoding `{}` (expected raw, base58 or hex)",
                other
            ))),
        }
    }
}

/// An admitted (or candidate) identity in canonical byte form.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(Vec<u8>);

impl Identity {
    /// Validate `text` against `encoding`.
    pub fn parse(text: &str, encoding: IdentityEncoding) -> Result<Self> {
        if text.is_empty() {
            return Err(AllowlistError::MalformedIdentity("empty identity".into()));
        }
        if text.trim() != text {
            return Err(AllowlistError::MalformedIdentity(format!(
                "`{}` has surrounding whitespace",
                text.escape_debug()
            )));
        }
        match encoding {
            IdentityEncoding::Raw => {}
            IdentityEncoding::Base58 => {
                let decoded = bs58::decode(text).into_vec().map_err(|e| {
                    AllowlistError::MalformedIdentity(format!("`{}` is not base58: {}", text, e))
                })?;
                if decoded.len() != ADDRESS_LEN {
                    return Err(AllowlistError::MalformedIdentity(format!(
                        "`{}` decodes to {} bytes, expected {}",
                        text,
                        decoded.len(),
                        ADDRESS_LEN
                    )));
                }
            }
            IdentityEncoding::Hex => {
                if text.bytes().any(|b| b.is_ascii_uppercase()) {
                    return Err(AllowlistError::MalformedIdentity(format!(
                        "`{}` is not lowercase hex",
                        text
                    )));
                }
                hex::decode(text).map_err(|e| {
                    AllowlistError::MalformedIdentity(format!("`{}` is not hex: {}", text, e))
                })?;
            }
        }
        Ok(Identity(text.as_bytes().to_vec()))
    }

    /// Accept any non-empty byte string as-is.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(AllowlistError::MalformedIdentity("empty identity".into()));
        }
        Ok(Identity(bytes))
    }

    /// The bytes hashed into this identity's leaf.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the canonical bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for Identity {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(text) => write!(f, "Identity({:?})", text),
            Err(_) => write!(f, "Identity(0x{})", hex::encode(&self.0)),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Parse a whole allowlist, failing on the first malformed entry.
pub fn parse_identities<S: AsRef<str>>(
    texts: &[S],
    encoding: IdentityEncoding,
) -> Result<Vec<Identity>> {
    texts
        .iter()
        .enumerate()
        .map(|(position, text)| {
            Identity::parse(text.as_ref(), encoding).map_err(|e| match e {
                AllowlistError::MalformedIdentity(reason) => AllowlistError::MalformedIdentity(
                    format!("entry {}: {}", position, reason),
                ),
                other => other,
            })
        })
        .collect()
}
