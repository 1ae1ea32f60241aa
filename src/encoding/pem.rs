//! PEM ASCII armor
//!
//! Only the `-----BEGIN <label>-----` block with the requested label is
//! read; other blocks in the same text (for example `EC PARAMETERS` ahead
//! of `EC PRIVATE KEY`) are skipped. Encapsulated headers such as
//! `Proc-Type` mark encrypted keys and are rejected.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{EcdsaError, EcdsaResult};

pub const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
pub const EC_PRIVATE_KEY_LABEL: &str = "EC PRIVATE KEY";

const LINE_WIDTH: usize = 64;

/// Extract and base64-decode the DER body of the `label` block
pub fn decode(text: &str, label: &str) -> EcdsaResult<Vec<u8>> {
    let begin = format!("-----BEGIN {}-----", label);
    let end = format!("-----END {}-----", label);

    let mut lines = text.lines().map(str::trim);
    if !lines.by_ref().any(|line| line == begin) {
        return Err(EcdsaError::malformed(format!("no {} block found", begin)));
    }

    let mut body = String::new();
    let mut terminated = false;
    for line in lines {
        if line == end {
            terminated = true;
            break;
        }
        if line.starts_with("-----") {
            return Err(EcdsaError::malformed(format!(
                "unexpected boundary {:?} inside {} block",
                line, label
            )));
        }
        if line.contains(':') {
            return Err(EcdsaError::malformed(
                "PEM headers (encrypted keys) are not supported",
            ));
        }
        body.push_str(line);
    }

    if !terminated {
        return Err(EcdsaError::malformed(format!("missing {}", end)));
    }
    if body.is_empty() {
        return Err(EcdsaError::malformed(format!("empty {} block", label)));
    }

    Ok(STANDARD.decode(body.as_bytes())?)
}

/// Armor a DER blob, wrapping the base64 body at 64 columns
pub fn encode(der: &[u8], label: &str) -> String {
    let body = STANDARD.encode(der);
    let mut out = String::with_capacity(body.len() + body.len() / LINE_WIDTH + 2 * label.len() + 40);
    out.push_str(&format!("-----BEGIN {}-----\n", label));
    for chunk in body.as_bytes().chunks(LINE_WIDTH) {
        // base64 output is ASCII
        out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        out.push('\n');
    }
    out.push_str(&format!("-----END {}-----\n", label));
    out
}
