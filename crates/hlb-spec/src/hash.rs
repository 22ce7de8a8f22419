//! Canonical hashing and seed derivation.
//!
//! This module implements the determinism policy for the beacon:
//! - Canonical JSON (RFC 8785 style) for any serializable spec value
//! - BLAKE3 hashing for spec and buffer hashes
//! - Seed derivation for noise layers that do not pin an explicit seed

use serde::Serialize;

/// Computes the canonical BLAKE3 hash of any serializable value.
///
/// The hash is computed as:
/// ```text
/// hash = hex(BLAKE3(JCS(to_json(value))))
/// ```
///
/// # Example
/// ```
/// use hlb_spec::hash::canonical_hash;
/// use hlb_spec::SignalSpec;
///
/// let tone = SignalSpec::tone(7.83, 1.0);
/// let hash = canonical_hash(&tone).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    Ok(canonical_value_hash(&value))
}

/// Computes the canonical BLAKE3 hash of a JSON value.
pub fn canonical_value_hash(value: &serde_json::Value) -> String {
    let canonical = canonicalize_json(value);
    blake3_hash(canonical.as_bytes())
}

/// Canonicalizes a JSON value.
///
/// Object keys are sorted lexicographically, no whitespace is emitted between
/// tokens, integer-valued floats print without a fraction and strings use
/// minimal escaping.
pub fn canonicalize_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => format_jcs_number(n),
        serde_json::Value::String(s) => format_jcs_string(s),
        serde_json::Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(canonicalize_json).collect();
            format!("[{}]", items.join(","))
        }
        serde_json::Value::Object(obj) => {
            let mut entries: Vec<(&String, &serde_json::Value)> = obj.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let pairs: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", format_jcs_string(k), canonicalize_json(v)))
                .collect();
            format!("{{{}}}", pairs.join(","))
        }
    }
}

fn format_jcs_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if !f.is_finite() => "null".to_string(),
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => format!("{}", f),
        None => "null".to_string(),
    }
}

fn format_jcs_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c < '\x20' => result.push_str(&format!("\\u{:04x}", c as u32)),
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

/// Derives a 32-bit seed from any serializable value.
///
/// ```text
/// seed = truncate_u32(BLAKE3(JCS(to_json(value))))
/// ```
///
/// Two values that serialize identically always produce the same seed, which
/// is what lets a noise layer regenerate the exact same stream from its spec.
pub fn derive_value_seed<T: Serialize>(value: &T) -> Result<u32, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    let canonical = canonicalize_json(&value);
    Ok(truncate_u32(blake3::hash(canonical.as_bytes())))
}

/// Computes a BLAKE3 hash of arbitrary data as lowercase hex.
pub fn blake3_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

fn truncate_u32(hash: blake3::Hash) -> u32 {
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
