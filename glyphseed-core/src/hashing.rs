//! Hashing System - Name Seeds and Manifest Digests
//!
//! Two unrelated hashes live here:
//! - `hash_name`: the djb2 rolling hash that turns an app name into a design seed.
//! - SHA-256 over canonical JSON, used to make export manifests reproducible.

use sha2::{Sha256, Digest};
use serde::Serialize;
use serde_json::{Value, to_string};

/// djb2 base value; also the seed of the empty string.
pub const DJB2_BASIS: i32 = 5381;

/// Hash a string into a non-negative 32-bit seed.
///
/// The input is taken literally (no trimming or case folding). Each UTF-16
/// code unit is folded in with `hash * 33 + unit` in wrapping 32-bit signed
/// arithmetic, and the absolute value of the final state is returned.
pub fn hash_name(text: &str) -> u32 {
    let hash = text
        .encode_utf16()
        .fold(DJB2_BASIS, |hash, unit| {
            hash.wrapping_mul(33).wrapping_add(i32::from(unit))
        });
    hash.unsigned_abs()
}

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    let sorted = sort_value(&v);
    to_string(&sorted)
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            let sorted_map: serde_json::Map<String, Value> = sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), sort_value(v)))
                .collect();
            Value::Object(sorted_map)
        }
        Value::Array(arr) => {
            Value::Array(arr.iter().map(sort_value).collect())
        }
        _ => v.clone()
    }
}

/// Compute the digest of an export manifest
pub fn compute_manifest_hash<T: Serialize>(manifest: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(manifest)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

/// Compute job hash for an export run
/// job_hash = sha256(profile_id + profile_version + canonical_request + engine_version)
pub fn compute_job_hash(
    profile_id: &str,
    profile_version: &str,
    request: &impl Serialize,
    engine_version: &str,
) -> Result<String, serde_json::Error> {
    let canonical_request = canonical_json(request)?;
    let combined = format!(
        "{}:{}:{}:{}",
        profile_id, profile_version, canonical_request, engine_version
    );
    Ok(sha256_hex(combined.as_bytes()))
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_name_hashes_to_basis() {
        assert_eq!(hash_name(""), 5381);
    }

    #[test]
    fn test_hash_name_is_literal() {
        // Normalization belongs to the spec builder, not the hasher.
        assert_ne!(hash_name("Aura"), hash_name("aura"));
        assert_ne!(hash_name(" aura"), hash_name("aura"));
        assert_eq!(hash_name("aura"), 2_090_090_766);
    }

    #[test]
    fn test_hash_name_single_char() {
        // 5381 * 33 + 'x'
        assert_eq!(hash_name("x"), 5381 * 33 + 120);
    }

    #[test]
    fn test_hash_name_wraps_long_input() {
        let long = "a".repeat(10_000);
        assert_eq!(hash_name(&long), hash_name(&long));
    }

    #[test]
    fn test_hash_name_uses_utf16_units() {
        // U+1F600 is a surrogate pair: two code units folded in order.
        let expected = DJB2_BASIS
            .wrapping_mul(33)
            .wrapping_add(0xD83D)
            .wrapping_mul(33)
            .wrapping_add(0xDE00)
            .unsigned_abs();
        assert_eq!(hash_name("\u{1F600}"), expected);
    }

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": 3});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_hash_deterministic() {
        let data = b"test data";
        let h1 = sha256_hex(data);
        let h2 = sha256_hex(data);
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn test_job_hash_changes_with_profile() {
        let request = json!({"appName": "Aura"});
        let a = compute_job_hash("ios", "1.0.0", &request, "1.0.0").unwrap();
        let b = compute_job_hash("android", "1.0.0", &request, "1.0.0").unwrap();
        assert_ne!(a, b);
    }
}
