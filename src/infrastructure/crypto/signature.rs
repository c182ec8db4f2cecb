//! HMAC signatures for payment gateway links and callbacks

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 of `data`
pub fn hmac_sha256_hex(secret: &str, data: &str) -> String {
    // HMAC accepts keys of any length, so this never fails
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Compare a received hex digest with the expected one, ignoring case.
pub fn verify_hex(expected: &str, received: &str) -> bool {
    let a = expected.to_ascii_lowercase();
    let b = received.to_ascii_lowercase();
    constant_time_eq(a.as_bytes(), b.as_bytes())
}

pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// SHA-256 hex digest, used to compare static API keys without leaking length
pub fn sha256_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

/// `k1=v1&k2=v2` over the pairs sorted by key, values form-urlencoded.
pub fn sorted_query(params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in sorted {
        serializer.append_pair(k, v);
    }
    serializer.finish()
}

/// `k1=v1&k2=v2` over the pairs sorted by key, values raw.
pub fn sorted_raw_query(params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_sha256_known_vector() {
        // RFC 4231 test case 2
        assert_eq!(
            hmac_sha256_hex("Jefe", "what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn verify_ignores_case_but_not_content() {
        let sig = hmac_sha256_hex("secret", "vnp_Amount=100000");
        assert!(verify_hex(&sig, &sig.to_uppercase()));
        assert!(!verify_hex(&sig, &hmac_sha256_hex("secret", "vnp_Amount=100001")));
    }

    #[test]
    fn query_is_sorted_and_encoded() {
        let params = vec![
            ("vnp_TxnRef".to_string(), "ATL1".to_string()),
            ("vnp_Amount".to_string(), "100000".to_string()),
            ("vnp_OrderInfo".to_string(), "Thanh toan don ATL1".to_string()),
        ];
        assert_eq!(
            sorted_query(&params),
            "vnp_Amount=100000&vnp_OrderInfo=Thanh+toan+don+ATL1&vnp_TxnRef=ATL1"
        );
        assert_eq!(
            sorted_raw_query(&params),
            "vnp_Amount=100000&vnp_OrderInfo=Thanh toan don ATL1&vnp_TxnRef=ATL1"
        );
    }
}
