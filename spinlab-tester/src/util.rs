use sha2::{Digest, Sha256};
use std::fmt::Write as _;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Short hex fingerprint of a trajectory, stable across platforms.
pub fn trajectory_digest(points: &[f64]) -> String {
    let mut hasher = Sha256::new();
    for point in points {
        hasher.update(point.to_bits().to_le_bytes());
    }
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(16);
    for byte in &digest[..8] {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}
