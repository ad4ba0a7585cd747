use anyhow::{Context, Result, bail};
use std::collections::HashSet;

pub const DEFAULT_SEED: u32 = 1337;

/// A resolved base seed plus the token it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u32,
    pub token: String,
}

impl SeedInfo {
    #[must_use]
    pub fn from_numeric(seed: u32) -> Self {
        Self {
            seed,
            token: seed.to_string(),
        }
    }
}

fn parse_token(token: &str) -> Result<u64> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16)
            .with_context(|| format!("invalid hex seed: {token}"));
    }

    if let Ok(value) = token.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }

    if let Ok(value) = token.parse::<u64>() {
        return Ok(value);
    }

    bail!("Unrecognized seed token: {token}");
}

/// Resolve CLI seed arguments into 32-bit base seeds.
///
/// Accepts decimal and `0x` hex; negative numbers use their magnitude and
/// values wider than 32 bits keep their low word. Duplicates are dropped in
/// first-seen order, and an empty list falls back to [`DEFAULT_SEED`].
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut seen: HashSet<u32> = HashSet::new();
    let mut resolved: Vec<SeedInfo> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }
        let value = parse_token(token)?;
        #[allow(clippy::cast_possible_truncation)]
        let seed = value as u32;
        if u64::from(seed) != value {
            log::warn!("seed {token} exceeds 32 bits; using {seed}");
        }
        if seen.insert(seed) {
            resolved.push(SeedInfo {
                seed,
                token: token.clone(),
            });
        }
    }

    if resolved.is_empty() {
        resolved.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn empty_input_uses_default() {
        let seeds = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_numeric(1337)]);
    }

    #[test]
    fn parses_decimal_hex_and_negative() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "0xff", "-7"])).unwrap();
        let values: Vec<u32> = seeds.iter().map(|s| s.seed).collect();
        assert_eq!(values, vec![42, 255, 7]);
        assert_eq!(seeds[1].token, "0xff");
    }

    #[test]
    fn dedupes_in_first_seen_order() {
        let seeds = resolve_seed_inputs(&tokens(&["5", "0x5", "9", "-5"])).unwrap();
        let values: Vec<u32> = seeds.iter().map(|s| s.seed).collect();
        assert_eq!(values, vec![5, 9]);
        assert_eq!(seeds[0].token, "5");
    }

    #[test]
    fn wide_values_keep_low_word() {
        let seeds = resolve_seed_inputs(&tokens(&["4294967297"])).unwrap();
        assert_eq!(seeds[0].seed, 1);
    }

    #[test]
    fn rejects_garbage() {
        assert!(resolve_seed_inputs(&tokens(&["CL-ORANGE42"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["0xzz"])).is_err());
    }
}
