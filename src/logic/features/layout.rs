//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature contract with the trained model**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The scaler and classifier were fitted against this exact column order.
//! A reordered vector still produces a prediction, just a wrong one.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Air (0-2) ===
    "temperature",  // 0: Current temperature (°C)
    "humidity",     // 1: Relative humidity (%)
    "smoke",        // 2: Smoke sensor reading

    // === Daily range (3-4) ===
    "temp_max",     // 3: Daily maximum temperature
    "temp_min",     // 4: Daily minimum temperature

    // === Wind (5-6) ===
    "wind_speed",   // 5: Sustained wind speed
    "wind_gust",    // 6: Peak gust speed
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 7;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout information reported alongside model metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: compute_layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Check that an artifact's declared feature names match the canonical layout.
///
/// Returns the first position where the two disagree.
pub fn check_feature_names(names: &[String]) -> Result<(), usize> {
    if let Some(pos) = FEATURE_LAYOUT
        .iter()
        .zip(names.iter())
        .position(|(expected, actual)| *expected != actual.as_str())
    {
        return Err(pos);
    }

    if names.len() != FEATURE_COUNT {
        return Err(names.len().min(FEATURE_COUNT));
    }

    Ok(())
}

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Whether a key belongs to the canonical layout
pub fn is_known_feature(name: &str) -> bool {
    feature_index(name).is_some()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 7);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_canonical_order() {
        assert_eq!(
            FEATURE_LAYOUT,
            &["temperature", "humidity", "smoke", "temp_max", "temp_min", "wind_speed", "wind_gust"]
        );
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(compute_layout_hash(), compute_layout_hash());
        assert_ne!(compute_layout_hash(), 0);
    }

    #[test]
    fn test_check_feature_names() {
        let names: Vec<String> = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
        assert!(check_feature_names(&names).is_ok());

        let mut swapped = names.clone();
        swapped.swap(0, 1);
        assert_eq!(check_feature_names(&swapped), Err(0));

        let short = names[..5].to_vec();
        assert_eq!(check_feature_names(&short), Err(5));
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("temperature"), Some(0));
        assert_eq!(feature_index("wind_gust"), Some(6));
        assert_eq!(feature_index("rainfall"), None);
        assert!(is_known_feature("smoke"));
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.feature_names.len(), FEATURE_COUNT);
    }
}
