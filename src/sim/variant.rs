//! Bug variant table
//!
//! Four fixed archetypes. The weighted pick uses cumulative bands:
//! gold 12%, glitch 18%, tank 27%, scout 43%.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Bug archetype identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantId {
    Scout,
    Tank,
    Glitch,
    Gold,
}

/// Static description of a bug archetype
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BugVariant {
    pub id: VariantId,
    pub name: &'static str,
    pub points: u32,
    /// Seconds added to the clock on a hit
    pub bonus_time: f64,
    /// Size range in pixels [min, max]
    pub size_range: (f32, f32),
    /// Speed range in arena percent per tick [min, max]
    pub speed_range: (f32, f32),
    /// Palette tag for the host's styling
    pub tag: &'static str,
}

pub const SCOUT: BugVariant = BugVariant {
    id: VariantId::Scout,
    name: "Scout",
    points: 10,
    bonus_time: 0.0,
    size_range: (28.0, 36.0),
    speed_range: (0.11, 0.21),
    tag: "cyan",
};

pub const TANK: BugVariant = BugVariant {
    id: VariantId::Tank,
    name: "Tank",
    points: 16,
    bonus_time: 0.0,
    size_range: (35.0, 46.0),
    speed_range: (0.08, 0.16),
    tag: "rose",
};

pub const GLITCH: BugVariant = BugVariant {
    id: VariantId::Glitch,
    name: "Glitch",
    points: 22,
    bonus_time: 0.0,
    size_range: (24.0, 31.0),
    speed_range: (0.17, 0.28),
    tag: "violet",
};

pub const GOLD: BugVariant = BugVariant {
    id: VariantId::Gold,
    name: "Gold",
    points: 34,
    bonus_time: 1.7,
    size_range: (20.0, 28.0),
    speed_range: (0.2, 0.32),
    tag: "amber",
};

/// All variants in table order
pub const VARIANTS: [BugVariant; 4] = [SCOUT, TANK, GLITCH, GOLD];

/// Cumulative upper bounds of the gold/glitch/tank bands
const GOLD_BAND: f64 = 0.12;
const GLITCH_BAND: f64 = 0.30;
const TANK_BAND: f64 = 0.57;

impl VariantId {
    /// Table entry for this id
    pub fn variant(self) -> &'static BugVariant {
        match self {
            VariantId::Scout => &SCOUT,
            VariantId::Tank => &TANK,
            VariantId::Glitch => &GLITCH,
            VariantId::Gold => &GOLD,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VariantId::Scout => "scout",
            VariantId::Tank => "tank",
            VariantId::Glitch => "glitch",
            VariantId::Gold => "gold",
        }
    }
}

/// Map a roll in [0, 1) to a variant
pub fn variant_for_roll(roll: f64) -> &'static BugVariant {
    if roll < GOLD_BAND {
        &GOLD
    } else if roll < GLITCH_BAND {
        &GLITCH
    } else if roll < TANK_BAND {
        &TANK
    } else {
        &SCOUT
    }
}

/// Weighted random variant draw
pub fn pick_variant<R: Rng>(rng: &mut R) -> &'static BugVariant {
    variant_for_roll(rng.random::<f64>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_band_edges() {
        assert_eq!(variant_for_roll(0.0).id, VariantId::Gold);
        assert_eq!(variant_for_roll(0.1199).id, VariantId::Gold);
        assert_eq!(variant_for_roll(0.12).id, VariantId::Glitch);
        assert_eq!(variant_for_roll(0.2999).id, VariantId::Glitch);
        assert_eq!(variant_for_roll(0.30).id, VariantId::Tank);
        assert_eq!(variant_for_roll(0.5699).id, VariantId::Tank);
        assert_eq!(variant_for_roll(0.57).id, VariantId::Scout);
        assert_eq!(variant_for_roll(0.9999).id, VariantId::Scout);
    }

    #[test]
    fn test_distribution_over_many_draws() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let draws = 100_000;
        let mut counts = [0usize; 4];
        for _ in 0..draws {
            let idx = match pick_variant(&mut rng).id {
                VariantId::Gold => 0,
                VariantId::Glitch => 1,
                VariantId::Tank => 2,
                VariantId::Scout => 3,
            };
            counts[idx] += 1;
        }

        let expected = [0.12, 0.18, 0.27, 0.43];
        for (count, want) in counts.iter().zip(expected) {
            let share = *count as f64 / draws as f64;
            assert!(
                (share - want).abs() < 0.01,
                "share {} too far from {}",
                share,
                want
            );
        }
    }

    #[test]
    fn test_table_lookup_matches_ids() {
        for variant in VARIANTS {
            assert_eq!(variant.id.variant(), &variant);
        }
        assert_eq!(GOLD.bonus_time, 1.7);
        assert!(VARIANTS.iter().filter(|v| v.bonus_time > 0.0).count() == 1);
    }

    proptest! {
        #[test]
        fn prop_points_never_decrease_as_roll_falls(a in 0.0f64..1.0, b in 0.0f64..1.0) {
            // Rarer bands sit at lower rolls and are worth more
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(variant_for_roll(lo).points >= variant_for_roll(hi).points);
        }
    }
}
