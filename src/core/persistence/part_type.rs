//=========================================================================
// Part Type
//=========================================================================
//
// The seven engine-mountable part categories.
//
// Ordinals are part of the on-disk record format and must stay stable.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::str::FromStr;

//=== PartType ============================================================

/// Category of an engine-mountable part.
///
/// Each category owns exactly one engine-mount slot. `Engine` is the
/// default and is what records of plain pickups (no engine component)
/// carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum PartType {
    #[default]
    Engine,
    FuelTank,
    Carburettor,
    AirFilter,
    IgnitionCoil,
    Battery,
    WaterTank,
}

impl PartType {
    /// All part types in ordinal order.
    pub const ALL: [PartType; 7] = [
        PartType::Engine,
        PartType::FuelTank,
        PartType::Carburettor,
        PartType::AirFilter,
        PartType::IgnitionCoil,
        PartType::Battery,
        PartType::WaterTank,
    ];

    /// Stable integer used in the record format.
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    pub fn from_ordinal(ordinal: i32) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Engine tag carried by engine components of this type.
    pub fn tag(self) -> &'static str {
        match self {
            PartType::Engine => "Engine",
            PartType::FuelTank => "FuelTank",
            PartType::Carburettor => "Carburettor",
            PartType::AirFilter => "AirFilter",
            PartType::IgnitionCoil => "IgnitionCoil",
            PartType::Battery => "Battery",
            PartType::WaterTank => "WaterTank",
        }
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Exact, case-sensitive tag match.
impl FromStr for PartType {
    type Err = ();

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|t| t.tag() == tag).ok_or(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_are_stable() {
        assert_eq!(PartType::Engine.ordinal(), 0);
        assert_eq!(PartType::IgnitionCoil.ordinal(), 4);
        assert_eq!(PartType::WaterTank.ordinal(), 6);
    }

    #[test]
    fn ordinal_lookup_rejects_out_of_range() {
        assert_eq!(PartType::from_ordinal(5), Some(PartType::Battery));
        assert_eq!(PartType::from_ordinal(7), None);
        assert_eq!(PartType::from_ordinal(-1), None);
    }

    #[test]
    fn tag_match_is_exact() {
        assert_eq!("Carburettor".parse(), Ok(PartType::Carburettor));
        assert!("carburettor".parse::<PartType>().is_err());
        assert!("Carburetor".parse::<PartType>().is_err());
        assert!(" Engine".parse::<PartType>().is_err());
    }

    #[test]
    fn every_tag_round_trips() {
        for part in PartType::ALL {
            assert_eq!(part.tag().parse::<PartType>(), Ok(part));
        }
    }
}
