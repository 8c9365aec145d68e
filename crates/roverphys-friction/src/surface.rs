//! Tyre and ground surface catalog used to seed friction coefficients.
//!
//! The catalog is fixed and deterministic; pair mixing is symmetric.

use roverphys_core::Scalar;
use serde::{Deserialize, Serialize};

#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceId {
    // tyres
    Rubber, RubberSoft, RubberHard, Polyurethane, Steel,
    // grounds
    Asphalt, AsphaltWet, Concrete, ConcreteWet, Gravel, SandDry, SandWet, Mud, Grass, Ice, SnowPacked, Wood, Carpet,
}

/// Single-surface properties.
///
/// `stribeck_v` (m/s) is the characteristic slip speed of the
/// static-to-kinetic transition.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceProps {
    pub mu_s: Scalar,
    pub mu_k: Scalar,
    pub stribeck_v: Scalar,
}

/// Pair properties after mixing and overrides.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfacePair {
    pub mu_s: Scalar,
    pub mu_k: Scalar,
    pub stribeck_v: Scalar,
}

pub fn props(id: SurfaceId) -> SurfaceProps {
    use SurfaceId::*;
    match id {
        Rubber       => SurfaceProps { mu_s: 1.10, mu_k: 0.95, stribeck_v: 0.15 },
        RubberSoft   => SurfaceProps { mu_s: 1.30, mu_k: 1.05, stribeck_v: 0.18 },
        RubberHard   => SurfaceProps { mu_s: 1.00, mu_k: 0.80, stribeck_v: 0.12 },
        Polyurethane => SurfaceProps { mu_s: 0.70, mu_k: 0.60, stribeck_v: 0.08 },
        Steel        => SurfaceProps { mu_s: 0.70, mu_k: 0.55, stribeck_v: 0.05 },

        Asphalt      => SurfaceProps { mu_s: 0.90, mu_k: 0.80, stribeck_v: 0.12 },
        AsphaltWet   => SurfaceProps { mu_s: 0.60, mu_k: 0.50, stribeck_v: 0.12 },
        Concrete     => SurfaceProps { mu_s: 0.80, mu_k: 0.70, stribeck_v: 0.10 },
        ConcreteWet  => SurfaceProps { mu_s: 0.60, mu_k: 0.50, stribeck_v: 0.10 },
        Gravel       => SurfaceProps { mu_s: 0.65, mu_k: 0.55, stribeck_v: 0.12 },
        SandDry      => SurfaceProps { mu_s: 0.60, mu_k: 0.50, stribeck_v: 0.10 },
        SandWet      => SurfaceProps { mu_s: 0.50, mu_k: 0.40, stribeck_v: 0.10 },
        Mud          => SurfaceProps { mu_s: 0.30, mu_k: 0.25, stribeck_v: 0.12 },
        Grass        => SurfaceProps { mu_s: 0.45, mu_k: 0.35, stribeck_v: 0.15 },
        Ice          => SurfaceProps { mu_s: 0.05, mu_k: 0.03, stribeck_v: 0.02 },
        SnowPacked   => SurfaceProps { mu_s: 0.12, mu_k: 0.08, stribeck_v: 0.06 },
        Wood         => SurfaceProps { mu_s: 0.55, mu_k: 0.45, stribeck_v: 0.10 },
        Carpet       => SurfaceProps { mu_s: 1.10, mu_k: 0.95, stribeck_v: 0.18 },
    }
}

/// Curated overrides for well-known combinations.
fn override_for(a: SurfaceId, b: SurfaceId) -> Option<SurfacePair> {
    use SurfaceId::*;
    match ordered_pair(a, b) {
        (Rubber, Asphalt)  => Some(SurfacePair { mu_s: 1.10, mu_k: 0.95, stribeck_v: 0.18 }),
        (Rubber, Concrete) => Some(SurfacePair { mu_s: 1.00, mu_k: 0.85, stribeck_v: 0.16 }),
        (Rubber, Ice)      => Some(SurfacePair { mu_s: 0.20, mu_k: 0.10, stribeck_v: 0.08 }),
        _ => None,
    }
}

/// Geometric-mean friction, mean Stribeck speed.
fn mix_pair(a: SurfaceProps, b: SurfaceProps) -> SurfacePair {
    SurfacePair {
        mu_s: (a.mu_s * b.mu_s).abs().sqrt(),
        mu_k: (a.mu_k * b.mu_k).abs().sqrt(),
        stribeck_v: 0.5 * (a.stribeck_v + b.stribeck_v),
    }
}

/// Pair properties with overrides applied; order independent.
pub fn pair_props(a: SurfaceId, b: SurfaceId) -> SurfacePair {
    override_for(a, b).unwrap_or_else(|| mix_pair(props(a), props(b)))
}

#[inline]
fn ordered_pair(a: SurfaceId, b: SurfaceId) -> (SurfaceId, SurfaceId) {
    if (a as u8) <= (b as u8) { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetry() {
        let p1 = pair_props(SurfaceId::RubberSoft, SurfaceId::Gravel);
        let p2 = pair_props(SurfaceId::Gravel, SurfaceId::RubberSoft);
        assert_eq!(p1, p2);
        assert_eq!(pair_props(SurfaceId::Ice, SurfaceId::Rubber), pair_props(SurfaceId::Rubber, SurfaceId::Ice));
    }

    #[test]
    fn ice_is_slippery() {
        assert!(pair_props(SurfaceId::Rubber, SurfaceId::Ice).mu_k < pair_props(SurfaceId::Rubber, SurfaceId::Asphalt).mu_k);
    }
}
