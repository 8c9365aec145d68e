use roverphys_core::Vec2;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Aabb2 { pub min: Vec2, pub max: Vec2 }

impl Aabb2 {
    #[inline] pub fn new(min: Vec2, max: Vec2) -> Self { Self { min, max } }
    /// Tight box around `pts`; `None` for an empty slice.
    pub fn of_points(pts: &[Vec2]) -> Option<Self> {
        let first = *pts.first()?;
        Some(pts.iter().fold(Self::new(first, first), |b, p| Self::new(b.min.min(*p), b.max.max(*p))))
    }
    /// Touching boxes count as overlapping.
    #[inline] pub fn overlaps(&self, other: &Aabb2) -> bool {
        !(self.max.x < other.min.x || self.min.x > other.max.x ||
            self.max.y < other.min.y || self.min.y > other.max.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roverphys_core::vec2;

    #[test]
    fn box_of_points() {
        let b = Aabb2::of_points(&[vec2(1.0, -2.0), vec2(-3.0, 0.5), vec2(0.0, 4.0)]);
        assert_eq!(b, Some(Aabb2::new(vec2(-3.0, -2.0), vec2(1.0, 4.0))));
        assert_eq!(Aabb2::of_points(&[]), None);
    }

    #[test]
    fn overlap_is_inclusive() {
        let a = Aabb2::new(vec2(0.0, 0.0), vec2(1.0, 1.0));
        assert!(a.overlaps(&Aabb2::new(vec2(1.0, 0.5), vec2(2.0, 2.0))));
        assert!(!a.overlaps(&Aabb2::new(vec2(1.1, 0.0), vec2(2.0, 1.0))));
        assert!(!a.overlaps(&Aabb2::new(vec2(0.0, -2.0), vec2(1.0, -0.1))));
    }
}
