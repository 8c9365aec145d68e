use roverphys_core::{Scalar, Vec2, VehicleError, VehicleResult, vec2};
use crate::MassProps;

/// Chassis outline and mass distribution, wheels excluded.
///
/// `max_radius` is derived from the polygon and only changes through
/// [`ChassisGeometry::set_polygon`].
#[derive(Clone, Debug, PartialEq)]
pub struct ChassisGeometry {
    polygon: Vec<Vec2>,
    mass: Scalar,
    com: Vec2,
    z_min: Scalar,
    z_max: Scalar,
    max_radius: Scalar,
}

/// Largest distance from the local origin to any vertex.
pub fn max_radius_of(poly: &[Vec2]) -> Scalar {
    poly.iter().map(|p| p.length()).fold(0.0, f64::max)
}

impl ChassisGeometry {
    pub fn new(polygon: Vec<Vec2>, mass: Scalar, com: Vec2, z_min: Scalar, z_max: Scalar) -> VehicleResult<Self> {
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(VehicleError::config(format!("chassis mass must be positive, got {mass}")));
        }
        if !com.is_finite() {
            return Err(VehicleError::config("chassis center of mass is not finite"));
        }
        if !(z_min.is_finite() && z_max.is_finite()) || z_max < z_min {
            return Err(VehicleError::config(format!("invalid chassis z-range [{z_min}, {z_max}]")));
        }
        let mut g = Self { polygon: Vec::new(), mass, com, z_min, z_max, max_radius: 0.0 };
        g.set_polygon(polygon)?;
        Ok(g)
    }

    /// Replaces the outline and recomputes the bounding radius.
    pub fn set_polygon(&mut self, polygon: Vec<Vec2>) -> VehicleResult<()> {
        if polygon.len() < 3 {
            return Err(VehicleError::config(format!("chassis polygon needs >= 3 vertices, got {}", polygon.len())));
        }
        if polygon.iter().any(|p| !p.is_finite()) {
            return Err(VehicleError::config("chassis polygon has non-finite vertices"));
        }
        self.max_radius = max_radius_of(&polygon);
        self.polygon = polygon;
        Ok(())
    }

    #[inline] pub fn polygon(&self) -> &[Vec2] { &self.polygon }
    #[inline] pub fn mass(&self) -> Scalar { self.mass }
    #[inline] pub fn com(&self) -> Vec2 { self.com }
    #[inline] pub fn z_min(&self) -> Scalar { self.z_min }
    #[inline] pub fn z_max(&self) -> Scalar { self.z_max }
    #[inline] pub fn max_radius(&self) -> Scalar { self.max_radius }

    /// Lamina props of the outline, with the COM moved to the configured
    /// one and the inertia taken about it.
    pub fn mass_props(&self) -> MassProps {
        let outline = MassProps::from_polygon(&self.polygon, self.mass);
        let inertia = outline.inertia + self.mass * (outline.com - self.com).length_squared();
        MassProps { com: self.com, inertia, ..outline }
    }
}

impl Default for ChassisGeometry {
    fn default() -> Self {
        let polygon = vec![vec2(-0.4, -0.5), vec2(-0.4, 0.5), vec2(0.6, 0.5), vec2(0.6, -0.5)];
        let max_radius = max_radius_of(&polygon);
        Self { polygon, mass: 15.0, com: Vec2::ZERO, z_min: 0.05, z_max: 0.6, max_radius }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn diamond_has_unit_radius() {
        let g = ChassisGeometry::new(
            vec![vec2(1.0, 0.0), vec2(0.0, 1.0), vec2(-1.0, 0.0), vec2(0.0, -1.0)],
            10.0, Vec2::ZERO, 0.0, 0.5,
        ).unwrap();
        assert_eq!(g.max_radius(), 1.0);
    }

    #[test]
    fn radius_follows_polygon_replacement() {
        let mut g = ChassisGeometry::default();
        let before = g.max_radius();
        g.set_polygon(vec![vec2(3.0, 0.0), vec2(0.0, 4.0), vec2(-1.0, -1.0)]).unwrap();
        assert_ne!(before, g.max_radius());
        assert_relative_eq!(g.max_radius(), 4.0);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(ChassisGeometry::new(vec![vec2(0.0, 0.0), vec2(1.0, 0.0)], 1.0, Vec2::ZERO, 0.0, 1.0).is_err());
        assert!(ChassisGeometry::new(ChassisGeometry::default().polygon().to_vec(), 0.0, Vec2::ZERO, 0.0, 1.0).is_err());
        assert!(ChassisGeometry::new(ChassisGeometry::default().polygon().to_vec(), 1.0, Vec2::ZERO, 1.0, 0.0).is_err());
        let mut g = ChassisGeometry::default();
        let r = g.max_radius();
        assert!(g.set_polygon(vec![vec2(f64::NAN, 0.0), vec2(1.0, 0.0), vec2(0.0, 1.0)]).is_err());
        assert_eq!(g.max_radius(), r);
    }

    #[test]
    fn moved_com_shifts_inertia() {
        let square = vec![vec2(-1.0, -1.0), vec2(1.0, -1.0), vec2(1.0, 1.0), vec2(-1.0, 1.0)];
        let centred = ChassisGeometry::new(square.clone(), 6.0, Vec2::ZERO, 0.0, 1.0).unwrap().mass_props();
        let moved = ChassisGeometry::new(square, 6.0, vec2(0.5, 0.0), 0.0, 1.0).unwrap().mass_props();
        // m (a^2 + b^2) / 12 with a = b = 2
        assert_relative_eq!(centred.inertia, 4.0, epsilon = 1e-12);
        assert_relative_eq!(moved.inertia, 4.0 + 6.0 * 0.25, epsilon = 1e-12);
        assert_eq!(moved.com, vec2(0.5, 0.0));
    }

    proptest! {
        #[test]
        fn radius_is_max_vertex_distance(pts in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 3..16)) {
            let poly: Vec<Vec2> = pts.iter().map(|&(x, y)| vec2(x, y)).collect();
            let g = ChassisGeometry::new(poly.clone(), 1.0, Vec2::ZERO, 0.0, 1.0).unwrap();
            let expect = poly.iter().map(|p| (p.x * p.x + p.y * p.y).sqrt()).fold(0.0, f64::max);
            prop_assert!((g.max_radius() - expect).abs() < 1e-12);
            prop_assert!(poly.iter().all(|p| p.length() <= g.max_radius()));
        }
    }
}
