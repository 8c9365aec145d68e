use roverphys_core::{Scalar, Vec2};

/// Planar mass properties of a body, inertia taken about the COM.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MassProps {
    pub mass: Scalar,
    pub inv_mass: Scalar,
    pub com: Vec2,
    pub inertia: Scalar,
}

impl MassProps {
    /// Uniform lamina with the given polygon outline and total mass.
    pub fn from_polygon(poly: &[Vec2], mass: Scalar) -> Self {
        let com = polygon_centroid(poly);
        let i_origin = polygon_inertia_about_origin(poly, mass);
        // parallel axis back to the centroid
        let inertia = (i_origin - mass * com.length_squared()).max(0.0);
        Self { mass, inv_mass: if mass > 0.0 { 1.0 / mass } else { 0.0 }, com, inertia }
    }

    /// Point masses added rigidly to `self`; returns the combined props.
    pub fn with_point_masses(&self, pts: &[(Vec2, Scalar)]) -> Self {
        let extra: Scalar = pts.iter().map(|(_, m)| m).sum();
        let total = self.mass + extra;
        if total <= 0.0 { return *self; }
        let com = (self.com * self.mass + pts.iter().fold(Vec2::ZERO, |a, (p, m)| a + *p * *m)) / total;
        let mut inertia = self.inertia + self.mass * (self.com - com).length_squared();
        for (p, m) in pts { inertia += m * (*p - com).length_squared(); }
        Self { mass: total, inv_mass: 1.0 / total, com, inertia }
    }
}

/// Signed area (positive for counter-clockwise winding).
pub fn polygon_area(poly: &[Vec2]) -> Scalar {
    let n = poly.len();
    if n < 3 { return 0.0; }
    let mut a = 0.0;
    for i in 0..n {
        let p = poly[i];
        let q = poly[(i + 1) % n];
        a += p.perp_dot(q);
    }
    0.5 * a
}

/// Area centroid; falls back to the vertex mean for degenerate outlines.
pub fn polygon_centroid(poly: &[Vec2]) -> Vec2 {
    let n = poly.len();
    if n == 0 { return Vec2::ZERO; }
    let a = polygon_area(poly);
    if a.abs() < 1e-12 {
        return poly.iter().fold(Vec2::ZERO, |s, p| s + *p) / n as f64;
    }
    let mut c = Vec2::ZERO;
    for i in 0..n {
        let p = poly[i];
        let q = poly[(i + 1) % n];
        c += (p + q) * p.perp_dot(q);
    }
    c / (6.0 * a)
}

/// Polar moment of inertia about the local origin for a uniform lamina.
pub fn polygon_inertia_about_origin(poly: &[Vec2], mass: Scalar) -> Scalar {
    let n = poly.len();
    let a = polygon_area(poly);
    if n < 3 || a.abs() < 1e-12 { return 0.0; }
    let mut num = 0.0;
    for i in 0..n {
        let p = poly[i];
        let q = poly[(i + 1) % n];
        num += p.perp_dot(q) * (p.dot(p) + p.dot(q) + q.dot(q));
    }
    let density = mass / a.abs();
    // sign of `num` follows winding, as does `a`
    density * (num / 12.0) * a.signum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use roverphys_core::vec2;

    fn unit_square() -> Vec<Vec2> {
        vec![vec2(-0.5, -0.5), vec2(0.5, -0.5), vec2(0.5, 0.5), vec2(-0.5, 0.5)]
    }

    #[test]
    fn square_props() {
        let sq = unit_square();
        assert_relative_eq!(polygon_area(&sq), 1.0);
        let mp = MassProps::from_polygon(&sq, 6.0);
        assert_relative_eq!(mp.com.length(), 0.0);
        // m (w^2 + h^2) / 12
        assert_relative_eq!(mp.inertia, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn winding_does_not_change_inertia() {
        let mut sq = unit_square();
        let ccw = polygon_inertia_about_origin(&sq, 6.0);
        sq.reverse();
        assert_relative_eq!(polygon_inertia_about_origin(&sq, 6.0), ccw, epsilon = 1e-12);
    }

    #[test]
    fn point_masses_shift_com() {
        let body = MassProps::from_polygon(&unit_square(), 2.0);
        let all = body.with_point_masses(&[(vec2(1.0, 0.0), 2.0)]);
        assert_relative_eq!(all.mass, 4.0);
        assert_relative_eq!(all.com.x, 0.5);
        assert_relative_eq!(all.inertia, body.inertia + 2.0 * 0.25 + 2.0 * 0.25, epsilon = 1e-12);
    }
}
