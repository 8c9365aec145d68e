use log::trace;
use roverphys_core::{BodyId, FixtureId, JointId, Pose, Scalar, Vec2};
use roverphys_geom::MassProps;
use crate::backend::{BodyDesc, FixtureDesc, PhysicsBackend, WheelJointDesc};

struct Fixture {
    body: u32,
    polygon: Vec<Vec2>,
    mass: Scalar,
}

struct WheelJoint {
    body: u32,
    inv_inertia: Scalar,
    speed: Scalar,
    torque: Scalar,
}

/// Planar rigid-body world: SoA body storage with ID = index semantics.
///
/// Bodies are integrated about their COM with semi-implicit Euler; wheel
/// joints only carry a spin DOF. Accumulated forces/torques are cleared
/// after every `step`. Destroyed bodies keep their slot, so other IDs stay
/// valid; they and their joints are no longer integrated.
pub struct PlanarWorld {
    // COM state, world frame
    com_pos: Vec<Vec2>,
    angle: Vec<Scalar>,
    com_vel: Vec<Vec2>,
    angvel: Vec<Scalar>,
    local_com: Vec<Vec2>,
    inv_mass: Vec<Scalar>,
    inv_inertia: Vec<Scalar>,
    dynamic: Vec<bool>,
    live: Vec<bool>,
    mass_overridden: Vec<bool>,
    force: Vec<Vec2>,
    torque: Vec<Scalar>,

    fixtures: Vec<Fixture>,
    joints: Vec<WheelJoint>,

    linear_damping: Scalar,
    angular_damping: Scalar,
    steps: u64,
}

impl PlanarWorld {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            com_pos: Vec::with_capacity(cap),
            angle: Vec::with_capacity(cap),
            com_vel: Vec::with_capacity(cap),
            angvel: Vec::with_capacity(cap),
            local_com: Vec::with_capacity(cap),
            inv_mass: Vec::with_capacity(cap),
            inv_inertia: Vec::with_capacity(cap),
            dynamic: Vec::with_capacity(cap),
            live: Vec::with_capacity(cap),
            mass_overridden: Vec::with_capacity(cap),
            force: Vec::with_capacity(cap),
            torque: Vec::with_capacity(cap),
            fixtures: Vec::new(),
            joints: Vec::new(),
            linear_damping: 0.0,
            angular_damping: 0.0,
            steps: 0,
        }
    }

    pub fn new() -> Self { Self::with_capacity(16) }

    /// Velocity-proportional damping applied every step (1/s).
    pub fn with_damping(mut self, linear: Scalar, angular: Scalar) -> Self {
        self.linear_damping = linear.max(0.0);
        self.angular_damping = angular.max(0.0);
        self
    }

    #[inline] pub fn num_bodies(&self) -> usize { self.com_pos.len() }
    pub fn num_live_bodies(&self) -> usize { self.live.iter().filter(|l| **l).count() }
    #[inline] pub fn is_live(&self, body: BodyId) -> bool { self.live[body.0 as usize] }
    #[inline] pub fn num_fixtures(&self) -> usize { self.fixtures.len() }
    #[inline] pub fn num_joints(&self) -> usize { self.joints.len() }
    #[inline] pub fn steps_taken(&self) -> u64 { self.steps }

    pub fn mass_of(&self, body: BodyId) -> Scalar {
        let im = self.inv_mass[body.0 as usize];
        if im > 0.0 { 1.0 / im } else { f64::INFINITY }
    }

    #[inline]
    fn rot(&self, i: usize) -> Vec2 { Vec2::from_angle(self.angle[i]) }

    /// Box2D-style reset: mass and inertia from the attached fixtures.
    fn recompute_mass_from_fixtures(&mut self, i: usize) {
        if self.mass_overridden[i] { return; }
        let parts: Vec<MassProps> = self.fixtures.iter()
            .filter(|f| f.body as usize == i && f.mass > 0.0)
            .map(|f| MassProps::from_polygon(&f.polygon, f.mass))
            .collect();
        let total: Scalar = parts.iter().map(|p| p.mass).sum();
        if total <= 0.0 { return; }
        let com = parts.iter().fold(Vec2::ZERO, |a, p| a + p.com * p.mass) / total;
        let inertia: Scalar = parts.iter().map(|p| p.inertia + p.mass * (p.com - com).length_squared()).sum();
        self.write_mass(i, total, com, inertia);
    }

    fn write_mass(&mut self, i: usize, mass: Scalar, local_com: Vec2, inertia: Scalar) {
        let origin = self.com_pos[i] - self.rot(i).rotate(self.local_com[i]);
        let v_origin = self.origin_velocity(i);
        self.local_com[i] = local_com;
        self.com_pos[i] = origin + self.rot(i).rotate(local_com);
        self.inv_mass[i] = if self.dynamic[i] && mass > 0.0 { 1.0 / mass } else { 0.0 };
        self.inv_inertia[i] = if self.dynamic[i] && inertia > 0.0 { 1.0 / inertia } else { 0.0 };
        self.set_origin_velocity(i, v_origin, self.angvel[i]);
    }

    fn origin_velocity(&self, i: usize) -> Vec2 {
        let r = -self.rot(i).rotate(self.local_com[i]);
        self.com_vel[i] + Vec2::new(-self.angvel[i] * r.y, self.angvel[i] * r.x)
    }

    fn set_origin_velocity(&mut self, i: usize, v: Vec2, w: Scalar) {
        let r = self.rot(i).rotate(self.local_com[i]);
        self.angvel[i] = w;
        self.com_vel[i] = v + Vec2::new(-w * r.y, w * r.x);
    }
}

impl Default for PlanarWorld {
    fn default() -> Self { Self::new() }
}

impl PhysicsBackend for PlanarWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyId {
        self.com_pos.push(desc.pose.position());
        self.angle.push(desc.pose.yaw);
        self.com_vel.push(desc.linvel);
        self.angvel.push(desc.angvel);
        self.local_com.push(Vec2::ZERO);
        // unit mass until fixtures or explicit mass data arrive
        self.inv_mass.push(if desc.dynamic { 1.0 } else { 0.0 });
        self.inv_inertia.push(if desc.dynamic { 1.0 } else { 0.0 });
        self.dynamic.push(desc.dynamic);
        self.live.push(true);
        self.mass_overridden.push(false);
        self.force.push(Vec2::ZERO);
        self.torque.push(0.0);
        BodyId((self.com_pos.len() as u32) - 1)
    }

    fn create_fixture(&mut self, body: BodyId, desc: FixtureDesc) -> FixtureId {
        self.fixtures.push(Fixture { body: body.0, polygon: desc.polygon, mass: desc.mass });
        self.recompute_mass_from_fixtures(body.0 as usize);
        FixtureId((self.fixtures.len() as u32) - 1)
    }

    fn set_mass_data(&mut self, body: BodyId, mass: Scalar, local_com: Vec2, inertia: Scalar) {
        let i = body.0 as usize;
        self.mass_overridden[i] = true;
        self.write_mass(i, mass, local_com, inertia);
    }

    fn create_wheel_joint(&mut self, body: BodyId, desc: WheelJointDesc) -> JointId {
        let inv_inertia = if desc.inertia > 0.0 { 1.0 / desc.inertia } else { 0.0 };
        self.joints.push(WheelJoint { body: body.0, inv_inertia, speed: desc.initial_speed, torque: 0.0 });
        JointId((self.joints.len() as u32) - 1)
    }

    fn apply_force(&mut self, body: BodyId, force: Vec2, point: Vec2) {
        let i = body.0 as usize;
        self.force[i] += force;
        self.torque[i] += (point - self.com_pos[i]).perp_dot(force);
    }

    fn apply_torque(&mut self, body: BodyId, torque: Scalar) {
        self.torque[body.0 as usize] += torque;
    }

    fn apply_joint_torque(&mut self, joint: JointId, torque: Scalar) {
        self.joints[joint.0 as usize].torque += torque;
    }

    fn step(&mut self, dt: Scalar) {
        for i in 0..self.num_bodies() {
            if self.dynamic[i] {
                self.com_vel[i] += self.force[i] * (self.inv_mass[i] * dt);
                self.angvel[i] += self.torque[i] * self.inv_inertia[i] * dt;
                if self.linear_damping > 0.0 { self.com_vel[i] *= 1.0 / (1.0 + dt * self.linear_damping); }
                if self.angular_damping > 0.0 { self.angvel[i] *= 1.0 / (1.0 + dt * self.angular_damping); }
                self.com_pos[i] += self.com_vel[i] * dt;
                self.angle[i] += self.angvel[i] * dt;
            }
            self.force[i] = Vec2::ZERO;
            self.torque[i] = 0.0;
        }
        let live = &self.live;
        for j in self.joints.iter_mut().filter(|j| live[j.body as usize]) {
            j.speed += j.torque * j.inv_inertia * dt;
        }
        for j in &mut self.joints { j.torque = 0.0; }
        self.steps += 1;
        trace!("planar world step {} dt={dt}", self.steps);
    }

    fn clear_forces(&mut self) {
        self.force.iter_mut().for_each(|f| *f = Vec2::ZERO);
        self.torque.iter_mut().for_each(|t| *t = 0.0);
        for j in &mut self.joints { j.torque = 0.0; }
    }

    fn destroy_body(&mut self, body: BodyId) {
        let i = body.0 as usize;
        if !self.live[i] { return; }
        self.live[i] = false;
        self.dynamic[i] = false;
        self.inv_mass[i] = 0.0;
        self.inv_inertia[i] = 0.0;
        self.com_vel[i] = Vec2::ZERO;
        self.angvel[i] = 0.0;
        self.force[i] = Vec2::ZERO;
        self.torque[i] = 0.0;
        for j in self.joints.iter_mut().filter(|j| j.body == body.0) { j.speed = 0.0; }
        trace!("planar world: destroyed body {}", body.0);
    }

    fn transform(&self, body: BodyId) -> Pose {
        let i = body.0 as usize;
        let origin = self.com_pos[i] - self.rot(i).rotate(self.local_com[i]);
        Pose::planar(origin.x, origin.y, self.angle[i])
    }

    fn velocity(&self, body: BodyId) -> (Vec2, Scalar) {
        let i = body.0 as usize;
        (self.origin_velocity(i), self.angvel[i])
    }

    fn joint_speed(&self, joint: JointId) -> Scalar { self.joints[joint.0 as usize].speed }

    fn set_transform(&mut self, body: BodyId, pose: Pose) {
        let i = body.0 as usize;
        self.angle[i] = pose.yaw;
        self.com_pos[i] = pose.position() + self.rot(i).rotate(self.local_com[i]);
    }

    fn set_velocity(&mut self, body: BodyId, linvel: Vec2, angvel: Scalar) {
        self.set_origin_velocity(body.0 as usize, linvel, angvel);
    }

    fn set_joint_speed(&mut self, joint: JointId, speed: Scalar) {
        self.joints[joint.0 as usize].speed = speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use roverphys_core::vec2;

    fn square() -> Vec<Vec2> { vec![vec2(-1.0, -1.0), vec2(1.0, -1.0), vec2(1.0, 1.0), vec2(-1.0, 1.0)] }

    #[test]
    fn free_body_keeps_velocity() {
        let mut w = PlanarWorld::new();
        let b = w.create_body(BodyDesc { linvel: vec2(1.0, 0.0), ..Default::default() });
        w.create_fixture(b, FixtureDesc { polygon: square(), mass: 4.0, friction: 0.5 });
        for _ in 0..10 { w.step(0.1); }
        let p = w.transform(b);
        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w.velocity(b).0.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn off_center_force_spins() {
        let mut w = PlanarWorld::new();
        let b = w.create_body(BodyDesc::default());
        w.set_mass_data(b, 2.0, Vec2::ZERO, 1.0);
        w.apply_force(b, vec2(0.0, 1.0), vec2(1.0, 0.0));
        w.step(1.0);
        let (v, om) = w.velocity(b);
        assert_abs_diff_eq!(v.y, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(om, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn com_offset_keeps_origin_in_place() {
        let mut w = PlanarWorld::new();
        let b = w.create_body(BodyDesc { pose: Pose::planar(2.0, 3.0, 0.3), ..Default::default() });
        w.set_mass_data(b, 5.0, vec2(0.2, -0.1), 1.0);
        let p = w.transform(b);
        assert_abs_diff_eq!(p.x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn joint_integrates_torque() {
        let mut w = PlanarWorld::new();
        let b = w.create_body(BodyDesc::default());
        let j = w.create_wheel_joint(b, WheelJointDesc { local_anchor: vec2(0.0, 0.5), inertia: 0.5, initial_speed: 0.0 });
        w.apply_joint_torque(j, 1.0);
        w.step(0.5);
        assert_abs_diff_eq!(w.joint_speed(j), 1.0, epsilon = 1e-12);
        w.step(0.5);
        assert_abs_diff_eq!(w.joint_speed(j), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cleared_forces_do_not_act() {
        let mut w = PlanarWorld::new();
        let b = w.create_body(BodyDesc::default());
        let j = w.create_wheel_joint(b, WheelJointDesc { local_anchor: Vec2::ZERO, inertia: 1.0, initial_speed: 0.0 });
        w.apply_force(b, vec2(3.0, 0.0), vec2(0.0, 1.0));
        w.apply_joint_torque(j, 2.0);
        w.clear_forces();
        w.step(0.1);
        assert_eq!(w.velocity(b), (Vec2::ZERO, 0.0));
        assert_eq!(w.joint_speed(j), 0.0);
    }

    #[test]
    fn destroyed_body_stops_and_keeps_other_ids() {
        let mut w = PlanarWorld::new();
        let gone = w.create_body(BodyDesc { linvel: vec2(1.0, 0.0), ..Default::default() });
        let j = w.create_wheel_joint(gone, WheelJointDesc { local_anchor: Vec2::ZERO, inertia: 1.0, initial_speed: 3.0 });
        let kept = w.create_body(BodyDesc { linvel: vec2(0.0, 2.0), ..Default::default() });
        w.destroy_body(gone);
        w.apply_joint_torque(j, 5.0);
        w.step(0.5);
        assert!(!w.is_live(gone));
        assert_eq!(w.num_live_bodies(), 1);
        assert_eq!(w.transform(gone).x, 0.0);
        assert_eq!(w.joint_speed(j), 0.0);
        assert_abs_diff_eq!(w.transform(kept).y, 1.0, epsilon = 1e-12);
    }
}
