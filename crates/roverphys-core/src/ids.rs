use core::fmt;

/// Handle to a rigid body owned by the physics backend.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BodyId(pub u32);
impl fmt::Display for BodyId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "BodyId({})", self.0) } }

/// Handle to a shape attached to a backend body.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FixtureId(pub u32);
impl fmt::Display for FixtureId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "FixtureId({})", self.0) } }

/// Handle to a wheel spin joint owned by the physics backend.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct JointId(pub u32);
impl fmt::Display for JointId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "JointId({})", self.0) } }
