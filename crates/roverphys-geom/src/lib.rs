pub mod aabb;
pub mod mass;
pub mod chassis;

pub use aabb::Aabb2;
pub use mass::{MassProps, polygon_area, polygon_centroid, polygon_inertia_about_origin};
pub use chassis::{ChassisGeometry, max_radius_of};
