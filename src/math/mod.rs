mod aabb;
pub mod transform;

pub use aabb::AABB;
pub use transform::{compose_trs, from_column_major, from_row_major};
