pub mod bounded_id_map;
pub mod slice_spec;

pub use bounded_id_map::BoundedIdMap;
pub use slice_spec::{Positions, SliceSpec};
