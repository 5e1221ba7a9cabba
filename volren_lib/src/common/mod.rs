mod bound_box;
mod value_range;

pub use bound_box::{BoundBox, BoundBoxIterator};
pub use value_range::ValueRange;
