//! Object space to view space mapping and the per-cell face geometry
//! derived from it.

mod cell;
mod plane;
mod transform;

pub use cell::{cell_faces, cell_vertices, Cell, CellGeometry, Extent, FacePlane, CELL_EPSILON};
pub use plane::Plane;
pub use transform::{Axis, SliceOrder, ViewTransform};
