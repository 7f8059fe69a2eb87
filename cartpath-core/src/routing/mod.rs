//! Route planning over the store graph: A* legs, visit ordering and
//! assembly of the final navigation route.

mod assembler;
pub mod astar;
mod optimizer;
mod smoothing;
mod to_geojson;

pub use assembler::{CartItem, NavigationStep, OptimizedRoute, RouteAssembler, RouteConfig};
pub use astar::{find_path, polyline_length};
pub use optimizer::{NearestNeighbor, RouteOptimizer, VisitOrderStrategy};
pub use smoothing::smooth_path;
