pub use crate::{CHECKOUT_ID, ENTRANCE_ID};

// Re-export key components
pub use crate::crowd::{CrowdLevels, current_crowd_levels, sample_crowd_levels};
pub use crate::loading::{
    AdjacencyMode, StoreGraphConfig, create_store_graph, default_sections, load_sections_from_json,
    load_sections_from_path,
};
pub use crate::model::{CrowdLevel, Section, SectionKind, StoreGraph, WalkNode};
pub use crate::routing::{
    CartItem, NavigationStep, NearestNeighbor, OptimizedRoute, RouteAssembler, RouteConfig,
    RouteOptimizer, VisitOrderStrategy, find_path, polyline_length, smooth_path,
};

// Core scalar types
pub use crate::Minutes;
pub use crate::SectionId;
