//! In-store navigation engine.
//!
//! Turns a shopping cart into an ordered, time-estimated walking route
//! through a store laid out as a small fixed graph of sections. Search is
//! A* over crowd-weighted edges, stops are ordered by a pluggable
//! visit-order strategy (nearest neighbor by default) and the assembled
//! route always ends at checkout.

pub mod crowd;
mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use crowd::{CrowdLevels, current_crowd_levels, sample_crowd_levels};
pub use error::Error;
pub use loading::{
    AdjacencyMode, StoreGraphConfig, create_store_graph, default_sections,
    load_sections_from_json, load_sections_from_path,
};
pub use model::{CrowdLevel, Section, SectionKind, StoreGraph, WalkNode};
pub use routing::{
    CartItem, NavigationStep, OptimizedRoute, RouteAssembler, RouteConfig, RouteOptimizer,
    find_path, polyline_length, smooth_path,
};

/// Section identifier as authored in the layout data
pub type SectionId = String;

/// Estimated walking time, in minutes
pub type Minutes = u32;

/// Id of the section every route starts from
pub const ENTRANCE_ID: &str = "entrance";

/// Id of the section every route ends at
pub const CHECKOUT_ID: &str = "checkout";
