//! Assembly of a complete in-store route from a shopping cart

use geo::Coord;
use hashbrown::HashMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{
    astar::{find_path, polyline_length},
    optimizer::{NearestNeighbor, RouteOptimizer, VisitOrderStrategy},
    smoothing::smooth_path,
};
use crate::{
    CHECKOUT_ID, CrowdLevel, ENTRANCE_ID, Minutes, Section, SectionId, StoreGraph,
    crowd::CrowdLevels,
};

/// Cart entry as seen by the navigator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Overrides the section inferred from `category`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_section: Option<SectionId>,
}

impl CartItem {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            store_section: None,
        }
    }

    #[must_use]
    pub fn in_section(mut self, section: impl Into<SectionId>) -> Self {
        self.store_section = Some(section.into());
        self
    }
}

/// One leg of the route, ending at a section
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationStep {
    pub section_id: SectionId,
    pub section_name: String,
    pub x: f64,
    pub y: f64,
    /// Names of the cart items collected here
    pub items: Vec<String>,
    pub estimated_time: Minutes,
    pub crowd_level: CrowdLevel,
    pub distance: f64,
    pub instructions: String,
}

/// Ordered walking route through the store
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedRoute {
    pub steps: Vec<NavigationStep>,
    pub total_distance: f64,
    pub total_time: Minutes,
    /// Stitched polyline of every leg
    pub path: Vec<Coord<f64>>,
}

impl OptimizedRoute {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Polyline with [`smooth_path`] applied, for display
    pub fn smoothed_path(&self) -> Vec<Coord<f64>> {
        smooth_path(&self.path)
    }
}

/// Tunables for route assembly
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    pub entrance_id: SectionId,
    pub checkout_id: SectionId,
    /// Minutes spent picking items at each section
    pub collection_overhead: Minutes,
    /// Minutes spent queueing and paying
    pub checkout_overhead: Minutes,
    /// Layout units walked per minute
    pub distance_per_minute: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            entrance_id: ENTRANCE_ID.to_string(),
            checkout_id: CHECKOUT_ID.to_string(),
            collection_overhead: 2,
            checkout_overhead: 5,
            distance_per_minute: 10.0,
        }
    }
}

/// Builds routes for carts against one store graph
///
/// Holds no state between calls: every [`RouteAssembler::build_route`]
/// recomputes the route from its inputs.
pub struct RouteAssembler<'a, S = NearestNeighbor> {
    graph: &'a StoreGraph,
    optimizer: RouteOptimizer<'a, S>,
    config: RouteConfig,
}

impl<'a> RouteAssembler<'a, NearestNeighbor> {
    pub fn new(graph: &'a StoreGraph) -> Self {
        Self::with_config(graph, RouteConfig::default())
    }

    pub fn with_config(graph: &'a StoreGraph, config: RouteConfig) -> Self {
        Self::with_strategy(graph, config, NearestNeighbor)
    }
}

impl<'a, S: VisitOrderStrategy> RouteAssembler<'a, S> {
    pub fn with_strategy(graph: &'a StoreGraph, config: RouteConfig, strategy: S) -> Self {
        Self {
            graph,
            optimizer: RouteOptimizer::with_strategy(graph, strategy),
            config,
        }
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// Builds the walking route for `items`
    ///
    /// Sections the graph does not know and legs without a path are left
    /// out of the route. A checkout leg is always attempted last. An empty
    /// cart gives an empty route.
    pub fn build_route(&self, items: &[CartItem], crowd_levels: &CrowdLevels) -> OptimizedRoute {
        let groups = self.group_items(items);
        if groups.is_empty() {
            return OptimizedRoute::default();
        }

        let destinations: Vec<SectionId> = groups.iter().map(|(id, _)| id.clone()).collect();
        let order = self
            .optimizer
            .order_stops(&self.config.entrance_id, &destinations, crowd_levels);
        let mut items_by_section: HashMap<SectionId, Vec<String>> = groups.into_iter().collect();

        let mut route = OptimizedRoute::default();
        let mut current = self.config.entrance_id.clone();
        let mut previous: Option<&Section> = None;

        for section_id in order {
            let Some(section) = self.graph.section_by_id(&section_id) else {
                warn!("Cart section {section_id} is not part of the store layout");
                continue;
            };

            let path = find_path(self.graph, &current, &section_id, crowd_levels);
            if path.is_empty() {
                debug!("Skipping unreachable leg {current} -> {section_id}");
                continue;
            }

            let distance = polyline_length(&path);
            let crowd_factor = self.graph.crowd_factor(&section_id, crowd_levels);
            let estimated_time = self
                .walking_minutes(distance * crowd_factor)
                .saturating_add(self.config.collection_overhead);

            let instructions = match previous {
                None => format!("Start at entrance, then go to {}", section.name),
                Some(prev) => format!("From {}, go to {}", prev.name, section.name),
            };

            let items = items_by_section.remove(&section_id).unwrap_or_default();
            route.push_leg(step(section, items, estimated_time, distance, instructions), path);

            current = section_id;
            previous = Some(section);
        }

        self.push_checkout_leg(&mut route, &current, crowd_levels);
        route
    }

    fn push_checkout_leg(&self, route: &mut OptimizedRoute, from: &str, crowd_levels: &CrowdLevels) {
        let checkout_id = &self.config.checkout_id;
        let path = find_path(self.graph, from, checkout_id, crowd_levels);
        let Some(checkout) = self.graph.section_by_id(checkout_id).filter(|_| !path.is_empty())
        else {
            debug!("No path from {from} to checkout {checkout_id}");
            return;
        };

        let distance = polyline_length(&path);
        let estimated_time = self
            .walking_minutes(distance)
            .saturating_add(self.config.checkout_overhead);
        let instructions = "Proceed to checkout when ready".to_string();

        route.push_leg(
            step(checkout, Vec::new(), estimated_time, distance, instructions),
            path,
        );
    }

    /// Groups item names by resolved section, in order of first appearance
    fn group_items(&self, items: &[CartItem]) -> Vec<(SectionId, Vec<String>)> {
        let mut groups: Vec<(SectionId, Vec<String>)> = Vec::new();
        let mut positions: HashMap<SectionId, usize> = HashMap::new();

        for item in items {
            let section_id = item
                .store_section
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| self.graph.category_to_section(&item.category));

            match positions.get(section_id) {
                Some(&idx) => groups[idx].1.push(item.name.clone()),
                None => {
                    positions.insert(section_id.to_string(), groups.len());
                    groups.push((section_id.to_string(), vec![item.name.clone()]));
                }
            }
        }

        groups
    }

    /// Float to int casts saturate, so huge crowd factors cap at `Minutes::MAX`
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn walking_minutes(&self, weighted_distance: f64) -> Minutes {
        (weighted_distance.max(0.0) / self.config.distance_per_minute).ceil() as Minutes
    }
}

fn step(
    section: &Section,
    items: Vec<String>,
    estimated_time: Minutes,
    distance: f64,
    instructions: String,
) -> NavigationStep {
    NavigationStep {
        section_id: section.id.clone(),
        section_name: section.name.clone(),
        x: section.x,
        y: section.y,
        items,
        estimated_time,
        crowd_level: section.crowd_level,
        distance,
        instructions,
    }
}

impl OptimizedRoute {
    /// Appends a leg, dropping the path point shared with the previous leg
    fn push_leg(&mut self, step: NavigationStep, path: Vec<Coord<f64>>) {
        let skip = usize::from(!self.path.is_empty());
        self.path.extend(path.into_iter().skip(skip));
        self.total_distance += step.distance;
        self.total_time = self.total_time.saturating_add(step.estimated_time);
        self.steps.push(step);
    }
}

impl StoreGraph {
    /// Builds a route with default settings, see [`RouteAssembler::build_route`]
    pub fn build_route(&self, items: &[CartItem], crowd_levels: &CrowdLevels) -> OptimizedRoute {
        RouteAssembler::new(self).build_route(items, crowd_levels)
    }
}
