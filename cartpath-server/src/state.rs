use std::{sync::Arc, time::Duration};

use cartpath_core::{CrowdLevels, RouteAssembler, RouteConfig, StoreGraph};
use chrono::{DateTime, Utc};
use tokio::{sync::RwLock, task::JoinHandle};
use tracing::debug;

/// Crowd levels together with the time they were sampled
#[derive(Debug, Clone)]
pub struct CrowdSnapshot {
    pub levels: CrowdLevels,
    pub updated_at: DateTime<Utc>,
}

impl CrowdSnapshot {
    fn sample(graph: &StoreGraph) -> Self {
        Self {
            levels: graph.current_crowd_levels(),
            updated_at: Utc::now(),
        }
    }
}

/// Shared state of the navigation service
pub struct AppState {
    graph: StoreGraph,
    route_config: RouteConfig,
    crowd: RwLock<CrowdSnapshot>,
}

impl AppState {
    pub fn new(graph: StoreGraph, route_config: RouteConfig) -> Self {
        let crowd = RwLock::new(CrowdSnapshot::sample(&graph));
        Self {
            graph,
            route_config,
            crowd,
        }
    }

    pub fn graph(&self) -> &StoreGraph {
        &self.graph
    }

    pub fn assembler(&self) -> RouteAssembler<'_> {
        RouteAssembler::with_config(&self.graph, self.route_config.clone())
    }

    pub async fn crowd(&self) -> CrowdSnapshot {
        self.crowd.read().await.clone()
    }

    /// Replaces the crowd snapshot with a fresh sample
    pub async fn refresh_crowd(&self) {
        let snapshot = CrowdSnapshot::sample(&self.graph);
        *self.crowd.write().await = snapshot;
        debug!("Crowd levels refreshed");
    }
}

/// Re-samples crowd levels every `every` until the task is aborted
pub fn spawn_crowd_refresh(state: Arc<AppState>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every.max(Duration::from_secs(1)));
        // The first tick completes immediately; the initial sample already exists
        interval.tick().await;
        loop {
            interval.tick().await;
            state.refresh_crowd().await;
        }
    })
}
