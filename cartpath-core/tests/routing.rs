use cartpath_core::prelude::*;
use geo::Coord;

fn section(id: &str, kind: SectionKind, x: f64, y: f64, connections: &[&str]) -> Section {
    Section {
        id: id.to_string(),
        name: id.to_string(),
        x,
        y,
        width: 10.0,
        height: 8.0,
        kind,
        categories: Vec::new(),
        crowd_level: CrowdLevel::Low,
        crowd_factor: 1.0,
        color: None,
        connections: connections.iter().map(ToString::to_string).collect(),
    }
}

/// Entrance, produce, dairy and checkout with every link authored both ways
fn small_store() -> StoreGraph {
    let sections = vec![
        section("entrance", SectionKind::Entrance, 50.0, 90.0, &["produce", "dairy"]),
        section("produce", SectionKind::Section, 20.0, 70.0, &["entrance", "checkout"]),
        section("dairy", SectionKind::Section, 75.0, 70.0, &["entrance", "checkout"]),
        section("checkout", SectionKind::Checkout, 50.0, 5.0, &["produce", "dairy"]),
    ];
    let config = StoreGraphConfig {
        adjacency: AdjacencyMode::Directed,
        fallback_section: "produce".to_string(),
        ..Default::default()
    };
    create_store_graph(sections, &config).unwrap()
}

fn dist(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

#[test]
fn test_small_store_scenario() {
    let graph = small_store();
    let items = [
        CartItem::new("Apples", "Fruits").in_section("produce"),
        CartItem::new("Milk", "Dairy").in_section("dairy"),
    ];
    let route = graph.build_route(&items, &CrowdLevels::new());

    let visited: Vec<_> = route.steps.iter().map(|s| s.section_id.as_str()).collect();
    // Produce is 36.1 away from the entrance, dairy 32.0
    assert_eq!(visited, vec!["dairy", "produce", "checkout"]);

    // entrance -> dairy, dairy -> checkout -> produce, produce -> checkout
    let entrance = (50.0, 90.0);
    let produce = (20.0, 70.0);
    let dairy = (75.0, 70.0);
    let checkout = (50.0, 5.0);
    let dairy_to_produce = dist(dairy, entrance) + dist(entrance, produce);
    let dairy_to_produce_via_checkout = dist(dairy, checkout) + dist(checkout, produce);
    let second_leg = dairy_to_produce.min(dairy_to_produce_via_checkout);
    let expected = dist(entrance, dairy) + second_leg + dist(produce, checkout);

    assert!((route.total_distance - expected).abs() < 1e-9);
    assert_eq!(route.steps[0].items, vec!["Milk".to_string()]);
    assert_eq!(route.steps[1].items, vec!["Apples".to_string()]);
    assert_eq!(route.steps[1].instructions, "From dairy, go to produce");
}

#[test]
fn test_route_totals_are_sums_of_legs() {
    let graph = StoreGraph::default_layout();
    let items = [
        CartItem::new("Milk", "Milk"),
        CartItem::new("Steak", "Meat"),
        CartItem::new("Peas", "Frozen Meals"),
        CartItem::new("Soap", "Cleaning"),
        CartItem::new("Cola", "Soda"),
    ];
    let route = graph.build_route(&items, &CrowdLevels::new());

    // Five distinct sections, all reachable, plus checkout
    assert_eq!(route.steps.len(), 6);

    let distance: f64 = route.steps.iter().map(|s| s.distance).sum();
    let time: u32 = route.steps.iter().map(|s| s.estimated_time).sum();
    assert!((route.total_distance - distance).abs() < 1e-9);
    assert_eq!(route.total_time, time);
    assert!(route.steps.iter().all(|s| s.distance >= 0.0));
    assert!(
        (polyline_length(&route.path) - route.total_distance).abs() < 1e-9,
        "stitched path must cover exactly the legs"
    );
}

#[test]
fn test_find_path_is_deterministic() {
    let graph = StoreGraph::default_layout();
    let crowd = CrowdLevels::from([("main-aisle-1".to_string(), 1.7), ("deli".to_string(), 2.2)]);

    let first = graph.find_path("entrance", "frozen", &crowd);
    for _ in 0..10 {
        assert_eq!(graph.find_path("entrance", "frozen", &crowd), first);
    }
}

#[test]
fn test_paths_follow_graph_edges() {
    let graph = StoreGraph::default_layout();
    let crowd = CrowdLevels::new();
    let nodes = graph.expand_walk_nodes();
    let coord_to_id = |c: &Coord<f64>| {
        nodes
            .iter()
            .find(|n| n.coord() == *c && n.is_center())
            .map(|n| n.id.clone())
            .unwrap()
    };

    for start in graph.sections() {
        for goal in graph.sections() {
            let path = graph.find_path(&start.id, &goal.id, &crowd);
            assert!(!path.is_empty(), "{} -> {}", start.id, goal.id);
            assert_eq!(path.first(), Some(&start.center()));
            assert_eq!(path.last(), Some(&goal.center()));

            for pair in path.windows(2) {
                let from = coord_to_id(&pair[0]);
                let to = coord_to_id(&pair[1]);
                assert!(graph.neighbors(&from).contains(&to.as_str()));
            }
        }
    }
}

#[test]
fn test_unreachable_sections_are_dropped() {
    let mut sections = default_sections();
    sections.push(Section {
        id: "pharmacy".to_string(),
        name: "Pharmacy".to_string(),
        x: 90.0,
        y: 90.0,
        width: 10.0,
        height: 10.0,
        kind: SectionKind::Section,
        categories: vec!["Medicine".to_string()],
        crowd_level: CrowdLevel::Low,
        crowd_factor: 1.0,
        color: None,
        connections: Vec::new(),
    });
    let graph = create_store_graph(sections, &StoreGraphConfig::default()).unwrap();

    assert!(graph.find_path("entrance", "pharmacy", &CrowdLevels::new()).is_empty());

    let items = [
        CartItem::new("Aspirin", "Medicine"),
        CartItem::new("Bread", "Bakery"),
    ];
    let route = graph.build_route(&items, &CrowdLevels::new());

    let visited: Vec<_> = route.steps.iter().map(|s| s.section_id.as_str()).collect();
    assert_eq!(visited, vec!["deli", "checkout"]);
}

#[test]
fn test_directed_layout_routes_one_way() {
    let config = StoreGraphConfig {
        adjacency: AdjacencyMode::Directed,
        ..Default::default()
    };
    let graph = create_store_graph(default_sections(), &config).unwrap();

    // The authored data never links back into the entrance except from aisle 1
    assert!(!graph.find_path("deli", "entrance", &CrowdLevels::new()).is_empty());
    assert!(graph.neighbors("entrance").contains(&"produce"));
    assert!(!graph.neighbors("produce").contains(&"entrance"));
}

#[test]
fn test_live_crowd_levels_feed_routing() {
    let graph = StoreGraph::default_layout();
    let crowd = graph.current_crowd_levels();
    let items = [CartItem::new("Yogurt", "Yogurt"), CartItem::new("Chips", "Chips")];

    let route = graph.build_route(&items, &crowd);
    assert_eq!(route.steps.len(), 3);
    assert!(route.total_time > 0);

    let smoothed = route.smoothed_path();
    assert_eq!(smoothed.len(), route.path.len());
    assert_eq!(smoothed.first(), route.path.first());
    assert_eq!(smoothed.last(), route.path.last());
}
