//! Dependency graph export for visualization.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn progressive_graph_serializes_nodes_and_edges() {
    let farm = farm();
    let job = farm.progressive("1", 1, 20, 2);

    let graph = farm.manager.depsgraph(&job).unwrap();
    let json = serde_json::to_value(&graph).unwrap();

    let labels: Vec<&str> = json["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["label"].as_str().unwrap())
        .collect();
    // ascending priority
    assert_eq!(
        labels,
        [
            "merge-to-smpl20-frm1",
            "render-smpl11-20-frm1",
            "move-existing-output",
            "render-smpl1-10-frm1",
        ]
    );

    let edges: Vec<(u64, u64)> = json["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e["from"].as_u64().unwrap(), e["to"].as_u64().unwrap()))
        .collect();
    assert_eq!(edges.len(), 4);
    assert!(edges.contains(&(0, 1)));
    assert!(edges.contains(&(0, 2)));
    assert!(edges.contains(&(1, 3)));
    assert!(edges.contains(&(2, 3)));
}

#[test]
fn node_colors_track_task_status() {
    let farm = farm();
    let job = farm.render("1", 1);
    let worker = farm.manager.register_worker("render-01");
    farm.run_next(&worker, TaskStatus::Completed).unwrap();

    let graph = farm.manager.depsgraph(&job).unwrap();
    let relocation = graph.nodes.iter().find(|n| n.id == 0).unwrap();
    let render = graph.nodes.iter().find(|n| n.id == 1).unwrap();
    assert_eq!(relocation.color, TaskStatus::Completed.color());
    assert_eq!(render.color, TaskStatus::Queued.color());
}
