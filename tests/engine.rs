//! End-to-end pass over a small construction schedule: hierarchy, graph,
//! layout, critical path, connectors, and a drag-style reschedule, the way a
//! timeline surface would drive the crate on every data change.

use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use gantt_engine::{
    build_hierarchy, compute_critical_path, flatten_preorder, reschedule, route_connectors,
    DependencyGraph, PredecessorLink, RescheduleMode, Task, TimelineLayout, TimelineScale,
};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

/// Two phases with children, finish-to-start links across the phases.
fn site_project() -> Vec<Task> {
    let mut groundwork = Task::new("Groundwork", date(1), date(10));
    groundwork.sort_order = 0;
    let mut excavation = Task::new("Excavation", date(1), date(4));
    excavation.parent_id = Some(groundwork.id);
    excavation.sort_order = 0;
    let mut footings = Task::new("Footings", date(5), date(10));
    footings.parent_id = Some(groundwork.id);
    footings.sort_order = 1;
    footings.add_predecessor(PredecessorLink::finish_to_start(excavation.id));

    let mut structure = Task::new("Structure", date(11), date(24));
    structure.sort_order = 1;
    let mut frame = Task::new("Frame erection", date(11), date(20));
    frame.parent_id = Some(structure.id);
    frame.add_predecessor(PredecessorLink::finish_to_start(footings.id));
    let mut roof = Task::new("Roof", date(21), date(24));
    roof.parent_id = Some(structure.id);
    roof.sort_order = 1;
    roof.add_predecessor(PredecessorLink::finish_to_start(frame.id));

    vec![groundwork, excavation, footings, structure, frame, roof]
}

#[test]
fn full_pass_produces_consistent_outputs() {
    let tasks = site_project();
    let forest = build_hierarchy(&tasks).unwrap();
    let graph = DependencyGraph::build(&tasks);
    let layout = TimelineLayout::compute(&tasks, &forest, &HashSet::new(), TimelineScale::Weeks);
    let schedule = compute_critical_path(&graph, &tasks).unwrap();

    // Every task got a row, a bar inside the axis, and schedule data.
    assert_eq!(layout.rows().len(), tasks.len());
    for task in &tasks {
        let bar = layout.bar_for(task.id).unwrap();
        assert!(bar.left_px >= 0.0);
        assert!(bar.left_px + bar.width_px <= layout.total_width_px());
        assert!(schedule.contains_key(&task.id));
    }

    // The excavation→footings→frame→roof chain drives the project end, so
    // all four are critical.
    let critical: HashSet<Uuid> = schedule
        .iter()
        .filter(|(_, s)| s.is_critical)
        .map(|(&id, _)| id)
        .collect();
    for name in ["Excavation", "Footings", "Frame erection", "Roof"] {
        let task = tasks.iter().find(|t| t.name == name).unwrap();
        assert!(critical.contains(&task.id), "{name} should be critical");
    }

    // One connector per dependency edge, all flagged critical here.
    let connectors = route_connectors(&graph, &layout, &critical);
    assert_eq!(connectors.len(), 3);
    assert!(connectors.iter().all(|c| c.is_critical));
}

#[test]
fn preorder_rows_match_hierarchy() {
    let tasks = site_project();
    let forest = build_hierarchy(&tasks).unwrap();
    let names: Vec<&str> = flatten_preorder(&forest)
        .iter()
        .map(|node| tasks[node.task_index].name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "Groundwork",
            "Excavation",
            "Footings",
            "Structure",
            "Frame erection",
            "Roof"
        ]
    );
}

#[test]
fn reschedule_then_recompute_keeps_chain_critical() {
    let tasks = site_project();
    let graph = DependencyGraph::build(&tasks);
    let excavation = tasks.iter().find(|t| t.name == "Excavation").unwrap().id;

    // Slip excavation three days; the whole chain moves with it.
    let updated = reschedule(&tasks, &graph, excavation, date(4), RescheduleMode::Strict).unwrap();
    let footings = updated.iter().find(|t| t.name == "Footings").unwrap();
    assert_eq!(footings.start, date(8));
    let roof = updated.iter().find(|t| t.name == "Roof").unwrap();
    assert_eq!(roof.start, date(24));
    assert_eq!(roof.duration_days(), 4);

    // Recomputing on the updated set still yields a clean critical chain.
    let graph = DependencyGraph::build(&updated);
    let schedule = compute_critical_path(&graph, &updated).unwrap();
    let excavation_info = schedule[&excavation];
    assert!(excavation_info.is_critical);
    assert_eq!(excavation_info.early_start, date(4));
}

#[test]
fn collapsed_phase_hides_rows_but_not_schedule() {
    let tasks = site_project();
    let forest = build_hierarchy(&tasks).unwrap();
    let graph = DependencyGraph::build(&tasks);
    let structure = tasks.iter().find(|t| t.name == "Structure").unwrap().id;

    let collapsed: HashSet<Uuid> = [structure].into_iter().collect();
    let layout = TimelineLayout::compute(&tasks, &forest, &collapsed, TimelineScale::Days);
    assert_eq!(layout.rows().len(), 4);

    // Scheduling is independent of what is on screen.
    let schedule = compute_critical_path(&graph, &tasks).unwrap();
    assert_eq!(schedule.len(), tasks.len());

    // Connectors into the hidden subtree disappear from the render set.
    let critical: HashSet<Uuid> = HashSet::new();
    let connectors = route_connectors(&graph, &layout, &critical);
    assert_eq!(connectors.len(), 1); // only excavation → footings survives
}
