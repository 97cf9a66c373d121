use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::error::ScheduleError;
use crate::model::Task;

/// A node in the built work-breakdown forest.
///
/// Carries the derived depth (`level`) and the index of its task in the
/// input slice, so consumers can get back to the full record without a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNode {
    pub id: Uuid,
    /// Depth in the forest; roots are level 0, children always parent + 1.
    pub level: usize,
    /// Position of the task in the input slice.
    pub task_index: usize,
    pub children: Vec<TaskNode>,
}

/// Build a work-breakdown forest from a flat task list.
///
/// Tasks with no `parent_id`, or one that names no task in the set, become
/// roots. Siblings are ordered by `sort_order`, falling back to input order.
/// Any parent chain that revisits itself fails with `CycleDetected` carrying
/// every task on a cyclic chain; no partial forest is produced.
pub fn build_hierarchy(tasks: &[Task]) -> Result<Vec<TaskNode>, ScheduleError> {
    let index_of: HashMap<Uuid, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id, i))
        .collect();

    let cyclic = cyclic_parent_ids(tasks, &index_of);
    if !cyclic.is_empty() {
        let mut ids: Vec<Uuid> = cyclic.into_iter().collect();
        ids.sort();
        return Err(ScheduleError::CycleDetected { ids });
    }

    // Group child indices under each resolvable parent; everything else roots.
    let mut children_of: HashMap<Uuid, Vec<usize>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();
    for (i, task) in tasks.iter().enumerate() {
        match task.parent_id.filter(|p| index_of.contains_key(p)) {
            Some(parent) => children_of.entry(parent).or_default().push(i),
            None => roots.push(i),
        }
    }

    sort_siblings(&mut roots, tasks);
    for group in children_of.values_mut() {
        sort_siblings(group, tasks);
    }

    Ok(roots
        .iter()
        .map(|&i| attach(i, 0, tasks, &children_of))
        .collect())
}

/// Depth-first pre-order over the forest; the row order used by layout.
pub fn flatten_preorder(forest: &[TaskNode]) -> Vec<&TaskNode> {
    let mut out = Vec::new();
    for node in forest {
        push_preorder(node, &mut out);
    }
    out
}

fn push_preorder<'a>(node: &'a TaskNode, out: &mut Vec<&'a TaskNode>) {
    out.push(node);
    for child in &node.children {
        push_preorder(child, out);
    }
}

fn attach(
    index: usize,
    level: usize,
    tasks: &[Task],
    children_of: &HashMap<Uuid, Vec<usize>>,
) -> TaskNode {
    let task = &tasks[index];
    let children = children_of
        .get(&task.id)
        .map(|group| {
            group
                .iter()
                .map(|&child| attach(child, level + 1, tasks, children_of))
                .collect()
        })
        .unwrap_or_default();
    TaskNode {
        id: task.id,
        level,
        task_index: index,
        children,
    }
}

fn sort_siblings(group: &mut [usize], tasks: &[Task]) {
    group.sort_by_key(|&i| (tasks[i].sort_order, i));
}

/// Ids of every task sitting on a cyclic parent chain.
///
/// Walks each task's ancestor chain once, memoizing chains already proven
/// safe, so the whole check stays linear.
fn cyclic_parent_ids(tasks: &[Task], index_of: &HashMap<Uuid, usize>) -> HashSet<Uuid> {
    let mut cyclic: HashSet<Uuid> = HashSet::new();
    let mut safe: HashSet<Uuid> = HashSet::new();

    for task in tasks {
        if safe.contains(&task.id) || cyclic.contains(&task.id) {
            continue;
        }
        let mut chain: Vec<Uuid> = Vec::new();
        let mut on_chain: HashSet<Uuid> = HashSet::new();
        let mut current = Some(task.id);
        while let Some(id) = current {
            if on_chain.contains(&id) {
                // Everything from the first occurrence of `id` is the cycle.
                let cycle_start = chain.iter().position(|&c| c == id).unwrap_or(0);
                for &member in &chain[cycle_start..] {
                    cyclic.insert(member);
                }
                break;
            }
            if safe.contains(&id) || cyclic.contains(&id) {
                break;
            }
            chain.push(id);
            on_chain.insert(id);
            current = index_of
                .get(&id)
                .and_then(|&i| tasks[i].parent_id)
                .filter(|p| index_of.contains_key(p));
        }
        for &visited in &chain {
            if !cyclic.contains(&visited) {
                safe.insert(visited);
            }
        }
    }
    cyclic
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn task(name: &str) -> Task {
        Task::new(name, date(1), date(5))
    }

    fn child_of(name: &str, parent: Uuid) -> Task {
        let mut t = task(name);
        t.parent_id = Some(parent);
        t
    }

    /// Re-collect (child, parent) edges from a built forest.
    fn edges(forest: &[TaskNode]) -> Vec<(Uuid, Uuid)> {
        let mut out = Vec::new();
        fn walk(node: &TaskNode, out: &mut Vec<(Uuid, Uuid)>) {
            for child in &node.children {
                out.push((child.id, node.id));
                walk(child, out);
            }
        }
        for root in forest {
            walk(root, &mut out);
        }
        out
    }

    #[test]
    fn roundtrip_reproduces_parent_edges() {
        let a = task("Substructure");
        let b = child_of("Footings", a.id);
        let c = child_of("Slab", a.id);
        let d = child_of("Rebar", b.id);
        let e = task("Superstructure");
        let tasks = vec![a.clone(), b.clone(), c.clone(), d.clone(), e.clone()];

        let forest = build_hierarchy(&tasks).unwrap();
        let mut got = edges(&forest);
        got.sort();
        let mut want: Vec<(Uuid, Uuid)> = tasks
            .iter()
            .filter_map(|t| t.parent_id.map(|p| (t.id, p)))
            .collect();
        want.sort();
        assert_eq!(got, want);
    }

    #[test]
    fn levels_follow_depth() {
        let a = task("Phase");
        let b = child_of("Activity", a.id);
        let c = child_of("Step", b.id);
        let forest = build_hierarchy(&[a, b, c]).unwrap();

        fn check(node: &TaskNode) {
            for child in &node.children {
                assert_eq!(child.level, node.level + 1);
                check(child);
            }
        }
        for root in &forest {
            assert_eq!(root.level, 0);
            check(root);
        }
    }

    #[test]
    fn unknown_parent_becomes_root() {
        let mut orphan = task("Orphan");
        orphan.parent_id = Some(Uuid::new_v4());
        let forest = build_hierarchy(&[orphan]).unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].level, 0);
    }

    #[test]
    fn siblings_sort_by_sort_order_then_input() {
        let mut a = task("Second");
        a.sort_order = 5;
        let mut b = task("First");
        b.sort_order = 1;
        let mut c = task("Third");
        c.sort_order = 5;
        let tasks = vec![a, b, c];

        let forest = build_hierarchy(&tasks).unwrap();
        let names: Vec<usize> = forest.iter().map(|n| n.task_index).collect();
        assert_eq!(names, vec![1, 0, 2]);
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let mut t = task("Loop");
        t.parent_id = Some(t.id);
        let err = build_hierarchy(std::slice::from_ref(&t)).unwrap_err();
        assert_eq!(err, ScheduleError::CycleDetected { ids: vec![t.id] });
    }

    #[test]
    fn two_task_parent_cycle_reports_both() {
        let mut a = task("A");
        let mut b = task("B");
        a.parent_id = Some(b.id);
        b.parent_id = Some(a.id);
        let mut want = vec![a.id, b.id];
        want.sort();

        match build_hierarchy(&[a, b]) {
            Err(ScheduleError::CycleDetected { ids }) => assert_eq!(ids, want),
            other => panic!("expected CycleDetected, got {other:?}"),
        }
    }

    #[test]
    fn preorder_visits_parents_before_children() {
        let a = task("Root");
        let b = child_of("Child", a.id);
        let c = child_of("Grandchild", b.id);
        let ids = [a.id, b.id, c.id];
        let forest = build_hierarchy(&[a, b, c]).unwrap();
        let order: Vec<Uuid> = flatten_preorder(&forest).iter().map(|n| n.id).collect();
        assert_eq!(order, ids);
    }
}
