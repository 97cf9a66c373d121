use std::collections::HashSet;

use uuid::Uuid;

use crate::engine::graph::DependencyGraph;
use crate::engine::layout::{TimelineLayout, ROW_HEIGHT};

/// Clearance between a connector's corners and the bar edges it leaves or
/// enters.
pub const CORNER_OFFSET: f32 = 8.0;

/// An orthogonal connector between two task bars.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub from: Uuid,
    pub to: Uuid,
    /// Polyline in pixel space; consecutive points share an x or a y.
    pub points: Vec<(f32, f32)>,
    /// True when both endpoints sit on the critical path. Rendering hint
    /// only; carries no scheduling meaning.
    pub is_critical: bool,
}

/// Route every dependency edge whose endpoints both have a visible bar.
///
/// Paths leave the predecessor at its right-edge midpoint and enter the
/// successor at its left-edge top, using only horizontal and vertical
/// segments. Edges into or out of collapsed rows are skipped.
pub fn route_connectors(
    graph: &DependencyGraph,
    layout: &TimelineLayout,
    critical: &HashSet<Uuid>,
) -> Vec<Connector> {
    let mut connectors = Vec::new();
    for edge in graph.edges() {
        let (Some(from_bar), Some(to_bar)) = (layout.bar_for(edge.from), layout.bar_for(edge.to))
        else {
            continue;
        };

        let exit = (from_bar.right_px(), from_bar.top_px + ROW_HEIGHT * 0.5);
        let entry = (to_bar.left_px, to_bar.top_px);
        let elbow_x = exit.0 + CORNER_OFFSET;

        let points = if elbow_x <= entry.0 - CORNER_OFFSET {
            // Forward: out of the predecessor, over to the successor row,
            // across into the entry.
            vec![
                exit,
                (elbow_x, exit.1),
                (elbow_x, entry.1),
                entry,
            ]
        } else {
            // Successor starts at or before the exit: swing out, run along
            // the seam above the successor row, and come in from the left.
            let approach_x = entry.0 - CORNER_OFFSET;
            let seam_y = entry.1 - CORNER_OFFSET * 0.5;
            vec![
                exit,
                (elbow_x, exit.1),
                (elbow_x, seam_y),
                (approach_x, seam_y),
                (approach_x, entry.1),
                entry,
            ]
        };

        connectors.push(Connector {
            from: edge.from,
            to: edge.to,
            points,
            is_critical: critical.contains(&edge.from) && critical.contains(&edge.to),
        });
    }
    connectors
}
