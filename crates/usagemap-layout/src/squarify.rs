//! Squarified row building and row placement.
//!
//! Layout of one parent happens in two steps. [`squarify`] decides which
//! children share a row and which way each row runs. [`place_rows`] turns a
//! row arrangement plus the current weights into rectangles. Sticky re-layout
//! skips the first step and replays a stored arrangement through the second.

use crate::tree::NodeId;
use serde::{Deserialize, Serialize};
use usagemap_core::Rect;

/// Direction a row is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Spans the full height of the remaining space and takes a slice of
    /// its width from the left; children stack top to bottom.
    Column,
    /// Spans the full width of the remaining space and takes a slice of
    /// its height from the top; children run left to right.
    Row,
}

impl Axis {
    /// The axis squarify picks for a free rectangle: slice the longer side.
    #[must_use]
    pub fn for_rect(rect: &Rect) -> Self {
        if rect.dx >= rect.dy {
            Self::Column
        } else {
            Self::Row
        }
    }
}

/// A group of siblings laid out side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Children in placement order.
    pub children: Vec<NodeId>,
    /// Row direction.
    pub axis: Axis,
}

/// Worst aspect ratio of a row with total area `sum`, extreme child areas
/// `min`/`max`, laid against a side of length `side`.
fn worst_ratio(sum: f64, min: f64, max: f64, side: f64) -> f64 {
    if sum <= 0.0 || min <= 0.0 || side <= 0.0 {
        return f64::INFINITY;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    (side_sq * max / sum_sq).max(sum_sq / (side_sq * min))
}

/// Group `children` (with their weights) into squarified rows inside `rect`.
///
/// Children are taken in descending weight order, ties in sibling order.
/// Zero-weight children collect in one trailing row so that every child
/// belongs to exactly one row.
#[must_use]
pub fn squarify(children: &[(NodeId, f64)], rect: Rect) -> Vec<Row> {
    let mut sorted: Vec<(NodeId, f64)> = children.to_vec();
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let split = sorted.iter().position(|&(_, w)| w <= 0.0).unwrap_or(sorted.len());
    let (positive, zero) = sorted.split_at(split);
    let total: f64 = positive.iter().map(|&(_, w)| w).sum();

    let mut rows = Vec::new();
    if positive.is_empty() || rect.area() <= 0.0 {
        if !sorted.is_empty() {
            rows.push(Row {
                children: sorted.iter().map(|&(id, _)| id).collect(),
                axis: Axis::for_rect(&rect),
            });
        }
        return rows;
    }

    // area per unit of weight
    let scale = rect.area() / total;
    let mut remaining = rect;
    let mut remaining_weight = total;
    let mut row: Vec<(NodeId, f64)> = Vec::new();
    let (mut sum, mut min, mut max) = (0.0f64, f64::INFINITY, 0.0f64);

    for &(id, weight) in positive {
        let area = weight * scale;
        let side = remaining.dx.min(remaining.dy);
        let current = worst_ratio(sum, min, max, side);
        let candidate = worst_ratio(sum + area, min.min(area), max.max(area), side);

        if !row.is_empty() && candidate > current {
            let axis = Axis::for_rect(&remaining);
            let row_weight: f64 = row.iter().map(|&(_, w)| w).sum();
            remaining = shrink_remaining(remaining, axis, row_weight / remaining_weight);
            remaining_weight -= row_weight;
            rows.push(Row {
                children: row.iter().map(|&(id, _)| id).collect(),
                axis,
            });
            row.clear();
            sum = 0.0;
            min = f64::INFINITY;
            max = 0.0;
        }

        row.push((id, weight));
        sum += area;
        min = min.min(area);
        max = max.max(area);
    }

    if !row.is_empty() {
        rows.push(Row {
            children: row.iter().map(|&(id, _)| id).collect(),
            axis: Axis::for_rect(&remaining),
        });
    }
    if !zero.is_empty() {
        rows.push(Row {
            children: zero.iter().map(|&(id, _)| id).collect(),
            axis: Axis::for_rect(&remaining),
        });
    }
    rows
}

fn shrink_remaining(rect: Rect, axis: Axis, fraction: f64) -> Rect {
    match axis {
        Axis::Column => {
            let thickness = rect.dx * fraction;
            Rect::new(rect.x + thickness, rect.y, rect.dx - thickness, rect.dy)
        }
        Axis::Row => {
            let thickness = rect.dy * fraction;
            Rect::new(rect.x, rect.y + thickness, rect.dx, rect.dy - thickness)
        }
    }
}

/// Place `rows` inside `rect` in proportion to `weight_of`.
///
/// Each row takes the share of the remaining space equal to its share of the
/// remaining weight; the last row with weight takes whatever is left, so the
/// children tile `rect` exactly. Zero-weight children get a zero-size
/// rectangle at their slot.
pub fn place_rows<F>(rows: &[Row], rect: Rect, weight_of: F, out: &mut Vec<(NodeId, Rect)>)
where
    F: Fn(NodeId) -> f64,
{
    let row_weights: Vec<f64> = rows
        .iter()
        .map(|row| row.children.iter().map(|&c| weight_of(c)).sum())
        .collect();
    let last_weighted = row_weights.iter().rposition(|&w| w > 0.0);
    let mut remaining_weight: f64 = row_weights.iter().sum();
    let mut remaining = rect;

    for (i, row) in rows.iter().enumerate() {
        let row_weight = row_weights[i];
        let fraction = if row_weight <= 0.0 || remaining_weight <= 0.0 {
            0.0
        } else if Some(i) == last_weighted {
            1.0
        } else {
            row_weight / remaining_weight
        };

        let (band, rest) = match row.axis {
            Axis::Column => {
                let thickness = remaining.dx * fraction;
                (
                    Rect::new(remaining.x, remaining.y, thickness, remaining.dy),
                    Rect::new(
                        remaining.x + thickness,
                        remaining.y,
                        remaining.dx - thickness,
                        remaining.dy,
                    ),
                )
            }
            Axis::Row => {
                let thickness = remaining.dy * fraction;
                (
                    Rect::new(remaining.x, remaining.y, remaining.dx, thickness),
                    Rect::new(
                        remaining.x,
                        remaining.y + thickness,
                        remaining.dx,
                        remaining.dy - thickness,
                    ),
                )
            }
        };

        let mut cumulative = 0.0;
        for &child in &row.children {
            let weight = weight_of(child);
            let start = if row_weight > 0.0 { cumulative / row_weight } else { 0.0 };
            cumulative += weight;
            let end = if row_weight > 0.0 { cumulative / row_weight } else { 0.0 };

            let child_rect = match row.axis {
                Axis::Column => Rect::new(
                    band.x,
                    band.dy.mul_add(start, band.y),
                    band.dx,
                    band.dy * (end - start),
                ),
                Axis::Row => Rect::new(
                    band.dx.mul_add(start, band.x),
                    band.y,
                    band.dx * (end - start),
                    band.dy,
                ),
            };
            let child_rect = if weight > 0.0 {
                child_rect
            } else {
                Rect::new(child_rect.x, child_rect.y, 0.0, 0.0)
            };
            out.push((child, child_rect));
        }

        remaining = rest;
        remaining_weight -= row_weight;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<NodeId> {
        // NodeId has no public constructor; borrow ids from a real tree
        use crate::tree::{RawNode, UsageTree};
        let raw = RawNode::branch(
            "root",
            (0..n).map(|i| RawNode::leaf(&format!("n{i}"), 1)).collect(),
        );
        let tree = UsageTree::from_raw(&raw).unwrap();
        tree[tree.root()].children().to_vec()
    }

    fn area_sum(out: &[(NodeId, Rect)]) -> f64 {
        out.iter().map(|(_, r)| r.area()).sum()
    }

    #[test]
    fn test_axis_for_rect() {
        assert_eq!(Axis::for_rect(&Rect::new(0.0, 0.0, 10.0, 5.0)), Axis::Column);
        assert_eq!(Axis::for_rect(&Rect::new(0.0, 0.0, 5.0, 10.0)), Axis::Row);
    }

    #[test]
    fn test_classic_squarify_rows() {
        // Bruls et al. example: 6x4 with areas 6,6,4,3,2,2,1
        let ids = ids(7);
        let weights = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let children: Vec<_> = ids.iter().copied().zip(weights).collect();
        let rect = Rect::new(0.0, 0.0, 6.0, 4.0);
        let rows = squarify(&children, rect);

        let sizes: Vec<usize> = rows.iter().map(|r| r.children.len()).collect();
        assert_eq!(sizes, [2, 2, 1, 1, 1]);
        assert_eq!(rows[0].axis, Axis::Column);

        let mut out = Vec::new();
        let by_id = |id: NodeId| weights[ids.iter().position(|&i| i == id).unwrap()];
        place_rows(&rows, rect, by_id, &mut out);
        assert!((area_sum(&out) - 24.0).abs() < 1e-9);
        let first = out.iter().find(|(id, _)| *id == ids[0]).unwrap().1;
        assert!((first.dx - 3.0).abs() < 1e-9);
        assert!((first.dy - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weight_children_get_trailing_row() {
        let ids = ids(3);
        let children = vec![(ids[0], 0.0), (ids[1], 5.0), (ids[2], 0.0)];
        let rows = squarify(&children, Rect::new(0.0, 0.0, 10.0, 10.0));
        let last = rows.last().unwrap();
        assert_eq!(last.children, vec![ids[0], ids[2]]);

        let mut out = Vec::new();
        let weights = [0.0, 5.0, 0.0];
        let by_id = |id: NodeId| weights[ids.iter().position(|&i| i == id).unwrap()];
        place_rows(&rows, Rect::new(0.0, 0.0, 10.0, 10.0), by_id, &mut out);
        for (id, rect) in &out {
            if *id == ids[1] {
                assert_eq!(*rect, Rect::new(0.0, 0.0, 10.0, 10.0));
            } else {
                assert_eq!(rect.area(), 0.0);
                assert_eq!(rect.dx, 0.0);
                assert_eq!(rect.dy, 0.0);
            }
        }
    }

    #[test]
    fn test_all_zero_weights_single_row() {
        let ids = ids(2);
        let children = vec![(ids[0], 0.0), (ids[1], 0.0)];
        let rows = squarify(&children, Rect::new(0.0, 0.0, 4.0, 4.0));
        assert_eq!(rows.len(), 1);
        let mut out = Vec::new();
        place_rows(&rows, Rect::new(0.0, 0.0, 4.0, 4.0), |_| 0.0, &mut out);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|(_, r)| r.area() == 0.0));
    }

    #[test]
    fn test_replay_with_new_weights_tiles_rect() {
        let ids = ids(5);
        let children: Vec<_> = ids.iter().copied().zip([50.0, 20.0, 10.0, 10.0, 1.0]).collect();
        let rect = Rect::new(0.0, 0.0, 300.0, 200.0);
        let rows = squarify(&children, rect);

        let mut out = Vec::new();
        place_rows(&rows, rect, |_| 1.0, &mut out);
        assert_eq!(out.len(), 5);
        assert!((area_sum(&out) - 60_000.0).abs() < 1e-6);
        for (_, r) in &out {
            assert!(rect.contains_rect(r, 1e-9));
        }
    }

    #[test]
    fn test_empty_children() {
        assert!(squarify(&[], Rect::new(0.0, 0.0, 1.0, 1.0)).is_empty());
    }
}
