use crate::domains::coverage::aggregate::{BoundingBox, Obstacle, PathPoint, WorkArea};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Added per change of direction so that equally long routes prefer fewer corners.
const TURN_PENALTY: f64 = 1e-3;

const HORIZONTAL: usize = 0;
const VERTICAL: usize = 1;

/// How the end of one row is joined to the start of the next.
#[derive(Debug, Clone, PartialEq)]
pub enum Connector {
    /// The straight segment is clear of every obstacle.
    Direct,
    /// Axis-aligned route; holds the corner waypoints between the two endpoints.
    Routed(Vec<PathPoint>),
    /// No route inside the work area avoids the obstacles.
    Blocked,
}

/// Join `from` and `to` without entering any obstacle box.
///
/// The straight segment is kept when it is clear. Otherwise the shortest
/// axis-aligned route is searched on the grid of obstacle edges, their
/// margin-offset edges, the wall edges and the two endpoints, inside the wall.
pub fn route_connector(
    from: (f64, f64),
    to: (f64, f64),
    obstacles: &[Obstacle],
    area: &WorkArea,
    margin: f64,
) -> Connector {
    let boxes: Vec<BoundingBox> = obstacles.iter().map(Obstacle::bounding_box).collect();
    if segment_clear(from, to, &boxes) {
        return Connector::Direct;
    }
    let grid = RouteGrid::new(from, to, &boxes, area, margin);
    match grid.shortest_route(from, to, &boxes) {
        Some(corners) => Connector::Routed(
            corners.into_iter().map(|(x, y)| PathPoint::detour(x, y)).collect(),
        ),
        None => Connector::Blocked,
    }
}

fn segment_clear(a: (f64, f64), b: (f64, f64), boxes: &[BoundingBox]) -> bool {
    let segment = BoundingBox::from_corners(a.0, a.1, b.0, b.1);
    !boxes.iter().any(|bbox| segment.overlaps(bbox))
}

fn grid_lines(fixed: [f64; 4], edges: impl Iterator<Item = f64>, max: f64) -> Vec<f64> {
    let mut lines: Vec<f64> = fixed
        .into_iter()
        .chain(edges)
        .filter(|v| (0.0..=max).contains(v))
        .collect();
    lines.sort_by(|a, b| a.total_cmp(b));
    lines.dedup();
    lines
}

struct RouteGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl RouteGrid {
    fn new(
        from: (f64, f64),
        to: (f64, f64),
        boxes: &[BoundingBox],
        area: &WorkArea,
        margin: f64,
    ) -> Self {
        let xs = grid_lines(
            [0.0, area.width, from.0, to.0],
            boxes
                .iter()
                .flat_map(|b| [b.min_x, b.max_x, b.min_x - margin, b.max_x + margin]),
            area.width,
        );
        let ys = grid_lines(
            [0.0, area.height, from.1, to.1],
            boxes
                .iter()
                .flat_map(|b| [b.min_y, b.max_y, b.min_y - margin, b.max_y + margin]),
            area.height,
        );
        Self { xs, ys }
    }

    fn node(&self, p: (f64, f64)) -> Option<(usize, usize)> {
        let i = self.xs.iter().position(|&x| x == p.0)?;
        let j = self.ys.iter().position(|&y| y == p.1)?;
        Some((i, j))
    }

    fn state(&self, i: usize, j: usize, axis: usize) -> usize {
        (j * self.xs.len() + i) * 2 + axis
    }

    fn cell(&self, state: usize) -> (usize, usize) {
        let cell = state / 2;
        (cell % self.xs.len(), cell / self.xs.len())
    }

    fn point(&self, (i, j): (usize, usize)) -> (f64, f64) {
        (self.xs[i], self.ys[j])
    }

    fn neighbours(&self, i: usize, j: usize) -> Vec<(usize, usize, usize)> {
        let mut out = Vec::with_capacity(4);
        if i > 0 {
            out.push((i - 1, j, HORIZONTAL));
        }
        if i + 1 < self.xs.len() {
            out.push((i + 1, j, HORIZONTAL));
        }
        if j > 0 {
            out.push((i, j - 1, VERTICAL));
        }
        if j + 1 < self.ys.len() {
            out.push((i, j + 1, VERTICAL));
        }
        out
    }

    /// Dijkstra over (node, arrival axis); returns the corner points of the best route.
    fn shortest_route(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        boxes: &[BoundingBox],
    ) -> Option<Vec<(f64, f64)>> {
        let (si, sj) = self.node(from)?;
        let goal = self.node(to)?;

        let states = self.xs.len() * self.ys.len() * 2;
        let mut dist = vec![f64::INFINITY; states];
        let mut prev: Vec<Option<usize>> = vec![None; states];
        let mut heap = BinaryHeap::new();
        for axis in [HORIZONTAL, VERTICAL] {
            let s = self.state(si, sj, axis);
            dist[s] = 0.0;
            heap.push(Reverse((OrderedFloat(0.0), s)));
        }

        while let Some(Reverse((OrderedFloat(cost), s))) = heap.pop() {
            if cost > dist[s] {
                continue;
            }
            let (i, j) = self.cell(s);
            if (i, j) == goal {
                return Some(self.corners(&prev, s));
            }
            let here = self.point((i, j));
            for (ni, nj, axis) in self.neighbours(i, j) {
                let there = self.point((ni, nj));
                if !segment_clear(here, there, boxes) {
                    continue;
                }
                let turn = if axis != s % 2 { TURN_PENALTY } else { 0.0 };
                let next_cost = cost + (there.0 - here.0).abs() + (there.1 - here.1).abs() + turn;
                let next = self.state(ni, nj, axis);
                if next_cost < dist[next] {
                    dist[next] = next_cost;
                    prev[next] = Some(s);
                    heap.push(Reverse((OrderedFloat(next_cost), next)));
                }
            }
        }
        None
    }

    fn corners(&self, prev: &[Option<usize>], goal: usize) -> Vec<(f64, f64)> {
        let mut trail = vec![goal];
        let mut cursor = goal;
        while let Some(p) = prev[cursor] {
            trail.push(p);
            cursor = p;
        }
        trail.reverse();

        // A node is a corner when the move out of it runs on the other axis.
        trail
            .windows(2)
            .skip(1)
            .filter(|pair| pair[0] % 2 != pair[1] % 2)
            .map(|pair| self.point(self.cell(pair[0])))
            .collect()
    }
}
