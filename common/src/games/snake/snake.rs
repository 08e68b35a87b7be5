use std::collections::{HashSet, VecDeque};

use super::types::{Direction, Point};

#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
    direction: Direction,
    pending_direction: Option<Direction>,
}

impl Snake {
    /// Builds a straight snake of `length` cells with its head at `head`,
    /// trailing away from `direction`.
    pub fn new(head: Point, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body: VecDeque<Point> = (0..length.max(1) as i32)
            .map(|i| Point::new(head.x - dx * i, head.y - dy * i))
            .collect();

        Self::from_body(body, direction)
    }

    pub fn from_body(body: impl IntoIterator<Item = Point>, direction: Direction) -> Self {
        let body: VecDeque<Point> = body.into_iter().collect();
        assert!(!body.is_empty(), "Snake body should never be empty");
        let body_set = body.iter().copied().collect();

        Self {
            body,
            body_set,
            direction,
            pending_direction: None,
        }
    }

    /// Cells from head to tail.
    pub fn body(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.body.iter().copied()
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Point {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, point: &Point) -> bool {
        self.body_set.contains(point)
    }

    /// Direction of the last move.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Replaces any earlier queued turn. Callers check for reversals.
    pub fn queue_turn(&mut self, direction: Direction) {
        self.pending_direction = Some(direction);
    }

    /// Direction the next move will take.
    pub fn heading(&self) -> Direction {
        self.pending_direction.unwrap_or(self.direction)
    }

    pub fn next_head(&self) -> Point {
        self.head().moved(self.heading())
    }

    /// Prepends `new_head` and commits the queued turn; the tail is dropped
    /// unless `grow` is set.
    pub fn advance(&mut self, new_head: Point, grow: bool) {
        self.direction = self.heading();
        self.pending_direction = None;

        self.body.push_front(new_head);
        self.body_set.insert(new_head);

        // Callers never prepend an occupied cell, so body cells are unique.
        if !grow && let Some(tail) = self.body.pop_back() {
            self.body_set.remove(&tail);
        }
    }
}
