use std::collections::VecDeque;

use crate::config::GridSize;
use crate::input::{Direction, direction_change_is_valid};

/// Grid position in logical cell coordinates (`x` is the column, `y` the row).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns this position wrapped into bounds on both axes.
    #[must_use]
    pub fn wrapped(self, bounds: GridSize) -> Self {
        Self {
            x: wrap_axis(self.x, i32::from(bounds.width)),
            y: wrap_axis(self.y, i32::from(bounds.height)),
        }
    }

    /// One step in `direction`, wrapped around the board edges.
    #[must_use]
    pub fn stepped(self, direction: Direction, bounds: GridSize) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
        .wrapped(bounds)
    }
}

fn wrap_axis(value: i32, upper_bound: i32) -> i32 {
    let wrapped = value % upper_bound;
    if wrapped < 0 {
        wrapped + upper_bound
    } else {
        wrapped
    }
}

/// Returns true when both positions name the same cell.
#[must_use]
pub fn occupies_same_position(a: Position, b: Position) -> bool {
    a.x == b.x && a.y == b.y
}

/// Head-first body segments plus the heading applied at the next tick.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    heading: Direction,
    pending_heading: Direction,
}

impl Snake {
    /// Creates the two-segment starting snake: head at `head`, second segment
    /// one cell behind it.
    #[must_use]
    pub fn new(head: Position, heading: Direction, bounds: GridSize) -> Self {
        let tail = head.stepped(heading.opposite(), bounds);
        Self::from_segments(vec![head, tail], heading)
    }

    /// Creates a snake from explicit body segments (front is head).
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, heading: Direction) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");

        Self {
            body: VecDeque::from(segments),
            heading,
            pending_heading: heading,
        }
    }

    /// Queues `requested` for the next tick unless it reverses the current
    /// heading. Only one request is held; the latest accepted one wins.
    pub fn set_heading(&mut self, requested: Direction) {
        if direction_change_is_valid(self.heading, requested) {
            self.pending_heading = requested;
        }
    }

    /// Moves one cell along the pending heading and returns the cell the
    /// tail just vacated.
    ///
    /// Every segment takes the position its predecessor held before the
    /// move. Pushing the new head and popping the old tail is that shift.
    pub fn advance(&mut self, bounds: GridSize) -> Position {
        debug_assert!(bounds.width > 0 && bounds.height > 0);

        let next_head = self.next_head_position(bounds);
        self.body.push_front(next_head);
        let vacated = self.body.pop_back().unwrap_or(next_head);

        self.heading = self.pending_heading;
        vacated
    }

    /// Appends `position` as the new tail.
    pub fn grow(&mut self, position: Position) {
        self.body.push_back(position);
    }

    /// Returns the head position for the next movement tick.
    #[must_use]
    pub fn next_head_position(&self, bounds: GridSize) -> Position {
        self.head().stepped(self.pending_heading, bounds)
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body
            .iter()
            .any(|segment| occupies_same_position(*segment, position))
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.body
            .iter()
            .skip(1)
            .any(|segment| occupies_same_position(*segment, head))
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false for a constructed snake; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Direction of the last completed move.
    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Direction the next tick will move in.
    #[must_use]
    pub fn pending_heading(&self) -> Direction {
        self.pending_heading
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
