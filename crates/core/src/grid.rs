//! Grid module - the tile board
//!
//! The grid is a `width x height` board where each cell is EMPTY or holds a tile
//! type in `[0, type_count)`. Storage is a flat row-major vector (`y * width + x`).
//! Coordinates: `x` grows to the right, `y` grows downward; gravity compacts each
//! column toward `y = height - 1`.
//!
//! Out-of-bounds reads return `None` and out-of-bounds writes are ignored, so the
//! cascade code can look at neighbours near the edges without special cases.

use std::collections::BTreeSet;
use std::fmt;

use crate::rng::{SimpleRng, SpawnWeights};
use crate::types::{BoardBounds, Cell, Coord, Direction, TileType, MIN_RUN, SPAWN_MAX_TRIES};

/// Cells found in one match scan. Ordered so cascades replay identically.
pub type MatchSet = BTreeSet<Coord>;

/// One tile moved by gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct GravityMove {
    pub from: Coord,
    pub to: Coord,
}

/// One tile written into a previously EMPTY cell by a refill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Spawn {
    pub at: Coord,
    pub tile: TileType,
}

/// The game board with its spawn weights and random source.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    type_count: usize,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
    weights: SpawnWeights,
    rng: SimpleRng,
}

impl Grid {
    /// Create an EMPTY grid with uniform spawn weights.
    ///
    /// Zero dimensions and a zero type count are clamped to 1.
    pub fn new(width: usize, height: usize, type_count: usize, seed: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let type_count = type_count.clamp(1, TileType::MAX as usize + 1);
        Self {
            width,
            height,
            type_count,
            cells: vec![None; width * height],
            weights: SpawnWeights::uniform(type_count),
            rng: SimpleRng::new(seed),
        }
    }

    /// Replace the spawn weights (repaired to uniform if degenerate).
    pub fn with_weights(mut self, weights: &[f32]) -> Self {
        self.weights = SpawnWeights::from_weights(self.type_count, weights);
        self
    }

    /// Build a grid from explicit rows (`rows[y][x]`), `-1` meaning EMPTY.
    ///
    /// Width is the longest row; short rows are padded with EMPTY and values outside
    /// `[0, type_count)` become EMPTY.
    pub fn from_rows(rows: &[Vec<i32>], type_count: usize, seed: u32) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = Self::new(width, height, type_count, seed);
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                let cell = if value >= 0 && (value as usize) < grid.type_count {
                    Some(value as TileType)
                } else {
                    None
                };
                grid.set(Coord::new(x as i32, y as i32), cell);
            }
        }
        grid
    }

    /// Calculate flat index from coordinates
    #[inline(always)]
    fn index(&self, at: Coord) -> Option<usize> {
        if !self.in_bounds(at) {
            return None;
        }
        Some(at.y as usize * self.width + at.x as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn type_count(&self) -> usize {
        self.type_count
    }

    pub fn bounds(&self) -> BoardBounds {
        BoardBounds::new(self.width, self.height)
    }

    pub fn weights(&self) -> &SpawnWeights {
        &self.weights
    }

    pub fn in_bounds(&self, at: Coord) -> bool {
        self.bounds().contains(at)
    }

    /// Tile at `at`; `None` for EMPTY or out of bounds.
    pub fn get(&self, at: Coord) -> Cell {
        self.index(at).and_then(|idx| self.cells[idx])
    }

    /// Write a cell. Out of bounds is a no-op.
    pub fn set(&mut self, at: Coord, cell: Cell) {
        if let Some(idx) = self.index(at) {
            self.cells[idx] = cell;
        }
    }

    /// Exchange two cells. No-op if either is out of bounds; adjacency is not checked.
    pub fn swap(&mut self, a: Coord, b: Coord) {
        if let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) {
            self.cells.swap(ia, ib);
        }
    }

    /// Set every cell to EMPTY
    pub fn clear_all(&mut self) {
        self.cells.fill(None);
    }

    /// Flat row-major view of the cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Column-major coordinates (x outer, y inner). Fill and refill share this order.
    fn column_major(&self) -> impl Iterator<Item = Coord> {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..w).flat_map(move |x| (0..h).map(move |y| Coord::new(x, y)))
    }

    /// Populate every cell.
    ///
    /// With `avoid_immediate_matches`, each cell rejects any type that would form a
    /// run of three with the two cells before it in its row or column. Since every
    /// run's last cell is checked when placed, the finished board has no matches
    /// whenever `type_count >= 3`.
    pub fn fill_random(&mut self, avoid_immediate_matches: bool) {
        self.clear_all();
        let coords: Vec<Coord> = self.column_major().collect();
        for at in coords {
            let tile = if avoid_immediate_matches {
                self.sample_avoiding_match(at)
            } else {
                self.weights.sample(&mut self.rng)
            };
            self.set(at, Some(tile));
        }
    }

    fn sample_avoiding_match(&mut self, at: Coord) -> TileType {
        for _ in 0..SPAWN_MAX_TRIES {
            let tile = self.weights.sample(&mut self.rng);
            if !self.would_complete_run(at, tile) {
                return tile;
            }
        }

        if let Some(tile) = (0..self.type_count)
            .map(|t| t as TileType)
            .find(|&t| !self.would_complete_run(at, t))
        {
            return tile;
        }

        // Too few types to avoid a run (e.g. type_count = 1); accept anything.
        self.weights.sample(&mut self.rng)
    }

    fn would_complete_run(&self, at: Coord, tile: TileType) -> bool {
        let same = |dx: i32, dy: i32| self.get(Coord::new(at.x + dx, at.y + dy)) == Some(tile);
        (same(-1, 0) && same(-2, 0)) || (same(0, -1) && same(0, -2))
    }

    /// Every cell belonging to a horizontal or vertical run of 3+ equal tiles.
    pub fn find_matches(&self) -> MatchSet {
        let mut out = MatchSet::new();
        for y in 0..self.height as i32 {
            self.collect_runs(self.width, |i| Coord::new(i as i32, y), &mut out);
        }
        for x in 0..self.width as i32 {
            self.collect_runs(self.height, |i| Coord::new(x, i as i32), &mut out);
        }
        out
    }

    /// Scan one line. Position `len` acts as a sentinel that never continues the
    /// current run, forcing the final run to be evaluated.
    fn collect_runs(&self, len: usize, at: impl Fn(usize) -> Coord, out: &mut MatchSet) {
        let mut run_start = 0usize;
        let mut run_cell = self.get(at(0));

        for i in 1..=len {
            let next = if i < len { self.get(at(i)) } else { None };
            if i < len && next.is_some() && next == run_cell {
                continue;
            }

            if run_cell.is_some() && i - run_start >= MIN_RUN {
                out.extend((run_start..i).map(&at));
            }

            run_cell = next;
            run_start = i;
        }
    }

    /// Set each coordinate to EMPTY, skipping anything out of bounds.
    pub fn clear<'a>(&mut self, coords: impl IntoIterator<Item = &'a Coord>) {
        for &at in coords {
            self.set(at, None);
        }
    }

    /// Compact every column toward the bottom, preserving order.
    ///
    /// Returns the moves actually performed; tiles that stay put are omitted.
    pub fn apply_gravity_with_moves(&mut self) -> Vec<GravityMove> {
        let mut moves = Vec::new();
        for x in 0..self.width as i32 {
            let mut write_y = self.height as i32 - 1;
            for y in (0..self.height as i32).rev() {
                let from = Coord::new(x, y);
                let Some(tile) = self.get(from) else {
                    continue;
                };
                if y != write_y {
                    let to = Coord::new(x, write_y);
                    self.set(to, Some(tile));
                    self.set(from, None);
                    moves.push(GravityMove { from, to });
                }
                write_y -= 1;
            }
        }
        moves
    }

    /// Fill every EMPTY cell with a weighted draw. Refills may create new runs.
    pub fn fill_empties_with_spawns(&mut self) -> Vec<Spawn> {
        let empties: Vec<Coord> = self
            .column_major()
            .filter(|&at| self.get(at).is_none())
            .collect();

        let mut spawns = Vec::with_capacity(empties.len());
        for at in empties {
            let tile = self.weights.sample(&mut self.rng);
            self.set(at, Some(tile));
            spawns.push(Spawn { at, tile });
        }
        spawns
    }

    /// First adjacent swap (scan order) that would produce a match.
    ///
    /// The board is left untouched.
    pub fn find_productive_swap(&self) -> Option<(Coord, Coord)> {
        let mut trial = self.clone();
        for at in self.column_major() {
            for dir in [Direction::Right, Direction::Down] {
                let other = at.step(dir);
                if !self.in_bounds(other) || self.get(at) == self.get(other) {
                    continue;
                }
                trial.swap(at, other);
                let productive = !trial.find_matches().is_empty();
                trial.swap(at, other);
                if productive {
                    return Some((at, other));
                }
            }
        }
        None
    }

    /// Rows as integers with `-1` for EMPTY (inverse of `from_rows`).
    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|c| c.map_or(-1, i32::from)).collect())
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line: Vec<String> = row
                .iter()
                .map(|c| c.map_or_else(|| ".".to_string(), |t| t.to_string()))
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
