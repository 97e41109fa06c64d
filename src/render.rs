//! Fixed-width drawings of boards and plain-text solution reports.

use std::fmt;

use crate::solver::Solution;

/// A frozen copy of a board's tiles, taken after a committed move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    width: usize,
    tiles: Box<[u32]>,
}

impl Snapshot {
    pub fn new(width: usize, tiles: Box<[u32]>) -> Self {
        Self { width, tiles }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.tiles.chunks(self.width).map(<[u32]>::to_vec).collect()
    }

    fn cell_width(&self) -> usize {
        (self.width * self.width).to_string().len().max(2)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.cell_width();
        let rule = "-".repeat(self.width * (cell + 3) + 1);

        for row in self.tiles.chunks(self.width) {
            writeln!(f, "{rule}")?;
            for &value in row {
                if value == 0 {
                    write!(f, "| {:cell$} ", "")?;
                } else {
                    write!(f, "| {value:>cell$} ")?;
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{rule}")
    }
}

/// Renders a whole solution: the initial board, then one heading and drawing
/// per move.
pub fn format_solution(solution: &Solution) -> String {
    let mut output = format!("Initial board\n\n{}\n", solution.initial);
    for record in &solution.moves {
        output.push_str(&format!(
            "Tile {} {} {}\n\n{}\n",
            record.tile,
            record.step,
            record.step.arrow(),
            record.snapshot
        ));
    }
    output
}
