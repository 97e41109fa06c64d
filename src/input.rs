//! Board files: one row per line, tile values separated by commas.
//!
//! ```text
//! 1, 2, 3
//! 4, 0, 5
//! 7, 8, 6
//! ```

use std::fs;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: `{token}` is not a tile value")]
    BadNumber { line: usize, token: String },

    #[error("line {line} has {len} values but the board has {rows} rows")]
    NotSquare { rows: usize, line: usize, len: usize },

    #[error("the board is empty")]
    Empty,
}

/// Parses board text. Blank lines are skipped; shape is checked, tile values
/// are left to [`Puzzle::from_rows`](crate::puzzle::Puzzle::from_rows).
pub fn parse_board(text: &str) -> Result<Vec<Vec<u32>>, LoadError> {
    let mut rows = Vec::new();
    let mut line_numbers = Vec::new();

    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row = line
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<u32>().map_err(|_| LoadError::BadNumber {
                    line: n + 1,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<u32>, _>>()?;
        rows.push(row);
        line_numbers.push(n + 1);
    }

    if rows.is_empty() {
        return Err(LoadError::Empty);
    }
    if let Some((row, line)) = rows
        .iter()
        .zip(&line_numbers)
        .find(|(row, _)| row.len() != rows.len())
    {
        return Err(LoadError::NotSquare {
            rows: rows.len(),
            line: *line,
            len: row.len(),
        });
    }

    Ok(rows)
}

pub fn load_board(path: &Path) -> Result<Vec<Vec<u32>>, LoadError> {
    parse_board(&fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_board_with_spacing_and_blank_lines() {
        let rows = parse_board("\n1, 2,3\n 4 ,0, 5\n\n7,8, 6 \n").unwrap();
        assert_eq!(rows, vec![vec![1, 2, 3], vec![4, 0, 5], vec![7, 8, 6]]);
    }

    #[test]
    fn test_parse_board_rejects_bad_tokens() {
        let err = parse_board("1, 2\nx, 0\n").unwrap_err();
        assert!(matches!(err, LoadError::BadNumber { line: 2, ref token } if token == "x"));
    }

    #[test]
    fn test_parse_board_rejects_non_square() {
        let err = parse_board("1, 2, 3\n4, 0\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::NotSquare {
                rows: 2,
                line: 1,
                len: 3
            }
        ));
        assert!(matches!(parse_board("  \n"), Err(LoadError::Empty)));
    }

    #[test]
    fn test_load_board_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0, 1\n3, 2").unwrap();
        let rows = load_board(file.path()).unwrap();
        assert_eq!(rows, vec![vec![0, 1], vec![3, 2]]);

        let missing = file.path().with_extension("missing");
        assert!(matches!(load_board(&missing), Err(LoadError::Io(_))));
    }
}
