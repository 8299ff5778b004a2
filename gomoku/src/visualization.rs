use crate::{Board, Cell, BOARD_SIZE};

/// Draws the board as text, one row per line, with row and column numbers.
pub fn visualize_board(board: &Board) -> String {
    // Column numbers
    let mut result = String::from("    ");
    for col in 0..BOARD_SIZE {
        result += &format!("{:>2}", col % 10);
    }
    result += "\n    ╭";
    for _ in 0..BOARD_SIZE {
        result += "──";
    }
    result += "─╮";

    for (idx, cell) in board.cells().iter().enumerate() {
        if idx % BOARD_SIZE == 0 {
            result += &format!("\n{:>3} │", idx / BOARD_SIZE);
        }
        result += match cell {
            Cell::Empty => " ·",
            Cell::Black => " ●",
            Cell::White => " ○",
        };
        if idx % BOARD_SIZE == BOARD_SIZE - 1 {
            result += " │";
        }
    }

    result += "\n    ╰";
    for _ in 0..BOARD_SIZE {
        result += "──";
    }
    result += "─╯";
    result
}
