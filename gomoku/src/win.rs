use crate::{Board, Cell, Player, BOARD_SIZE};

/// How many stones in a row win the match.
pub const WIN_LENGTH: usize = 5;

/// Horizontal, vertical, diagonal and anti-diagonal.
const AXES: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Does the stone at `(row, col)` complete a line of at least [`WIN_LENGTH`]?
///
/// Only the four lines through this cell are inspected, so this must be
/// called on the destination of the move that was just applied. Returns
/// `false` if the cell is empty or off the board.
pub fn check_win(board: &Board, row: i32, col: i32) -> bool {
    let Some(player) = board.get(row, col).and_then(Cell::player) else {
        return false;
    };
    AXES.iter().any(|&(d_row, d_col)| {
        let forward = run_length(board, player, row, col, d_row, d_col);
        let backward = run_length(board, player, row, col, -d_row, -d_col);
        1 + forward + backward >= WIN_LENGTH
    })
}

// Consecutive stones of `player` starting next to (row, col) in one direction.
// Stops early once a win is certain.
fn run_length(board: &Board, player: Player, row: i32, col: i32, d_row: i32, d_col: i32) -> usize {
    let stone = Cell::from(player);
    (1..WIN_LENGTH as i32)
        .take_while(|&k| board.get(row + d_row * k, col + d_col * k) == Some(stone))
        .count()
}

/// Scans the whole board for a winning line.
///
/// A line can only appear through a move, and every move is checked with
/// [`check_win`] on its destination, so a peer that only sees broadcast
/// boards can use this to tell whether the match is over.
pub fn find_winner(board: &Board) -> Option<Player> {
    (0..BOARD_SIZE as i32)
        .flat_map(|row| (0..BOARD_SIZE as i32).map(move |col| (row, col)))
        .find(|&(row, col)| check_win(board, row, col))
        .and_then(|(row, col)| board.get(row, col))
        .and_then(Cell::player)
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::Line;

    fn board_with(stones: &[(i32, i32, Player)]) -> Board {
        let mut board = Board::new();
        for &(row, col, player) in stones {
            board.place(row, col, player).unwrap();
        }
        board
    }

    quickcheck! {
        fn five_in_a_row_wins_from_every_stone(line: Line) -> bool {
            let board = board_with(&line.stones(Player::White));
            line.cells().all(|(row, col)| check_win(&board, row, col))
        }
    }

    quickcheck! {
        fn four_in_a_row_never_wins(line: Line) -> bool {
            let mut stones = line.stones(Player::Black);
            stones.pop();
            let board = board_with(&stones);
            line.cells().all(|(row, col)| !check_win(&board, row, col))
        }
    }

    #[test]
    fn horizontal_win() {
        let board = board_with(&(7..12).map(|col| (7, col, Player::Black)).collect::<Vec<_>>());
        assert!(check_win(&board, 7, 11));
        assert!(check_win(&board, 7, 9));
        assert_eq!(find_winner(&board), Some(Player::Black));
    }

    #[test]
    fn edge_bounded_runs_win() {
        let vertical = board_with(&(0..5).map(|row| (row, 14, Player::White)).collect::<Vec<_>>());
        assert!(check_win(&vertical, 0, 14));
        let anti_diag = board_with(&(0..5).map(|k| (10 + k, 4 - k, Player::Black)).collect::<Vec<_>>());
        assert!(check_win(&anti_diag, 14, 0));
        let diag = board_with(&(10..15).map(|k| (k, k, Player::Black)).collect::<Vec<_>>());
        assert!(check_win(&diag, 12, 12));
    }

    #[test]
    fn longer_lines_win() {
        let board = board_with(&(0..7).map(|col| (3, col, Player::Black)).collect::<Vec<_>>());
        assert!(check_win(&board, 3, 6));
    }

    #[test]
    fn gap_blocks_the_line() {
        let board = board_with(&[
            (7, 7, Player::Black),
            (7, 8, Player::Black),
            (7, 10, Player::Black),
            (7, 11, Player::Black),
            (7, 12, Player::Black),
        ]);
        assert!(!check_win(&board, 7, 12));
        assert!(!check_win(&board, 7, 9));
        assert_eq!(find_winner(&board), None);
    }

    #[test]
    fn opposing_stone_blocks_the_line() {
        let board = board_with(&[
            (2, 2, Player::White),
            (3, 3, Player::White),
            (4, 4, Player::Black),
            (5, 5, Player::White),
            (6, 6, Player::White),
            (7, 7, Player::White),
        ]);
        assert!(!check_win(&board, 7, 7));
        assert!(!check_win(&board, 2, 2));
    }

    #[test]
    fn empty_cell_never_wins() {
        assert!(!check_win(&Board::new(), 7, 7));
        assert!(!check_win(&Board::new(), -1, 7));
    }
}
