use quickcheck::{Arbitrary, Gen};

use crate::{Player, BOARD_SIZE, WIN_LENGTH};

/// A straight run of `WIN_LENGTH` cells that fits on the board.
#[derive(Clone, Debug)]
pub struct Line {
    pub row: i32,
    pub col: i32,
    pub d_row: i32,
    pub d_col: i32,
}

impl Line {
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..WIN_LENGTH as i32).map(move |k| (self.row + self.d_row * k, self.col + self.d_col * k))
    }

    pub fn stones(&self, player: Player) -> Vec<(i32, i32, Player)> {
        self.cells().map(|(row, col)| (row, col, player)).collect()
    }
}

// A start coordinate such that WIN_LENGTH steps in direction `d` stay on the board.
fn start_coordinate(g: &mut Gen, d: i32) -> i32 {
    let reach = WIN_LENGTH as u32 - 1;
    match d {
        0 => (u32::arbitrary(g) % BOARD_SIZE as u32) as i32,
        1 => (u32::arbitrary(g) % (BOARD_SIZE as u32 - reach)) as i32,
        _ => (u32::arbitrary(g) % (BOARD_SIZE as u32 - reach) + reach) as i32,
    }
}

impl Arbitrary for Line {
    fn arbitrary(g: &mut Gen) -> Self {
        let &(d_row, d_col) = g.choose(&[(0, 1), (1, 0), (1, 1), (1, -1)]).unwrap();
        Line {
            row: start_coordinate(g, d_row),
            col: start_coordinate(g, d_col),
            d_row,
            d_col,
        }
    }
}

/// Coordinates as a peer might send them, mostly on the board and sometimes just off it.
#[derive(Clone, Debug)]
pub struct Coordinates(pub Vec<(i32, i32)>);

impl Arbitrary for Coordinates {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 80;
        let range = BOARD_SIZE as u8 + 2;
        Coordinates(
            (0..len)
                .map(|_| {
                    let row = (u8::arbitrary(g) % range) as i32 - 1;
                    let col = (u8::arbitrary(g) % range) as i32 - 1;
                    (row, col)
                })
                .collect(),
        )
    }
}

impl Arbitrary for Player {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&[Player::Black, Player::White]).unwrap()
    }
}
