use seabattle::{Board, BoardError, Cell, Direction, Position, Ship, BOARD_SIZE};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn positions_are_contiguous_or_rejected(
        row in -2..BOARD_SIZE + 2,
        col in -2..BOARD_SIZE + 2,
        dir in direction(),
        len in 2usize..=5,
    ) {
        let ship = Ship::new(Position::new(row, col), dir, len).unwrap();
        match ship.positions() {
            Ok(cells) => {
                prop_assert_eq!(cells.len(), len);
                prop_assert!(cells.iter().all(Position::in_bounds));
                let (dr, dc) = dir.delta();
                for pair in cells.windows(2) {
                    prop_assert_eq!(pair[1].row - pair[0].row, dr);
                    prop_assert_eq!(pair[1].col - pair[0].col, dc);
                }
            }
            Err(e) => {
                prop_assert_eq!(e, BoardError::ShipOutOfBounds);
                prop_assert!(!ship.origin().in_bounds() || !ship.terminal().in_bounds());
                let mut board = Board::new();
                prop_assert!(board.place_ship(&ship).is_err());
                prop_assert_eq!(board, Board::new());
            }
        }
    }

    #[test]
    fn sunk_only_after_last_hit(
        row in 0..BOARD_SIZE,
        col in 0..BOARD_SIZE,
        dir in direction(),
        len in 2usize..=5,
        order in any::<u64>(),
    ) {
        let ship = Ship::new(Position::new(row, col), dir, len).unwrap();
        let Ok(mut cells) = ship.positions() else {
            return Ok(());
        };
        let mut board = Board::new();
        board.place_ship(&ship).unwrap();
        // Deterministic shuffle driven by the generated seed.
        let n = cells.len();
        for i in (1..n).rev() {
            let j = ((order >> (i * 7 % 57)) as usize) % (i + 1);
            cells.swap(i, j);
        }
        for (i, p) in cells.iter().enumerate() {
            let outcome = board.receive_attack(*p).unwrap();
            prop_assert!(outcome.hit);
            prop_assert_eq!(outcome.sunk, i == n - 1);
            prop_assert_eq!(board.is_beaten(), i == n - 1);
        }
    }

    #[test]
    fn failed_placement_changes_nothing(
        a in (0..BOARD_SIZE, 0..BOARD_SIZE, direction(), 2usize..=5),
        b in (0..BOARD_SIZE, 0..BOARD_SIZE, direction(), 2usize..=5),
    ) {
        let first = Ship::new(Position::new(a.0, a.1), a.2, a.3).unwrap();
        let second = Ship::new(Position::new(b.0, b.1), b.2, b.3).unwrap();
        let mut board = Board::new();
        if board.place_ship(&first).is_err() {
            return Ok(());
        }
        let before = board.clone();
        if board.place_ship(&second).is_err() {
            prop_assert_eq!(board, before);
        } else {
            let taken = second.positions().unwrap();
            prop_assert!(taken.iter().all(|p| board.own_cell(*p) == Some(Cell::Taken)));
            prop_assert_eq!(board.remaining_segments(), first.length() + second.length());
        }
    }

    #[test]
    fn missed_cells_stay_missed(row in 0..BOARD_SIZE, col in 0..BOARD_SIZE) {
        let mut board = Board::new();
        let p = Position::new(row, col);
        prop_assert!(!board.receive_attack(p).unwrap().hit);
        prop_assert!(!board.receive_attack(p).unwrap().hit);
        prop_assert_eq!(board.own_cell(p), Some(Cell::Miss));
    }
}
