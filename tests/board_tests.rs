use seabattle::{AttackOutcome, Board, BoardError, Cell, Direction, Position, Ship};

fn ship(row: i32, col: i32, dir: Direction, len: usize) -> Ship {
    Ship::new(Position::new(row, col), dir, len).unwrap()
}

#[test]
fn test_place_marks_ship_and_buffer() -> Result<(), BoardError> {
    let mut board = Board::new();
    board.place_ship(&ship(2, 2, Direction::Right, 3))?;
    for c in 2..5 {
        assert_eq!(board.own_cell(Position::new(2, c)), Some(Cell::Taken));
        assert_eq!(board.own_cell(Position::new(1, c)), Some(Cell::ShipArea));
        assert_eq!(board.own_cell(Position::new(3, c)), Some(Cell::ShipArea));
    }
    assert_eq!(board.own_cell(Position::new(2, 1)), Some(Cell::ShipArea));
    assert_eq!(board.own_cell(Position::new(2, 5)), Some(Cell::ShipArea));
    // Diagonal corners are not part of the buffer.
    assert_eq!(board.own_cell(Position::new(1, 1)), Some(Cell::Empty));
    assert_eq!(board.remaining_segments(), 3);
    Ok(())
}

#[test]
fn test_place_at_corner_skips_off_grid_neighbours() -> Result<(), BoardError> {
    let mut board = Board::new();
    board.place_ship(&ship(0, 0, Direction::Down, 2))?;
    assert_eq!(board.own_cell(Position::new(2, 0)), Some(Cell::ShipArea));
    assert_eq!(board.own_cell(Position::new(0, 1)), Some(Cell::ShipArea));
    assert_eq!(board.own_cell(Position::new(-1, 0)), None);
    Ok(())
}

#[test]
fn test_overlap_rejected_and_board_unchanged() -> Result<(), BoardError> {
    let mut board = Board::new();
    board.place_ship(&ship(4, 0, Direction::Right, 5))?;
    let before = board.clone();
    let err = board.place_ship(&ship(2, 2, Direction::Down, 4)).unwrap_err();
    assert_eq!(err, BoardError::FieldsAlreadyTaken);
    assert_eq!(err.to_string(), "some of the fields are already taken");
    assert_eq!(board, before);
    Ok(())
}

#[test]
fn test_out_of_bounds_placement_leaves_board_untouched() -> Result<(), BoardError> {
    let mut board = Board::new();
    let err = board.place_ship(&ship(8, 8, Direction::Down, 3)).unwrap_err();
    assert_eq!(err, BoardError::ShipOutOfBounds);
    assert_eq!(board, Board::new());
    Ok(())
}

// Buffer cells count as occupied: ships may touch diagonally but never
// share an edge, which keeps every sunk walk bounded.
#[test]
fn test_adjacent_placement_rejected_diagonal_allowed() -> Result<(), BoardError> {
    let mut board = Board::new();
    board.place_ship(&ship(0, 0, Direction::Right, 3))?;
    assert_eq!(
        board.place_ship(&ship(0, 3, Direction::Right, 2)),
        Err(BoardError::FieldsAlreadyTaken)
    );
    assert_eq!(
        board.place_ship(&ship(1, 0, Direction::Down, 2)),
        Err(BoardError::FieldsAlreadyTaken)
    );
    board.place_ship(&ship(1, 3, Direction::Down, 2))?;
    Ok(())
}

#[test]
fn test_receive_attack_hit_miss_sunk() -> Result<(), BoardError> {
    let mut board = Board::new();
    board.place_ship(&ship(5, 5, Direction::Left, 2))?;

    let miss = board.receive_attack(Position::new(0, 0))?;
    assert_eq!(miss, AttackOutcome { hit: false, sunk: false });
    assert_eq!(board.own_cell(Position::new(0, 0)), Some(Cell::Miss));

    let first = board.receive_attack(Position::new(5, 4))?;
    assert_eq!(first, AttackOutcome { hit: true, sunk: false });
    assert!(!board.is_beaten());

    let second = board.receive_attack(Position::new(5, 5))?;
    assert_eq!(second, AttackOutcome { hit: true, sunk: true });
    assert!(board.is_beaten());
    Ok(())
}

#[test]
fn test_repeat_attack_on_empty_is_still_miss() -> Result<(), BoardError> {
    let mut board = Board::new();
    let p = Position::new(3, 3);
    assert!(!board.receive_attack(p)?.hit);
    assert!(!board.receive_attack(p)?.hit);
    assert_eq!(board.own_cell(p), Some(Cell::Miss));
    Ok(())
}

#[test]
fn test_receive_attack_out_of_bounds() {
    let mut board = Board::new();
    assert_eq!(
        board.receive_attack(Position::new(10, 0)),
        Err(BoardError::OutOfBounds)
    );
    assert_eq!(
        board.receive_attack(Position::new(0, -1)).unwrap_err().to_string(),
        "position out of bounds"
    );
}

#[test]
fn test_attack_records_enemy_view() -> Result<(), BoardError> {
    let mut board = Board::new();
    board.attack(Position::new(1, 1), true)?;
    board.attack(Position::new(1, 2), false)?;
    assert_eq!(board.enemy_cell(Position::new(1, 1)), Some(Cell::Hit));
    assert_eq!(board.enemy_cell(Position::new(1, 2)), Some(Cell::Miss));
    assert_eq!(board.own_cell(Position::new(1, 1)), Some(Cell::Empty));
    assert_eq!(board.attack(Position::new(0, 10), true), Err(BoardError::OutOfBounds));
    Ok(())
}

#[test]
fn test_sunk_regardless_of_hit_order() -> Result<(), BoardError> {
    let mut board = Board::new();
    board.place_ship(&ship(3, 6, Direction::Down, 4))?;
    let order = [(5, 6), (3, 6), (6, 6), (4, 6)];
    for (i, (r, c)) in order.iter().enumerate() {
        let outcome = board.receive_attack(Position::new(*r, *c))?;
        assert!(outcome.hit);
        assert_eq!(outcome.sunk, i == order.len() - 1);
    }
    Ok(())
}

#[test]
fn test_sinking_one_ship_does_not_beat_board() -> Result<(), BoardError> {
    let mut board = Board::new();
    board.place_ship(&ship(0, 0, Direction::Right, 2))?;
    board.place_ship(&ship(9, 8, Direction::Right, 2))?;
    board.receive_attack(Position::new(0, 0))?;
    assert!(board.receive_attack(Position::new(0, 1))?.sunk);
    assert!(!board.is_beaten());
    assert_eq!(board.remaining_segments(), 2);
    Ok(())
}

// Known limitation of the buffer walk: a shot into the buffer turns it into
// a plain miss, so a later walk can run on into the neighbouring ship.
#[test]
fn test_shot_buffer_extends_sunk_walk() -> Result<(), BoardError> {
    let mut board = Board::new();
    board.place_ship(&ship(0, 0, Direction::Right, 2))?;
    board.place_ship(&ship(0, 3, Direction::Right, 2))?;
    board.receive_attack(Position::new(0, 2))?;
    board.receive_attack(Position::new(0, 0))?;
    let outcome = board.receive_attack(Position::new(0, 1))?;
    assert!(outcome.hit);
    assert!(!outcome.sunk);
    Ok(())
}

#[test]
fn test_display_renders_both_grids() -> Result<(), BoardError> {
    let mut board = Board::new();
    board.place_ship(&ship(0, 0, Direction::Right, 2))?;
    board.attack(Position::new(9, 9), false)?;
    let text = board.to_string();
    assert!(text.starts_with("Enemy fields:"));
    assert!(text.contains("Own fields:"));
    assert!(text.contains(" A S S ,"));
    assert!(text.contains(" J . . . . . . . . . o"));
    Ok(())
}
