use super::*;

#[test]
fn test_stone_opponent() {
    assert_eq!(Stone::Black.opponent(), Stone::White);
    assert_eq!(Stone::White.opponent(), Stone::Black);
    assert_eq!(Stone::Empty.opponent(), Stone::Empty);
}

#[test]
fn test_stone_wire_values() {
    assert_eq!(Stone::Black.to_u8(), 1);
    assert_eq!(Stone::White.to_u8(), 2);
    assert_eq!(Stone::from_u8(0), Some(Stone::Empty));
    assert_eq!(Stone::from_u8(3), None);
    assert_eq!(Stone::try_from(7u8), Err(BoardError::InvalidCell(7)));
}

#[test]
fn test_pos_conversion() {
    let pos = Pos::new(7, 7); // Center
    assert_eq!(pos.to_index(BOARD_SIZE), 7 * 15 + 7);
    assert_eq!(Pos::from_index(112, BOARD_SIZE), pos);
}

#[test]
fn test_pos_corner_indices() {
    assert_eq!(Pos::new(0, 0).to_index(15), 0);
    assert_eq!(Pos::new(0, 14).to_index(15), 14);
    assert_eq!(Pos::new(14, 0).to_index(15), 210);
    assert_eq!(Pos::new(14, 14).to_index(15), 224);
}

#[test]
fn test_pos_ordering_is_row_major() {
    assert!(Pos::new(0, 0) < Pos::new(0, 1));
    assert!(Pos::new(0, 14) < Pos::new(1, 0));
}

#[test]
fn test_pos_distance() {
    assert_eq!(Pos::new(7, 7).distance(Pos::new(8, 6)), 1);
    assert_eq!(Pos::new(7, 7).distance(Pos::new(7, 7)), 0);
    assert_eq!(Pos::new(0, 3).distance(Pos::new(4, 1)), 4);
}

#[test]
fn test_board_cell_sentinel() {
    let mut board = Board::new();
    board.place_stone(Pos::new(0, 0), Stone::White);
    assert_eq!(board.cell(0, 0), Some(Stone::White));
    assert_eq!(board.cell(0, 1), Some(Stone::Empty));
    assert_eq!(board.cell(-1, 0), None);
    assert_eq!(board.cell(0, 15), None);
}

#[test]
fn test_board_play_rejects_bad_moves() {
    let mut board = Board::new();
    assert!(board.play(Pos::new(7, 7), Stone::Black).is_ok());
    assert_eq!(
        board.play(Pos::new(7, 7), Stone::White),
        Err(BoardError::Occupied { row: 7, col: 7 })
    );
    assert_eq!(
        board.play(Pos::new(15, 2), Stone::White),
        Err(BoardError::OutOfBounds {
            row: 15,
            col: 2,
            size: 15
        })
    );
    assert_eq!(
        board.play(Pos::new(1, 1), Stone::Empty),
        Err(BoardError::EmptyStone)
    );
    assert_eq!(board.stone_count(), 1);
}

#[test]
fn test_board_counts() {
    let mut board = Board::with_size(5);
    assert!(board.is_board_empty());
    board.place_stone(Pos::new(1, 1), Stone::Black);
    board.place_stone(Pos::new(2, 3), Stone::White);
    board.place_stone(Pos::new(0, 4), Stone::Black);
    assert_eq!(board.count(Stone::Black), 2);
    assert_eq!(board.stone_count(), 3);
    assert_eq!(board.empty_cells().len(), 22);
    assert_eq!(
        board.stones_of(Stone::Black),
        vec![Pos::new(0, 4), Pos::new(1, 1)]
    );
    board.remove_stone(Pos::new(1, 1));
    assert_eq!(board.count(Stone::Black), 1);
    assert!(!board.is_full());
}

#[test]
fn test_board_rows_round_trip() {
    let rows = vec![vec![0, 1, 0], vec![2, 0, 0], vec![0, 0, 1]];
    let board = Board::from_rows(&rows).unwrap();
    assert_eq!(board.size(), 3);
    assert_eq!(board.get(Pos::new(1, 0)), Stone::White);
    assert_eq!(board.to_rows(), rows);
}

#[test]
fn test_board_from_rows_validation() {
    assert_eq!(
        Board::from_rows(&[vec![0u8, 0], vec![0]]),
        Err(BoardError::NotSquare {
            row: 1,
            len: 1,
            size: 2
        })
    );
    assert_eq!(
        Board::from_rows(&[vec![0u8, 3], vec![0, 0]]),
        Err(BoardError::InvalidCell(3))
    );
    let empty: [Vec<u8>; 0] = [];
    assert_eq!(Board::from_rows(&empty), Err(BoardError::InvalidSize(0)));
}

#[test]
fn test_position_hash_format() {
    // sha256("[[0]]")
    assert_eq!(
        Board::with_size(1).position_hash(),
        "db407f11d7ede59abaab0e98e097ff2dae10a048207b801745d7199ef19c2387"
    );

    let mut board = Board::with_size(3);
    board.place_stone(Pos::new(1, 2), Stone::White);
    // sha256("[[0,0,0],[0,0,2],[0,0,0]]")
    assert_eq!(
        board.position_hash(),
        "0547884111ab658ecf0955417c7fbe49740e7d9262e2ce702adde9ebe4db8712"
    );
}

#[test]
fn test_board_center() {
    assert_eq!(Board::new().center(), Pos::new(7, 7));
    assert_eq!(Board::with_size(6).center(), Pos::new(3, 3));
}
