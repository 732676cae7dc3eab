use tracing::{debug, info, warn};

use crate::ai::heuristic::HeuristicSelector;
use crate::board::{Board, Side, Square};
use crate::config::GameConfig;
use crate::error::EngineError;
use crate::rules::{self, CapturePolicy};
use crate::types::{GameEvent, GameView, Move, MoveOutcome, Position, Reply};

/// Chooses moves for the automated side.
pub trait MoveSelector: Send {
    /// Returns `None` to pass.
    fn select_move(&mut self, board: &Board, mover: Side, policy: CapturePolicy) -> Option<Move>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalMoveSelector;

impl MoveSelector for FirstLegalMoveSelector {
    fn select_move(&mut self, board: &Board, mover: Side, policy: CapturePolicy) -> Option<Move> {
        rules::legal_moves(board, mover, policy).first().copied()
    }
}

/// One game from setup to a win.
pub struct GameState {
    board: Board,
    current_turn: Side,
    selection: Option<Position>,
    config: GameConfig,
    winner: Option<Side>,
    last_move: Option<Move>,
    last_capture: Option<Position>,
    last_reply: Option<Reply>,
    selector: Box<dyn MoveSelector>,
}

impl GameState {
    /// Sets up a fresh game with the heuristic opponent.
    pub fn new_game(config: GameConfig) -> Self {
        Self::new(config, default_selector(&config))
    }

    pub fn new(config: GameConfig, selector: Box<dyn MoveSelector>) -> Self {
        let board = Board::create_initial();
        Self::from_position(config, board, config.first_mover, selector)
    }

    /// Starts play from an arbitrary position. When `turn` belongs to the
    /// automated side its move is played immediately.
    pub fn from_position(
        config: GameConfig,
        board: Board,
        turn: Side,
        selector: Box<dyn MoveSelector>,
    ) -> Self {
        let mut state = Self {
            board,
            current_turn: turn,
            selection: None,
            config,
            winner: None,
            last_move: None,
            last_capture: None,
            last_reply: None,
            selector,
        };
        if state.is_automated_turn() {
            state.play_automated_turn();
        }
        state
    }

    /// Replaces the game with a fresh setup under the same configuration,
    /// keeping the selector.
    pub fn restart(&mut self) {
        self.board = Board::create_initial();
        self.current_turn = self.config.first_mover;
        self.selection = None;
        self.winner = None;
        self.last_move = None;
        self.last_capture = None;
        self.last_reply = None;
        if self.is_automated_turn() {
            self.play_automated_turn();
        }
    }

    /// Validates and plays a move for the side to move, then lets the
    /// automated side answer if the game goes on.
    ///
    /// On error the state is left untouched.
    pub fn attempt_move(
        &mut self,
        from: Position,
        to: Position,
    ) -> Result<MoveOutcome, EngineError> {
        let mv = Move::new(from, to);
        if self.winner.is_some() || self.is_automated_turn() {
            return Err(EngineError::IllegalMove(mv));
        }
        let capture = self.config.capture;
        if !rules::is_legal(&self.board, from, to, self.current_turn, capture) {
            return Err(EngineError::IllegalMove(mv));
        }

        self.selection = None;
        self.last_reply = None;
        let event = self.play(mv);
        Ok(self.finish_turn(event))
    }

    /// Click input: selects the current side's piece on `(row, col)`, or
    /// clears the selection when that piece is already selected or the
    /// square holds anything else.
    pub fn toggle_selection(
        &mut self,
        row: i32,
        col: i32,
    ) -> Result<Option<Position>, EngineError> {
        let pos = Position::try_from((row, col))?;
        let own_piece = self.board.square(pos) == Square::Occupied(self.current_turn);

        self.selection = if self.winner.is_none()
            && !self.is_automated_turn()
            && own_piece
            && self.selection != Some(pos)
        {
            Some(pos)
        } else {
            None
        };
        Ok(self.selection)
    }

    /// Click input: moves the selected piece to `(row, col)`.
    pub fn move_selection_to(&mut self, row: i32, col: i32) -> Result<MoveOutcome, EngineError> {
        let to = Position::try_from((row, col))?;
        let from = self.selection.ok_or(EngineError::NoSelection)?;
        self.attempt_move(from, to)
    }

    /// Hands the turn over when the side to move has no legal move.
    pub fn pass(&mut self) -> Result<MoveOutcome, EngineError> {
        let side = self.current_turn;
        if self.winner.is_some() || self.is_automated_turn() || self.has_legal_moves() {
            return Err(EngineError::PassRejected(side));
        }

        debug!(?side, "pass");
        self.selection = None;
        self.last_move = None;
        self.last_capture = None;
        self.last_reply = None;
        self.advance_turn();
        Ok(self.finish_turn(GameEvent::Continued))
    }

    pub fn get_square(&self, row: u8, col: u8) -> Result<Square, EngineError> {
        self.board.get(row, col)
    }

    pub fn current_turn(&self) -> Side {
        self.current_turn
    }

    /// The winner, present once the game is over.
    pub fn is_game_over(&self) -> Option<Side> {
        self.winner
    }

    pub fn selection(&self) -> Option<Position> {
        self.selection
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn last_reply(&self) -> Option<Reply> {
        self.last_reply
    }

    pub fn has_legal_moves(&self) -> bool {
        rules::has_legal_move(&self.board, self.current_turn, self.config.capture)
    }

    /// Where the piece on `from` may step. Empty unless it belongs to the
    /// side to move and the game is still running.
    pub fn legal_destinations(&self, from: Position) -> Vec<Position> {
        let own = Square::Occupied(self.current_turn);
        if self.winner.is_some() || self.board.square(from) != own {
            return Vec::new();
        }
        rules::legal_destinations(&self.board, from, self.config.capture)
    }

    pub fn view(&self) -> GameView {
        GameView {
            board: self.board.to_array().to_vec(),
            current_turn: self.current_turn,
            selection: self.selection,
            near_count: self.board.count(Side::Near),
            far_count: self.board.count(Side::Far),
            winner: self.winner,
            last_move: self.last_move,
            last_capture: self.last_capture,
            last_reply: self.last_reply,
        }
    }

    fn is_automated_turn(&self) -> bool {
        self.config.automated_side() == Some(self.current_turn)
    }

    /// Runs the automated reply when it is due and reports the final event.
    fn finish_turn(&mut self, event: GameEvent) -> MoveOutcome {
        if event != GameEvent::Continued || !self.is_automated_turn() {
            let reply = None;
            return MoveOutcome { event, reply };
        }

        let reply = Some(self.play_automated_turn());
        let event = match self.winner {
            Some(side) => GameEvent::Won(side),
            None => GameEvent::Continued,
        };
        MoveOutcome { event, reply }
    }

    fn play_automated_turn(&mut self) -> Reply {
        let side = self.current_turn;
        let capture = self.config.capture;
        let selected = self.selector.select_move(&self.board, side, capture);

        let reply = match selected {
            Some(mv) if rules::is_legal(&self.board, mv.from, mv.to, side, capture) => {
                self.play(mv);
                Reply::Moved(mv)
            }
            Some(mv) => {
                warn!(%mv, ?side, "selector returned an illegal move, passing");
                self.advance_turn();
                Reply::Passed
            }
            None => {
                debug!(?side, "automated side passes");
                self.advance_turn();
                Reply::Passed
            }
        };
        self.last_reply = Some(reply);
        reply
    }

    /// Applies an already validated move for the side to move.
    fn play(&mut self, mv: Move) -> GameEvent {
        let mover = self.current_turn;
        self.last_capture = rules::apply_move(&mut self.board, mv);
        self.last_move = Some(mv);

        if rules::check_win(&self.board, mover, mv.to.row) {
            info!(?mover, %mv, "game won");
            self.winner = Some(mover);
            return GameEvent::Won(mover);
        }
        self.advance_turn();
        GameEvent::Continued
    }

    fn advance_turn(&mut self) {
        if self.winner.is_none() {
            self.current_turn = self.current_turn.opponent();
        }
    }
}

fn default_selector(config: &GameConfig) -> Box<dyn MoveSelector> {
    match config.noise_seed {
        Some(seed) => Box::new(HeuristicSelector::with_noise(seed)),
        None => Box::new(HeuristicSelector::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;

    struct FixedMoveSelector {
        mv: Option<Move>,
    }

    impl MoveSelector for FixedMoveSelector {
        fn select_move(
            &mut self,
            _board: &Board,
            _mover: Side,
            _policy: CapturePolicy,
        ) -> Option<Move> {
            self.mv
        }
    }

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    fn moved(from: Position, to: Position) -> Option<Reply> {
        Some(Reply::Moved(Move::new(from, to)))
    }

    fn board_with(pieces: &[(u8, u8, Side)]) -> Board {
        let mut board = Board::empty();
        for &(row, col, side) in pieces {
            board.set(row, col, Square::Occupied(side)).unwrap();
        }
        board
    }

    fn two_player() -> GameConfig {
        GameConfig::new(Mode::TwoPlayer)
    }

    #[test]
    fn initial_state_is_correct() {
        let game = GameState::new_game(GameConfig::default());
        let view = game.view();

        assert_eq!(view.current_turn, Side::Near);
        assert_eq!(view.near_count, 8);
        assert_eq!(view.far_count, 8);
        assert_eq!(view.winner, None);
        assert_eq!(view.selection, None);
        assert_eq!(view.last_move, None);
        assert!(game.has_legal_moves());
    }

    #[test]
    fn illegal_move_returns_error_and_keeps_state() {
        let mut game = GameState::new_game(GameConfig::default());
        let before = game.view();

        let err = game.attempt_move(pos(6, 0), pos(4, 0)).unwrap_err();

        let rejected = Move::new(pos(6, 0), pos(4, 0));
        assert_eq!(err, EngineError::IllegalMove(rejected));
        assert_eq!(game.view(), before);
    }

    #[test]
    fn two_player_turns_alternate() {
        let mut game = GameState::new_game(two_player());

        let outcome = game.attempt_move(pos(6, 0), pos(5, 0)).unwrap();
        assert_eq!(outcome.event, GameEvent::Continued);
        assert_eq!(outcome.reply, None);
        assert_eq!(game.current_turn(), Side::Far);

        assert!(game.attempt_move(pos(5, 0), pos(4, 0)).is_err());
        game.attempt_move(pos(1, 0), pos(2, 0)).unwrap();
        assert_eq!(game.current_turn(), Side::Near);
    }

    #[test]
    fn single_player_gets_an_automated_reply() {
        let mut game = GameState::new_game(GameConfig::default());

        let outcome = game.attempt_move(pos(6, 3), pos(5, 3)).unwrap();

        assert_eq!(outcome.event, GameEvent::Continued);
        assert_eq!(outcome.reply, moved(pos(1, 0), pos(2, 0)));
        assert_eq!(game.current_turn(), Side::Near);
        assert_eq!(game.get_square(2, 0), Ok(Square::Occupied(Side::Far)));
        assert_eq!(game.get_square(5, 3), Ok(Square::Occupied(Side::Near)));
    }

    #[test]
    fn same_noise_seed_replays_the_same_replies() {
        let config = GameConfig::default().with_noise_seed(11);
        let mut left = GameState::new_game(config);
        let mut right = GameState::new_game(config);

        for (from, to) in [
            (pos(6, 0), pos(5, 0)),
            (pos(6, 7), pos(5, 7)),
            (pos(6, 3), pos(5, 3)),
        ] {
            let expected = left.attempt_move(from, to).unwrap();
            let actual = right.attempt_move(from, to).unwrap();

            assert!(matches!(expected.reply, Some(Reply::Moved(_))));
            assert_eq!(actual, expected);
        }
        assert_eq!(right.view(), left.view());
    }

    #[test]
    fn automated_side_opens_when_it_moves_first() {
        let config = GameConfig::default().with_first_mover(Side::Far);
        let game = GameState::new_game(config);

        assert_eq!(game.current_turn(), Side::Near);
        assert_eq!(game.last_reply(), moved(pos(1, 0), pos(2, 0)));
    }

    #[test]
    fn reaching_the_goal_row_wins_and_ends_the_game() {
        let board = board_with(&[(1, 3, Side::Near), (5, 5, Side::Far)]);
        let mut game = GameState::from_position(
            GameConfig::default(),
            board,
            Side::Near,
            Box::new(HeuristicSelector::new()),
        );

        let outcome = game.attempt_move(pos(1, 3), pos(0, 3)).unwrap();

        assert_eq!(outcome.event, GameEvent::Won(Side::Near));
        assert_eq!(outcome.reply, None);
        assert_eq!(game.is_game_over(), Some(Side::Near));
        assert_eq!(game.current_turn(), Side::Near);
        assert!(game.attempt_move(pos(0, 3), pos(0, 4)).is_err());
        assert!(game.pass().is_err());
    }

    #[test]
    fn automated_win_is_reported_in_the_outcome() {
        let board = board_with(&[(6, 0, Side::Far), (4, 4, Side::Near)]);
        let mut game = GameState::from_position(
            GameConfig::default(),
            board,
            Side::Near,
            Box::new(HeuristicSelector::new()),
        );

        let outcome = game.attempt_move(pos(4, 4), pos(3, 4)).unwrap();

        assert_eq!(outcome.event, GameEvent::Won(Side::Far));
        assert_eq!(outcome.reply, moved(pos(6, 0), pos(7, 0)));
        assert_eq!(game.is_game_over(), Some(Side::Far));
    }

    #[test]
    fn capturing_the_last_piece_wins() {
        let board = board_with(&[(4, 4, Side::Near), (3, 4, Side::Far)]);
        let mut game = GameState::from_position(
            two_player(),
            board,
            Side::Near,
            Box::new(FirstLegalMoveSelector),
        );

        let outcome = game.attempt_move(pos(4, 4), pos(3, 4)).unwrap();

        assert_eq!(outcome.event, GameEvent::Won(Side::Near));
        assert_eq!(game.view().last_capture, Some(pos(3, 4)));
        assert_eq!(game.view().far_count, 0);
    }

    #[test]
    fn automated_side_passes_without_legal_moves() {
        let board = board_with(&[
            (0, 0, Side::Far),
            (1, 0, Side::Near),
            (0, 1, Side::Near),
            (5, 5, Side::Near),
        ]);
        let config = GameConfig::default().with_capture(CapturePolicy::Blocked);
        let selector = Box::new(HeuristicSelector::new());
        let mut game = GameState::from_position(config, board, Side::Near, selector);

        let outcome = game.attempt_move(pos(5, 5), pos(4, 5)).unwrap();

        assert_eq!(outcome.event, GameEvent::Continued);
        assert_eq!(outcome.reply, Some(Reply::Passed));
        assert_eq!(game.current_turn(), Side::Near);
    }

    #[test]
    fn illegal_selector_move_becomes_a_pass() {
        let selector = FixedMoveSelector {
            mv: Some(Move::new(pos(1, 0), pos(3, 0))),
        };
        let mut game = GameState::new(GameConfig::default(), Box::new(selector));

        let outcome = game.attempt_move(pos(6, 0), pos(5, 0)).unwrap();

        assert_eq!(outcome.reply, Some(Reply::Passed));
        assert_eq!(game.board().count(Side::Far), 8);
        assert_eq!(game.current_turn(), Side::Near);
    }

    #[test]
    fn pass_is_rejected_while_a_move_exists() {
        let mut game = GameState::new_game(two_player());

        let err = game.pass().unwrap_err();

        assert_eq!(err, EngineError::PassRejected(Side::Near));
    }

    #[test]
    fn pass_switches_turn_when_boxed_in() {
        let board = board_with(&[(0, 0, Side::Near), (1, 0, Side::Far), (0, 1, Side::Far)]);
        let config = two_player().with_capture(CapturePolicy::Blocked);
        let selector = Box::new(FirstLegalMoveSelector);
        let mut game = GameState::from_position(config, board, Side::Near, selector);

        assert!(!game.has_legal_moves());
        let outcome = game.pass().unwrap();

        assert_eq!(outcome.event, GameEvent::Continued);
        assert_eq!(outcome.reply, None);
        assert_eq!(game.current_turn(), Side::Far);
    }

    #[test]
    fn selection_toggles_on_own_pieces_only() {
        let mut game = GameState::new_game(two_player());

        assert_eq!(game.toggle_selection(6, 2), Ok(Some(pos(6, 2))));
        assert_eq!(game.toggle_selection(6, 2), Ok(None));
        assert_eq!(game.toggle_selection(1, 2), Ok(None));
        assert_eq!(game.toggle_selection(6, 3), Ok(Some(pos(6, 3))));
        assert_eq!(game.toggle_selection(4, 4), Ok(None));
        assert_eq!(
            game.toggle_selection(-1, 4),
            Err(EngineError::OutOfBounds { row: -1, col: 4 })
        );
    }

    #[test]
    fn move_selection_uses_the_selected_piece() {
        let mut game = GameState::new_game(two_player());

        let err = game.move_selection_to(5, 2).unwrap_err();
        assert_eq!(err, EngineError::NoSelection);

        game.toggle_selection(6, 2).unwrap();
        let err = game.move_selection_to(4, 2).unwrap_err();
        let rejected = Move::new(pos(6, 2), pos(4, 2));
        assert_eq!(err, EngineError::IllegalMove(rejected));
        assert_eq!(game.selection(), Some(pos(6, 2)));

        game.move_selection_to(5, 2).unwrap();
        assert_eq!(game.selection(), None);
        assert_eq!(game.get_square(5, 2), Ok(Square::Occupied(Side::Near)));
    }

    #[test]
    fn restart_restores_the_initial_setup() {
        let mut game = GameState::new_game(GameConfig::default());
        game.attempt_move(pos(6, 0), pos(5, 0)).unwrap();

        game.restart();

        assert_eq!(*game.board(), Board::create_initial());
        assert_eq!(game.current_turn(), Side::Near);
        assert_eq!(game.view().last_move, None);
        assert_eq!(game.is_game_over(), None);
    }

    #[test]
    fn legal_destinations_only_for_the_side_to_move() {
        let game = GameState::new_game(two_player());

        let destinations = game.legal_destinations(pos(6, 4));

        assert_eq!(destinations, vec![pos(5, 4), pos(7, 4)]);
        assert!(game.legal_destinations(pos(1, 4)).is_empty());
    }
}
