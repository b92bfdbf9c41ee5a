use std::collections::{HashSet, VecDeque};

use chrono::prelude::*;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Lifecycle of a single session.
///
/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    InProgress,
    Won,
    Lost,
}

impl SessionState {
    /// Indicates the session has ended and no moves are accepted anymore.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::InProgress
    }
}

/// What a single click did, as handed back to the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RevealResult {
    /// The cell was already revealed, nothing changed.
    AlreadyRevealed,
    /// The click hit a mine; carries every mine so the board can be shown.
    MineHit(Vec<(Coord2, CellView)>),
    /// Every cell revealed by this click, cascade included.
    Revealed(Vec<(Coord2, CellView)>),
}

/// A game from start to finish: owns the mine layout, the hint grid built
/// from it, and the per-cell visibility board the reveals mutate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    mine_layout: MineLayout,
    hints: HintGrid,
    board: Array2<CellState>,
    revealed_count: CellCount,
    click_count: u32,
    state: SessionState,
    triggered_mine: Option<Coord2>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    /// The hint grid is fully built here, before any reveal can happen.
    pub fn new(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        let hints = HintGrid::build(&mine_layout);
        Self {
            mine_layout,
            hints,
            board: Array2::default(size.to_nd_index()),
            revealed_count: 0,
            click_count: 0,
            state: Default::default(),
            triggered_mine: None,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Fresh session from the default random generation. Starting a new
    /// game is just dropping the old session and calling this again.
    pub fn from_config(config: GameConfig, seed: u64) -> Self {
        Self::new(RandomLayoutGenerator::new(seed).generate(config))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// Clicks that changed something; re-clicks of revealed cells don't count.
    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    pub fn cell_at(&self, coords: Coord2) -> CellState {
        self.board[coords.to_nd_index()]
    }

    /// Hint for `coords`, `None` for mines.
    pub fn hint_of(&self, coords: Coord2) -> Option<u8> {
        self.hints.hint_of(coords)
    }

    /// The mine that ended the session, if it ended in a loss.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// How many seconds the session has been running, frozen once it ends.
    pub fn elapsed_secs(&self) -> u32 {
        (self.ended_at.unwrap_or_else(Utc::now) - self.started_at)
            .num_seconds()
            .max(0) as u32
    }

    /// Single entry point for a player click.
    ///
    /// Dispatch: a mine loses the session, a positive-hint cell is
    /// revealed alone, a zero-hint cell starts the flood fill. Clicking
    /// a revealed cell is a no-op, not an error.
    pub fn on_cell_clicked(&mut self, coords: Coord2) -> Result<RevealResult> {
        let coords = self.mine_layout.validate_coords(coords)?;
        self.check_in_progress()?;

        if matches!(self.board[coords.to_nd_index()], CellState::Revealed) {
            return Ok(RevealResult::AlreadyRevealed);
        }

        self.click_count += 1;

        if self.mine_layout.contains_mine(coords) {
            self.triggered_mine = Some(coords);
            self.end_session(false);
            let mines = self
                .mine_layout
                .iter_mines()
                .map(|pos| (pos, CellView::Mine))
                .collect();
            return Ok(RevealResult::MineHit(mines));
        }

        let hint = self.hints.hint_of(coords).expect("free cell has a hint");
        self.reveal_cell(coords);
        let mut revealed = vec![(coords, CellView::Hint(hint))];

        if hint == 0 {
            self.flood_reveal(coords, &mut revealed);
        }
        log::debug!("click at {:?} revealed {} cells", coords, revealed.len());

        if self.revealed_count == self.mine_layout.safe_cell_count() {
            self.end_session(true);
        }

        Ok(RevealResult::Revealed(revealed))
    }

    /// Breadth-first expansion from a just-revealed zero-hint cell.
    ///
    /// Zero-hint neighbors keep the cascade going, positive-hint
    /// neighbors are revealed but never expanded, mines are skipped
    /// outright. The visited set admits each coordinate once, so the
    /// walk terminates on any grid shape.
    fn flood_reveal(&mut self, start: Coord2, revealed: &mut Vec<(Coord2, CellView)>) {
        let mut visited = HashSet::from([start]);
        let mut frontier: VecDeque<_> = self
            .mine_layout
            .iter_neighbors(start)
            .filter(|&pos| self.board[pos.to_nd_index()].is_hidden())
            .collect();
        log::trace!(
            "starting flood fill from {:?}, initial frontier: {:?}",
            start,
            frontier
        );

        while let Some(visit_coords) = frontier.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            if matches!(self.board[visit_coords.to_nd_index()], CellState::Revealed) {
                continue;
            }

            // mines are never opened by the cascade
            let Some(hint) = self.hints.hint_of(visit_coords) else {
                continue;
            };

            self.reveal_cell(visit_coords);
            revealed.push((visit_coords, CellView::Hint(hint)));
            log::trace!("flood revealed {:?}, hint: {}", visit_coords, hint);

            // positive hints form the boundary of the cascade
            if hint == 0 {
                frontier.extend(
                    self.mine_layout
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| self.board[pos.to_nd_index()].is_hidden())
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn reveal_cell(&mut self, coords: Coord2) {
        self.board[coords.to_nd_index()] = CellState::Revealed;
        self.revealed_count += 1;
    }

    fn end_session(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            SessionState::Won
        } else {
            SessionState::Lost
        };
        self.ended_at = Some(Utc::now());
        log::debug!("session ended, won: {}", won);
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(size: Coord2, mines: &[Coord2]) -> GameSession {
        GameSession::new(MineLayout::from_mine_coords(size, mines).unwrap())
    }

    fn revealed_cells(result: RevealResult) -> Vec<(Coord2, CellView)> {
        match result {
            RevealResult::Revealed(cells) => cells,
            other => panic!("expected Revealed, got {:?}", other),
        }
    }

    #[test]
    fn mine_click_loses_and_reports_every_mine() {
        let mut session = session((2, 2), &[(0, 0), (1, 1)]);

        let result = session.on_cell_clicked((0, 0)).unwrap();

        let RevealResult::MineHit(mines) = result else {
            panic!("expected MineHit");
        };
        assert_eq!(mines, vec![((0, 0), CellView::Mine), ((1, 1), CellView::Mine)]);
        assert_eq!(session.state(), SessionState::Lost);
        assert_eq!(session.triggered_mine(), Some((0, 0)));
    }

    #[test]
    fn input_after_loss_is_rejected_and_changes_nothing() {
        let mut session = session((2, 2), &[(0, 0)]);
        session.on_cell_clicked((0, 0)).unwrap();

        let result = session.on_cell_clicked((1, 1));

        assert_eq!(result.unwrap_err(), GameError::AlreadyEnded);
        assert_eq!(session.cell_at((1, 1)), CellState::Hidden);
        assert_eq!(session.revealed_count(), 0);
        assert_eq!(session.click_count(), 1);
    }

    #[test]
    fn positive_hint_click_reveals_that_cell_only() {
        let mut session = session((3, 3), &[(0, 0)]);

        let cells = revealed_cells(session.on_cell_clicked((1, 1)).unwrap());

        assert_eq!(cells, vec![((1, 1), CellView::Hint(1))]);
        assert_eq!(session.cell_at((1, 2)), CellState::Hidden);
        assert_eq!(session.state(), SessionState::InProgress);
    }

    #[test]
    fn reclick_of_a_revealed_cell_is_a_no_op() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.on_cell_clicked((1, 1)).unwrap();

        let result = session.on_cell_clicked((1, 1)).unwrap();

        assert_eq!(result, RevealResult::AlreadyRevealed);
        assert_eq!(session.revealed_count(), 1);
        assert_eq!(session.click_count(), 1);
    }

    #[test]
    fn out_of_bounds_click_is_rejected() {
        let mut session = session((3, 3), &[(0, 0)]);

        assert_eq!(
            session.on_cell_clicked((3, 1)).unwrap_err(),
            GameError::InvalidCoords
        );
    }

    #[test]
    fn cascade_opens_zero_region_up_to_the_hint_ring() {
        // single mine in a corner, everything else one flat zero region
        let mut session = session((4, 4), &[(3, 3)]);

        let cells = revealed_cells(session.on_cell_clicked((0, 0)).unwrap());

        assert_eq!(cells.len(), 15);
        assert!(cells.contains(&((0, 0), CellView::Hint(0))));
        assert!(cells.contains(&((2, 2), CellView::Hint(1))));
        assert!(cells.contains(&((2, 3), CellView::Hint(1))));
        assert!(cells.contains(&((3, 2), CellView::Hint(1))));
        assert_eq!(session.cell_at((3, 3)), CellState::Hidden);
        assert_eq!(session.state(), SessionState::Won);
    }

    #[test]
    fn cascade_stops_at_hint_cells_without_expanding_them() {
        // one row, mine in the middle: the left zero region must not
        // leak past the hint at (0, 1)
        let mut session = session((1, 5), &[(0, 2)]);

        let cells = revealed_cells(session.on_cell_clicked((0, 0)).unwrap());

        assert_eq!(
            cells,
            vec![((0, 0), CellView::Hint(0)), ((0, 1), CellView::Hint(1))]
        );
        assert_eq!(session.cell_at((0, 2)), CellState::Hidden);
        assert_eq!(session.cell_at((0, 3)), CellState::Hidden);
        assert_eq!(session.cell_at((0, 4)), CellState::Hidden);
        assert_eq!(session.state(), SessionState::InProgress);
    }

    #[test]
    fn cascade_visits_each_cell_once_on_a_mineless_board() {
        let mut session = session((6, 6), &[]);

        let cells = revealed_cells(session.on_cell_clicked((2, 3)).unwrap());

        assert_eq!(cells.len(), 36);
        let unique: HashSet<_> = cells.iter().map(|&(pos, _)| pos).collect();
        assert_eq!(unique.len(), 36);
        assert_eq!(session.state(), SessionState::Won);
    }

    #[test]
    fn revealing_every_safe_cell_wins() {
        let mut session = session((2, 1), &[(0, 0)]);

        let cells = revealed_cells(session.on_cell_clicked((1, 0)).unwrap());

        assert_eq!(cells, vec![((1, 0), CellView::Hint(1))]);
        assert_eq!(session.state(), SessionState::Won);
        assert!(session.is_finished());
    }

    #[test]
    fn from_config_runs_the_default_generation() {
        let config = GameConfig::with_default_density((8, 8));

        let session = GameSession::from_config(config, 42);

        assert_eq!(session.size(), (8, 8));
        assert_eq!(session.total_mines(), 6);
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.elapsed_secs(), 0);
    }

    #[test]
    fn session_round_trips_through_serde() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.on_cell_clicked((2, 2)).unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let restored: GameSession = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, session);
    }
}
