//! The game-loop orchestrator.
//!
//! One [`Orchestrator::tick`] per main-loop iteration: route input, advance
//! the background search when it is an engine turn, and report whether a
//! committed move now needs animating. The caller drains
//! [`Orchestrator::next_frame`] after an [`TickOutcome::Animate`] before the
//! next tick; the commit is settled (legal moves recomputed, terminal state
//! relayed) when the last frame has been taken.
//!
//! Nothing here blocks. The search worker lives in another process and is
//! only ever polled.

pub mod animation;
pub mod input;
pub mod search;
pub mod selection;
pub mod session;
pub mod turn;

use chess::{Coord, Game, GameMove};
use engine::SearchSpawner;

use crate::sound::Sound;
use animation::{AnimationFrame, AnimationJob};
use input::{Control, InputEvent};
use search::{SearchOrchestrator, SearchStep};
use selection::{ClickOutcome, SelectionState};
use session::Session;
use turn::SeatConfig;

/// Where the loop stands between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopPhase {
    #[default]
    AwaitingInput,
    /// A move was played this tick and is not yet settled.
    MoveCommitted,
    Animating,
    SearchRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    /// Drain `next_frame` before the next tick.
    Animate,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSettings {
    pub enabled: bool,
    pub frames_per_square: u32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            frames_per_square: animation::DEFAULT_FRAMES_PER_SQUARE,
        }
    }
}

pub struct Orchestrator<S> {
    session: Session,
    selection: SelectionState,
    search: SearchOrchestrator<S>,
    phase: LoopPhase,
    animation: Option<AnimationJob>,
    settings: AnimationSettings,
    sound: Sound,
}

impl<S: SearchSpawner> Orchestrator<S> {
    pub fn new(seats: SeatConfig, spawner: S, settings: AnimationSettings) -> Self {
        Self::with_game(Game::new(), seats, SearchOrchestrator::new(spawner), settings)
    }

    pub fn with_game(
        game: Game,
        seats: SeatConfig,
        search: SearchOrchestrator<S>,
        settings: AnimationSettings,
    ) -> Self {
        tracing::info!(
            white = seats.label(chess::PieceColor::White),
            black = seats.label(chess::PieceColor::Black),
            "Session started"
        );
        Self {
            session: Session::with_game(game, seats),
            selection: SelectionState::new(),
            search,
            phase: LoopPhase::AwaitingInput,
            animation: None,
            settings,
            sound: Sound::default(),
        }
    }

    pub fn with_sound(mut self, sound: Sound) -> Self {
        self.sound = sound;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn search(&self) -> &SearchOrchestrator<S> {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut SearchOrchestrator<S> {
        &mut self.search
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn animation(&self) -> Option<&AnimationJob> {
        self.animation.as_ref()
    }

    pub fn sound(&self) -> &Sound {
        &self.sound
    }

    pub fn sound_mut(&mut self) -> &mut Sound {
        &mut self.sound
    }

    pub fn is_thinking(&self) -> bool {
        self.search.is_running()
    }

    /// Destinations of the selected piece, when it belongs to the side to
    /// move.
    pub fn highlighted_destinations(&self) -> Vec<Coord> {
        let Some(selected) = self.selection.selected() else {
            return Vec::new();
        };
        let game = self.session.game();
        if game.piece_at(selected).color() != Some(game.side_to_move()) {
            return Vec::new();
        }
        self.session
            .legal_moves()
            .iter()
            .filter(|mv| mv.from == selected)
            .map(|mv| mv.to)
            .collect()
    }

    /// Run one iteration of the loop.
    pub fn tick<I>(&mut self, events: I) -> TickOutcome
    where
        I: IntoIterator<Item = InputEvent>,
    {
        if self.animation.is_some() {
            tracing::debug!("Tick with an undrained animation, settling it");
            self.settle_commit();
        }
        self.search.begin_tick();
        if self.session.is_game_over() {
            self.selection.clear();
        }

        for event in events {
            match event {
                InputEvent::Control(Control::Quit) => {
                    self.shutdown();
                    return TickOutcome::Quit;
                }
                InputEvent::Control(Control::Undo) => self.undo(),
                InputEvent::Control(Control::Reset) => self.reset(),
                InputEvent::Control(Control::ToggleSound) => self.sound.toggle(),
                InputEvent::SquareClicked(coord) => self.on_square_clicked(coord),
            }
        }

        if self.phase != LoopPhase::MoveCommitted
            && !self.session.is_game_over()
            && !self.session.is_human_turn()
        {
            let step = self
                .search
                .step(self.session.game(), self.session.legal_moves());
            if step == SearchStep::Ready {
                if let Some(mv) = self.search.take_completed() {
                    self.commit(mv);
                }
            }
        }

        self.finish_tick()
    }

    /// Next animation frame, or `None` once the move has been settled.
    pub fn next_frame(&mut self) -> Option<AnimationFrame> {
        let frame = self.animation.as_mut()?.next_frame();
        if frame.is_none() {
            self.settle_commit();
        }
        frame
    }

    /// Stop any outstanding search. Called on quit.
    pub fn shutdown(&mut self) {
        self.animation = None;
        self.search.shutdown();
        tracing::info!("Orchestrator shut down");
    }

    fn on_square_clicked(&mut self, coord: Coord) {
        if self.session.is_game_over() {
            tracing::trace!(%coord, "Click ignored, game over");
            return;
        }
        if self.phase == LoopPhase::MoveCommitted {
            tracing::trace!(%coord, "Click ignored, move pending");
            return;
        }

        let may_commit = self.session.is_human_turn();
        match self
            .selection
            .on_square_clicked(coord, self.session.legal_moves(), may_commit)
        {
            ClickOutcome::Commit(mv) => self.commit(mv),
            ClickOutcome::Reselected(origin) => {
                tracing::debug!(%origin, "No legal move for click pair");
            }
            ClickOutcome::Selected(_) | ClickOutcome::Deselected => {}
        }
    }

    fn commit(&mut self, mv: GameMove) {
        if let Err(e) = self.session.commit(&mv) {
            tracing::error!(mv = %mv, "Move rejected by rules engine: {}", e);
            return;
        }
        let played = self.session.game().last_move().copied().unwrap_or(mv);

        self.selection.clear();
        self.sound.move_played();
        self.phase = LoopPhase::MoveCommitted;
        self.animation = self.settings.enabled.then(|| {
            AnimationJob::new(
                played,
                self.session.game().grid(),
                self.settings.frames_per_square,
            )
        });
    }

    fn undo(&mut self) {
        self.search.cancel();
        self.search.suppress_this_tick();
        self.animation = None;
        self.session.undo();
        self.selection.clear();
        self.phase = LoopPhase::AwaitingInput;
    }

    fn reset(&mut self) {
        self.search.cancel();
        self.search.suppress_this_tick();
        self.animation = None;
        self.session.reset();
        self.selection.clear();
        self.phase = LoopPhase::AwaitingInput;
    }

    fn settle_commit(&mut self) {
        self.animation = None;
        self.session.refresh();
        self.phase = self.resting_phase();
    }

    fn finish_tick(&mut self) -> TickOutcome {
        if self.phase == LoopPhase::MoveCommitted {
            if self.animation.is_some() {
                self.phase = LoopPhase::Animating;
                return TickOutcome::Animate;
            }
            self.settle_commit();
            return TickOutcome::Idle;
        }
        self.phase = self.resting_phase();
        TickOutcome::Idle
    }

    fn resting_phase(&self) -> LoopPhase {
        if self.search.is_running() {
            LoopPhase::SearchRunning
        } else {
            LoopPhase::AwaitingInput
        }
    }
}
