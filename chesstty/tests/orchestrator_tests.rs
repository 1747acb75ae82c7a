use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chess::{Coord, Game, GameMove, PieceColor, TerminalState};
use chesstty::core::search::{SearchOrchestrator, SearchTask};
use chesstty::{AnimationSettings, Control, InputEvent, LoopPhase, Orchestrator, SeatConfig, TickOutcome};
use engine::{EngineError, SearchJob, SearchReply, SearchRequest, SearchSpawner, Worker};
use tokio::sync::oneshot;

/// Worker whose lifetime the test controls
struct ScriptedWorker {
    alive: Arc<AtomicBool>,
    killed: Arc<AtomicBool>,
}

impl Worker for ScriptedWorker {
    fn is_alive(&mut self) -> bool {
        self.alive.load(Ordering::SeqCst) && !self.killed.load(Ordering::SeqCst)
    }

    fn kill(&mut self) {
        self.killed.store(true, Ordering::SeqCst);
    }
}

/// The test's side of one spawned worker
struct ScriptedJob {
    request: SearchRequest,
    reply: Option<oneshot::Sender<SearchReply>>,
    alive: Arc<AtomicBool>,
    killed: Arc<AtomicBool>,
}

impl ScriptedJob {
    /// Write a result and exit, like a worker process would. Returns false
    /// when the receiver was already closed.
    fn reply(&mut self, reply: SearchReply) -> bool {
        self.alive.store(false, Ordering::SeqCst);
        match self.reply.take() {
            Some(tx) => tx.send(reply).is_ok(),
            None => false,
        }
    }

    /// Play the move whose origin and destination match.
    fn reply_with(&mut self, from: Coord, to: Coord) -> bool {
        let mv = *self
            .request
            .legal_moves
            .iter()
            .find(|mv| mv.matches(from, to))
            .expect("requested move is legal");
        self.reply(SearchReply::Move(mv))
    }

    /// Exit without writing anything, keeping the channel open.
    fn exit_silently(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    fn drop_sender(&mut self) {
        self.reply.take();
    }

    fn is_killed(&self) -> bool {
        self.killed.load(Ordering::SeqCst)
    }

    fn is_live(&self) -> bool {
        self.alive.load(Ordering::SeqCst) && !self.is_killed()
    }
}

#[derive(Default)]
struct ScriptedSpawner {
    jobs: Vec<ScriptedJob>,
    fail: bool,
}

impl SearchSpawner for ScriptedSpawner {
    fn spawn(&mut self, request: SearchRequest) -> Result<SearchJob, EngineError> {
        if self.fail {
            return Err(EngineError::Spawn(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such engine",
            )));
        }
        let (tx, rx) = oneshot::channel();
        let alive = Arc::new(AtomicBool::new(true));
        let killed = Arc::new(AtomicBool::new(false));
        self.jobs.push(ScriptedJob {
            request,
            reply: Some(tx),
            alive: alive.clone(),
            killed: killed.clone(),
        });
        Ok(SearchJob::new(Box::new(ScriptedWorker { alive, killed }), rx))
    }
}

type TestLoop = Orchestrator<ScriptedSpawner>;

fn no_animation() -> AnimationSettings {
    AnimationSettings {
        enabled: false,
        ..AnimationSettings::default()
    }
}

fn orchestrator(seats: SeatConfig, settings: AnimationSettings) -> TestLoop {
    Orchestrator::with_game(
        Game::new(),
        seats,
        SearchOrchestrator::new(ScriptedSpawner::default()),
        settings,
    )
}

fn from_fen(fen: &str, seats: SeatConfig) -> TestLoop {
    Orchestrator::with_game(
        Game::from_fen(fen).unwrap(),
        seats,
        SearchOrchestrator::new(ScriptedSpawner::default()),
        AnimationSettings::default(),
    )
}

fn idle_tick(orch: &mut TestLoop) -> TickOutcome {
    orch.tick(std::iter::empty())
}

fn click(row: u16, col: u16) -> InputEvent {
    InputEvent::click(row, col)
}

/// Drain the animation and return how many frames it produced.
fn drain(orch: &mut TestLoop) -> u32 {
    let mut frames = 0;
    while orch.next_frame().is_some() {
        frames += 1;
    }
    frames
}

fn jobs(orch: &mut TestLoop) -> &mut Vec<ScriptedJob> {
    &mut orch.search_mut().spawner_mut().jobs
}

mod human_vs_engine {
    use super::*;

    #[test]
    fn human_move_animates_then_engine_searches_once() {
        let mut orch = orchestrator(SeatConfig::human_as(PieceColor::White), AnimationSettings::default());

        assert_eq!(orch.tick([click(6, 4)]), TickOutcome::Idle);
        assert_eq!(orch.selection().selected(), Some(Coord::new(6, 4)));
        assert_eq!(orch.highlighted_destinations().len(), 2);

        assert_eq!(orch.tick([click(4, 4)]), TickOutcome::Animate);
        assert_eq!(orch.phase(), LoopPhase::Animating);
        assert_eq!(orch.animation().map(|job| job.total_frames()), Some(20));
        assert_eq!(orch.search().spawned(), 0);

        assert_eq!(drain(&mut orch), 21);
        assert_eq!(orch.phase(), LoopPhase::AwaitingInput);
        assert_eq!(orch.session().game().side_to_move(), PieceColor::Black);
        assert_eq!(orch.session().legal_moves().len(), 20);

        for _ in 0..5 {
            assert_eq!(idle_tick(&mut orch), TickOutcome::Idle);
        }
        assert_eq!(orch.search().spawned(), 1);
        assert_eq!(orch.phase(), LoopPhase::SearchRunning);
        assert!(orch.is_thinking());

        assert!(jobs(&mut orch)[0].reply_with(Coord::new(1, 4), Coord::new(3, 4)));
        assert_eq!(idle_tick(&mut orch), TickOutcome::Animate);
        drain(&mut orch);

        let game = orch.session().game();
        assert_eq!(game.side_to_move(), PieceColor::White);
        assert_eq!(game.history().len(), 2);
        assert_eq!(game.last_move().map(|mv| mv.uci()), Some("e7e5".to_string()));
        assert!(!orch.is_thinking());
    }

    #[test]
    fn engine_request_carries_snapshot_and_legal_moves() {
        let mut orch = orchestrator(SeatConfig::human_as(PieceColor::Black), no_animation());
        idle_tick(&mut orch);

        let job = &jobs(&mut orch)[0];
        assert_eq!(job.request.legal_moves.len(), 20);
        assert_eq!(job.request.snapshot.side_to_move(), PieceColor::White);
    }

    #[test]
    fn clicks_during_engine_turn_never_commit() {
        let mut orch = orchestrator(SeatConfig::human_as(PieceColor::Black), no_animation());
        idle_tick(&mut orch);

        // A legal white move, but white is the engine.
        orch.tick([click(6, 4), click(4, 4)]);
        assert!(orch.session().game().history().is_empty());
        assert_eq!(orch.selection().pending_clicks(), &[Coord::new(4, 4)]);
        assert!(orch.selection().pending_clicks().len() <= 2);
    }

    #[test]
    fn same_square_twice_deselects() {
        let mut orch = orchestrator(SeatConfig::human_as(PieceColor::White), AnimationSettings::default());
        orch.tick([click(6, 4), click(6, 4)]);
        assert_eq!(orch.selection().selected(), None);
        assert!(orch.selection().pending_clicks().is_empty());
        assert!(orch.session().game().history().is_empty());
    }

    #[test]
    fn clicks_after_commit_in_same_tick_are_ignored() {
        let mut orch = orchestrator(SeatConfig::human_vs_human(), no_animation());
        orch.tick([click(6, 4), click(4, 4), click(1, 4), click(3, 4)]);
        assert_eq!(orch.session().game().history().len(), 1);
        assert_eq!(orch.selection().selected(), None);
    }
}

mod undo_and_reset {
    use super::*;

    #[test]
    fn undo_mid_search_kills_worker_and_reverts() {
        let mut orch = orchestrator(SeatConfig::human_as(PieceColor::White), no_animation());
        orch.tick([click(6, 4), click(4, 4)]);
        idle_tick(&mut orch);
        assert_eq!(orch.search().spawned(), 1);

        orch.tick([Control::Undo.into()]);
        assert!(matches!(orch.search().task(), SearchTask::Cancelled));
        assert!(jobs(&mut orch)[0].is_killed());
        assert!(orch.session().game().history().is_empty());
        assert_eq!(orch.session().game().side_to_move(), PieceColor::White);
        assert_eq!(orch.phase(), LoopPhase::AwaitingInput);

        // The killed worker's late result goes nowhere.
        assert!(!jobs(&mut orch)[0].reply_with(Coord::new(1, 4), Coord::new(3, 4)));
        idle_tick(&mut orch);
        assert!(matches!(orch.search().task(), SearchTask::Idle));
        assert!(orch.session().game().history().is_empty());
    }

    #[test]
    fn undo_suppresses_spawn_for_one_tick() {
        let mut orch = orchestrator(SeatConfig::engine_vs_engine(), no_animation());
        idle_tick(&mut orch);
        assert_eq!(orch.search().spawned(), 1);

        orch.tick([Control::Undo.into()]);
        assert_eq!(orch.search().spawned(), 1);
        assert!(orch.search().is_suppressed());
        assert!(matches!(orch.search().task(), SearchTask::Cancelled));

        idle_tick(&mut orch);
        assert_eq!(orch.search().spawned(), 2);
        assert!(orch.search().is_running());
        assert!(jobs(&mut orch)[0].is_killed());
        assert!(!jobs(&mut orch)[1].is_killed());
    }

    #[test]
    fn reset_while_running() {
        let mut orch = orchestrator(SeatConfig::engine_vs_engine(), no_animation());
        idle_tick(&mut orch);
        assert!(jobs(&mut orch)[0].reply_with(Coord::new(6, 4), Coord::new(4, 4)));
        idle_tick(&mut orch);
        assert_eq!(orch.session().game().history().len(), 1);

        idle_tick(&mut orch);
        assert_eq!(orch.search().spawned(), 2);

        orch.tick([Control::Reset.into()]);
        assert!(jobs(&mut orch)[1].is_killed());
        assert!(orch.session().game().history().is_empty());
        assert_eq!(orch.session().legal_moves().len(), 20);
        assert_eq!(orch.search().spawned(), 2);

        idle_tick(&mut orch);
        assert_eq!(orch.search().spawned(), 3);
    }

    #[test]
    fn undo_with_empty_history_still_cancels() {
        let mut orch = orchestrator(SeatConfig::engine_vs_engine(), no_animation());
        idle_tick(&mut orch);
        orch.tick([Control::Undo.into()]);
        assert!(jobs(&mut orch)[0].is_killed());
        assert!(orch.session().game().history().is_empty());
    }

    #[test]
    fn undo_during_animation_drops_it() {
        let mut orch = orchestrator(SeatConfig::human_vs_human(), AnimationSettings::default());
        assert_eq!(orch.tick([click(6, 4), click(4, 4)]), TickOutcome::Animate);

        // Caller skipped the frames; the next tick settles, then undoes.
        orch.tick([Control::Undo.into()]);
        assert!(orch.animation().is_none());
        assert!(orch.session().game().history().is_empty());
        assert_eq!(orch.session().legal_moves().len(), 20);
    }
}

mod game_over {
    use super::*;

    const BEFORE_FOOLS_MATE: &str = "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2";

    fn mated() -> TestLoop {
        let mut orch = from_fen(BEFORE_FOOLS_MATE, SeatConfig::human_as(PieceColor::Black));
        // Qd8-h4#
        assert_eq!(orch.tick([click(0, 3), click(4, 7)]), TickOutcome::Animate);
        drain(&mut orch);
        orch
    }

    #[test]
    fn checkmate_is_relayed() {
        let orch = mated();
        assert!(orch.session().is_game_over());
        assert_eq!(
            orch.session().terminal(),
            TerminalState::Checkmate {
                winner: PieceColor::Black
            }
        );
        assert!(orch.session().legal_moves().is_empty());
    }

    #[test]
    fn no_search_and_no_selection_after_mate() {
        let mut orch = mated();
        for _ in 0..3 {
            orch.tick([click(6, 4)]);
        }
        assert_eq!(orch.search().spawned(), 0);
        assert_eq!(orch.selection().selected(), None);
        assert!(orch.highlighted_destinations().is_empty());
    }

    #[test]
    fn reset_after_mate_starts_fresh() {
        let mut orch = mated();
        orch.tick([Control::Reset.into()]);
        assert!(!orch.session().is_game_over());
        assert_eq!(orch.session().terminal(), TerminalState::None);
        assert_eq!(orch.session().legal_moves(), Game::new().legal_moves().as_slice());
        assert_eq!(orch.search().spawned(), 0);

        // White is the engine: it starts thinking one tick later.
        idle_tick(&mut orch);
        assert_eq!(orch.search().spawned(), 1);
    }

    #[test]
    fn stalemate_is_relayed() {
        let orch = from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", SeatConfig::engine_vs_engine());
        assert_eq!(orch.session().terminal(), TerminalState::Stalemate);
    }
}

mod search_failures {
    use super::*;

    fn start_legal() -> Vec<GameMove> {
        Game::new().legal_moves()
    }

    #[test]
    fn no_move_reply_plays_random_legal_move() {
        let mut orch = orchestrator(SeatConfig::engine_vs_engine(), no_animation());
        idle_tick(&mut orch);
        assert!(jobs(&mut orch)[0].reply(SearchReply::NoMove));
        idle_tick(&mut orch);

        let played = *orch.session().game().last_move().unwrap();
        assert!(start_legal().contains(&played));
    }

    #[test]
    fn reply_outside_legal_set_falls_back() {
        let mut after_e4 = Game::new();
        let e4 = *GameMove::find_uci(&after_e4.legal_moves(), "e2e4").unwrap();
        after_e4.make_move(&e4).unwrap();
        let black_move = *GameMove::find_uci(&after_e4.legal_moves(), "e7e5").unwrap();

        let mut orch = orchestrator(SeatConfig::engine_vs_engine(), no_animation());
        idle_tick(&mut orch);
        assert!(jobs(&mut orch)[0].reply(SearchReply::Move(black_move)));
        idle_tick(&mut orch);

        let played = *orch.session().game().last_move().unwrap();
        assert!(start_legal().contains(&played));
        assert_eq!(orch.session().game().side_to_move(), PieceColor::Black);
    }

    #[test]
    fn closed_channel_falls_back_at_once() {
        let mut orch = orchestrator(SeatConfig::engine_vs_engine(), no_animation());
        idle_tick(&mut orch);
        jobs(&mut orch)[0].drop_sender();
        idle_tick(&mut orch);
        assert_eq!(orch.session().game().history().len(), 1);
    }

    #[test]
    fn dead_worker_falls_back_after_grace_polls() {
        let mut orch = Orchestrator::with_game(
            Game::new(),
            SeatConfig::engine_vs_engine(),
            SearchOrchestrator::new(ScriptedSpawner::default()).with_exit_grace_polls(3),
            no_animation(),
        );
        idle_tick(&mut orch);
        jobs(&mut orch)[0].exit_silently();

        idle_tick(&mut orch);
        idle_tick(&mut orch);
        assert!(orch.search().is_running());
        assert!(orch.session().game().history().is_empty());

        idle_tick(&mut orch);
        assert_eq!(orch.session().game().history().len(), 1);
        assert_eq!(orch.search().spawned(), 1);
    }

    #[test]
    fn spawn_failure_plays_random_move() {
        let mut orch = orchestrator(SeatConfig::engine_vs_engine(), no_animation());
        orch.search_mut().spawner_mut().fail = true;
        idle_tick(&mut orch);

        assert_eq!(orch.search().spawned(), 0);
        let played = *orch.session().game().last_move().unwrap();
        assert!(start_legal().contains(&played));
    }
}

mod quit {
    use super::*;

    #[test]
    fn quit_kills_worker() {
        let mut orch = orchestrator(SeatConfig::engine_vs_engine(), no_animation());
        idle_tick(&mut orch);
        assert_eq!(orch.tick([Control::Quit.into()]), TickOutcome::Quit);
        assert!(jobs(&mut orch)[0].is_killed());
        assert!(matches!(orch.search().task(), SearchTask::Idle));
    }

    #[test]
    fn dropping_the_loop_kills_worker() {
        let killed;
        {
            let mut orch = orchestrator(SeatConfig::engine_vs_engine(), no_animation());
            idle_tick(&mut orch);
            killed = jobs(&mut orch)[0].killed.clone();
        }
        assert!(killed.load(Ordering::SeqCst));
    }

    #[test]
    fn sound_toggle_and_bell() {
        let mut orch = orchestrator(SeatConfig::human_vs_human(), no_animation());
        orch.tick([click(6, 4), click(4, 4)]);
        assert!(orch.sound().has_pending());

        let mut out = Vec::new();
        orch.sound_mut().ring(&mut out).unwrap();
        assert_eq!(out, b"\x07");

        orch.tick([Control::ToggleSound.into()]);
        assert!(!orch.sound().is_enabled());
    }
}

mod invariants {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Action {
        Click(u16, u16),
        Undo,
        Reset,
        Reply,
        Wait,
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            4 => (0u16..9, 0u16..9).prop_map(|(r, c)| Action::Click(r, c)),
            1 => Just(Action::Undo),
            1 => Just(Action::Reset),
            3 => Just(Action::Reply),
            3 => Just(Action::Wait),
        ]
    }

    proptest! {
        #[test]
        fn at_most_one_live_worker(
            white_human in any::<bool>(),
            actions in proptest::collection::vec(action(), 1..60),
        ) {
            let seats = SeatConfig::new(white_human, false);
            let mut orch = orchestrator(seats, AnimationSettings::default());

            for action in actions {
                let events: Vec<InputEvent> = match action {
                    Action::Click(r, c) => vec![click(r, c)],
                    Action::Undo => vec![Control::Undo.into()],
                    Action::Reset => vec![Control::Reset.into()],
                    Action::Reply => {
                        if let Some(job) = jobs(&mut orch).last_mut() {
                            job.reply(SearchReply::NoMove);
                        }
                        Vec::new()
                    }
                    Action::Wait => Vec::new(),
                };
                if orch.tick(events) == TickOutcome::Animate {
                    drain(&mut orch);
                }

                let live = jobs(&mut orch).iter().filter(|job| job.is_live()).count();
                prop_assert!(live <= 1);
                if orch.search().is_running() {
                    prop_assert!(jobs(&mut orch).last().is_some_and(|job| !job.is_killed()));
                }
                prop_assert!(orch.selection().pending_clicks().len() <= 2);
            }
        }
    }
}
