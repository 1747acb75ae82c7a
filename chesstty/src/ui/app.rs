//! Terminal setup, the start menu and the main game loop.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use engine::{ProcessSpawner, SearchSpawner};
use futures::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout, Rect},
    widgets::{Block, Borders},
    Frame, Terminal,
};
use tokio::time::MissedTickBehavior;

use super::geometry::BoardGeometry;
use super::input::{map_menu_event, InputMapper};
use super::render::{RenderContext, Theme};
use super::widgets::{BoardWidget, ControlsPanel, EndGameOverlay, InfoPanel, MenuWidget};
use crate::core::animation::AnimationFrame;
use crate::core::input::{Control, InputEvent};
use crate::core::turn::SeatConfig;
use crate::core::{AnimationSettings, Orchestrator, TickOutcome};
use crate::menu::{Menu, MenuResult};
use crate::sound::Sound;

/// Everything the app needs from configuration and the command line
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub engine_path: PathBuf,
    pub search_depth: u8,
    pub animation: AnimationSettings,
    pub animation_fps: u32,
    pub max_fps: u32,
}

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

pub async fn run_app(options: AppOptions) -> anyhow::Result<()> {
    let ctx = RenderContext::load(Theme::default()).context("failed to load piece assets")?;

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to initialise terminal")?;

    let result = run(&mut terminal, &ctx, &options).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run(terminal: &mut Tui, ctx: &RenderContext, options: &AppOptions) -> anyhow::Result<()> {
    let mut events = EventStream::new();

    let (result, sound_enabled) = run_menu(terminal, ctx, &mut events).await?;
    let seats = match result {
        MenuResult::Quit => {
            tracing::info!("Quit from menu");
            return Ok(());
        }
        MenuResult::Start(seats) => seats,
    };

    let spawner = ProcessSpawner::new(&options.engine_path).with_depth(options.search_depth);
    tracing::info!(engine = %spawner.program().display(), depth = options.search_depth, "Search backend configured");
    run_game(terminal, ctx, &mut events, options, seats, spawner, sound_enabled).await
}

async fn run_menu(
    terminal: &mut Tui,
    ctx: &RenderContext,
    events: &mut EventStream,
) -> anyhow::Result<(MenuResult, bool)> {
    let mut menu = Menu::new(true);
    loop {
        terminal.draw(|f| {
            f.render_widget(
                MenuWidget {
                    ctx,
                    state: menu.state(),
                    sound_enabled: menu.sound_enabled(),
                },
                f.area(),
            );
        })?;

        let event = match events.next().await {
            Some(Ok(event)) => event,
            Some(Err(e)) => {
                tracing::warn!("Terminal event error: {}", e);
                continue;
            }
            None => return Ok((MenuResult::Quit, menu.sound_enabled())),
        };

        if let Some(menu_event) = map_menu_event(&event) {
            if let Some(result) = menu.dispatch(menu_event) {
                return Ok((result, menu.sound_enabled()));
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_game<S: SearchSpawner>(
    terminal: &mut Tui,
    ctx: &RenderContext,
    events: &mut EventStream,
    options: &AppOptions,
    seats: SeatConfig,
    spawner: S,
    sound_enabled: bool,
) -> anyhow::Result<()> {
    let mut orchestrator =
        Orchestrator::new(seats, spawner, options.animation).with_sound(Sound::new(sound_enabled));
    let mut mapper = InputMapper::default();
    let mut pending: Vec<InputEvent> = Vec::new();

    let mut geometry = draw_game(terminal, ctx, &orchestrator, &mapper, None)?;

    let mut main_tick = tokio::time::interval(frame_interval(options.max_fps));
    main_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(event)) => {
                        if let Some(input) = mapper.map(&event, &geometry) {
                            pending.push(input);
                        }
                    }
                    Some(Err(e)) => tracing::warn!("Terminal event error: {}", e),
                    None => pending.push(Control::Quit.into()),
                }
            }

            _ = main_tick.tick() => {
                let outcome = orchestrator.tick(pending.drain(..));
                if let Err(e) = orchestrator.sound_mut().ring(terminal.backend_mut()) {
                    tracing::warn!("Failed to ring bell: {}", e);
                }

                match outcome {
                    TickOutcome::Quit => return Ok(()),
                    TickOutcome::Animate => {
                        geometry = play_animation(terminal, ctx, &mut orchestrator, &mapper, options.animation_fps).await?;
                    }
                    TickOutcome::Idle => {}
                }
                geometry = draw_game(terminal, ctx, &orchestrator, &mapper, None)?;
            }
        }
    }
}

/// Drain every animation frame at the animation rate. Input waits.
async fn play_animation<S: SearchSpawner>(
    terminal: &mut Tui,
    ctx: &RenderContext,
    orchestrator: &mut Orchestrator<S>,
    mapper: &InputMapper,
    fps: u32,
) -> anyhow::Result<BoardGeometry> {
    let mut frame_tick = tokio::time::interval(frame_interval(fps));
    let mut geometry = None;
    while let Some(frame) = orchestrator.next_frame() {
        frame_tick.tick().await;
        geometry = Some(draw_game(terminal, ctx, orchestrator, mapper, Some(&frame))?);
    }
    match geometry {
        Some(geometry) => Ok(geometry),
        None => draw_game(terminal, ctx, orchestrator, mapper, None),
    }
}

fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(fps.max(1)))
}

struct GameLayout {
    board: Rect,
    info: Rect,
    controls: Rect,
}

impl GameLayout {
    fn new(area: Rect) -> Self {
        let [board, side] =
            Layout::horizontal([Constraint::Min(30), Constraint::Length(32)]).areas(area);
        let [info, controls] =
            Layout::vertical([Constraint::Min(10), Constraint::Length(12)]).areas(side);
        Self {
            board,
            info,
            controls,
        }
    }
}

fn draw_game<B: Backend, S: SearchSpawner>(
    terminal: &mut Terminal<B>,
    ctx: &RenderContext,
    orchestrator: &Orchestrator<S>,
    mapper: &InputMapper,
    frame: Option<&AnimationFrame>,
) -> anyhow::Result<BoardGeometry> {
    let mut geometry = BoardGeometry::fit(Rect::default());
    terminal.draw(|f| {
        geometry = render_game(f, ctx, orchestrator, mapper, frame);
    })?;
    Ok(geometry)
}

fn render_game<S: SearchSpawner>(
    f: &mut Frame,
    ctx: &RenderContext,
    orchestrator: &Orchestrator<S>,
    mapper: &InputMapper,
    frame: Option<&AnimationFrame>,
) -> BoardGeometry {
    let layout = GameLayout::new(f.area());
    let session = orchestrator.session();
    let game = session.game();
    let geometry = BoardGeometry::fit(Block::default().borders(Borders::ALL).inner(layout.board));

    match frame {
        Some(frame) => {
            f.render_widget(BoardWidget::animating(ctx, geometry, frame), layout.board);
        }
        None => {
            let grid = game.grid();
            let destinations = orchestrator.highlighted_destinations();
            let mut board = BoardWidget::new(ctx, geometry, &grid);
            board.selected = orchestrator.selection().selected();
            board.destinations = &destinations;
            board.last_move = game.last_move().map(|mv| (mv.from, mv.to));
            board.cursor = session.is_human_turn().then(|| mapper.cursor());
            f.render_widget(board, layout.board);

            if let Some(message) = session.terminal().message() {
                f.render_widget(
                    EndGameOverlay {
                        ctx,
                        message: &message,
                    },
                    geometry.board_rect(),
                );
            }
        }
    }

    f.render_widget(
        InfoPanel {
            ctx,
            game,
            seats: session.seats(),
            thinking: orchestrator.is_thinking(),
            terminal: session.terminal(),
            sound_enabled: orchestrator.sound().is_enabled(),
        },
        layout.info,
    );
    f.render_widget(ControlsPanel::new(ctx), layout.controls);

    geometry
}
