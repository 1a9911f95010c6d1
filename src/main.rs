mod app;
mod config;
mod persist;
mod sim;
mod ui;

use anyhow::Result;
use app::{App, FocusTarget, UpgradeEntry, upgrade_entries};
use chrono::Utc;
use config::GameConfig;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use persist::{export_save, load_game, save_game};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use sim::content::ACTIVITIES;
use sim::debate::MoveResult;
use sim::game::Game;
use sim::tick::TickOutcome;
use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const POLICY_BANNER: Duration = Duration::from_secs(4);

enum HostEvent {
    Input(Event),
    EnemyTurn(u64),
}

/// What a keypress asks of the host beyond mutating the game.
enum HostCommand {
    None,
    ScheduleEnemyTurn(u64),
    CancelEnemyTurn,
    SaveNow,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = GameConfig::load()?;
    init_logging(&config)?;
    info!(save = %config.save_path.display(), "road to utopia starting");

    let loaded = load_game(&config.save_path)?;
    let mut game = match loaded {
        Some(state) => {
            let mut game = Game::from_state(state, config.clone());
            game.notify("Loaded save state.");
            if let Some(report) = game.reconcile_offline(now_ms()) {
                info!(
                    earnings = report.earnings,
                    seconds = report.seconds,
                    "offline earnings credited"
                );
                persist(&mut game)?;
            }
            game
        }
        None => {
            let mut game = Game::fresh(config.clone());
            game.notify("Welcome to the campaign. Press C to canvass.");
            game
        }
    };

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut game).await;
    restore_terminal(&mut terminal)?;

    persist(&mut game)?;
    info!("saved and exiting");
    result
}

fn init_logging(config: &GameConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn persist(game: &mut Game) -> Result<()> {
    let path = game.config().save_path.clone();
    let snapshot = game.snapshot_for_save(now_ms());
    save_game(&path, &snapshot)
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, game: &mut Game) -> Result<()> {
    let mut app = App::new();
    let upgrades = upgrade_entries();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let input_tx = event_tx.clone();
    task::spawn(async move {
        loop {
            match task::spawn_blocking(crossterm::event::read).await {
                Ok(Ok(event)) => {
                    if input_tx.send(HostEvent::Input(event)).is_err() {
                        break;
                    }
                }
                Ok(Err(_)) => break,
                Err(_) => break,
            }
        }
    });

    let tick_rate = Duration::from_millis(100);
    let autosave_every = Duration::from_secs(game.config().autosave_secs.max(1));
    let enemy_delay = Duration::from_millis(game.config().enemy_turn_delay_ms);
    let mut last_tick = Instant::now();
    let mut last_save = Instant::now();
    let mut pending_enemy: Option<JoinHandle<()>> = None;
    let mut banner_since: Option<Instant> = None;

    loop {
        terminal.draw(|f| ui::render(f, &app, game, &upgrades))?;
        if app.should_quit {
            break;
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        tokio::select! {
            Some(event) = event_rx.recv() => match event {
                HostEvent::Input(event) => {
                    match handle_event(event, &mut app, game, &upgrades) {
                        HostCommand::ScheduleEnemyTurn(encounter) => {
                            if let Some(handle) = pending_enemy.take() {
                                handle.abort();
                            }
                            let tx = event_tx.clone();
                            pending_enemy = Some(task::spawn(async move {
                                tokio::time::sleep(enemy_delay).await;
                                let _ = tx.send(HostEvent::EnemyTurn(encounter));
                            }));
                        }
                        HostCommand::CancelEnemyTurn => {
                            if let Some(handle) = pending_enemy.take() {
                                handle.abort();
                            }
                        }
                        HostCommand::SaveNow => {
                            if let Err(err) = persist(game) {
                                warn!(error = %err, "save failed");
                            }
                            last_save = Instant::now();
                        }
                        HostCommand::None => {}
                    }
                }
                HostEvent::EnemyTurn(encounter) => {
                    pending_enemy = None;
                    game.resolve_enemy_turn(encounter);
                }
            },
            _ = tokio::time::sleep(timeout) => {
                let delta = last_tick.elapsed();
                last_tick = Instant::now();
                if game.tick(delta) == TickOutcome::Halted {
                    app.selected_activity = 0;
                    app.selected_upgrade = 0;
                }
                if game.last_policy().is_some() {
                    let shown = *banner_since.get_or_insert_with(Instant::now);
                    if shown.elapsed() >= POLICY_BANNER {
                        game.clear_last_policy();
                        banner_since = None;
                    }
                }
                if last_save.elapsed() >= autosave_every {
                    if let Err(err) = persist(game) {
                        warn!(error = %err, "autosave failed");
                    }
                    last_save = Instant::now();
                }
            }
        }
    }

    Ok(())
}

fn handle_event(
    event: Event,
    app: &mut App,
    game: &mut Game,
    upgrades: &[UpgradeEntry],
) -> HostCommand {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            handle_key_event(key, app, game, upgrades)
        }
        _ => HostCommand::None,
    }
}

fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    game: &mut Game,
    upgrades: &[UpgradeEntry],
) -> HostCommand {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return HostCommand::None;
    }
    if key.code != KeyCode::Char('R') {
        app.confirm_reset = false;
    }

    if game.debate().is_some() {
        return handle_debate_key(key, game);
    }
    if game.state.active_dilemma.is_some() {
        if let KeyCode::Char(ch @ '1'..='9') = key.code {
            let choice = ch as usize - '1' as usize;
            if let Err(err) = game.resolve_dilemma(choice) {
                game.notify(format!("Choice failed: {err}"));
            }
        }
        return HostCommand::None;
    }
    if game.state.active_event.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            game.dismiss_event();
        }
        return HostCommand::None;
    }
    if game.mini_game().is_some() {
        match key.code {
            KeyCode::Char(' ') => {
                game.mini_game_hit();
            }
            KeyCode::Esc => {
                game.cancel_mini_game();
            }
            _ => {}
        }
        return HostCommand::None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            app.should_quit = true;
            HostCommand::None
        }
        KeyCode::Char('c') | KeyCode::Char('C') => {
            game.canvass();
            HostCommand::None
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.next_focus();
            HostCommand::None
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
            app.move_selection(-1, ACTIVITIES.len(), upgrades.len());
            HostCommand::None
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            app.move_selection(1, ACTIVITIES.len(), upgrades.len());
            HostCommand::None
        }
        KeyCode::Enter | KeyCode::Char('b') | KeyCode::Char('B') => {
            match app.focus() {
                FocusTarget::Activities => {
                    if let Some(def) = ACTIVITIES.get(app.selected_activity) {
                        if let Err(err) = game.buy_activity(def.id) {
                            game.notify(format!("Purchase failed: {err}"));
                        }
                    }
                }
                FocusTarget::Upgrades => {
                    if let Some(entry) = upgrades.get(app.selected_upgrade) {
                        if let Err(err) = entry.purchase(game) {
                            game.notify(format!("Purchase failed: {err}"));
                        }
                    }
                }
            }
            HostCommand::None
        }
        KeyCode::Char('h') | KeyCode::Char('H') => {
            if let Some(def) = ACTIVITIES.get(app.selected_activity) {
                if let Err(err) = game.hire_manager(def.id) {
                    game.notify(format!("Hiring failed: {err}"));
                }
            }
            HostCommand::None
        }
        KeyCode::Char('m') | KeyCode::Char('M') => {
            game.cycle_buy_mode();
            HostCommand::None
        }
        KeyCode::Char('d') | KeyCode::Char('D') => {
            if let Err(err) = game.start_debate() {
                game.notify(format!("Cannot debate: {err}"));
            }
            HostCommand::None
        }
        KeyCode::Char('g') | KeyCode::Char('G') => {
            if let Err(err) = game.start_mini_game() {
                game.notify(format!("Cannot start rapid response: {err}"));
            }
            HostCommand::None
        }
        KeyCode::Char('p') | KeyCode::Char('P') => match game.prestige() {
            Ok(_) => HostCommand::SaveNow,
            Err(err) => {
                game.notify(format!("Run Again unavailable: {err}"));
                HostCommand::None
            }
        },
        KeyCode::Char('R') => {
            if app.confirm_reset {
                app.confirm_reset = false;
                game.hard_reset();
                game.notify("Everything has been reset.");
                HostCommand::SaveNow
            } else {
                app.confirm_reset = true;
                game.notify("Press R again to erase ALL progress.");
                HostCommand::None
            }
        }
        KeyCode::Char('x') | KeyCode::Char('X') => {
            game.dismiss_oldest_notification();
            HostCommand::None
        }
        KeyCode::Char('e') | KeyCode::Char('E') => {
            let path = game.config().export_path.clone();
            let snapshot = game.snapshot_for_save(now_ms());
            match export_save(&snapshot).map_err(anyhow::Error::from).and_then(|text| {
                fs::write(&path, text)?;
                Ok(())
            }) {
                Ok(()) => game.notify(format!("Exported save to {}.", path.display())),
                Err(err) => {
                    warn!(error = %err, "export failed");
                    game.notify(format!("Export failed: {err}"));
                }
            }
            HostCommand::None
        }
        KeyCode::Char('i') | KeyCode::Char('I') => {
            let path = game.config().export_path.clone();
            match fs::read_to_string(&path) {
                Ok(text) => match game.import(&text) {
                    Ok(()) => return HostCommand::SaveNow,
                    Err(err) => {
                        warn!(error = %err, "import rejected");
                        game.notify(format!("Import failed: {err}"));
                    }
                },
                Err(err) => game.notify(format!("Cannot read {}: {err}", path.display())),
            }
            HostCommand::None
        }
        _ => HostCommand::None,
    }
}

fn handle_debate_key(key: KeyEvent, game: &mut Game) -> HostCommand {
    match key.code {
        KeyCode::Esc => {
            game.leave_debate();
            HostCommand::CancelEnemyTurn
        }
        KeyCode::Char(ch @ '1'..='9') => {
            let index = ch as usize - '1' as usize;
            let Some(session) = game.debate() else {
                return HostCommand::None;
            };
            let encounter = session.encounter_id;
            let Some(move_id) = session.moves.get(index).map(|mv| mv.id.clone()) else {
                return HostCommand::None;
            };
            match game.use_move(&move_id) {
                Ok(MoveResult::EnemyTurnPending) => HostCommand::ScheduleEnemyTurn(encounter),
                Ok(MoveResult::Won) => HostCommand::SaveNow,
                Err(_) => HostCommand::None,
            }
        }
        _ => HostCommand::None,
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
