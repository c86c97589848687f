use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::info;

use pagecurl_core::AppConfig;
use pagecurl_tui::{
    app::App,
    event::{AppEvent, EventHandler, ImageLoadResult},
    images::spawn_image_load,
    input::handle_key_event,
    keymap::Keymap,
    load_theme,
    widgets::{PageWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);

    // Load theme and build the deck before touching the terminal
    let theme = load_theme(&config.ui.theme);
    let mut app = App::new(config.clone(), theme)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("pagecurl"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, &keymap).await;

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

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    keymap: &Keymap,
) -> Result<()> {
    let event_handler = EventHandler::with_animation_rate(
        app.config.ui.tick_rate_ms,
        app.config.animation.frame_duration(),
    );

    // Create channel for async image loading results
    let (img_tx, mut img_rx) = mpsc::unbounded_channel::<ImageLoadResult>();

    info!(pages = app.deck.len(), start = app.deck.current_index(), "carousel started");
    let mut last_frame = Instant::now();

    loop {
        // Process any completed image loads (non-blocking)
        while let Ok(result) = img_rx.try_recv() {
            app.handle_image_result(result);
        }

        // Request artwork for pages not loaded yet
        for path in app.images_to_load() {
            spawn_image_load(path, img_tx.clone());
        }

        // Advance curls by the real elapsed time
        let now = Instant::now();
        app.tick(now - last_frame);
        last_frame = now;

        terminal.draw(|frame| {
            let area = frame.area();
            let (page_area, status_area) = if app.show_status_bar {
                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(1), Constraint::Length(1)])
                    .split(area);
                (layout[0], Some(layout[1]))
            } else {
                (area, None)
            };

            app.set_page_area(page_area);
            PageWidget::render(frame, page_area, app);
            if let Some(status_area) = status_area {
                StatusBarWidget::render(frame, status_area, app);
            }
        })?;

        // Poll at frame rate while a curl is moving
        let event = if app.is_animating() || app.pointer.is_pressed() {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };

        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, keymap);
                    app.apply_action(action);
                }
                AppEvent::Mouse(mouse) => app.handle_mouse(mouse),
                // Layout is recomputed on the next draw
                AppEvent::Resize(_, _) => {}
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!(page = app.deck.current_index(), "carousel closed");
    Ok(())
}
