use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use habitgrid::app::{App, handle_key, handle_mouse};
use habitgrid::config::{Config, USAGE};
use habitgrid::logging::init_logging;
use habitgrid::{FileStore, KvStore, MemoryStore, MonthKey, Session, export, ui};

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::from_env()?;
    if config.show_help {
        println!("{USAGE}");
        return Ok(());
    }

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let month = config.start_month.unwrap_or_else(MonthKey::current);
    let (store, notice) = open_store(&config.data_dir);

    if config.headless {
        if let Some(notice) = &notice {
            eprintln!("warning: {notice}");
        }
        return export_once(store, month, &config.export_dir);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, event::EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, month, config.export_dir.clone());
    if notice.is_some() && app.status.is_none() {
        app.status = notice;
    }
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        event::DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    res
}

/// Opens the file store, falling back to memory when the data directory is
/// unusable. The second value is a notice for the user in that case.
fn open_store(data_dir: &Path) -> (Box<dyn KvStore>, Option<String>) {
    match FileStore::open(data_dir) {
        Ok(store) => (Box::new(store), None),
        Err(err) => {
            warn!("event=store_open module=main status=fallback error={err:#}");
            (
                Box::new(MemoryStore::new()),
                Some(format!("Storage unavailable, changes will not be kept: {err:#}")),
            )
        }
    }
}

fn export_once(store: Box<dyn KvStore>, month: MonthKey, dir: &Path) -> Result<()> {
    let mut session = Session::new(store, month);
    if let Err(err) = session.render() {
        warn!("event=month_render module=main status=persist_failed error={err:#}");
        eprintln!("warning: could not save {month}: {err:#}");
    }
    for path in export::write_charts(&session, dir)? {
        println!("{}", path.display());
    }
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();
    info!("event=ui_start module=main status=ok month={}", app.session.month());

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key(app, key)? {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }

    info!("event=ui_stop module=main status=ok");
    Ok(())
}
