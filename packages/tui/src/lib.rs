//! Terminal board view for the Atelier client dashboard.

pub mod app;
pub mod events;
pub mod input;
pub mod state;
pub mod ui;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use atelier_config::Settings;

pub use app::App;

/// Open the board view for one project and run it until quit.
pub async fn run(settings: Settings, project_id: &str) -> Result<()> {
    let mut app = App::new(settings, project_id)?;

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
