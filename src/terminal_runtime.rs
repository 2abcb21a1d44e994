use std::io;
use std::panic;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::warn;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

/// Concrete terminal type used by the game loop.
pub type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Raw mode plus alternate screen for the lifetime of one game session.
///
/// Dropping the session restores the terminal.
pub struct TerminalSession {
    terminal: AppTerminal,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(error);
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(error) => {
                restore_terminal();
                Err(error)
            }
        }
    }

    pub fn terminal_mut(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Chains a panic hook that leaves raw mode before the panic message prints.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        default_hook(panic_info);
    }));
}

fn restore_terminal() {
    if let Err(error) = disable_raw_mode() {
        warn!("failed to disable raw mode: {error}");
    }

    let mut stdout = io::stdout();
    if let Err(error) = execute!(stdout, Show, LeaveAlternateScreen) {
        warn!("failed to leave alternate screen: {error}");
    }
}
