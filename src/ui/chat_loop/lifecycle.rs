use std::{error::Error, io, io::Write};

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::{
    cursor::SetCursorStyle,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::Terminal;

pub type ChatTerminal<W = io::Stdout> = Terminal<CrosstermBackend<W>>;

pub fn setup_terminal() -> Result<ChatTerminal, Box<dyn Error>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    if let Err(err) = enter_screen(&mut stdout) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).inspect_err(|_| {
        let _ = disable_raw_mode();
    })?;

    install_panic_hook();
    Ok(terminal)
}

fn enter_screen<W: Write>(writer: &mut W) -> io::Result<()> {
    execute!(
        writer,
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableMouseCapture,
        SetCursorStyle::SteadyBar
    )
}

fn leave_screen<W: Write>(writer: &mut W) -> io::Result<()> {
    execute!(
        writer,
        SetCursorStyle::DefaultUserShape,
        DisableMouseCapture,
        DisableBracketedPaste,
        LeaveAlternateScreen
    )
}

pub fn restore_terminal<W: Write>(terminal: &mut ChatTerminal<W>) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    leave_screen(terminal.backend_mut())?;
    terminal.show_cursor()?;
    Ok(())
}

/// Leave the alternate screen before the default panic message is printed,
/// otherwise the message is lost with the screen.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = leave_screen(&mut io::stdout());
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_leave_write_matching_sequences() {
        let mut enter: Vec<u8> = Vec::new();
        enter_screen(&mut enter).expect("write");
        let enter = String::from_utf8_lossy(&enter);
        assert!(enter.contains("\x1b[?1049h"));
        assert!(enter.contains("\x1b[?2004h"));

        let mut leave: Vec<u8> = Vec::new();
        leave_screen(&mut leave).expect("write");
        let leave = String::from_utf8_lossy(&leave);
        assert!(leave.contains("\x1b[?1049l"));
        assert!(leave.contains("\x1b[?2004l"));
    }
}
