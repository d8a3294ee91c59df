use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::Frame;

use crate::error::Result;
use crate::fmt::{Amount, Sign};
use crate::grid::CellState;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const AMOUNT_POS_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const AMOUNT_NEG_STYLE: Style = Style::new().fg(Color::Red);

pub const CELL_EMPTY_STYLE: Style = Style::new().fg(Color::Rgb(60, 60, 60));
pub const CELL_POS_STYLE: Style = Style::new().fg(Color::Rgb(34, 197, 94));
pub const CELL_NEG_STYLE: Style = Style::new().fg(Color::Rgb(239, 68, 68));

pub const CURSOR_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::REVERSED);

/// Fixed two-decimal amount, colored by sign.
pub fn amount_span(amount: &Amount) -> Span<'static> {
    let style = match amount.sign {
        Sign::Positive => AMOUNT_POS_STYLE,
        Sign::Negative => AMOUNT_NEG_STYLE,
    };
    Span::styled(amount.text.clone(), style)
}

pub fn cell_style(state: CellState) -> Style {
    match state {
        CellState::Empty => CELL_EMPTY_STYLE,
        CellState::Positive => CELL_POS_STYLE,
        CellState::Negative => CELL_NEG_STYLE,
    }
}

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}

pub enum ViewAction {
    Continue,
    Close,
}

pub trait View {
    fn draw(&mut self, frame: &mut Frame);
    fn handle_key(&mut self, code: KeyCode) -> ViewAction;
}

/// Run an interactive ratatui view. Sets up the terminal, event loop,
/// and panic hook, then restores the terminal on exit.
pub fn run_view(view: &mut dyn View) -> Result<()> {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| view.draw(frame)) {
            break Err(e.into());
        }

        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break Ok(());
                }
                match view.handle_key(key.code) {
                    ViewAction::Close => break Ok(()),
                    ViewAction::Continue => {}
                }
            }
            _ => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_span_colors_by_sign() {
        let neg = amount_span(&Amount::new(-12.5));
        assert_eq!(neg.content, "-12.50");
        assert_eq!(neg.style, AMOUNT_NEG_STYLE);

        let pos = amount_span(&Amount::new(0.0));
        assert_eq!(pos.style, AMOUNT_POS_STYLE);
    }

    #[test]
    fn test_wrap_text() {
        let (wrapped, lines) = wrap_text("one two three four", 9);
        assert!(lines >= 2);
        assert!(wrapped.contains('\n'));
        assert_eq!(wrap_text("x", 0), ("x".to_string(), 1));
    }
}
