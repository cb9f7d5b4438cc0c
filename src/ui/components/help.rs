use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct KeyBinding {
    pub keys: &'static str,
    pub action: &'static str,
}

pub const KEY_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        keys: "→ l n Space Enter",
        action: "Next step",
    },
    KeyBinding {
        keys: "← h p Backspace",
        action: "Previous step",
    },
    KeyBinding {
        keys: "End",
        action: "Jump to the last step",
    },
    KeyBinding {
        keys: "Home r",
        action: "Restart from the first step",
    },
    KeyBinding {
        keys: "?",
        action: "Toggle this help",
    },
    KeyBinding {
        keys: "q Esc",
        action: "Quit",
    },
];

pub struct HelpOverlay<'a> {
    pub theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Clear.render(area, buf);
        let block = Block::bordered()
            .title(" Help ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "nnwalk",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "A forward and backward pass, one step at a time",
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let key_width = KEY_BINDINGS
            .iter()
            .map(|b| b.keys.chars().count())
            .max()
            .unwrap_or(0);
        let lines: Vec<Line> = KEY_BINDINGS
            .iter()
            .map(|b| {
                let pad = key_width - b.keys.chars().count();
                Line::from(vec![
                    Span::styled(
                        format!("  {}{}  ", b.keys, " ".repeat(pad)),
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(b.action, Style::default().fg(colors.text_muted())),
                ])
            })
            .collect();
        Paragraph::new(lines).render(layout[1], buf);
    }
}
