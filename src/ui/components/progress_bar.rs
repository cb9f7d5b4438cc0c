use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;
use crate::walkthrough::{Navigator, Phase};

pub struct ProgressBar<'a> {
    pub label: String,
    pub ratio: f64,
    pub caption: String,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &str, ratio: f64, caption: String, theme: &'a Theme) -> Self {
        Self {
            label: label.to_string(),
            ratio: ratio.clamp(0.0, 1.0),
            caption,
            theme,
        }
    }

    /// Walkthrough progress, titled with the phase of the current step.
    pub fn for_steps(nav: &Navigator, phase: Phase, theme: &'a Theme) -> Self {
        Self::new(
            phase.label(),
            nav.progress(),
            format!("{} / {}", nav.current() + 1, nav.total()),
            theme,
        )
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64) as u16;

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_x = inner.x + (inner.width.saturating_sub(self.caption.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &self.caption, Style::default().fg(colors.fg()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_proportionally() {
        let theme = Theme::default();
        let mut nav = Navigator::new(4);
        nav.next();
        let area = Rect::new(0, 0, 22, 3);
        let mut buf = Buffer::empty(area);
        ProgressBar::for_steps(&nav, Phase::Forward, &theme).render(area, &mut buf);

        let filled = theme.colors.bar_filled();
        assert_eq!(buf[(1, 1)].bg, filled);
        assert_eq!(buf[(10, 1)].bg, filled);
        assert_ne!(buf[(11, 1)].bg, filled);
    }

    #[test]
    fn test_ratio_is_clamped() {
        let theme = Theme::default();
        let bar = ProgressBar::new("x", 3.0, String::new(), &theme);
        assert_eq!(bar.ratio, 1.0);
    }
}
