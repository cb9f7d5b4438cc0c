use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::math::FormulaView;
use crate::ui::layout::wrapped_line_count;
use crate::ui::theme::Theme;
use crate::walkthrough::{Navigator, Step, StepOutput};

/// Explanation pane: step text, typeset formula, live result and the
/// prev/next bar.
pub struct StepperPane<'a> {
    step: &'a Step,
    nav: &'a Navigator,
    formula: Option<&'a FormulaView>,
    output: &'a StepOutput,
    theme: &'a Theme,
}

impl<'a> StepperPane<'a> {
    pub fn new(
        step: &'a Step,
        nav: &'a Navigator,
        formula: Option<&'a FormulaView>,
        output: &'a StepOutput,
        theme: &'a Theme,
    ) -> Self {
        Self {
            step,
            nav,
            formula,
            output,
            theme,
        }
    }
}

impl Widget for StepperPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(
                " Step {}: {} ",
                self.nav.current() + 1,
                self.step.title
            ))
            .title_style(
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 4 || inner.height < 4 {
            return;
        }

        // The nav bar and the live result win over the formula, and the
        // explanation takes whatever rows are left.
        let text_width = inner.width.saturating_sub(2) as usize;
        let mut rows = inner.height - 1;
        let result_height =
            (wrapped_line_count(&self.output.result, text_width) as u16 + 2).min(rows);
        rows -= result_height;
        let formula_height = self
            .formula
            .map(|f| wrapped_line_count(f.text(), text_width) as u16 + 2)
            .unwrap_or(0)
            .min(rows);
        rows -= formula_height;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(rows),
                Constraint::Length(formula_height),
                Constraint::Length(result_height),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(self.step.explanation.as_str())
            .style(Style::default().fg(colors.fg()))
            .wrap(Wrap { trim: true })
            .render(layout[0], buf);

        if let Some(formula) = self.formula {
            let style = if formula.is_error() {
                Style::default().fg(colors.error())
            } else {
                Style::default().fg(colors.formula())
            };
            Paragraph::new(formula.text())
                .style(style)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: false })
                .block(
                    Block::bordered()
                        .title(" Formula ")
                        .border_style(Style::default().fg(colors.border())),
                )
                .render(layout[1], buf);
        }

        let result_lines: Vec<Line> = self
            .output
            .result
            .lines()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.result()))))
            .collect();
        Paragraph::new(result_lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::bordered()
                    .title(" Live Calculation ")
                    .border_style(Style::default().fg(colors.border())),
            )
            .render(layout[2], buf);

        render_nav_bar(self.nav, self.theme, layout[3], buf);
    }
}

fn render_nav_bar(nav: &Navigator, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let colors = &theme.colors;
    let button = |label: &'static str, enabled: bool| {
        let style = if enabled {
            Style::default()
                .fg(colors.bg())
                .bg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(colors.text_muted())
                .add_modifier(Modifier::DIM)
        };
        Span::styled(label, style)
    };

    let sections = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(10),
            Constraint::Min(0),
            Constraint::Length(10),
        ])
        .split(area);

    Paragraph::new(Line::from(button(" ◀ Prev ", nav.can_prev()))).render(sections[0], buf);
    Paragraph::new(Line::from(Span::styled(
        format!("Step {} / {}", nav.current() + 1, nav.total()),
        Style::default().fg(colors.text_muted()),
    )))
    .alignment(Alignment::Center)
    .render(sections[1], buf);
    Paragraph::new(Line::from(button(" Next ▶ ", nav.can_next())))
        .alignment(Alignment::Right)
        .render(sections[2], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{UnicodeRenderer, typeset};
    use crate::config::NetworkConfig;
    use crate::network::{NetworkState, Topology};
    use crate::ui::layout::AppLayout;
    use crate::walkthrough::{Session, StepSequence};

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_renders_title_result_and_counter() {
        let seq = StepSequence::standard(&Topology::two_two_two());
        let step = seq.step(1);
        let nav = Navigator::new(seq.len());
        let formula = step
            .formula
            .as_deref()
            .map(|f| typeset(&UnicodeRenderer, f));
        let output = StepOutput {
            result: "net_h1 = 0.0275".to_string(),
        };
        let theme = Theme::default();
        let area = Rect::new(0, 0, 70, 24);
        let mut buf = Buffer::empty(area);
        StepperPane::new(step, &nav, formula.as_ref(), &output, &theme).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Step 1: Weighted input of h1"));
        assert!(text.contains("Live Calculation"));
        assert!(text.contains("net_h1 = 0.0275"));
        assert!(text.contains("Step 1 / 19"));
        assert!(text.contains("netₕ₁ = w₁ · i₁ + w₂ · i₂"));
    }

    #[test]
    fn test_formula_error_shown_inline() {
        let seq = StepSequence::standard(&Topology::two_two_two());
        let nav = Navigator::new(seq.len());
        let formula = typeset(&UnicodeRenderer, "$$\\nope$$");
        let output = StepOutput {
            result: String::new(),
        };
        let theme = Theme::default();
        let area = Rect::new(0, 0, 70, 24);
        let mut buf = Buffer::empty(area);
        StepperPane::new(seq.step(0), &nav, Some(&formula), &output, &theme)
            .render(area, &mut buf);
        assert!(buffer_text(&buf).contains("Error rendering math"));
    }

    #[test]
    fn test_every_result_line_fits_narrow_terminal() {
        let mut session =
            Session::standard(NetworkState::from_config(&NetworkConfig::default())).unwrap();
        let theme = Theme::default();
        let screen = Rect::new(0, 0, 80, 24);
        let area = AppLayout::new(screen).stepper;

        loop {
            let step = session.current_step();
            let formula = step
                .formula
                .as_deref()
                .map(|f| typeset(&UnicodeRenderer, f));
            let mut buf = Buffer::empty(screen);
            StepperPane::new(
                step,
                session.navigator(),
                formula.as_ref(),
                session.output(),
                &theme,
            )
            .render(area, &mut buf);

            let text = buffer_text(&buf);
            for line in session.output().result.lines() {
                assert!(text.contains(line.trim()), "{}: {line}", step.title);
            }
            assert!(text.contains("Live Calculation"), "{}", step.title);
            if !session.advance().unwrap() {
                break;
            }
        }
    }
}
