use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::Block;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: explanation and diagram side by side
    Narrow, // <100 cols: diagram stacked above the explanation
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn side_by_side(&self) -> bool {
        *self == LayoutTier::Wide
    }
}

/// Rows the stacked stepper needs for the longest live calculation (eight
/// weight updates) below a one-line formula.
pub const NARROW_STEPPER_MIN_ROWS: u16 = 16;

pub struct AppLayout {
    pub header: Rect,
    pub stepper: Rect,
    pub diagram: Rect,
    pub progress: Rect,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(10),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        let (stepper, diagram) = if tier.side_by_side() {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(vertical[1]);
            (horizontal[0], horizontal[1])
        } else {
            let middle = vertical[1];
            let stepper_rows = (middle.height * 3 / 5)
                .max(NARROW_STEPPER_MIN_ROWS)
                .min(middle.height);
            let stacked = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(middle.height - stepper_rows),
                    Constraint::Length(stepper_rows),
                ])
                .split(middle);
            (stacked[1], stacked[0])
        };

        Self {
            header: vertical[0],
            stepper,
            diagram,
            progress: vertical[2],
            footer: vertical[3],
            tier,
        }
    }

    /// Cells available for drawing inside the diagram's border.
    pub fn diagram_canvas(&self) -> Rect {
        Block::bordered().inner(self.diagram)
    }
}

pub fn wrapped_line_count(text: &str, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    text.lines()
        .map(|line| line.chars().count().max(1).div_ceil(width))
        .sum::<usize>()
        .max(1)
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 14;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}
