use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Widget};

use crate::diagram::{Point, Scene};
use crate::ui::theme::Theme;

/// Draws a [`Scene`] whose coordinates are in cells of the area inside the
/// border. The scene is rebuilt by the caller; this only paints it.
pub struct NetworkDiagram<'a> {
    pub scene: &'a Scene,
    pub theme: &'a Theme,
}

impl<'a> NetworkDiagram<'a> {
    pub fn new(scene: &'a Scene, theme: &'a Theme) -> Self {
        Self { scene, theme }
    }
}

/// Canvas y grows upward, scene y grows downward.
fn to_canvas(p: Point, height: f64) -> (f64, f64) {
    (p.x, height - p.y)
}

/// Left edge for `text` centred on `x`.
fn centered_x(x: f64, text: &str) -> f64 {
    x - text.chars().count() as f64 / 2.0
}

impl Widget for NetworkDiagram<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let scene = self.scene;

        let block = Block::bordered()
            .title(" Network ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let inner = block.inner(area);
        if inner.width < 20 || inner.height < 5 {
            block.render(area, buf);
            return;
        }

        let height = scene.height;
        let canvas = Canvas::default()
            .block(block)
            .background_color(colors.bg())
            .marker(Marker::Braille)
            .x_bounds([0.0, scene.width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                // Inactive edges first so active ones are drawn over crossings.
                let mut edges: Vec<_> = scene.edges.iter().collect();
                edges.sort_by_key(|e| e.active);
                for edge in &edges {
                    let (x1, y1) = to_canvas(edge.from, height);
                    let (x2, y2) = to_canvas(edge.to, height);
                    let color = if edge.active {
                        colors.edge_active()
                    } else {
                        colors.edge_inactive()
                    };
                    ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
                }
                ctx.layer();

                for edge in &edges {
                    let (x, y) = to_canvas(edge.label_at, height);
                    let style = if edge.active {
                        Style::default()
                            .fg(colors.edge_active())
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(colors.text_muted())
                    };
                    ctx.print(
                        centered_x(x, &edge.label),
                        y,
                        Line::styled(edge.label.clone(), style),
                    );
                }

                for node in &scene.nodes {
                    let (x, y) = to_canvas(node.at, height);
                    let text = format!("({} {})", node.label, node.value);
                    let style = if node.active {
                        Style::default()
                            .fg(colors.bg())
                            .bg(colors.node_active())
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                            .fg(colors.fg())
                            .bg(colors.node_inactive())
                    };
                    ctx.print(centered_x(x, &text), y, Line::styled(text, style));
                }
            });
        canvas.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::DiagramLayout;
    use crate::network::{NetworkState, NodeId, Topology};
    use crate::walkthrough::{Highlight, Session};

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
    fn test_renders_node_labels_and_values() {
        let area = Rect::new(0, 0, 80, 20);
        let inner = Block::bordered().inner(area);
        let layout = DiagramLayout::compute(
            &Topology::two_two_two(),
            inner.width as f64,
            inner.height as f64,
        );
        let state = NetworkState::new(
            [0.05, 0.10],
            [0.15, 0.20, 0.25, 0.30, 0.40, 0.45, 0.50, 0.55],
            [0.01, 0.99],
            0.5,
        );
        let scene = Scene::build(&state, &Highlight::nodes_only([NodeId::I1]), &layout);
        let theme = Theme::default();
        let mut buf = Buffer::empty(area);
        NetworkDiagram::new(&scene, &theme).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Network"));
        assert!(text.contains("(i1 0.05)"));
        assert!(text.contains("(o2 ?)"));
    }

    #[test]
    fn test_every_edge_label_is_visible() {
        let mut session = Session::standard(NetworkState::new(
            [0.05, 0.10],
            [0.15, 0.20, 0.25, 0.30, 0.40, 0.45, 0.50, 0.55],
            [0.01, 0.99],
            0.5,
        ))
        .unwrap();
        session.advance_to(4).unwrap();
        let theme = Theme::default();

        for (width, height) in [(80, 24), (120, 40), (160, 50)] {
            let area = Rect::new(0, 0, width, height);
            let inner = Block::bordered().inner(area);
            let layout = DiagramLayout::compute(
                session.topology(),
                inner.width as f64,
                inner.height as f64,
            );
            let scene = Scene::build(session.state(), session.highlight(), &layout);
            let mut buf = Buffer::empty(area);
            NetworkDiagram::new(&scene, &theme).render(area, &mut buf);

            let text = buffer_text(&buf);
            for edge in &scene.edges {
                assert!(
                    text.contains(&edge.label),
                    "{} missing at {width}x{height}",
                    edge.label
                );
            }
            for node in &scene.nodes {
                let label = format!("({} {})", node.label, node.value);
                assert!(text.contains(&label), "{label} missing at {width}x{height}");
            }
        }
    }

    #[test]
    fn test_tiny_area_draws_only_border() {
        let area = Rect::new(0, 0, 10, 4);
        let layout = DiagramLayout::compute(&Topology::two_two_two(), 8.0, 2.0);
        let state = NetworkState::new([0.0; 2], [0.0; 8], [0.0; 2], 0.5);
        let scene = Scene::build(&state, &Highlight::default(), &layout);
        let theme = Theme::default();
        let mut buf = Buffer::empty(area);
        NetworkDiagram::new(&scene, &theme).render(area, &mut buf);
        assert!(!buffer_text(&buf).contains('('));
    }
}
