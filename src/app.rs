use std::fmt::Write as _;

use anyhow::Result;
use ratatui::layout::Rect;
use tracing::debug;

use crate::config::Config;
use crate::diagram::{DiagramLayout, LayoutCache, Scene};
use crate::math::{FormulaRenderer, FormulaView, UnicodeRenderer, typeset};
use crate::network::NetworkState;
use crate::ui::layout::AppLayout;
use crate::ui::theme::Theme;
use crate::walkthrough::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Walkthrough,
    Help,
}

pub struct App {
    pub screen: AppScreen,
    pub session: Session,
    pub theme: &'static Theme,
    pub config: Config,
    pub should_quit: bool,
    formula: Option<FormulaView>,
    layout_cache: LayoutCache,
    renderer: Box<dyn FormulaRenderer>,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme) -> Result<Self> {
        let session = Session::standard(NetworkState::from_config(&config.network))?;
        let layout_cache = LayoutCache::new(config.label_offset);
        let mut app = Self {
            screen: AppScreen::Walkthrough,
            session,
            theme,
            config,
            should_quit: false,
            formula: None,
            layout_cache,
            renderer: Box::new(UnicodeRenderer),
        };
        app.refresh_formula();
        Ok(app)
    }

    /// Re-typesets the current step's formula. Called after every transition
    /// so rendering never parses LaTeX.
    fn refresh_formula(&mut self) {
        self.formula = self
            .session
            .current_step()
            .formula
            .as_deref()
            .map(|source| typeset(self.renderer.as_ref(), source));
    }

    pub fn formula(&self) -> Option<&FormulaView> {
        self.formula.as_ref()
    }

    pub fn advance(&mut self) -> Result<()> {
        if self.session.advance()? {
            self.refresh_formula();
        }
        Ok(())
    }

    pub fn retreat(&mut self) -> Result<()> {
        if self.session.retreat()? {
            self.refresh_formula();
        }
        Ok(())
    }

    pub fn restart(&mut self) -> Result<()> {
        self.session.restart()?;
        self.refresh_formula();
        Ok(())
    }

    /// Moves to a zero-based step index, clamped to the last step.
    pub fn jump_to(&mut self, index: usize) -> Result<()> {
        self.session.advance_to(index)?;
        self.refresh_formula();
        Ok(())
    }

    pub fn jump_to_end(&mut self) -> Result<()> {
        self.jump_to(self.session.total_steps() - 1)
    }

    pub fn toggle_help(&mut self) {
        self.screen = match self.screen {
            AppScreen::Walkthrough => AppScreen::Help,
            AppScreen::Help => AppScreen::Walkthrough,
        };
    }

    /// Recomputes the diagram layout when the terminal size changes.
    pub fn on_resize(&mut self, width: u16, height: u16) {
        let canvas = AppLayout::new(Rect::new(0, 0, width, height)).diagram_canvas();
        self.layout_cache.resize(
            self.session.topology(),
            canvas.width as f64,
            canvas.height as f64,
        );
    }

    pub fn layout_recomputes(&self) -> usize {
        self.layout_cache.recomputes()
    }

    /// The diagram for the current step, once a size is known.
    pub fn scene(&self) -> Option<Scene> {
        self.layout_cache
            .current()
            .map(|layout| Scene::build(self.session.state(), self.session.highlight(), layout))
    }

    /// The current scene for an explicit canvas size, without touching the
    /// cached layout.
    pub fn scene_for(&self, width: f64, height: f64) -> Scene {
        let layout = DiagramLayout::compute_with_offset(
            self.session.topology(),
            width,
            height,
            self.config.label_offset,
        );
        Scene::build(self.session.state(), self.session.highlight(), &layout)
    }

    /// Every step from the first, as plain text. Runs on a fresh session so
    /// the live one keeps its position.
    pub fn transcript(&self) -> Result<String> {
        let mut session = self.session.clone();
        session.restart()?;
        let mut out = String::new();
        loop {
            let step = session.current_step();
            writeln!(
                out,
                "Step {}/{}: {}",
                session.current_index() + 1,
                session.total_steps(),
                step.title
            )?;
            writeln!(out, "  {}", step.explanation)?;
            if let Some(source) = step.formula.as_deref() {
                writeln!(out, "  {}", typeset(self.renderer.as_ref(), source).text())?;
            }
            for line in session.output().result.lines() {
                writeln!(out, "  {line}")?;
            }
            writeln!(out)?;
            if !session.advance()? {
                break;
            }
        }
        debug!(steps = session.total_steps(), "transcript written");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        App::new(Config::default(), theme).unwrap()
    }

    #[test]
    fn test_new_app_starts_at_overview() {
        let app = test_app();
        assert_eq!(app.screen, AppScreen::Walkthrough);
        assert_eq!(app.session.current_index(), 0);
        assert!(app.formula().is_none());
        assert!(app.scene().is_none());
    }

    #[test]
    fn test_advance_refreshes_formula() {
        let mut app = test_app();
        app.advance().unwrap();
        let formula = app.formula().unwrap();
        assert!(!formula.is_error());
        assert!(formula.text().starts_with("netₕ₁"));
        app.retreat().unwrap();
        assert!(app.formula().is_none());
    }

    #[test]
    fn test_resize_only_recomputes_on_change() {
        let mut app = test_app();
        app.on_resize(120, 40);
        app.on_resize(120, 40);
        assert_eq!(app.layout_recomputes(), 1);
        app.on_resize(80, 30);
        assert_eq!(app.layout_recomputes(), 2);
        assert!(app.scene().is_some());
    }

    #[test]
    fn test_jump_to_end_and_restart() {
        let mut app = test_app();
        app.jump_to_end().unwrap();
        assert_eq!(app.session.current_index(), app.session.total_steps() - 1);
        app.restart().unwrap();
        assert_eq!(app.session.current_index(), 0);
        assert!(app.session.state().calculated_values().is_empty());
    }

    #[test]
    fn test_toggle_help() {
        let mut app = test_app();
        app.toggle_help();
        assert_eq!(app.screen, AppScreen::Help);
        app.toggle_help();
        assert_eq!(app.screen, AppScreen::Walkthrough);
    }

    #[test]
    fn test_transcript_covers_every_step_and_keeps_position() {
        let mut app = test_app();
        app.jump_to(3).unwrap();
        let text = app.transcript().unwrap();
        assert!(text.starts_with("Step 1/19: "));
        assert!(text.contains("Step 19/19: "));
        assert!(text.contains("net_h1 = "));
        assert!(text.contains("0.0275"));
        assert_eq!(app.session.current_index(), 3);
    }
}
