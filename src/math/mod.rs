pub mod unicode;

use thiserror::Error;
use tracing::warn;

pub use unicode::UnicodeRenderer;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormulaError {
    #[error("unknown command \\{0}")]
    UnknownCommand(String),
    #[error("unbalanced braces")]
    UnbalancedBraces,
    #[error("{0} expects an argument")]
    MissingArgument(String),
}

/// Turns display-math source into text a view can show.
pub trait FormulaRenderer {
    fn render(&self, source: &str) -> Result<String, FormulaError>;
}

/// What the explanation pane shows in place of a formula.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormulaView {
    Rendered(String),
    Failed(String),
}

impl FormulaView {
    pub fn text(&self) -> &str {
        match self {
            FormulaView::Rendered(s) | FormulaView::Failed(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FormulaView::Failed(_))
    }
}

/// Removes a leading and a trailing `$$`, each independently, and trims.
pub fn strip_delimiters(source: &str) -> &str {
    let s = source.trim();
    let s = s.strip_prefix("$$").unwrap_or(s);
    let s = s.strip_suffix("$$").unwrap_or(s);
    s.trim()
}

/// Renders `source`, degrading to an inline message when it cannot be parsed.
pub fn typeset(renderer: &dyn FormulaRenderer, source: &str) -> FormulaView {
    match renderer.render(strip_delimiters(source)) {
        Ok(text) => FormulaView::Rendered(text),
        Err(err) => {
            warn!(%err, source, "formula failed to render");
            FormulaView::Failed(format!("Error rendering math: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_delimiters() {
        assert_eq!(strip_delimiters("$$ a + b $$"), "a + b");
        assert_eq!(strip_delimiters("a + b"), "a + b");
        assert_eq!(strip_delimiters("$$a"), "a");
        assert_eq!(strip_delimiters("  b$$ "), "b");
    }

    #[test]
    fn test_typeset_degrades_on_error() {
        let view = typeset(&UnicodeRenderer, "$$\\bogus{x}$$");
        assert!(view.is_error());
        assert_eq!(view.text(), "Error rendering math: unknown command \\bogus");
    }

    #[test]
    fn test_typeset_renders_valid_source() {
        let view = typeset(&UnicodeRenderer, "$$E_{total} = E_{o1} + E_{o2}$$");
        assert_eq!(view, FormulaView::Rendered("Eₜₒₜₐₗ = Eₒ₁ + Eₒ₂".to_string()));
    }
}
