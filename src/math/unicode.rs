use crate::math::{FormulaError, FormulaRenderer};

/// Typesets the LaTeX subset the walkthrough uses as plain Unicode text, for
/// surfaces that can only show characters.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnicodeRenderer;

impl FormulaRenderer for UnicodeRenderer {
    fn render(&self, source: &str) -> Result<String, FormulaError> {
        let mut parser = Parser {
            chars: source.chars().collect(),
            pos: 0,
        };
        let out = parser.sequence(false)?;
        Ok(out.trim().to_string())
    }
}

enum Symbol {
    Ordinary(&'static str),
    /// Binary operators and relations get a space on each side.
    Binary(&'static str),
}

fn symbol(name: &str) -> Option<Symbol> {
    use Symbol::{Binary, Ordinary};
    let s = match name {
        "alpha" => Ordinary("α"),
        "beta" => Ordinary("β"),
        "gamma" => Ordinary("γ"),
        "delta" => Ordinary("δ"),
        "Delta" => Ordinary("Δ"),
        "epsilon" => Ordinary("ε"),
        "eta" => Ordinary("η"),
        "theta" => Ordinary("θ"),
        "lambda" => Ordinary("λ"),
        "mu" => Ordinary("μ"),
        "pi" => Ordinary("π"),
        "sigma" => Ordinary("σ"),
        "Sigma" | "sum" => Ordinary("Σ"),
        "partial" => Ordinary("∂"),
        "nabla" => Ordinary("∇"),
        "infty" => Ordinary("∞"),
        "prime" => Ordinary("′"),
        "ldots" => Ordinary("…"),
        "cdots" => Ordinary("⋯"),
        "cdot" => Binary("·"),
        "times" => Binary("×"),
        "pm" => Binary("±"),
        "approx" => Binary("≈"),
        "leq" => Binary("≤"),
        "geq" => Binary("≥"),
        "neq" => Binary("≠"),
        "to" | "rightarrow" => Binary("→"),
        "leftarrow" => Binary("←"),
        _ => return None,
    };
    Some(s)
}

fn subscript_char(c: char) -> Option<char> {
    Some(match c {
        '0'..='9' => char::from_u32('₀' as u32 + (c as u32 - '0' as u32))?,
        '+' => '₊',
        '-' | '−' => '₋',
        '=' => '₌',
        '(' => '₍',
        ')' => '₎',
        'a' => 'ₐ',
        'e' => 'ₑ',
        'h' => 'ₕ',
        'i' => 'ᵢ',
        'j' => 'ⱼ',
        'k' => 'ₖ',
        'l' => 'ₗ',
        'm' => 'ₘ',
        'n' => 'ₙ',
        'o' => 'ₒ',
        'p' => 'ₚ',
        'r' => 'ᵣ',
        's' => 'ₛ',
        't' => 'ₜ',
        'u' => 'ᵤ',
        'v' => 'ᵥ',
        'x' => 'ₓ',
        _ => return None,
    })
}

fn superscript_char(c: char) -> Option<char> {
    Some(match c {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4'..='9' => char::from_u32('⁴' as u32 + (c as u32 - '4' as u32))?,
        '+' => '⁺',
        '-' | '−' => '⁻',
        '=' => '⁼',
        '(' => '⁽',
        ')' => '⁾',
        'i' => 'ⁱ',
        'n' => 'ⁿ',
        'T' => 'ᵀ',
        _ => return None,
    })
}

/// Maps every character through `table`, or falls back to `marker(text)`.
fn script(text: &str, marker: char, table: fn(char) -> Option<char>) -> String {
    let mapped: Option<String> = text.chars().map(table).collect();
    match mapped {
        Some(s) if !s.is_empty() => s,
        _ if text.chars().count() == 1 => format!("{marker}{text}"),
        _ => format!("{marker}({text})"),
    }
}

fn needs_parens(s: &str) -> bool {
    s.chars().count() > 1
        && s
            .chars()
            .any(|c| matches!(c, ' ' | '+' | '−' | '-' | '·' | '×' | '/' | '='))
}

fn push_space(out: &mut String) {
    if !out.is_empty() && !out.ends_with(' ') {
        out.push(' ');
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Parses until end of input, or until the `}` closing the current group
    /// when `in_group` is set.
    fn sequence(&mut self, in_group: bool) -> Result<String, FormulaError> {
        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return if in_group {
                    Err(FormulaError::UnbalancedBraces)
                } else {
                    Ok(out)
                };
            };
            match c {
                '}' if in_group => return Ok(out),
                '}' => return Err(FormulaError::UnbalancedBraces),
                '{' => out.push_str(&self.sequence(true)?),
                '\\' => self.command(&mut out)?,
                '_' => {
                    let arg = self.argument("_")?;
                    out.push_str(&script(&arg, '_', subscript_char));
                }
                '^' => {
                    let arg = self.argument("^")?;
                    out.push_str(&script(&arg, '^', superscript_char));
                }
                '-' => out.push('−'),
                c if c.is_whitespace() => push_space(&mut out),
                c => out.push(c),
            }
        }
    }

    /// A single-token argument: a group, a command, or one character.
    fn argument(&mut self, owner: &str) -> Result<String, FormulaError> {
        self.skip_spaces();
        match self.bump() {
            Some('{') => self.sequence(true),
            Some('\\') => {
                let mut out = String::new();
                self.command(&mut out)?;
                Ok(out.trim().to_string())
            }
            Some('}') | None => Err(FormulaError::MissingArgument(owner.to_string())),
            Some('-') => Ok("−".to_string()),
            Some(c) => Ok(c.to_string()),
        }
    }

    fn command(&mut self, out: &mut String) -> Result<(), FormulaError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        if self.pos == start {
            // Control symbol: \, \; \{ \} \\ and friends.
            match self.bump() {
                Some(',' | ';' | ' ' | ':') => push_space(out),
                Some(c @ ('{' | '}' | '$' | '%' | '_' | '&' | '#')) => out.push(c),
                Some('\\') => push_space(out),
                Some(c) => return Err(FormulaError::UnknownCommand(c.to_string())),
                None => return Err(FormulaError::UnknownCommand(String::new())),
            }
            return Ok(());
        }

        let name: String = self.chars[start..self.pos].iter().collect();
        match name.as_str() {
            "frac" => {
                let num = self.argument("\\frac")?;
                let den = self.argument("\\frac")?;
                let wrap = |s: String| if needs_parens(&s) { format!("({s})") } else { s };
                out.push_str(&wrap(num));
                out.push('/');
                out.push_str(&wrap(den));
            }
            "left" | "right" => {
                self.skip_spaces();
                match self.bump() {
                    Some('.') => {}
                    Some('\\') => self.command(out)?,
                    Some(c) => out.push(c),
                    None => return Err(FormulaError::MissingArgument(format!("\\{name}"))),
                }
            }
            "text" | "mathrm" | "mathit" | "operatorname" => {
                let arg = self.argument(&format!("\\{name}"))?;
                out.push_str(&arg);
            }
            "quad" => out.push_str("  "),
            "qquad" => out.push_str("    "),
            _ => match symbol(&name) {
                Some(Symbol::Ordinary(s)) => {
                    out.push_str(s);
                    self.skip_spaces();
                }
                Some(Symbol::Binary(s)) => {
                    push_space(out);
                    out.push_str(s);
                    out.push(' ');
                    self.skip_spaces();
                }
                None => return Err(FormulaError::UnknownCommand(name)),
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(s: &str) -> Result<String, FormulaError> {
        UnicodeRenderer.render(s)
    }

    #[test]
    fn test_subscripts_map_to_unicode() {
        assert_eq!(render("net_{h1} = w_1 \\cdot i_1").unwrap(), "netₕ₁ = w₁ · i₁");
    }

    #[test]
    fn test_unmappable_subscript_falls_back() {
        assert_eq!(render("x_{w5}").unwrap(), "x_(w5)");
        assert_eq!(render("x_w").unwrap(), "x_w");
    }

    #[test]
    fn test_frac_wraps_compound_parts() {
        assert_eq!(render("\\frac{1}{2}").unwrap(), "1/2");
        assert_eq!(render("\\frac{1}{1 + e^{-x}}").unwrap(), "1/(1 + e^(−x))");
    }

    #[test]
    fn test_superscripts() {
        assert_eq!(render("(a - b)^2").unwrap(), "(a − b)²");
        assert_eq!(render("w^{+}").unwrap(), "w⁺");
    }

    #[test]
    fn test_greek_and_operators() {
        assert_eq!(
            render("\\delta_{o1} = \\sigma(x) \\times \\eta").unwrap(),
            "δₒ₁ = σ(x) × η"
        );
        assert_eq!(
            render("\\frac{\\partial E_{total}}{\\partial w}").unwrap(),
            "∂Eₜₒₜₐₗ/∂w"
        );
    }

    #[test]
    fn test_left_right_and_text() {
        assert_eq!(render("\\left( a \\right)").unwrap(), "( a )");
        assert_eq!(render("\\text{out}_{h1}").unwrap(), "outₕ₁");
    }

    #[test]
    fn test_errors() {
        assert_eq!(render("{a"), Err(FormulaError::UnbalancedBraces));
        assert_eq!(render("a}"), Err(FormulaError::UnbalancedBraces));
        assert_eq!(
            render("\\foo"),
            Err(FormulaError::UnknownCommand("foo".to_string()))
        );
        assert_eq!(
            render("\\frac{1}"),
            Err(FormulaError::MissingArgument("\\frac".to_string()))
        );
        assert_eq!(render("x^"), Err(FormulaError::MissingArgument("^".to_string())));
    }
}
