use once_cell::sync::Lazy;
use syntect::{
    highlighting::ThemeSet,
    html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style},
    parsing::{SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};
use thiserror::Error;

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "syntax-" };

#[derive(Debug, Clone, Error)]
pub enum HighlightError {
    #[error("syntax highlighting failed: {language}: {message}")]
    Highlighting { language: String, message: String },
    #[error("unknown highlight theme `{0}`")]
    UnknownTheme(String),
}

/// Colour `code` with `syntax-` prefixed classes. Unknown languages fall back to plain text.
pub(crate) fn highlight_code(language: &str, code: &str) -> Result<String, HighlightError> {
    let syntax_set = &*SYNTAX_SET;
    let syntax =
        find_syntax(syntax_set, language).unwrap_or_else(|| syntax_set.find_syntax_plain_text());

    let mut code_with_newline = code.to_string();
    if !code_with_newline.ends_with('\n') {
        code_with_newline.push('\n');
    }

    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set, CLASS_STYLE);

    for line in LinesWithEndings::from(code_with_newline.as_str()) {
        generator
            .parse_html_for_line_which_includes_newline(line)
            .map_err(|err| HighlightError::Highlighting {
                language: language.to_string(),
                message: err.to_string(),
            })?;
    }

    Ok(generator.finalize())
}

/// Stylesheet matching the classes emitted by server-side highlighting.
pub fn highlight_css(theme_name: &str) -> Result<String, HighlightError> {
    let themes = ThemeSet::load_defaults();
    let theme = themes
        .themes
        .get(theme_name)
        .ok_or_else(|| HighlightError::UnknownTheme(theme_name.to_string()))?;

    css_for_theme_with_class_style(theme, CLASS_STYLE).map_err(|err| {
        HighlightError::Highlighting {
            language: "css".to_string(),
            message: err.to_string(),
        }
    })
}

fn find_syntax<'a>(syntax_set: &'a SyntaxSet, token: &str) -> Option<&'a SyntaxReference> {
    let lowercase = token.to_ascii_lowercase();
    syntax_set
        .find_syntax_by_token(&lowercase)
        .or_else(|| syntax_set.find_syntax_by_name(&lowercase))
        .or_else(|| syntax_set.find_syntax_by_extension(&lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_language_gets_syntax_classes() {
        let html = highlight_code("rust", "fn main() {}").expect("highlighted");
        assert!(html.contains("syntax-"));
        assert!(html.contains("main"));
    }

    #[test]
    fn unknown_language_falls_back_to_plain_text() {
        let html = highlight_code("nosuchlang", "a < b").expect("highlighted");
        assert!(html.contains("a &lt; b"));
    }

    #[test]
    fn css_for_default_theme() {
        let css = highlight_css("InspiredGitHub").expect("theme exists");
        assert!(css.contains(".syntax-"));
        assert!(matches!(
            highlight_css("Missing Theme"),
            Err(HighlightError::UnknownTheme(_))
        ));
    }
}
