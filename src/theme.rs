use gtk::prelude::*;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

const BUILTIN: [(&str, &str); 2] = [
    ("main", include_str!("themes/main.css")),
    ("midnight_pipe", include_str!("themes/midnight_pipe.css")),
];

pub const DEFAULT_THEME: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub css: Cow<'static, str>,
}

impl Theme {
    /// Looks for `<themes_dir>/<name>.css` first so users can override the
    /// built-in themes, then the built-ins, then falls back to `main`.
    pub fn resolve(name: &str, themes_dir: &Path) -> Self {
        let user_file = themes_dir.join(format!("{}.css", name));
        if user_file.is_file() {
            match fs::read_to_string(&user_file) {
                Ok(css) => {
                    return Self {
                        name: name.to_string(),
                        css: Cow::Owned(css),
                    }
                }
                Err(e) => log::warn!("Cannot read theme {}: {}", user_file.display(), e),
            }
        }

        if let Some(theme) = Self::builtin(name) {
            return theme;
        }
        log::warn!("Unknown theme '{}', using '{}'", name, DEFAULT_THEME);
        Self::builtin(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: DEFAULT_THEME.to_string(),
            css: Cow::Borrowed(""),
        })
    }

    fn builtin(name: &str) -> Option<Self> {
        BUILTIN
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|(builtin, css)| Self {
                name: builtin.to_string(),
                css: Cow::Borrowed(*css),
            })
    }

    pub fn apply(&self) {
        let css_provider = gtk::CssProvider::new();
        if let Err(e) = css_provider.load_from_data(self.css.as_bytes()) {
            log::warn!("Theme '{}' has invalid CSS: {}", self.name, e);
            return;
        }
        match gdk::Screen::default() {
            Some(screen) => gtk::StyleContext::add_provider_for_screen(
                &screen,
                &css_provider,
                gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
            ),
            None => log::warn!("No default screen, theme '{}' not applied", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_themes_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let theme = Theme::resolve("midnight_pipe", dir.path());
        assert_eq!(theme.name, "midnight_pipe");
        assert!(theme.css.contains(".song-display"));
    }

    #[test]
    fn unknown_theme_falls_back_to_main() {
        let dir = tempfile::tempdir().unwrap();
        let theme = Theme::resolve("vaporwave", dir.path());
        assert_eq!(theme.name, "main");
        assert!(theme.css.contains("dodgerblue"));
    }

    #[test]
    fn user_css_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.css"), "window { color: red; }").unwrap();
        fs::write(dir.path().join("paper.css"), "window { color: black; }").unwrap();

        assert_eq!(Theme::resolve("main", dir.path()).css, "window { color: red; }");
        let paper = Theme::resolve("paper", dir.path());
        assert_eq!(paper.name, "paper");
        assert_eq!(paper.css, "window { color: black; }");
    }
}
