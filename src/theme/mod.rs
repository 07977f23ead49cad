//! Theme system for human-mode output.

use console::Style;

/// Visual theme for TestKit human-mode output.
///
/// Centralizes colors and styles for consistent rendering.
#[derive(Debug, Clone)]
pub struct TkTheme {
    pub accent: Style,
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    pub muted: Style,

    pub header: Style,
    pub label: Style,
    pub value: Style,
    pub profile_id: Style,
    pub path: Style,
}

impl Default for TkTheme {
    fn default() -> Self {
        Self {
            accent: Style::new().blue().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warning: Style::new().yellow().bold(),
            muted: Style::new().dim(),
            header: Style::new().blue().bold().underlined(),
            label: Style::new().dim(),
            value: Style::new().bold(),
            profile_id: Style::new().cyan(),
            path: Style::new().italic().dim(),
        }
    }
}

impl TkTheme {
    /// Same layout with every style reduced to plain text.
    pub fn plain() -> Self {
        let plain = Style::new();
        Self {
            accent: plain.clone(),
            success: plain.clone(),
            error: plain.clone(),
            warning: plain.clone(),
            muted: plain.clone(),
            header: plain.clone(),
            label: plain.clone(),
            value: plain.clone(),
            profile_id: plain.clone(),
            path: plain,
        }
    }
}
