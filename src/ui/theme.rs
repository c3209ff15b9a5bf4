use crate::node::NodeKind;
use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    pub muted: Style,
    pub structure: Style,
    pub content: Style,
}

impl Theme {
    pub fn detect() -> Self {
        if !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
            structure: Style::new().blue().bold(),
            content: Style::new().green(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            muted: Style::new(),
            structure: Style::new(),
            content: Style::new(),
        }
    }

    /// Frame sets and frames are structure, everything below is content
    pub fn kind_style(&self, kind: NodeKind) -> Style {
        match kind {
            NodeKind::Root | NodeKind::Frameset | NodeKind::Frame => self.structure.clone(),
            NodeKind::TextDocument => self.info.clone(),
            NodeKind::TextTable | NodeKind::TextList | NodeKind::TextFrame => self.content.clone(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
