//! Page layout configuration for the paginated preview: A4 paper, portrait
//! or landscape, margins in millimeters clamped to a sane range.

use serde::{Deserialize, Serialize};

pub const MIN_MARGIN_MM: u32 = 5;
pub const MAX_MARGIN_MM: u32 = 50;
const DEFAULT_MARGIN_MM: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn css_keyword(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(DEFAULT_MARGIN_MM)
    }
}

impl Margins {
    pub fn uniform(value: u32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Clamp every side to [MIN_MARGIN_MM, MAX_MARGIN_MM].
    pub fn clamped(self) -> Self {
        Self {
            top: self.top.clamp(MIN_MARGIN_MM, MAX_MARGIN_MM),
            right: self.right.clamp(MIN_MARGIN_MM, MAX_MARGIN_MM),
            bottom: self.bottom.clamp(MIN_MARGIN_MM, MAX_MARGIN_MM),
            left: self.left.clamp(MIN_MARGIN_MM, MAX_MARGIN_MM),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PageLayoutConfig {
    pub orientation: Orientation,
    pub margins: Margins,
}

impl PageLayoutConfig {
    /// Margins are clamped on construction; a config never carries values
    /// outside the legal range.
    pub fn new(orientation: Orientation, margins: Margins) -> Self {
        Self {
            orientation,
            margins: margins.clamped(),
        }
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins.clamped();
    }

    /// The standalone @page rule handed to the pagination renderer: physical
    /// A4 size, configured margins, page-number footer counter.
    pub fn page_style(&self) -> String {
        let Margins {
            top,
            right,
            bottom,
            left,
        } = self.margins;
        format!(
            "@page {{\n  size: A4 {};\n  margin: {}mm {}mm {}mm {}mm;\n  @bottom-center {{ content: counter(page) \" / \" counter(pages); font-size: 10pt; color: #475569; }}\n}}\nbody {{ counter-reset: page 1; }}",
            self.orientation.css_keyword(),
            top,
            right,
            bottom,
            left
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margins_clamped_low_and_high() {
        let margins = Margins {
            top: 0,
            right: 3,
            bottom: 80,
            left: 51,
        }
        .clamped();
        assert_eq!(margins.top, MIN_MARGIN_MM);
        assert_eq!(margins.right, MIN_MARGIN_MM);
        assert_eq!(margins.bottom, MAX_MARGIN_MM);
        assert_eq!(margins.left, MAX_MARGIN_MM);
    }

    #[test]
    fn test_margins_in_range_untouched() {
        let margins = Margins::uniform(20).clamped();
        assert_eq!(margins, Margins::uniform(20));
    }

    #[test]
    fn test_config_clamps_on_construction() {
        let config = PageLayoutConfig::new(Orientation::Portrait, Margins::uniform(100));
        assert_eq!(config.margins, Margins::uniform(MAX_MARGIN_MM));
    }

    #[test]
    fn test_set_margins_clamps() {
        let mut config = PageLayoutConfig::default();
        config.set_margins(Margins::uniform(1));
        assert_eq!(config.margins, Margins::uniform(MIN_MARGIN_MM));
    }

    #[test]
    fn test_page_style_portrait_default() {
        let style = PageLayoutConfig::default().page_style();
        assert!(style.contains("size: A4 portrait;"));
        assert!(style.contains("margin: 20mm 20mm 20mm 20mm;"));
        assert!(style.contains("counter(page) \" / \" counter(pages)"));
    }

    #[test]
    fn test_page_style_landscape_margins() {
        let config = PageLayoutConfig::new(
            Orientation::Landscape,
            Margins {
                top: 10,
                right: 15,
                bottom: 10,
                left: 25,
            },
        );
        let style = config.page_style();
        assert!(style.contains("size: A4 landscape;"));
        assert!(style.contains("margin: 10mm 15mm 10mm 25mm;"));
    }
}
