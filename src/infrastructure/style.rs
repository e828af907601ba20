use web_sys::CssStyleDeclaration;

use crate::domain::errors::{ChartError, ChartResult};
use crate::infrastructure::dom::{document, js_error, window};

// Raw hsl components used when the page does not define a token.
const FALLBACK_CARD: &str = "0 0% 100%";
const FALLBACK_FOREGROUND: &str = "224 71% 4%";
const FALLBACK_MUTED: &str = "220 9% 46%";
const FALLBACK_ACCENT: &str = "152 100% 45%";

/// Reads named style tokens from the active theme's CSS custom properties
/// and formats them into renderer-consumable color strings.
///
/// Tooltip and axis styling cannot be rendered server side because the
/// resolved custom property values only exist in the live page.
pub struct StyleResolver {
    style: CssStyleDeclaration,
}

impl StyleResolver {
    pub fn from_document() -> ChartResult<Self> {
        let root = document()?
            .document_element()
            .ok_or_else(|| ChartError::Dom("document has no root element".to_string()))?;
        let style = window()?
            .get_computed_style(&root)
            .map_err(|e| js_error("computed style", e))?
            .ok_or_else(|| ChartError::Dom("no computed style for document root".to_string()))?;
        Ok(Self { style })
    }

    /// Raw `--{name}` token value, trimmed; empty when undefined.
    pub fn raw_token(&self, name: &str) -> String {
        self.style
            .get_property_value(&format!("--{}", name))
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    /// `hsl({token} / {opacity})` string, falling back to `fallback` when
    /// the page does not define the token.
    pub fn color(&self, name: &str, opacity: f64, fallback: &str) -> String {
        let raw = self.raw_token(name);
        let components = if raw.is_empty() { fallback } else { raw.as_str() };
        format_hsl(components, opacity)
    }
}

fn format_hsl(components: &str, opacity: f64) -> String {
    format!("hsl({} / {})", components, opacity)
}

/// Snapshot of the resolved theme tokens for one rebuild. Resolved once
/// per lifecycle event and threaded explicitly through customization and
/// widget construction; nothing reads theme state after this point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePalette {
    pub card: String,
    pub foreground: String,
    pub muted_foreground: String,
    pub accent: String,
    pub border: String,
}

impl StylePalette {
    pub fn resolve() -> ChartResult<Self> {
        let resolver = StyleResolver::from_document()?;
        Ok(Self {
            card: resolver.color("card", 1.0, FALLBACK_CARD),
            foreground: resolver.color("foreground", 1.0, FALLBACK_FOREGROUND),
            muted_foreground: resolver.color("muted-foreground", 1.0, FALLBACK_MUTED),
            accent: resolver.color("accent", 1.0, FALLBACK_ACCENT),
            border: resolver.color("foreground", 0.2, FALLBACK_FOREGROUND),
        })
    }
}

impl Default for StylePalette {
    fn default() -> Self {
        Self {
            card: format_hsl(FALLBACK_CARD, 1.0),
            foreground: format_hsl(FALLBACK_FOREGROUND, 1.0),
            muted_foreground: format_hsl(FALLBACK_MUTED, 1.0),
            accent: format_hsl(FALLBACK_ACCENT, 1.0),
            border: format_hsl(FALLBACK_FOREGROUND, 0.2),
        }
    }
}
