/// Theme lookup capability for symbolic font references.
///
/// Interactive hosts configure fonts through theme variables
/// (`var(--font-display), serif`); the renderer dereferences them through
/// this trait so the engine never touches presentation state directly.
pub trait FontResolver {
    /// Resolve a theme variable name (e.g. `--font-display`) to a concrete
    /// font family, or `None` when the variable is unknown.
    fn lookup(&self, variable: &str) -> Option<String>;
}

/// Resolver without a theme: every variable is unresolved.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTheme;

impl FontResolver for NoTheme {
    fn lookup(&self, _variable: &str) -> Option<String> {
        None
    }
}

/// Hard fallback family when a symbolic reference cannot be resolved.
pub const FALLBACK_FAMILY: &str = "sans-serif";

/// Resolve a configured font string to a concrete CSS-style family stack.
///
/// Plain family names pass through untouched. A `var(--x)` reference is
/// dereferenced via `resolver`; the rest of the stack (if any) is kept as
/// fallback. Unresolvable references collapse to [`FALLBACK_FAMILY`].
pub fn resolve_font_family(font: &str, resolver: &dyn FontResolver) -> String {
    let font = font.trim();
    if font.is_empty() {
        return FALLBACK_FAMILY.to_owned();
    }

    let Some(start) = font.find("var(") else {
        return font.to_owned();
    };
    let Some(rel_end) = font[start..].find(')') else {
        return FALLBACK_FAMILY.to_owned();
    };
    let end = start + rel_end;
    let variable = font[start + 4..end].trim();

    let Some(resolved) = resolver.lookup(variable) else {
        return FALLBACK_FAMILY.to_owned();
    };

    // Keep the rest of the stack as fallback families.
    let mut backup = String::new();
    backup.push_str(font[..start].trim());
    let tail = font[end + 1..].trim().trim_start_matches(',').trim();
    if !tail.is_empty() {
        if !backup.is_empty() {
            backup.push_str(", ");
        }
        backup.push_str(tail);
    }

    if backup.is_empty() {
        resolved
    } else {
        format!("{resolved}, {backup}")
    }
}

/// Parse a CSS-ish font weight ("normal", "bold", or a number) to a numeric
/// weight, defaulting to 400.
pub fn parse_font_weight(weight: &str) -> f32 {
    match weight.trim().to_ascii_lowercase().as_str() {
        "bold" => 700.0,
        "normal" | "" => 400.0,
        other => other.parse::<f32>().ok().filter(|w| *w > 0.0).unwrap_or(400.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Theme;
    impl FontResolver for Theme {
        fn lookup(&self, variable: &str) -> Option<String> {
            (variable == "--font-display").then(|| "Inter".to_owned())
        }
    }

    #[test]
    fn plain_family_passes_through() {
        assert_eq!(resolve_font_family("Georgia, serif", &NoTheme), "Georgia, serif");
    }

    #[test]
    fn resolves_theme_variable_and_keeps_backup() {
        assert_eq!(
            resolve_font_family("var(--font-display), serif", &Theme),
            "Inter, serif"
        );
        assert_eq!(resolve_font_family("var(--font-display)", &Theme), "Inter");
    }

    #[test]
    fn unresolved_variable_falls_back_to_sans_serif() {
        assert_eq!(
            resolve_font_family("var(--font-unknown), serif", &Theme),
            FALLBACK_FAMILY
        );
        assert_eq!(resolve_font_family("", &NoTheme), FALLBACK_FAMILY);
    }

    #[test]
    fn weight_parsing() {
        assert_eq!(parse_font_weight("bold"), 700.0);
        assert_eq!(parse_font_weight("normal"), 400.0);
        assert_eq!(parse_font_weight("600"), 600.0);
        assert_eq!(parse_font_weight("wiggly"), 400.0);
    }
}
