//! Target text normalization

/// Descriptive suffixes users attach to element targets, in check order.
const SUFFIXES: [&str; 7] = [
    " button", " link", " field", " input", " text", " box", " element",
];

/// Strip at most one descriptive suffix from a target, case-insensitively.
///
/// `"Login Button"` becomes `"Login"`; `"email field"` becomes `"email"`;
/// a target with no suffix comes back trimmed and otherwise untouched.
pub fn normalize(target: &str) -> String {
    let trimmed = target.trim();
    for suffix in SUFFIXES {
        if let Some(stem) = strip_suffix_ci(trimmed, suffix) {
            return stem.trim().to_string();
        }
    }
    trimmed.to_string()
}

fn strip_suffix_ci<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = s.len().checked_sub(suffix.len())?;
    if !s.is_char_boundary(cut) {
        return None;
    }
    let (stem, tail) = s.split_at(cut);
    tail.eq_ignore_ascii_case(suffix).then_some(stem)
}

/// The needle variants a strategy is tried against: the normalized form
/// first, then the raw form when it differs.
#[derive(Debug, Clone)]
pub struct TargetVariants {
    normalized: String,
    raw: Option<String>,
}

impl TargetVariants {
    pub fn of(target: &str) -> Self {
        let trimmed = target.trim();
        let normalized = normalize(trimmed);
        let raw = (trimmed != normalized).then(|| trimmed.to_string());
        Self { normalized, raw }
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.normalized.as_str()).chain(self.raw.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_known_suffixes_case_insensitively() {
        assert_eq!(normalize("Login Button"), "Login");
        assert_eq!(normalize("forgot password LINK"), "forgot password");
        assert_eq!(normalize("email field"), "email");
        assert_eq!(normalize("search box"), "search");
    }

    #[test]
    fn strips_at_most_one_suffix() {
        // " field" wins in check order; the remaining " input" is kept.
        assert_eq!(normalize("email input field"), "email input");
    }

    #[test]
    fn leaves_plain_targets_alone() {
        assert_eq!(normalize("  Products  "), "Products");
        assert_eq!(normalize("Checkout"), "Checkout");
        // Suffix word without the leading space is part of the name.
        assert_eq!(normalize("button"), "button");
    }

    #[test]
    fn idempotent_on_its_own_output() {
        for target in ["Login Button", "Products", "search box"] {
            let once = normalize(target);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn variants_order_normalized_then_raw() {
        let v = TargetVariants::of("Login button");
        let needles: Vec<&str> = v.iter().collect();
        assert_eq!(needles, vec!["Login", "Login button"]);

        let v = TargetVariants::of("Products");
        let needles: Vec<&str> = v.iter().collect();
        assert_eq!(needles, vec!["Products"]);
    }
}
