//! # Page Break Decisions
//!
//! The policy the flow engine consults before every atomic placement: a
//! run, a word, or a field. The decision is a pure function of the cursor
//! position and the exact height the placement needs; the engine applies
//! the side effects (reset to the top margin, next page index, emit the
//! break op). Breaks are never applied retroactively.

/// Does placing `needed` points of content at vertical offset `y` cross the
/// bottom content boundary?
///
/// `y` is the distance from the page top; `bottom` is the last usable
/// offset (page height minus the bottom margin).
pub fn needs_break(y: f64, needed: f64, bottom: f64) -> bool {
    y + needed > bottom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_exactly() {
        assert!(!needs_break(700.0, 20.0, 720.0));
    }

    #[test]
    fn overflows_by_a_hair() {
        assert!(needs_break(700.0, 20.01, 720.0));
    }

    #[test]
    fn zero_height_never_breaks_inside_content() {
        assert!(!needs_break(720.0, 0.0, 720.0));
    }

    #[test]
    fn tall_placement_breaks_even_near_top() {
        // A 5-line textarea near the page bottom must move whole.
        assert!(needs_break(660.0, 5.0 * 14.0 + 8.0, 720.0));
    }
}
