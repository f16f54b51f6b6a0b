//! Breadcrumb Resolver: ancestry of landmarks enclosing a token position.
//!
//! The resolver walks the landmarks at or before the query position with a
//! stack. Each landmark pops every entry whose level is greater than or
//! equal to its own, then pushes itself. Headings therefore nest the usual
//! way. Callouts have level 0, so a callout clears the whole stack and stays
//! the only entry until the next heading arrives.

use super::landmark::Landmark;
use unicode_width::UnicodeWidthStr;

/// Separator used by [`BreadcrumbContext::trail`].
pub const TRAIL_SEPARATOR: &str = " › ";

/// Derived location context for one token position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreadcrumbContext {
    /// Enclosing landmarks, outermost first.
    pub path: Vec<Landmark>,
}

impl BreadcrumbContext {
    /// Innermost landmark, if any.
    pub fn current(&self) -> Option<&Landmark> {
        self.path.last()
    }

    /// Whether no landmark encloses the position.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Labels along the path, outermost first.
    pub fn labels(&self) -> Vec<&str> {
        self.path.iter().map(|l| l.label.as_str()).collect()
    }

    /// Render `A › B › C` within `max_columns` terminal columns.
    ///
    /// Outer entries are dropped first and replaced by a leading `…`.
    /// If even that is too wide the innermost label is shown alone, cut
    /// on the right when it does not fit either.
    pub fn trail(&self, max_columns: usize) -> String {
        let labels = self.labels();
        let full = labels.join(TRAIL_SEPARATOR);
        if full.width() <= max_columns {
            return full;
        }

        for skip in 1..labels.len() {
            let candidate = format!("…{TRAIL_SEPARATOR}{}", labels[skip..].join(TRAIL_SEPARATOR));
            if candidate.width() <= max_columns {
                return candidate;
            }
        }

        if max_columns == 0 {
            return String::new();
        }
        let innermost = labels.last().copied().unwrap_or_default();
        if innermost.width() <= max_columns {
            return innermost.to_string();
        }

        let mut out = String::new();
        let mut used = 0;
        for ch in innermost.chars() {
            let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
            if used + w + 1 > max_columns {
                break;
            }
            used += w;
            out.push(ch);
        }
        out.push('…');
        out
    }
}

/// Resolve the breadcrumb for `index` from an ordered landmark list.
pub fn resolve(landmarks: &[Landmark], index: usize) -> BreadcrumbContext {
    let visible = landmarks.partition_point(|l| l.token_index <= index);
    let mut stack: Vec<&Landmark> = Vec::new();

    for landmark in &landmarks[..visible] {
        while stack.last().is_some_and(|top| top.level >= landmark.level) {
            stack.pop();
        }
        stack.push(landmark);
    }

    BreadcrumbContext {
        path: stack.into_iter().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Landmark> {
        vec![
            Landmark::heading(1, "A", 0),
            Landmark::heading(2, "B", 5),
            Landmark::heading(1, "C", 10),
        ]
    }

    #[test]
    fn test_nested_path() {
        let crumbs = resolve(&sample(), 7);
        assert_eq!(crumbs.labels(), vec!["A", "B"]);
        assert_eq!(crumbs.current().map(|l| l.label.as_str()), Some("B"));
    }

    #[test]
    fn test_sibling_replaces_subtree() {
        let crumbs = resolve(&sample(), 12);
        assert_eq!(crumbs.labels(), vec!["C"]);
    }

    #[test]
    fn test_before_first_landmark() {
        let landmarks = vec![Landmark::heading(1, "Late", 4)];
        let crumbs = resolve(&landmarks, 2);
        assert!(crumbs.is_empty());
        assert!(crumbs.current().is_none());
    }

    #[test]
    fn test_landmark_position_is_inclusive() {
        let crumbs = resolve(&sample(), 5);
        assert_eq!(crumbs.labels(), vec!["A", "B"]);
    }

    #[test]
    fn test_deeper_heading_keeps_ancestors() {
        let landmarks = vec![
            Landmark::heading(1, "Top", 0),
            Landmark::heading(3, "Skip", 2),
            Landmark::heading(2, "Mid", 4),
        ];
        assert_eq!(resolve(&landmarks, 3).labels(), vec!["Top", "Skip"]);
        assert_eq!(resolve(&landmarks, 4).labels(), vec!["Top", "Mid"]);
    }

    #[test]
    fn test_callout_clears_ancestry() {
        let landmarks = vec![
            Landmark::heading(1, "Chapter", 0),
            Landmark::heading(2, "Section", 3),
            Landmark::callout("note", "Aside", 6),
            Landmark::heading(3, "Sub", 9),
        ];
        assert_eq!(resolve(&landmarks, 7).labels(), vec!["Aside"]);
        assert_eq!(resolve(&landmarks, 9).labels(), vec!["Aside", "Sub"]);
    }

    #[test]
    fn test_trail_fits() {
        let crumbs = resolve(&sample(), 7);
        assert_eq!(crumbs.trail(80), "A › B");
    }

    #[test]
    fn test_trail_drops_outer_entries() {
        let landmarks = vec![
            Landmark::heading(1, "Introduction", 0),
            Landmark::heading(2, "Background", 1),
            Landmark::heading(3, "Scope", 2),
        ];
        let crumbs = resolve(&landmarks, 2);
        assert_eq!(crumbs.trail(20), "… › Scope");
        assert_eq!(crumbs.trail(4), "Sco…");
    }

    #[test]
    fn test_trail_exact_fit_and_zero_width() {
        let landmarks = vec![
            Landmark::heading(1, "Introduction", 0),
            Landmark::heading(2, "Scope", 1),
        ];
        let crumbs = resolve(&landmarks, 1);
        assert_eq!(crumbs.trail(5), "Scope");
        assert_eq!(crumbs.trail(0), "");

        let single = resolve(&landmarks[1..], 1);
        assert_eq!(single.trail(5), "Scope");
        assert_eq!(single.trail(1), "…");
    }
}
