//! Agent assignment selection.
//!
//! The selection is the complete set of entry ids an agent may search. Every
//! toggle computes the whole next set; it is persisted as a whole.

use std::collections::BTreeSet;

/// Selection mark of a folder checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMark {
    All,
    Partial,
    None,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentState {
    pub agent_id: String,
    pub selected: BTreeSet<String>,
}

impl AssignmentState {
    pub fn new(agent_id: impl Into<String>, selected: impl IntoIterator<Item = String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            selected: selected.into_iter().collect(),
        }
    }

    pub fn is_selected(&self, entry_id: &str) -> bool {
        self.selected.contains(entry_id)
    }

    /// Next set after toggling one entry.
    pub fn toggled_entry(&self, entry_id: &str) -> BTreeSet<String> {
        let mut next = self.selected.clone();
        if !next.remove(entry_id) {
            next.insert(entry_id.to_string());
        }
        next
    }

    /// Next set after toggling a folder with the given children.
    ///
    /// All children selected: deselect them all. Otherwise select them all,
    /// so a partially selected folder becomes fully selected.
    pub fn toggled_folder<'a, I>(&self, child_ids: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let children: Vec<&str> = child_ids.into_iter().collect();
        let mut next = self.selected.clone();

        if self.mark(children.iter().copied()) == SelectionMark::All {
            for id in &children {
                next.remove(*id);
            }
        } else {
            next.extend(children.iter().map(|id| id.to_string()));
        }
        next
    }

    /// Checkbox mark for a folder. An empty folder is never selected.
    pub fn mark<'a, I>(&self, child_ids: I) -> SelectionMark
    where
        I: IntoIterator<Item = &'a str>,
    {
        let (mut total, mut selected) = (0usize, 0usize);
        for id in child_ids {
            total += 1;
            if self.selected.contains(id) {
                selected += 1;
            }
        }

        match (selected, total) {
            (0, _) => SelectionMark::None,
            (s, t) if s == t => SelectionMark::All,
            _ => SelectionMark::Partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(selected: &[&str]) -> AssignmentState {
        AssignmentState::new("agent-1", selected.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_toggle_entry() {
        let s = state(&["a"]);
        assert!(s.toggled_entry("a").is_empty());
        assert_eq!(s.toggled_entry("b").len(), 2);
    }

    #[test]
    fn test_partial_folder_selects_all_then_deselects_all() {
        let children = ["a", "b", "c"];
        let s = state(&["a", "x"]);
        assert_eq!(s.mark(children), SelectionMark::Partial);

        let once = AssignmentState::new("agent-1", s.toggled_folder(children));
        assert_eq!(once.mark(children), SelectionMark::All);
        assert!(once.is_selected("x"));

        let twice = AssignmentState::new("agent-1", once.toggled_folder(children));
        assert_eq!(twice.mark(children), SelectionMark::None);
        assert!(twice.is_selected("x"));
    }

    #[test]
    fn test_unselected_folder_selects_all() {
        let s = state(&[]);
        let next = s.toggled_folder(["a", "b"]);
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn test_empty_folder_mark() {
        let s = state(&["a"]);
        assert_eq!(s.mark(std::iter::empty()), SelectionMark::None);
    }
}
