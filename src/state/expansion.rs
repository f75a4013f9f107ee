//! Expand/collapse state machine for lazily loaded folders.

/// Phase of one folder, derived from the expanded flag, the loading set and
/// the entry cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderPhase {
    Collapsed,
    Loading,
    Loaded,
}

/// What a toggle on a folder must do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    /// Folder was expanded: collapse it; an in-flight fetch keeps running.
    Collapse,
    /// Entries are cached: expand without a request.
    ExpandCached,
    /// A fetch is already in flight: expand and wait for it.
    ExpandPending,
    /// Nothing cached or in flight: expand and fetch.
    ExpandAndFetch,
}

impl ToggleAction {
    pub fn needs_fetch(self) -> bool {
        self == ToggleAction::ExpandAndFetch
    }
}

/// Decide the toggle action for a folder.
pub fn plan_toggle(expanded: bool, cached: bool, loading: bool) -> ToggleAction {
    if expanded {
        ToggleAction::Collapse
    } else if cached {
        ToggleAction::ExpandCached
    } else if loading {
        ToggleAction::ExpandPending
    } else {
        ToggleAction::ExpandAndFetch
    }
}

/// Phase shown for a folder.
pub fn phase(expanded: bool, cached: bool, loading: bool) -> FolderPhase {
    if !expanded {
        FolderPhase::Collapsed
    } else if loading && !cached {
        FolderPhase::Loading
    } else {
        FolderPhase::Loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_toggle() {
        assert_eq!(plan_toggle(true, true, false), ToggleAction::Collapse);
        assert_eq!(plan_toggle(true, false, true), ToggleAction::Collapse);
        assert_eq!(plan_toggle(false, true, false), ToggleAction::ExpandCached);
        assert_eq!(plan_toggle(false, false, true), ToggleAction::ExpandPending);
        assert_eq!(plan_toggle(false, false, false), ToggleAction::ExpandAndFetch);
    }

    #[test]
    fn test_only_uncached_idle_folder_fetches() {
        let fetching: Vec<bool> = [
            (false, false, false),
            (false, true, false),
            (false, false, true),
            (true, false, false),
        ]
        .iter()
        .map(|&(e, c, l)| plan_toggle(e, c, l).needs_fetch())
        .collect();
        assert_eq!(fetching, vec![true, false, false, false]);
    }

    #[test]
    fn test_phase() {
        assert_eq!(phase(false, false, true), FolderPhase::Collapsed);
        assert_eq!(phase(true, false, true), FolderPhase::Loading);
        assert_eq!(phase(true, true, false), FolderPhase::Loaded);
        assert_eq!(phase(true, false, false), FolderPhase::Loaded);
    }
}
