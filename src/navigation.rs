use serde::{Deserialize, Serialize};

/// The book's conventional first content page.
pub const DEFAULT_START_PAGE: u32 = 13;
pub const MIN_PAGE: u32 = 1;

/// Current page, back-navigation stack and the verse highlighted after a jump.
///
/// `history` grows only through `go_to`/`next` and shrinks only through `back`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    current_page: u32,
    history: Vec<u32>,
    selected_sura: Option<u32>,
    selected_verse: Option<u32>,
    start_page: u32,
    min_page: u32,
}

impl NavigationState {
    pub fn new(current_page: u32, start_page: u32, min_page: u32) -> Self {
        NavigationState {
            current_page,
            history: Vec::new(),
            selected_sura: None,
            selected_verse: None,
            start_page,
            min_page,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn history(&self) -> &[u32] {
        &self.history
    }

    pub fn selected_sura(&self) -> Option<u32> {
        self.selected_sura
    }

    pub fn selected_verse(&self) -> Option<u32> {
        self.selected_verse
    }

    /// Moves to `new_page`, remembering the page we leave. Staying on the same
    /// page pushes nothing but still replaces the selection.
    pub fn go_to(&mut self, new_page: u32, sura: Option<u32>, verse: Option<u32>) {
        if new_page != self.current_page {
            self.history.push(self.current_page);
        }
        self.current_page = new_page;
        self.selected_sura = sura;
        self.selected_verse = verse;
    }

    pub fn next(&mut self) {
        self.go_to(self.current_page.saturating_add(1), None, None);
    }

    /// Returns to the most recent page in history. With no history, steps one
    /// page down unless already on the start page. The selection is kept.
    pub fn back(&mut self) {
        if let Some(previous) = self.history.pop() {
            self.current_page = previous;
        } else if self.current_page != self.start_page {
            self.current_page = self.current_page.saturating_sub(1).max(self.min_page);
        }
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        NavigationState::new(DEFAULT_START_PAGE, DEFAULT_START_PAGE, MIN_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_go_to_pushes_previous_page() {
        let mut nav = NavigationState::default();
        nav.go_to(40, Some(2), Some(16));

        assert_eq!(nav.current_page(), 40);
        assert_eq!(nav.history(), &[13]);
        assert_eq!(nav.selected_sura(), Some(2));
        assert_eq!(nav.selected_verse(), Some(16));
    }

    #[test]
    fn test_go_to_same_page_only_updates_selection() {
        let mut nav = NavigationState::default();
        nav.go_to(40, Some(2), Some(16));
        nav.go_to(40, Some(2), Some(17));

        assert_eq!(nav.history(), &[13]);
        assert_eq!(nav.selected_verse(), Some(17));

        nav.go_to(40, None, None);
        assert_eq!(nav.selected_sura(), None);
    }

    #[test]
    fn test_next_clears_selection() {
        let mut nav = NavigationState::default();
        nav.go_to(40, Some(2), Some(16));
        nav.next();

        assert_eq!(nav.current_page(), 41);
        assert_eq!(nav.history(), &[13, 40]);
        assert_eq!(nav.selected_sura(), None);
    }

    #[test]
    fn test_back_pops_history_and_keeps_selection() {
        let mut nav = NavigationState::default();
        nav.go_to(40, Some(2), Some(16));
        nav.back();

        assert_eq!(nav.current_page(), 13);
        assert!(nav.history().is_empty());
        assert_eq!(nav.selected_verse(), Some(16));
    }

    #[test]
    fn test_back_on_start_page_is_noop() {
        let mut nav = NavigationState::default();
        nav.back();
        assert_eq!(nav.current_page(), 13);
        assert!(nav.history().is_empty());
    }

    #[test]
    fn test_back_without_history_steps_down() {
        let mut nav = NavigationState::new(20, DEFAULT_START_PAGE, MIN_PAGE);
        nav.back();
        assert_eq!(nav.current_page(), 19);
        assert!(nav.history().is_empty());
    }

    #[test]
    fn test_back_never_goes_below_min_page() {
        let mut nav = NavigationState::new(1, DEFAULT_START_PAGE, MIN_PAGE);
        nav.back();
        assert_eq!(nav.current_page(), 1);

        let mut nav = NavigationState::new(0, DEFAULT_START_PAGE, MIN_PAGE);
        nav.back();
        assert_eq!(nav.current_page(), 1);
    }

    #[test]
    fn test_non_linear_jumps_unwind_in_reverse() {
        let mut nav = NavigationState::default();
        nav.go_to(300, None, None);
        nav.go_to(25, None, None);
        nav.next();
        nav.go_to(100, None, None);

        let mut visited = Vec::new();
        while !nav.history().is_empty() {
            nav.back();
            visited.push(nav.current_page());
        }
        assert_eq!(visited, vec![26, 25, 300, 13]);
    }

    proptest! {
        #[test]
        fn prop_back_restores_reverse_chronological_order(
            pages in prop::collection::vec(1u32..60, 0..30)
        ) {
            let mut nav = NavigationState::default();
            let mut expected = Vec::new();
            for page in &pages {
                if *page != nav.current_page() {
                    expected.push(nav.current_page());
                }
                nav.go_to(*page, None, None);
            }
            prop_assert_eq!(nav.history(), expected.as_slice());

            while let Some(page) = expected.pop() {
                nav.back();
                prop_assert_eq!(nav.current_page(), page);
            }
            prop_assert!(nav.history().is_empty());
        }
    }
}
