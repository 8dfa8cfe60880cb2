//! Page interaction state.
//!
//! Every interactive region of the page (modals, tabs, hero, navigation
//! menu, scroll-reveal elements) is a field of [`PageState`], and every user
//! or browser event is a [`UiEvent`]. [`PageState::apply`] is the only
//! transition; rendering the state is left to whatever drives the page.

use std::collections::BTreeSet;

/// Visible fraction at which an element counts as revealed.
pub const REVEAL_THRESHOLD: f64 = 0.1;

/// Something that happened on the page.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A `data-modal` trigger was clicked.
    OpenModal(String),
    /// The close button of the open modal was clicked.
    CloseModal,
    /// The dimmed backdrop around the open modal was clicked.
    BackdropClick,
    /// The Escape key was pressed.
    Escape,
    /// A tab button was clicked.
    SelectTab(String),
    /// A hero variant was chosen.
    SelectHero(String),
    /// The hamburger button was clicked.
    ToggleNav,
    /// A link inside the navigation menu was clicked.
    NavLinkClicked,
    /// An in-page `#anchor` link was clicked.
    AnchorClicked(String),
    /// A reveal element's visible fraction changed.
    Intersect { id: String, ratio: f64 },
}

/// Interaction state of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    open_modal: Option<String>,
    scroll_locked: bool,
    active_tab: Option<String>,
    active_hero: Option<String>,
    nav_expanded: bool,
    scroll_target: Option<String>,
    revealed: BTreeSet<String>,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given tab and hero variant active.
    pub fn with_defaults(tab: Option<&str>, hero: Option<&str>) -> Self {
        Self {
            active_tab: tab.map(str::to_string),
            active_hero: hero.map(str::to_string),
            ..Self::default()
        }
    }

    /// Apply one event.
    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::OpenModal(id) => {
                self.open_modal = Some(id);
                self.scroll_locked = true;
            }
            UiEvent::CloseModal | UiEvent::BackdropClick | UiEvent::Escape => {
                if self.open_modal.take().is_some() {
                    self.scroll_locked = false;
                }
            }
            UiEvent::SelectTab(id) => self.active_tab = Some(id),
            UiEvent::SelectHero(id) => self.active_hero = Some(id),
            UiEvent::ToggleNav => self.nav_expanded = !self.nav_expanded,
            UiEvent::NavLinkClicked => self.nav_expanded = false,
            UiEvent::AnchorClicked(hash) => {
                if let Some(id) = hash.strip_prefix('#').filter(|id| !id.is_empty()) {
                    self.scroll_target = Some(id.to_string());
                }
            }
            UiEvent::Intersect { id, ratio } => {
                if ratio >= REVEAL_THRESHOLD {
                    self.revealed.insert(id);
                }
            }
        }
    }

    pub fn open_modal(&self) -> Option<&str> {
        self.open_modal.as_deref()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.active_tab.as_deref()
    }

    pub fn is_tab_active(&self, id: &str) -> bool {
        self.active_tab.as_deref() == Some(id)
    }

    pub fn active_hero(&self) -> Option<&str> {
        self.active_hero.as_deref()
    }

    pub fn is_nav_expanded(&self) -> bool {
        self.nav_expanded
    }

    pub fn scroll_target(&self) -> Option<&str> {
        self.scroll_target.as_deref()
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_open_and_close_paths() {
        for close in [UiEvent::CloseModal, UiEvent::BackdropClick, UiEvent::Escape] {
            let mut page = PageState::new();
            page.apply(UiEvent::OpenModal("bedrift-modal".into()));
            assert_eq!(page.open_modal(), Some("bedrift-modal"));
            assert!(page.is_scroll_locked());

            page.apply(close);
            assert_eq!(page.open_modal(), None);
            assert!(!page.is_scroll_locked());
        }
    }

    #[test]
    fn test_escape_without_modal_is_noop() {
        let mut page = PageState::new();
        page.apply(UiEvent::Escape);
        assert_eq!(page, PageState::new());
    }

    #[test]
    fn test_switching_modals() {
        let mut page = PageState::new();
        page.apply(UiEvent::OpenModal("courier-modal".into()));
        page.apply(UiEvent::OpenModal("driver-modal".into()));
        assert_eq!(page.open_modal(), Some("driver-modal"));
    }

    #[test]
    fn test_single_active_tab() {
        let mut page = PageState::with_defaults(Some("bedrift"), None);
        assert!(page.is_tab_active("bedrift"));

        page.apply(UiEvent::SelectTab("sjafor".into()));
        assert!(page.is_tab_active("sjafor"));
        assert!(!page.is_tab_active("bedrift"));
    }

    #[test]
    fn test_hero_swap() {
        let mut page = PageState::with_defaults(None, Some("business"));
        page.apply(UiEvent::SelectHero("driver".into()));
        assert_eq!(page.active_hero(), Some("driver"));
    }

    #[test]
    fn test_hamburger() {
        let mut page = PageState::new();
        page.apply(UiEvent::ToggleNav);
        assert!(page.is_nav_expanded());
        page.apply(UiEvent::ToggleNav);
        assert!(!page.is_nav_expanded());

        page.apply(UiEvent::ToggleNav);
        page.apply(UiEvent::NavLinkClicked);
        assert!(!page.is_nav_expanded());
    }

    #[test]
    fn test_reveal_is_sticky() {
        let mut page = PageState::new();
        page.apply(UiEvent::Intersect { id: "features".into(), ratio: 0.05 });
        assert!(!page.is_revealed("features"));

        page.apply(UiEvent::Intersect { id: "features".into(), ratio: 0.1 });
        assert!(page.is_revealed("features"));

        page.apply(UiEvent::Intersect { id: "features".into(), ratio: 0.0 });
        assert!(page.is_revealed("features"));
    }

    #[test]
    fn test_anchor_scroll() {
        let mut page = PageState::new();
        page.apply(UiEvent::AnchorClicked("#kontakt".into()));
        assert_eq!(page.scroll_target(), Some("kontakt"));

        page.apply(UiEvent::AnchorClicked("#".into()));
        assert_eq!(page.scroll_target(), Some("kontakt"));
    }
}
