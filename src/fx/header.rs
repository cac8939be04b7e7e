use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, Window};

use super::dom::{self, Listener, ListenerOptions};
use super::schedule::Slot;
use crate::config::FxConfig;

const HEADER: &str = ".site-header";
const LINKS: &str = ".site-header .header-link";

/// Trailing debounce for the header's scrolling marker. Every scroll hands out
/// a ticket; only the idle timer holding the latest ticket may clear the marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderState {
    scrolling: bool,
    generation: u64,
}

impl HeaderState {
    pub fn on_scroll(&mut self) -> u64 {
        self.scrolling = true;
        self.generation += 1;
        self.generation
    }

    /// Returns `true` when this ticket ends the scroll burst.
    pub fn on_idle(&mut self, ticket: u64) -> bool {
        if self.scrolling && ticket == self.generation {
            self.scrolling = false;
            true
        } else {
            false
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }
}

struct HeaderInner {
    header: Element,
    links: Vec<Element>,
    state: HeaderState,
    idle: Slot<Timeout>,
}

impl HeaderInner {
    fn clear_links(&self) {
        self.links.iter().for_each(|link| dom::remove_class(link, "is-active"));
    }
}

/// `is-scrolling` on the site header while the page scrolls.
pub struct HeaderScroll {
    inner: Rc<RefCell<HeaderInner>>,
    _scroll: Listener,
}

impl HeaderScroll {
    pub fn attach(window: &Window, document: &Document, config: &FxConfig) -> Result<Option<Self>, JsValue> {
        let Some(header) = dom::query(document, HEADER) else {
            return Ok(None);
        };
        let links = dom::query_all(document, LINKS);
        let inner = Rc::new(RefCell::new(HeaderInner {
            header,
            links,
            state: HeaderState::default(),
            idle: Slot::new(),
        }));
        let weak = Rc::downgrade(&inner);
        let idle_ms = config.header_idle_ms;

        let scroll = Listener::with_options(window, "scroll", ListenerOptions::PASSIVE, move |_| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut this = inner.borrow_mut();
            this.clear_links();
            let ticket = this.state.on_scroll();
            dom::add_class(&this.header, "is-scrolling");

            let weak = Rc::downgrade(&inner);
            this.idle.replace(Timeout::new(idle_ms, move || {
                if let Some(inner) = weak.upgrade() {
                    let mut this = inner.borrow_mut();
                    if this.state.on_idle(ticket) {
                        dom::remove_class(&this.header, "is-scrolling");
                    }
                }
            }));
        })?;

        Ok(Some(Self {
            inner,
            _scroll: scroll,
        }))
    }
}

impl Drop for HeaderScroll {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.idle.cancel();
            if inner.state.is_scrolling() {
                dom::remove_class(&inner.header, "is-scrolling");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_cleared_once_after_burst() {
        let mut state = HeaderState::default();
        let tickets: Vec<u64> = (0..5).map(|_| state.on_scroll()).collect();
        assert!(state.is_scrolling());

        // Timers armed mid-burst were superseded.
        for ticket in &tickets[..4] {
            assert!(!state.on_idle(*ticket));
            assert!(state.is_scrolling());
        }

        assert!(state.on_idle(tickets[4]));
        assert!(!state.is_scrolling());
        assert!(!state.on_idle(tickets[4]));
    }

    #[test]
    fn new_burst_after_idle_starts_over() {
        let mut state = HeaderState::default();
        let first = state.on_scroll();
        assert!(state.on_idle(first));

        let second = state.on_scroll();
        assert!(!state.on_idle(first));
        assert!(state.on_idle(second));
    }

    #[test]
    fn idle_without_scroll_is_noop() {
        let mut state = HeaderState::default();
        assert!(!state.on_idle(0));
        assert!(!state.is_scrolling());
    }
}
