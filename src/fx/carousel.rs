use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, MediaQueryListEvent, ScrollBehavior, ScrollToOptions};

use super::dom::{self, AnimationFrame, Listener, Observer};
use super::schedule::Slot;
use crate::config::FxConfig;

const GRID: &str = ".packages .package-grid";
const CARDS: &str = ".packages .card";
const DOTS: &str = ".packages .carousel-dots";
const POPULAR: &str = "card-popular";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Grid,
    Carousel { active: usize },
}

/// View state of the package cards. Rendering reads nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselState {
    len: usize,
    mode: Mode,
}

impl CarouselState {
    pub fn new(len: usize) -> Self {
        Self { len, mode: Mode::Grid }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switches to carousel mode with the popular card active, or the first
    /// one when no card is marked popular. `wire` runs before the mode
    /// changes; if it fails the state stays in grid mode. An empty set stays
    /// in grid mode without wiring anything.
    pub fn try_enter_carousel<T, E, F>(&mut self, popular: Option<usize>, wire: F) -> Result<Option<(usize, T)>, E>
    where
        F: FnOnce(usize) -> Result<T, E>,
    {
        self.mode = Mode::Grid;
        if self.len == 0 {
            return Ok(None);
        }
        let active = popular.filter(|&i| i < self.len).unwrap_or(0);
        let wired = wire(active)?;
        self.mode = Mode::Carousel { active };
        Ok(Some((active, wired)))
    }

    pub fn enter_grid(&mut self) {
        self.mode = Mode::Grid;
    }

    /// The single mutator shared by click and intersection activation.
    /// Returns whether the active card changed.
    pub fn set_active(&mut self, index: usize) -> bool {
        match self.mode {
            Mode::Carousel { active } if index < self.len => {
                self.mode = Mode::Carousel { active: index };
                active != index
            }
            _ => false,
        }
    }

    pub fn active(&self) -> Option<usize> {
        match self.mode {
            Mode::Carousel { active } => Some(active),
            Mode::Grid => None,
        }
    }

    pub fn dot_count(&self) -> usize {
        match self.mode {
            Mode::Carousel { .. } => self.len,
            Mode::Grid => 0,
        }
    }

    /// Active flag per card, in document order.
    pub fn markers(&self) -> Vec<bool> {
        let active = self.active();
        (0..self.len).map(|i| Some(i) == active).collect()
    }
}

/// Horizontal scroll offset that centers an item inside its container.
pub fn center_offset(item_left: f64, item_width: f64, container_width: f64) -> f64 {
    item_left - (container_width - item_width) / 2.0
}

/// Writes `is-active` on cards and dots from the state. Nothing else touches
/// those markers.
fn render(state: &CarouselState, cards: &[Element], dots: Option<&Element>) {
    let markers = state.markers();
    for (card, on) in cards.iter().zip(&markers) {
        dom::toggle_class(card, "is-active", *on);
    }
    if let Some(dots) = dots {
        for (dot, on) in dom::children(dots).iter().zip(&markers) {
            dom::toggle_class(dot, "is-active", *on);
        }
    }
}

/// Replaces the dot strip with `count` fresh dots.
pub fn rebuild_dots(document: &Document, container: &Element, count: usize) -> Result<(), JsValue> {
    container.set_inner_html("");
    for _ in 0..count {
        let dot = document.create_element("span")?;
        dot.set_class_name("carousel-dot");
        container.append_child(&dot)?;
    }
    Ok(())
}

fn scroll_to_center(grid: &Element, card: &Element, behavior: ScrollBehavior) {
    let Some(card) = card.dyn_ref::<HtmlElement>() else {
        return;
    };
    let options = ScrollToOptions::new();
    options.set_left(center_offset(
        f64::from(card.offset_left()),
        f64::from(card.offset_width()),
        f64::from(grid.client_width()),
    ));
    options.set_behavior(behavior);
    grid.scroll_to_with_scroll_to_options(&options);
}

struct CarouselInner {
    document: Document,
    state: CarouselState,
    grid: Element,
    cards: Vec<Element>,
    dots: Option<Element>,
    popular: Option<usize>,
    threshold: f64,
    supported: bool,
    observer: Option<Observer>,
    clicks: Vec<Listener>,
    frame: Slot<AnimationFrame>,
}

impl CarouselInner {
    fn render(&self) {
        render(&self.state, &self.cards, self.dots.as_ref());
    }

    fn activate(&mut self, index: usize) {
        self.state.set_active(index);
        self.render();
    }

    fn center(&mut self, index: usize, behavior: ScrollBehavior, reset_page: bool) {
        let Some(card) = self.cards.get(index).cloned() else {
            return;
        };
        let grid = self.grid.clone();
        self.frame.replace_with(AnimationFrame::request(move || {
            if reset_page && grid.get_bounding_client_rect().top() < 0.0 {
                if let Some(window) = web_sys::window() {
                    let options = ScrollToOptions::new();
                    options.set_top(0.0);
                    options.set_behavior(ScrollBehavior::Auto);
                    window.scroll_to_with_scroll_to_options(&options);
                }
            }
            scroll_to_center(&grid, &card, behavior);
        }));
    }

    /// Dots, markers and centering for a freshly entered carousel.
    fn show(&mut self, active: usize) -> Result<(), JsValue> {
        if let Some(dots) = &self.dots {
            rebuild_dots(&self.document, dots, self.state.dot_count())?;
        }
        self.render();
        self.center(active, ScrollBehavior::Auto, true);
        debug!("Package cards in carousel mode, card {} active", active);
        Ok(())
    }

    /// Tears down everything bound to the current mode.
    fn reset(&mut self) -> Result<(), JsValue> {
        self.observer = None;
        self.clicks.clear();
        self.frame.cancel();
        self.state.enter_grid();
        if let Some(dots) = &self.dots {
            rebuild_dots(&self.document, dots, 0)?;
        }
        self.render();
        Ok(())
    }
}

/// Observer and click bindings for carousel mode. Nothing visible changes
/// here, so a failure leaves the cards exactly as grid mode left them.
fn wire_carousel(
    inner: &Rc<RefCell<CarouselInner>>,
    grid: &Element,
    cards: &[Element],
    threshold: f64,
    supported: bool,
) -> Result<(Option<Observer>, Vec<Listener>), JsValue> {
    let weak = Rc::downgrade(inner);

    let observer = if supported {
        let observer = Observer::new(threshold, Some(grid), {
            let weak = weak.clone();
            let cards = cards.to_vec();
            move |entry, _| {
                if !entry.is_intersecting() {
                    return;
                }
                let Some(index) = dom::index_of(&cards, &entry.target()) else {
                    return;
                };
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().activate(index);
                }
            }
        })?;
        observer.observe_all(cards);
        Some(observer)
    } else {
        None
    };

    let mut clicks = Vec::with_capacity(cards.len());
    for (index, card) in cards.iter().enumerate() {
        let weak: Weak<RefCell<CarouselInner>> = weak.clone();
        clicks.push(Listener::new(card, "click", move |_| {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.borrow_mut();
                inner.activate(index);
                inner.center(index, ScrollBehavior::Smooth, false);
            }
        })?);
    }

    Ok((observer, clicks))
}

fn apply_mode(inner: &Rc<RefCell<CarouselInner>>, is_mobile: bool, supported: bool) -> Result<(), JsValue> {
    let mut guard = inner.borrow_mut();
    let this = &mut *guard;
    this.reset()?;
    if !is_mobile {
        debug!("Package cards in grid mode");
        return Ok(());
    }

    let entered = this.state.try_enter_carousel(this.popular, |_| {
        wire_carousel(inner, &this.grid, &this.cards, this.threshold, supported)
    });
    let shown = match entered {
        Ok(Some((active, (observer, clicks)))) => {
            this.observer = observer;
            this.clicks = clicks;
            this.show(active)
        }
        Ok(None) => Ok(()),
        Err(e) => Err(e),
    };

    if let Err(e) = shown {
        this.reset()?;
        return Err(e);
    }
    Ok(())
}

/// Package grid that becomes a single-card carousel below the breakpoint.
pub struct PackageCarousel {
    inner: Rc<RefCell<CarouselInner>>,
    _media: Option<Listener>,
}

impl PackageCarousel {
    /// Without observer support the carousel still follows clicks; only
    /// scroll-driven activation is lost.
    pub fn attach(
        window: &web_sys::Window,
        document: &Document,
        config: &FxConfig,
        supported: bool,
    ) -> Result<Option<Self>, JsValue> {
        let Some(grid) = dom::query(document, GRID) else {
            return Ok(None);
        };
        let cards = dom::query_all(document, CARDS);
        let popular = cards.iter().position(|card| card.class_list().contains(POPULAR));

        let inner = Rc::new(RefCell::new(CarouselInner {
            document: document.clone(),
            state: CarouselState::new(cards.len()),
            grid,
            cards,
            dots: dom::query(document, DOTS),
            popular,
            threshold: config.thresholds.carousel,
            supported,
            observer: None,
            clicks: Vec::new(),
            frame: Slot::new(),
        }));

        let media = window.match_media(&config.carousel_query())?;
        let is_mobile = media.as_ref().map(|list| list.matches()).unwrap_or(false);
        // A failed entry has already fallen back to grid mode; keep listening
        // so a later breakpoint change can try again.
        if let Err(e) = apply_mode(&inner, is_mobile, supported) {
            debug!("Package carousel left in grid mode: {:?}", e);
        }

        let media = match media {
            Some(list) => {
                let weak = Rc::downgrade(&inner);
                Some(Listener::new(&list, "change", move |event| {
                    let Some(event) = event.dyn_ref::<MediaQueryListEvent>() else {
                        return;
                    };
                    if let Some(inner) = weak.upgrade() {
                        let supported = inner.borrow().supported;
                        if let Err(e) = apply_mode(&inner, event.matches(), supported) {
                            debug!("Package carousel mode switch failed: {:?}", e);
                        }
                    }
                })?)
            }
            None => None,
        };

        Ok(Some(Self { inner, _media: media }))
    }

    pub fn mode(&self) -> Mode {
        self.inner.borrow().state.mode()
    }
}

impl Drop for PackageCarousel {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            let _ = inner.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enter(state: &mut CarouselState, popular: Option<usize>) -> Option<usize> {
        state
            .try_enter_carousel(popular, |_| Ok::<_, ()>(()))
            .unwrap()
            .map(|(active, _)| active)
    }

    fn active_count(state: &CarouselState) -> usize {
        state.markers().iter().filter(|on| **on).count()
    }

    #[test]
    fn grid_mode_has_no_active_card_or_dots() {
        let state = CarouselState::new(3);
        assert_eq!(state.mode(), Mode::Grid);
        assert_eq!(state.active(), None);
        assert_eq!(state.dot_count(), 0);
        assert_eq!(active_count(&state), 0);
    }

    #[test]
    fn carousel_starts_on_popular_card() {
        let mut state = CarouselState::new(3);
        assert_eq!(enter(&mut state, Some(1)), Some(1));
        assert_eq!(state.markers(), vec![false, true, false]);
        assert_eq!(state.dot_count(), 3);
    }

    #[test]
    fn carousel_falls_back_to_first_card() {
        let mut state = CarouselState::new(3);
        assert_eq!(enter(&mut state, None), Some(0));
        assert_eq!(state.markers(), vec![true, false, false]);

        let mut state = CarouselState::new(3);
        assert_eq!(enter(&mut state, Some(9)), Some(0));
    }

    #[test]
    fn empty_card_set_stays_in_grid_mode() {
        let mut state = CarouselState::new(0);
        assert_eq!(enter(&mut state, None), None);
        assert_eq!(state.mode(), Mode::Grid);
        assert_eq!(state.dot_count(), 0);
    }

    #[test]
    fn set_active_keeps_exactly_one_card_active() {
        let mut state = CarouselState::new(4);
        enter(&mut state, Some(2));

        assert!(state.set_active(0));
        assert!(!state.set_active(0));
        assert!(!state.set_active(7));
        assert_eq!(state.active(), Some(0));
        assert_eq!(active_count(&state), 1);
        assert_eq!(state.dot_count(), 4);
    }

    #[test]
    fn set_active_is_ignored_in_grid_mode() {
        let mut state = CarouselState::new(3);
        assert!(!state.set_active(1));
        assert_eq!(state.active(), None);
    }

    #[test]
    fn click_and_intersection_converge() {
        let mut state = CarouselState::new(3);
        enter(&mut state, None);

        // Click on card 2, then the observer reports the same card settling in view.
        state.set_active(2);
        state.set_active(2);
        assert_eq!(state.active(), Some(2));
        assert_eq!(active_count(&state), 1);
    }

    #[test]
    fn mode_round_trip_rebuilds_identical_state() {
        let mut state = CarouselState::new(3);
        enter(&mut state, Some(1));
        let first = state.clone();

        state.set_active(2);
        state.enter_grid();
        assert_eq!(state.dot_count(), 0);
        assert_eq!(active_count(&state), 0);

        enter(&mut state, Some(1));
        assert_eq!(state, first);
    }

    #[test]
    fn failed_wiring_leaves_grid_mode() {
        let mut state = CarouselState::new(3);
        let entered = state.try_enter_carousel(Some(1), |_| Err::<(), _>("observer rejected"));

        assert_eq!(entered, Err("observer rejected"));
        assert_eq!(state.mode(), Mode::Grid);
        assert_eq!(state.dot_count(), 0);
        assert_eq!(active_count(&state), 0);
    }

    #[test]
    fn failed_reentry_drops_previous_carousel() {
        let mut state = CarouselState::new(3);
        enter(&mut state, Some(2));

        assert!(state.try_enter_carousel(None, |_| Err::<(), _>(())).is_err());
        assert_eq!(state.active(), None);
        assert_eq!(state.dot_count(), 0);
    }

    #[test]
    fn wiring_sees_the_card_that_will_be_active() {
        let mut state = CarouselState::new(3);
        let entered = state.try_enter_carousel(Some(2), |active| Ok::<_, ()>(active * 10));
        assert_eq!(entered, Ok(Some((2, 20))));
        assert_eq!(state.active(), Some(2));
    }

    #[test]
    fn center_offset_centers_item() {
        assert_eq!(center_offset(400.0, 200.0, 300.0), 350.0);
        assert_eq!(center_offset(0.0, 300.0, 300.0), 0.0);
    }
}
