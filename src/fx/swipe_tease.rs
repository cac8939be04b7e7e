use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

use super::dom::{self, AnimationFrame, Listener, ListenerOptions, Observer};
use super::schedule::Slot;
use crate::config::FxConfig;

const TARGETS: &str = ".package-grid, .client-carousel-track";
const REDUCED_MOTION: &str = "(prefers-reduced-motion: reduce)";
const TEASE: &str = "is-swipe-tease";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Still,
}

/// Follows the vertical scroll direction and decides when a change of
/// direction should replay the tease.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionTracker {
    last_y: f64,
    last_direction: Direction,
    last_tease_ms: f64,
    cooldown_ms: f64,
}

impl DirectionTracker {
    pub fn new(start_y: f64, cooldown_ms: f64) -> Self {
        Self {
            last_y: start_y,
            last_direction: Direction::Still,
            last_tease_ms: 0.0,
            cooldown_ms,
        }
    }

    /// Feeds one frame's scroll position. Returns `true` when the tease should play.
    pub fn sample(&mut self, y: f64, now_ms: f64) -> bool {
        let direction = if y > self.last_y {
            Direction::Down
        } else if y < self.last_y {
            Direction::Up
        } else {
            Direction::Still
        };
        self.last_y = y;

        if direction == Direction::Still || direction == self.last_direction {
            return false;
        }
        self.last_direction = direction;
        if now_ms - self.last_tease_ms > self.cooldown_ms {
            self.last_tease_ms = now_ms;
            return true;
        }
        false
    }

    #[cfg(test)]
    pub fn direction(&self) -> Direction {
        self.last_direction
    }
}

/// How far the tease gets wired in the current environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Reduced motion requested: targets are stamped, nothing moves.
    Inert,
    /// No observer support: targets are shown as in view, no replays.
    Static,
    Observed,
}

impl Activation {
    pub fn for_env(reduced_motion: bool, supported: bool) -> Self {
        if reduced_motion {
            Activation::Inert
        } else if supported {
            Activation::Observed
        } else {
            Activation::Static
        }
    }
}

struct TeaseInner {
    window: Window,
    targets: Vec<Element>,
    in_view: Vec<bool>,
    tracker: DirectionTracker,
    frame: Slot<AnimationFrame>,
    endings: Vec<Slot<Listener>>,
}

impl TeaseInner {
    /// Restarts the CSS animation on one target.
    fn play(&mut self, index: usize) {
        let Some(target) = self.targets.get(index).cloned() else {
            return;
        };
        dom::remove_class(&target, TEASE);
        if let Some(html) = target.dyn_ref::<HtmlElement>() {
            // Reading layout commits the removal so the re-add restarts the animation.
            let _ = html.offset_width();
        }
        dom::add_class(&target, TEASE);

        let ending = Listener::with_options(&target, "animationend", ListenerOptions::ONCE, {
            let target = target.clone();
            move |_| dom::remove_class(&target, TEASE)
        })
        .ok();
        if let Some(slot) = self.endings.get_mut(index) {
            slot.replace_with(ending);
        }
    }

    fn play_in_view(&mut self) {
        let visible: Vec<usize> = (0..self.targets.len()).filter(|&i| self.in_view[i]).collect();
        visible.into_iter().for_each(|index| self.play(index));
    }

    fn on_frame(&mut self) {
        let Ok(y) = self.window.scroll_y() else {
            return;
        };
        let now = Utc::now().timestamp_millis() as f64;
        if self.tracker.sample(y, now) {
            self.play_in_view();
        }
    }
}

/// Nudges horizontally scrollable strips when the reader changes scroll direction.
pub struct SwipeTease {
    inner: Rc<RefCell<TeaseInner>>,
    _observer: Option<Observer>,
    _scroll: Option<Listener>,
}

impl SwipeTease {
    fn unobserved(inner: Rc<RefCell<TeaseInner>>) -> Self {
        Self {
            inner,
            _observer: None,
            _scroll: None,
        }
    }

    pub fn attach(window: &Window, document: &Document, config: &FxConfig, supported: bool) -> Result<Option<Self>, JsValue> {
        let targets = dom::query_all(document, TARGETS);
        if targets.is_empty() {
            return Ok(None);
        }
        for target in &targets {
            let _ = target.set_attribute("data-animate", "swipe");
        }

        let activation = Activation::for_env(dom::media_matches(window, REDUCED_MOTION), supported);
        let inner = Rc::new(RefCell::new(TeaseInner {
            window: window.clone(),
            in_view: vec![false; targets.len()],
            endings: targets.iter().map(|_| Slot::new()).collect(),
            targets: targets.clone(),
            tracker: DirectionTracker::new(window.scroll_y().unwrap_or(0.0), f64::from(config.swipe_tease_cooldown_ms)),
            frame: Slot::new(),
        }));

        match activation {
            Activation::Inert => {
                debug!("Reduced motion requested, swipe tease off");
                return Ok(Some(Self::unobserved(inner)));
            }
            Activation::Static => {
                targets.iter().for_each(|target| dom::add_class(target, "is-inview"));
                return Ok(Some(Self::unobserved(inner)));
            }
            Activation::Observed => {}
        }

        let weak = Rc::downgrade(&inner);
        let observer = Observer::new(config.thresholds.swipe_tease, None, {
            let weak = weak.clone();
            let targets = targets.clone();
            move |entry, _| {
                let target = entry.target();
                let (Some(index), Some(inner)) = (dom::index_of(&targets, &target), weak.upgrade()) else {
                    return;
                };
                let mut this = inner.borrow_mut();
                let visible = entry.is_intersecting();
                this.in_view[index] = visible;
                dom::toggle_class(&target, "is-inview", visible);
                if visible {
                    this.play(index);
                }
            }
        })?;
        observer.observe_all(&targets);

        let scroll = Listener::with_options(window, "scroll", ListenerOptions::PASSIVE, move |_| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let frame = AnimationFrame::request({
                let weak = Rc::downgrade(&inner);
                move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.borrow_mut().on_frame();
                    }
                }
            });
            inner.borrow_mut().frame.replace_with(frame);
        })?;

        Ok(Some(Self {
            inner,
            _observer: Some(observer),
            _scroll: Some(scroll),
        }))
    }
}

impl Drop for SwipeTease {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.frame.cancel();
            inner.endings.iter_mut().for_each(Slot::cancel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduced_motion_wins_over_observer_support() {
        assert_eq!(Activation::for_env(true, true), Activation::Inert);
        assert_eq!(Activation::for_env(true, false), Activation::Inert);
        assert_eq!(Activation::for_env(false, false), Activation::Static);
        assert_eq!(Activation::for_env(false, true), Activation::Observed);
    }

    #[test]
    fn first_direction_change_teases() {
        let mut tracker = DirectionTracker::new(0.0, 1_200.0);
        assert!(tracker.sample(40.0, 10_000.0));
        assert_eq!(tracker.direction(), Direction::Down);
    }

    #[test]
    fn same_direction_does_not_repeat() {
        let mut tracker = DirectionTracker::new(0.0, 1_200.0);
        assert!(tracker.sample(40.0, 10_000.0));
        assert!(!tracker.sample(80.0, 20_000.0));
        assert!(!tracker.sample(80.0, 30_000.0));
    }

    #[test]
    fn change_inside_cooldown_is_remembered_but_silent() {
        let mut tracker = DirectionTracker::new(100.0, 1_200.0);
        assert!(tracker.sample(150.0, 10_000.0));

        // Up within the cooldown: no tease, but the direction is recorded.
        assert!(!tracker.sample(120.0, 10_500.0));
        assert_eq!(tracker.direction(), Direction::Up);

        // Still going up after the cooldown is not a change.
        assert!(!tracker.sample(90.0, 12_000.0));

        // Turning down again after the cooldown teases.
        assert!(tracker.sample(130.0, 12_100.0));
    }

    #[test]
    fn cooldown_is_strict() {
        let mut tracker = DirectionTracker::new(0.0, 1_200.0);
        assert!(tracker.sample(10.0, 5_000.0));
        assert!(!tracker.sample(5.0, 6_200.0));
        assert!(tracker.sample(10.0, 6_201.0));
    }

    #[test]
    fn still_frames_are_ignored() {
        let mut tracker = DirectionTracker::new(50.0, 1_200.0);
        assert!(!tracker.sample(50.0, 10_000.0));
        assert_eq!(tracker.direction(), Direction::Still);
    }
}
