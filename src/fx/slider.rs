use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Interval;
use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, MouseEvent, ScrollBehavior, ScrollToOptions, Window};

use super::carousel::rebuild_dots;
use super::dom::{self, AnimationFrame, Listener, ListenerOptions};
use super::schedule::Slot;
use crate::config::FxConfig;

const TRACK: &str = ".client-carousel-track";
const SLIDES: &str = ".client-slide";
const DOTS: &str = ".clients-dots";
const PREV: &str = ".client-carousel .carousel-arrow.prev";
const NEXT: &str = ".client-carousel .carousel-arrow.next";

/// Autoplay and drag need something to move between.
pub const MIN_SLIDES_FOR_MOTION: usize = 2;

/// Index of the center nearest to `track_center`. The first minimal distance
/// wins, so ties go to the earlier slide.
pub fn nearest_index(centers: &[f64], track_center: f64) -> Option<usize> {
    let mut closest = None;
    let mut closest_distance = f64::INFINITY;
    for (index, center) in centers.iter().enumerate() {
        let distance = (track_center - center).abs();
        if distance < closest_distance {
            closest_distance = distance;
            closest = Some(index);
        }
    }
    closest
}

/// Leading number of a CSS length such as `"24px"` or `"12px 16px"`.
/// Anything unparsable (`"normal"`, empty) counts as no gap.
pub fn parse_gap(raw: &str) -> f64 {
    let raw = raw.trim_start();
    let end = raw
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(raw.len());
    raw[..end].parse::<f64>().ok().filter(|gap| gap.is_finite()).unwrap_or(0.0)
}

pub fn step(slide_width: f64, gap: f64) -> f64 {
    slide_width + gap
}

/// Pointer-drag session over the track.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragSession {
    dragging: bool,
    start_x: f64,
    start_scroll: f64,
}

impl DragSession {
    pub fn begin(&mut self, pointer_x: f64, scroll_left: f64) {
        *self = Self {
            dragging: true,
            start_x: pointer_x,
            start_scroll: scroll_left,
        };
    }

    /// Absolute scroll offset for the pointer position, or `None` when idle.
    pub fn move_to(&self, pointer_x: f64) -> Option<f64> {
        self.dragging
            .then(|| self.start_scroll - (pointer_x - self.start_x))
    }

    /// Returns whether a drag was in progress.
    pub fn end(&mut self) -> bool {
        std::mem::replace(&mut self.dragging, false)
    }

    #[cfg(test)]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

/// Autoplay policy for a slider of `slides` items. Whether it is running is
/// the timer slot's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Autoplay {
    slides: usize,
}

impl Autoplay {
    pub fn new(slides: usize) -> Self {
        Self { slides }
    }

    pub fn enabled(&self) -> bool {
        self.slides >= MIN_SLIDES_FOR_MOTION
    }

    /// Horizontal distance one timer tick scrolls, or `None` when there is
    /// nothing to move between.
    pub fn offset(&self, slide_width: f64, gap: f64) -> Option<f64> {
        self.enabled().then(|| step(slide_width, gap))
    }
}

struct SliderInner {
    window: Window,
    track: Element,
    slides: Vec<Element>,
    dots: Option<Element>,
    drag: DragSession,
    autoplay: Autoplay,
    interval_ms: u32,
    timer: Slot<Interval>,
    scroll_frame: Slot<AnimationFrame>,
}

impl SliderInner {
    /// First slide width and the track's gap.
    fn measure(&self) -> Option<(f64, f64)> {
        let first = self.slides.first()?;
        let width = first.get_bounding_client_rect().width();
        let gap = self
            .window
            .get_computed_style(&self.track)
            .ok()
            .flatten()
            .map(|style| {
                let column = style.get_property_value("column-gap").unwrap_or_default();
                if column.is_empty() {
                    style.get_property_value("gap").unwrap_or_default()
                } else {
                    column
                }
            })
            .map(|raw| parse_gap(&raw))
            .unwrap_or(0.0);
        Some((width, gap))
    }

    fn scroll_left_by(&self, dx: f64) {
        let options = ScrollToOptions::new();
        options.set_left(dx);
        options.set_behavior(ScrollBehavior::Smooth);
        self.track.scroll_by_with_scroll_to_options(&options);
    }

    fn scroll_by(&self, direction: i32) {
        if let Some((width, gap)) = self.measure() {
            self.scroll_left_by(f64::from(direction) * step(width, gap));
        }
    }

    fn sync_dots(&self) {
        let Some(dots) = &self.dots else {
            return;
        };
        let centers: Vec<f64> = self
            .slides
            .iter()
            .filter_map(|slide| slide.dyn_ref::<HtmlElement>())
            .map(|slide| f64::from(slide.offset_left()) + f64::from(slide.offset_width()) / 2.0)
            .collect();
        let track_center = f64::from(self.track.scroll_left()) + f64::from(self.track.client_width()) / 2.0;
        let active = nearest_index(&centers, track_center).unwrap_or(0);
        render_dots(dots, active);
    }

    fn end_drag(&mut self) {
        if self.drag.end() {
            dom::remove_class(&self.track, "is-dragging");
        }
    }
}

fn render_dots(dots: &Element, active: usize) {
    for (index, dot) in dom::children(dots).iter().enumerate() {
        dom::toggle_class(dot, "is-active", index == active);
    }
}

fn start_autoplay(inner: &Rc<RefCell<SliderInner>>) {
    let mut this = inner.borrow_mut();
    if !this.autoplay.enabled() {
        this.timer.cancel();
        return;
    }
    let weak = Rc::downgrade(inner);
    let interval = Interval::new(this.interval_ms, move || {
        if let Some(inner) = weak.upgrade() {
            let this = inner.borrow();
            let offset = this.measure().and_then(|(width, gap)| this.autoplay.offset(width, gap));
            if let Some(dx) = offset {
                this.scroll_left_by(dx);
            }
        }
    });
    this.timer.replace(interval);
}

fn pause_autoplay(inner: &Rc<RefCell<SliderInner>>) {
    inner.borrow_mut().timer.cancel();
}

fn with_inner<F>(weak: &Weak<RefCell<SliderInner>>, f: F)
where
    F: FnOnce(&Rc<RefCell<SliderInner>>),
{
    if let Some(inner) = weak.upgrade() {
        f(&inner);
    }
}

/// Client logo track: autoplay, arrows, drag-to-scroll and dot sync.
pub struct ClientSlider {
    inner: Rc<RefCell<SliderInner>>,
    _listeners: Vec<Listener>,
}

impl ClientSlider {
    pub fn attach(window: &Window, document: &Document, config: &FxConfig) -> Result<Option<Self>, JsValue> {
        let Some(track) = dom::query(document, TRACK) else {
            return Ok(None);
        };
        let slides = dom::query_within(&track, SLIDES);
        let dots = dom::query(document, DOTS);

        if let Some(dots) = &dots {
            rebuild_dots(document, dots, slides.len())?;
            render_dots(dots, 0);
        }

        let inner = Rc::new(RefCell::new(SliderInner {
            window: window.clone(),
            track: track.clone(),
            autoplay: Autoplay::new(slides.len()),
            slides,
            dots,
            drag: DragSession::default(),
            interval_ms: config.autoplay_interval_ms,
            timer: Slot::new(),
            scroll_frame: Slot::new(),
        }));
        let weak = Rc::downgrade(&inner);
        let mut listeners = Vec::new();

        for (selector, direction) in [(PREV, -1), (NEXT, 1)] {
            if let Some(arrow) = dom::query(document, selector) {
                let weak = weak.clone();
                listeners.push(Listener::new(&arrow, "click", move |_| {
                    with_inner(&weak, |inner| inner.borrow().scroll_by(direction));
                })?);
            }
        }

        listeners.push(Listener::with_options(&track, "scroll", ListenerOptions::PASSIVE, {
            let weak = weak.clone();
            move |_| {
                with_inner(&weak, |inner| {
                    let frame = AnimationFrame::request({
                        let weak = Rc::downgrade(inner);
                        move || with_inner(&weak, |inner| inner.borrow().sync_dots())
                    });
                    inner.borrow_mut().scroll_frame.replace_with(frame);
                });
            }
        })?);

        let motion = inner.borrow().autoplay.enabled();
        if !motion {
            debug!("Client slider has fewer than {} slides, autoplay and drag off", MIN_SLIDES_FOR_MOTION);
            return Ok(Some(Self {
                inner,
                _listeners: listeners,
            }));
        }

        listeners.push(Listener::new(&track, "mousedown", {
            let weak = weak.clone();
            move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                with_inner(&weak, |inner| {
                    let mut this = inner.borrow_mut();
                    let scroll_left = f64::from(this.track.scroll_left());
                    this.drag.begin(f64::from(event.page_x()), scroll_left);
                    dom::add_class(&this.track, "is-dragging");
                });
            }
        })?);

        listeners.push(Listener::new(window, "mousemove", {
            let weak = weak.clone();
            move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                with_inner(&weak, |inner| {
                    let this = inner.borrow();
                    if let Some(left) = this.drag.move_to(f64::from(event.page_x())) {
                        this.track.set_scroll_left(left.round() as i32);
                    }
                });
            }
        })?);

        listeners.push(Listener::new(window, "mouseup", {
            let weak = weak.clone();
            move |_| with_inner(&weak, |inner| inner.borrow_mut().end_drag())
        })?);

        listeners.push(Listener::new(&track, "mouseleave", {
            let weak = weak.clone();
            move |_| {
                with_inner(&weak, |inner| {
                    inner.borrow_mut().end_drag();
                    start_autoplay(inner);
                });
            }
        })?);

        listeners.push(Listener::new(&track, "mouseenter", {
            let weak = weak.clone();
            move |_| with_inner(&weak, pause_autoplay)
        })?);
        listeners.push(Listener::with_options(&track, "touchstart", ListenerOptions::PASSIVE, {
            let weak = weak.clone();
            move |_| with_inner(&weak, pause_autoplay)
        })?);
        listeners.push(Listener::new(&track, "touchend", {
            let weak = weak.clone();
            move |_| with_inner(&weak, start_autoplay)
        })?);

        start_autoplay(&inner);

        Ok(Some(Self {
            inner,
            _listeners: listeners,
        }))
    }
}

impl Drop for ClientSlider {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.timer.cancel();
            inner.scroll_frame.cancel();
            inner.end_drag();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_center_picks_closest_slide() {
        assert_eq!(nearest_index(&[50.0, 150.0, 250.0], 140.0), Some(1));
    }

    #[test]
    fn nearest_center_tie_goes_to_earlier_slide() {
        assert_eq!(nearest_index(&[50.0, 150.0, 250.0], 100.0), Some(0));
        assert_eq!(nearest_index(&[50.0, 150.0, 250.0], 200.0), Some(1));
    }

    #[test]
    fn nearest_center_of_nothing_is_none() {
        assert_eq!(nearest_index(&[], 10.0), None);
    }

    #[test]
    fn gap_parsing() {
        assert_eq!(parse_gap("24px"), 24.0);
        assert_eq!(parse_gap("12.5px 16px"), 12.5);
        assert_eq!(parse_gap(" 8px"), 8.0);
        assert_eq!(parse_gap("normal"), 0.0);
        assert_eq!(parse_gap(""), 0.0);
    }

    #[test]
    fn step_is_width_plus_gap() {
        assert_eq!(step(280.0, parse_gap("24px")), 304.0);
    }

    #[test]
    fn drag_tracks_pointer_delta_from_start() {
        let mut drag = DragSession::default();
        assert_eq!(drag.move_to(100.0), None);

        drag.begin(200.0, 500.0);
        assert_eq!(drag.move_to(150.0), Some(550.0));
        assert_eq!(drag.move_to(260.0), Some(440.0));

        assert!(drag.end());
        assert!(!drag.end());
        assert_eq!(drag.move_to(0.0), None);
    }

    #[test]
    fn drag_start_resets_previous_session() {
        let mut drag = DragSession::default();
        drag.begin(10.0, 0.0);
        drag.end();
        drag.begin(400.0, 120.0);
        assert!(drag.is_dragging());
        assert_eq!(drag.move_to(400.0), Some(120.0));
    }

    #[test]
    fn autoplay_tick_scrolls_one_slide_step() {
        let autoplay = Autoplay::new(3);
        assert_eq!(autoplay.offset(280.0, parse_gap("24px")), Some(304.0));

        let travelled: f64 = (0..4).filter_map(|_| autoplay.offset(280.0, 24.0)).sum();
        assert_eq!(travelled, 1216.0);
    }

    #[test]
    fn autoplay_never_runs_with_fewer_than_two_slides() {
        for slides in 0..MIN_SLIDES_FOR_MOTION {
            let autoplay = Autoplay::new(slides);
            assert!(!autoplay.enabled());
            assert_eq!(autoplay.offset(280.0, 24.0), None);
        }
    }
}
