//! Thin RAII wrappers over the DOM registrations the effects make.
//!
//! Every listener, observer and frame request is owned by a guard that
//! releases it on drop, so a feature is torn down by dropping its state.

use js_sys::{Array, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Node, Window,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ListenerOptions {
    pub passive: bool,
    pub once: bool,
}

impl ListenerOptions {
    pub const PASSIVE: Self = Self { passive: true, once: false };
    pub const ONCE: Self = Self { passive: false, once: true };
}

/// An event listener that is removed when dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    pub fn with_options<F>(
        target: &EventTarget,
        event: &'static str,
        options: ListenerOptions,
        handler: F,
    ) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let js_options = AddEventListenerOptions::new();
        js_options.set_passive(options.passive);
        js_options.set_once(options.once);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &js_options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// An `IntersectionObserver` that disconnects when dropped.
pub struct Observer {
    inner: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Observer {
    /// `root` scopes the observation to a scrolling container instead of the viewport.
    pub fn new<F>(threshold: f64, root: Option<&Element>, mut on_entry: F) -> Result<Self, JsValue>
    where
        F: FnMut(&IntersectionObserverEntry, &IntersectionObserver) + 'static,
    {
        let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                    on_entry(&entry, &observer);
                }
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        if let Some(root) = root {
            Reflect::set(&init, &JsValue::from_str("root"), root)?;
        }

        let inner = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        Ok(Self {
            inner,
            _callback: callback,
        })
    }

    pub fn observe_all(&self, targets: &[Element]) {
        targets.iter().for_each(|target| self.inner.observe(target));
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.inner.disconnect();
    }
}

/// A pending `requestAnimationFrame` callback, cancelled when dropped.
pub struct AnimationFrame {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl AnimationFrame {
    pub fn request<F>(work: F) -> Option<Self>
    where
        F: FnOnce() + 'static,
    {
        let window = web_sys::window()?;
        let mut work = Some(work);
        let callback = Closure::wrap(Box::new(move || {
            if let Some(work) = work.take() {
                work();
            }
        }) as Box<dyn FnMut()>);
        let id = window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()?;
        Some(Self {
            id,
            _callback: callback,
        })
    }
}

impl Drop for AnimationFrame {
    fn drop(&mut self) {
        // Cancelling a frame that already ran is a no-op.
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(self.id);
        }
    }
}

pub fn supports_intersection_observer(window: &Window) -> bool {
    Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

pub fn media_matches(window: &Window, query: &str) -> bool {
    window
        .match_media(query)
        .ok()
        .flatten()
        .map(|list| list.matches())
        .unwrap_or(false)
}

pub fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    document
        .query_selector_all(selector)
        .map(|list| collect_elements(&list))
        .unwrap_or_default()
}

pub fn query_within(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(|list| collect_elements(&list))
        .unwrap_or_default()
}

fn collect_elements(list: &web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Position of `target` within `items`, by node identity.
pub fn index_of(items: &[Element], target: &Element) -> Option<usize> {
    let target: &Node = target;
    items.iter().position(|item| item.is_same_node(Some(target)))
}

pub fn add_class(el: &Element, class: &str) {
    let _ = el.class_list().add_1(class);
}

pub fn remove_class(el: &Element, class: &str) {
    let _ = el.class_list().remove_1(class);
}

pub fn toggle_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

pub fn set_style_var(el: &Element, name: &str, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property(name, value);
    }
}

/// Children of `container` as elements, in document order.
pub fn children(container: &Element) -> Vec<Element> {
    let list = container.children();
    (0..list.length()).filter_map(|i| list.item(i)).collect()
}
