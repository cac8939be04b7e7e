//! Scroll-driven effects for the landing page.
//!
//! Each feature owns its listeners, observers, timers and frame requests in a
//! single state value. `LandingFx` holds one of each, so dropping it (or
//! calling [`LandingFx::teardown`]) releases every registration at once.

pub mod carousel;
pub mod dom;
pub mod header;
pub mod reveal;
pub mod schedule;
pub mod slider;
pub mod swipe_tease;

use log::{debug, info};
use wasm_bindgen::JsValue;

use crate::config::FxConfig;
use carousel::PackageCarousel;
use header::HeaderScroll;
use reveal::{CardReveal, RevealGroup};
use slider::ClientSlider;
use swipe_tease::SwipeTease;

#[derive(Default)]
pub struct LandingFx {
    cards: Option<CardReveal>,
    carousel: Option<PackageCarousel>,
    hero: Option<RevealGroup>,
    sections: Option<RevealGroup>,
    slider: Option<ClientSlider>,
    swipe_tease: Option<SwipeTease>,
    header: Option<HeaderScroll>,
}

/// A feature that fails to wire is left out; the page stays static there.
fn wired<T>(feature: &str, setup: Result<Option<T>, JsValue>) -> Option<T> {
    match setup {
        Ok(Some(state)) => Some(state),
        Ok(None) => {
            debug!("{}: markup not found, skipped", feature);
            None
        }
        Err(e) => {
            debug!("{}: setup failed, skipped: {:?}", feature, e);
            None
        }
    }
}

impl LandingFx {
    /// Wires every effect against the current document. Call once the page
    /// markup is attached.
    pub fn init(config: &FxConfig) -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let Some(document) = window.document() else {
            return Self::default();
        };
        let supported = dom::supports_intersection_observer(&window);
        if !supported {
            info!("IntersectionObserver unavailable, revealing everything up front");
        }

        let fx = Self {
            cards: wired("card reveal", CardReveal::attach(&document, config, supported)),
            carousel: wired("package carousel", PackageCarousel::attach(&window, &document, config, supported)),
            hero: wired("hero entrance", reveal::attach_hero(&document, config, supported)),
            sections: wired("section reveal", reveal::attach_sections(&document, config, supported)),
            slider: wired("client slider", ClientSlider::attach(&window, &document, config)),
            swipe_tease: wired("swipe tease", SwipeTease::attach(&window, &document, config, supported)),
            header: wired("header scroll", HeaderScroll::attach(&window, &document, config)),
        };

        if let Some(carousel) = &fx.carousel {
            debug!("Package cards start in {:?} mode", carousel.mode());
        }
        if let Some(sections) = &fx.sections {
            debug!("{} section items waiting to reveal", sections.pending());
        }
        info!("Landing effects attached");
        fx
    }

    /// Releases every listener, observer, timer and frame request.
    pub fn teardown(self) {
        drop(self);
        info!("Landing effects torn down");
    }
}
