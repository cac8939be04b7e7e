use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use super::dom::{self, AnimationFrame, Observer};
use crate::config::FxConfig;

const CARDS: &str = ".packages .card";
const HERO: &str = ".hero";
const HERO_TARGETS: &str = ".hero .hero-ragga-font-container, .hero .hero-title-name, .hero .hero-lead, \
     .hero .card-divider-blue, .hero .hero-lead-highlight-sub, .hero .hero-actions, .hero .hero-media";
const SECTIONS: &str = ".about, .packages, .clients, .testimonials, .contact";
const SECTION_ITEMS: &str = ".section-title, .about-content, .packages-ragga-container, .package-grid, \
     .testimonial-media, .client-carousel, .client-slide, .contact-card";

/// Tracks which targets of a one-shot group have already been revealed.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealLedger {
    revealed: Vec<bool>,
}

impl RevealLedger {
    pub fn new(len: usize) -> Self {
        Self {
            revealed: vec![false; len],
        }
    }

    /// Returns `true` only the first time `index` is revealed.
    pub fn reveal(&mut self, index: usize) -> bool {
        match self.revealed.get_mut(index) {
            Some(done) if !*done => {
                *done = true;
                true
            }
            _ => false,
        }
    }

    pub fn reveal_all(&mut self) -> Vec<usize> {
        (0..self.revealed.len()).filter(|&i| self.reveal(i)).collect()
    }

    #[cfg(test)]
    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn pending(&self) -> usize {
        self.revealed.iter().filter(|done| !**done).count()
    }
}

/// A set of targets that each get marked once, the first time they become
/// sufficiently visible. Without observer support they are marked right away.
pub struct RevealGroup {
    ledger: Rc<RefCell<RevealLedger>>,
    _observer: Option<Observer>,
}

impl RevealGroup {
    pub fn attach<F>(targets: Vec<Element>, threshold: f64, supported: bool, mut mark: F) -> Result<Self, JsValue>
    where
        F: FnMut(&Element) + 'static,
    {
        let ledger = Rc::new(RefCell::new(RevealLedger::new(targets.len())));

        if !supported {
            for index in ledger.borrow_mut().reveal_all() {
                mark(&targets[index]);
            }
            return Ok(Self {
                ledger,
                _observer: None,
            });
        }

        let observer = Observer::new(threshold, None, {
            let ledger = ledger.clone();
            let targets = targets.clone();
            move |entry, observer| {
                if !entry.is_intersecting() {
                    return;
                }
                let target = entry.target();
                observer.unobserve(&target);
                let first = dom::index_of(&targets, &target)
                    .map(|index| ledger.borrow_mut().reveal(index))
                    .unwrap_or(false);
                if first {
                    mark(&target);
                }
            }
        })?;
        observer.observe_all(&targets);

        Ok(Self {
            ledger,
            _observer: Some(observer),
        })
    }

    pub fn pending(&self) -> usize {
        self.ledger.borrow().pending()
    }
}

/// Package cards: `is-animated` on reveal, `is-inview` one frame later so the
/// transition has a starting state to animate from.
pub struct CardReveal {
    _group: RevealGroup,
    _frames: Rc<RefCell<Vec<AnimationFrame>>>,
}

impl CardReveal {
    pub fn attach(document: &Document, config: &FxConfig, supported: bool) -> Result<Option<Self>, JsValue> {
        let cards = dom::query_all(document, CARDS);
        if cards.is_empty() {
            return Ok(None);
        }

        let frames: Rc<RefCell<Vec<AnimationFrame>>> = Rc::default();
        let group = RevealGroup::attach(cards, config.thresholds.card, supported, {
            let frames = frames.clone();
            move |card| {
                dom::add_class(card, "is-animated");
                let card = card.clone();
                if let Some(frame) = AnimationFrame::request(move || dom::add_class(&card, "is-inview")) {
                    frames.borrow_mut().push(frame);
                }
            }
        })?;

        Ok(Some(Self {
            _group: group,
            _frames: frames,
        }))
    }
}

/// Hero entrance: the whole block is watched, and every staggered target
/// enters together the first time it shows up.
pub fn attach_hero(document: &Document, config: &FxConfig, supported: bool) -> Result<Option<RevealGroup>, JsValue> {
    let Some(hero) = dom::query(document, HERO) else {
        return Ok(None);
    };

    let targets = dom::query_all(document, HERO_TARGETS);
    for (index, target) in targets.iter().enumerate() {
        let _ = target.set_attribute("data-animate", "hero");
        dom::set_style_var(target, "--hero-delay", &config.stagger_delay(index));
    }

    RevealGroup::attach(vec![hero], config.thresholds.hero, supported, move |_| {
        targets.iter().for_each(|target| dom::add_class(target, "is-inview"));
    })
    .map(Some)
}

/// Section content slides in item by item; the stagger restarts per section.
pub fn attach_sections(document: &Document, config: &FxConfig, supported: bool) -> Result<Option<RevealGroup>, JsValue> {
    let sections = dom::query_all(document, SECTIONS);
    if sections.is_empty() {
        return Ok(None);
    }

    let mut items = Vec::new();
    for section in &sections {
        for (index, item) in dom::query_within(section, SECTION_ITEMS).into_iter().enumerate() {
            dom::add_class(&item, "reveal-item");
            dom::set_style_var(&item, "--reveal-delay", &config.stagger_delay(index));
            items.push(item);
        }
    }
    debug!("Watching {} section items for reveal", items.len());

    RevealGroup::attach(items, config.thresholds.section, supported, |item| {
        dom::add_class(item, "is-revealed");
    })
    .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_fires_once_per_target() {
        let mut ledger = RevealLedger::new(3);

        assert!(ledger.reveal(1));
        assert!(!ledger.reveal(1));
        assert!(ledger.is_revealed(1));
        assert!(!ledger.is_revealed(0));
        assert_eq!(ledger.pending(), 2);
    }

    #[test]
    fn out_of_range_target_is_ignored() {
        let mut ledger = RevealLedger::new(2);
        assert!(!ledger.reveal(5));
        assert_eq!(ledger.pending(), 2);
    }

    #[test]
    fn reveal_all_skips_already_revealed() {
        let mut ledger = RevealLedger::new(4);
        ledger.reveal(2);

        assert_eq!(ledger.reveal_all(), vec![0, 1, 3]);
        assert!(ledger.reveal_all().is_empty());
        assert_eq!(ledger.pending(), 0);
    }

    #[test]
    fn markers_are_never_withdrawn() {
        let mut ledger = RevealLedger::new(2);
        ledger.reveal(0);
        for _ in 0..5 {
            ledger.reveal(0);
            ledger.reveal(1);
        }
        assert!(ledger.is_revealed(0));
        assert!(ledger.is_revealed(1));
    }
}
