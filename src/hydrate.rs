//! Declarative mounting: components described by `data-*` attributes in the
//! static markup are attached at start-up and live for the page lifetime.
//! Typewriters and images inside a `[data-reveal]` region are mounted only
//! once that region is revealed.

use crate::ambient::AmbientBackground;
use crate::core::{CapabilityProfile, ImageQuality, RevealOptions, TypewriterOptions};
use crate::dom::data_attr;
use crate::lazy_image::{ImageOptions, ProgressiveImage};
use crate::reveal::RevealGate;
use crate::typewriter::ScrambleTypewriter;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

const HYDRATED: &str = "data-motion-hydrated";
const REVEAL_SELECTOR: &str = "[data-reveal]";

thread_local! {
    // Handles are only held so their components stay mounted.
    static MOUNTED: RefCell<Vec<Box<dyn Any>>> = const { RefCell::new(Vec::new()) };
}

fn keep(handle: impl Any) {
    MOUNTED.with(|all| all.borrow_mut().push(Box::new(handle)));
}

fn elements(document: &web::Document, selector: &str) -> anyhow::Result<Vec<web::Element>> {
    let list = document
        .query_selector_all(selector)
        .map_err(|e| anyhow::anyhow!("query {}: {:?}", selector, e))?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|n| n.dyn_into::<web::Element>().ok())
        .filter(|el| !el.has_attribute(HYDRATED))
        .collect())
}

fn parse_f64(el: &web::Element, name: &str) -> Option<f64> {
    data_attr(el, name).and_then(|v| v.trim().parse().ok())
}

fn parse_flag(el: &web::Element, name: &str) -> Option<bool> {
    data_attr(el, name).map(|v| !matches!(v.trim(), "false" | "0" | "off"))
}

/// Reveal gates mounted in this pass, by region.
struct Regions(Vec<(web::Element, Rc<RevealGate>)>);

impl Regions {
    /// The gate of the nearest enclosing region, if it was mounted.
    fn gate_for(&self, el: &web::Element) -> Option<Rc<RevealGate>> {
        let region = el.closest(REVEAL_SELECTOR).ok().flatten()?;
        self.0
            .iter()
            .find(|(r, _)| r.is_same_node(Some(&region)))
            .map(|(_, gate)| gate.clone())
    }
}

/// Totals of one hydration pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hydrated {
    pub mounted: usize,
    pub deferred: usize,
}

/// Mount `mount` now, or when `el`'s reveal region is revealed.
fn mount_when_revealed(
    regions: &Regions,
    el: &web::Element,
    totals: &mut Hydrated,
    mount: impl FnOnce() + 'static,
) {
    match regions.gate_for(el) {
        Some(gate) if !gate.visible() => {
            gate.on_reveal(mount);
            totals.deferred += 1;
        }
        _ => {
            mount();
            totals.mounted += 1;
        }
    }
}

fn typewriter_options(el: &web::Element) -> TypewriterOptions {
    let defaults = TypewriterOptions::default();
    TypewriterOptions {
        speed_ms: parse_f64(el, "typewriter-speed").unwrap_or(defaults.speed_ms),
        scramble_on_mount: parse_flag(el, "typewriter-scramble")
            .unwrap_or(defaults.scramble_on_mount),
        scramble_duration_ms: parse_f64(el, "typewriter-scramble-ms")
            .unwrap_or(defaults.scramble_duration_ms),
    }
}

fn image_options(el: &web::Element) -> ImageOptions {
    let defaults = ImageOptions::default();
    ImageOptions {
        alt: data_attr(el, "alt").unwrap_or(defaults.alt),
        priority: parse_flag(el, "priority").unwrap_or(defaults.priority),
        quality: data_attr(el, "quality")
            .as_deref()
            .and_then(ImageQuality::parse)
            .unwrap_or(defaults.quality),
        object_fit: data_attr(el, "object-fit").unwrap_or(defaults.object_fit),
        placeholder: data_attr(el, "placeholder"),
    }
}

/// Mount every declared component.
pub fn hydrate(document: &web::Document, profile: &CapabilityProfile) -> anyhow::Result<Hydrated> {
    let mut totals = Hydrated::default();

    if let Some(body) = document.body() {
        if body.has_attribute("data-ambient") && !body.has_attribute(HYDRATED) {
            let bg = AmbientBackground::mount_with(profile);
            _ = body.set_attribute(HYDRATED, "");
            if bg.active() {
                totals.mounted += 1;
            }
            keep(bg);
        }
    }

    let mut regions = Regions(Vec::new());
    for el in elements(document, REVEAL_SELECTOR)? {
        let options = RevealOptions {
            threshold: parse_f64(&el, "reveal-threshold")
                .unwrap_or(RevealOptions::default().threshold),
        };
        match RevealGate::observe(el.clone(), &options, profile.prefers_reduced_motion, None) {
            Ok(gate) => {
                let gate = Rc::new(gate);
                regions.0.push((el.clone(), gate.clone()));
                keep(gate);
                totals.mounted += 1;
            }
            Err(e) => log::warn!("[hydrate] reveal skipped: {}", e),
        }
        _ = el.set_attribute(HYDRATED, "");
    }

    for el in elements(document, "[data-typewriter]")? {
        let Ok(html) = el.clone().dyn_into::<web::HtmlElement>() else {
            continue;
        };
        let text = data_attr(&el, "typewriter")
            .filter(|t| !t.is_empty())
            .or_else(|| el.text_content())
            .unwrap_or_default();
        let options = typewriter_options(&el);
        let profile = *profile;
        _ = el.set_attribute(HYDRATED, "");
        mount_when_revealed(&regions, &el, &mut totals, move || {
            keep(ScrambleTypewriter::with_options(html, &text, &options, &profile));
        });
    }

    for el in elements(document, "[data-progressive-src]")? {
        let (Some(src), Ok(container)) = (
            data_attr(&el, "progressive-src"),
            el.clone().dyn_into::<web::HtmlElement>(),
        ) else {
            continue;
        };
        let options = image_options(&el);
        let profile = *profile;
        _ = el.set_attribute(HYDRATED, "");
        mount_when_revealed(&regions, &el, &mut totals, move || {
            match ProgressiveImage::register(container, &src, &options, &profile) {
                Ok(img) => keep(img),
                Err(e) => log::warn!("[hydrate] image {} skipped: {}", src, e),
            }
        });
    }

    log::info!(
        "[hydrate] mounted {} components, {} waiting for reveal",
        totals.mounted,
        totals.deferred
    );
    Ok(totals)
}
