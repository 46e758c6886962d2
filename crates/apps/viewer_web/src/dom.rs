use layers::choropleth::ChoroplethLayer;
use runtime::PlaybackState;
use scene::tooltip::{Size, TooltipContent};
use scene::{DashboardSurface, ZoneLine};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement};

use crate::deck::{DeckBridge, MAP_CONTAINER_ID};

pub const HOUR_SLIDER_ID: &str = "hourSlider";
pub const PLAY_BUTTON_ID: &str = "playBtn";
pub const HOUR_LABEL_ID: &str = "hourLabel";
pub const TOP_ZONES_ID: &str = "topZones";
pub const TOOLTIP_ID: &str = "mapTooltip";
pub const LOADING_OVERLAY_ID: &str = "loadingOverlay";

pub const LOAD_ERROR_TITLE: &str = "Unable to load forecast";
pub const LOAD_ERROR_HINT: &str = "Please refresh in a moment.";

/// Glyph and accessible label of the play button.
pub fn playback_button(state: PlaybackState) -> (&'static str, &'static str) {
    match state {
        PlaybackState::Stopped => ("▶", "Play"),
        PlaybackState::Playing => ("II", "Pause"),
    }
}

/// `(class, text)` of each tooltip line, title first.
pub fn tooltip_lines(content: &TooltipContent) -> Vec<(&'static str, String)> {
    let [zone, trips] = content.rows();
    vec![
        ("tooltip-title", content.title.clone()),
        ("tooltip-row", zone),
        ("tooltip-row", trips),
    ]
}

/// `(class, text)` of each line on the failed-startup card.
pub fn load_error_lines() -> [(&'static str, &'static str); 2] {
    [
        ("loading-title", LOAD_ERROR_TITLE),
        ("loading-sub", LOAD_ERROR_HINT),
    ]
}

pub fn slider_max(hour_count: usize) -> usize {
    hour_count.saturating_sub(1)
}

pub fn log_error(context: &str, err: &JsValue) {
    web_sys::console::error_2(&JsValue::from_str(context), err);
}

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn element_by_id<T: JsCast>(doc: &Document, id: &str) -> Result<T, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element #{id} has an unexpected type")))
}

/// An event listener that detaches itself when dropped.
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn attach(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// The page's controls plus the deck bridge.
pub struct DomSurface {
    slider: HtmlInputElement,
    hour_label: HtmlElement,
    top_zones: HtmlElement,
    play_button: HtmlElement,
    tooltip: HtmlElement,
    map: HtmlElement,
    doc: Document,
    deck: DeckBridge,
}

impl DomSurface {
    pub fn new(doc: &Document, deck: DeckBridge) -> Result<Self, JsValue> {
        Ok(Self {
            slider: element_by_id(doc, HOUR_SLIDER_ID)?,
            hour_label: element_by_id(doc, HOUR_LABEL_ID)?,
            top_zones: element_by_id(doc, TOP_ZONES_ID)?,
            play_button: element_by_id(doc, PLAY_BUTTON_ID)?,
            tooltip: element_by_id(doc, TOOLTIP_ID)?,
            map: element_by_id(doc, MAP_CONTAINER_ID)?,
            doc: doc.clone(),
            deck,
        })
    }

    pub fn slider(&self) -> &HtmlInputElement {
        &self.slider
    }

    pub fn play_button(&self) -> &HtmlElement {
        &self.play_button
    }

    pub fn deck(&self) -> &DeckBridge {
        &self.deck
    }

    pub fn map_size(&self) -> Size {
        let rect = self.map.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }

    /// Writes the tooltip rows, makes the box visible and returns its size.
    pub fn write_tooltip(&self, content: &TooltipContent) -> Result<Size, JsValue> {
        self.tooltip.set_text_content(None);
        for (class, text) in tooltip_lines(content) {
            append_text_div(&self.doc, &self.tooltip, class, &text)?;
        }
        self.tooltip.style().set_property("display", "block")?;
        let rect = self.tooltip.get_bounding_client_rect();
        Ok(Size::new(rect.width(), rect.height()))
    }

    pub fn move_tooltip(&self, left: f64, top: f64) -> Result<(), JsValue> {
        self.tooltip
            .style()
            .set_property("transform", &format!("translate({left}px, {top}px)"))
    }

    pub fn hide_tooltip(&self) -> Result<(), JsValue> {
        self.tooltip.style().set_property("display", "none")
    }

    fn try_show_top_zones(&self, lines: &[ZoneLine]) -> Result<(), JsValue> {
        self.top_zones.set_text_content(None);
        for line in lines {
            let item = self.doc.create_element("li")?;
            item.set_text_content(Some(&line.to_string()));
            self.top_zones.append_child(&item)?;
        }
        Ok(())
    }
}

impl DashboardSurface for DomSurface {
    fn configure_timeline(&mut self, hour_count: usize) {
        self.slider.set_min("0");
        self.slider.set_max(&slider_max(hour_count).to_string());
        self.slider.set_step("1");
    }

    fn show_hour(&mut self, index: usize, label: &str) {
        self.slider.set_value(&index.to_string());
        self.hour_label.set_text_content(Some(label));
    }

    fn show_top_zones(&mut self, lines: &[ZoneLine]) {
        if let Err(err) = self.try_show_top_zones(lines) {
            log_error("top zones update failed:", &err);
        }
    }

    fn render_layer(&mut self, layer: &ChoroplethLayer) {
        if let Err(err) = self.deck.set_layer(layer) {
            log_error("layer update failed:", &err);
        }
    }

    fn show_playback(&mut self, state: PlaybackState) {
        let (glyph, label) = playback_button(state);
        self.play_button.set_text_content(Some(glyph));
        if let Err(err) = self.play_button.set_attribute("aria-label", label) {
            log_error("play button update failed:", &err);
        }
    }
}

fn append_text_div(
    doc: &Document,
    parent: &Element,
    class: &str,
    text: &str,
) -> Result<(), JsValue> {
    let div = doc.create_element("div")?;
    div.set_class_name(class);
    div.set_text_content(Some(text));
    parent.append_child(&div)?;
    Ok(())
}

pub fn hide_loading(doc: &Document) -> Result<(), JsValue> {
    let overlay: HtmlElement = element_by_id(doc, LOADING_OVERLAY_ID)?;
    overlay.class_list().add_1("hidden")
}

/// Terminal state after a failed startup; the overlay stays up.
pub fn show_load_error(doc: &Document) -> Result<(), JsValue> {
    let overlay: HtmlElement = element_by_id(doc, LOADING_OVERLAY_ID)?;
    let classes = overlay.class_list();
    classes.remove_1("hidden")?;
    classes.add_1("error")?;
    let card = doc.create_element("div")?;
    card.set_class_name("loading-card");
    for (class, text) in load_error_lines() {
        append_text_div(doc, &card, class, text)?;
    }
    overlay.set_text_content(None);
    overlay.append_child(&card)?;
    Ok(())
}
