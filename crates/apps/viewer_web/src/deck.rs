//! Bridge to the deck.gl renderer loaded by the host page.
//!
//! Rust only hands over JSON descriptions; the JS side turns the layer
//! description into a `GeoJsonLayer` whose accessors are array lookups by
//! feature index.

use layers::choropleth::ChoroplethLayer;
use scene::{ViewLimits, ViewState, ViewerConfig};
use serde_json::json;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(inline_js = r#"
export function taxi_deck_create(containerId, initialViewJson, controllerJson, onViewState) {
    const parent = document.getElementById(containerId);
    if (!parent) {
        throw new Error(`map container #${containerId} not found`);
    }
    if (typeof deck === 'undefined') {
        throw new Error('deck.gl is not loaded');
    }
    return new deck.Deck({
        parent,
        initialViewState: JSON.parse(initialViewJson),
        controller: JSON.parse(controllerJson),
        onViewStateChange: ({ viewState }) => {
            const c = onViewState(
                viewState.longitude,
                viewState.latitude,
                viewState.zoom,
                viewState.pitch,
                viewState.bearing,
            );
            return { ...viewState, longitude: c[0], latitude: c[1], zoom: c[2] };
        },
        layers: [],
    });
}

export function taxi_deck_set_layer(instance, zones, layerJson, onHover) {
    const d = JSON.parse(layerJson);
    const layer = new deck.GeoJsonLayer({
        id: d.id,
        data: zones,
        pickable: d.pickable,
        stroked: d.stroked,
        filled: d.filled,
        extruded: d.extruded,
        wireframe: d.wireframe,
        lineWidthMinPixels: d.lineWidthMinPixels,
        getLineColor: d.lineColor,
        getFillColor: (_f, { index }) => d.fillColors[index],
        getElevation: (_f, { index }) => d.elevations[index],
        updateTriggers: d.updateTriggers,
        transitions: d.transitions,
        onHover: ({ object, index, x, y }) => onHover(object ? index : -1, x, y),
    });
    instance.setProps({ layers: [layer] });
}

export function taxi_deck_set_view_state(instance, viewJson) {
    instance.setProps({ viewState: JSON.parse(viewJson) });
}
"#)]
extern "C" {
    #[wasm_bindgen(catch)]
    fn taxi_deck_create(
        container_id: &str,
        initial_view_json: &str,
        controller_json: &str,
        on_view_state: &Closure<dyn FnMut(f64, f64, f64, f64, f64) -> Vec<f64>>,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    fn taxi_deck_set_layer(
        instance: &JsValue,
        zones: &JsValue,
        layer_json: &str,
        on_hover: &Closure<dyn FnMut(i32, f64, f64)>,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn taxi_deck_set_view_state(instance: &JsValue, view_json: &str) -> Result<(), JsValue>;
}

pub const MAP_CONTAINER_ID: &str = "map";

/// A live deck instance plus the callbacks it holds on to.
pub struct DeckBridge {
    instance: JsValue,
    zones: JsValue,
    on_hover: Closure<dyn FnMut(i32, f64, f64)>,
    _on_view_state: Closure<dyn FnMut(f64, f64, f64, f64, f64) -> Vec<f64>>,
}

impl DeckBridge {
    pub fn create(
        zones_geojson: &serde_json::Value,
        config: &ViewerConfig,
        initial_view: ViewState,
        on_hover: impl FnMut(i32, f64, f64) + 'static,
        on_view_state: impl FnMut(f64, f64, f64, f64, f64) -> Vec<f64> + 'static,
    ) -> Result<Self, JsValue> {
        let on_view_state =
            Closure::<dyn FnMut(f64, f64, f64, f64, f64) -> Vec<f64>>::new(on_view_state);
        let instance = taxi_deck_create(
            MAP_CONTAINER_ID,
            &initial_view_props(initial_view, &config.view_limits).to_string(),
            &controller_props(config).to_string(),
            &on_view_state,
        )?;
        let zones = js_sys::JSON::parse(&zones_geojson.to_string())?;
        Ok(Self {
            instance,
            zones,
            on_hover: Closure::<dyn FnMut(i32, f64, f64)>::new(on_hover),
            _on_view_state: on_view_state,
        })
    }

    pub fn set_layer(&self, layer: &ChoroplethLayer) -> Result<(), JsValue> {
        let payload =
            serde_json::to_string(layer).map_err(|e| JsValue::from_str(&e.to_string()))?;
        taxi_deck_set_layer(&self.instance, &self.zones, &payload, &self.on_hover)
    }

    pub fn set_view_state(&self, view: ViewState) -> Result<(), JsValue> {
        let payload = serde_json::to_string(&view).map_err(|e| JsValue::from_str(&e.to_string()))?;
        taxi_deck_set_view_state(&self.instance, &payload)
    }
}

pub fn initial_view_props(view: ViewState, limits: &ViewLimits) -> serde_json::Value {
    json!({
        "longitude": view.longitude,
        "latitude": view.latitude,
        "zoom": view.zoom,
        "pitch": view.pitch,
        "bearing": view.bearing,
        "minZoom": limits.min_zoom,
        "maxZoom": limits.max_zoom,
    })
}

pub fn controller_props(config: &ViewerConfig) -> serde_json::Value {
    json!({
        "minZoom": config.view_limits.min_zoom,
        "maxZoom": config.view_limits.max_zoom,
        "minPitch": 0,
        "maxPitch": config.max_pitch,
    })
}

#[cfg(test)]
mod tests {
    use super::{controller_props, initial_view_props};
    use pretty_assertions::assert_eq;
    use scene::{ViewerConfig, DESKTOP_VIEW, VIEW_LIMITS};
    use serde_json::json;

    #[test]
    fn controller_limits_follow_config() {
        assert_eq!(
            controller_props(&ViewerConfig::default()),
            json!({"minZoom": 8.2, "maxZoom": 13.8, "minPitch": 0, "maxPitch": 60.0})
        );
    }

    #[test]
    fn initial_view_carries_zoom_limits() {
        let props = initial_view_props(DESKTOP_VIEW, &VIEW_LIMITS);
        assert_eq!(props["longitude"], -73.95);
        assert_eq!(props["pitch"], 45.0);
        assert_eq!(props["minZoom"], 8.2);
    }
}
