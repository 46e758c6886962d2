use console_error_panic_hook::set_once;
use std::cell::RefCell;
use tracing::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, HtmlInputElement, Window};

use formats::load_datasets;
use scene::tooltip::TooltipState;
use scene::{Dashboard, HoverEvent, MapInteraction, ViewState, ViewerConfig};

mod deck;
mod dom;
mod http;
mod timer;
mod viewport;

use deck::DeckBridge;
use dom::{DomSurface, Listener, log_error};
use http::HttpSource;
use timer::BrowserInterval;

struct App {
    dashboard: Dashboard<BrowserInterval>,
    surface: DomSurface,
    _listeners: Vec<Listener>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    static VIEWPORT_LISTENERS: RefCell<Vec<Listener>> = const { RefCell::new(Vec::new()) };
}

/// Runs `f` against the live app. `None` before startup finished or while a
/// handler further up the stack holds the state.
fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| {
        let mut app = cell.try_borrow_mut().ok()?;
        app.as_mut().map(f)
    })
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_config(config_json: Option<&str>) -> Result<ViewerConfig, JsValue> {
    match config_json {
        Some(json) => ViewerConfig::from_json_str(json).map_err(js_error),
        None => Ok(ViewerConfig::default()),
    }
}

/// The `[longitude, latitude, zoom]` triple handed back to the renderer.
fn view_triple(view: ViewState) -> Vec<f64> {
    vec![view.longitude, view.latitude, view.zoom]
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    tracing_wasm::set_as_global_default();
    Ok(())
}

/// Boots the viewer. `config_json` may override any subset of the viewer
/// settings.
#[wasm_bindgen]
pub fn init(config_json: Option<String>) {
    spawn_local(async move {
        if let Err(err) = init_inner(config_json).await {
            log_error("forecast viewer failed to start:", &err);
            match dom::document().and_then(|doc| dom::show_load_error(&doc)) {
                Ok(()) => {}
                Err(overlay_err) => log_error("could not show the error overlay:", &overlay_err),
            }
        }
    });
}

/// Selects an hour as if the slider moved there; indices past the end
/// select the last hour.
#[wasm_bindgen]
pub fn set_hour(index: usize) {
    with_app(|app| app.dashboard.scrub(index, &mut app.surface));
}

/// Returns `true` when playback is running afterwards.
#[wasm_bindgen]
pub fn toggle_playback() -> bool {
    with_app(|app| app.dashboard.toggle_playback(&mut app.surface).is_playing()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn selected_hour() -> usize {
    with_app(|app| app.dashboard.selected_index()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn hour_count() -> usize {
    with_app(|app| app.dashboard.timeline().len()).unwrap_or(0)
}

async fn init_inner(config_json: Option<String>) -> Result<(), JsValue> {
    let config = parse_config(config_json.as_deref())?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = dom::document()?;

    watch_visual_viewport(&window)?;

    let datasets = load_datasets(&HttpSource, &config.zones_url, &config.forecast_urls)
        .await
        .map_err(js_error)?;
    info!(
        location = %datasets.forecast_location,
        rows = datasets.forecast.predictions.len(),
        zones = datasets.zones.len(),
        generated_at = datasets.forecast.generated_at.as_deref().unwrap_or("unknown"),
        "forecast loaded"
    );
    if let Some((declared, actual)) = datasets.forecast.prediction_count_mismatch() {
        warn!(declared, actual, "forecast prediction_count disagrees with its rows");
    }

    let mobile = viewport::is_mobile(&window, &config.mobile_media_query());
    let limits = config.view_limits;
    let deck = DeckBridge::create(
        datasets.zones.geojson(),
        &config,
        config.initial_view(mobile),
        on_map_hover,
        move |longitude, latitude, zoom, pitch, bearing| {
            let candidate = ViewState::new(longitude, latitude, zoom, pitch, bearing);
            let clamped = with_app(|app| app.dashboard.on_view_change(candidate))
                .unwrap_or_else(|| limits.clamp(candidate));
            view_triple(clamped)
        },
    )?;
    let mut surface = DomSurface::new(&doc, deck)?;

    let timer = BrowserInterval::new(|| {
        with_app(|app| app.dashboard.tick(&mut app.surface));
    });
    let mut dashboard = Dashboard::new(&datasets.zones, datasets.forecast, config, timer);
    dashboard.start(&mut surface);

    let listeners = vec![
        Listener::attach(surface.slider(), "input", on_slider_input)?,
        Listener::attach(surface.play_button(), "click", |_| {
            with_app(|app| app.dashboard.toggle_playback(&mut app.surface));
        })?,
        Listener::attach(&window, "resize", |_| reset_view())?,
    ];

    APP.with(|cell| {
        *cell.borrow_mut() = Some(App {
            dashboard,
            surface,
            _listeners: listeners,
        });
    });

    dom::hide_loading(&doc)
}

fn watch_visual_viewport(window: &Window) -> Result<(), JsValue> {
    viewport::sync_visual_viewport_vars(window)?;
    let Some(vv) = window.visual_viewport() else {
        return Ok(());
    };
    let sync = |_: Event| {
        if let Some(window) = web_sys::window() {
            if let Err(err) = viewport::sync_visual_viewport_vars(&window) {
                log_error("viewport sync failed:", &err);
            }
        }
    };
    let listeners = vec![
        Listener::attach(&vv, "resize", sync)?,
        Listener::attach(&vv, "scroll", sync)?,
    ];
    VIEWPORT_LISTENERS.with(|cell| *cell.borrow_mut() = listeners);
    Ok(())
}

fn on_slider_input(event: Event) {
    let Some(input) = event
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
    else {
        return;
    };
    let value = input.value();
    with_app(|app| app.dashboard.scrub_input(&value, &mut app.surface));
}

/// Hover callback from the renderer; `index` is -1 off features.
fn on_map_hover(index: i32, x: f64, y: f64) {
    with_app(|app| {
        let feature = usize::try_from(index).ok();
        let result = match feature.and_then(|f| app.dashboard.tooltip_content(f)) {
            None => app.surface.hide_tooltip(),
            Some(content) => app.surface.write_tooltip(&content).and_then(|tooltip_size| {
                let event = HoverEvent {
                    feature,
                    x,
                    y,
                    map_size: app.surface.map_size(),
                    tooltip_size,
                };
                match app.dashboard.on_hover(&event) {
                    TooltipState::Visible { left, top, .. } => app.surface.move_tooltip(left, top),
                    TooltipState::Hidden => app.surface.hide_tooltip(),
                }
            }),
        };
        if let Err(err) = result {
            log_error("tooltip update failed:", &err);
        }
    });
}

/// Reframes the camera for the current breakpoint.
fn reset_view() {
    let Some(window) = web_sys::window() else {
        return;
    };
    with_app(|app| {
        let mobile = viewport::is_mobile(&window, &app.dashboard.config().mobile_media_query());
        let view = app.dashboard.initial_view(mobile);
        if let Err(err) = app.surface.deck().set_view_state(view) {
            log_error("view reset failed:", &err);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::{parse_config, view_triple};
    use pretty_assertions::assert_eq;
    use scene::{ViewState, ViewerConfig};

    #[test]
    fn missing_override_uses_defaults() {
        assert_eq!(parse_config(None).ok(), Some(ViewerConfig::default()));
    }

    #[test]
    fn override_replaces_named_fields_only() {
        let cfg = parse_config(Some(r#"{"top_zone_count": 10}"#)).ok();
        let expected = ViewerConfig {
            top_zone_count: 10,
            ..ViewerConfig::default()
        };
        assert_eq!(cfg, Some(expected));
    }

    #[test]
    fn view_triple_keeps_position_and_zoom() {
        let v = ViewState::new(-74.0, 40.7, 11.5, 30.0, 10.0);
        assert_eq!(view_triple(v), vec![-74.0, 40.7, 11.5]);
    }
}
