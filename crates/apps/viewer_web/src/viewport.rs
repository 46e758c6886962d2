//! Viewport signals: mobile breakpoint and visual-viewport CSS variables.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, Window};

pub fn is_mobile(window: &Window, media_query: &str) -> bool {
    matches!(window.match_media(media_query), Ok(Some(mql)) if mql.matches())
}

pub fn css_px(v: f64) -> String {
    format!("{}px", v.round())
}

/// Mirrors the visual viewport into `--vvh` / `--vv-top` so mobile layouts
/// can size against the area left by on-screen keyboards and toolbars.
pub fn sync_visual_viewport_vars(window: &Window) -> Result<(), JsValue> {
    let Some(vv) = window.visual_viewport() else {
        return Ok(());
    };
    let Some(root) = window
        .document()
        .and_then(|d| d.document_element())
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    else {
        return Ok(());
    };
    let style = root.style();
    style.set_property("--vvh", &css_px(vv.height()))?;
    style.set_property("--vv-top", &css_px(vv.offset_top()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::css_px;

    #[test]
    fn css_px_rounds() {
        assert_eq!(css_px(812.4), "812px");
        assert_eq!(css_px(0.5), "1px");
        assert_eq!(css_px(0.0), "0px");
    }
}
