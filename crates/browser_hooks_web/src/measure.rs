//! Viewport and element measurement.

use std::rc::Rc;

use browser_hooks_core::{BoxMetrics, HookError, Size, Subscription};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

/// Reads `window.innerWidth` / `window.innerHeight`.
pub fn viewport_size() -> Option<Size> {
    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window()?;
        let width = window.inner_width().ok()?.as_f64()?;
        let height = window.inner_height().ok()?.as_f64()?;
        return Some(Size::from_css_pixels(width, height));
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

/// Reads both the offset and client boxes of `element`.
pub fn element_metrics(element: &web_sys::HtmlElement) -> BoxMetrics {
    BoxMetrics {
        offset_width: element.offset_width(),
        offset_height: element.offset_height(),
        client_width: element.client_width(),
        client_height: element.client_height(),
    }
}

/// Returns whether the host exposes `ResizeObserver`.
pub fn resize_observer_supported() -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .map(|window| {
                js_sys::Reflect::has(&window, &JsValue::from_str("ResizeObserver"))
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        false
    }
}

/// Observes `element` with a `ResizeObserver`; the subscription disconnects it.
///
/// # Errors
///
/// Returns [`HookError::Unavailable`] when `ResizeObserver` is missing, or the constructor's
/// error.
pub fn observe_element_resize(
    element: &web_sys::Element,
    callback: Rc<dyn Fn()>,
) -> Result<Subscription, HookError> {
    #[cfg(target_arch = "wasm32")]
    {
        if !resize_observer_supported() {
            return Err(HookError::Unavailable("ResizeObserver"));
        }
        let closure = Closure::<dyn FnMut()>::wrap(Box::new(move || callback()));
        let observer = web_sys::ResizeObserver::new(closure.as_ref().unchecked_ref())
            .map_err(crate::js_error)?;
        observer.observe(element);
        return Ok(Subscription::new(move || {
            observer.disconnect();
            drop(closure);
        }));
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (element, callback);
        Err(HookError::Unavailable("ResizeObserver"))
    }
}
