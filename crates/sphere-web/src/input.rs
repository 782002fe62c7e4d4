use glam::Vec2;
use sphere_core::{SurfaceRect, Viewport};
use web_sys as web;

#[inline]
pub fn mouse_client(ev: &web::MouseEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}

/// First active touch, or `None` once every finger has lifted.
#[inline]
pub fn first_touch_client(ev: &web::TouchEvent) -> Option<Vec2> {
    ev.touches()
        .get(0)
        .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32))
}

/// Window size for the gesture mappings, canvas client rect for picking.
pub fn viewport_for(window: &web::Window, canvas: &web::HtmlCanvasElement) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    let inner_w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(rect.width());
    let inner_h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(rect.height());
    Viewport {
        window: Vec2::new(inner_w as f32, inner_h as f32),
        surface: SurfaceRect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ),
    }
}
