use web_sys as web;

use crate::dom::set_visible;

const START_OVERLAY: &str = "start-overlay";
const GALLERY_NAV: &str = "gallery-nav";

/// Dormant page: start overlay up, navigation hidden.
#[inline]
pub fn show_dormant(document: &web::Document) {
    set_visible(document, START_OVERLAY, true);
    set_visible(document, GALLERY_NAV, false);
}

/// Revealed page: overlay gone, navigation available.
#[inline]
pub fn show_revealed(document: &web::Document) {
    set_visible(document, START_OVERLAY, false);
    set_visible(document, GALLERY_NAV, true);
}
