pub mod address_search;
pub mod error;
pub mod loading;
pub mod wishlist_panel;

// Re-export commonly used types
pub use address_search::AddressSearch;
pub use wishlist_panel::WishlistPanel;

/// Blocking user prompt, the reporting channel for input-validation errors.
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Blocking confirmation gate for destructive actions. Defaults to "no"
/// when the window is unavailable.
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}
