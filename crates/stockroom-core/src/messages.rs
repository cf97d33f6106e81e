// ── Recognized-message catalog ──
//
// Expected business-rule failures (conflicts, duplicates) are shown to the
// user verbatim; anything else — network faults, unexpected server errors —
// collapses to a generic fallback so internals never leak into the UI.

use stockroom_api::Error;

/// Fallback shown for any failure outside the catalog.
pub const GENERIC_FAILURE: &str = "Something went wrong.";

/// Backend messages the console knows how to show as-is.
pub const RECOGNIZED_MESSAGES: &[&str] = &[
    "Cannot delete a category that still has products.",
    "Cannot delete a product that is referenced by an order.",
    "A category with this name already exists.",
    "A product with this name already exists.",
    "An admin with this email already exists.",
];

/// Translate a transport error into the string shown to the user.
pub fn user_message(err: &Error) -> String {
    match err.server_message() {
        Some(msg) if RECOGNIZED_MESSAGES.contains(&msg) => msg.to_owned(),
        _ => GENERIC_FAILURE.to_owned(),
    }
}
