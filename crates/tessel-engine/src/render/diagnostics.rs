//! Graphics-state error checks.
//!
//! Called after uploads and draws. Errors are logged and execution continues;
//! debug builds additionally trip an assertion so broken state is noticed
//! during development.

use super::GraphicsBackend;

/// Drains every pending backend error, logs it, and returns how many there
/// were.
pub fn check_graphics_state<B: GraphicsBackend + ?Sized>(backend: &mut B, context: &'static str) -> usize {
    let mut count = 0;
    while let Some(msg) = backend.take_error() {
        log::error!("graphics state error after {context}: {msg}");
        count += 1;
    }

    debug_assert!(count == 0, "{count} graphics state error(s) after {context}");
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;

    #[test]
    fn clean_backend_passes() {
        let mut b = HeadlessBackend::new();
        assert_eq!(check_graphics_state(&mut b, "test"), 0);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "graphics state error(s) after upload")]
    fn pending_error_trips_debug_assertion() {
        let mut b = HeadlessBackend::new();
        b.push_error("invalid operation");
        check_graphics_state(&mut b, "upload");
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn pending_errors_are_drained_and_counted() {
        let mut b = HeadlessBackend::new();
        b.push_error("first");
        b.push_error("second");
        assert_eq!(check_graphics_state(&mut b, "draw"), 2);
        assert_eq!(check_graphics_state(&mut b, "draw"), 0);
    }
}
