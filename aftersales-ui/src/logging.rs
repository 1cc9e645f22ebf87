//! Console logging
//!
//! The core crate logs through `tracing`. With tracing's `log` feature and
//! no subscriber installed, those events are forwarded as `log` records,
//! which `wasm-logger` writes to the browser console.

/// Route `log` (and forwarded `tracing`) records to the console
pub fn init() {
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn session_warnings_reach_the_console() {
        init();
        // Calling twice must not panic
        init();

        assert!(log::log_enabled!(
            target: "aftersales::session::store",
            log::Level::Warn
        ));
        assert!(!log::log_enabled!(target: "aftersales", log::Level::Debug));
    }
}
