//! Aftersales Desk
//!
//! After-sales ticket dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Login gate with a persisted session
//! - Dashboard with status counts, category and trend charts
//! - Filterable, paginated ticket list
//! - Ticket create/edit form and detail page with status actions
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Session, routing and page rules come from the `aftersales`
//! core crate; this crate only renders them and talks HTTP to the ticket
//! server.

use leptos::*;

mod api;
mod app;
mod auth;
mod components;
mod logging;
mod pages;
mod state;

#[cfg(test)]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();
    logging::init();

    mount_to_body(|| view! { <app::App /> });
}
