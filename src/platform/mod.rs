//! Platform abstraction layer
//!
//! The simulation never touches the host. Browser/WebXR hosts drive it
//! through `web::WebSession`; native hosts use `sim` directly (see `main.rs`).

#[cfg(target_arch = "wasm32")]
pub mod web;
