//! Browser bindings
//!
//! The WebXR page owns the scene, controllers and audio. Each animation
//! frame it pushes the latest pointer/placement into a `WebSession`, calls
//! `frame`, and reacts to the returned JSON events (bounce sounds, score UI,
//! brick meshes).

use glam::{Quat, Vec3};
use wasm_bindgen::prelude::*;

use crate::config::{GameConfig, Preset};
use crate::sim::{GameSession, Placement, TickInput, tick};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Only fails if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// A game session plus the inputs queued for the next frame
#[wasm_bindgen]
pub struct WebSession {
    session: GameSession,
    pointer: Option<Vec3>,
    placement: Option<Placement>,
    origin: Option<Vec3>,
}

#[wasm_bindgen]
impl WebSession {
    /// Build from a JSON config; an empty string uses the default preset
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WebSession, JsValue> {
        let config = if config_json.trim().is_empty() {
            GameConfig::default()
        } else {
            GameConfig::from_json(config_json).map_err(to_js)?
        };
        Self::with_config(config)
    }

    /// Build from a preset name such as `"breakout-lives"`
    #[wasm_bindgen(js_name = fromPreset)]
    pub fn from_preset(name: &str) -> Result<WebSession, JsValue> {
        let preset =
            Preset::from_str(name).ok_or_else(|| to_js(format!("unknown preset: {name}")))?;
        log::info!("Starting preset {}", preset.as_str());
        Self::with_config(GameConfig::from_preset(preset))
    }

    fn with_config(config: GameConfig) -> Result<WebSession, JsValue> {
        let session = GameSession::new(config).map_err(to_js)?;
        Ok(Self {
            session,
            pointer: None,
            placement: None,
            origin: None,
        })
    }

    /// Hit-test placement confirmed by the player
    #[allow(clippy::too_many_arguments)]
    pub fn place(&mut self, x: f32, y: f32, z: f32, qx: f32, qy: f32, qz: f32, qw: f32) {
        // Normalized, or rejected if degenerate, by GameSession::place
        self.placement = Some(Placement {
            point: Vec3::new(x, y, z),
            orientation: Quat::from_xyzw(qx, qy, qz, qw),
        });
    }

    /// The play volume was re-anchored in world space
    #[wasm_bindgen(js_name = setOrigin)]
    pub fn set_origin(&mut self, x: f32, y: f32, z: f32) {
        self.origin = Some(Vec3::new(x, y, z));
    }

    /// Pointer / controller projection for the next frame
    #[wasm_bindgen(js_name = setPointer)]
    pub fn set_pointer(&mut self, x: f32, y: f32, z: f32) {
        self.pointer = Some(Vec3::new(x, y, z));
    }

    #[wasm_bindgen(js_name = clearPointer)]
    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    /// Advance one frame and return the events it produced as JSON
    pub fn frame(&mut self, now_ms: f64) -> String {
        let input = TickInput {
            now_ms: now_ms.max(0.0) as u64,
            pointer: self.pointer.take(),
            placement: self.placement.take(),
            origin: self.origin.take(),
        };
        tick(&mut self.session, &input);
        let events = self.session.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::error!("Failed to encode events: {e}");
            "[]".to_string()
        })
    }

    /// Entity positions and ledger as JSON, for syncing meshes
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_else(|e| {
            log::error!("Failed to encode snapshot: {e}");
            "{}".to_string()
        })
    }
}
