//! XR Breakout headless runner
//!
//! Runs a session without a renderer or XR runtime: the paddle follows the
//! ball on its own and every event is logged. Useful for tuning presets.
//!
//! Usage: `xr-breakout [preset | config.json] [frames]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let source = args.next().unwrap_or_else(|| "pong-cube".to_string());
    let frames = match args.next().map(|s| s.parse::<u64>()) {
        None => 72 * 60,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            log::error!("Invalid frame count: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(&source) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("XR Breakout (headless) starting: {source}, {frames} frames");
    match run(config, frames) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web, this is just to satisfy the compiler
}

/// Preset name, or a path to a JSON config file
#[cfg(not(target_arch = "wasm32"))]
fn load_config(source: &str) -> Result<xr_breakout::GameConfig, xr_breakout::ConfigError> {
    use xr_breakout::{ConfigError, GameConfig, Preset};

    if let Some(preset) = Preset::from_str(source) {
        return Ok(GameConfig::from_preset(preset));
    }
    let path = std::path::Path::new(source);
    if path.extension().is_some_and(|ext| ext == "json") {
        return GameConfig::from_file(path);
    }
    Err(ConfigError::UnknownPreset(source.to_string()))
}

/// Simulated headset refresh rate
#[cfg(not(target_arch = "wasm32"))]
const FRAME_RATE_HZ: f64 = 72.0;

#[cfg(not(target_arch = "wasm32"))]
fn run(
    config: xr_breakout::GameConfig,
    frames: u64,
) -> Result<String, xr_breakout::ConfigError> {
    use glam::Vec3;
    use xr_breakout::sim::{GameEvent, GameSession, Placement, TickInput, tick};

    let mut session = GameSession::new(config)?;

    // Head height, one metre in front of the viewer
    let anchor = Vec3::new(0.0, 1.6, -1.0);
    tick(
        &mut session,
        &TickInput {
            placement: Some(Placement::at(anchor)),
            ..Default::default()
        },
    );

    for frame in 1..=frames {
        let now_ms = (frame as f64 * 1000.0 / FRAME_RATE_HZ) as u64;
        let input = TickInput {
            now_ms,
            pointer: Some(autopilot_pointer(&session)),
            ..Default::default()
        };
        tick(&mut session, &input);

        for event in session.drain_events() {
            match event {
                GameEvent::Bounce(_) => log::debug!("[{frame}] {event:?}"),
                _ => log::info!("[{frame}] {event:?}"),
            }
        }
        if session.phase == xr_breakout::sim::GamePhase::Over {
            break;
        }
    }

    Ok(format!(
        "phase {:?}, score {}, lives {}, level {}, frames {}",
        session.phase, session.ledger.score, session.ledger.lives, session.level, session.frame
    ))
}

/// Track the ball with a wandering offset so rallies do not loop forever
#[cfg(not(target_arch = "wasm32"))]
fn autopilot_pointer(session: &xr_breakout::sim::GameSession) -> glam::Vec3 {
    use xr_breakout::PaddleMode;

    let t = session.frame as f32 * 0.01;
    let wobble = (t.sin() * 0.6 + (t * 0.7).sin() * 0.3) * session.paddle.half.x;
    let ball = session.ball.pos;
    let local = match session.config.mode {
        PaddleMode::Pong3d => glam::Vec3::new(ball.x + wobble, ball.y, 0.0),
        PaddleMode::Breakout2d => glam::Vec3::new(ball.x + wobble, 0.0, 0.0),
    };
    session.group.to_world(local)
}
