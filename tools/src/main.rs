//! grass-runner: headless driver for the Touch The Grass core.
//!
//! Usage:
//!   grass-runner --seed 42 --seconds 600 --cps 6
//!   grass-runner --seed 42 --save-dir ./saves --config balance.json
//!   grass-runner --ipc-mode            (JSON lines on stdin/stdout)
//!
//! In batch mode a simple bot plays through a fixed 800x600 layout,
//! clicking through the same dispatcher a real shell would use.

use anyhow::{Context, Result};
use chrono::Utc;
use grass_core::{
    command::Action,
    config::GameConfig,
    engine::{FrameOutput, GameSession},
    event::GameEvent,
    input::{InputEvent, ModalState, Panel, Region, RegionId},
    snapshot::DisplaySnapshot,
    store::SaveStore,
    types::Point,
};
use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

const FRAME_DT: f64 = 1.0 / 60.0;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Frame {
        #[serde(default = "default_dt")]
        dt:     f64,
        #[serde(default)]
        clicks: Vec<Point>,
    },
    Action {
        action: Action,
    },
    Quit,
}

fn default_dt() -> f64 {
    FRAME_DT
}

#[derive(serde::Serialize)]
struct IpcReply<'a> {
    frame:    u64,
    snapshot: &'a DisplaySnapshot,
    events:   &'a [GameEvent],
    effects:  &'a [grass_core::effects::SideEffect],
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let seconds = parse_arg(&args, "--seconds", 600.0f64);
    let cps = parse_arg(&args, "--cps", 6.0f64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let use_platform_dir = args.iter().any(|a| a == "--platform-save");
    let save_dir = string_arg(&args, "--save-dir");
    let config_path = string_arg(&args, "--config");

    let config = match config_path {
        Some(path) => GameConfig::load(Path::new(path))?,
        None => GameConfig::default(),
    };
    let store = match save_dir {
        Some(dir) => Some(SaveStore::at(dir)),
        None if use_platform_dir => SaveStore::platform_default(),
        None => None,
    };

    if !ipc_mode {
        println!("Touch The Grass: grass-runner");
        println!("  seed:     {seed}");
        println!("  seconds:  {seconds}");
        println!("  cps:      {cps}");
        println!(
            "  save:     {}",
            store.as_ref().map_or("(none)".to_string(), |s| s.path().display().to_string())
        );
        println!();
    }

    let mut session = GameSession::start(config, seed, store, Utc::now());

    if ipc_mode {
        run_ipc_loop(&mut session)
    } else {
        let counts = run_bot(&mut session, seconds, cps);
        print_summary(&session, &counts);
        Ok(())
    }
}

fn run_ipc_loop(session: &mut GameSession) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{err_json}")?;
                stdout.flush()?;
                continue;
            }
        };

        let output = match cmd {
            IpcCommand::Quit => {
                let out = end_session(session);
                write_reply(&mut stdout, &out)?;
                break;
            }
            IpcCommand::GetState => {
                let snapshot = session.snapshot();
                let reply = IpcReply {
                    frame:    session.clock.current_frame,
                    snapshot: &snapshot,
                    events:   &[],
                    effects:  &[],
                };
                writeln!(stdout, "{}", serde_json::to_string(&reply)?)?;
                stdout.flush()?;
                continue;
            }
            IpcCommand::Frame { dt, clicks } => {
                let regions = layout(&session.snapshot());
                let inputs: Vec<InputEvent> =
                    clicks.into_iter().map(|point| InputEvent::Click { point }).collect();
                session.frame(dt, &inputs, &regions)
            }
            IpcCommand::Action { action } => session.act(action),
        };
        write_reply(&mut stdout, &output)?;
    }

    if !session.is_quit() {
        let out = end_session(session);
        write_reply(&mut stdout, &out)?;
    }
    Ok(())
}

/// Quit through the frame loop so the final save is reported like any
/// other event. A failed final save is logged since nobody may be reading
/// the reply.
fn end_session(session: &mut GameSession) -> FrameOutput {
    let out = session.frame(0.0, &[InputEvent::Quit], &[]);
    for event in &out.events {
        if let GameEvent::SaveFailed { reason } = event {
            log::warn!("final save failed: {reason}");
        }
    }
    out
}

fn write_reply(stdout: &mut io::Stdout, out: &FrameOutput) -> Result<()> {
    let reply = IpcReply {
        frame:    out.frame,
        snapshot: &out.snapshot,
        events:   &out.events,
        effects:  &out.effects,
    };
    let json = serde_json::to_string(&reply).context("serializing frame reply")?;
    writeln!(stdout, "{json}")?;
    stdout.flush()?;
    Ok(())
}

// ── Layout ─────────────────────────────────────────────────────────

const GRASS: (f64, f64, f64) = (400.0, 300.0, 90.0);
const BUTTON_W: f64 = 90.0;
const BUTTON_H: f64 = 36.0;
const BUTTON_Y: f64 = 540.0;

fn button_row() -> [RegionId; 8] {
    [
        RegionId::BuyAfk,
        RegionId::BuyMultiplier,
        RegionId::OpenPanel { panel: Panel::Shop },
        RegionId::OpenPanel { panel: Panel::Skills },
        RegionId::OpenPanel { panel: Panel::Stats },
        RegionId::SpinWheel,
        RegionId::Prestige,
        RegionId::SaveGame,
    ]
}

/// The clickable regions for a fixed 800x600 screen.
fn layout(snap: &DisplaySnapshot) -> Vec<Region> {
    let mut regions = Vec::new();

    for special in &snap.specials {
        regions.push(Region::circle(
            RegionId::Special { id: special.id },
            special.position.x,
            special.position.y,
            special.radius,
        ));
    }
    if snap.boss.is_some() {
        regions.push(Region::rect(RegionId::Boss, 600.0, 80.0, 140.0, 140.0));
    }
    for (i, id) in button_row().into_iter().enumerate() {
        let x = 10.0 + i as f64 * (BUTTON_W + 8.0);
        regions.push(Region::rect(id, x, BUTTON_Y, BUTTON_W, BUTTON_H));
    }
    regions.push(Region::rect(RegionId::ToggleSound, 750.0, 10.0, 40.0, 40.0));
    regions.push(Region::rect(RegionId::WipeSave, 700.0, 10.0, 40.0, 40.0));
    regions.push(Region::circle(RegionId::Grass, GRASS.0, GRASS.1, GRASS.2));

    if let ModalState::Open(panel) = snap.modal {
        regions.push(Region::rect(RegionId::CloseModal, 620.0, 110.0, 30.0, 30.0));
        match panel {
            Panel::Shop => {
                for skin in &snap.shop {
                    let y = 150.0 + skin.index as f64 * 45.0;
                    regions.push(Region::rect(RegionId::ShopSkin { index: skin.index }, 180.0, y, 420.0, 40.0));
                }
            }
            Panel::Skills => {
                for (i, skill) in snap.skills.iter().enumerate() {
                    let y = 150.0 + i as f64 * 45.0;
                    regions.push(Region::rect(RegionId::SkillNode { skill: skill.skill }, 180.0, y, 420.0, 40.0));
                }
            }
            Panel::Stats => {}
        }
    }
    regions
}

fn centre(regions: &[Region], id: RegionId) -> Option<Point> {
    regions.iter().find(|r| r.id == id).map(|r| match r.shape {
        grass_core::input::Shape::Rect { x, y, w, h } => Point::new(x + w / 2.0, y + h / 2.0),
        grass_core::input::Shape::Circle { cx, cy, .. } => Point::new(cx, cy),
    })
}

// ── Bot ────────────────────────────────────────────────────────────

/// What the bot wants to press this frame, besides its regular clicks.
fn bot_intent(snap: &DisplaySnapshot) -> Option<RegionId> {
    match snap.modal {
        ModalState::Open(Panel::Shop) => {
            let next = snap.shop.iter().find(|s| s.purchasable);
            return Some(next.map_or(RegionId::CloseModal, |s| RegionId::ShopSkin { index: s.index }));
        }
        ModalState::Open(Panel::Skills) => {
            let next = snap.skills.iter().find(|s| s.available);
            return Some(next.map_or(RegionId::CloseModal, |s| RegionId::SkillNode { skill: s.skill }));
        }
        ModalState::Open(Panel::Stats) => return Some(RegionId::CloseModal),
        ModalState::Closed => {}
    }

    if snap.prestige_available && snap.prestige_seeds_preview >= 3 {
        Some(RegionId::Prestige)
    } else if snap.shop.iter().any(|s| s.purchasable) {
        Some(RegionId::OpenPanel { panel: Panel::Shop })
    } else if snap.skills.iter().any(|s| s.available) {
        Some(RegionId::OpenPanel { panel: Panel::Skills })
    } else if snap.wheel_ready {
        Some(RegionId::SpinWheel)
    } else if snap.afk_affordable {
        Some(RegionId::BuyAfk)
    } else if snap.multiplier_affordable {
        Some(RegionId::BuyMultiplier)
    } else {
        None
    }
}

fn bot_target(snap: &DisplaySnapshot) -> RegionId {
    if let Some(special) = snap.specials.first() {
        RegionId::Special { id: special.id }
    } else if snap.boss.is_some() {
        RegionId::Boss
    } else {
        RegionId::Grass
    }
}

fn run_bot(session: &mut GameSession, seconds: f64, cps: f64) -> BTreeMap<&'static str, u64> {
    let mut counts: BTreeMap<&'static str, u64> = BTreeMap::new();
    let frames = (seconds / FRAME_DT).ceil() as u64;
    let mut click_budget = 0.0;
    let mut snap = session.snapshot();

    for i in 0..frames {
        let regions = layout(&snap);
        let mut inputs = Vec::new();

        // One deliberate button press every half second.
        if i % 30 == 0 {
            if let Some(point) = bot_intent(&snap).and_then(|id| centre(&regions, id)) {
                inputs.push(InputEvent::Click { point });
            }
        }
        click_budget += cps * FRAME_DT;
        while click_budget >= 1.0 && snap.modal == ModalState::Closed {
            if let Some(point) = centre(&regions, bot_target(&snap)) {
                inputs.push(InputEvent::Click { point });
            }
            click_budget -= 1.0;
        }

        let out = session.frame(FRAME_DT, &inputs, &regions);
        for event in &out.events {
            *counts.entry(event.type_name()).or_default() += 1;
        }
        snap = out.snapshot;
    }

    let out = end_session(session);
    for event in &out.events {
        *counts.entry(event.type_name()).or_default() += 1;
    }
    counts
}

fn print_summary(session: &GameSession, counts: &BTreeMap<&'static str, u64>) {
    let snap = session.snapshot();
    println!("Run complete.");
    println!("  frames:          {}", session.clock.current_frame);
    println!("  money:           {}", snap.money_display);
    println!("  income:          {}", snap.income_display);
    println!("  multiplier:      {:.1}", snap.multiplier);
    println!("  grass:           {}", snap.grass_name);
    println!("  total clicks:    {}", snap.stats.total_clicks);
    println!("  best combo:      {}", snap.stats.best_combo);
    println!("  prestige level:  {}", snap.stats.prestige_level);
    println!("  bosses defeated: {}", snap.stats.bosses_defeated);
    println!(
        "  achievements:    {}/{}",
        snap.stats.achievements_unlocked, snap.stats.achievements_total
    );
    println!();
    println!("Events:");
    for (name, count) in counts {
        println!("  {name:<20} {count}");
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
