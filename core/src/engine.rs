//! The game session: one running game from start to quit.
//!
//! EXECUTION ORDER per frame (fixed, documented, never reordered):
//!   1. Income subsystem
//!   2. Combo subsystem
//!   3. Power-up subsystem
//!   4. Weather subsystem
//!   5. Boss subsystem
//!   6. Special collectible subsystem
//!   7. Wheel subsystem
//!   8. Autosave subsystem
//!   9. Stats subsystem
//!  10. Achievement subsystem
//! then the frame's input events are dispatched and applied in order,
//! then any due save is written, then effects and the snapshot are built.
//!
//! RULES:
//!   - Subsystems execute in registration order, every frame.
//!   - Each input click resolves to at most one action.
//!   - All randomness flows through the RngBank.
//!   - Persistence failures never end the session; they become events.

use crate::{
    achievement_subsystem::AchievementSubsystem,
    achievements,
    autosave_subsystem::AutosaveSubsystem,
    boss_subsystem::{self, BossSubsystem},
    clock::FrameClock,
    combo_subsystem::ComboSubsystem,
    command::Action,
    config::{GameConfig, Season},
    economy_rules,
    effects::{self, SideEffect},
    error::GameError,
    event::GameEvent,
    income_subsystem::IncomeSubsystem,
    input::{self, InputEvent, ModalState, Region},
    offline,
    powerup_subsystem::PowerupSubsystem,
    prestige_rules,
    rng::{RngBank, SubsystemRng, SubsystemSlot},
    skill_tree,
    snapshot::{self, DisplaySnapshot, UiState, NOTIFICATION_SECONDS, SAVE_NOTICE_SECONDS},
    special_subsystem::{self, SpecialSubsystem},
    state::EconomyState,
    stats_subsystem::StatsSubsystem,
    store::SaveStore,
    subsystem::{TickContext, TickSubsystem},
    types::{Frame, Seconds},
    weather_subsystem::WeatherSubsystem,
    wheel_subsystem::{self, WheelSubsystem},
};
use chrono::{DateTime, Utc};

/// What the shell gets back from one frame.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub frame:    Frame,
    pub snapshot: DisplaySnapshot,
    pub effects:  Vec<SideEffect>,
    pub events:   Vec<GameEvent>,
    /// The session has ended; the shell should close.
    pub quit:     bool,
}

// Streams used by player actions during one frame. Refreshed at the start
// of every frame so several clicks in one frame draw successive values.
struct ActionRngs {
    click:   SubsystemRng,
    powerup: SubsystemRng,
    wheel:   SubsystemRng,
}

impl ActionRngs {
    fn for_frame(bank: &RngBank, frame: Frame) -> Self {
        Self {
            click:   bank.for_subsystem_at_frame(SubsystemSlot::Click, frame),
            powerup: bank.for_subsystem_at_frame(SubsystemSlot::Powerup, frame),
            wheel:   bank.for_subsystem_at_frame(SubsystemSlot::Wheel, frame),
        }
    }
}

pub struct GameSession {
    pub state:  EconomyState,
    pub ui:     UiState,
    pub clock:  FrameClock,
    config:     GameConfig,
    rng_bank:   RngBank,
    subsystems: Vec<(SubsystemSlot, Box<dyn TickSubsystem>)>,
    store:      Option<SaveStore>,
    actions:    ActionRngs,
    /// Session-start events not yet handed to the shell.
    pending:    Vec<GameEvent>,
    quit:       bool,
}

impl GameSession {
    /// Load the saved game (or start fresh), apply the seasonal bonus,
    /// offline earnings and the daily login reward. The resulting events
    /// are delivered with the first frame.
    pub fn start(
        config: GameConfig,
        seed:   u64,
        store:  Option<SaveStore>,
        now:    DateTime<Utc>,
    ) -> Self {
        let state = match &store {
            Some(store) => store.load_state(&config),
            None => {
                log::warn!("No save directory available; progress will not be saved");
                EconomyState::new(&config)
            }
        };
        let mut session = Self::build(config, seed, state, store);

        let today = now.date_naive();
        let season = Season::for_date(today);
        session.state.seasonal_multiplier = session.config.seasons.multiplier(season);

        let mut events = vec![GameEvent::SessionStarted { seed }];
        events.extend(offline::apply_offline_progress(&mut session.state, &session.config, now));
        events.extend(offline::register_login(&mut session.state, &session.config, today));
        session.state.last_play_time = Some(now);

        log::info!(
            "Session started: seed={seed} season={season:?} money={:.0}",
            session.state.money
        );
        session.pending = events;
        session
    }

    /// Wire a session around an existing state with every subsystem
    /// registered. No session-start bookkeeping is done.
    pub fn build(
        config: GameConfig,
        seed:   u64,
        state:  EconomyState,
        store:  Option<SaveStore>,
    ) -> Self {
        let rng_bank = RngBank::new(seed);
        let actions = ActionRngs::for_frame(&rng_bank, 0);
        let mut session = Self {
            state,
            ui: UiState::default(),
            clock: FrameClock::new(),
            config,
            rng_bank,
            subsystems: Vec::new(),
            store,
            actions,
            pending: Vec::new(),
            quit: false,
        };

        // EXECUTION ORDER: fixed, documented, never reordered.
        let c = session.config.clone();
        session.register(SubsystemSlot::Engine, Box::new(IncomeSubsystem));
        session.register(SubsystemSlot::Engine, Box::new(ComboSubsystem));
        session.register(SubsystemSlot::Engine, Box::new(PowerupSubsystem));
        session.register(SubsystemSlot::Weather, Box::new(WeatherSubsystem::new(c.weather.clone())));
        session.register(SubsystemSlot::Boss, Box::new(BossSubsystem::new(c.boss.clone())));
        session.register(SubsystemSlot::Special, Box::new(SpecialSubsystem::new(c.specials.clone())));
        session.register(SubsystemSlot::Engine, Box::new(WheelSubsystem));
        session.register(SubsystemSlot::Engine, Box::new(AutosaveSubsystem::new(c.autosave.interval)));
        session.register(SubsystemSlot::Engine, Box::new(StatsSubsystem));
        session.register(
            SubsystemSlot::Engine,
            Box::new(AchievementSubsystem::new(achievements::catalogue(&c))),
        );
        session
    }

    /// Register a subsystem. Call in the documented execution order.
    pub fn register(&mut self, slot: SubsystemSlot, subsystem: Box<dyn TickSubsystem>) {
        self.subsystems.push((slot, subsystem));
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.seed()
    }

    pub fn store(&self) -> Option<&SaveStore> {
        self.store.as_ref()
    }

    pub fn is_quit(&self) -> bool {
        self.quit
    }

    pub fn subsystem_names(&self) -> Vec<&'static str> {
        self.subsystems.iter().map(|(_, s)| s.name()).collect()
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        snapshot::snapshot(&self.state, &self.ui, &self.config)
    }

    /// Advance one frame. This is the core game step.
    pub fn frame(
        &mut self,
        raw_dt:  Seconds,
        inputs:  &[InputEvent],
        regions: &[Region],
    ) -> FrameOutput {
        let mut events = std::mem::take(&mut self.pending);
        if self.quit {
            return self.finish(self.clock.current_frame, events);
        }

        let (frame, dt) = self.clock.advance(raw_dt);
        let ctx = TickContext { frame, dt };

        // Each subsystem sees all events emitted so far this frame.
        for (slot, subsystem) in &mut self.subsystems {
            let mut rng = self.rng_bank.for_subsystem_at_frame(*slot, frame);
            let new_events = subsystem.update(ctx, &mut self.state, &events, &mut rng);
            for event in &new_events {
                log::debug!("frame={frame} {}: {}", subsystem.name(), event.type_name());
            }
            events.extend(new_events);
        }
        self.ui.tick(dt);

        self.actions = ActionRngs::for_frame(&self.rng_bank, frame);
        for input in inputs {
            match input {
                InputEvent::Click { point } => {
                    if let Some(action) = input::dispatch(&self.ui.modal, regions, *point) {
                        events.extend(self.apply_action(action));
                    }
                }
                InputEvent::Quit => {
                    events.extend(self.quit());
                    break;
                }
            }
        }

        let autosave_due = events.iter().any(|e| matches!(e, GameEvent::AutosaveDue { .. }));
        if autosave_due && !self.quit {
            if self.store.is_some() {
                events.push(self.save_at(Utc::now(), false));
            } else {
                log::debug!("frame={frame} autosave skipped: no save directory");
            }
        }

        self.finish(frame, events)
    }

    /// Apply one action outside the frame loop without advancing time.
    pub fn act(&mut self, action: Action) -> FrameOutput {
        let mut events = std::mem::take(&mut self.pending);
        if !self.quit {
            events.extend(self.apply_action(action));
        }
        self.finish(self.clock.current_frame, events)
    }

    fn finish(&mut self, frame: Frame, events: Vec<GameEvent>) -> FrameOutput {
        let mut side_effects = Vec::new();
        for event in &events {
            for effect in effects::effects_for(event, &self.state, &self.config) {
                if let SideEffect::ShowNotification { text, color } = &effect {
                    let duration = if matches!(event, GameEvent::GameSaved { .. }) {
                        SAVE_NOTICE_SECONDS
                    } else {
                        NOTIFICATION_SECONDS
                    };
                    self.ui.notify(text.clone(), *color, duration);
                }
                side_effects.push(effect);
            }
        }

        FrameOutput {
            frame,
            snapshot: self.snapshot(),
            effects: side_effects,
            events,
            quit: self.quit,
        }
    }

    /// Carry out one player action against the current state.
    pub fn apply_action(&mut self, action: Action) -> Vec<GameEvent> {
        log::debug!("frame={} action {}", self.clock.current_frame, action.type_name());
        let config = &self.config;
        let state = &mut self.state;

        match action {
            Action::CloseModal => self.close_modal().into_iter().collect(),
            Action::OpenPanel { panel } => {
                if self.ui.modal == ModalState::Open(panel) {
                    return self.close_modal().into_iter().collect();
                }
                let mut out: Vec<GameEvent> = self.close_modal().into_iter().collect();
                self.ui.modal = ModalState::Open(panel);
                out.push(GameEvent::PanelOpened { panel });
                out
            }
            Action::SelectSkin { index } => economy_rules::select_skin(state, config, index),
            Action::BuySkill { skill } => skill_tree::buy_skill(state, config, skill),
            Action::CollectSpecial { id } => {
                special_subsystem::collect_special(state, config, id, &mut self.actions.powerup)
            }
            Action::AttackBoss => boss_subsystem::attack_boss(state, config, &mut self.actions.click),
            Action::ClickGrass { at } => {
                economy_rules::click_grass(state, config, at, &mut self.actions.click)
            }
            Action::BuyAfk => economy_rules::buy_afk_upgrade(state, config),
            Action::BuyMultiplier => economy_rules::buy_multiplier_upgrade(state, config),
            Action::SaveGame => vec![self.save_at(Utc::now(), true)],
            Action::WipeSave => self.wipe(),
            Action::SpinWheel => wheel_subsystem::spin_wheel(state, config, &mut self.actions.wheel),
            Action::Prestige => prestige_rules::perform_prestige(state, config),
            Action::ToggleSound => {
                state.settings.sound_enabled = !state.settings.sound_enabled;
                vec![GameEvent::SoundToggled { enabled: state.settings.sound_enabled }]
            }
        }
    }

    fn close_modal(&mut self) -> Option<GameEvent> {
        let panel = self.ui.modal.open_panel()?;
        self.ui.modal = ModalState::Closed;
        Some(GameEvent::PanelClosed { panel })
    }

    /// Write the save document stamped with `now`. Failures are reported as
    /// a `SaveFailed` event, never as a panic.
    pub fn save_at(&mut self, now: DateTime<Utc>, manual: bool) -> GameEvent {
        let Some(store) = &self.store else {
            let reason = GameError::NoSaveDirectory.to_string();
            log::warn!("Save skipped: {reason}");
            return GameEvent::SaveFailed { reason };
        };

        self.state.last_play_time = Some(now);
        match store.save(&self.state) {
            Ok(()) => GameEvent::GameSaved { manual },
            Err(e) => {
                log::warn!("Save failed: {e}");
                GameEvent::SaveFailed { reason: e.to_string() }
            }
        }
    }

    /// Save now.
    pub fn save(&mut self) -> GameEvent {
        self.save_at(Utc::now(), true)
    }

    /// Reset to a brand-new game and delete the save file. Settings are kept.
    pub fn wipe(&mut self) -> Vec<GameEvent> {
        prestige_rules::wipe(&mut self.state, &self.config);
        self.ui = UiState::default();

        let mut out = Vec::new();
        if let Some(store) = &self.store {
            if let Err(e) = store.delete() {
                log::warn!("Could not delete save: {e}");
                out.push(GameEvent::SaveFailed { reason: e.to_string() });
            }
        }
        out.push(GameEvent::SaveWiped);
        out
    }

    /// Final save and shutdown. Further frames only return a snapshot.
    pub fn quit(&mut self) -> Vec<GameEvent> {
        if self.quit {
            return vec![];
        }
        let mut out = Vec::new();
        if self.store.is_some() {
            out.push(self.save_at(Utc::now(), false));
        }
        self.quit = true;
        log::info!("Session ended at frame {}", self.clock.current_frame);
        out.push(GameEvent::QuitRequested);
        out
    }
}
