//! Touch The Grass: the economy, persistence and simulation core of an
//! idle clicker.
//!
//! The crate is headless. A presentation shell feeds `GameSession::frame`
//! a delta time, the frame's input events and the clickable regions it
//! drew; it gets back a display snapshot and side-effect requests.

pub mod achievement_subsystem;
pub mod achievements;
pub mod autosave_subsystem;
pub mod boss_subsystem;
pub mod clock;
pub mod combo_subsystem;
pub mod command;
pub mod config;
pub mod economy_rules;
pub mod effects;
pub mod engine;
pub mod error;
pub mod event;
pub mod income_subsystem;
pub mod input;
pub mod offline;
pub mod powerup_subsystem;
pub mod prestige_rules;
pub mod rng;
pub mod save_document;
pub mod skill_tree;
pub mod snapshot;
pub mod special_subsystem;
pub mod state;
pub mod stats_subsystem;
pub mod store;
pub mod subsystem;
pub mod types;
pub mod weather_subsystem;
pub mod wheel_subsystem;
