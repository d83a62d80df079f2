// src/core/mod.rs — Prompt session core

pub mod controller;
pub mod generation;
pub mod session;
