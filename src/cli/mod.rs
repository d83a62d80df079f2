// src/cli/mod.rs — CLI definition (clap derive)

pub mod commands;
pub mod playground;
pub mod progress;
pub mod render;

use clap::Parser;

use crate::core::generation::GenerationConfig;

#[derive(Parser, Debug)]
#[command(
    name = "promptlab",
    about = "Interactive prompt playground for Gemini models",
    version
)]
pub struct Cli {
    /// Model to preselect when the provider offers it
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature (clamped to 0.0-1.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Nucleus sampling top-p (clamped to 0.0-1.0)
    #[arg(long)]
    pub top_p: Option<f32>,

    /// Top-k sampling (clamped to 0-100)
    #[arg(long)]
    pub top_k: Option<u32>,

    /// Maximum output tokens (clamped to 10-2048)
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Hide the busy spinner
    #[arg(long)]
    pub quiet: bool,

    /// Config file path
    #[arg(long)]
    pub config: Option<String>,
}

impl Cli {
    /// Overlay any sampling flags on `base`. Out-of-range flags are clamped.
    pub fn apply_generation_overrides(&self, base: GenerationConfig) -> GenerationConfig {
        let mut config = base;
        if let Some(t) = self.temperature {
            config.set_temperature(t);
        }
        if let Some(p) = self.top_p {
            config.set_top_p(p);
        }
        if let Some(k) = self.top_k {
            config.set_top_k(k);
        }
        if let Some(m) = self.max_tokens {
            config.set_max_output_tokens(m);
        }
        config
    }
}
