// src/cli/progress.rs — Busy indicator for provider round trips

use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

/// Spinner on stderr while `fut` runs. With `enabled == false` the future is
/// awaited without any output.
pub async fn with_spinner<F>(enabled: bool, message: &str, fut: F) -> F::Output
where
    F: Future,
{
    if !enabled {
        return fut.await;
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = fut.await;
    spinner.finish_and_clear();
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_spinner_passes_output_through() {
        let v = with_spinner(false, "working", async { 41 + 1 }).await;
        assert_eq!(v, 42);
    }

    #[tokio::test]
    async fn test_enabled_spinner_passes_output_through() {
        let v = with_spinner(true, "working", async { "done" }).await;
        assert_eq!(v, "done");
    }
}
