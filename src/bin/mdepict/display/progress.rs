use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Numbered step-by-step progress on stderr. Construction with
/// `enabled = false` turns every call into a no-op, which is how quiet
/// and non-interactive runs stay silent.
pub struct Progress {
    enabled: bool,
    spinner: Option<ProgressBar>,
    current: u8,
    total: u8,
    run_start: Instant,
    step_start: Instant,
}

impl Progress {
    pub fn new(enabled: bool, total: u8) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            spinner: None,
            current: 0,
            total,
            run_start: now,
            step_start: now,
        }
    }

    /// Starts the next numbered step; a spinner ticks until the step
    /// is completed or replaced.
    pub fn step(&mut self, description: &str) {
        if !self.enabled {
            return;
        }
        self.clear_spinner();
        self.current += 1;
        self.step_start = Instant::now();

        let spinner = ProgressBar::new_spinner().with_message(format!(
            "[{}/{}] {description}...",
            self.current, self.total
        ));
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .expect("static spinner template"),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    /// Swaps the spinner for a checked completion line, followed by
    /// one dimmed line per substep.
    pub fn complete_step(&mut self, description: &str, substeps: &[&str]) {
        if !self.enabled {
            return;
        }
        self.clear_spinner();

        let elapsed = self.step_start.elapsed().as_secs_f64();
        let mut stderr = io::stderr().lock();
        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m {description:<44} {elapsed:>5.1}s"
        );
        for substep in substeps {
            let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {substep}");
        }
    }

    /// Prints the closing rule with the total wall time.
    pub fn finish(mut self) {
        if !self.enabled {
            return;
        }
        self.clear_spinner();

        let total = self.run_start.elapsed().as_secs_f64();
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr);
        let _ = writeln!(stderr, "  \x1b[2m{}\x1b[0m", "─".repeat(54));
        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m Depiction complete {:>33}",
            format!("Total: {total:.2}s")
        );
        let _ = writeln!(stderr);
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}
