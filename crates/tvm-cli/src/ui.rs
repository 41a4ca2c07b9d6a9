//! Terminal output helpers: plain status lines plus an indicatif-backed
//! `ProgressSink` for downloads.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tvm_core::ports::ProgressSink;

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Consistent status-line formatting, mirroring the front-end's habit of
/// routing every print through one small helper rather than ad-hoc
/// `println!`s scattered across command handlers.
pub struct UI;

impl UI {
    pub fn set_verbose(verbose: bool) {
        VERBOSE.store(verbose, Ordering::Relaxed);
    }

    pub fn is_verbose() -> bool {
        VERBOSE.load(Ordering::Relaxed)
    }

    pub fn info(message: &str) {
        println!("{} {}", "i".blue(), message);
    }

    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    pub fn warn(message: &str) {
        println!("{} {}", "!".yellow(), message.yellow());
    }

    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message.red());
    }

    pub fn debug(message: &str) {
        if Self::is_verbose() {
            println!("{} {}", "→".purple(), message.dimmed());
        }
    }

    pub fn hint(message: &str) {
        println!("  {} {}", "hint:".cyan(), message.dimmed());
    }

    pub fn item(message: &str) {
        println!("  {message}");
    }

    pub fn header(message: &str) {
        println!("{}", message.bold());
    }
}

/// A `ProgressSink` that drives a single indicatif bar, switching between a
/// determinate style (known content length) and a spinner.
pub struct IndicatifProgressSink {
    bar: Mutex<Option<ProgressBar>>,
    label: String,
}

impl IndicatifProgressSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            bar: Mutex::new(None),
            label: label.into(),
        }
    }
}

impl ProgressSink for IndicatifProgressSink {
    fn on_start(&self, total_bytes: Option<u64>) {
        let bar = match total_bytes {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::with_template(
                        "{spinner:.green} {msg} [{wide_bar:.cyan/blue}] {bytes}/{total_bytes}",
                    )
                    .unwrap()
                    .progress_chars("#>-"),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(ProgressStyle::with_template("{spinner:.green} {msg}").unwrap());
                bar
            }
        };
        bar.set_message(self.label.clone());
        *self.bar.lock().unwrap() = Some(bar);
    }

    fn on_progress(&self, current_bytes: u64) {
        if let Some(bar) = self.bar.lock().unwrap().as_ref() {
            bar.set_position(current_bytes);
        }
    }

    fn on_finish(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}
