//! Terminal rendering of run events and notices.

use hypnoflow_core::timer::format_countdown_ms;
use hypnoflow_core::{Event, EventSink, Notice, NoticeSink, StopReason};

/// Prints events to stdout, as JSON lines or short text.
pub struct ConsolePrinter {
    json: bool,
    cycle: u32,
}

impl ConsolePrinter {
    pub fn new(json: bool) -> Self {
        Self { json, cycle: 0 }
    }

    fn text(&mut self, event: &Event) -> Option<String> {
        match event {
            Event::RunStarted { exercise, .. } => {
                self.cycle = 0;
                Some(format!("started {}", exercise.slug()))
            }
            Event::PhaseEntered {
                prompt,
                duration_ms,
                ..
            } => Some(format!(
                "[cycle {}] {prompt} ({:.1}s)",
                self.cycle + 1,
                *duration_ms as f64 / 1000.0
            )),
            Event::CycleCompleted { cycle_count, .. } => {
                self.cycle = *cycle_count;
                None
            }
            Event::RunStopped {
                reason,
                cycles,
                elapsed_ms,
                ..
            } => {
                let why = match reason {
                    StopReason::Manual => "stopped",
                    StopReason::Completed => "completed",
                    StopReason::NavigatedAway => "left",
                };
                Some(format!(
                    "{why} after {} ({cycles} cycles)",
                    format_countdown_ms(*elapsed_ms)
                ))
            }
            Event::AudioStarted { asset, .. } => Some(format!("playing {asset}")),
            Event::AudioUnavailable { .. } => Some("continuing without audio".into()),
            Event::AnimationReset { .. } | Event::AudioReleased { .. } | Event::StateSnapshot { .. } => None,
        }
    }
}

impl EventSink for ConsolePrinter {
    fn emit(&mut self, event: &Event) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, event = event.name(), "event not serializable"),
            }
            return;
        }
        if let Some(line) = self.text(event) {
            println!("{line}");
        }
    }
}

/// Shows notices on stderr, where they cannot corrupt JSON output.
pub struct ConsoleNotices;

impl NoticeSink for ConsoleNotices {
    fn notify(&mut self, notice: &Notice) {
        eprintln!("notice: {}: {}", notice.title, notice.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hypnoflow_core::{animation, ExerciseKind};

    fn entered(prompt: &str, duration_ms: u64) -> Event {
        let def = ExerciseKind::Cardiac.definition();
        Event::PhaseEntered {
            phase_index: 0,
            label: "inhale".into(),
            prompt: prompt.into(),
            duration_ms,
            target: animation::target_for(&def, 0),
            at: Utc::now(),
        }
    }

    #[test]
    fn text_tracks_cycle_number() {
        let mut printer = ConsolePrinter::new(false);
        assert_eq!(
            printer.text(&entered("Breathe in", 4_500)).as_deref(),
            Some("[cycle 1] Breathe in (4.5s)")
        );
        assert!(printer
            .text(&Event::CycleCompleted {
                cycle_count: 1,
                at: Utc::now()
            })
            .is_none());
        assert_eq!(
            printer.text(&entered("Breathe in", 4_500)).as_deref(),
            Some("[cycle 2] Breathe in (4.5s)")
        );
    }

    #[test]
    fn stop_line_uses_clock() {
        let mut printer = ConsolePrinter::new(false);
        let line = printer.text(&Event::RunStopped {
            reason: StopReason::Completed,
            cycles: 30,
            elapsed_ms: 60_000,
            at: Utc::now(),
        });
        assert_eq!(line.as_deref(), Some("completed after 1:00 (30 cycles)"));
    }
}
