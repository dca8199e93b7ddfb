//! Collecting and printing what the cache did on each call

use std::fmt::Debug;

use anyhow::Result;
use memocache::{CacheEvent, CacheObserver};
use serde::Serialize;

/// One cache event, flattened for output
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub event: &'static str,
    pub key: String,
}

/// Observer that buffers events until the driver collects them
#[derive(Debug, Default)]
pub struct Recorder {
    events: Vec<EventRecord>,
}

impl Recorder {
    /// Take every event recorded since the last call
    pub fn take(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.events)
    }
}

impl<K: Debug> CacheObserver<K> for Recorder {
    fn on_event(&mut self, event: CacheEvent, key: &K) {
        self.events.push(EventRecord {
            event: event.as_str(),
            key: format!("{:?}", key),
        });
    }
}

#[derive(Serialize)]
struct StepReport<'a> {
    scenario: &'a str,
    step: usize,
    input: String,
    output: String,
    events: &'a [EventRecord],
}

/// Prints one line per memoized call, as text or JSON
pub struct Reporter {
    json: bool,
    scenario: &'static str,
    step: usize,
}

impl Reporter {
    /// Reporter printing JSON lines when `json` is set, text otherwise
    pub fn new(json: bool) -> Self {
        Self {
            json,
            scenario: "",
            step: 0,
        }
    }

    /// Start a new scenario; step numbers restart at 1
    pub fn begin(&mut self, scenario: &'static str, title: &str) {
        self.scenario = scenario;
        self.step = 0;
        if !self.json {
            println!("\n== {} ==", title);
        }
    }

    /// Print one memoized call with the events it produced
    pub fn step(
        &mut self,
        input: &dyn Debug,
        output: &dyn Debug,
        events: &[EventRecord],
    ) -> Result<()> {
        self.step += 1;

        if self.json {
            let report = StepReport {
                scenario: self.scenario,
                step: self.step,
                input: format!("{:?}", input),
                output: format!("{:?}", output),
                events,
            };
            println!("{}", serde_json::to_string(&report)?);
        } else {
            let events = events
                .iter()
                .map(|e| format!("{} {}", e.event, e.key))
                .collect::<Vec<_>>()
                .join(", ");
            println!("{:>3}. f({:?}) = {:?}  [{}]", self.step, input, output, events);
        }
        Ok(())
    }

    /// Free-form line, suppressed in JSON mode
    pub fn note(&self, text: &str) {
        if !self.json {
            println!("     {}", text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_take_drains() {
        let mut recorder = Recorder::default();
        recorder.on_event(CacheEvent::Evicted, &8);
        recorder.on_event(CacheEvent::Inserted, &12);

        let events = recorder.take();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event, "evicted");
        assert_eq!(events[1].key, "12");
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn test_step_report_json_shape() {
        let events = vec![EventRecord {
            event: "retrieved",
            key: "4".to_string(),
        }];
        let report = StepReport {
            scenario: "doubling",
            step: 2,
            input: "4".to_string(),
            output: "8".to_string(),
            events: &events,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["scenario"], "doubling");
        assert_eq!(value["events"][0]["event"], "retrieved");
    }
}
