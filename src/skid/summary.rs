// src/skid/summary.rs

use chrono::{DateTime, Local, TimeDelta};
use std::fmt::Write;

use crate::settings::SKID_NAME;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetCount {
    pub title: String,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub counts: Vec<DatasetCount>,
}

impl RunSummary {
    pub fn render(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "{} update {}", SKID_NAME, self.start.format("%Y-%m-%d"));
        let _ = writeln!(text, "{}", "=".repeat(20));
        let _ = writeln!(text);
        let _ = writeln!(text, "Start time: {}", self.start.format("%H:%M:%S"));
        let _ = writeln!(text, "End time: {}", self.end.format("%H:%M:%S"));
        let _ = writeln!(text, "Duration: {}", format_duration(self.end - self.start));
        let _ = writeln!(text);
        for count in &self.counts {
            let _ = writeln!(text, "{} rows loaded: {}", count.title, count.rows);
        }
        text
    }
}

/// `h:mm:ss.ffffff`
pub fn format_duration(elapsed: TimeDelta) -> String {
    let micros = elapsed.num_microseconds().unwrap_or(0).max(0);
    let seconds = micros / 1_000_000;
    format!(
        "{}:{:02}:{:02}.{:06}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60,
        micros % 1_000_000
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::milliseconds(1500)), "0:00:01.500000");
        assert_eq!(
            format_duration(TimeDelta::seconds(3 * 3600 + 4 * 60 + 5) + TimeDelta::microseconds(7)),
            "3:04:05.000007"
        );
        assert_eq!(format_duration(TimeDelta::seconds(-5)), "0:00:00.000000");
    }

    #[test]
    fn test_render_lists_every_dataset() {
        let start = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let summary = RunSummary {
            start,
            end: start + TimeDelta::seconds(95),
            counts: vec![
                DatasetCount {
                    title: "Facilities".to_string(),
                    rows: 10,
                },
                DatasetCount {
                    title: "Tanks".to_string(),
                    rows: 0,
                },
            ],
        };

        let text = summary.render();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "deq-tanks update 2024-01-02");
        assert_eq!(lines[1], "====================");
        assert_eq!(lines[3], "Start time: 03:04:05");
        assert_eq!(lines[4], "End time: 03:05:40");
        assert_eq!(lines[5], "Duration: 0:01:35.000000");
        assert_eq!(lines[7], "Facilities rows loaded: 10");
        assert_eq!(lines[8], "Tanks rows loaded: 0");
    }
}
