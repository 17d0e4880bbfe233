//! Result reporting for benchmark runs
//!
//! One [`RunReport`] per run: the method, its parameters, the elapsed
//! wall-clock time, and the file total. `Display` renders the plain
//! single-line form; `print_summary` adds the styled block for
//! terminals.

use crate::config::Method;
use crate::walker::WalkCounters;
use console::style;
use std::fmt;
use std::time::Duration;

/// Outcome of one benchmark run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Method that produced this run
    pub method: Method,

    /// Worker threads used (1 for the sequential methods)
    pub threads: usize,

    /// Queue capacity, for the method that has one
    pub queue_length: Option<usize>,

    /// Total files counted
    pub files: u64,

    /// Wall-clock duration of the walk
    pub elapsed: Duration,
}

impl RunReport {
    /// Files counted per second of wall-clock time
    pub fn files_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.files as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(threads={}", self.method.name(), self.threads)?;
        if let Some(queue) = self.queue_length {
            write!(f, ", queue={}", queue)?;
        }
        write!(f, "): {} ms, {} files", self.elapsed.as_millis(), self.files)
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let digits: Vec<char> = n.to_string().chars().collect();
    let mut groups: Vec<String> = digits
        .rchunks(3)
        .map(|chunk| chunk.iter().collect())
        .collect();
    groups.reverse();
    groups.join(",")
}

/// Print a header at the start of a run
pub fn print_header(root: &str, method: Method, threads: usize) {
    println!();
    println!(
        "{} {}",
        style("walk-bench").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Root:").bold(), root);
    println!("  {} {}", style("Method:").bold(), method.name());
    if method.is_concurrent() {
        println!("  {} {}", style("Threads:").bold(), threads);
    }
    println!();
}

/// Print the result block for a finished run
pub fn print_summary(report: &RunReport, counters: Option<&WalkCounters>) {
    println!();
    println!("{}", style("Walk Complete").green().bold());
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Result:").bold(), report);
    println!(
        "  {} {} files/sec",
        style("Rate:").bold(),
        format_number(report.files_per_second() as u64)
    );

    if let Some(counters) = counters {
        println!(
            "  {} {}",
            style("Directories:").bold(),
            format_number(counters.dirs_listed())
        );
        if counters.entries_rejected() > 0 {
            println!(
                "  {} {}",
                style("Rejected entries:").yellow().bold(),
                format_number(counters.entries_rejected())
            );
        }
        if counters.listing_errors() > 0 {
            println!(
                "  {} {}",
                style("Listing errors:").yellow().bold(),
                format_number(counters.listing_errors())
            );
        }
        if counters.forks_rejected() > 0 {
            println!(
                "  {} {}",
                style("Rejected forks:").yellow().bold(),
                format_number(counters.forks_rejected())
            );
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(1234567890), "1,234,567,890");
    }

    #[test]
    fn test_report_line_with_queue() {
        let report = RunReport {
            method: Method::FixQueuePool,
            threads: 16,
            queue_length: Some(200),
            files: 42,
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(
            report.to_string(),
            "fix_queue_pool(threads=16, queue=200): 1500 ms, 42 files"
        );
    }

    #[test]
    fn test_report_line_without_queue() {
        let report = RunReport {
            method: Method::SingleThread,
            threads: 1,
            queue_length: None,
            files: 5,
            elapsed: Duration::from_millis(3),
        };
        assert_eq!(report.to_string(), "single_thread(threads=1): 3 ms, 5 files");
    }

    #[test]
    fn test_files_per_second() {
        let report = RunReport {
            method: Method::FixThreadPool,
            threads: 4,
            queue_length: None,
            files: 1000,
            elapsed: Duration::from_secs(10),
        };
        assert!((report.files_per_second() - 100.0).abs() < f64::EPSILON);
    }
}
