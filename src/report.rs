/*!
 * Reporting functionality for treeclip
 *
 * Renders a summary of a finished export using the tabled library.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::cache::CacheStats;
use crate::config::Destination;
use crate::exporter::ExportStats;
use crate::utils::{format_file_size, format_number};

/// Files listed individually up to this many; beyond it only the largest
const FULL_LISTING_LIMIT: usize = 15;
/// Number of files shown when the listing is truncated
const TOP_FILES: usize = 10;

/// Everything the report shows about one export
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Where the export was delivered
    pub destination: Destination,
    /// Time taken to export and deliver
    pub duration: Duration,
    /// Size of the export in bytes
    pub output_bytes: usize,
    /// Per-file statistics
    pub stats: ExportStats,
    /// Metadata cache counters
    pub cache: CacheStats,
}

/// Report generator for export results
#[derive(Debug, Default)]
pub struct Reporter;

impl Reporter {
    /// Create a new reporter
    pub fn new() -> Self {
        Self
    }

    /// Print the report to stderr, keeping stdout for the export itself
    pub fn print_report(&self, report: &ExportReport) {
        eprintln!("\n{}", self.generate_report(report));
    }

    /// Generate the report text
    pub fn generate_report(&self, report: &ExportReport) -> String {
        let files_title = if report.stats.files_exported() > FULL_LISTING_LIMIT {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT"
        } else {
            "📋  EXPORTED FILES"
        };

        let summary_title = match report.destination {
            Destination::Clipboard => "✅  COPY COMPLETE",
            Destination::Stdout | Destination::File(_) => "✅  EXPORT COMPLETE",
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title,
            self.create_files_table(report),
            summary_title,
            self.create_summary_table(report)
        )
    }

    fn create_summary_table(&self, report: &ExportReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: String,
        }

        let stats = &report.stats;
        let lookups = report.cache.hits + report.cache.misses;
        let hit_rate = if lookups > 0 {
            report.cache.hits as f64 / lookups as f64 * 100.0
        } else {
            0.0
        };

        let rows = vec![
            SummaryRow {
                key: "📂 Destination",
                value: report.destination.to_string(),
            },
            SummaryRow {
                key: "⏱️ Process Time",
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "💾 Output Size",
                value: format_file_size(report.output_bytes as u64),
            },
            SummaryRow {
                key: "📄 Files Exported",
                value: format_number(stats.files_exported()),
            },
            SummaryRow {
                key: "📝 Total Lines",
                value: format_number(stats.total_lines()),
            },
            SummaryRow {
                key: "🔤 Total Characters",
                value: format_number(stats.total_chars()),
            },
            SummaryRow {
                key: "📦 LLM Tokens",
                value: format!("{} tokens (estimated)", format_number(stats.total_chars() / 4)),
            },
            SummaryRow {
                key: "🔁 Read Retries",
                value: stats.retries.to_string(),
            },
            SummaryRow {
                key: "🔄 Cache Hit Rate",
                value: format!(
                    "{:.1}% ({} hits / {} total)",
                    hit_rate, report.cache.hits, lookups
                ),
            },
        ];

        style(Table::new(rows))
    }

    fn create_files_table(&self, report: &ExportReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Chars")]
            chars: String,
        }

        let mut files: Vec<_> = report.stats.files.iter().collect();
        files.sort_by(|(a_path, a), (b_path, b)| b.chars.cmp(&a.chars).then(a_path.cmp(b_path)));

        if files.len() > FULL_LISTING_LIMIT {
            files.truncate(TOP_FILES);
        }

        let rows: Vec<FileRow> = files
            .into_iter()
            .map(|(path, info)| FileRow {
                path: truncate_path(path, 60),
                lines: format_number(info.lines),
                chars: format_number(info.chars),
            })
            .collect();

        style(Table::new(rows))
    }
}

fn style(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));

    table.to_string()
}

/// Shorten a `/`-separated path to at most `max_len` characters,
/// keeping the trailing segments
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let mut kept = Vec::new();
    let mut len = 3; // "..."
    for segment in path.rsplit('/') {
        let segment_len = segment.chars().count() + 1;
        if len + segment_len > max_len {
            break;
        }
        kept.push(segment);
        len += segment_len;
    }

    if kept.is_empty() {
        let tail: String = path
            .chars()
            .rev()
            .take(max_len.saturating_sub(3))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        return format!("...{}", tail);
    }

    kept.reverse();
    format!(".../{}", kept.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileStats;
    use std::path::PathBuf;

    fn sample_report(file_count: usize) -> ExportReport {
        let files = (0..file_count)
            .map(|i| {
                (
                    format!("src/file{:02}.rs", i),
                    FileStats {
                        lines: i + 1,
                        chars: (i + 1) * 10,
                    },
                )
            })
            .collect();

        ExportReport {
            destination: Destination::Clipboard,
            duration: Duration::from_millis(12),
            output_bytes: 1024,
            stats: ExportStats { files, retries: 1 },
            cache: CacheStats { hits: 3, misses: 1 },
        }
    }

    #[test]
    fn test_small_report_lists_every_file() {
        let text = Reporter::new().generate_report(&sample_report(3));

        assert!(text.contains("EXPORTED FILES"));
        assert!(text.contains("src/file00.rs"));
        assert!(text.contains("src/file02.rs"));
        assert!(text.contains("75.0% (3 hits / 4 total)"));
        assert!(text.contains("clipboard"));
        assert!(text.contains("1.00 KB"));
        assert!(text.contains("COPY COMPLETE"));
    }

    #[test]
    fn test_heading_follows_destination() {
        let mut report = sample_report(2);

        report.destination = Destination::File(PathBuf::from("/tmp/export.md"));
        let text = Reporter::new().generate_report(&report);
        assert!(text.contains("EXPORT COMPLETE"));
        assert!(!text.contains("COPY COMPLETE"));
        assert!(text.contains("/tmp/export.md"));

        report.destination = Destination::Stdout;
        let text = Reporter::new().generate_report(&report);
        assert!(text.contains("EXPORT COMPLETE"));
    }

    #[test]
    fn test_large_report_shows_top_files() {
        let text = Reporter::new().generate_report(&sample_report(20));

        assert!(text.contains("TOP 10 LARGEST FILES"));
        assert!(text.contains("src/file19.rs"));
        assert!(text.contains("src/file10.rs"));
        assert!(!text.contains("src/file09.rs"));
    }

    #[test]
    fn test_truncate_path() {
        assert_eq!(truncate_path("src/main.rs", 60), "src/main.rs");
        assert_eq!(truncate_path("aaaa/bbbb/cccc/dddd.rs", 16), ".../cccc/dddd.rs");
        assert_eq!(truncate_path("averyveryverylongname.rs", 10), "...name.rs");
    }
}
