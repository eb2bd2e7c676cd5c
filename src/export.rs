//! Report rendering and output sinks.
//!
//! A report is rendered to plain lines once, then handed to a [`ReportSink`].
//! Writing to the console and a file at the same time is a [`FanOutSink`]
//! over a [`ConsoleSink`] and a [`FileSink`].

use crate::analyser::logic::{
    BinaryFlagStats, CategoricalStats, NumericStats, Report, StatBundle, SummaryRecord,
};
use crate::error::{Result, ResultExt as _};
use std::fs::File;
use std::io::{self, BufWriter, Write as _};
use std::path::{Path, PathBuf};

pub trait ReportSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct ConsoleSink {
    out: io::Stdout,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for ConsoleSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out.lock(), "{line}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSink {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create report file {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Forwards every line to each inner sink in order.
#[derive(Default)]
pub struct FanOutSink {
    sinks: Vec<Box<dyn ReportSink>>,
}

impl FanOutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl ReportSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn push(&mut self, sink: Box<dyn ReportSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ReportSink for FanOutSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        for sink in &mut self.sinks {
            sink.write_line(line)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        for sink in &mut self.sinks {
            sink.flush()?;
        }
        Ok(())
    }
}

/// Drops non-ASCII characters before forwarding, for consoles that cannot print them.
pub struct AsciiOnlySink<S> {
    inner: S,
}

impl<S: ReportSink> AsciiOnlySink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: ReportSink> ReportSink for AsciiOnlySink<S> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let clean: String = line.chars().filter(char::is_ascii).collect();
        self.inner.write_line(&clean)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Collects lines in memory.
#[derive(Default, Debug)]
pub struct MemorySink {
    pub lines: Vec<String>,
}

impl ReportSink for MemorySink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_owned());
        Ok(())
    }
}

impl ReportSink for Box<dyn ReportSink> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Renders the full report: overall section, then each group section per key set.
pub fn render_report(report: &Report) -> Vec<String> {
    let mut lines = Vec::new();
    render_section(&mut lines, "Overall Summary", &report.overall);

    for key_set in &report.key_sets {
        lines.push(String::new());
        lines.push(format!(
            "=== Grouped by {} ({} groups) ===",
            key_set.key_columns.join(", "),
            key_set.groups.len()
        ));
        for group in &key_set.groups {
            render_section(&mut lines, &group.title(), &group.summary);
        }
    }
    lines
}

fn render_section(lines: &mut Vec<String>, title: &str, summary: &SummaryRecord) {
    lines.push(String::new());
    lines.push(format!("--- {title} ---"));
    for column in &summary.columns {
        lines.push(format!("{}: {}", column.name, render_bundle(&column.stats)));
    }
}

pub fn render_bundle(stats: &StatBundle) -> String {
    match stats {
        StatBundle::Numeric(s) => render_numeric(s),
        StatBundle::BinaryFlag(s) => render_binary(s),
        StatBundle::Categorical(s) => render_categorical(s),
    }
}

fn render_numeric(s: &NumericStats) -> String {
    let mut fields = vec![
        format!("count: {}", s.count),
        format!("excluded: {}", s.excluded),
    ];
    let rounded = [
        ("mean", s.mean),
        ("min", s.min),
        ("max", s.max),
        ("std_dev", s.std_dev),
        ("p25", s.p25),
        ("p50", s.p50),
        ("p75", s.p75),
    ];
    for (label, value) in rounded {
        if let Some(v) = value {
            fields.push(format!("{label}: {v:.2}"));
        }
    }
    format!("{{{}}}", fields.join(", "))
}

fn render_binary(s: &BinaryFlagStats) -> String {
    format!(
        "{{count: {}, ones: {}, zeros: {}, percent_ones: {:.2}}}",
        s.count, s.ones, s.zeros, s.percent_ones
    )
}

fn render_categorical(s: &CategoricalStats) -> String {
    let top: Vec<String> = s
        .top_values
        .iter()
        .map(|(v, c)| format!("({v:?}, {c})"))
        .collect();
    format!(
        "{{count: {}, unique: {}, most_common_value: {:?}, most_common_count: {}, top_values: [{}]}}",
        s.count,
        s.unique,
        s.most_common_value.as_deref().unwrap_or("N/A"),
        s.most_common_count,
        top.join(", ")
    )
}

/// Writes the rendered report to `sink` and flushes it.
pub fn emit(report: &Report, sink: &mut dyn ReportSink) -> Result<()> {
    for line in render_report(report) {
        sink.write_line(&line)?;
    }
    sink.flush()?;
    Ok(())
}

/// A JSON report destination opened before any text is emitted.
pub struct JsonFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl JsonFile {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create JSON report {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(mut self, report: &Report) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)?;
        self.writer.flush()?;
        Ok(())
    }
}

pub fn write_json(report: &Report, path: &Path) -> Result<()> {
    JsonFile::create(path)?.write(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyser::logic::{ColumnSummary, GroupSection, KeySetReport};

    fn report() -> Report {
        let summary = SummaryRecord {
            columns: vec![
                ColumnSummary {
                    name: "likes".to_owned(),
                    stats: StatBundle::Numeric(NumericStats {
                        count: 2,
                        excluded: 0,
                        mean: Some(1.5),
                        min: Some(1.0),
                        max: Some(2.0),
                        std_dev: Some(0.5),
                        p25: Some(1.25),
                        p50: Some(1.5),
                        p75: Some(1.75),
                    }),
                },
                ColumnSummary {
                    name: "lang".to_owned(),
                    stats: StatBundle::Categorical(CategoricalStats {
                        count: 2,
                        unique: 1,
                        most_common_value: Some("en".to_owned()),
                        most_common_count: 2,
                        top_values: vec![("en".to_owned(), 2)],
                    }),
                },
            ],
        };
        Report {
            profile: "test".to_owned(),
            row_count: 2,
            overall: summary.clone(),
            key_sets: vec![KeySetReport {
                key_columns: vec!["lang".to_owned()],
                groups: vec![GroupSection {
                    key_columns: vec!["lang".to_owned()],
                    key: vec!["en".to_owned()],
                    rows: 2,
                    summary,
                }],
            }],
        }
    }

    #[test]
    fn test_render_layout() {
        let lines = render_report(&report());
        assert_eq!(lines.get(1).map(String::as_str), Some("--- Overall Summary ---"));
        assert_eq!(
            lines.get(2).map(String::as_str),
            Some(
                "likes: {count: 2, excluded: 0, mean: 1.50, min: 1.00, max: 2.00, std_dev: 0.50, p25: 1.25, p50: 1.50, p75: 1.75}"
            )
        );
        assert!(lines.contains(&"=== Grouped by lang (1 groups) ===".to_owned()));
        assert!(lines.contains(&"--- Group: lang = en ---".to_owned()));
    }

    #[test]
    fn test_render_empty_bundles() {
        let numeric = render_bundle(&StatBundle::Numeric(NumericStats {
            excluded: 3,
            ..Default::default()
        }));
        assert_eq!(numeric, "{count: 0, excluded: 3}");

        let categorical = render_bundle(&StatBundle::Categorical(CategoricalStats::default()));
        assert!(categorical.contains("most_common_value: \"N/A\""));
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(render_report(&report()), render_report(&report()));
    }

    #[test]
    fn test_fan_out_and_ascii_filter() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("report.txt");

        let mut sink = FanOutSink::new()
            .with(AsciiOnlySink::new(FileSink::create(&path)?))
            .with(MemorySink::default());
        assert_eq!(sink.len(), 2);
        sink.write_line("caf\u{e9} ok")?;
        sink.flush()?;

        let written = std::fs::read_to_string(&path)?;
        assert_eq!(written, "caf ok\n");
        Ok(())
    }

    #[test]
    fn test_emit_to_memory_and_json() -> Result<()> {
        let report = report();
        let mut sink = MemorySink::default();
        emit(&report, &mut sink)?;
        assert_eq!(sink.lines, render_report(&report));

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("report.json");
        write_json(&report, &path)?;
        let back: Report = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(back, report);
        Ok(())
    }
}
