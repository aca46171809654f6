//! Persisted session statistics.
//!
//! The record is a small text file with one `<field> <value>` pair per line:
//!
//! ```text
//! money 240
//! wins 3
//! losses 1
//! ```
//!
//! Field order is not significant. Lines that are not one of the known fields
//! are kept verbatim when the record is rewritten.

use core::fmt;
use core::str::FromStr;
use core::time::Duration;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;

use tracing::{debug, warn};

use crate::error::StatsError;
use crate::sync::Mutex;

/// A field of the stats record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatField {
    /// Money available.
    Money,
    /// Rounds won.
    Wins,
    /// Rounds lost.
    Losses,
}

impl StatField {
    /// All fields in the order a fresh record is written.
    pub const ALL: [Self; 3] = [Self::Money, Self::Wins, Self::Losses];

    /// The name used in the record.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Money => "money",
            Self::Wins => "wins",
            Self::Losses => "losses",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The durable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsRecord {
    /// Money available.
    pub money: usize,
    /// Rounds won.
    pub wins: u32,
    /// Rounds lost.
    pub losses: u32,
}

impl StatsRecord {
    /// Creates a record.
    #[must_use]
    pub const fn new(money: usize, wins: u32, losses: u32) -> Self {
        Self {
            money,
            wins,
            losses,
        }
    }

    const fn get(&self, field: StatField) -> u64 {
        match field {
            StatField::Money => self.money as u64,
            StatField::Wins => self.wins as u64,
            StatField::Losses => self.losses as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Field {
        field: StatField,
        value: u64,
        raw: String,
    },
    Other(String),
}

impl Line {
    fn parse(number: usize, raw: &str) -> Result<Self, StatsError> {
        let mut tokens = raw.split_whitespace();
        let Some(field) = tokens.next().and_then(StatField::from_name) else {
            return Ok(Self::Other(raw.to_owned()));
        };

        let malformed = || StatsError::Malformed {
            line: number,
            field,
            value: raw.trim().to_owned(),
        };

        let value = tokens
            .next()
            .ok_or_else(malformed)?
            .parse::<u64>()
            .map_err(|_| malformed())?;
        if tokens.next().is_some() {
            return Err(malformed());
        }

        Ok(Self::Field {
            field,
            value,
            raw: raw.to_owned(),
        })
    }

    fn rendered(field: StatField, value: u64) -> Self {
        Self::Field {
            field,
            value,
            raw: format!("{field} {value}"),
        }
    }

    fn text(&self) -> &str {
        match self {
            Self::Field { raw, .. } | Self::Other(raw) => raw,
        }
    }
}

/// A line together with the terminator it was read with.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    line: Line,
    /// `"\r\n"`, `"\n"`, or empty for a final unterminated line.
    eol: &'static str,
}

impl Entry {
    fn split(chunk: &str) -> (&str, &'static str) {
        if let Some(raw) = chunk.strip_suffix("\r\n") {
            (raw, "\r\n")
        } else if let Some(raw) = chunk.strip_suffix('\n') {
            (raw, "\n")
        } else {
            (chunk, "")
        }
    }
}

/// A parsed stats record together with any unrelated lines it contains.
///
/// Rendering an unchanged document reproduces its source byte for byte,
/// line endings included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsDocument {
    lines: Vec<Entry>,
}

impl StatsDocument {
    /// Builds a document holding just the three fields of `record`.
    #[must_use]
    pub fn from_record(record: &StatsRecord) -> Self {
        let mut document = Self::default();
        document.apply(record);
        document
    }

    fn find(&self, field: StatField) -> Option<u64> {
        self.lines.iter().find_map(|entry| match entry.line {
            Line::Field { field: f, value, .. } if f == field => Some(value),
            _ => None,
        })
    }

    /// Extracts the typed record.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::MissingField`] if a field is absent, or
    /// [`StatsError::Malformed`] if a value does not fit its field.
    pub fn record(&self) -> Result<StatsRecord, StatsError> {
        let value = |field| self.find(field).ok_or(StatsError::MissingField(field));
        let out_of_range = |field, value: u64| StatsError::Malformed {
            line: self.line_of(field),
            field,
            value: value.to_string(),
        };

        let money = value(StatField::Money)?;
        let wins = value(StatField::Wins)?;
        let losses = value(StatField::Losses)?;

        Ok(StatsRecord {
            money: usize::try_from(money).map_err(|_| out_of_range(StatField::Money, money))?,
            wins: u32::try_from(wins).map_err(|_| out_of_range(StatField::Wins, wins))?,
            losses: u32::try_from(losses).map_err(|_| out_of_range(StatField::Losses, losses))?,
        })
    }

    fn line_of(&self, field: StatField) -> usize {
        self.lines
            .iter()
            .position(|entry| matches!(entry.line, Line::Field { field: f, .. } if f == field))
            .map_or(0, |index| index + 1)
    }

    /// Writes the values of `record` into the document.
    ///
    /// Lines whose value is unchanged keep their exact text; missing fields
    /// are appended.
    pub fn apply(&mut self, record: &StatsRecord) {
        for field in StatField::ALL {
            let value = record.get(field);
            let existing = self
                .lines
                .iter_mut()
                .find(|entry| matches!(entry.line, Line::Field { field: f, .. } if f == field));
            match existing {
                Some(entry) => {
                    if !matches!(entry.line, Line::Field { value: v, .. } if v == value) {
                        entry.line = Line::rendered(field, value);
                    }
                }
                None => self.push_field(field, value),
            }
        }
    }

    fn push_field(&mut self, field: StatField, value: u64) {
        let eol = self.line_ending();
        if let Some(last) = self.lines.last_mut().filter(|last| last.eol.is_empty()) {
            last.eol = eol;
        }
        self.lines.push(Entry {
            line: Line::rendered(field, value),
            eol,
        });
    }

    /// The terminator for appended lines: CRLF if the record already uses it.
    fn line_ending(&self) -> &'static str {
        if self.lines.iter().any(|entry| entry.eol == "\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }
}

impl FromStr for StatsDocument {
    type Err = StatsError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut lines = Vec::new();
        let mut seen = Vec::with_capacity(StatField::ALL.len());
        for (index, chunk) in text.split_inclusive('\n').enumerate() {
            let (raw, eol) = Entry::split(chunk);
            let line = Line::parse(index + 1, raw)?;
            if let Line::Field { field, .. } = &line {
                let field = *field;
                if seen.contains(&field) {
                    return Err(StatsError::DuplicateField(field));
                }
                seen.push(field);
            }
            lines.push(Entry { line, eol });
        }
        Ok(Self { lines })
    }
}

impl fmt::Display for StatsDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.lines {
            write!(f, "{}{}", entry.line.text(), entry.eol)?;
        }
        Ok(())
    }
}

/// How transient I/O failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 count as 1.
    pub attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound for the doubling delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            initial_backoff: Duration::from_millis(25),
            max_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// A policy that tries once and never sleeps.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }
}

fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::Interrupted
            | io::ErrorKind::TimedOut
    )
}

/// File-backed store for the [`StatsRecord`].
///
/// Every operation holds an internal lock for its whole read/modify/write
/// sequence.
#[derive(Debug)]
pub struct StatsStore {
    path: PathBuf,
    retry: RetryPolicy,
    lock: Mutex<()>,
}

impl StatsStore {
    /// Creates a store for the record at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            retry: RetryPolicy::default(),
            lock: Mutex::new(()),
        }
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Location of the record.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the record.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Unavailable`] if the file stays missing or
    /// locked through every retry, or a parse error if its contents are bad.
    pub fn load(&self) -> Result<StatsRecord, StatsError> {
        let _guard = self.lock.lock();
        self.read_document()?.record()
    }

    /// Writes `record`, rewriting only the fields whose value changed.
    ///
    /// A missing file is created.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing record cannot be parsed or the file
    /// cannot be written.
    pub fn save(&self, record: &StatsRecord) -> Result<(), StatsError> {
        let _guard = self.lock.lock();
        let mut document = match self.read_document() {
            Ok(document) => document,
            Err(err) if err.is_missing() => StatsDocument::default(),
            Err(err) => return Err(err),
        };
        document.apply(record);
        self.write_document(&document)
    }

    /// Loads the record, lets `change` modify it, and saves it, all under one
    /// lock. Returns the saved record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be read, parsed, or written.
    pub fn update(&self, change: impl FnOnce(&mut StatsRecord)) -> Result<StatsRecord, StatsError> {
        let _guard = self.lock.lock();
        let mut document = self.read_document()?;
        let mut record = document.record()?;
        change(&mut record);
        document.apply(&record);
        self.write_document(&document)?;
        Ok(record)
    }

    /// Writes a fresh record, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its directory cannot be created.
    pub fn initialize(&self, record: &StatsRecord) -> Result<(), StatsError> {
        let _guard = self.lock.lock();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        self.write_document(&StatsDocument::from_record(record))
    }

    fn read_document(&self) -> Result<StatsDocument, StatsError> {
        let text = self.retrying(|| fs::read_to_string(&self.path))?;
        text.parse()
    }

    fn write_document(&self, document: &StatsDocument) -> Result<(), StatsError> {
        let text = document.to_string();
        let staging = self.staging_path();
        self.retrying(|| {
            fs::write(&staging, &text)?;
            fs::rename(&staging, &self.path).inspect_err(|_| {
                let _ = fs::remove_file(&staging);
            })
        })?;
        debug!(path = %self.path.display(), "stats record written");
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        self.path.file_name().map_or_else(
            || self.path.with_extension("tmp"),
            |name| {
                let mut name = name.to_os_string();
                name.push(".tmp");
                self.path.with_file_name(name)
            },
        )
    }

    fn retrying<T>(&self, mut op: impl FnMut() -> io::Result<T>) -> Result<T, StatsError> {
        let attempts = self.retry.attempts.max(1);
        let mut backoff = self.retry.initial_backoff;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if is_transient(&err) && attempt < attempts => {
                    warn!(
                        ?err,
                        path = %self.path.display(),
                        attempt,
                        "stats record unavailable; retrying"
                    );
                    thread::sleep(backoff);
                    backoff = backoff.saturating_mul(2).min(self.retry.max_backoff);
                }
                Err(source) if is_transient(&source) => {
                    return Err(StatsError::Unavailable {
                        path: self.path.clone(),
                        attempts: attempt,
                        source,
                    });
                }
                Err(source) => return Err(self.io_error(source)),
            }
        }
    }

    fn io_error(&self, source: io::Error) -> StatsError {
        StatsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
