//! Run records of a two-parameter exploration
//!
//! A run is one simulation launched for a single combination of the varied
//! parameters. The storage layer hands runs over with their parameter
//! assignment, their lifecycle status and, once completed, the measured
//! metrics together with an opaque handle to the produced result.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ExplorationError, ExplorationResult};

/// Identifier of a run inside its exploration
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle of the result produced by a completed run
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResultId(String);

impl ResultId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Queued, not started yet
    Pending,

    /// Still executing
    Running,

    /// Finished normally
    Complete,

    /// Finished with an error
    Failed,
}

impl RunStatus {
    /// Whether the run has reached a terminal state
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Measured outcome of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Handle used to navigate to the stored result
    pub result_id: ResultId,

    /// Scalar metrics keyed by metric name
    pub metrics: BTreeMap<String, f64>,
}

impl RunResult {
    pub fn new(result_id: ResultId) -> Self {
        Self {
            result_id,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Value of the metric, if recorded and finite
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied().filter(|value| value.is_finite())
    }
}

/// Statically typed assignment of parameter name to numeric value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterAssignment(BTreeMap<String, f64>);

impl ParameterAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a stored flat mapping literal such as `{'speed': 1.5, "gain": -2e-3}`.
    ///
    /// Keys are single or double quoted strings, values are plain numeric
    /// literals. Anything else is rejected.
    pub fn parse(input: &str) -> ExplorationResult<Self> {
        AssignmentParser::new(input).parse()
    }
}

impl FromIterator<(String, f64)> for ParameterAssignment {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Strict recursive-descent parser for stored assignments
struct AssignmentParser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> AssignmentParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn parse(mut self) -> ExplorationResult<ParameterAssignment> {
        let mut values = BTreeMap::new();

        self.skip_whitespace();
        self.expect(b'{')?;
        self.skip_whitespace();

        while self.peek() != Some(b'}') {
            let key = self.parse_key()?;
            self.skip_whitespace();
            self.expect(b':')?;
            self.skip_whitespace();
            let value = self.parse_number()?;

            if values.insert(key.clone(), value).is_some() {
                return Err(self.error(format!("duplicate parameter {key}")));
            }

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                }
                Some(b'}') => {}
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }

        self.pos += 1;
        self.skip_whitespace();
        if self.pos != self.bytes.len() {
            return Err(self.error("trailing characters after mapping"));
        }

        Ok(ParameterAssignment(values))
    }

    fn parse_key(&mut self) -> ExplorationResult<String> {
        let quote = match self.peek() {
            Some(q @ (b'\'' | b'"')) => q,
            _ => return Err(self.error("expected quoted parameter name")),
        };
        self.pos += 1;
        let start = self.pos;

        while let Some(byte) = self.peek() {
            if byte == quote {
                let key = &self.input[start..self.pos];
                self.pos += 1;
                if key.is_empty() {
                    return Err(self.error("empty parameter name"));
                }
                return Ok(key.to_string());
            }
            if byte == b'\\' {
                return Err(self.error("escape sequences are not allowed in parameter names"));
            }
            self.pos += 1;
        }

        Err(self.error("unterminated parameter name"))
    }

    fn parse_number(&mut self) -> ExplorationResult<f64> {
        let start = self.pos;

        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let integer_digits = self.consume_digits();
        let mut fraction_digits = 0;
        if self.peek() == Some(b'.') {
            self.pos += 1;
            fraction_digits = self.consume_digits();
        }
        if integer_digits + fraction_digits == 0 {
            return Err(self.error("expected numeric literal"));
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.consume_digits() == 0 {
                return Err(self.error("malformed exponent"));
            }
        }

        let literal = &self.input[start..self.pos];
        let value: f64 = literal
            .parse()
            .map_err(|_| self.error(format!("malformed numeric literal {literal}")))?;
        if !value.is_finite() {
            return Err(self.error(format!("numeric literal {literal} is out of range")));
        }
        Ok(value)
    }

    fn consume_digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn expect(&mut self, byte: u8) -> ExplorationResult<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", byte as char)))
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn error(&self, reason: impl Into<String>) -> ExplorationError {
        ExplorationError::ParameterParse {
            input: self.input.to_string(),
            reason: format!("{} at offset {}", reason.into(), self.pos),
        }
    }
}

/// One run of the exploration as handed over by the storage layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: RunId,
    pub parameters: ParameterAssignment,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<RunResult>,
}

impl RunRecord {
    pub fn new(id: RunId, parameters: ParameterAssignment, status: RunStatus) -> Self {
        Self {
            id,
            parameters,
            status,
            result: None,
        }
    }

    pub fn with_result(mut self, result: RunResult) -> Self {
        self.result = Some(result);
        self
    }

    /// Build a record from the stored textual parameter assignment
    pub fn from_stored(
        id: RunId,
        stored_parameters: &str,
        status: RunStatus,
        result: Option<RunResult>,
    ) -> ExplorationResult<Self> {
        Ok(Self {
            id,
            parameters: ParameterAssignment::parse(stored_parameters)?,
            status,
            result,
        })
    }

    /// Result of the run, only when it completed normally
    pub fn completed_result(&self) -> Option<&RunResult> {
        match self.status {
            RunStatus::Complete => self.result.as_ref(),
            _ => None,
        }
    }
}
