//! Rolling time window used to filter recent alerts.

use crate::error::{Error, Result};
use chrono::{DateTime, Days, Months, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowUnit {
    #[default]
    Months,
    Days,
}

impl WindowUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            WindowUnit::Months => "months",
            WindowUnit::Days => "days",
        }
    }
}

/// How far back the window reaches from "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingWindow {
    pub amount: u32,
    pub unit: WindowUnit,
}

impl RollingWindow {
    pub fn new(amount: u32, unit: WindowUnit) -> Self {
        Self { amount, unit }
    }

    /// Read the window length from a `{"result": ...}` response.
    ///
    /// The remote stores the value as a field, so it may arrive as a number or
    /// a numeric string. Missing, empty, negative or unparseable values yield 0.
    pub fn from_response(response: &Value, unit: WindowUnit) -> Self {
        let amount = match response.get("result") {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f.trunc() as u64))
                .unwrap_or(0),
            Some(Value::String(s)) => parse_amount(s),
            _ => 0,
        };
        Self::new(u32::try_from(amount).unwrap_or(u32::MAX), unit)
    }

    /// Subtract the window from `now`.
    ///
    /// Month subtraction clamps to the last valid day of the target month.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Result<Cutoff> {
        let shifted = match self.unit {
            WindowUnit::Months => now.checked_sub_months(Months::new(self.amount)),
            WindowUnit::Days => now.checked_sub_days(Days::new(u64::from(self.amount))),
        };
        shifted.map(Cutoff).ok_or_else(|| Error::CutoffOutOfRange {
            amount: self.amount,
            unit: self.unit.as_str(),
            now: now.to_rfc3339(),
        })
    }
}

fn parse_amount(s: &str) -> u64 {
    let s = s.trim();
    s.parse::<u64>()
        .ok()
        .or_else(|| {
            s.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite() && *f > 0.0)
                .map(|f| f.trunc() as u64)
        })
        .unwrap_or(0)
}

/// Lower bound of the window, rendered as `2024-04-01T00:00:00.000Z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cutoff(pub DateTime<Utc>);

impl Cutoff {
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
