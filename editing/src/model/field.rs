use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::time::{ClockTime, end_of};
use crate::error::EditError;

/// Identifies one timing field of a timeline element.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum TimingField {
    Start,
    Inpoint,
    Duration,
    MaxDuration,
    Priority,
}

impl TimingField {
    /// Order in which changed fields are pushed to the backend. The in-point
    /// goes before the duration so the duration write overrides the span
    /// derived from the in-point shift.
    pub const APPLY_ORDER: [TimingField; 5] = [
        TimingField::MaxDuration,
        TimingField::Inpoint,
        TimingField::Duration,
        TimingField::Start,
        TimingField::Priority,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TimingField::Start => "start",
            TimingField::Inpoint => "inpoint",
            TimingField::Duration => "duration",
            TimingField::MaxDuration => "maxduration",
            TimingField::Priority => "priority",
        }
    }
}

impl fmt::Display for TimingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TimingField {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(TimingField::Start),
            "inpoint" => Ok(TimingField::Inpoint),
            "duration" => Ok(TimingField::Duration),
            "maxduration" | "max-duration" => Ok(TimingField::MaxDuration),
            "priority" => Ok(TimingField::Priority),
            other => Err(EditError::InvalidArgument(format!(
                "Unknown timing field '{}'",
                other
            ))),
        }
    }
}

/// Logical timing of a timeline element.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Timing {
    #[serde(default)]
    pub start: ClockTime,
    #[serde(default)]
    pub inpoint: ClockTime,
    #[serde(default)]
    pub duration: ClockTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<ClockTime>,
    #[serde(default)]
    pub priority: u32,
}

impl Timing {
    pub fn end(&self) -> Option<ClockTime> {
        end_of(self.start, self.duration)
    }

    /// Numeric value of a field; an unset max duration reads as `u64::MAX`.
    pub fn get(&self, field: TimingField) -> u64 {
        match field {
            TimingField::Start => self.start,
            TimingField::Inpoint => self.inpoint,
            TimingField::Duration => self.duration,
            TimingField::MaxDuration => self.max_duration.unwrap_or(u64::MAX),
            TimingField::Priority => u64::from(self.priority),
        }
    }

    /// Validates the element invariants for this timing.
    pub fn check(&self) -> Result<(), EditError> {
        if self.end().is_none() {
            return Err(EditError::TimeOverflow(format!(
                "start {} + duration {}",
                self.start, self.duration
            )));
        }
        if let Some(max_duration) = self.max_duration {
            let used = self.inpoint.checked_add(self.duration);
            if used.map_or(true, |used| used > max_duration) {
                return Err(EditError::ExceedsMaxDuration {
                    inpoint: self.inpoint,
                    duration: self.duration,
                    max_duration,
                });
            }
        }
        Ok(())
    }

    /// Fields that differ from `other`, in `APPLY_ORDER`.
    pub fn changed_fields(&self, other: &Timing) -> Vec<TimingField> {
        TimingField::APPLY_ORDER
            .into_iter()
            .filter(|field| match field {
                TimingField::MaxDuration => self.max_duration != other.max_duration,
                _ => self.get(*field) != other.get(*field),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing(start: u64, inpoint: u64, duration: u64, max: Option<u64>) -> Timing {
        Timing {
            start,
            inpoint,
            duration,
            max_duration: max,
            priority: 0,
        }
    }

    #[test]
    fn test_check_max_duration() {
        assert!(timing(0, 10, 90, Some(100)).check().is_ok());
        assert!(matches!(
            timing(0, 10, 95, Some(100)).check(),
            Err(EditError::ExceedsMaxDuration { max_duration: 100, .. })
        ));
        // Unbounded
        assert!(timing(0, 10, 1_000_000, None).check().is_ok());
    }

    #[test]
    fn test_check_end_overflow() {
        assert!(matches!(
            timing(u64::MAX, 0, 1, None).check(),
            Err(EditError::TimeOverflow(_))
        ));
    }

    #[test]
    fn test_changed_fields_in_apply_order() {
        let before = timing(0, 10, 50, None);
        let mut after = timing(5, 15, 45, Some(200));
        after.priority = 3;
        assert_eq!(
            after.changed_fields(&before),
            vec![
                TimingField::MaxDuration,
                TimingField::Inpoint,
                TimingField::Duration,
                TimingField::Start,
                TimingField::Priority,
            ]
        );
        assert!(before.changed_fields(&before).is_empty());
    }

    #[test]
    fn test_field_names_parse_back() {
        for field in TimingField::APPLY_ORDER {
            assert_eq!(field.name().parse::<TimingField>().unwrap(), field);
        }
        assert!("media-start".parse::<TimingField>().is_err());
    }
}
