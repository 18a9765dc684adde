//! Display labels for backend enum strings.
//!
//! The backend speaks in upper-case codes (`UPCOMING`, `ON_GOING`, `SPOUSE`, ...);
//! the apps show human labels and badge colors. Every table lives here so the
//! mobile app and the dashboards read the same wording.

use serde::Serialize;

pub const NEUTRAL_COLOR: &str = "gray";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Label {
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

/// A finite map from backend codes to display labels.
#[derive(Debug)]
pub struct LabelTable {
    entries: &'static [(&'static str, Label)],
}

impl LabelTable {
    pub const fn new(entries: &'static [(&'static str, Label)]) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<Label> {
        self.entries
            .iter()
            .find(|(code, _)| *code == key)
            .map(|(_, label)| *label)
    }

    /// Mapped label, or `key` itself when the code is unknown.
    pub fn label<'a>(&self, key: &'a str) -> &'a str {
        match self.get(key) {
            Some(label) => label.label,
            None => key,
        }
    }

    pub fn color(&self, key: &str) -> &'static str {
        self.get(key).map(|l| l.color).unwrap_or(NEUTRAL_COLOR)
    }

    pub fn entries(&self) -> Vec<LabelEntry> {
        self.entries
            .iter()
            .map(|&(key, l)| LabelEntry {
                key,
                label: l.label,
                color: l.color,
            })
            .collect()
    }
}

const fn l(label: &'static str, color: &'static str) -> Label {
    Label { label, color }
}

pub static APPOINTMENT_STATUS: LabelTable = LabelTable::new(&[
    ("UPCOMING", l("Upcoming", "blue")),
    ("ON_GOING", l("Ongoing", "orange")),
    ("COMPLETED", l("Completed", "green")),
    ("CANCELLED", l("Cancelled", "red")),
]);

pub static PAYMENT_STATUS: LabelTable = LabelTable::new(&[
    ("PENDING", l("Pending payment", "orange")),
    ("PAID", l("Paid", "green")),
    ("FAILED", l("Payment failed", "red")),
    ("REFUNDED", l("Refunded", "purple")),
]);

pub static RELATIONSHIP: LabelTable = LabelTable::new(&[
    ("SELF", l("Myself", "blue")),
    ("SPOUSE", l("Spouse", "pink")),
    ("CHILD", l("Child", "green")),
    ("PARENT", l("Parent", "purple")),
    ("SIBLING", l("Sibling", "cyan")),
    ("OTHER", l("Other", NEUTRAL_COLOR)),
]);

pub static GENDER: LabelTable = LabelTable::new(&[
    ("MALE", l("Male", "blue")),
    ("FEMALE", l("Female", "pink")),
    ("OTHER", l("Other", NEUTRAL_COLOR)),
]);

pub static RECORD_STATUS: LabelTable = LabelTable::new(&[
    ("ACTIVE", l("Active", "green")),
    ("INACTIVE", l("Inactive", NEUTRAL_COLOR)),
]);
