use serde::{Deserialize, Serialize};

use crate::constraints::{MISC_LEN, SWITCH_LEN};

/// Name written into a fresh record.
pub const DEFAULT_NAME: &str = "CHANGEME";

/// One complete set of shared save-state parameters.
///
/// The record itself does not enforce the constraint table; the reader and
/// the manager clamp or reject values before they get here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub x: i16,
    pub y: i16,
    pub misc: [i32; MISC_LEN],
    pub name: String,
    pub switches: [bool; SWITCH_LEN],
}

impl Default for Record {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            misc: [0; MISC_LEN],
            name: DEFAULT_NAME.to_string(),
            switches: [false; SWITCH_LEN],
        }
    }
}

impl Record {
    pub fn misc(&self, index: usize) -> Option<i32> {
        self.misc.get(index).copied()
    }

    /// Returns `false` without touching the record if `index` is out of range.
    pub fn set_misc(&mut self, index: usize, value: i32) -> bool {
        match self.misc.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn switch_value(&self, index: usize) -> Option<bool> {
        self.switches.get(index).copied()
    }

    /// Returns `false` without touching the record if `index` is out of range.
    pub fn set_switch_value(&mut self, index: usize, value: bool) -> bool {
        match self.switches.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record() {
        let r = Record::default();
        assert_eq!(r.x, 0);
        assert_eq!(r.y, 0);
        assert_eq!(r.misc, [0, 0, 0, 0]);
        assert_eq!(r.name, "CHANGEME");
        assert_eq!(r.switches, [false; 8]);
    }

    #[test]
    fn equality_is_structural() {
        let mut a = Record::default();
        let b = Record::default();
        assert_eq!(a, b);
        a.set_switch_value(3, true);
        assert_ne!(a, b);
        a.set_switch_value(3, false);
        assert_eq!(a, b);
    }

    #[test]
    fn indexed_access_is_checked() {
        let mut r = Record::default();
        assert!(r.set_misc(2, 60753));
        assert_eq!(r.misc(2), Some(60753));
        assert!(!r.set_misc(4, 1));
        assert_eq!(r.misc(4), None);

        assert!(r.set_switch_value(7, true));
        assert_eq!(r.switch_value(7), Some(true));
        assert!(!r.set_switch_value(8, true));
        assert_eq!(r.switch_value(8), None);
    }

    #[test]
    fn serializes_as_plain_fields() {
        let json = serde_json::to_value(Record::default()).unwrap();
        assert_eq!(json["name"], "CHANGEME");
        assert_eq!(json["misc"].as_array().unwrap().len(), 4);
        assert_eq!(json["switches"].as_array().unwrap().len(), 8);
    }
}
