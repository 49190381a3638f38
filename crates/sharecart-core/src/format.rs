//! Literals of the `o_o.ini` text format.

use crate::constraints::{MISC_LEN, SWITCH_LEN};

/// Directory the backing file lives in.
pub const DAT_DIRECTORY: &str = "dat";
/// Name of the backing file.
pub const INI_FILE: &str = "o_o.ini";

/// First line of every file.
pub const TITLE: &str = "[Main]";

pub const KEY_X: &str = "MapX";
pub const KEY_Y: &str = "MapY";
pub const KEY_MISC: [&str; MISC_LEN] = ["Misc0", "Misc1", "Misc2", "Misc3"];
pub const KEY_NAME: &str = "PlayerName";
pub const KEY_SWITCH: [&str; SWITCH_LEN] = [
    "Switch0", "Switch1", "Switch2", "Switch3", "Switch4", "Switch5", "Switch6", "Switch7",
];

/// Written after every line, whatever the platform.
pub const LINE_BREAK: &str = "\r\n";
pub const VALUE_DELIMITER: char = '=';
pub const QUOTE: char = '"';

pub const TRUE_LITERAL: &str = "TRUE";
pub const FALSE_LITERAL: &str = "FALSE";
