//! Settings line parser.
//!
//! A settings line selects the rotors, their starting positions and the
//! plugboard for the messages that follow it:
//!
//! ```text
//! * B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)
//! │ └──── rotor names ──┘ │    └──── plugboard ────┘
//! marker             positions
//! ```

use crate::error::{EnigmaError, Result};
use crate::machine::Machine;

/// First character of every settings line.
pub const SETTINGS_MARKER: char = '*';

/// One parsed settings line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Rotor names, reflector first.
    pub rotors: Vec<String>,
    /// Initial positions of the rotors after the reflector.
    pub positions: String,
    /// Plugboard cycles, if any were given.
    pub plugboard: Option<String>,
}

impl Settings {
    /// Returns true if `line` is a settings line.
    pub fn is_settings_line(line: &str) -> bool {
        line.starts_with(SETTINGS_MARKER)
    }

    /// Parses `line` for a machine with `num_rotors` slots.
    ///
    /// # Errors
    /// Returns [`EnigmaError::MalformedSettings`] if the marker is missing
    /// or fewer than `num_rotors + 1` fields follow it.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Settings;
    ///
    /// let s = Settings::parse("* B Beta III IV I AXLE (YF) (ZH)", 5).unwrap();
    /// assert_eq!(s.rotors, vec!["B", "Beta", "III", "IV", "I"]);
    /// assert_eq!(s.positions, "AXLE");
    /// assert_eq!(s.plugboard.as_deref(), Some("(YF) (ZH)"));
    /// ```
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self> {
        let body = line
            .strip_prefix(SETTINGS_MARKER)
            .ok_or_else(|| EnigmaError::MalformedSettings(format!("missing '*' in {:?}", line)))?;

        let fields: Vec<&str> = body.split_whitespace().collect();
        if fields.len() < num_rotors + 1 {
            return Err(EnigmaError::MalformedSettings(format!(
                "expected {} rotor names and a position string, got {} fields",
                num_rotors,
                fields.len()
            )));
        }

        let rotors = fields[..num_rotors].iter().map(|s| s.to_string()).collect();
        let positions = fields[num_rotors].to_string();
        let plugboard = if fields.len() > num_rotors + 1 {
            Some(fields[num_rotors + 1..].join(" "))
        } else {
            None
        };

        Ok(Settings {
            rotors,
            positions,
            plugboard,
        })
    }

    /// Configures `machine` from these settings.
    ///
    /// # Errors
    /// Any error of [`Machine::configure`].
    pub fn apply(&self, machine: &mut Machine) -> Result<()> {
        machine.configure(
            self.rotors.as_slice(),
            &self.positions,
            self.plugboard.as_deref(),
        )
    }
}
