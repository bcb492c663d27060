//! Session: line-oriented driver for a configured machine.
//!
//! Input is a sequence of lines. Settings lines (starting with `*`)
//! reconfigure the machine, empty lines are echoed as empty lines, and
//! every other line is a message that is converted and printed in groups
//! of five characters. The first line must be a settings line.

use tracing::debug;

use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::settings::Settings;
use crate::utils::text::{group_five, normalize_message};

/// Processes message input against one machine.
#[derive(Debug)]
pub struct Session {
    machine: Machine,
    started: bool,
}

impl Session {
    /// Creates a session driving `machine`.
    pub fn new(machine: Machine) -> Self {
        Session {
            machine,
            started: false,
        }
    }

    /// Returns the machine being driven.
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Processes one input line.
    ///
    /// # Returns
    /// `None` for a settings line, otherwise the output line (without a
    /// trailing newline).
    ///
    /// # Errors
    /// - [`EnigmaError::MissingSettings`] if the first line is not a settings line.
    /// - Any error of [`Settings::parse`], [`Settings::apply`] or
    ///   [`Machine::convert_message`].
    pub fn process_line(&mut self, line: &str) -> Result<Option<String>> {
        if Settings::is_settings_line(line) {
            let settings = Settings::parse(line, self.machine.num_rotors())?;
            settings.apply(&mut self.machine)?;
            self.started = true;
            return Ok(None);
        }
        if !self.started {
            return Err(EnigmaError::MissingSettings);
        }
        if line.is_empty() {
            return Ok(Some(String::new()));
        }

        let msg = normalize_message(line);
        let converted = self.machine.convert_message(&msg)?;
        debug!(chars = converted.len(), "message converted");
        Ok(Some(group_five(&converted)))
    }

    /// Processes a whole transcript, terminating each output line with
    /// `'\n'`.
    ///
    /// # Errors
    /// The first error of [`process_line`](Self::process_line); output
    /// produced before it is discarded.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::{MachineConfig, Session};
    ///
    /// let config = MachineConfig::parse("\
    /// ABCDEFGHIJKLMNOPQRSTUVWXYZ
    /// 4 3
    /// B R (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)
    /// I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
    /// II ME (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
    /// III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
    /// ").unwrap();
    ///
    /// let mut session = Session::new(config.build_machine().unwrap());
    /// let out = session.process_str("* B I II III AAA\naaaaa\n").unwrap();
    /// assert_eq!(out, "BDZGO\n");
    /// ```
    pub fn process_str(&mut self, input: &str) -> Result<String> {
        let mut out = String::with_capacity(input.len());
        for line in input.lines() {
            if let Some(converted) = self.process_line(line)? {
                out.push_str(&converted);
                out.push('\n');
            }
        }
        Ok(out)
    }
}
