//! Machine configuration loader.
//!
//! A configuration describes the alphabet, the slot and pawl counts and
//! every rotor available to the machine:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//! 5 3
//!  I MQ      (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!  Beta N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//!  B R       (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
//!            (RX) (SZ) (TV)
//! ```
//!
//! Rotor types are `M<notches>` (moving), `N` (fixed) and `R` (reflector).
//! A line starting with `(` continues the cycles of the rotor above it.

use std::sync::Arc;

use tracing::debug;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::Rotor;
use crate::rotor_pool::RotorPool;

/// Characters reserved by the configuration and settings grammars.
const RESERVED: [char; 3] = ['(', ')', '*'];

/// Everything needed to build machines of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    pawls: usize,
    rotors: RotorPool,
}

/// A rotor description whose cycles may still continue on later lines.
struct PendingRotor {
    line: usize,
    name: String,
    kind: String,
    cycles: String,
}

impl MachineConfig {
    /// Parses configuration text.
    ///
    /// Blank lines are ignored everywhere. The alphabet line is trimmed and
    /// upper-cased.
    ///
    /// # Errors
    /// - [`EnigmaError::MalformedConfig`] for grammar violations.
    /// - [`EnigmaError::InvalidSlotCount`] / [`EnigmaError::InvalidPawlCount`]
    ///   for impossible counts.
    /// - Any error raised while building the alphabet, a permutation or a
    ///   rotor, e.g. [`EnigmaError::NotDerangement`] for a bad reflector.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (line, alpha_text) = lines.next().ok_or(EnigmaError::MalformedConfig {
            line: 1,
            reason: "missing alphabet".to_string(),
        })?;
        let alphabet = Arc::new(Self::parse_alphabet(line, alpha_text)?);

        let (line, counts) = lines.next().ok_or(EnigmaError::MalformedConfig {
            line: line + 1,
            reason: "missing slot and pawl counts".to_string(),
        })?;
        let (num_rotors, pawls) = Self::parse_counts(line, counts)?;

        let mut rotors = RotorPool::new();
        let mut pending: Option<PendingRotor> = None;
        for (line, text) in lines {
            if text.starts_with('(') {
                match pending.as_mut() {
                    Some(rotor) => {
                        rotor.cycles.push(' ');
                        rotor.cycles.push_str(text);
                    }
                    None => {
                        return Err(EnigmaError::MalformedConfig {
                            line,
                            reason: "cycles given before any rotor".to_string(),
                        });
                    }
                }
                continue;
            }

            if let Some(done) = pending.take() {
                rotors.add(Self::build_rotor(done, &alphabet)?)?;
            }
            pending = Some(Self::parse_rotor_header(line, text)?);
        }
        if let Some(done) = pending.take() {
            rotors.add(Self::build_rotor(done, &alphabet)?)?;
        }

        debug!(
            alphabet = %alphabet,
            num_rotors,
            pawls,
            available = rotors.len(),
            "configuration loaded"
        );

        Ok(MachineConfig {
            alphabet,
            num_rotors,
            pawls,
            rotors,
        })
    }

    fn parse_alphabet(line: usize, text: &str) -> Result<Alphabet> {
        let chars = text.to_uppercase();
        if let Some(bad) = chars
            .chars()
            .find(|c| c.is_whitespace() || RESERVED.contains(c))
        {
            return Err(EnigmaError::MalformedConfig {
                line,
                reason: format!("alphabet may not contain {:?}", bad),
            });
        }
        Alphabet::new(&chars).map_err(|e| EnigmaError::MalformedConfig {
            line,
            reason: e.to_string(),
        })
    }

    fn parse_counts(line: usize, text: &str) -> Result<(usize, usize)> {
        let malformed = || EnigmaError::MalformedConfig {
            line,
            reason: format!("expected slot and pawl counts, got {:?}", text),
        };
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(malformed());
        }
        let num_rotors: usize = fields[0].parse().map_err(|_| malformed())?;
        let pawls: usize = fields[1].parse().map_err(|_| malformed())?;
        if num_rotors < 2 {
            return Err(EnigmaError::InvalidSlotCount(num_rotors));
        }
        if pawls >= num_rotors {
            return Err(EnigmaError::InvalidPawlCount {
                pawls,
                slots: num_rotors,
            });
        }
        Ok((num_rotors, pawls))
    }

    fn parse_rotor_header(line: usize, text: &str) -> Result<PendingRotor> {
        let mut fields = text.split_whitespace();
        let (Some(name), Some(kind)) = (fields.next(), fields.next()) else {
            return Err(EnigmaError::MalformedConfig {
                line,
                reason: format!("expected rotor name and type, got {:?}", text),
            });
        };
        Ok(PendingRotor {
            line,
            name: name.to_string(),
            kind: kind.to_string(),
            cycles: fields.collect::<Vec<&str>>().join(" "),
        })
    }

    fn build_rotor(pending: PendingRotor, alphabet: &Arc<Alphabet>) -> Result<Rotor> {
        let permutation = Permutation::new(&pending.cycles, alphabet.clone())?;
        let mut kind = pending.kind.chars();
        match (kind.next(), kind.as_str()) {
            (Some('M'), notches) => Rotor::moving(&pending.name, permutation, notches),
            (Some('N'), "") => Ok(Rotor::fixed(&pending.name, permutation)),
            (Some('R'), "") => Rotor::reflector(&pending.name, permutation),
            _ => Err(EnigmaError::MalformedConfig {
                line: pending.line,
                reason: format!(
                    "rotor {} has unknown type {:?}",
                    pending.name, pending.kind
                ),
            }),
        }
    }

    /// Returns the shared alphabet.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls.
    pub fn pawls(&self) -> usize {
        self.pawls
    }

    /// Returns the available rotors.
    pub fn rotors(&self) -> &RotorPool {
        &self.rotors
    }

    /// Builds an unconfigured machine with its own copy of the rotors.
    ///
    /// # Errors
    /// Any error of [`Machine::new`].
    pub fn build_machine(&self) -> Result<Machine> {
        Machine::new(
            self.alphabet.clone(),
            self.num_rotors,
            self.pawls,
            self.rotors.clone(),
        )
    }
}
