//! Rotor: a permutation wheel with a rotational setting.
//!
//! Three variants share one representation and differ only in how they
//! step:
//!
//! | Variant     | Rotates | Notches | Slot            |
//! |-------------|---------|---------|-----------------|
//! | `Reflector` | no      | none    | always slot 0   |
//! | `Fixed`     | no      | none    | any other slot  |
//! | `Moving`    | yes     | 0..n    | a pawl-driven slot |
//!
//! Conversion shifts the incoming contact by the current setting, applies
//! the permutation and shifts the result back.

use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;

/// Variant tag carrying the variant-specific state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Turns the signal around; setting fixed at 0.
    Reflector,
    /// Never rotates, has no notches.
    Fixed,
    /// Rotates one position per advance; engages the pawl to its left at
    /// any of its notch positions.
    Moving { notches: Vec<usize> },
}

/// A named rotor with its wiring and current setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    name: String,
    permutation: Permutation,
    setting: usize,
    kind: RotorKind,
}

impl Rotor {
    /// Creates a reflector named `name` wired by `permutation`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotDerangement`] if `permutation` maps any
    /// character to itself.
    pub fn reflector(name: &str, permutation: Permutation) -> Result<Self> {
        if !permutation.derangement() {
            return Err(EnigmaError::NotDerangement(name.to_string()));
        }
        Ok(Self::build(name, permutation, RotorKind::Reflector))
    }

    /// Creates a non-rotating rotor named `name` wired by `permutation`.
    pub fn fixed(name: &str, permutation: Permutation) -> Self {
        Self::build(name, permutation, RotorKind::Fixed)
    }

    /// Creates a moving rotor whose notches sit at the positions of the
    /// characters in `notches`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotInAlphabet`] if a notch character is not
    /// in the permutation's alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation, Rotor};
    ///
    /// let alpha = Arc::new(Alphabet::upper());
    /// let perm = Permutation::new("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)", alpha).unwrap();
    /// let mut rotor = Rotor::moving("I", perm, "Q").unwrap();
    /// rotor.set_char('Q').unwrap();
    /// assert!(rotor.at_notch());
    /// rotor.advance();
    /// assert!(!rotor.at_notch());
    /// ```
    pub fn moving(name: &str, permutation: Permutation, notches: &str) -> Result<Self> {
        let alphabet = permutation.alphabet().clone();
        let mut positions = Vec::with_capacity(notches.len());
        for c in notches.chars() {
            let index = alphabet.to_int(c)?;
            if !positions.contains(&index) {
                positions.push(index);
            }
        }
        Ok(Self::build(
            name,
            permutation,
            RotorKind::Moving { notches: positions },
        ))
    }

    fn build(name: &str, permutation: Permutation, kind: RotorKind) -> Self {
        Rotor {
            name: name.to_string(),
            permutation,
            setting: 0,
            kind,
        }
    }

    /// Returns the rotor's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the variant tag.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Returns the wiring.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Returns the alphabet the wiring is defined over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.permutation.alphabet()
    }

    /// Returns the alphabet size.
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// Returns true only for reflectors.
    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// Returns true only for moving rotors.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// Returns the current setting.
    pub fn setting(&self) -> usize {
        self.setting
    }

    /// Sets the current setting to `posn`.
    ///
    /// # Errors
    /// - [`EnigmaError::OutOfRange`] if `posn >= size()`.
    /// - [`EnigmaError::ReflectorSetting`] for a nonzero reflector setting.
    pub fn set(&mut self, posn: usize) -> Result<()> {
        if posn >= self.size() {
            return Err(EnigmaError::OutOfRange {
                index: posn,
                size: self.size(),
            });
        }
        if self.reflecting() && posn != 0 {
            return Err(EnigmaError::ReflectorSetting(posn));
        }
        self.setting = posn;
        Ok(())
    }

    /// Sets the current setting to the index of `cposn`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotInAlphabet`] if `cposn` is not in the alphabet.
    pub fn set_char(&mut self, cposn: char) -> Result<()> {
        let posn = self.alphabet().to_int(cposn)?;
        self.set(posn)
    }

    /// Maps contact `p` entering from the right to the contact leaving on
    /// the left.
    pub fn convert_forward(&self, p: usize) -> usize {
        let size = self.size();
        let contact = self.permutation.permute((p % size + self.setting) % size);
        (contact + size - self.setting) % size
    }

    /// Maps contact `e` entering from the left to the contact leaving on
    /// the right. Inverse of [`convert_forward`](Self::convert_forward).
    pub fn convert_backward(&self, e: usize) -> usize {
        let size = self.size();
        let contact = self.permutation.invert((e % size + self.setting) % size);
        (contact + size - self.setting) % size
    }

    /// Returns true if a moving rotor sits at one of its notches.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.setting),
            RotorKind::Reflector | RotorKind::Fixed => false,
        }
    }

    /// Advances a moving rotor by one position. No-op for other variants.
    pub fn advance(&mut self) {
        if self.rotates() {
            self.setting = (self.setting + 1) % self.size();
        }
    }
}
