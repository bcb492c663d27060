//! Machine: the stepping and signal-path engine.
//!
//! Holds an ordered slot array of rotor handles (slot 0 is the reflector),
//! the pool those handles resolve against, and an optional plugboard.
//!
//! ```text
//!  key ─▶ plugboard ─▶ slot N-1 ─▶ ... ─▶ slot 1 ─▶ slot 0 (reflector)
//!                                                     │
//!  lamp ◀─ plugboard ◀─ slot N-1 ◀─ ... ◀─ slot 1 ◀───┘
//! ```
//!
//! Before every character the machine steps its rotors: the rightmost
//! rotor always moves, and any pawl-driven rotor sitting at a notch moves
//! together with its left neighbour.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;
use crate::rotor::Rotor;
use crate::rotor_pool::{RotorId, RotorPool};

/// A complete rotor machine.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use enigma::{Alphabet, Machine, Permutation, Rotor, RotorPool};
///
/// let alpha = Arc::new(Alphabet::upper());
/// let wiring = |cycles: &str| Permutation::new(cycles, alpha.clone()).unwrap();
///
/// let mut pool = RotorPool::new();
/// pool.add(Rotor::reflector("B", wiring(
///     "(AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)")).unwrap()).unwrap();
/// pool.add(Rotor::moving("I", wiring(
///     "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)"), "Q").unwrap()).unwrap();
/// pool.add(Rotor::moving("II", wiring(
///     "(FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)"), "E").unwrap()).unwrap();
/// pool.add(Rotor::moving("III", wiring(
///     "(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)"), "V").unwrap()).unwrap();
///
/// let mut machine = Machine::new(alpha.clone(), 4, 3, pool).unwrap();
/// machine.configure(&["B", "I", "II", "III"], "AAA", None).unwrap();
/// assert_eq!(machine.convert_message("AAAAA").unwrap(), "BDZGO");
/// ```
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    pool: RotorPool,
    num_rotors: usize,
    pawls: usize,
    slots: Vec<RotorId>,
    plugboard: Option<Permutation>,
}

impl Machine {
    /// Creates a machine with `num_rotors` slots and `pawls` pawls,
    /// selecting its rotors from `pool`.
    ///
    /// The machine is unconfigured until [`insert_rotors`](Self::insert_rotors)
    /// (or [`configure`](Self::configure)) succeeds.
    ///
    /// # Errors
    /// - [`EnigmaError::InvalidSlotCount`] if `num_rotors < 2`.
    /// - [`EnigmaError::InvalidPawlCount`] if `pawls >= num_rotors`.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        pawls: usize,
        pool: RotorPool,
    ) -> Result<Self> {
        if num_rotors < 2 {
            return Err(EnigmaError::InvalidSlotCount(num_rotors));
        }
        if pawls >= num_rotors {
            return Err(EnigmaError::InvalidPawlCount {
                pawls,
                slots: num_rotors,
            });
        }
        Ok(Machine {
            alphabet,
            pool,
            num_rotors,
            pawls,
            slots: Vec::with_capacity(num_rotors),
            plugboard: None,
        })
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls (and thus of rotors able to move).
    pub fn num_pawls(&self) -> usize {
        self.pawls
    }

    /// Returns the machine's alphabet.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns true once rotors have been inserted.
    pub fn is_configured(&self) -> bool {
        self.slots.len() == self.num_rotors
    }

    /// Returns the rotor in `slot`, if the machine is configured.
    pub fn rotor_at(&self, slot: usize) -> Option<&Rotor> {
        self.slots.get(slot).map(|&id| self.pool.rotor(id))
    }

    /// Returns the settings of all placed rotors, slot 0 first.
    pub fn settings(&self) -> Vec<usize> {
        self.slots
            .iter()
            .map(|&id| self.pool.rotor(id).setting())
            .collect()
    }

    /// Returns the settings of the placed rotors after the reflector as
    /// alphabet characters, e.g. `"AXLE"`.
    pub fn setting_string(&self) -> String {
        self.slots
            .iter()
            .skip(1)
            .filter_map(|&id| self.alphabet.to_char(self.pool.rotor(id).setting()).ok())
            .collect()
    }

    /// Returns the current plugboard, if any.
    pub fn plugboard(&self) -> Option<&Permutation> {
        self.plugboard.as_ref()
    }

    /// Places the rotors named by `rotors` into the slots, `rotors[0]`
    /// naming the reflector. Names match the pool ignoring case. Every
    /// placed rotor starts at setting 0.
    ///
    /// On error the previous slot assignment is left untouched.
    ///
    /// # Errors
    /// - [`EnigmaError::RotorCountMismatch`] unless exactly `num_rotors()` names are given.
    /// - [`EnigmaError::UnknownRotor`] for a name absent from the pool.
    /// - [`EnigmaError::DuplicateRotor`] if one rotor is named twice.
    /// - [`EnigmaError::ReflectorRequired`] if slot 0 is not a reflector.
    /// - [`EnigmaError::TooManyMovingRotors`] if moving rotors outnumber pawls.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, rotors: &[S]) -> Result<()> {
        if rotors.len() != self.num_rotors {
            return Err(EnigmaError::RotorCountMismatch {
                expected: self.num_rotors,
                actual: rotors.len(),
            });
        }

        let mut slots = Vec::with_capacity(self.num_rotors);
        for name in rotors {
            let name = name.as_ref();
            let id = self
                .pool
                .find(name)
                .ok_or_else(|| EnigmaError::UnknownRotor(name.to_string()))?;
            if slots.contains(&id) {
                return Err(EnigmaError::DuplicateRotor(name.to_string()));
            }
            slots.push(id);
        }

        let reflector = self.pool.rotor(slots[0]);
        if !reflector.reflecting() {
            return Err(EnigmaError::ReflectorRequired(reflector.name().to_string()));
        }

        let moving = slots
            .iter()
            .filter(|&&id| self.pool.rotor(id).rotates())
            .count();
        if moving > self.pawls {
            return Err(EnigmaError::TooManyMovingRotors {
                moving,
                pawls: self.pawls,
            });
        }

        for &id in &slots {
            self.pool.rotor_mut(id).set(0)?;
        }
        self.slots = slots;
        Ok(())
    }

    /// Sets the rotors after the reflector, left to right, to the
    /// positions named by the characters of `setting`.
    ///
    /// # Errors
    /// - [`EnigmaError::NotConfigured`] if no rotors have been inserted.
    /// - [`EnigmaError::BadSettingLength`] unless `setting` has `num_rotors() - 1` characters.
    /// - [`EnigmaError::NotInAlphabet`] for a character outside the alphabet.
    /// - [`EnigmaError::ReflectorSetting`] for a nonzero position on a
    ///   reflector placed after slot 0.
    ///
    /// On error no rotor setting changes.
    pub fn set_rotors(&mut self, setting: &str) -> Result<()> {
        if !self.is_configured() {
            return Err(EnigmaError::NotConfigured);
        }
        let expected = self.num_rotors - 1;
        let actual = setting.chars().count();
        if actual != expected {
            return Err(EnigmaError::BadSettingLength { expected, actual });
        }
        let positions = setting
            .chars()
            .map(|c| self.alphabet.to_int(c))
            .collect::<Result<Vec<usize>>>()?;
        for (&id, &posn) in self.slots[1..].iter().zip(&positions) {
            if self.pool.rotor(id).reflecting() && posn != 0 {
                return Err(EnigmaError::ReflectorSetting(posn));
            }
        }
        for (&id, posn) in self.slots[1..].iter().zip(positions) {
            self.pool.rotor_mut(id).set(posn)?;
        }
        Ok(())
    }

    /// Replaces the plugboard. `None` means no plugboard (identity).
    pub fn set_plugboard(&mut self, plugboard: Option<Permutation>) {
        self.plugboard = plugboard;
    }

    /// Configures the machine in one step: plugboard, rotor placement and
    /// rotor positions.
    ///
    /// # Parameters
    /// - `rotors`: Rotor names, reflector first.
    /// - `setting`: Positions for every rotor after the reflector.
    /// - `plugboard`: Plugboard cycles over the machine alphabet, if any.
    ///
    /// # Errors
    /// Any error of [`Permutation::new`], [`insert_rotors`](Self::insert_rotors)
    /// or [`set_rotors`](Self::set_rotors). The caller must not convert
    /// after a failed configure.
    pub fn configure<S: AsRef<str>>(
        &mut self,
        rotors: &[S],
        setting: &str,
        plugboard: Option<&str>,
    ) -> Result<()> {
        let plugboard = plugboard
            .map(|cycles| Permutation::new(cycles, self.alphabet.clone()))
            .transpose()?;
        self.insert_rotors(rotors)?;
        self.set_rotors(setting)?;
        self.set_plugboard(plugboard);

        debug!(
            rotors = ?rotors.iter().map(AsRef::as_ref).collect::<Vec<&str>>(),
            setting,
            plugboard = self.plugboard.is_some(),
            "machine configured"
        );
        Ok(())
    }

    /// Steps the rotors for one key press.
    ///
    /// Of the rightmost `num_pawls()` rotors, every one except the leftmost
    /// of them checks its own notch: at a notch it moves itself and its left
    /// neighbour. The rightmost rotor always moves. Notches are read before
    /// anything moves, so each rotor moves at most once per step.
    pub fn advance_all(&mut self) {
        let n = self.slots.len();
        if n == 0 {
            return;
        }

        let mut advance = vec![false; n];
        let first = n + 1 - self.pawls.min(n);
        for i in first.max(1)..n {
            if self.pool.at_notch(self.slots[i]) {
                advance[i - 1] = true;
                advance[i] = true;
            }
        }
        advance[n - 1] = true;
        trace!(?advance, "stepping rotors");

        for (i, &step) in advance.iter().enumerate() {
            if step {
                self.pool.advance(self.slots[i]);
            }
        }
    }

    /// Converts the character with index `c` after first advancing the
    /// machine. Indices are reduced modulo the alphabet size.
    pub fn convert(&mut self, c: usize) -> usize {
        self.advance_all();

        let mut c = c % self.alphabet.size();
        if let Some(plugboard) = &self.plugboard {
            c = plugboard.permute(c);
        }
        for &id in self.slots.iter().rev() {
            c = self.pool.convert_forward(id, c);
        }
        for &id in self.slots.iter().skip(1) {
            c = self.pool.convert_backward(id, c);
        }
        if let Some(plugboard) = &self.plugboard {
            c = plugboard.permute(c);
        }
        c
    }

    /// Converts every character of `msg`, advancing the machine once per
    /// character.
    ///
    /// The whole message is validated first, so a rejected message leaves
    /// the rotor settings unchanged.
    ///
    /// # Errors
    /// - [`EnigmaError::NotConfigured`] before a successful configure.
    /// - [`EnigmaError::NotInAlphabet`] for a character outside the alphabet.
    pub fn convert_message(&mut self, msg: &str) -> Result<String> {
        if !self.is_configured() {
            return Err(EnigmaError::NotConfigured);
        }
        let indices = msg
            .chars()
            .map(|c| self.alphabet.to_int(c))
            .collect::<Result<Vec<usize>>>()?;

        let mut result = String::with_capacity(msg.len());
        for index in indices {
            let converted = self.convert(index);
            result.push(self.alphabet.to_char(converted)?);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UKW_B: &str = "(AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)";
    const ROTOR_I: &str = "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)";
    const ROTOR_II: &str = "(FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)";
    const ROTOR_III: &str = "(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)";
    const BETA: &str = "(ALBEVFCYODJWUGNMQTZSKPR) (HIX)";

    fn historical_pool(alpha: &Arc<Alphabet>) -> RotorPool {
        let wiring = |cycles: &str| Permutation::new(cycles, alpha.clone()).unwrap();
        let mut pool = RotorPool::new();
        pool.add(Rotor::reflector("B", wiring(UKW_B)).unwrap()).unwrap();
        pool.add(Rotor::moving("I", wiring(ROTOR_I), "Q").unwrap()).unwrap();
        pool.add(Rotor::moving("II", wiring(ROTOR_II), "E").unwrap()).unwrap();
        pool.add(Rotor::moving("III", wiring(ROTOR_III), "V").unwrap()).unwrap();
        pool.add(Rotor::fixed("Beta", wiring(BETA))).unwrap();
        pool
    }

    fn m3() -> Machine {
        let alpha = Arc::new(Alphabet::upper());
        let pool = historical_pool(&alpha);
        Machine::new(alpha, 4, 3, pool).unwrap()
    }

    #[test]
    fn test_new_validates_counts() {
        let alpha = Arc::new(Alphabet::upper());
        assert_eq!(
            Machine::new(alpha.clone(), 1, 0, RotorPool::new()).unwrap_err(),
            EnigmaError::InvalidSlotCount(1)
        );
        assert_eq!(
            Machine::new(alpha.clone(), 3, 3, RotorPool::new()).unwrap_err(),
            EnigmaError::InvalidPawlCount { pawls: 3, slots: 3 }
        );
        assert!(Machine::new(alpha, 3, 0, RotorPool::new()).is_ok());
    }

    #[test]
    fn test_unconfigured_machine() {
        let mut machine = m3();
        assert!(!machine.is_configured());
        assert!(machine.rotor_at(0).is_none());
        assert_eq!(machine.set_rotors("AAA"), Err(EnigmaError::NotConfigured));
        assert_eq!(
            machine.convert_message("A"),
            Err(EnigmaError::NotConfigured)
        );
    }

    #[test]
    fn test_insert_rotors_case_insensitive() {
        let mut machine = m3();
        machine.insert_rotors(&["b", "i", "Ii", "iii"]).unwrap();
        assert!(machine.is_configured());
        assert_eq!(machine.rotor_at(2).map(|r| r.name()), Some("II"));
        assert_eq!(machine.settings(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_insert_unknown_rotor() {
        let mut machine = m3();
        assert_eq!(
            machine.insert_rotors(&["B", "I", "II", "IX"]),
            Err(EnigmaError::UnknownRotor("IX".to_string()))
        );
    }

    #[test]
    fn test_insert_wrong_count() {
        let mut machine = m3();
        assert_eq!(
            machine.insert_rotors(&["B", "I", "II"]),
            Err(EnigmaError::RotorCountMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_insert_requires_reflector_first() {
        let mut machine = m3();
        assert_eq!(
            machine.insert_rotors(&["I", "B", "II", "III"]),
            Err(EnigmaError::ReflectorRequired("I".to_string()))
        );
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut machine = m3();
        assert_eq!(
            machine.insert_rotors(&["B", "I", "i", "III"]),
            Err(EnigmaError::DuplicateRotor("i".to_string()))
        );
    }

    #[test]
    fn test_insert_too_many_moving_rotors() {
        let alpha = Arc::new(Alphabet::upper());
        let pool = historical_pool(&alpha);
        let mut machine = Machine::new(alpha, 4, 2, pool).unwrap();
        assert_eq!(
            machine.insert_rotors(&["B", "I", "II", "III"]),
            Err(EnigmaError::TooManyMovingRotors { moving: 3, pawls: 2 })
        );
        assert!(machine.insert_rotors(&["B", "Beta", "II", "III"]).is_ok());
    }

    #[test]
    fn test_failed_insert_keeps_previous_slots() {
        let mut machine = m3();
        machine.insert_rotors(&["B", "I", "II", "III"]).unwrap();
        assert!(machine.insert_rotors(&["B", "I", "II", "VIII"]).is_err());
        assert_eq!(machine.rotor_at(3).map(|r| r.name()), Some("III"));
    }

    #[test]
    fn test_set_rotors_validation() {
        let mut machine = m3();
        machine.insert_rotors(&["B", "I", "II", "III"]).unwrap();
        assert_eq!(
            machine.set_rotors("AAAA"),
            Err(EnigmaError::BadSettingLength {
                expected: 3,
                actual: 4
            })
        );
        assert_eq!(machine.set_rotors("AaA"), Err(EnigmaError::NotInAlphabet('a')));
        machine.set_rotors("AXL").unwrap();
        assert_eq!(machine.settings(), vec![0, 0, 23, 11]);
        assert_eq!(machine.setting_string(), "AXL");
    }

    #[test]
    fn test_set_rotors_reflector_after_slot_zero() {
        let alpha = Arc::new(Alphabet::upper());
        let mut pool = historical_pool(&alpha);
        let thin_c = Permutation::new(
            "(AR) (BD) (CO) (EJ) (FN) (GT) (HK) (IV) (LM) (PW) (QZ) (SX) (UY)",
            alpha.clone(),
        )
        .unwrap();
        pool.add(Rotor::reflector("C", thin_c).unwrap()).unwrap();
        let mut machine = Machine::new(alpha, 4, 2, pool).unwrap();
        machine.configure(&["B", "II", "III", "C"], "FGA", None).unwrap();

        assert_eq!(
            machine.set_rotors("BCD"),
            Err(EnigmaError::ReflectorSetting(3))
        );
        // Nothing moved, including the rotors left of the reflector.
        assert_eq!(machine.setting_string(), "FGA");
        machine.set_rotors("BCA").unwrap();
        assert_eq!(machine.setting_string(), "BCA");
    }

    #[test]
    fn test_odometer_stepping() {
        let mut machine = m3();
        // Rotor III carries its notch at V.
        machine.configure(&["B", "I", "II", "III"], "AAU", None).unwrap();
        machine.advance_all();
        assert_eq!(machine.setting_string(), "AAV");
        machine.advance_all();
        assert_eq!(machine.setting_string(), "ABW");
        machine.advance_all();
        assert_eq!(machine.setting_string(), "ABX");
    }

    #[test]
    fn test_double_step() {
        let mut machine = m3();
        machine.configure(&["B", "I", "II", "III"], "ADU", None).unwrap();
        let mut seen = Vec::new();
        for _ in 0..4 {
            machine.advance_all();
            seen.push(machine.setting_string());
        }
        assert_eq!(seen, vec!["ADV", "AEW", "BFX", "BFY"]);
    }

    #[test]
    fn test_leftmost_pawl_rotor_notch_ignored() {
        let mut machine = m3();
        // Rotor I at its notch Q: nothing to its left can be driven.
        machine.configure(&["B", "I", "II", "III"], "QAA", None).unwrap();
        machine.advance_all();
        assert_eq!(machine.setting_string(), "QAB");
    }

    #[test]
    fn test_fixed_rotor_in_pawl_range_never_moves() {
        let alpha = Arc::new(Alphabet::upper());
        let pool = historical_pool(&alpha);
        let mut machine = Machine::new(alpha, 4, 3, pool).unwrap();
        // II at its notch E flags Beta to its left, which cannot move.
        machine.configure(&["B", "Beta", "II", "III"], "CEV", None).unwrap();
        machine.advance_all();
        assert_eq!(machine.setting_string(), "CFW");
    }

    #[test]
    fn test_historical_vector() {
        let mut machine = m3();
        machine.configure(&["B", "I", "II", "III"], "AAA", None).unwrap();
        assert_eq!(machine.convert_message("AAAAA").unwrap(), "BDZGO");
    }

    #[test]
    fn test_double_step_ciphertext() {
        let mut machine = m3();
        machine.configure(&["B", "I", "II", "III"], "ADU", None).unwrap();
        assert_eq!(machine.convert_message("HELLOWORLD").unwrap(), "IBXXXNVDFL");
    }

    #[test]
    fn test_reciprocal() {
        let mut machine = m3();
        machine.configure(&["B", "I", "II", "III"], "ADU", None).unwrap();
        let cipher = machine.convert_message("ATTACKATDAWN").unwrap();
        machine.set_rotors("ADU").unwrap();
        assert_eq!(machine.convert_message(&cipher).unwrap(), "ATTACKATDAWN");
    }

    #[test]
    fn test_plugboard_applied_both_ways() {
        let mut plain = m3();
        plain.configure(&["B", "I", "II", "III"], "AAA", None).unwrap();
        let mut plugged = m3();
        plugged
            .configure(&["B", "I", "II", "III"], "AAA", Some("(AB)"))
            .unwrap();
        assert!(plugged.plugboard().is_some());

        // A is swapped to B on the way in; unplugged machine maps B -> ?
        let through_b = plain.convert_message("B").unwrap();
        let expected = match through_b.as_str() {
            "A" => "B",
            "B" => "A",
            other => other,
        };
        assert_eq!(plugged.convert_message("A").unwrap(), expected);
    }

    #[test]
    fn test_configure_without_plugboard_clears_it() {
        let mut machine = m3();
        machine
            .configure(&["B", "I", "II", "III"], "AAA", Some("(AB) (CD)"))
            .unwrap();
        machine.configure(&["B", "I", "II", "III"], "AAA", None).unwrap();
        assert!(machine.plugboard().is_none());
    }

    #[test]
    fn test_rejected_message_leaves_state() {
        let mut machine = m3();
        machine.configure(&["B", "I", "II", "III"], "AAA", None).unwrap();
        assert_eq!(
            machine.convert_message("AB1"),
            Err(EnigmaError::NotInAlphabet('1'))
        );
        assert_eq!(machine.setting_string(), "AAA");
    }

    #[test]
    fn test_no_letter_encrypts_to_itself() {
        let mut machine = m3();
        machine.configure(&["B", "I", "II", "III"], "MCK", None).unwrap();
        for c in 0..26 {
            assert_ne!(machine.convert(c), c);
        }
    }
}
