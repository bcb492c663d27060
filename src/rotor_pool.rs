//! RotorPool: registry of the rotors available to a machine.
//!
//! Uses an arena-based design so machine slots never hold references into
//! the pool. All rotors are stored in a [`RotorPool`] and referenced by
//! [`RotorId`]; a slot array is simply a `Vec<RotorId>`.

use crate::error::{EnigmaError, Result};
use crate::rotor::Rotor;

/// Unique identifier for a rotor within a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotorId(pub usize);

/// Arena of named rotors.
///
/// Names are unique ignoring ASCII case. Cloning a pool yields an
/// independent set of rotor settings, which is how several machines can
/// run from one configuration at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotorPool {
    rotors: Vec<Rotor>,
}

impl RotorPool {
    /// Creates a new empty pool.
    pub fn new() -> Self {
        RotorPool { rotors: Vec::new() }
    }

    /// Adds `rotor` to the pool.
    ///
    /// # Errors
    /// Returns [`EnigmaError::DuplicateRotorName`] if a rotor with the same
    /// name (ignoring case) is already present.
    pub fn add(&mut self, rotor: Rotor) -> Result<RotorId> {
        if self.find(rotor.name()).is_some() {
            return Err(EnigmaError::DuplicateRotorName(rotor.name().to_string()));
        }
        let id = RotorId(self.rotors.len());
        self.rotors.push(rotor);
        Ok(id)
    }

    /// Looks up a rotor by name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<RotorId> {
        self.rotors
            .iter()
            .position(|r| r.name().eq_ignore_ascii_case(name))
            .map(RotorId)
    }

    /// Returns the rotor behind `id`, if any.
    pub fn get(&self, id: RotorId) -> Option<&Rotor> {
        self.rotors.get(id.0)
    }

    /// Returns the rotor behind `id` mutably, if any.
    pub fn get_mut(&mut self, id: RotorId) -> Option<&mut Rotor> {
        self.rotors.get_mut(id.0)
    }

    /// Returns the number of rotors in the pool.
    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    /// Returns true if the pool holds no rotors.
    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }

    /// Iterates over `(id, rotor)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (RotorId, &Rotor)> {
        self.rotors.iter().enumerate().map(|(i, r)| (RotorId(i), r))
    }

    // --- Slot-level helpers used by the machine ---

    pub(crate) fn rotor(&self, id: RotorId) -> &Rotor {
        &self.rotors[id.0]
    }

    pub(crate) fn rotor_mut(&mut self, id: RotorId) -> &mut Rotor {
        &mut self.rotors[id.0]
    }

    pub(crate) fn convert_forward(&self, id: RotorId, p: usize) -> usize {
        self.rotors[id.0].convert_forward(p)
    }

    pub(crate) fn convert_backward(&self, id: RotorId, e: usize) -> usize {
        self.rotors[id.0].convert_backward(e)
    }

    pub(crate) fn at_notch(&self, id: RotorId) -> bool {
        self.rotors[id.0].at_notch()
    }

    pub(crate) fn advance(&mut self, id: RotorId) {
        self.rotors[id.0].advance();
    }
}
