//! Permutation: cycle-notation remapping of alphabet indices.
//!
//! A permutation is written as parenthesised cycles, e.g. `(AELT) (BKNW)`,
//! meaning `A -> E -> L -> T -> A` and `B -> K -> N -> W -> B`. Characters
//! absent from every cycle map to themselves. Whitespace is insignificant.
//!
//! The cycles are kept for inspection; lookups go through forward and
//! inverse tables filled once at construction.

use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};

/// Bijective remapping of `[0, alphabet.size())` built from disjoint cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    cycles: Vec<Vec<usize>>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Parses `cycles` in cycle notation over `alphabet`.
    ///
    /// # Errors
    /// - [`EnigmaError::MalformedCycles`] for unbalanced parentheses or
    ///   characters outside a cycle.
    /// - [`EnigmaError::NotInAlphabet`] for a cycle member not in `alphabet`.
    /// - [`EnigmaError::DuplicateCycleMember`] if a character appears twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let alpha = Arc::new(Alphabet::upper());
    /// let perm = Permutation::new("(AHDC) (POL)", alpha).unwrap();
    /// assert_eq!(perm.permute_char('A').unwrap(), 'H');
    /// assert_eq!(perm.invert_char('A').unwrap(), 'C');
    /// assert_eq!(perm.permute_char('Z').unwrap(), 'Z');
    /// ```
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self> {
        let size = alphabet.size();
        let mut perm = Permutation {
            alphabet,
            cycles: Vec::new(),
            forward: (0..size).collect(),
            inverse: (0..size).collect(),
        };

        let mut current: Option<Vec<usize>> = None;
        for c in cycles.chars().filter(|c| !c.is_whitespace()) {
            match c {
                '(' => {
                    if current.is_some() {
                        return Err(EnigmaError::MalformedCycles(format!(
                            "nested '(' in {:?}",
                            cycles
                        )));
                    }
                    current = Some(Vec::new());
                }
                ')' => match current.take() {
                    Some(cycle) => perm.add_cycle(cycle),
                    None => {
                        return Err(EnigmaError::MalformedCycles(format!(
                            "unmatched ')' in {:?}",
                            cycles
                        )));
                    }
                },
                _ => {
                    let Some(cycle) = current.as_mut() else {
                        return Err(EnigmaError::MalformedCycles(format!(
                            "{:?} outside of a cycle in {:?}",
                            c, cycles
                        )));
                    };
                    let index = perm.alphabet.to_int(c)?;
                    if cycle.contains(&index) || perm.in_any_cycle(index) {
                        return Err(EnigmaError::DuplicateCycleMember(c));
                    }
                    cycle.push(index);
                }
            }
        }
        if current.is_some() {
            return Err(EnigmaError::MalformedCycles(format!(
                "unterminated cycle in {:?}",
                cycles
            )));
        }
        Ok(perm)
    }

    /// The permutation mapping every index to itself.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let size = alphabet.size();
        Permutation {
            alphabet,
            cycles: Vec::new(),
            forward: (0..size).collect(),
            inverse: (0..size).collect(),
        }
    }

    /// Adds the cycle `c0 -> c1 -> ... -> cm -> c0`. Members are already
    /// known to be disjoint from every existing cycle.
    fn add_cycle(&mut self, cycle: Vec<usize>) {
        if cycle.is_empty() {
            return;
        }
        let len = cycle.len();
        for (i, &from) in cycle.iter().enumerate() {
            let to = cycle[(i + 1) % len];
            self.forward[from] = to;
            self.inverse[to] = from;
        }
        self.cycles.push(cycle);
    }

    fn in_any_cycle(&self, index: usize) -> bool {
        self.cycles.iter().any(|cycle| cycle.contains(&index))
    }

    /// Returns `p` reduced modulo the alphabet size, into `[0, size)`.
    pub fn wrap(&self, p: i64) -> usize {
        p.rem_euclid(self.size() as i64) as usize
    }

    /// Returns the size of the alphabet this permutation acts on.
    pub fn size(&self) -> usize {
        self.alphabet.size()
    }

    /// Applies the permutation to `p` modulo the alphabet size.
    pub fn permute(&self, p: usize) -> usize {
        self.forward[p % self.size()]
    }

    /// Applies the inverse permutation to `c` modulo the alphabet size.
    pub fn invert(&self, c: usize) -> usize {
        self.inverse[c % self.size()]
    }

    /// Character form of [`permute`](Self::permute).
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotInAlphabet`] if `p` is not in the alphabet.
    pub fn permute_char(&self, p: char) -> Result<char> {
        let index = self.alphabet.to_int(p)?;
        self.alphabet.to_char(self.permute(index))
    }

    /// Character form of [`invert`](Self::invert).
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotInAlphabet`] if `c` is not in the alphabet.
    pub fn invert_char(&self, c: char) -> Result<char> {
        let index = self.alphabet.to_int(c)?;
        self.alphabet.to_char(self.invert(index))
    }

    /// Returns true iff no index maps to itself.
    pub fn derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &p)| i != p)
    }

    /// Returns the alphabet this permutation was built over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the non-empty cycles in the order they were written.
    pub fn cycles(&self) -> &[Vec<usize>] {
        &self.cycles
    }
}
