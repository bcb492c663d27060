//! Alphabet: bidirectional mapping between characters and dense indices.
//!
//! An [`Alphabet`] is built once from configuration text and never mutated.
//! Permutations, rotors and the machine share it through an `Arc`.

use std::collections::HashMap;
use std::fmt;

use crate::error::{EnigmaError, Result};

/// Ordered set of unique characters, each assigned an index in `[0, size)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Creates an alphabet whose character number `k` has index `k`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::EmptyAlphabet`] if `chars` is empty and
    /// [`EnigmaError::DuplicateAlphabetChar`] if a character repeats.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Alphabet;
    ///
    /// let alpha = Alphabet::new("ABCD").unwrap();
    /// assert_eq!(alpha.size(), 4);
    /// assert_eq!(alpha.to_int('C').unwrap(), 2);
    /// assert!(Alphabet::new("ABA").is_err());
    /// ```
    pub fn new(chars: &str) -> Result<Self> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.is_empty() {
            return Err(EnigmaError::EmptyAlphabet);
        }
        let mut index = HashMap::with_capacity(chars.len());
        for (i, &c) in chars.iter().enumerate() {
            if index.insert(c, i).is_some() {
                return Err(EnigmaError::DuplicateAlphabetChar(c));
            }
        }
        Ok(Alphabet { chars, index })
    }

    /// The 26 upper-case Latin letters, `A` through `Z`.
    pub fn upper() -> Self {
        let chars: Vec<char> = ('A'..='Z').collect();
        let index = chars.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Alphabet { chars, index }
    }

    /// Returns the number of characters.
    pub fn size(&self) -> usize {
        self.chars.len()
    }

    /// Returns true if `c` is in this alphabet.
    pub fn contains(&self, c: char) -> bool {
        self.index.contains_key(&c)
    }

    /// Returns character number `index`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::OutOfRange`] unless `index < size()`.
    pub fn to_char(&self, index: usize) -> Result<char> {
        self.chars
            .get(index)
            .copied()
            .ok_or(EnigmaError::OutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Returns the index of `c`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotInAlphabet`] if `c` is absent.
    pub fn to_int(&self, c: char) -> Result<usize> {
        self.index
            .get(&c)
            .copied()
            .ok_or(EnigmaError::NotInAlphabet(c))
    }

    /// Iterates over the characters in index order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.chars {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
