//! Error types for the enigma library.
//!
//! Every failure is reported as a value. Configuration errors are fatal to
//! the configuration attempt that raised them; once a machine has been
//! configured, per-character conversion cannot fail.

use thiserror::Error;

/// Errors produced by the enigma library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnigmaError {
    /// Character lookup failed: the character is not part of the alphabet.
    #[error("character {0:?} is not in the alphabet")]
    NotInAlphabet(char),

    /// Index lookup failed: the index is outside `[0, size)`.
    #[error("index {index} is out of range for an alphabet of size {size}")]
    OutOfRange { index: usize, size: usize },

    /// Alphabet text contained no characters.
    #[error("alphabet must contain at least one character")]
    EmptyAlphabet,

    /// Alphabet text listed the same character twice.
    #[error("character {0:?} appears more than once in the alphabet")]
    DuplicateAlphabetChar(char),

    /// Cycle notation could not be parsed.
    #[error("malformed cycles: {0}")]
    MalformedCycles(String),

    /// A character appears in more than one cycle (or twice in one cycle).
    #[error("character {0:?} appears in more than one cycle")]
    DuplicateCycleMember(char),

    /// A reflector was built from a permutation with a fixed point.
    #[error("reflector {0} must not map any character to itself")]
    NotDerangement(String),

    /// A reflector was given a setting other than 0.
    #[error("reflector has a single position, got setting {0}")]
    ReflectorSetting(usize),

    /// Two rotors with the same (case-insensitive) name were registered.
    #[error("rotor name {0} is already defined")]
    DuplicateRotorName(String),

    /// Machine needs at least two slots (reflector plus one rotor).
    #[error("machine must have at least 2 rotor slots, got {0}")]
    InvalidSlotCount(usize),

    /// Pawl count must be strictly less than the slot count.
    #[error("pawl count {pawls} must be less than slot count {slots}")]
    InvalidPawlCount { pawls: usize, slots: usize },

    /// Setup named a rotor absent from the pool.
    #[error("unknown rotor {0}")]
    UnknownRotor(String),

    /// Setup named the wrong number of rotors.
    #[error("expected {expected} rotor names, got {actual}")]
    RotorCountMismatch { expected: usize, actual: usize },

    /// Setup placed the same rotor in two slots.
    #[error("rotor {0} cannot occupy more than one slot")]
    DuplicateRotor(String),

    /// Slot 0 does not hold a reflector.
    #[error("first rotor must be a reflector, got {0}")]
    ReflectorRequired(String),

    /// More moving rotors were placed than there are pawls to drive them.
    #[error("{moving} moving rotors placed but only {pawls} pawls available")]
    TooManyMovingRotors { moving: usize, pawls: usize },

    /// Rotor position string has the wrong length.
    #[error("rotor setting must have {expected} characters, got {actual}")]
    BadSettingLength { expected: usize, actual: usize },

    /// Conversion was attempted before a successful configure.
    #[error("machine has not been configured")]
    NotConfigured,

    /// Configuration text violates the configuration grammar.
    #[error("configuration line {line}: {reason}")]
    MalformedConfig { line: usize, reason: String },

    /// Settings line violates the settings grammar.
    #[error("malformed settings line: {0}")]
    MalformedSettings(String),

    /// Message input did not begin with a settings line.
    #[error("input must start with a settings line")]
    MissingSettings,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnigmaError>;
