//! Electromechanical rotor cipher machine simulator.
//!
//! Encodes or decodes a stream of characters by passing each one through a
//! configurable stack of rotating permutation wheels, a reflector and an
//! optional plugboard, stepping the rotors before every character.
//!
//! Encoding and decoding are the same operation: a machine set up with the
//! same rotors, positions and plugboard turns ciphertext back into
//! plaintext.
//!
//! # Architecture
//!
//! ```text
//! Alphabet     (char <-> index, shared through Arc)
//!     ↕
//! Permutation  (cycle notation, forward + inverse tables)
//!     ↕ wrapped by
//! Rotor        (Reflector | Fixed | Moving{notches}, current setting)
//!     ↕ stored in
//! RotorPool    (arena, referenced by RotorId)
//!     ↕ placed into slots of
//! Machine      (stepping + signal path + plugboard)
//! ```
//!
//! [`MachineConfig`], [`Settings`] and [`Session`] implement the text
//! formats used by the `enigma` command-line tool.
//!
//! # Examples
//!
//! ```
//! use enigma::{MachineConfig, Settings};
//!
//! let config = MachineConfig::parse("\
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//! 5 3
//! I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//! III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
//! IV MJ (AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)
//! Beta N (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//! B R (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
//!     (RX) (SZ) (TV)
//! ").unwrap();
//!
//! let settings = Settings::parse("* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)", 5).unwrap();
//!
//! let mut encoder = config.build_machine().unwrap();
//! settings.apply(&mut encoder).unwrap();
//! let cipher = encoder.convert_message("FROMHISSHOULDERHIAWATHA").unwrap();
//! assert_eq!(cipher, "QVPQSOKOILPUBKJZPISFXDW");
//!
//! let mut decoder = config.build_machine().unwrap();
//! settings.apply(&mut decoder).unwrap();
//! assert_eq!(decoder.convert_message(&cipher).unwrap(), "FROMHISSHOULDERHIAWATHA");
//! ```

#![deny(clippy::all)]

pub mod error;

mod alphabet;
mod config;
mod machine;
mod permutation;
mod rotor;
mod rotor_pool;
mod session;
mod settings;
pub mod utils;

pub use alphabet::Alphabet;
pub use config::MachineConfig;
pub use error::{EnigmaError, Result};
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorKind};
pub use rotor_pool::{RotorId, RotorPool};
pub use session::Session;
pub use settings::{Settings, SETTINGS_MARKER};
