//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use enigma::{Machine, MachineConfig};

/// Historical Enigma rotor set in cycle notation: the eight naval rotors,
/// the two thin greek-letter rotors and the thin B and C reflectors, plus
/// the wide Wehrmacht B reflector as `UKWB`.
pub const DEFAULT_CONF: &str = "\
ABCDEFGHIJKLMNOPQRSTUVWXYZ
 5 3
 I MQ      (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
 II ME     (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
 III MV    (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
 IV MJ     (AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)
 V MZ      (AVOLDRWFIUQ)(BZKSMNHYC) (EGTJPX)
 VI MZM    (AJQDVLEOZWIYTS) (CGMNHFUX) (BPRK)
 VII MZM   (ANOUPFRIMBZTLWKSVEGCJYDHXQ)
 VIII MZM  (AFLSETWUNDHOZVICQ) (BKJ) (GXY) (MPR)
 Beta N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
 Gamma N   (AFNIRLBSQWVXGUZDKMTPCOYJHE)
 B R       (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
           (RX) (SZ) (TV)
 C R       (AR) (BD) (CO) (EJ) (FN) (GT) (HK) (IV) (LM) (PW)
           (QZ) (SX) (UY)
 UKWB R    (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN)
           (MO) (TZ) (VW)
";

/// Same rotors as [`DEFAULT_CONF`] on a three-rotor machine with a wide
/// reflector (four slots, three pawls).
pub fn m3_conf() -> String {
    DEFAULT_CONF.replacen(" 5 3", " 4 3", 1)
}

/// Builds an unconfigured five-slot machine from [`DEFAULT_CONF`].
pub fn default_machine() -> Machine {
    MachineConfig::parse(DEFAULT_CONF)
        .unwrap()
        .build_machine()
        .unwrap()
}

/// Builds an unconfigured four-slot machine from [`m3_conf`].
pub fn m3_machine() -> Machine {
    MachineConfig::parse(&m3_conf())
        .unwrap()
        .build_machine()
        .unwrap()
}
