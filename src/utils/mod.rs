//! Utility functions shared by the message driver.

pub mod text;
