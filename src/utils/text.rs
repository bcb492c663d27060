//! Message text utilities.
//!
//! Input messages are free-form lines; the machine only sees their
//! alphabet characters. Output is printed in groups of five characters.

/// Number of characters per output group.
pub const GROUP_SIZE: usize = 5;

/// Removes all whitespace from `line` and upper-cases what remains.
///
/// # Parameters
/// - `line`: Raw message text.
///
/// # Returns
/// The compacted, upper-cased message.
pub fn normalize_message(line: &str) -> String {
    line.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Splits `msg` into groups of [`GROUP_SIZE`] characters separated by a
/// single space. The last group may be shorter.
///
/// # Parameters
/// - `msg`: Converted message without whitespace.
///
/// # Returns
/// The grouped message, e.g. `"QVPQS OKOIL PUBKJ ZPISF XDW"`.
pub fn group_five(msg: &str) -> String {
    let chars: Vec<char> = msg.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / GROUP_SIZE);
    for (i, group) in chars.chunks(GROUP_SIZE).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.extend(group);
    }
    out
}
