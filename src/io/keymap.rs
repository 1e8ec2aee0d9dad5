/// Virtual key codes of every button name a script may use.
///
/// Names are matched case-insensitively; single letters and digits map to
/// their ASCII upper-case code.
const NAMED_KEYS: &[(&str, u16)] = &[
    ("LBUTTON", 0x01),
    ("RBUTTON", 0x02),
    ("MBUTTON", 0x04),
    ("XBUTTON1", 0x05),
    ("XBUTTON2", 0x06),
    ("BACKSPACE", 0x08),
    ("TAB", 0x09),
    ("ENTER", 0x0D),
    ("SHIFT", 0x10),
    ("CTRL", 0x11),
    ("ALT", 0x12),
    ("PAUSE", 0x13),
    ("CAPSLOCK", 0x14),
    ("ESC", 0x1B),
    ("SPACE", 0x20),
    ("PAGEUP", 0x21),
    ("PAGEDOWN", 0x22),
    ("END", 0x23),
    ("HOME", 0x24),
    ("LEFT", 0x25),
    ("UP", 0x26),
    ("RIGHT", 0x27),
    ("DOWN", 0x28),
    ("PRINTSCREEN", 0x2C),
    ("INSERT", 0x2D),
    ("DELETE", 0x2E),
    ("F1", 0x70),
    ("F2", 0x71),
    ("F3", 0x72),
    ("F4", 0x73),
    ("F5", 0x74),
    ("F6", 0x75),
    ("F7", 0x76),
    ("F8", 0x77),
    ("F9", 0x78),
    ("F10", 0x79),
    ("F11", 0x7A),
    ("F12", 0x7B),
    ("LSHIFT", 0xA0),
    ("RSHIFT", 0xA1),
    ("LCTRL", 0xA2),
    ("RCTRL", 0xA3),
    ("LALT", 0xA4),
    ("RALT", 0xA5),
];

/// Punctuation that `type` can produce, with the key that produces it and
/// whether `SHIFT` must be held.
const PUNCTUATION: &[(char, u16, bool)] = &[
    (' ', 0x20, false),
    ('\n', 0x0D, false),
    ('\t', 0x09, false),
    (';', 0xBA, false),
    ('=', 0xBB, false),
    (',', 0xBC, false),
    ('-', 0xBD, false),
    ('.', 0xBE, false),
    ('/', 0xBF, false),
    ('`', 0xC0, false),
    ('[', 0xDB, false),
    ('\\', 0xDC, false),
    (']', 0xDD, false),
    ('\'', 0xDE, false),
    (':', 0xBA, true),
    ('+', 0xBB, true),
    ('<', 0xBC, true),
    ('_', 0xBD, true),
    ('>', 0xBE, true),
    ('?', 0xBF, true),
    ('~', 0xC0, true),
    ('{', 0xDB, true),
    ('|', 0xDC, true),
    ('}', 0xDD, true),
    ('"', 0xDE, true),
    ('!', 0x31, true),
    ('@', 0x32, true),
    ('#', 0x33, true),
    ('$', 0x34, true),
    ('%', 0x35, true),
    ('^', 0x36, true),
    ('&', 0x37, true),
    ('*', 0x38, true),
    ('(', 0x39, true),
    (')', 0x30, true),
];

/// Looks up the virtual key code of a button name.
///
/// # Example
/// ```
/// use kmsl::io::keymap::key_code;
///
/// assert_eq!(key_code("a"), Some(0x41));
/// assert_eq!(key_code("Enter"), Some(0x0D));
/// assert_eq!(key_code("nope"), None);
/// ```
#[must_use]
pub fn key_code(name: &str) -> Option<u16> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next())
       && c.is_ascii_alphanumeric()
    {
        return Some(u16::from(c.to_ascii_uppercase() as u8));
    }
    NAMED_KEYS.iter()
              .find(|(key, _)| key.eq_ignore_ascii_case(name))
              .map(|(_, code)| *code)
}

/// The key code a character is typed with and whether it needs `SHIFT`.
#[must_use]
pub fn char_key(c: char) -> Option<(u16, bool)> {
    if c.is_ascii_alphanumeric() {
        return Some((u16::from(c.to_ascii_uppercase() as u8), c.is_ascii_uppercase()));
    }
    PUNCTUATION.iter()
               .find(|(p, ..)| *p == c)
               .map(|(_, code, shift)| (*code, *shift))
}
