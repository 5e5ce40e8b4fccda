#[inline]
pub fn is_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
pub fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub fn is_alphanumeric(c: char) -> bool {
    is_alphabetic(c) || is_numeric(c)
}

/// Formats a number the way scripts see it: whole values drop the fraction (`3`, not `3.0`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // -0 prints as 0
        String::from("0")
    } else {
        format!("{}", value)
    }
}
