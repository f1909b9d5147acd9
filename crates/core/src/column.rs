//! A1-style column and cell references.
//!
//! Columns use bijective base-26 lettering: there is no zero digit, so
//! `A..Z` are followed by `AA..AZ`, `BA..`, and so on.

/// Convert a 0-based column index to its letter reference (`0 -> A`, `26 -> AA`).
///
/// Defined for every `usize`, well past the `XFD` (16383) sheet limit.
pub fn column_name(index: usize) -> String {
    let mut n = index;
    let mut out = Vec::<u8>::new();
    loop {
        out.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    out.iter().rev().map(|&b| b as char).collect()
}

/// Cell reference for a 0-based column and a 1-based row number (`(27, 1) -> AB1`).
pub fn cell_reference(column: usize, row_number: usize) -> String {
    format!("{}{}", column_name(column), row_number)
}
