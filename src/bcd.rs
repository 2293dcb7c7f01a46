//! Packed binary-coded-decimal arithmetic.
//!
//! Every value is a byte holding two decimal digits, one per nibble. Results
//! are taken modulo 100, so `add(0x99, 0x01) == 0x00` and
//! `sub(0x00, 0x01) == 0x99`. Inputs containing nibbles above 9 produce
//! unspecified (but never panicking) results.

#[inline]
fn add_digit(left: u8, right: u8) -> u8 {
    let sum = left.wrapping_add(right);
    if sum >= 10 { sum.wrapping_add(6) } else { sum }
}

#[inline]
fn sub_digit(left: u8, right: u8) -> u8 {
    // A borrow leaves 0xF7..=0xFF; moving it down by 0x66 yields a valid
    // digit in the low nibble and 9 ("minus one") in the high nibble.
    let difference = left.wrapping_sub(right);
    if difference >= 10 { difference.wrapping_sub(0x66) } else { difference }
}

/// Adds two packed BCD bytes.
pub fn add(left: u8, right: u8) -> u8 {
    let ones = add_digit(left & 0x0f, right & 0x0f);
    let tens = add_digit(left >> 4, right >> 4) & 0x0f;
    let tens = add_digit(tens, ones >> 4);

    (tens << 4).wrapping_add(ones & 0x0f)
}

/// Subtracts `right` from `left`, both packed BCD.
pub fn sub(left: u8, right: u8) -> u8 {
    let ones = sub_digit(left & 0x0f, right & 0x0f);
    let tens = sub_digit(left >> 4, right >> 4) & 0x0f;
    let tens = add_digit(tens, ones >> 4);

    (tens << 4).wrapping_add(ones & 0x0f)
}

/// Converts packed BCD to a plain integer (0-99).
#[inline]
pub fn to_binary(bcd: u8) -> u8 {
    (bcd >> 4).wrapping_mul(10).wrapping_add(bcd & 0x0f)
}

/// Converts a plain integer to packed BCD. Values of 100 and above wrap.
#[inline]
pub fn from_binary(bin: u8) -> u8 {
    let bin = bin % 100;
    ((bin / 10) << 4) | (bin % 10)
}
