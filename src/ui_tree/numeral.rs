use crate::errors::NumeralError;

/// Width of the captured memory word, in hex digits.
const WORD_HEX_DIGITS: usize = 16;

/// Width of the recovered integer, in hex digits.
const LOW_HEX_DIGITS: usize = 8;

/// Recover the signed 32-bit value stored in the low half of the 64-bit word
/// whose decimal value is `numeral`.
///
/// Captured coordinates are whole memory words, so a negative value may arrive
/// zero-extended (a large positive numeral) or sign-extended (a negative one).
/// Both give the same result. The arithmetic runs on hex digit strings and
/// stays exact for numerals of any length.
pub fn recover_i32(numeral: &str) -> Result<i32, NumeralError> {
    let (negative, digits) = match numeral.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, numeral),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NumeralError::InvalidNumeral(numeral.to_string()));
    }

    let magnitude = pad_hex(&decimal_to_hex(digits), WORD_HEX_DIGITS);
    let encoding = if negative {
        increment_hex(&complement_hex(&magnitude))
    } else {
        magnitude
    };

    let low = &encoding[encoding.len() - LOW_HEX_DIGITS..];
    let unsigned = u32::from_str_radix(low, 16)
        .map_err(|e| NumeralError::InvalidEncoding(format!("{low}: {e}")))?;

    if unsigned < 0x8000_0000 {
        return i32::try_from(unsigned)
            .map_err(|e| NumeralError::InvalidEncoding(format!("{low}: {e}")));
    }

    // Top bit set: undo the two's complement on the low word.
    let flipped = complement_hex(low);
    let magnitude = i64::from_str_radix(&flipped, 16)
        .map_err(|e| NumeralError::InvalidEncoding(format!("{flipped}: {e}")))?
        + 1;
    i32::try_from(-magnitude).map_err(|e| NumeralError::InvalidEncoding(format!("{low}: {e}")))
}

/// Convert a string of ASCII decimal digits into lowercase hex digits, without padding.
fn decimal_to_hex(digits: &str) -> String {
    // Little-endian base-16 limbs.
    let mut limbs: Vec<u8> = vec![0];
    for b in digits.bytes() {
        let mut carry = u32::from(b - b'0');
        for limb in limbs.iter_mut() {
            let v = u32::from(*limb) * 10 + carry;
            *limb = (v % 16) as u8;
            carry = v / 16;
        }
        while carry > 0 {
            limbs.push((carry % 16) as u8);
            carry /= 16;
        }
    }
    while limbs.len() > 1 && limbs.last() == Some(&0) {
        limbs.pop();
    }
    limbs
        .iter()
        .rev()
        .map(|&d| hex_char(d))
        .collect()
}

fn pad_hex(hex: &str, width: usize) -> String {
    format!("{hex:0>width$}")
}

/// Bitwise complement of every hex digit (`f`↔`0`, `e`↔`1`, ...).
fn complement_hex(hex: &str) -> String {
    hex.chars()
        .map(|c| match c.to_digit(16) {
            Some(d) => hex_char(15 - d as u8),
            None => c,
        })
        .collect()
}

/// Add one to a hex digit string, dropping any carry out of the top digit.
fn increment_hex(hex: &str) -> String {
    let mut digits: Vec<char> = hex.chars().collect();
    for c in digits.iter_mut().rev() {
        match c.to_digit(16) {
            Some(15) => *c = '0',
            Some(d) => {
                *c = hex_char(d as u8 + 1);
                break;
            }
            // Left for from_str_radix to reject.
            None => break,
        }
    }
    digits.into_iter().collect()
}

fn hex_char(d: u8) -> char {
    char::from_digit(u32::from(d), 16).unwrap_or('?')
}
