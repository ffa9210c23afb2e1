//! Decimal adjust (DAA) correction rules.

use std::ops::RangeInclusive;

use crate::alu::AluResult;
use crate::registers::Flags;

/// One row of the Z80 BCD correction table.
///
/// A rule matches on the N and C flags, the upper nibble of A, the H flag
/// and the lower nibble of A. It yields the byte added to A (mod 256) and
/// the resulting carry.
#[derive(Clone, Debug)]
pub struct DaaRule {
    pub subtract: bool,
    pub carry: bool,
    pub upper: RangeInclusive<u8>,
    pub half: bool,
    pub lower: RangeInclusive<u8>,
    pub add: u8,
    pub carry_out: bool,
}

impl DaaRule {
    const fn new(
        subtract: bool,
        carry: bool,
        upper: RangeInclusive<u8>,
        half: bool,
        lower: RangeInclusive<u8>,
        add: u8,
        carry_out: bool,
    ) -> Self {
        Self {
            subtract,
            carry,
            upper,
            half,
            lower,
            add,
            carry_out,
        }
    }

    fn matches(&self, a: u8, flags: Flags) -> bool {
        self.subtract == flags.contains(Flags::N)
            && self.carry == flags.contains(Flags::C)
            && self.half == flags.contains(Flags::H)
            && self.upper.contains(&(a >> 4))
            && self.lower.contains(&(a & 0x0F))
    }
}

/// The official correction table, additions first, then subtractions.
pub const DAA_TABLE: [DaaRule; 13] = [
    DaaRule::new(false, false, 0x0..=0x9, false, 0x0..=0x9, 0x00, false),
    DaaRule::new(false, false, 0x0..=0x8, false, 0xA..=0xF, 0x06, false),
    DaaRule::new(false, false, 0x0..=0x9, true, 0x0..=0x3, 0x06, false),
    DaaRule::new(false, false, 0xA..=0xF, false, 0x0..=0x9, 0x60, true),
    DaaRule::new(false, false, 0x9..=0xF, false, 0xA..=0xF, 0x66, true),
    DaaRule::new(false, false, 0xA..=0xF, true, 0x0..=0x3, 0x66, true),
    DaaRule::new(false, true, 0x0..=0x2, false, 0x0..=0x9, 0x60, true),
    DaaRule::new(false, true, 0x0..=0x2, false, 0xA..=0xF, 0x66, true),
    DaaRule::new(false, true, 0x0..=0x3, true, 0x0..=0x3, 0x66, true),
    DaaRule::new(true, false, 0x0..=0x9, false, 0x0..=0x9, 0x00, false),
    DaaRule::new(true, false, 0x0..=0x8, true, 0x6..=0xF, 0xFA, false),
    DaaRule::new(true, true, 0x7..=0xF, false, 0x0..=0x9, 0xA0, true),
    DaaRule::new(true, true, 0x6..=0x7, true, 0x6..=0xF, 0x9A, true),
];

/// Correction for operands outside the table (not valid BCD).
fn general_correction(a: u8, flags: Flags) -> (u8, bool) {
    let mut correction = 0u8;
    let mut carry = flags.contains(Flags::C);
    if flags.contains(Flags::H) || a & 0x0F > 0x09 {
        correction |= 0x06;
    }
    if carry || a > 0x99 {
        correction |= 0x60;
        carry = true;
    }
    if flags.contains(Flags::N) {
        (correction.wrapping_neg(), carry)
    } else {
        (correction, carry)
    }
}

/// Apply DAA to `a` given the current flags.
///
/// A and C come from the correction; S, Z, PV and bits 5/3 are recomputed
/// from the corrected value; H and N are left as they were.
pub fn daa(a: u8, flags: Flags) -> AluResult {
    let (add, carry) = DAA_TABLE
        .iter()
        .find(|rule| rule.matches(a, flags))
        .map(|rule| (rule.add, rule.carry_out))
        .unwrap_or_else(|| general_correction(a, flags));

    let value = a.wrapping_add(add);
    let mut out = Flags::sz53p(value) | (flags & (Flags::H | Flags::N));
    out.set(Flags::C, carry);
    AluResult { value, flags: out }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alu::add8;

    #[test]
    fn adjusts_after_bcd_addition() {
        let sum = add8(0x15, 0x27, false);
        assert_eq!(sum.value, 0x3C);
        let r = daa(sum.value, sum.flags);
        assert_eq!(r.value, 0x42);
        assert!(!r.flags.intersects(Flags::H | Flags::C));
    }

    #[test]
    fn carries_out_of_the_upper_digit() {
        let sum = add8(0x99, 0x01, false);
        let r = daa(sum.value, sum.flags);
        assert_eq!(r.value, 0x00);
        assert!(r.flags.contains(Flags::Z | Flags::C));
    }

    #[test]
    fn adjusts_after_bcd_subtraction() {
        // 0x42 - 0x15 = 0x2D with a half borrow; BCD answer is 27.
        let diff = crate::alu::sub8(0x42, 0x15, false);
        let r = daa(diff.value, diff.flags);
        assert_eq!(r.value, 0x27);
        assert!(!r.flags.contains(Flags::C));
        assert!(r.flags.contains(Flags::N));
    }

    #[test]
    fn table_rows_agree_with_general_correction() {
        for rule in DAA_TABLE.iter() {
            for upper in rule.upper.clone() {
                for lower in rule.lower.clone() {
                    let a = (upper << 4) | lower;
                    let mut flags = Flags::empty();
                    flags.set(Flags::N, rule.subtract);
                    flags.set(Flags::C, rule.carry);
                    flags.set(Flags::H, rule.half);
                    assert_eq!(
                        general_correction(a, flags),
                        (rule.add, rule.carry_out),
                        "a=0x{a:02X} flags={flags:?}"
                    );
                }
            }
        }
    }
}
