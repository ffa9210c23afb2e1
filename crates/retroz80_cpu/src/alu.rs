//! Pure flag engine.
//!
//! Every function takes operand values and returns the result together with
//! the complete set of flags that the operation defines. Callers merge in any
//! flags the operation preserves.

use crate::registers::Flags;

/// Result of an 8-bit ALU operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AluResult {
    pub value: u8,
    pub flags: Flags,
}

/// Result of a 16-bit ALU operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AluResult16 {
    pub value: u16,
    pub flags: Flags,
}

/// ADD/ADC. `carry` is the incoming carry for ADC and false for ADD.
pub fn add8(a: u8, b: u8, carry: bool) -> AluResult {
    let c = u8::from(carry);
    let full = u16::from(a) + u16::from(b) + u16::from(c);
    let value = full as u8;

    let mut flags = Flags::sz53(value);
    flags.set(Flags::H, (a & 0x0F) + (b & 0x0F) + c > 0x0F);
    // Both operands share a sign that the result does not.
    flags.set(Flags::PV, (a ^ b) & 0x80 == 0 && (a ^ value) & 0x80 != 0);
    flags.set(Flags::C, full > 0xFF);
    AluResult { value, flags }
}

/// SUB/SBC. `carry` is the incoming borrow for SBC and false for SUB.
pub fn sub8(a: u8, b: u8, carry: bool) -> AluResult {
    let c = u8::from(carry);
    let value = a.wrapping_sub(b).wrapping_sub(c);

    let mut flags = Flags::sz53(value) | Flags::N;
    flags.set(Flags::H, (a & 0x0F) < (b & 0x0F) + c);
    // Operands differ in sign and the result took the subtrahend's sign.
    flags.set(Flags::PV, (a ^ b) & 0x80 != 0 && (b ^ value) & 0x80 == 0);
    flags.set(Flags::C, u16::from(a) < u16::from(b) + u16::from(c));
    AluResult { value, flags }
}

pub fn and8(a: u8, b: u8) -> AluResult {
    let value = a & b;
    AluResult {
        value,
        flags: Flags::sz53p(value) | Flags::H,
    }
}

pub fn or8(a: u8, b: u8) -> AluResult {
    let value = a | b;
    AluResult {
        value,
        flags: Flags::sz53p(value),
    }
}

pub fn xor8(a: u8, b: u8) -> AluResult {
    let value = a ^ b;
    AluResult {
        value,
        flags: Flags::sz53p(value),
    }
}

/// CP: flags of `a - b` with bits 5/3 taken from the operand.
pub fn cp8(a: u8, b: u8) -> Flags {
    let sub = sub8(a, b, false);
    (sub.flags - (Flags::Y | Flags::X)) | Flags::undocumented(b)
}

/// INC. The returned flags never include C; the caller keeps the old carry.
pub fn inc8(value: u8) -> AluResult {
    let result = value.wrapping_add(1);
    let mut flags = Flags::sz53(result);
    flags.set(Flags::H, value & 0x0F == 0x0F);
    flags.set(Flags::PV, value == 0x7F);
    AluResult {
        value: result,
        flags,
    }
}

/// DEC. The returned flags never include C; the caller keeps the old carry.
pub fn dec8(value: u8) -> AluResult {
    let result = value.wrapping_sub(1);
    let mut flags = Flags::sz53(result) | Flags::N;
    flags.set(Flags::H, value & 0x0F == 0x00);
    flags.set(Flags::PV, value == 0x80);
    AluResult {
        value: result,
        flags,
    }
}

/// ADD HL/IX/IY,ss. S, Z and PV are carried over from `old`.
pub fn add16(a: u16, b: u16, old: Flags) -> AluResult16 {
    let full = u32::from(a) + u32::from(b);
    let value = full as u16;

    let mut flags =
        (old & (Flags::S | Flags::Z | Flags::PV)) | Flags::undocumented((value >> 8) as u8);
    flags.set(Flags::H, (a & 0x0FFF) + (b & 0x0FFF) > 0x0FFF);
    flags.set(Flags::C, full > 0xFFFF);
    AluResult16 { value, flags }
}

/// ADC HL,ss.
pub fn adc16(a: u16, b: u16, carry: bool) -> AluResult16 {
    let c = u32::from(carry);
    let full = u32::from(a) + u32::from(b) + c;
    let value = full as u16;

    let mut flags = Flags::undocumented((value >> 8) as u8);
    flags.set(Flags::S, value & 0x8000 != 0);
    flags.set(Flags::Z, value == 0);
    flags.set(Flags::H, u32::from(a & 0x0FFF) + u32::from(b & 0x0FFF) + c > 0x0FFF);
    flags.set(Flags::PV, (a ^ b) & 0x8000 == 0 && (a ^ value) & 0x8000 != 0);
    flags.set(Flags::C, full > 0xFFFF);
    AluResult16 { value, flags }
}

/// SBC HL,ss.
pub fn sbc16(a: u16, b: u16, carry: bool) -> AluResult16 {
    let c = u32::from(carry);
    let value = a.wrapping_sub(b).wrapping_sub(c as u16);

    let mut flags = Flags::undocumented((value >> 8) as u8) | Flags::N;
    flags.set(Flags::S, value & 0x8000 != 0);
    flags.set(Flags::Z, value == 0);
    flags.set(Flags::H, u32::from(a & 0x0FFF) < u32::from(b & 0x0FFF) + c);
    flags.set(Flags::PV, (a ^ b) & 0x8000 != 0 && (b ^ value) & 0x8000 == 0);
    flags.set(Flags::C, u32::from(a) < u32::from(b) + c);
    AluResult16 { value, flags }
}

/// CB-prefixed rotate/shift selected by `op` (bits 5..3 of the opcode):
/// RLC, RRC, RL, RR, SLA, SRA, SLL, SRL.
///
/// S, Z, PV (parity) and C are set from the result; H and N are cleared.
pub fn shift(op: u8, value: u8, carry: bool) -> AluResult {
    let (result, carry_out) = match op & 0x07 {
        0 => (value.rotate_left(1), value & 0x80 != 0),
        1 => (value.rotate_right(1), value & 0x01 != 0),
        2 => ((value << 1) | u8::from(carry), value & 0x80 != 0),
        3 => ((value >> 1) | (u8::from(carry) << 7), value & 0x01 != 0),
        4 => (value << 1, value & 0x80 != 0),
        5 => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
        // SLL: undocumented, shifts a 1 into bit 0.
        6 => ((value << 1) | 0x01, value & 0x80 != 0),
        _ => (value >> 1, value & 0x01 != 0),
    };
    let mut flags = Flags::sz53p(result);
    flags.set(Flags::C, carry_out);
    AluResult {
        value: result,
        flags,
    }
}

/// RLCA/RRCA/RLA/RRA selected by `op` (0..3). S, Z and PV are kept from
/// `old`; bits 5/3 follow the new accumulator.
pub fn rotate_accumulator(op: u8, a: u8, old: Flags) -> AluResult {
    let rotated = shift(op & 0x03, a, old.contains(Flags::C));
    let flags = (old & (Flags::S | Flags::Z | Flags::PV))
        | Flags::undocumented(rotated.value)
        | (rotated.flags & Flags::C);
    AluResult {
        value: rotated.value,
        flags,
    }
}

/// BIT n. `undoc` supplies bits 5/3; C is carried over from `old`.
pub fn bit(n: u8, value: u8, undoc: u8, old: Flags) -> Flags {
    let set = value & (1 << (n & 0x07)) != 0;
    let mut flags = (old & Flags::C) | Flags::H | Flags::undocumented(undoc);
    flags.set(Flags::Z, !set);
    flags.set(Flags::PV, !set);
    flags.set(Flags::S, n & 0x07 == 7 && set);
    flags
}
