//! `.z80` version 1 snapshots.
//!
//! Layout: a 30-byte register header followed by the 48 KiB of RAM from
//! 0x4000, either raw or run-length encoded. In the encoded form
//! `ED ED count value` expands to `count` copies of `value` and the stream
//! ends with `00 ED ED 00`.

use thiserror::Error;

use retroz80_cpu::{Cpu, InterruptMode, Memory, Registers};

pub const HEADER_LEN: usize = 30;
pub const RAM_START: u16 = 0x4000;
pub const RAM_LEN: usize = 48 * 1024;

/// Byte 12 bit 5: RAM is run-length encoded.
const COMPRESSED: u8 = 0x20;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot is {len} bytes, shorter than its {}-byte header", HEADER_LEN)]
    TooShort { len: usize },
    #[error("snapshot uses the version 2/3 layout (header PC is 0)")]
    UnsupportedVersion,
    #[error("snapshot RAM ends after {loaded} of {} bytes", RAM_LEN)]
    TruncatedBlock { loaded: usize },
}

/// A parsed snapshot: CPU state, border colour and the 48 KiB of RAM.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub registers: Registers,
    pub border: u8,
    pub ram: Vec<u8>,
}

impl Snapshot {
    pub fn parse(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let Some((header, body)) = bytes.split_first_chunk::<HEADER_LEN>() else {
            return Err(SnapshotError::TooShort { len: bytes.len() });
        };

        let word = |at: usize| u16::from_le_bytes([header[at], header[at + 1]]);

        let pc = word(6);
        if pc == 0 {
            return Err(SnapshotError::UnsupportedVersion);
        }

        // Some writers store 0xFF here; it must be read as 1.
        let misc = if header[12] == 0xFF { 0x01 } else { header[12] };

        let mut regs = Registers {
            a: header[0],
            f: header[1],
            c: header[2],
            b: header[3],
            l: header[4],
            h: header[5],
            pc,
            sp: word(8),
            i: header[10],
            r: (header[11] & 0x7F) | ((misc & 0x01) << 7),
            e: header[13],
            d: header[14],
            a_alt: header[21],
            f_alt: header[22],
            iy: word(23),
            ix: word(25),
            iff1: header[27] != 0,
            iff2: header[28] != 0,
            im: InterruptMode::from_bits(header[29]),
            ..Registers::default()
        };
        regs.set_bc_alt(word(15));
        regs.set_de_alt(word(17));
        regs.set_hl_alt(word(19));

        let ram = if misc & COMPRESSED != 0 {
            decompress(body)?
        } else {
            body.get(..RAM_LEN)
                .ok_or(SnapshotError::TruncatedBlock { loaded: body.len() })?
                .to_vec()
        };

        Ok(Self {
            registers: regs,
            border: (misc >> 1) & 0x07,
            ram,
        })
    }

    /// Reset `cpu`, install the saved registers and write RAM through `mem`.
    pub fn apply(&self, cpu: &mut Cpu, mem: &mut dyn Memory) {
        cpu.reset();
        cpu.regs = self.registers;
        let mut addr = RAM_START;
        for &byte in &self.ram {
            mem.write8(addr, byte);
            addr = addr.wrapping_add(1);
        }
        log::info!(
            "Applied .z80 snapshot: PC=0x{:04X} SP=0x{:04X} IM{} border={}",
            cpu.regs.pc,
            cpu.regs.sp,
            cpu.regs.im.bits(),
            self.border,
        );
    }
}

fn decompress(data: &[u8]) -> Result<Vec<u8>, SnapshotError> {
    let mut ram = Vec::with_capacity(RAM_LEN);
    let mut at = 0;
    while ram.len() < RAM_LEN {
        match &data[at..] {
            [0x00, 0xED, 0xED, 0x00, ..] | [] | [0xED, 0xED] | [0xED, 0xED, _] => {
                return Err(SnapshotError::TruncatedBlock { loaded: ram.len() });
            }
            [0xED, 0xED, count, value, ..] => {
                let count = usize::from(*count).min(RAM_LEN - ram.len());
                ram.resize(ram.len() + count, *value);
                at += 4;
            }
            [byte, ..] => {
                ram.push(*byte);
                at += 1;
            }
        }
    }
    Ok(ram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use retroz80_cpu::Ram;

    fn header(misc: u8) -> Vec<u8> {
        let mut header = vec![0u8; HEADER_LEN];
        header[0] = 0x12; // A
        header[1] = 0x85; // F
        header[2] = 0x34; // C
        header[3] = 0x56; // B
        header[4] = 0x78; // L
        header[5] = 0x9A; // H
        header[6..8].copy_from_slice(&0x8000u16.to_le_bytes());
        header[8..10].copy_from_slice(&0xFF4Au16.to_le_bytes());
        header[10] = 0x3F; // I
        header[11] = 0x05; // R
        header[12] = misc;
        header[13] = 0xBC; // E
        header[14] = 0xDE; // D
        header[15..17].copy_from_slice(&0x1111u16.to_le_bytes());
        header[17..19].copy_from_slice(&0x2222u16.to_le_bytes());
        header[19..21].copy_from_slice(&0x3333u16.to_le_bytes());
        header[21] = 0x44; // A'
        header[22] = 0x55; // F'
        header[23..25].copy_from_slice(&0x5C3Au16.to_le_bytes());
        header[25..27].copy_from_slice(&0x6000u16.to_le_bytes());
        header[27] = 1;
        header[28] = 1;
        header[29] = 0x01;
        header
    }

    /// Encodes `literal` followed by `fill` copies of zero, then the end
    /// marker.
    fn compressed_body(literal: &[u8], fill: usize) -> Vec<u8> {
        let mut body = literal.to_vec();
        let mut left = fill;
        while left > 0 {
            let run = left.min(255);
            body.extend_from_slice(&[0xED, 0xED, run as u8, 0x00]);
            left -= run;
        }
        body.extend_from_slice(&[0x00, 0xED, 0xED, 0x00]);
        body
    }

    #[test]
    fn header_maps_onto_registers() {
        let mut bytes = header(0x01 | (3 << 1));
        bytes.extend(vec![0u8; RAM_LEN]);
        let snapshot = Snapshot::parse(&bytes).unwrap();
        let regs = snapshot.registers;

        assert_eq!(regs.af(), 0x1285);
        assert_eq!(regs.bc(), 0x5634);
        assert_eq!(regs.hl(), 0x9A78);
        assert_eq!(regs.de(), 0xDEBC);
        assert_eq!(regs.pc, 0x8000);
        assert_eq!(regs.sp, 0xFF4A);
        assert_eq!(regs.i, 0x3F);
        assert_eq!(regs.r, 0x85);
        assert_eq!(regs.bc_alt(), 0x1111);
        assert_eq!(regs.de_alt(), 0x2222);
        assert_eq!(regs.hl_alt(), 0x3333);
        assert_eq!(regs.af_alt(), 0x4455);
        assert_eq!(regs.iy, 0x5C3A);
        assert_eq!(regs.ix, 0x6000);
        assert!(regs.iff1 && regs.iff2);
        assert_eq!(regs.im, InterruptMode::Im1);
        assert_eq!(snapshot.border, 3);
    }

    #[test]
    fn misc_byte_of_ff_reads_as_one() {
        let mut bytes = header(0xFF);
        bytes.extend(vec![0u8; RAM_LEN]);
        let snapshot = Snapshot::parse(&bytes).unwrap();
        assert_eq!(snapshot.registers.r, 0x85);
        assert_eq!(snapshot.border, 0);
    }

    #[test]
    fn compressed_ram_expands_runs() {
        let mut bytes = header(COMPRESSED);
        bytes.extend(&[0x01, 0x02, 0xED, 0xED, 0x05, 0xAA]);
        bytes.extend(compressed_body(&[0x03], RAM_LEN - 8));
        let snapshot = Snapshot::parse(&bytes).unwrap();

        assert_eq!(snapshot.ram.len(), RAM_LEN);
        assert_eq!(&snapshot.ram[..8], &[0x01, 0x02, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0x03]);
        assert!(snapshot.ram[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn rejects_short_file() {
        assert_eq!(
            Snapshot::parse(&[0u8; 12]),
            Err(SnapshotError::TooShort { len: 12 })
        );
    }

    #[test]
    fn rejects_version_two_layout() {
        let mut bytes = header(0);
        bytes[6] = 0;
        bytes[7] = 0;
        bytes.extend(vec![0u8; RAM_LEN]);
        assert_eq!(Snapshot::parse(&bytes), Err(SnapshotError::UnsupportedVersion));
    }

    #[test]
    fn rejects_truncated_ram() {
        let mut raw = header(0);
        raw.extend(vec![0u8; 100]);
        assert_eq!(
            Snapshot::parse(&raw),
            Err(SnapshotError::TruncatedBlock { loaded: 100 })
        );

        let mut packed = header(COMPRESSED);
        packed.extend(compressed_body(&[0x01, 0x02], 10));
        assert_eq!(
            Snapshot::parse(&packed),
            Err(SnapshotError::TruncatedBlock { loaded: 12 })
        );
    }

    #[test]
    fn apply_writes_registers_and_ram() {
        let mut bytes = header(COMPRESSED);
        bytes.extend(compressed_body(&[0x42], RAM_LEN - 1));
        let snapshot = Snapshot::parse(&bytes).unwrap();

        let mut cpu = Cpu::new().unwrap();
        let mut mem = Ram::new();
        mem.write8(0x4001, 0x99);
        snapshot.apply(&mut cpu, &mut mem);

        assert_eq!(cpu.regs, snapshot.registers);
        assert_eq!(mem.read8(0x4000), 0x42);
        assert_eq!(mem.read8(0x4001), 0x00);
        assert_eq!(mem.read8(0x3FFF), 0x00);
    }
}
