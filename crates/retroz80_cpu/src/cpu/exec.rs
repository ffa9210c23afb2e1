mod alu;
mod bits;
mod block;
mod control;
mod exchange;
mod incdec;
mod index;
mod io;
mod ld;
mod stack;
mod system;

use super::Cpu;
use crate::dispatch::{Handler, Prefix};
use crate::error::Z80Error;
use crate::memory::Memory;

/// Unprefixed instruction set, in registration order.
pub(crate) fn base_handlers() -> Vec<Handler> {
    vec![
        // 0x00: NOP
        Handler::new("NOP", |op| op == 0x00, Cpu::exec_nop),
        // LD rr,nn
        Handler::new("LD rr,nn", |op| op & 0xCF == 0x01, Cpu::exec_ld_rr_nn),
        // LD (BC/DE),A and LD A,(BC/DE)
        Handler::new("LD (rr),A", |op| op & 0xE7 == 0x02, Cpu::exec_ld_indirect_a),
        // LD (nn),HL / LD HL,(nn) / LD (nn),A / LD A,(nn)
        Handler::new("LD (nn)", |op| op & 0xE7 == 0x22, Cpu::exec_ld_direct),
        // INC rr / DEC rr
        Handler::new("INC/DEC rr", |op| op & 0xC7 == 0x03, Cpu::exec_incdec_rr),
        Handler::new("INC r", |op| op & 0xC7 == 0x04, Cpu::exec_inc_r),
        Handler::new("DEC r", |op| op & 0xC7 == 0x05, Cpu::exec_dec_r),
        Handler::new("LD r,n", |op| op & 0xC7 == 0x06, Cpu::exec_ld_r_n),
        // RLCA / RRCA / RLA / RRA
        Handler::new("rotate A", |op| op & 0xE7 == 0x07, Cpu::exec_rotate_a),
        Handler::new("EX AF,AF'", |op| op == 0x08, Cpu::exec_ex_af),
        Handler::new("ADD HL,rr", |op| op & 0xCF == 0x09, Cpu::exec_add_hl),
        Handler::new("DJNZ", |op| op == 0x10, Cpu::exec_djnz),
        // JR e / JR cc,e
        Handler::new("JR", |op| op == 0x18 || op & 0xE7 == 0x20, Cpu::exec_jr),
        Handler::new("DAA", |op| op == 0x27, Cpu::exec_daa),
        Handler::new("CPL", |op| op == 0x2F, Cpu::exec_cpl),
        // SCF / CCF
        Handler::new("SCF/CCF", |op| op & 0xF7 == 0x37, Cpu::exec_scf_ccf),
        Handler::new("HALT", |op| op == 0x76, Cpu::exec_halt),
        // 0x40-0x7F except HALT
        Handler::new("LD r,r'", |op| op & 0xC0 == 0x40 && op != 0x76, Cpu::exec_ld_r_r),
        Handler::new("ALU A,r", |op| op & 0xC0 == 0x80, Cpu::exec_alu_reg),
        Handler::new("RET cc", |op| op & 0xC7 == 0xC0, Cpu::exec_ret_cc),
        Handler::new("POP", |op| op & 0xCF == 0xC1, Cpu::exec_pop),
        // JP nn / JP cc,nn
        Handler::new("JP", |op| op == 0xC3 || op & 0xC7 == 0xC2, Cpu::exec_jp),
        // CALL nn / CALL cc,nn
        Handler::new("CALL", |op| op == 0xCD || op & 0xC7 == 0xC4, Cpu::exec_call),
        Handler::new("PUSH", |op| op & 0xCF == 0xC5, Cpu::exec_push),
        Handler::new("ALU A,n", |op| op & 0xC7 == 0xC6, Cpu::exec_alu_imm),
        Handler::new("RST", |op| op & 0xC7 == 0xC7, Cpu::exec_rst),
        Handler::new("RET", |op| op == 0xC9, Cpu::exec_ret),
        Handler::new(
            "prefix",
            |op| matches!(op, 0xCB | 0xDD | 0xED | 0xFD),
            Cpu::exec_prefix,
        ),
        // OUT (n),A / IN A,(n)
        Handler::new("IO (n)", |op| op & 0xF7 == 0xD3, Cpu::exec_io_immediate),
        Handler::new("EXX", |op| op == 0xD9, Cpu::exec_exx),
        Handler::new("EX (SP),HL", |op| op == 0xE3, Cpu::exec_ex_sp_hl),
        Handler::new("JP (HL)", |op| op == 0xE9, Cpu::exec_jp_hl),
        Handler::new("EX DE,HL", |op| op == 0xEB, Cpu::exec_ex_de_hl),
        // DI / EI
        Handler::new("DI/EI", |op| op & 0xF7 == 0xF3, Cpu::exec_di_ei),
        Handler::new("LD SP,HL", |op| op == 0xF9, Cpu::exec_ld_sp_hl),
    ]
}

/// CB-prefixed rotates, shifts and bit operations.
pub(crate) fn cb_handlers() -> Vec<Handler> {
    vec![
        Handler::new("rotate/shift", |op| op < 0x40, Cpu::exec_cb_shift),
        Handler::new("BIT", |op| op & 0xC0 == 0x40, Cpu::exec_cb_bit),
        Handler::new("RES/SET", |op| op >= 0x80, Cpu::exec_cb_res_set),
    ]
}

/// ED-prefixed extended instructions. Undefined slots are left unclaimed.
pub(crate) fn ed_handlers() -> Vec<Handler> {
    vec![
        // IN r,(C), including the flags-only IN (C) at 0x70
        Handler::new("IN r,(C)", |op| op & 0xC7 == 0x40, Cpu::exec_in_c),
        // OUT (C),r, including OUT (C),0 at 0x71
        Handler::new("OUT (C),r", |op| op & 0xC7 == 0x41, Cpu::exec_out_c),
        // SBC HL,ss / ADC HL,ss
        Handler::new("ADC/SBC HL,ss", |op| op & 0xC7 == 0x42, Cpu::exec_adc_sbc_hl),
        // LD (nn),dd / LD dd,(nn)
        Handler::new("LD (nn),dd", |op| op & 0xC7 == 0x43, Cpu::exec_ld_pair_direct),
        Handler::new("NEG", |op| op & 0xC7 == 0x44, Cpu::exec_neg),
        // RETN and RETI
        Handler::new("RETN", |op| op & 0xC7 == 0x45, Cpu::exec_retn),
        Handler::new("IM", |op| op & 0xC7 == 0x46, Cpu::exec_im),
        // LD I,A / LD R,A / LD A,I / LD A,R
        Handler::new("LD I/R", |op| op & 0xE7 == 0x47, Cpu::exec_ld_special),
        // RRD / RLD
        Handler::new("RRD/RLD", |op| op & 0xF7 == 0x67, Cpu::exec_rld_rrd),
        // LDI / LDD / LDIR / LDDR
        Handler::new("block LD", |op| op & 0xE7 == 0xA0, Cpu::exec_block_ld),
        // CPI / CPD / CPIR / CPDR
        Handler::new("block CP", |op| op & 0xE7 == 0xA1, Cpu::exec_block_cp),
        // INI / IND / INIR / INDR
        Handler::new("block IN", |op| op & 0xE7 == 0xA2, Cpu::exec_block_in),
        // OUTI / OUTD / OTIR / OTDR
        Handler::new("block OUT", |op| op & 0xE7 == 0xA3, Cpu::exec_block_out),
    ]
}

/// DD/FD-prefixed instructions. The same set serves IX and IY; the active
/// prefix picks the register at run time.
pub(crate) fn index_handlers() -> Vec<Handler> {
    index::handlers()
}

impl Cpu {
    /// CB/DD/ED/FD: fetch the next opcode and run it from the prefixed table.
    pub(super) fn exec_prefix(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xCB | 0xDD | 0xED | 0xFD));
        let table = match opcode {
            0xCB => Prefix::Cb,
            0xDD => Prefix::Dd,
            0xED => Prefix::Ed,
            _ => Prefix::Fd,
        };
        let next = self.fetch_opcode(mem);
        self.dispatch(mem, table, next)
    }

    /// Bound to every slot no handler claims.
    pub(crate) fn exec_unimplemented(&mut self, _mem: &mut dyn Memory, opcode: u8) -> u32 {
        self.lock(Z80Error::UnimplementedOpcode {
            table: self.prefix,
            opcode,
            pc: self.instr_pc,
        });
        0
    }
}
