//! Instruction formatting to assembly text

use hackvm_spec::Instruction;

/// Format instruction as assembly text the assembler accepts back
pub fn format(instr: &Instruction) -> String {
    match instr {
        Instruction::Add { a, b, c } => format!("add {}, {}, {}", a, b, c),
        Instruction::Nand { a, b, c } => format!("nand {}, {}, {}", a, b, c),
        Instruction::Addi { a, b, imm } => format!("addi {}, {}, {}", a, b, imm),
        Instruction::Sw { a, b, imm } => format!("sw {}, {}, {}", a, b, imm),
        Instruction::Lw { a, b, imm } => format!("lw {}, {}, {}", a, b, imm),
        Instruction::Beq { a, b, imm } => format!("beq {}, {}, {}", a, b, imm),
        Instruction::Lui { a, imm } => format!("lui {}, {:#06x}", a, imm),
        Instruction::Jalr { a, b } => format!("jalr {}, {}", a, b),
        Instruction::Irq { kind } => format!("irq {}", kind),
        Instruction::Invalid { raw } => format!("<invalid {:#06x}>", raw),
    }
}
