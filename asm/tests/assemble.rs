use lc3asm::{assemble, error::Error, image::to_bytes};

#[test]
fn countdown_program() {
    let source = "\
; count down from 5, print a message, halt
.ORIG x3000
        LD R1, COUNT
LOOP    ADD R1, R1, #-1
        BRp LOOP
        LEA R0, MSG
        PUTS
        HALT
COUNT   .FILL #5
MSG     .STRINGZ \"Hi\"
.END
";
    let words = assemble(source).expect("assembly failed");
    assert_eq!(
        words,
        vec![
            0x3000, // origin
            0x2206, // LD R1, COUNT    (COUNT = x3006)
            0x127F, // ADD R1, R1, #-1 (LOOP = x3001)
            0x03FF, // BRp LOOP
            0xE004, // LEA R0, MSG     (MSG = x3007)
            0xF022, // PUTS
            0xF025, // HALT
            0x0005, // .FILL #5
            0x0048, // 'H'
            0x0069, // 'i'
            0x0000, // terminator
        ]
    );
}

#[test]
fn subroutine_call() {
    let source = "\
.ORIG x3000
JSR SUB
HALT
SUB RET
.END
";
    assert_eq!(
        assemble(source).unwrap(),
        vec![0x3000, 0x4802, 0xF025, 0xC1C0]
    );
}

#[test]
fn register_and_immediate_forms() {
    let source = "\
.ORIG x3000
AND R2, R2, #0
ADD R2, R2, #15
ADD R0, R1, R2
NOT R3, R0
LDR R4, R2, #-3
STR R4, R2, #3
JSRR R5
JMP R6
RTI
TRAP x21
.END
";
    assert_eq!(
        assemble(source).unwrap(),
        vec![
            0x3000, 0x54A0, 0x14AF, 0x1042, 0x963F, 0x68BD, 0x78A3, 0x4140, 0xC180, 0x8000,
            0xF021,
        ]
    );
}

#[test]
fn assembly_is_idempotent() {
    let source = "\
.ORIG x3000
LEA R0, MSG
PUTS
HALT
MSG .STRINGZ \"again\"
.END
";
    let first = to_bytes(&assemble(source).unwrap());
    let second = to_bytes(&assemble(source).unwrap());
    assert_eq!(first, second);
}

#[test]
fn image_bytes_are_big_endian() {
    let bytes = to_bytes(&assemble(".ORIG x3000\nADD R0,R0,R1\n.END\n").unwrap());
    assert_eq!(bytes, vec![0x30, 0x00, 0x10, 0x01]);
}

#[test]
fn undefined_label_fails_pass_two() {
    let diag = assemble(
        "\
.ORIG x3000
ADD R0,R0,R1
BR NOWHERE
.END
",
    )
    .unwrap_err();
    assert_eq!(diag.line, 3);
    assert!(matches!(diag.err, Error::UndefinedLabel(name) if name == "NOWHERE"));
}

#[test]
fn duplicate_label_fails_pass_one() {
    let diag = assemble(
        "\
.ORIG x3000
X .FILL #0
X .FILL #1
.END
",
    )
    .unwrap_err();
    assert_eq!(diag.line, 3);
    assert!(matches!(diag.err, Error::RedefinedLabel(name, 2) if name == "X"));
}

#[test]
fn out_of_range_immediate_aborts() {
    let diag = assemble(".ORIG x3000\nADD R0,R0,#16\n.END\n").unwrap_err();
    assert_eq!(diag.line, 2);
    assert!(matches!(diag.err, Error::ImmOutOfRange(16, 5)));
}

#[test]
fn lines_after_end_are_ignored() {
    let with_garbage = "\
.ORIG x3000
HALT
.END
%% not even tokenizable %%
";
    let clean = ".ORIG x3000\nHALT\n.END\n";
    assert_eq!(assemble(with_garbage).unwrap(), assemble(clean).unwrap());
}

#[test]
fn double_quoted_escapes_translate() {
    let words = assemble(".ORIG x3000\nS .STRINGZ \"a\\nb\"\n.END\n").unwrap();
    assert_eq!(words, vec![0x3000, 0x61, 0x0A, 0x62, 0x0000]);
}

#[test]
fn single_quoted_escapes_do_not_translate() {
    let words = assemble(".ORIG x3000\nS .STRINGZ 'a\\nb'\n.END\n").unwrap();
    assert_eq!(words, vec![0x3000, 0x61, 0x5C, 0x6E, 0x62, 0x0000]);
}

#[test]
fn wide_branches_wrap_silently() {
    // the 9-bit offset field is masked, not range-checked
    let source = "\
.ORIG x3000
FAR BR AWAY
.BLKW #1000
AWAY HALT
.END
";
    let words = assemble(source).unwrap();
    // target x33E9, own address x3000: 0x3E9 masked into 9 bits
    assert_eq!(words[1], 0x0E00 | (0x3E9 & 0x1FF));
}
