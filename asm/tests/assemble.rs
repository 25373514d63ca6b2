use vsasm::{assemble, entries_text, externs_text, object_text, Assembly};

fn clean(source: &str) -> Assembly {
    let out = assemble(source, "test.as");
    for (idx, line) in out.am.lines().enumerate() {
        println!("{:>2}: {}", idx + 1, line);
    }
    assert!(!out.diags.has_errors(), "errors in:\n{}", source);
    out
}

macro_rules! ob_case {
    ($name:ident, $src:expr, $ob:expr) => {
        #[test]
        fn $name() {
            let out = clean($src);
            assert_eq!(object_text(out.image.as_ref().unwrap()), $ob);
        }
    };
}

macro_rules! err_case {
    ($name:ident, $src:expr, $errors:expr) => {
        #[test]
        fn $name() {
            let out = assemble($src, "test.as");
            assert_eq!(out.diags.count(), $errors, "in:\n{}", $src);
            assert!(out.image.is_none());
        }
    };
}

// Smallest possible programs
ob_case!(
    two_instructions,
    "MAIN: mov r0, r1\n stop\n",
    "       2 0\n0000100 031904\n0000101 3c0004\n"
);
ob_case!(
    data_after_code,
    "MAIN: mov r0, r1\nstop\nLIST: .data 1,2,-3\n",
    "       2 3\n0000100 031904\n0000101 3c0004\n0000102 000001\n0000103 000002\n0000104 fffffd\n"
);
ob_case!(
    string_words,
    "STR: .string \"abc\"\nprn STR\nstop\n",
    "       3 4\n0000100 340804\n0000101 00033a\n0000102 3c0004\n\
     0000103 000061\n0000104 000062\n0000105 000063\n0000106 000000\n"
);
ob_case!(
    forward_relative_jump,
    "MAIN: jmp &END\nstop\nEND: stop\n",
    "       4 0\n0000100 24100c\n0000101 00001c\n0000102 3c0004\n0000103 3c0004\n"
);
ob_case!(
    macro_body_is_inlined,
    "mcro twice\ninc r1\ninc r1\nmcroend\ntwice\nstop\n",
    "       3 0\n0000100 14191c\n0000101 14191c\n0000102 3c0004\n"
);

// Collected errors always suppress the image
err_case!(duplicate_label, "A: stop\nA: stop\n", 1);
err_case!(extern_then_entry, ".extern X\n.entry X\nstop\n", 1);
err_case!(entry_then_extern, ".entry X\n.extern X\nstop\n", 2);
err_case!(register_out_of_bounds, "mov r9, r1\nstop\n", 1);
err_case!(relative_target_missing, "jmp &NOWHERE\nstop\n", 1);
err_case!(doubled_relative_prefix, "jmp &&END\nstop\nEND: stop\n", 1);
err_case!(missing_arguments, "mov\nstop\n", 1);
err_case!(unknown_command, "foo r1\nstop\n", 1);
err_case!(undeclared_entry, ".entry LOOP\nstop\n", 1);

#[test]
fn macro_invocation_replaces_line() {
    let out = clean("mcro twice\ninc r1\ninc r1\nmcroend\ntwice\nstop\n");
    assert_eq!(out.am, "inc r1\ninc r1\nstop\n");
}

#[test]
fn expanded_text_survives_errors() {
    let out = assemble("MAIN: mov r9, r1\n stop\n", "test.as");
    assert!(out.diags.has_errors());
    assert_eq!(out.am, "MAIN: mov r9, r1\nstop\n");
}

#[test]
fn entry_file_rows() {
    let out = clean(".entry MAIN\nMAIN: inc r1\nstop\n");
    assert_eq!(entries_text(&out.symbols), "MAIN 0000100\n");
    assert_eq!(externs_text(&out.symbols), "");
}

#[test]
fn extern_usage_rows() {
    let out = clean(".extern EXT\nmov EXT, r2\nstop\n");
    assert_eq!(
        object_text(out.image.as_ref().unwrap()),
        "       3 0\n0000100 011a04\n0000101 000001\n0000102 3c0004\n"
    );
    assert_eq!(externs_text(&out.symbols), "EXT 0000101\n");
    assert!(!out.symbols.has_entries());
}

#[test]
fn undeclared_entry_emits_no_row() {
    let out = assemble(".entry LOOP\nstop\n", "test.as");
    assert_eq!(entries_text(&out.symbols), "");
}

#[test]
fn declared_but_unused_extern_has_no_rows() {
    let out = clean(".extern EXT\nstop\n");
    assert_eq!(out.symbols.extern_use_count(), 0);
    assert_eq!(externs_text(&out.symbols), "");
}

#[test]
fn program_with_every_feature() {
    let src = "\
.entry LOOP
.extern PRINTF
MAIN: mov #7, r1
LOOP: cmp r1, #0
bne &LOOP
jsr PRINTF
dec COUNT
stop
COUNT: .data 12
";
    let out = clean(src);
    assert_eq!(
        object_text(out.image.as_ref().unwrap()),
        "     11 1\n\
         0000100 001904\n\
         0000101 00003c\n\
         0000102 072004\n\
         0000103 000004\n\
         0000104 241014\n\
         0000105 fffff4\n\
         0000106 24081c\n\
         0000107 000001\n\
         0000108 140824\n\
         0000109 00037a\n\
         0000110 3c0004\n\
         0000111 00000c\n"
    );
    assert_eq!(entries_text(&out.symbols), "LOOP 0000102\n");
    assert_eq!(externs_text(&out.symbols), "PRINTF 0000107\n");
}
