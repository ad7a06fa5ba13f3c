#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn temp_dir(prefix: &str) -> PathBuf {
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let mut dir = std::env::temp_dir();
    dir.push(format!("msp430_mem_{prefix}_{}_{}", std::process::id(), id));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn write_file(path: &Path, data: &[u8]) {
    std::fs::write(path, data).unwrap();
}

pub fn run_cli(args: &[String]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_msp430-mem"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

pub fn assert_success(output: &Output) {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("msp430-mem failed: {stderr}");
    }
}

pub fn read_nonempty_lines(path: &Path) -> Vec<String> {
    let text = std::fs::read_to_string(path).unwrap();
    text.lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Little-endian ELF32 with a single allocated `.text` section at `addr`.
pub fn minimal_elf32(e_type: u16, addr: u32, text: &[u8]) -> Vec<u8> {
    const SHT_PROGBITS: u32 = 1;
    const SHT_STRTAB: u32 = 3;
    const SHF_ALLOC_EXECINSTR: u32 = 0x2 | 0x4;

    let strtab: &[u8] = b"\0.text\0.shstrtab\0";
    let text_off = 52u32;
    let strtab_off = text_off + text.len() as u32;
    let unaligned = strtab_off + strtab.len() as u32;
    let pad = (4 - unaligned % 4) % 4;
    let shoff = unaligned + pad;

    let mut out = Vec::new();
    out.extend_from_slice(&[0x7F, b'E', b'L', b'F', 1, 1, 1, 0]);
    out.extend_from_slice(&[0; 8]);
    push_u16(&mut out, e_type);
    push_u16(&mut out, 105); // EM_MSP430
    push_u32(&mut out, 1);
    push_u32(&mut out, addr);
    push_u32(&mut out, 0);
    push_u32(&mut out, shoff);
    push_u32(&mut out, 0);
    push_u16(&mut out, 52);
    push_u16(&mut out, 32);
    push_u16(&mut out, 0);
    push_u16(&mut out, 40);
    push_u16(&mut out, 3);
    push_u16(&mut out, 2);

    out.extend_from_slice(text);
    out.extend_from_slice(strtab);
    out.resize(out.len() + pad as usize, 0);

    let headers = [
        [0, 0, 0, 0, 0, 0],
        [1, SHT_PROGBITS, SHF_ALLOC_EXECINSTR, addr, text_off, text.len() as u32],
        [7, SHT_STRTAB, 0, 0, strtab_off, strtab.len() as u32],
    ];
    for [name, kind, flags, address, offset, size] in headers {
        for v in [name, kind, flags, address, offset, size, 0, 0, 1, 0] {
            push_u32(&mut out, v);
        }
    }
    out
}
