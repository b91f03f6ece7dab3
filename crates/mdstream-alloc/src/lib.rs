//! Installs `mimalloc` as the global allocator for binaries that link this
//! crate. The streaming tokenizer and assembler allocate small, short-lived
//! objects (runs, block entries) on nearly every chunk; a faster allocator
//! pays for itself at typical chat-message throughput.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
