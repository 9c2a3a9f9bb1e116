// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Control transfer to the resident application image.

use stormloader_common::ApplicationEntry;

struct VectorTable {
    initial_sp: u32,
    reset_vector: u32,
}

impl VectorTable {
    unsafe fn read_from(addr: u32) -> Self {
        Self {
            initial_sp: (addr as *const u32).read_volatile(),
            reset_vector: (addr as *const u32).offset(1).read_volatile(),
        }
    }
}

/// Jumps into the application whose vector table sits at `vector_table`.
///
/// The image is not inspected; an empty or corrupt bank faults after the jump.
pub struct ApplicationJump {
    vector_table: u32,
}

impl ApplicationJump {
    pub fn new(vector_table: u32) -> Self {
        Self { vector_table }
    }
}

impl ApplicationEntry for ApplicationJump {
    fn jump(self) -> ! {
        defmt::println!("Jumping to application at 0x{:08x}", self.vector_table);
        unsafe {
            prepare_for_handoff();
            relocate_vector_table(self.vector_table);
            let vt = VectorTable::read_from(self.vector_table);
            jump_to_application(vt.initial_sp, vt.reset_vector)
        }
    }
}

/// Mask and clear every NVIC line so the application starts from a quiet core.
/// Clocks stay configured.
unsafe fn prepare_for_handoff() {
    cortex_m::interrupt::disable();

    const NVIC_ICER: *mut u32 = 0xE000_E180 as *mut u32;
    NVIC_ICER.write_volatile(0xFFFF_FFFF);

    const NVIC_ICPR: *mut u32 = 0xE000_E280 as *mut u32;
    NVIC_ICPR.write_volatile(0xFFFF_FFFF);
}

unsafe fn relocate_vector_table(addr: u32) {
    const SCB_VTOR: *mut u32 = 0xE000_ED08 as *mut u32;
    SCB_VTOR.write_volatile(addr);

    cortex_m::asm::dsb();
    cortex_m::asm::isb();
}

unsafe fn jump_to_application(initial_sp: u32, reset_vector: u32) -> ! {
    core::arch::asm!(
        "msr msp, {sp}",
        "cpsie i",
        "bx {reset}",
        sp = in(reg) initial_sp,
        reset = in(reg) reset_vector,
        options(noreturn)
    );
}
