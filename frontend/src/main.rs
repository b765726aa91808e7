use leptos::prelude::*;
use skillpilot_frontend::App;

// wasm 下使用 lol_alloc 作为全局分配器以减小体积
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    console_error_panic_hook::set_once();
    skillpilot::log_info!("SkillPilot AI starting");
    mount_to_body(App);
}
