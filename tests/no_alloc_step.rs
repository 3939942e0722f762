use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

use online_mlp::{Activation, Network};

struct CountingAlloc {
    allocs: AtomicUsize,
    reallocs: AtomicUsize,
}

impl CountingAlloc {
    const fn new() -> Self {
        Self {
            allocs: AtomicUsize::new(0),
            reallocs: AtomicUsize::new(0),
        }
    }

    fn reset(&self) {
        self.allocs.store(0, Ordering::Relaxed);
        self.reallocs.store(0, Ordering::Relaxed);
    }

    fn alloc_events(&self) -> usize {
        self.allocs.load(Ordering::Relaxed) + self.reallocs.load(Ordering::Relaxed)
    }
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.allocs.fetch_add(1, Ordering::Relaxed);
        unsafe { System.alloc(layout) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        self.allocs.fetch_add(1, Ordering::Relaxed);
        unsafe { System.alloc_zeroed(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        self.reallocs.fetch_add(1, Ordering::Relaxed);
        unsafe { System.realloc(ptr, layout, new_size) }
    }
}

#[global_allocator]
static ALLOC: CountingAlloc = CountingAlloc::new();

fn run_steps(net: &mut Network<'_>, steps: usize) -> usize {
    ALLOC.reset();
    for _ in 0..steps {
        net.evaluate();
        net.train();
    }
    ALLOC.alloc_events()
}

#[test]
fn evaluate_and_train_do_not_allocate_per_step() {
    let x = vec![0.1_f64; 32];
    let t = vec![0.0_f64; 8];
    let mut net = Network::new(&x, &t, &[64, 32, 8], Activation::Tanh, 1e-2, true);
    net.seed_weights();

    // Other test threads may allocate concurrently; compare step counts rather
    // than asserting an absolute zero.
    let few = run_steps(&mut net, 4);
    let many = run_steps(&mut net, 256);

    assert!(
        many <= few,
        "allocation events grew with step count: {few} for 4 steps, {many} for 256"
    );
}
