use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Heap usage observed while a closure ran.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeapUsage {
    pub peak_bytes: usize,
    pub allocs: usize,
    pub retained_bytes: usize,
}

impl HeapUsage {
    pub fn peak_kib(&self) -> f64 {
        self.peak_bytes as f64 / 1024.0
    }
}

/// Global allocator wrapper counting live bytes, the high-water mark and the
/// number of allocation calls since the last reset.
pub struct BudgetAlloc {
    live: AtomicUsize,
    high_water: AtomicUsize,
    calls: AtomicUsize,
}

impl BudgetAlloc {
    pub const fn new() -> Self {
        Self {
            live: AtomicUsize::new(0),
            high_water: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Restart peak and call counting from the current live size.
    pub fn reset(&self) {
        let live = self.live.load(Ordering::SeqCst);
        self.high_water.store(live, Ordering::SeqCst);
        self.calls.store(0, Ordering::SeqCst);
    }

    pub fn live_bytes(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Run `op` and report usage relative to the live size before it started.
    pub fn measure<R>(&self, op: impl FnOnce() -> R) -> (R, HeapUsage) {
        self.reset();
        let baseline = self.live_bytes();
        let value = op();
        let usage = HeapUsage {
            peak_bytes: self.high_water.load(Ordering::SeqCst).saturating_sub(baseline),
            allocs: self.calls.load(Ordering::SeqCst),
            retained_bytes: self.live_bytes().saturating_sub(baseline),
        };
        (value, usage)
    }

    fn grow(&self, bytes: usize) {
        let now = self.live.fetch_add(bytes, Ordering::SeqCst) + bytes;
        self.high_water.fetch_max(now, Ordering::SeqCst);
    }

    fn shrink(&self, bytes: usize) {
        let _ = self
            .live
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |live| {
                Some(live.saturating_sub(bytes))
            });
    }
}

unsafe impl GlobalAlloc for BudgetAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            self.grow(layout.size());
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        self.shrink(layout.size());
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            self.grow(layout.size());
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
        ptr
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            if new_size >= layout.size() {
                self.grow(new_size - layout.size());
            } else {
                self.shrink(layout.size() - new_size);
            }
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
        new_ptr
    }
}
