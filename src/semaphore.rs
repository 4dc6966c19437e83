//! Counting semaphore bounding the number of live worker threads
use std::sync::{Condvar, Mutex, OnceLock};

#[derive(Debug)]
pub struct CountingSemaphore {
    max_count: usize,
    count: Mutex<usize>,
    available: Condvar,
}

impl CountingSemaphore {
    pub fn new(max_count: usize) -> Self {
        CountingSemaphore {
            max_count,
            count: Mutex::new(max_count),
            available: Condvar::new(),
        }
    }

    /// Process wide instance sized to the available parallelism
    pub fn global() -> &'static CountingSemaphore {
        static INSTANCE: OnceLock<CountingSemaphore> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let max = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);
            CountingSemaphore::new(max)
        })
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    /// Take a permit, blocking until one is free
    pub fn acquire(&self) {
        let mut count = self
            .count
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        while *count == 0 {
            count = self
                .available
                .wait(count)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        *count -= 1;
    }

    /// Give a permit back and wake one waiter
    pub fn release(&self) {
        let mut count = self
            .count
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *count += 1;
        if *count <= self.max_count {
            self.available.notify_one();
        }
    }

    /// Acquire a permit that is released when dropped
    pub fn permit(&self) -> Permit<'_> {
        self.acquire();
        Permit { semaphore: self }
    }
}

/// A taken permit of a [`CountingSemaphore`], given back on drop
#[derive(Debug)]
pub struct Permit<'a> {
    semaphore: &'a CountingSemaphore,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.semaphore.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn never_exceeds_max_count() {
        let semaphore = CountingSemaphore::new(2);
        let live = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                semaphore.acquire();
                scope.spawn(|| {
                    let now = live.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(std::time::Duration::from_millis(5));
                    live.fetch_sub(1, Ordering::SeqCst);
                    semaphore.release();
                });
            }
        });
        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(*semaphore.count.lock().unwrap(), 2);
    }

    #[test]
    fn permits_release_on_drop() {
        let semaphore = CountingSemaphore::new(1);
        {
            let _permit = semaphore.permit();
            assert_eq!(*semaphore.count.lock().unwrap(), 0);
        }
        assert_eq!(*semaphore.count.lock().unwrap(), 1);
    }

    #[test]
    fn global_is_shared() {
        let a = CountingSemaphore::global() as *const _;
        let b = CountingSemaphore::global() as *const _;
        assert_eq!(a, b);
        assert!(CountingSemaphore::global().max_count() >= 1);
    }
}
