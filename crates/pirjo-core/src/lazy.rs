//! Process-wide models loaded on first use.
//!
//! A `SharedModel` lives in a `static`, is initialized by whichever caller
//! gets there first, and is never torn down. Concurrent first callers block
//! until the single initializer finishes; a failed initialization leaves the
//! slot empty so a later call may retry.

use once_cell::sync::OnceCell;

pub struct SharedModel<T> {
    name: &'static str,
    cell: OnceCell<T>,
}

impl<T> SharedModel<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceCell::new(),
        }
    }

    pub fn get_or_try_init<F>(&self, init: F) -> anyhow::Result<&T>
    where
        F: FnOnce() -> anyhow::Result<T>,
    {
        self.cell.get_or_try_init(|| {
            tracing::debug!(model = self.name, "loading shared model");
            init()
        })
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }
}
