//! In-process control and region.
//!
//! Used for headless runs and unit tests. Clones share state, so a test keeps
//! one clone to drive and inspect while the toggler owns another.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::error::{ToggleError, ToggleResult};
use crate::toggle::{AuxiliaryRegion, ChangeHandler, DisplayState, SelectionControl};

#[derive(Clone)]
pub struct MemorySelect {
    inner: Rc<MemorySelectInner>,
}

struct MemorySelectInner {
    value: RefCell<String>,
    handlers: RefCell<Vec<(u64, ChangeHandler)>>,
    next_handler_id: Cell<u64>,
}

impl MemorySelect {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(MemorySelectInner {
                value: RefCell::new(value.into()),
                handlers: RefCell::new(Vec::new()),
                next_handler_id: Cell::new(0),
            }),
        }
    }

    /// Replaces the value without notifying anyone.
    pub fn set_value(&self, value: impl Into<String>) {
        *self.inner.value.borrow_mut() = value.into();
    }

    /// Replaces the value and runs every change handler in registration order.
    ///
    /// Stops at the first failing handler and returns its error. Handlers must
    /// not subscribe or unsubscribe while being run.
    pub fn change(&self, value: impl Into<String>) -> ToggleResult<()> {
        self.set_value(value);
        let mut handlers = self.inner.handlers.borrow_mut();
        for (_, handler) in handlers.iter_mut() {
            handler()?;
        }
        Ok(())
    }

    pub fn listener_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }
}

impl SelectionControl for MemorySelect {
    type Subscription = MemorySubscription;

    fn value(&self) -> String {
        self.inner.value.borrow().clone()
    }

    fn subscribe(&self, handler: ChangeHandler) -> ToggleResult<MemorySubscription> {
        let id = self.inner.next_handler_id.get();
        self.inner.next_handler_id.set(id + 1);
        self.inner.handlers.borrow_mut().push((id, handler));
        Ok(MemorySubscription {
            select: Rc::downgrade(&self.inner),
            id,
        })
    }
}

pub struct MemorySubscription {
    select: Weak<MemorySelectInner>,
    id: u64,
}

impl Drop for MemorySubscription {
    fn drop(&mut self) {
        if let Some(select) = self.select.upgrade() {
            select
                .handlers
                .borrow_mut()
                .retain(|(handler_id, _)| *handler_id != self.id);
        }
    }
}

/// Region that records every display write.
///
/// Starts out visible, the way an unstyled block element renders.
#[derive(Clone)]
pub struct MemoryRegion {
    id: String,
    present: bool,
    state: Rc<Cell<DisplayState>>,
    writes: Rc<RefCell<Vec<DisplayState>>>,
}

impl MemoryRegion {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            present: true,
            state: Rc::new(Cell::new(DisplayState::Visible)),
            writes: Rc::default(),
        }
    }

    /// A region absent from the markup; every write fails.
    pub fn missing(id: impl Into<String>) -> Self {
        Self {
            present: false,
            ..Self::new(id)
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_state(&self) -> DisplayState {
        self.state.get()
    }

    /// Every state written so far, oldest first.
    pub fn writes(&self) -> Vec<DisplayState> {
        self.writes.borrow().clone()
    }
}

impl AuxiliaryRegion for MemoryRegion {
    fn set_display_state(&self, state: DisplayState) -> ToggleResult<()> {
        if !self.present {
            return Err(ToggleError::MissingRegion {
                id: self.id.clone(),
            });
        }
        self.state.set(state);
        self.writes.borrow_mut().push(state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_drop_removes_only_its_handler() {
        let select = MemorySelect::new("a");
        let calls = Rc::new(Cell::new(0));

        let first = select
            .subscribe(Box::new({
                let calls = calls.clone();
                move || {
                    calls.set(calls.get() + 1);
                    Ok(())
                }
            }))
            .unwrap();
        let _second = select
            .subscribe(Box::new({
                let calls = calls.clone();
                move || {
                    calls.set(calls.get() + 10);
                    Ok(())
                }
            }))
            .unwrap();
        assert_eq!(select.listener_count(), 2);

        drop(first);
        assert_eq!(select.listener_count(), 1);

        select.change("b").unwrap();
        assert_eq!(calls.get(), 10);
        assert_eq!(select.value(), "b");
    }

    #[test]
    fn change_stops_at_failing_handler() {
        let select = MemorySelect::new("a");
        let _failing = select
            .subscribe(Box::new(|| {
                Err(ToggleError::MissingRegion {
                    id: "gone".to_string(),
                })
            }))
            .unwrap();

        let error = select.change("__new__").unwrap_err();
        assert_eq!(error.to_string(), "auxiliary region `gone` not found");
    }

    #[test]
    fn missing_region_rejects_writes() {
        let region = MemoryRegion::missing("newHostelFields");
        assert!(region.set_display_state(DisplayState::Hidden).is_err());
        assert!(region.writes().is_empty());
    }

    #[test]
    fn clones_share_state() {
        let region = MemoryRegion::new("r");
        let observer = region.clone();
        region.set_display_state(DisplayState::Hidden).unwrap();
        assert_eq!(observer.display_state(), DisplayState::Hidden);
        assert_eq!(observer.id(), "r");
    }
}
