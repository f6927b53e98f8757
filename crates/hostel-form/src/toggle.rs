//! Platform-independent visibility toggling.
//!
//! `VisibilityToggler` receives its selection control and auxiliary region
//! from the caller, it never looks anything up on its own. The browser
//! platform provides DOM-backed implementations, the memory platform provides
//! in-process ones for headless runs and tests.

use std::rc::{Rc, Weak};

use crate::error::ToggleResult;

/// Option value meaning "the hostel is not listed, define a new one".
pub const NEW_ENTITY_SENTINEL: &str = "__new__";

/// Visibility of the auxiliary region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayState {
    Visible,
    Hidden,
}

impl DisplayState {
    /// Only the exact sentinel shows the region; empty or unknown values hide it.
    pub fn for_value(value: &str) -> Self {
        if value == NEW_ENTITY_SENTINEL {
            Self::Visible
        } else {
            Self::Hidden
        }
    }

    /// CSS `display` value for this state.
    pub fn css_display(self) -> &'static str {
        match self {
            Self::Visible => "block",
            Self::Hidden => "none",
        }
    }
}

/// Callback run on every change notification of a [`SelectionControl`].
pub type ChangeHandler = Box<dyn FnMut() -> ToggleResult<()>>;

/// Single-choice input read by the toggler.
pub trait SelectionControl {
    /// Keeps the change handler registered until dropped.
    type Subscription;

    /// Currently selected value.
    fn value(&self) -> String;

    /// Registers `handler` for change notifications.
    fn subscribe(&self, handler: ChangeHandler) -> ToggleResult<Self::Subscription>;
}

/// Region whose display state is owned by the toggler.
pub trait AuxiliaryRegion {
    fn set_display_state(&self, state: DisplayState) -> ToggleResult<()>;
}

pub struct VisibilityToggler<C, R> {
    control: C,
    region: R,
}

impl<C: SelectionControl, R: AuxiliaryRegion> VisibilityToggler<C, R> {
    pub fn new(control: C, region: R) -> Self {
        Self { control, region }
    }

    /// Reads the control and writes the matching display state in one step.
    ///
    /// Repeated calls with an unchanged value write the same state again,
    /// nothing else is touched.
    pub fn evaluate(&self) -> ToggleResult<DisplayState> {
        let state = DisplayState::for_value(&self.control.value());
        self.region.set_display_state(state)?;
        Ok(state)
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    pub fn region(&self) -> &R {
        &self.region
    }
}

impl<C, R> VisibilityToggler<C, R>
where
    C: SelectionControl + 'static,
    R: AuxiliaryRegion + 'static,
{
    /// Initialize-then-subscribe.
    ///
    /// Without a control there is nothing to watch: returns `Ok(None)` and
    /// registers nothing. Otherwise the region is synced to the control's
    /// current value first and only then is `evaluate` subscribed to changes.
    /// A failing initial sync is returned and leaves no listener behind.
    pub fn mount(control: Option<C>, region: R) -> ToggleResult<Option<Mounted<C, R>>> {
        let Some(control) = control else {
            return Ok(None);
        };
        let toggler = Rc::new(Self::new(control, region));
        toggler.evaluate()?;

        let weak_toggler: Weak<Self> = Rc::downgrade(&toggler);
        let subscription = toggler.control.subscribe(Box::new(move || {
            match weak_toggler.upgrade() {
                Some(toggler) => toggler.evaluate().map(drop),
                None => Ok(()),
            }
        }))?;

        Ok(Some(Mounted {
            toggler,
            _subscription: subscription,
        }))
    }
}

/// A toggler wired to its control's change notifications.
///
/// Dropping it unsubscribes.
pub struct Mounted<C: SelectionControl, R> {
    toggler: Rc<VisibilityToggler<C, R>>,
    _subscription: C::Subscription,
}

impl<C: SelectionControl, R: AuxiliaryRegion> Mounted<C, R> {
    /// Re-syncs the region outside of a change notification.
    pub fn evaluate(&self) -> ToggleResult<DisplayState> {
        self.toggler.evaluate()
    }

    pub fn toggler(&self) -> &VisibilityToggler<C, R> {
        &self.toggler
    }
}
