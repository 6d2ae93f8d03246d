//! Thread-local current context.
//!
//! Hosts that prefer implicit state can register contexts here and use the
//! free functions, which operate on whichever context is current on the
//! calling thread. Contexts created here live until [`destroy_context`].

use crate::config::UiConfig;
use crate::context::Context;
use crate::error::{UiError, UiResult};
use crate::input::InputResponse;
use crate::tree::ElementId;
use std::cell::RefCell;
use std::rc::Rc;
use strata_core::DrawData;

/// Handle to a registered context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextHandle {
    index: u32,
    generation: u32,
}

struct Slot {
    generation: u32,
    context: Option<Rc<RefCell<Context>>>,
}

#[derive(Default)]
struct Registry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    current: Option<ContextHandle>,
}

impl Registry {
    fn get(&self, handle: ContextHandle) -> Option<Rc<RefCell<Context>>> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.context.clone()
    }

    fn insert(&mut self, context: Context) -> ContextHandle {
        let context = Some(Rc::new(RefCell::new(context)));
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.context = context;
            ContextHandle { index, generation: slot.generation }
        } else {
            let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot { generation: 0, context });
            ContextHandle { index, generation: 0 }
        }
    }

    fn remove(&mut self, handle: ContextHandle) -> Option<Rc<RefCell<Context>>> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let context = slot.context.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        if self.current == Some(handle) {
            self.current = None;
        }
        Some(context)
    }
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::default());
}

/// Creates a context, registers it and makes it current.
pub fn create_context(config: UiConfig) -> ContextHandle {
    let context = Context::new(config);
    let handle = REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        let handle = registry.insert(context);
        registry.current = Some(handle);
        handle
    });
    tracing::debug!(?handle, "context created");
    handle
}

/// Destroys a context. `None` destroys the current one.
///
/// Destroying the current context leaves no context current.
///
/// # Errors
///
/// [`UiError::NoCurrentContext`] for `None` without a current context,
/// [`UiError::ContextNotFound`] for a stale handle.
pub fn destroy_context(handle: Option<ContextHandle>) -> UiResult<()> {
    let handle = match handle {
        Some(handle) => handle,
        None => current_context().ok_or(UiError::NoCurrentContext)?,
    };
    let removed = REGISTRY.with(|registry| registry.borrow_mut().remove(handle));
    // Dropped outside the registry borrow: widget destructors may call back in.
    let context = removed.ok_or(UiError::ContextNotFound(handle))?;
    drop(context);
    tracing::debug!(?handle, "context destroyed");
    Ok(())
}

/// The current context, if any.
#[must_use]
pub fn current_context() -> Option<ContextHandle> {
    REGISTRY.with(|registry| registry.borrow().current)
}

/// Makes `handle` current. `None` clears the current context.
///
/// # Errors
///
/// [`UiError::ContextNotFound`] for a stale handle; the current context is
/// left unchanged.
pub fn set_current_context(handle: Option<ContextHandle>) -> UiResult<()> {
    REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        if let Some(handle) = handle {
            if registry.get(handle).is_none() {
                return Err(UiError::ContextNotFound(handle));
            }
        }
        registry.current = handle;
        Ok(())
    })
}

/// Runs `f` with exclusive access to a registered context.
///
/// # Errors
///
/// [`UiError::ContextNotFound`] for a stale handle, [`UiError::ContextBusy`]
/// if the context is already borrowed further up the stack.
pub fn with_context<R>(handle: ContextHandle, f: impl FnOnce(&mut Context) -> R) -> UiResult<R> {
    let context = REGISTRY
        .with(|registry| registry.borrow().get(handle))
        .ok_or(UiError::ContextNotFound(handle))?;
    let mut guard = context.try_borrow_mut().map_err(|_| UiError::ContextBusy)?;
    Ok(f(&mut *guard))
}

/// Runs `f` with exclusive access to the current context.
///
/// # Errors
///
/// [`UiError::NoCurrentContext`] plus everything [`with_context`] returns.
pub fn with_current<R>(f: impl FnOnce(&mut Context) -> R) -> UiResult<R> {
    let handle = current_context().ok_or(UiError::NoCurrentContext)?;
    with_context(handle, f)
}

/// [`Context::add_to_root`] on the current context.
///
/// # Errors
///
/// Registry errors, or the tree's rejection of the attach.
pub fn add_to_root(id: ElementId) -> UiResult<()> {
    with_current(|ctx| ctx.add_to_root(id))?
}

/// [`Context::remove_from_root`] on the current context.
///
/// # Errors
///
/// Registry errors only.
pub fn remove_from_root(id: ElementId) -> UiResult<bool> {
    with_current(|ctx| ctx.remove_from_root(id))
}

/// [`Context::set_root_size`] on the current context.
///
/// # Errors
///
/// Registry errors only.
pub fn set_root_size(width: u32, height: u32) -> UiResult<()> {
    with_current(|ctx| ctx.set_root_size(width, height))
}

/// [`Context::set_dirty`] on the current context.
///
/// # Errors
///
/// Registry errors only.
pub fn set_dirty() -> UiResult<()> {
    with_current(Context::set_dirty)
}

/// [`Context::update`] on the current context.
///
/// # Errors
///
/// Registry errors only.
pub fn update() -> UiResult<InputResponse> {
    with_current(Context::update)
}

/// [`Context::render`] on the current context.
///
/// # Errors
///
/// Registry errors only.
pub fn render() -> UiResult<bool> {
    with_current(Context::render)
}

/// Reads the current context's draw data.
///
/// # Errors
///
/// Registry errors only.
pub fn with_draw_data<R>(f: impl FnOnce(&DrawData) -> R) -> UiResult<R> {
    with_current(|ctx| f(ctx.draw_data()))
}
