//! DOM-style pointer events for scene objects.
//!
//! An [`EventDispatcher`] raycasts each native [`InputEvent`] into a
//! [`SceneGraph`], then delivers a [`SceneEvent`] to object listeners in
//! DOM order:
//!
//! 1. global capturing listeners
//! 2. per hit object (nearest first): capture phase from the root, target,
//!    bubble phase back to the root; an ancestor shared by several hits is
//!    visited once per phase
//! 3. global bubbling listeners
//!
//! A pointer captured with [`DispatcherHandle::set_pointer_capture`] skips
//! hit-testing and goes straight to its capturing object. Pointer over/out
//! and enter/leave are synthesized from pointer moves, wheel events and
//! [`EventDispatcher::update`].
//!
//! [`InputEvent`]: crate::input::InputEvent
//! [`SceneGraph`]: crate::scene::SceneGraph

mod abort;
mod dispatcher;
mod event;
mod hover;
mod registry;

pub use abort::{AbortController, AbortSignal};
pub use dispatcher::{DispatcherHandle, EventDispatcher};
pub use event::{EventType, Phase, SceneEvent};
pub use registry::{Listener, ListenerId, ListenerOptions};
