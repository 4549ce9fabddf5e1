// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Tests are allowed to unwrap.
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Composable camera controls and scene-graph pointer events for 3D viewers.
//!
//! Vantage splits camera navigation into independent *fragments* (rotation,
//! truck, zoom/dolly) driven by a unified pointer/wheel classifier, and
//! provides a DOM-style event dispatcher that hit-tests pointer input
//! against a scene graph and propagates capture → target → bubble events.
//!
//! # Key entry points
//!
//! - [`controls::CameraControls`] - the orchestrator owning target,
//!   fragments and the input classifier
//! - [`controls::presets`] - orbit, trackball and first-person setups
//! - [`events::EventDispatcher`] - ray-based hit testing and listener
//!   dispatch with pointer capture and hover synthesis
//! - [`options::ControlOptions`] - serializable configuration with TOML
//!   preset support
//!
//! # Architecture
//!
//! Everything runs synchronously on the caller's thread. Platform events are
//! converted into [`input::InputEvent`] values and fed either to a
//! [`controls::CameraControls`] (which mutates a shared [`camera::Camera`]
//! and its target point) or to an [`events::EventDispatcher`] (which
//! raycasts a [`scene::SceneGraph`] and invokes listeners). Rendering stays
//! with the caller.

pub mod camera;
pub mod controls;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod options;
pub mod scene;

pub use error::VantageError;
