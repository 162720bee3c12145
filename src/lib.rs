//! Drag-and-drop page builder.
//!
//! Users drag text, image, and button elements from a palette onto a
//! fixed-size canvas, move them around, edit their properties in a side
//! panel, and open a flow-laid-out preview. All editor behavior lives in the
//! headless [`engine::EngineCore`], which turns input into [`engine::Action`]s
//! and is tested natively. The `web` feature adds the WebAssembly host that
//! wires the page's DOM events to the core and applies its actions.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Editor controller and the [`engine::Action`] protocol |
//! | [`doc`] | Element kinds, per-kind behavior, and the element store |
//! | [`input`] | Input sources, pointer targets, and the gesture state machine |
//! | [`form`] | Property form model and submitted values |
//! | [`validate`] | Image URL validation tickets |
//! | [`preview`] | Read-only preview rendering |
//! | [`render`] | Declarative DOM nodes and HTML serialization |
//! | [`geom`] | Points, sizes, and canvas clamping |
//! | [`color`] | Hex color parsing |
//! | [`config`] | Editor configuration |
//! | [`error`] | Editor errors |
//! | [`consts`] | Defaults and user-facing messages |
//! | `web` | Browser host (`web` feature) |

pub mod color;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod form;
pub mod geom;
pub mod input;
pub mod preview;
pub mod render;
pub mod validate;

#[cfg(feature = "web")]
pub mod web;
