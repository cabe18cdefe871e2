//! Browser bindings for the simulation demo pages.
//!
//! This crate is a stub by default so the workspace builds on native targets
//! without wasm toolchains. Enable the DOM bindings with `--features web` on a
//! wasm32 target.
//!
//! A page script wires itself up with:
//!
//! ```js
//! import init, { Page } from "./pkg/simpage_web.js";
//! import * as models from "wasm-demo";
//!
//! await init();
//! const page = Page.setupFromModule("CA_MAZE", models);
//! page.main();
//! ```

pub mod bootstrap;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::Page;
