// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The component runtime: one core function, one cycle at a time.

pub mod builder;
pub mod component;
pub mod looper;


pub use builder::ComponentBuilder;
pub use component::{Component, CoreFunction, CoreOutput};
