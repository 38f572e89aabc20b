// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

//! The launch stage: unpack native archives into a per-run scratch
//! directory and turn the provisioned version into the final argument
//! vector. Spawning the VM process is the front-end's job; this crate only
//! produces what it needs.

pub mod arguments;
mod error;
pub mod natives;
pub mod options;

pub use arguments::build_arguments;
pub use error::*;
pub use natives::{NativesDirectory, can_extract_native};
pub use options::{DEFAULT_JVM_ARGS, LaunchOptions, default_identity};
