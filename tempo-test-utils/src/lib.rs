// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and infrastructure for the tempo workspace.
//!
//! Provides recording subscribers and drive helpers shared by the
//! integration tests of every crate.

pub mod collecting;
pub mod helpers;

pub use collecting::{CollectingSubscriber, SharedCollector, StreamEvent};
pub use helpers::settle;
