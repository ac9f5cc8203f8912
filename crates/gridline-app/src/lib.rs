// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod action;
pub mod details;
pub mod dispatch;
pub mod ids;
pub mod input;
pub mod keys;
pub mod navigation;
pub mod selection;
pub mod table;

pub use action::*;
pub use details::*;
pub use dispatch::*;
pub use ids::*;
pub use input::*;
pub use keys::*;
pub use navigation::*;
pub use selection::*;
pub use table::*;
