// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

pub mod layer;
pub mod metal;
pub mod stack;
pub mod via;

pub use layer::*;
pub use metal::*;
pub use stack::*;
pub use via::*;
