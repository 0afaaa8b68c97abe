// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the storyboard editor.

pub mod inspector;
pub mod items_table;
pub mod preview;
pub mod results;
pub mod storyboard;
pub mod toolbar;
