// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data models for the storyboard editor.

pub mod item;
pub mod job;
pub mod library;
pub mod store;
