// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Submitting render batches and collecting their results.

pub mod orchestrator;
