// Copyright 2026 Pricehound Contributors
// SPDX-License-Identifier: Apache-2.0

//! REST surface and process plumbing for the Pricehound engine.

pub mod rest;
pub mod telemetry;
