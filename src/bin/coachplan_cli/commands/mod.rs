// ABOUTME: Command modules for coachplan-cli
// ABOUTME: Plan inspection/editing and client progress commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod plan;
pub mod progress;
