// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod api;
pub mod classifier;
pub mod errors;
pub mod hub_url;
pub mod pipeline;
pub mod session;
pub mod settings;
pub mod state_machine;
