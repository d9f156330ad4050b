// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod backup;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod finance;
pub mod migration;
pub mod models;
pub mod repos;
pub mod schema;
pub mod utils;

pub use db::{Batch, Store};
pub use error::StoreError;
pub use finance::Finance;
pub use schema::Collection;
