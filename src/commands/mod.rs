// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod transactions;
pub mod reports;
pub mod sync;
pub mod listen;
pub mod exporter;
pub mod settings;
pub mod doctor;

use crate::connectivity::NetworkProbe;
use crate::remote::HttpApi;
use crate::sync::SynchronizedRepository;

/// The repository the binary runs against.
pub type Repository = SynchronizedRepository<HttpApi, NetworkProbe>;
