// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: opens the key-record store and builds the encryption
// service the HTTP handlers call into.

pub mod app_services;
pub mod data_dir;
