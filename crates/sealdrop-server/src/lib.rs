// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sealdrop-server: service wiring and the HTTP surface, shared by the
// `sealdrop` binary and the integration tests.

pub mod http;
pub mod services;

pub use services::app_services::AppServices;
