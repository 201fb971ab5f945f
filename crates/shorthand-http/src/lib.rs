// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Shorthand request helpers.
//!
//! The server integration builds a [`RequestContext`] per request; the
//! [`Shorthand`] helpers read signed strings out of it, decode them, and
//! build JSON responses. Nothing here touches process-wide state.

pub mod request;
pub mod response;
pub mod shorthand;

pub use request::RequestContext;
pub use response::{JsonResponse, status_code};
pub use shorthand::{Shorthand, SignedSource};
