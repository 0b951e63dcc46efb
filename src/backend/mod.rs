//! Render backend registry and fan-out dispatch
//!
//! A backend is a named group of operation handlers contributed by an
//! output surface (terminal, web, ...). The registry fans each request out
//! to every active backend:
//!
//! ```text
//!                    BackendRegistry::dispatch(request)
//!                    ┌────────────────────────────────┐
//!                    │ entries (registration order)   │
//!                    └──────────────┬─────────────────┘
//!              ┌────────────────────┼────────────────────┐
//!              ▼                    ▼                    ▼
//!        ["terminal"]            ["web"]             ["custom"]
//!        handler(op)?           handler(op)?         handler(op)?
//!           │ fresh instance       │ missing → skip     │ Err → warn
//!           ▼                      ▼                    ▼
//!        render(request)        (lenient)           (isolated)
//! ```
//!
//! One backend's failure or absence never prevents the others from
//! running.

pub mod dispatch;
pub mod error;
pub mod operation;
pub mod registry;

pub use dispatch::{DispatchFailure, DispatchMode, DispatchSummary};
pub use error::{BackendError, DispatchError, RegistryError};
pub use operation::{Operation, RenderRequest};
pub use registry::{Backend, BackendBuilder, BackendRegistry, RenderHandler};
