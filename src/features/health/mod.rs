//! Liveness endpoint reporting database and server status.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/health-check` | No | Database ping + server status |

pub mod dtos;
pub mod handlers;
pub mod routes;
