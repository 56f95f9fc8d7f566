//! API middleware.
//!
//! Execution order (outermost → innermost):
//! 1. CORS: permissive, answers preflight requests
//! 2. Access log: method, path, status, latency

pub mod audit;
