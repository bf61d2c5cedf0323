//! Integration Tests Module
//!
//! Drives the query router end to end with in-memory collaborators, and
//! checks decoding and normalization through the public crate APIs.

// Fake collaborators shared by the tests below
mod support;

// Query routing decisions and notices
mod router_test;

// Route decoding and two-stage resolution
mod routing_test;

// Agent response normalization
mod normalizer_test;
