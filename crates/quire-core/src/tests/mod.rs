//! Test module for quire-core
//!
//! This module contains engine-level tests for:
//! - Mode dispatch and the informational error taxonomy
//! - Explorer path walking, listings and the parent affordance
//! - Create-new-item synthesis rules
//! - Recent-pages ordering and truncation
//! - Store handle lifecycle (attach/idle-release)
//! - Query result caching and request coalescing

mod fixtures;
