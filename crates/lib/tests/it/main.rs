/*! Integration tests for Envtree.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - storage: Tests for NodeStorage insertion and lookups
 * - codec: Tests for the flat text format
 * - encoder: Tests for encoding typed values into node trees
 * - decoder: Tests for decoding node trees into typed values, organized by destination kind
 * - mapper: End-to-end tests through the Mapper facade and crate-level functions
 * - dynamic: Tests for dynamically typed destinations
 * - diff: Tests for leaf-level tree comparison
 * - merge: Tests for tree overlay
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("envtree=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod codec;
mod diff;
mod encoder;
mod mapper;
mod merge;
mod storage;
