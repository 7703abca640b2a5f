//! Installs test logging once per integration test binary. Level is
//! `TEST_LOG`, then `RUST_LOG`, then `warn`.

#[ctor::ctor]
fn _auto_init_for_integration_tests() {
    silhouette_test_support::logging::init();
}
