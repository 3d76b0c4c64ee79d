mod scenarios;

// Shows the 'logging' feature's output when tests are run with RUST_LOG set.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
