pub mod app;

pub use app::{bearer, make_test_app, make_test_app_with_state, send};
