#![allow(dead_code)]

pub mod tokens;

pub use app_builder::create_test_app;
