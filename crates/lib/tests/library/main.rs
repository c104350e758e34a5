mod common;
mod dsl_tests;
mod session_tests;
