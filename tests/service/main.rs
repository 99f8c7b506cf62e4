//! Record service integration tests.

mod threaded;
