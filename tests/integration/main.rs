#[path = "../fixtures/mod.rs"]
mod fixtures;
