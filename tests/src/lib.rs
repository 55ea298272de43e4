//! End-to-end tests exercising the full walang pipeline (parse → register →
//! lower) through its public API, rather than any single stage in
//! isolation — the stage-level unit tests live alongside their own crates.

#[cfg(test)]
mod utils;

#[cfg(test)]
mod end_to_end;
