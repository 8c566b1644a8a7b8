#![cfg(test)]

mod errors;
mod listings;
mod operations;
mod test_utils;
