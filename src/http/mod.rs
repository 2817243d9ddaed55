pub mod client;

#[cfg(test)]
mod test;

pub use client::{RateLimitSettings, RateLimitedHttpClient};
