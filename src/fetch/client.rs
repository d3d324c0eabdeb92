use anyhow::Result;

/// Minimal HTTP abstraction so the loader can be exercised without a
/// network in tests.
pub trait HttpClient {
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}
