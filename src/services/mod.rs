pub mod image;
pub mod llm;
pub mod scenario;
pub mod speech;

// reqwest futures are not Send in the browser, so the client traits only
// require Send + Sync on native targets.
#[cfg(target_arch = "wasm32")]
pub trait ClientBounds {}
#[cfg(target_arch = "wasm32")]
impl<T> ClientBounds for T {}

#[cfg(not(target_arch = "wasm32"))]
pub trait ClientBounds: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> ClientBounds for T {}
