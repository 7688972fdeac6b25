mod client;

pub use client::ClientOptions;
pub use client::DEFAULT_BASE_URL;
pub use client::DEFAULT_TIMEOUT;
pub use client::DocumentClient;
