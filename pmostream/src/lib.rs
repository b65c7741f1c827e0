//! Stream resolution for PMORadio
//!
//! Radio directory URLs rarely point at audio directly: they redirect, or
//! serve an M3U/PLS playlist wrapping the real stream. [`StreamResolver`]
//! follows that chain with a handful of cheap HTTP probes and never
//! downloads audio.
//!
//! ```no_run
//! use pmostream::StreamResolver;
//!
//! # tokio_test::block_on(async {
//! let resolver = StreamResolver::new()?;
//! let result = resolver.resolve("http://icecast.radiofrance.fr/fip-hifi.aac").await?;
//! println!("{} ({})", result.resolved_url, result.content_type);
//! # Ok::<(), pmostream::Error>(())
//! # }).unwrap();
//! ```

pub mod content;
pub mod error;
pub mod models;
pub mod playlist;
pub mod resolver;

#[cfg(feature = "pmoconfig")]
pub mod config_ext;

pub use content::ContentKind;
pub use error::{Error, Result};
pub use models::{ResolutionResult, NOTE_FROM_PLAYLIST};
pub use playlist::{extract_stream_url, PlaylistFormat};
pub use resolver::{ResolverBuilder, StreamResolver};

#[cfg(feature = "pmoconfig")]
pub use config_ext::StreamConfigExt;
