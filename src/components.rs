mod media;
pub use media::*;
mod media_query;
pub use media_query::*;
mod provider;
pub use provider::*;
mod with_media;
pub use with_media::*;
