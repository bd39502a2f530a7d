//! Channel-specific content generation.
//!
//! Routing: decides per audience segment whether the asset is an email or a
//! display banner. Writers: produce the HTML (and banner CSS) for that channel.

pub mod banner;
pub mod email;
pub mod router;

pub use banner::BannerWriter;
pub use email::EmailWriter;
pub use router::ChannelRouter;
