//! Configuration module

mod site;

pub use site::CarouselConfig;
pub use site::Experience;
pub use site::PersonConfig;
pub use site::RenderConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
pub use site::SocialLink;
pub use site::ThemeMode;
