//! `[serve]` section: where the page API listens.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// Listen address for `pagedeck serve`.
///
/// ```toml
/// [serve]
/// interface = "0.0.0.0"
/// port = 8800
/// ```
///
/// If `port` is taken, the server walks upwards to the next free one.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    /// IP address to bind; must parse as `IpAddr`.
    #[serde(default = "defaults::serve::interface")]
    #[educe(Default = defaults::serve::interface())]
    pub interface: String,

    #[serde(default = "defaults::serve::port")]
    #[educe(Default = defaults::serve::port())]
    pub port: u16,
}
