//! Session option types
//!
//! Providers are reached over sessions bound to a port. These types describe
//! the session characteristics a provider offers and whether two option sets
//! can be used together.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Per-attachment receiver for incoming join requests (valid values 1..=0xFFFF)
pub type SessionPort = u16;

/// Lets the bus choose any available port when binding
pub const SESSION_PORT_ANY: SessionPort = 0;

/// Uniquely identifies a session instance
pub type SessionId = u32;

/// Bitmask of transport types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransportMask(pub u16);

impl TransportMask {
    /// No transports
    pub const NONE: TransportMask = TransportMask(0x0000);
    /// Local (same device) transport
    pub const LOCAL: TransportMask = TransportMask(0x0001);
    /// Wireless local-area network transport
    pub const WLAN: TransportMask = TransportMask(0x0004);
    /// Wireless wide-area network transport
    pub const WWAN: TransportMask = TransportMask(0x0008);
    /// Wired local-area network transport
    pub const LAN: TransportMask = TransportMask(0x0010);
    /// Wi-Fi Direct transport
    pub const WFD: TransportMask = TransportMask(0x0080);
    /// TCP/IP transport
    pub const TCP: TransportMask = TransportMask(0x0004);
    /// UDP/IP transport
    pub const UDP: TransportMask = TransportMask(0x0100);
    /// IP transport (actual IP-based transport chosen by the system)
    pub const IP: TransportMask = TransportMask(0x0004);
    /// Any non-experimental transport
    pub const ANY: TransportMask = TransportMask(0xFFFF & !0x0080 & !0x0100);

    /// True if the two masks share at least one transport
    pub fn intersects(self, other: TransportMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn contains(self, other: TransportMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for TransportMask {
    fn default() -> Self {
        TransportMask::ANY
    }
}

impl std::ops::BitOr for TransportMask {
    type Output = TransportMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        TransportMask(self.0 | rhs.0)
    }
}

/// Traffic carried by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficType {
    /// Session carries message traffic
    #[default]
    Messages,
    /// Session carries an unreliable (lossy) byte stream
    RawUnreliable,
    /// Session carries a reliable byte stream
    RawReliable,
}

impl TrafficType {
    /// Wire bit of the traffic type
    pub fn bits(self) -> u8 {
        match self {
            TrafficType::Messages => 0x01,
            TrafficType::RawUnreliable => 0x02,
            TrafficType::RawReliable => 0x04,
        }
    }
}

/// Proximity constraint bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proximity(pub u8);

impl Proximity {
    pub const ANY: Proximity = Proximity(0xFF);
    pub const PHYSICAL: Proximity = Proximity(0x01);
    pub const NETWORK: Proximity = Proximity(0x02);
}

impl Default for Proximity {
    fn default() -> Self {
        Proximity::ANY
    }
}

/// Parameters that define a session's characteristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionOpts {
    /// Traffic type
    #[serde(default)]
    pub traffic: TrafficType,
    /// True if the session can be joined by more than two endpoints
    #[serde(default)]
    pub is_multipoint: bool,
    /// Proximity constraint
    #[serde(default)]
    pub proximity: Proximity,
    /// Allowed transports
    #[serde(default)]
    pub transports: TransportMask,
}

impl SessionOpts {
    /// Construct options with specific parameters
    pub fn new(
        traffic: TrafficType,
        is_multipoint: bool,
        proximity: Proximity,
        transports: TransportMask,
    ) -> Self {
        Self {
            traffic,
            is_multipoint,
            proximity,
            transports,
        }
    }

    /// Check whether these options can use the option set offered by `other`
    ///
    /// Compatible options share at least one transport, traffic type and
    /// proximity. Multipoint support is not a condition of compatibility.
    pub fn is_compatible(&self, other: &SessionOpts) -> bool {
        self.transports.intersects(other.transports)
            && (self.traffic.bits() & other.traffic.bits()) != 0
            && (self.proximity.0 & other.proximity.0) != 0
    }
}

/// Orders by traffic, then multipoint, then proximity, then transports
impl Ord for SessionOpts {
    fn cmp(&self, other: &Self) -> Ordering {
        self.traffic
            .bits()
            .cmp(&other.traffic.bits())
            .then(self.is_multipoint.cmp(&other.is_multipoint))
            .then(self.proximity.0.cmp(&other.proximity.0))
            .then(self.transports.0.cmp(&other.transports.0))
    }
}

impl PartialOrd for SessionOpts {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SessionOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "traffic=0x{:02x}, isMultipoint={}, proximity=0x{:02x}, transports=0x{:04x}",
            self.traffic.bits(),
            self.is_multipoint,
            self.proximity.0,
            self.transports.0
        )
    }
}
