// Push channel to the support server
mod codec;
mod events;
mod socket;

pub use codec::{Packet, TransportError};
pub use events::{
    ChartPayload, INBOUND_CHANNELS, InboundChannel, InboundEvent, InitialData, OutboundRequest, PriceData,
    PriceTick, decode_event, parse_levels,
};
pub use socket::{ConnectionStatus, SocketClient};
