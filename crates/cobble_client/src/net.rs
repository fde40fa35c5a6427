use std::io::{self, ErrorKind};
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use cobble_input::context::{ClickSink, PlayerClick};
use cobble_shared::protocol::{self, C2S, S2C};
use renet::{ChannelConfig, ConnectionConfig, RenetClient, SendType};
use tracing::{debug, info, warn};

pub const RELIABLE_ORDERED_CHANNEL: u8 = 0;

pub struct ClientNet {
    client: RenetClient,
    socket: UdpSocket,
    server_addr: SocketAddr,
    connected: bool,
    player_id: Option<u64>,
    supports_player_click: bool,
}

impl ClientNet {
    pub fn new(server_addr: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket.set_nonblocking(true)?;

        Ok(Self {
            client: RenetClient::new(Self::connection_config()),
            socket,
            server_addr,
            connected: false,
            player_id: None,
            supports_player_click: false,
        })
    }

    pub fn connect(&mut self, username: &str) {
        self.client.set_connected();
        self.connected = true;
        self.player_id = None;
        info!("Connecting to server at {}", self.server_addr);

        let handshake = C2S::Handshake {
            protocol_version: protocol::PROTOCOL_VERSION,
            username: username.to_owned(),
        };
        self.send_reliable(&handshake);
    }

    pub fn update(&mut self, dt: Duration) {
        self.client.update(dt);

        let mut packet_buffer = [0u8; 65_535];
        loop {
            match self.socket.recv_from(&mut packet_buffer) {
                Ok((bytes_received, from_addr)) => {
                    if from_addr == self.server_addr {
                        self.client.process_packet(&packet_buffer[..bytes_received]);
                    }
                }
                Err(err) if err.kind() == ErrorKind::WouldBlock => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    warn!("UDP receive error from server {}: {err}", self.server_addr);
                    break;
                }
            }
        }

        self.flush();

        if self.connected && self.client.is_disconnected() {
            warn!("Disconnected from server: {:?}", self.client.disconnect_reason());
            self.connected = false;
            self.player_id = None;
            self.supports_player_click = false;
        }
    }

    fn flush(&mut self) {
        for packet in self.client.get_packets_to_send() {
            if let Err(err) = self.socket.send_to(&packet, self.server_addr) {
                if err.kind() != ErrorKind::WouldBlock && err.kind() != ErrorKind::Interrupted {
                    warn!("failed sending packet to server {}: {err}", self.server_addr);
                }
            }
        }
    }

    pub fn send_reliable(&mut self, msg: &C2S) {
        let encoded = protocol::encode(msg);
        self.client.send_message(RELIABLE_ORDERED_CHANNEL, encoded);
    }

    /// Messages received since the last call, oldest first.
    pub fn receive(&mut self) -> Vec<S2C> {
        let mut messages = Vec::new();
        while let Some(data) = self.client.receive_message(RELIABLE_ORDERED_CHANNEL) {
            match protocol::decode::<S2C>(&data) {
                Ok(msg) => {
                    if let S2C::HandshakeAccept {
                        player_id,
                        supports_player_click,
                        ..
                    } = &msg
                    {
                        self.player_id = Some(*player_id);
                        self.supports_player_click = *supports_player_click;
                    }
                    messages.push(msg);
                }
                Err(err) => warn!("failed to decode S2C message: {err}"),
            }
        }
        messages
    }

    pub fn is_connected(&self) -> bool {
        self.connected && self.client.is_connected()
    }

    pub fn player_id(&self) -> Option<u64> {
        self.player_id
    }

    pub fn disconnect(&mut self) {
        if self.connected {
            self.send_reliable(&C2S::Disconnect);
            self.flush();
        }

        self.client.disconnect();
        self.connected = false;
        self.player_id = None;
        self.supports_player_click = false;
    }

    fn connection_config() -> ConnectionConfig {
        const CHANNEL_MEMORY_BYTES: usize = 4 * 1024 * 1024;
        let channels = vec![ChannelConfig {
            channel_id: RELIABLE_ORDERED_CHANNEL,
            max_memory_usage_bytes: CHANNEL_MEMORY_BYTES,
            send_type: SendType::ReliableOrdered {
                resend_time: Duration::from_millis(250),
            },
        }];

        ConnectionConfig {
            available_bytes_per_tick: 60_000,
            server_channels_config: channels.clone(),
            client_channels_config: channels,
        }
    }
}

/// Optional server connection. Singleplayer runs with no link at all.
#[derive(Default)]
pub struct ServerLink {
    pub net: Option<ClientNet>,
}

impl ServerLink {
    pub fn connected(net: ClientNet) -> Self {
        Self { net: Some(net) }
    }

    pub fn send(&mut self, msg: &C2S) {
        if let Some(net) = self.net.as_mut() {
            net.send_reliable(msg);
        }
    }
}

impl ClickSink for ServerLink {
    fn supports_player_click(&self) -> bool {
        self.net
            .as_ref()
            .is_some_and(|net| net.is_connected() && net.supports_player_click)
    }

    fn send_player_click(&mut self, click: &PlayerClick) {
        if !self.supports_player_click() {
            return;
        }

        let msg = C2S::player_click(
            click.button.wire_id(),
            click.pressed,
            click.heading,
            click.pitch,
            click.target_entity,
            &click.selection,
        );
        debug!("Sending {:?} click (pressed: {})", click.button, click.pressed);
        self.send(&msg);
    }
}
