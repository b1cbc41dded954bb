//! Token channel shared between the token source and the workers

/// Permission to perform one unit of work. Carries no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token;

/// Sending half of a token channel
pub type TokenSender = flume::Sender<Token>;

/// Receiving half of a token channel
pub type TokenReceiver = flume::Receiver<Token>;

/// Channel capacities for the two pipeline stages
///
/// The producer hands tokens over without buffering, so a send completes only
/// once a worker or the rate limiter has taken the token. The paced stage
/// keeps a single slot.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Capacity between the producer and its consumer; 0 is a rendezvous
    pub token_buffer: usize,

    /// Capacity between the rate limiter and the workers
    pub paced_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            token_buffer: 0,
            paced_buffer: 1,
        }
    }
}

impl ChannelConfig {
    /// Set the producer channel capacity
    pub fn with_token_buffer(mut self, size: usize) -> Self {
        self.token_buffer = size;
        self
    }

    /// Set the paced channel capacity
    pub fn with_paced_buffer(mut self, size: usize) -> Self {
        self.paced_buffer = size;
        self
    }
}

/// Create a token channel; a capacity of 0 makes every send a hand-off
pub fn token_channel(capacity: usize) -> (TokenSender, TokenReceiver) {
    flume::bounded(capacity)
}

/// Shared read handle over a token channel
///
/// Cloning yields another handle onto the same channel, so several workers
/// race on it and each token is delivered at most once.
#[derive(Debug, Clone)]
pub struct TokenStream {
    rx: TokenReceiver,
}

impl TokenStream {
    /// Wrap a receiver
    pub fn new(rx: TokenReceiver) -> Self {
        Self { rx }
    }

    /// Receive the next token, or `None` once the channel is closed and empty
    pub async fn recv(&self) -> Option<Token> {
        self.rx.recv_async().await.ok()
    }

    /// Whether the sending side is gone and nothing is buffered
    pub fn is_finished(&self) -> bool {
        self.rx.is_disconnected() && self.rx.is_empty()
    }
}
