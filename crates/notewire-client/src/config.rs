/// Client connection configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// WebSocket endpoint of the backend kernel.
    pub server_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:6806/ws".into(),
        }
    }
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_kernel() {
        let config = ClientConfig::default();
        assert!(config.server_url.starts_with("ws://127.0.0.1"));
    }
}
