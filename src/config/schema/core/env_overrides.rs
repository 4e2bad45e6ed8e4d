use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("PITCHCOACH_API_KEY")
            && !key.trim().is_empty()
        {
            self.api_key = Some(key.trim().to_string());
        }

        if let Ok(provider) = std::env::var("PITCHCOACH_PROVIDER")
            && !provider.trim().is_empty()
        {
            self.default_provider = Some(provider.trim().to_string());
        }

        if let Ok(model) = std::env::var("PITCHCOACH_MODEL")
            && !model.trim().is_empty()
        {
            self.default_model = Some(model.trim().to_string());
        }

        if let Ok(port_str) = std::env::var("PITCHCOACH_GATEWAY_PORT")
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Ok(host) = std::env::var("PITCHCOACH_GATEWAY_HOST")
            && !host.trim().is_empty()
        {
            self.gateway.host = host.trim().to_string();
        }
    }
}
