use super::Config;
use crate::secret::Secret;

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DOCSIFT_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("DOCSIFT_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("DOCSIFT_TIMEOUT_LLM")
            && let Ok(secs) = v.parse::<u64>()
        {
            self.timeouts.llm_seconds = secs;
        }
        if let Ok(v) = std::env::var("DOCSIFT_GATEWAY_BIND") {
            self.gateway.bind = v;
        }
        if let Ok(v) = std::env::var("DOCSIFT_GATEWAY_PORT") {
            if let Ok(port) = v.parse::<u16>() {
                self.gateway.port = port;
            } else {
                tracing::warn!("ignoring invalid DOCSIFT_GATEWAY_PORT value: {v}");
            }
        }
        if let Ok(v) = std::env::var("DOCSIFT_GATEWAY_MAX_BODY_SIZE")
            && let Ok(size) = v.parse::<usize>()
        {
            self.gateway.max_body_size = size;
        }

        // The prefixed name wins when both are set.
        let key = std::env::var("DOCSIFT_GEMINI_API_KEY")
            .ok()
            .and_then(Secret::non_empty)
            .or_else(|| {
                std::env::var("GEMINI_API_KEY")
                    .ok()
                    .and_then(Secret::non_empty)
            });
        if key.is_some() {
            self.secrets.gemini_api_key = key;
        }
    }
}
