use reqwest::Client;

const APP_USER_AGENT: &str = "CitadelMods/0.1.0";

/// Build the shared HTTP client used by the vendor API module.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(APP_USER_AGENT).build()
}
