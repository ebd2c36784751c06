use reqwest::redirect::Policy;
use reqwest::Client;

/// Settings for the pooled client every forwarded request goes through.
#[derive(Default)]
pub struct HttpClientConfig {
  pub egress_proxy: Option<String>,
  pub user: Option<String>,
  pub pass: Option<String>,
}

impl HttpClientConfig {
  pub fn to_client(self) -> Result<Client, reqwest::Error> {
    let HttpClientConfig {
      egress_proxy,
      user,
      pass,
    } = self;
    let mut client_builder = reqwest::ClientBuilder::new();

    if let Some(proxy_url) = egress_proxy {
      let mut proxy = reqwest::Proxy::all(proxy_url)?;

      if let (Some(user_name), Some(password)) = (user, pass) {
        proxy = proxy.basic_auth(&user_name, &password);
      }

      client_builder = client_builder.proxy(proxy);
    } else {
      // Only the configured egress proxy is used, never ambient HTTP_PROXY.
      client_builder = client_builder.no_proxy();
    }

    // Upstream redirects are relayed to the caller, not followed.
    let client = client_builder.redirect(Policy::none()).build()?;

    Ok(client)
  }
}
